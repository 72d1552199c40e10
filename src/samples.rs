//! Hand assembled meshes that mirror what the tessellation engine leaves in
//! memory for small point sets. The extraction routines are tested and
//! benchmarked against these instead of a live engine.

use crate::{error::Error, mesh::Mesh, status::ORIENT_CLOCK};

/// Convex hull of the unit square, with one edge facet per side.
///
/// ```text
///        e2
///    3-------2
///    |       |
///  e3|       |e1
///    |       |
///    0-------1
///        e0
/// ```
pub fn square_hull_2d() -> Result<Mesh, Error> {
    ring_hull_2d(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
}

/// Convex hull of a regular polygon inscribed in the unit circle. The first
/// corner sits at angle zero and the rest follow counterclockwise.
pub fn ngon_hull_2d(n: usize) -> Result<Mesh, Error> {
    assert!(n >= 3, "a polygon needs at least three corners");
    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let theta = std::f64::consts::TAU * i as f64 / n as f64;
        corners.push([theta.cos(), theta.sin()]);
    }
    ring_hull_2d(&corners)
}

/// Boundary ring of a convex polygon given counterclockwise. Facets alternate
/// their top-orientation flag, and the vertex and neighbor slots are stored so
/// that either flag walks the ring forward.
fn ring_hull_2d(corners: &[[f64; 2]]) -> Result<Mesh, Error> {
    let n = corners.len();
    let mut mesh = Mesh::new(2, 2);
    let mut coords = Vec::with_capacity(2 * n);
    for c in corners {
        coords.extend_from_slice(c);
    }
    mesh.add_points(&coords)?;
    let mut verts = Vec::with_capacity(n);
    for i in 0..n {
        verts.push(mesh.add_vertex(mesh.point_ref(i))?);
    }
    let mut facets = Vec::with_capacity(n);
    let mut perimeter = 0.0;
    let mut area2 = 0.0;
    for i in 0..n {
        let (a, b) = (corners[i], corners[(i + 1) % n]);
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len = (dx * dx + dy * dy).sqrt();
        debug_assert!(len > 0.0);
        let normal = [dy / len, -dx / len];
        let offset = -(normal[0] * a[0] + normal[1] * a[1]);
        let toporient = i % 2 == 0;
        let forward = toporient != ORIENT_CLOCK;
        let (tail, head) = (verts[i], verts[(i + 1) % n]);
        let fverts = if forward { [tail, head] } else { [head, tail] };
        let f = mesh.add_facet(&normal, offset, &fverts)?;
        mesh.set_facet_area(f, len);
        let status = mesh.facet_status_mut(f);
        status.set_simplicial(true);
        status.set_toporient(toporient);
        status.set_good(true);
        facets.push((f, forward));
        perimeter += len;
        area2 += a[0] * b[1] - b[0] * a[1];
    }
    for i in 0..n {
        let (f, forward) = facets[i];
        let next = facets[(i + 1) % n].0;
        let prev = facets[(i + n - 1) % n].0;
        let fneis = if forward { [next, prev] } else { [prev, next] };
        mesh.set_facet_neighbors(f, &fneis);
    }
    mesh.set_totals(perimeter, area2.abs() / 2.0);
    Ok(mesh)
}

/// Convex hull of the unit tetrahedron. Vertex slot `k` of facet `i` names
/// point `TET_SLOTS[i][k]`, and the neighbor across from that slot is the
/// facet with the same index, so one table drives both sets.
pub fn tetrahedron_hull_3d() -> Result<Mesh, Error> {
    const TET_SLOTS: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];
    let mut mesh = Mesh::new(3, 3);
    mesh.add_points(&[
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ])?;
    let mut verts = Vec::with_capacity(4);
    for i in 0..4 {
        verts.push(mesh.add_vertex(mesh.point_ref(i))?);
    }
    let r3 = 3.0f64.sqrt();
    let planes: [([f64; 3], f64, f64); 4] = [
        ([1.0 / r3, 1.0 / r3, 1.0 / r3], -1.0 / r3, r3 / 2.0),
        ([-1.0, 0.0, 0.0], 0.0, 0.5),
        ([0.0, -1.0, 0.0], 0.0, 0.5),
        ([0.0, 0.0, -1.0], 0.0, 0.5),
    ];
    let mut facets = Vec::with_capacity(4);
    for (slots, (normal, offset, area)) in TET_SLOTS.iter().zip(planes.iter()) {
        let fverts = [verts[slots[0]], verts[slots[1]], verts[slots[2]]];
        let f = mesh.add_facet(normal, *offset, &fverts)?;
        mesh.set_facet_area(f, *area);
        let status = mesh.facet_status_mut(f);
        status.set_simplicial(true);
        status.set_toporient(true);
        status.set_good(true);
        facets.push(f);
    }
    for (i, slots) in TET_SLOTS.iter().enumerate() {
        let fneis = [facets[slots[0]], facets[slots[1]], facets[slots[2]]];
        mesh.set_facet_neighbors(facets[i], &fneis);
    }
    mesh.set_totals(1.5 + r3 / 2.0, 1.0 / 6.0);
    Ok(mesh)
}

/// Convex hull of the unit cube with its quadrilateral facets left unmerged,
/// so none of them are simplicial.
///
/// ```text
///       7-----------6
///      /|          /|
///     / |         / |
///    4-----------5  |
///    |  |        |  |
///    |  3--------|--2
///    | /         | /
///    |/          |/
///    0-----------1
/// ```
pub fn cube_hull_3d() -> Result<Mesh, Error> {
    const CUBE_FACES: [[usize; 4]; 6] = [
        [0, 3, 2, 1],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
        [4, 5, 6, 7],
    ];
    const CUBE_NEIS: [[usize; 4]; 6] = [
        [1, 2, 3, 4],
        [0, 2, 5, 4],
        [0, 3, 5, 1],
        [0, 4, 5, 2],
        [0, 1, 5, 3],
        [1, 2, 3, 4],
    ];
    let planes: [([f64; 3], f64); 6] = [
        ([0.0, 0.0, -1.0], 0.0),
        ([0.0, -1.0, 0.0], 0.0),
        ([1.0, 0.0, 0.0], -1.0),
        ([0.0, 1.0, 0.0], -1.0),
        ([-1.0, 0.0, 0.0], 0.0),
        ([0.0, 0.0, 1.0], -1.0),
    ];
    let mut mesh = Mesh::new(3, 3);
    mesh.add_points(&[
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        1.0, 0.0, 1.0, //
        1.0, 1.0, 1.0, //
        0.0, 1.0, 1.0,
    ])?;
    let mut verts = Vec::with_capacity(8);
    for i in 0..8 {
        verts.push(mesh.add_vertex(mesh.point_ref(i))?);
    }
    let mut facets = Vec::with_capacity(6);
    for (slots, (normal, offset)) in CUBE_FACES.iter().zip(planes.iter()) {
        let fverts = [
            verts[slots[0]],
            verts[slots[1]],
            verts[slots[2]],
            verts[slots[3]],
        ];
        let f = mesh.add_facet(normal, *offset, &fverts)?;
        mesh.set_facet_area(f, 1.0);
        let status = mesh.facet_status_mut(f);
        status.set_toporient(true);
        status.set_good(true);
        facets.push(f);
    }
    for (i, slots) in CUBE_NEIS.iter().enumerate() {
        let fneis = [
            facets[slots[0]],
            facets[slots[1]],
            facets[slots[2]],
            facets[slots[3]],
        ];
        mesh.set_facet_neighbors(facets[i], &fneis);
    }
    mesh.set_totals(6.0, 1.0);
    Ok(mesh)
}

/// Delaunay triangulation of the unit square's corners and its center, as the
/// engine leaves it after lifting the sites onto the paraboloid. Four lower
/// triangles fan around the center and two upper facets split the lifted
/// square along its (0, 2) diagonal.
///
/// ```text
///    3-------2
///    | \ T2/ |
///    |T3 \ /T1|
///    |   4   |
///    | / T0\ |
///    0-------1
/// ```
pub fn square_delaunay_2d() -> Result<Mesh, Error> {
    wheel_delaunay(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
}

/// Delaunay triangulation of a regular polygon's corners and centroid. The
/// mesh grows linearly with `n`, which makes it the benchmark workload.
pub fn wheel_delaunay_2d(n: usize) -> Result<Mesh, Error> {
    assert!(n >= 3, "a polygon needs at least three corners");
    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let theta = std::f64::consts::TAU * i as f64 / n as f64;
        corners.push([theta.cos(), theta.sin()]);
    }
    wheel_delaunay(&corners)
}

/// Triangulation of a convex polygon's corners plus their centroid. Sites are
/// lifted onto the paraboloid; lower triangle `i` joins corners `i` and
/// `i + 1` to the centroid, and the lifted upper hull is triangulated as a fan
/// from corner zero. The corners must be concyclic so that upper hull is one
/// flat polygon.
fn wheel_delaunay(corners: &[[f64; 2]]) -> Result<Mesh, Error> {
    let n = corners.len();
    debug_assert!(n >= 3);
    let mut center = [0.0, 0.0];
    for c in corners {
        center[0] += c[0];
        center[1] += c[1];
    }
    center[0] /= n as f64;
    center[1] /= n as f64;
    let mut coords = Vec::with_capacity(3 * (n + 1));
    for c in corners.iter().chain(std::iter::once(&center)) {
        coords.extend_from_slice(&[c[0], c[1], c[0] * c[0] + c[1] * c[1]]);
    }
    let mut mesh = Mesh::new(3, 2);
    mesh.add_points(&coords)?;
    let mut verts = Vec::with_capacity(n + 1);
    for i in 0..=n {
        verts.push(mesh.add_vertex(mesh.point_ref(i))?);
    }
    let mut facets = Vec::with_capacity(2 * n - 2);
    for i in 0..n {
        let slots = [i, (i + 1) % n, n];
        let (normal, offset) = lifted_plane(&coords, slots, false);
        let fverts = [verts[slots[0]], verts[slots[1]], verts[slots[2]]];
        let f = mesh.add_facet(&normal, offset, &fverts)?;
        let status = mesh.facet_status_mut(f);
        status.set_simplicial(true);
        status.set_toporient(true);
        status.set_good(true);
        facets.push(f);
    }
    for j in 0..n - 2 {
        let slots = [0, j + 1, j + 2];
        let (normal, offset) = lifted_plane(&coords, slots, true);
        let fverts = [verts[slots[0]], verts[slots[1]], verts[slots[2]]];
        let f = mesh.add_facet(&normal, offset, &fverts)?;
        let status = mesh.facet_status_mut(f);
        status.set_simplicial(true);
        status.set_toporient(true);
        status.set_upper_delaunay(true);
        facets.push(f);
    }
    // Lower triangle i: the facets across from its two corner slots are its
    // ring neighbors, and across from the centroid slot lies the upper facet
    // covering the rim edge (i, i + 1).
    for i in 0..n {
        let rim = if i == 0 {
            0
        } else if i <= n - 2 {
            i - 1
        } else {
            n - 3
        };
        let fneis = [
            facets[(i + 1) % n],
            facets[(i + n - 1) % n],
            facets[n + rim],
        ];
        mesh.set_facet_neighbors(facets[i], &fneis);
    }
    // Upper fan facet j covers corners (0, j + 1, j + 2). Across from corner
    // zero lies lower triangle j + 1; across from the other two slots lie the
    // adjacent fan facets, except at the fan's two ends where the rim edges
    // (n - 1, 0) and (0, 1) belong to lower triangles.
    for j in 0..n - 2 {
        let across0 = facets[j + 1];
        let across1 = if j + 1 <= n - 3 {
            facets[n + j + 1]
        } else {
            facets[n - 1]
        };
        let across2 = if j >= 1 { facets[n + j - 1] } else { facets[0] };
        mesh.set_facet_neighbors(facets[n + j], &[across0, across1, across2]);
    }
    Ok(mesh)
}

/// Hyperplane through three lifted sites, oriented downward for lower hull
/// facets and upward for upper ones.
fn lifted_plane(coords: &[f64], slots: [usize; 3], upward: bool) -> ([f64; 3], f64) {
    let q = |i: usize| [coords[3 * i], coords[3 * i + 1], coords[3 * i + 2]];
    let (q0, q1, q2) = (q(slots[0]), q(slots[1]), q(slots[2]));
    let u = [q1[0] - q0[0], q1[1] - q0[1], q1[2] - q0[2]];
    let v = [q2[0] - q0[0], q2[1] - q0[1], q2[2] - q0[2]];
    let mut normal = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    if (normal[2] > 0.0) != upward {
        for c in &mut normal {
            *c = -*c;
        }
    }
    let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    debug_assert!(len > 0.0);
    for c in &mut normal {
        *c /= len;
    }
    let offset = -(normal[0] * q0[0] + normal[1] * q0[1] + normal[2] * q0[2]);
    (normal, offset)
}

#[cfg(test)]
mod test {
    use super::{
        cube_hull_3d, ngon_hull_2d, square_delaunay_2d, square_hull_2d, tetrahedron_hull_3d,
        wheel_delaunay_2d,
    };
    use crate::{macros::assert_f64_eq, mesh::Mesh};

    fn assert_mutual_neighbors(mesh: &Mesh) {
        for f in mesh.facets() {
            for g in mesh.facet_neighbors(f).iter() {
                assert!(
                    mesh.facet_neighbors(g).contains(f),
                    "{} lists {} but not the other way around",
                    f,
                    g
                );
            }
        }
    }

    fn assert_opposite_pairing(mesh: &Mesh) {
        for f in mesh.facets() {
            let verts = mesh.facet_vertices(f).to_vec().unwrap();
            let neis = mesh.facet_neighbors(f).to_vec().unwrap();
            assert_eq!(verts.len(), neis.len());
            for (v, g) in verts.iter().zip(neis.iter()) {
                assert!(
                    !mesh.facet_vertices(*g).contains(*v),
                    "{} should be across from {}",
                    g,
                    v
                );
            }
        }
    }

    #[test]
    fn t_square_hull() {
        let mesh = square_hull_2d().expect("cannot build square hull");
        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_facets(), 4);
        assert_f64_eq!(mesh.total_area(), 4.0, 1e-15);
        assert_f64_eq!(mesh.total_volume(), 1.0, 1e-15);
        for f in mesh.facets() {
            assert!(mesh.facet_status(f).simplicial());
            assert_eq!(mesh.facet_vertices(f).to_vec().unwrap().len(), 2);
            assert_f64_eq!(mesh.facet_area(f), 1.0, 1e-15);
        }
        assert_mutual_neighbors(&mesh);
        assert_opposite_pairing(&mesh);
    }

    #[test]
    fn t_ngon_hull() {
        let mesh = ngon_hull_2d(7).expect("cannot build polygon hull");
        assert_eq!(mesh.num_facets(), 7);
        let side = 2.0 * (std::f64::consts::PI / 7.0).sin();
        assert_f64_eq!(mesh.total_area(), 7.0 * side, 1e-12);
        assert_mutual_neighbors(&mesh);
        assert_opposite_pairing(&mesh);
    }

    #[test]
    fn t_tetrahedron_hull() {
        let mesh = tetrahedron_hull_3d().expect("cannot build tetrahedron");
        assert_eq!(mesh.num_facets(), 4);
        assert_f64_eq!(mesh.total_volume(), 1.0 / 6.0, 1e-15);
        assert_mutual_neighbors(&mesh);
        assert_opposite_pairing(&mesh);
        // Every facet's plane touches its own vertices and keeps the others
        // inside.
        for f in mesh.facets() {
            let normal = mesh.facet_normal(f);
            for v in mesh.vertices() {
                let coords = mesh.point_coords(mesh.vertex_point(v)).unwrap();
                let dist: f64 = normal.iter().zip(coords).map(|(n, c)| n * c).sum::<f64>()
                    + mesh.facet_offset(f);
                if mesh.facet_vertices(f).contains(v) {
                    assert_f64_eq!(dist, 0.0, 1e-15);
                } else {
                    assert!(dist < 0.0);
                }
            }
        }
    }

    #[test]
    fn t_cube_hull_not_simplicial() {
        use arrayvec::ArrayVec;
        let mesh = cube_hull_3d().expect("cannot build cube");
        assert_eq!(mesh.num_facets(), 6);
        assert_mutual_neighbors(&mesh);
        for f in mesh.facets() {
            assert!(!mesh.facet_status(f).simplicial());
            let vs = mesh.facet_vertices(f).iter().collect::<ArrayVec<_, 4>>();
            assert_eq!(vs.len(), 4);
        }
    }

    #[test]
    fn t_square_delaunay() {
        let mesh = square_delaunay_2d().expect("cannot build triangulation");
        assert_eq!(mesh.num_points(), 5);
        assert_eq!(mesh.points().len(), 15);
        assert_eq!(mesh.num_facets(), 6);
        let uppers: Vec<_> = mesh
            .facets()
            .filter(|f| mesh.facet_status(*f).upper_delaunay())
            .collect();
        assert_eq!(uppers.len(), 2);
        assert_mutual_neighbors(&mesh);
        assert_opposite_pairing(&mesh);
        // No lifted site lies on the outer side of any facet's plane.
        for f in mesh.facets() {
            let normal = mesh.facet_normal(f);
            for i in 0..mesh.num_points() {
                let coords = mesh.point_coords(mesh.point_ref(i)).unwrap();
                let dist: f64 = normal.iter().zip(coords).map(|(n, c)| n * c).sum::<f64>()
                    + mesh.facet_offset(f);
                assert!(dist < 1e-12, "site {} is outside {}", i, f);
            }
        }
    }

    #[test]
    fn t_wheel_delaunay_scales() {
        let mesh = wheel_delaunay_2d(16).expect("cannot build triangulation");
        assert_eq!(mesh.num_vertices(), 17);
        assert_eq!(mesh.num_facets(), 2 * 16 - 2);
        assert_mutual_neighbors(&mesh);
        assert_opposite_pairing(&mesh);
    }
}
