use nalgebra::{DMatrix, DVector};

use crate::{
    error::Error,
    mesh::{FacetH, Handle, Mesh, PointRef, VertexH},
};

/// The engine's ordinal of a point, recovered from its coordinate offset.
pub fn point_id(mesh: &Mesh, p: PointRef) -> Result<i32, Error> {
    mesh.point_coords(p)?;
    Ok((p.index() as usize / mesh.hull_dim()) as i32)
}

fn sqdist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// The vertex of `f` closest to the point at `p`.
///
/// Distances are measured in the input dimension, so for a lifted Delaunay
/// mesh the paraboloid coordinate is ignored. Ties go to the earlier slot.
pub fn nearest_vertex(mesh: &Mesh, f: FacetH, p: PointRef) -> Result<VertexH, Error> {
    let coords = mesh.point_coords(p)?;
    let dim = mesh.input_dim();
    let mut best: Option<(VertexH, f64)> = None;
    for v in mesh.facet_vertices(f).to_vec()? {
        let vcoords = mesh.point_coords(mesh.vertex_point(v))?;
        let dist = sqdist(&coords[..dim], &vcoords[..dim]);
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((v, dist)),
        }
    }
    best.map(|(v, _)| v).ok_or(Error::EmptyFacet(f))
}

/// The Voronoi center of a Delaunay facet: the point equidistant from its
/// sites, computed in the input dimension.
///
/// The first `input_dim + 1` vertices determine the center. A merged facet
/// carries more vertices, but they are co-spherical by construction so any
/// such subset gives the same answer.
pub fn facet_center(mesh: &Mesh, f: FacetH) -> Result<Vec<f64>, Error> {
    let dim = mesh.input_dim();
    let verts = mesh.facet_vertices(f).to_vec()?;
    if verts.len() < dim + 1 {
        return Err(Error::DegenerateFacet(f));
    }
    let p0 = mesh.point_coords(mesh.vertex_point(verts[0]))?;
    // Equidistance from site 0 and site i gives one linear equation per
    // remaining site: 2 (p_i - p_0) . x = |p_i|^2 - |p_0|^2.
    let mut a = DMatrix::<f64>::zeros(dim, dim);
    let mut b = DVector::<f64>::zeros(dim);
    for i in 0..dim {
        let pi = mesh.point_coords(mesh.vertex_point(verts[i + 1]))?;
        let mut rhs = 0.0;
        for j in 0..dim {
            a[(i, j)] = 2.0 * (pi[j] - p0[j]);
            rhs += pi[j] * pi[j] - p0[j] * p0[j];
        }
        b[i] = rhs;
    }
    let center = a.lu().solve(&b).ok_or(Error::DegenerateFacet(f))?;
    Ok(center.iter().copied().collect())
}

/// Rebuild every vertex's neighbor facet set by scanning the facet list.
///
/// Facets are recorded in list order, which later passes rely on for
/// deterministic output. The engine runs this before any vertex centric
/// traversal; callers here do the same.
pub fn compute_vertex_neighbors(mesh: &mut Mesh) -> Result<(), Error> {
    let mut stars: Vec<Vec<FacetH>> = vec![Vec::new(); mesh.num_vertices() + 1];
    let facets: Vec<FacetH> = mesh.facets().collect();
    for f in facets {
        for v in mesh.facet_vertices(f).to_vec()? {
            if !mesh.is_valid_vertex(v) {
                return Err(Error::InvalidVertexHandle(v));
            }
            stars[v.index() as usize].push(f);
        }
    }
    for (slot, star) in stars.iter().enumerate().skip(1) {
        mesh.set_vertex_neighbors((slot as u32).into(), star);
    }
    Ok(())
}

/// Reorder a vertex's neighbor facet set the way the engine does before
/// region assembly.
///
/// In a 3 dimensional hull the facets around a vertex form a cycle, so they
/// are chained into rotational order by repeated adjacency lookups. In
/// higher dimensions no single rotational order exists and the set is
/// sorted by facet visit mark instead. Dimension 2 needs no reordering.
///
/// The rewrite replaces the set's contents; any previously read elements of
/// the set must be re-acquired afterwards.
pub fn order_vertex_neighbors(mesh: &mut Mesh, v: VertexH) -> Result<(), Error> {
    match mesh.hull_dim() {
        3 => chain_vertex_star(mesh, v),
        d if d >= 4 => {
            let mut star = mesh.vertex_neighbors(v).to_vec()?;
            star.sort_by_key(|f| mesh.facet_visit(*f));
            mesh.set_vertex_neighbors(v, &star);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn chain_vertex_star(mesh: &mut Mesh, v: VertexH) -> Result<(), Error> {
    let star = mesh.vertex_neighbors(v).to_vec()?;
    if star.len() < 3 {
        return Ok(());
    }
    let mut ordered = Vec::with_capacity(star.len());
    let mut used = vec![false; star.len()];
    let mut cur = star[0];
    ordered.push(cur);
    used[0] = true;
    for _ in 1..star.len() {
        let next = star
            .iter()
            .enumerate()
            .find(|(i, g)| !used[*i] && mesh.facet_neighbors(cur).contains(**g));
        match next {
            Some((i, g)) => {
                used[i] = true;
                cur = *g;
                ordered.push(cur);
            }
            None => return Err(Error::UnchainableVertexStar(v)),
        }
    }
    mesh.set_vertex_neighbors(v, &ordered);
    Ok(())
}

/// Assign each facet a dense visit mark for the ridge walk: facets on the
/// unbounded envelope side get 0, the point at infinity, and the remaining
/// facets get 1, 2, 3, .. in list order. Those marks are the Voronoi vertex
/// ids. Returns one past the largest id handed out.
pub fn mark_voronoi(mesh: &mut Mesh) -> u32 {
    mesh.raise_visit_epoch(mesh.num_facets() as u32);
    let facets: Vec<FacetH> = mesh.facets().collect();
    let mut numcenters: u32 = 1;
    for f in facets {
        if mesh.facet_status(f).upper_delaunay() {
            mesh.set_facet_visit(f, 0);
        } else {
            mesh.set_facet_visit(f, numcenters);
            numcenters += 1;
        }
    }
    numcenters
}

/**
 * Callback contract of the ridge walk.
 *
 * The walk owns the traversal and its marker state; the visitor only
 * observes. Failures on the visitor side must be recorded on the visitor
 * itself and re-raised after the walk returns, never thrown from inside the
 * callback.
 */
pub trait RidgeVisitor {
    /// Called once per Voronoi ridge. `a` and `b` are the two sites the
    /// ridge separates, `centers` the Voronoi vertex ids bounding it in the
    /// order of `b`'s neighbor set, with 0 for the point at infinity
    /// appearing at most once. `unbounded` is set when 0 is present.
    fn visit(&mut self, mesh: &Mesh, a: VertexH, b: VertexH, centers: &[u32], unbounded: bool);
}

/// Visit every Voronoi ridge incident on `site` whose opposite site has not
/// been processed yet.
///
/// A companion site is found through the neighbor facets of `site` and
/// deduplicated with the vertex visit epoch; sites already processed are
/// skipped via their seen flag. The pair forms a ridge when the facets they
/// share, counting all unbounded ones as a single point at infinity, number
/// at least `hull_dim - 1`.
pub fn each_voronoi_ridge<V>(mesh: &mut Mesh, visitor: &mut V, site: VertexH) -> Result<(), Error>
where
    V: RidgeVisitor,
{
    let epoch = mesh.bump_vertex_epoch();
    mesh.vertex_status_mut(site).set_seen(true);
    let star = mesh.vertex_neighbors(site).to_vec()?;
    let mut centers: Vec<u32> = Vec::new();
    for f in &star {
        for w in mesh.facet_vertices(*f).to_vec()? {
            if mesh.vertex_status(w).seen() || mesh.vertex_visit(w) == epoch {
                continue;
            }
            mesh.set_vertex_visit(w, epoch);
            centers.clear();
            let mut bounded = 0usize;
            let mut has_inf = false;
            for g in mesh.vertex_neighbors(w).to_vec()? {
                if star.contains(&g) {
                    let id = mesh.facet_visit(g);
                    if id > 0 {
                        centers.push(id);
                        bounded += 1;
                    } else if !has_inf {
                        centers.push(0);
                        has_inf = true;
                    }
                }
            }
            if bounded + (has_inf as usize) >= mesh.hull_dim() - 1 {
                visitor.visit(mesh, site, w, &centers, has_inf);
            }
        }
    }
    Ok(())
}

/// Run the full ridge walk: neighbor sets rebuilt, facets marked, all seen
/// flags cleared, then one `each_voronoi_ridge` pass per vertex in list
/// order. Returns the `mark_voronoi` count.
pub fn each_voronoi_ridge_all<V>(mesh: &mut Mesh, visitor: &mut V) -> Result<u32, Error>
where
    V: RidgeVisitor,
{
    compute_vertex_neighbors(mesh)?;
    let numcenters = mark_voronoi(mesh);
    let verts: Vec<VertexH> = mesh.vertices().collect();
    for v in &verts {
        mesh.vertex_status_mut(*v).set_seen(false);
    }
    for v in verts {
        each_voronoi_ridge(mesh, visitor, v)?;
    }
    Ok(numcenters)
}

/// The rescale the engine applied to the lifted paraboloid coordinate,
/// returned as a `(scale, shift)` pair for callers inverting the lift. The
/// identity pair when no rescale happened.
pub fn paraboloid_scale_shift(mesh: &Mesh) -> (f64, f64) {
    if mesh.scale_last() {
        let (low, high, newhigh) = mesh.lift_bounds();
        let scale = newhigh / (high - low);
        (scale, -low * scale)
    } else {
        (1.0, 0.0)
    }
}
