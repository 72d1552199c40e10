use nalgebra::DMatrix;

use crate::{
    buffer::{GrowBuf, MatBuf},
    error::Error,
    idmap::IdMap,
    mesh::{FacetH, Mesh},
    queries::{nearest_vertex, point_id},
    status::ORIENT_CLOCK,
};

/**
 * Simplex tables of a hull or triangulation, one row per kept facet in facet
 * list order.
 *
 * Point references throughout are 1 based input point ids. Neighbor entries
 * are 1 based row numbers into these same tables, translated from engine
 * facet ids, with -1 where the facet across a ridge was filtered out.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexArrays {
    /// The vertices of each facet, `hull_dim` point ids per row.
    pub simplices: DMatrix<i32>,
    /// The row number of the facet across from each vertex slot.
    pub neighbors: DMatrix<i32>,
    /// Facet hyperplanes, normal coordinates followed by the offset.
    pub equations: DMatrix<f64>,
    /// One row per coplanar point: its id, the row of the facet it rests on,
    /// and the id of that facet's nearest vertex.
    pub coplanar: DMatrix<i32>,
    /// Which kept facets the engine marked good.
    pub good: Vec<bool>,
}

/// Extract the simplex tables of a convex hull, keeping every facet.
pub fn hull_simplices(mesh: &Mesh) -> Result<SimplexArrays, Error> {
    simplex_arrays(mesh, None)
}

/// Extract the simplex tables of a Delaunay triangulation.
///
/// Facets on the upper side of the lifted hull are kept when `keep_upper` is
/// set and dropped otherwise; dropping is the common case, keeping is the
/// furthest site triangulation. Neighbor entries pointing at dropped facets
/// come out as -1.
pub fn delaunay_simplices(mesh: &Mesh, keep_upper: bool) -> Result<SimplexArrays, Error> {
    simplex_arrays(mesh, Some(keep_upper))
}

/// In a 3 dimensional lifted hull, facets flagged with the clockwise
/// orientation list their sites clockwise when projected back down. Swapping
/// the first two vertex and neighbor slots restores the counterclockwise
/// order callers expect. Plain hulls and other dimensions are left alone.
fn needs_orient_swap(mesh: &Mesh, delaunay: bool, f: FacetH) -> bool {
    delaunay && mesh.hull_dim() == 3 && mesh.facet_status(f).toporient() == ORIENT_CLOCK
}

fn simplex_arrays(mesh: &Mesh, delaunay: Option<bool>) -> Result<SimplexArrays, Error> {
    let dim = mesh.hull_dim();
    let kept = |f: FacetH| match delaunay {
        Some(keep_upper) => mesh.facet_status(f).upper_delaunay() == keep_upper,
        None => true,
    };
    let mut id_map = IdMap::unmapped(mesh.max_facet_id())?;
    let mut rows = 0i32;
    for f in mesh.facets().filter(|f| kept(*f)) {
        rows += 1;
        id_map.insert(mesh.facet_id(f), rows);
    }
    let mut simplices = MatBuf::<i32>::new(dim);
    let mut neighbors = MatBuf::<i32>::new(dim);
    let mut equations = MatBuf::<f64>::new(dim + 1);
    let mut coplanar = MatBuf::<i32>::new(3);
    let mut good = GrowBuf::new();
    let mut vrow = Vec::with_capacity(dim);
    let mut nrow = Vec::with_capacity(dim);
    let mut erow = Vec::with_capacity(dim + 1);
    for f in mesh.facets().filter(|f| kept(*f)) {
        let verts = mesh.facet_vertices(f).to_vec()?;
        let neis = mesh.facet_neighbors(f).to_vec()?;
        let status = mesh.facet_status(f);
        if !status.simplicial() || verts.len() != dim || neis.len() != dim {
            return Err(Error::NonSimplicialFacet(f));
        }
        vrow.clear();
        for v in &verts {
            vrow.push(point_id(mesh, mesh.vertex_point(*v))? + 1);
        }
        nrow.clear();
        for g in &neis {
            nrow.push(id_map.get(mesh.facet_id(*g)));
        }
        if needs_orient_swap(mesh, delaunay.is_some(), f) {
            vrow.swap(0, 1);
            nrow.swap(0, 1);
        }
        simplices.push_row(&vrow)?;
        neighbors.push_row(&nrow)?;
        erow.clear();
        erow.extend_from_slice(mesh.facet_normal(f));
        erow.push(mesh.facet_offset(f));
        equations.push_row(&erow)?;
        good.push(status.good())?;
        for p in mesh.facet_coplanar(f).to_vec()? {
            let v = nearest_vertex(mesh, f, p)?;
            coplanar.push_row(&[
                point_id(mesh, p)? + 1,
                id_map.get(mesh.facet_id(f)),
                point_id(mesh, mesh.vertex_point(v))? + 1,
            ])?;
        }
    }
    Ok(SimplexArrays {
        simplices: simplices.into_matrix(),
        neighbors: neighbors.into_matrix(),
        equations: equations.into_matrix(),
        coplanar: coplanar.into_matrix(),
        good: good.into_vec(),
    })
}

#[cfg(test)]
mod test {
    use nalgebra::DMatrix;

    use super::{delaunay_simplices, hull_simplices};
    use crate::{error::Error, macros::assert_f64_eq, mesh::Mesh, samples};

    #[test]
    fn t_tetrahedron_simplices() {
        let mesh = samples::tetrahedron_hull_3d().expect("cannot build tetrahedron");
        let arrays = hull_simplices(&mesh).unwrap();
        let expected = DMatrix::from_row_slice(4, 3, &[2, 3, 4, 1, 3, 4, 1, 2, 4, 1, 2, 3]);
        assert_eq!(arrays.simplices, expected);
        // The facet across from each vertex slot happens to sit at the row
        // named by that same slot, so the tables coincide.
        assert_eq!(arrays.neighbors, expected);
        assert_eq!(arrays.good, vec![true; 4]);
        assert_eq!(arrays.coplanar.nrows(), 0);
        let r3 = 3.0f64.sqrt();
        for j in 0..3 {
            assert_f64_eq!(arrays.equations[(0, j)], 1.0 / r3, 1e-15);
        }
        assert_f64_eq!(arrays.equations[(0, 3)], -1.0 / r3, 1e-15);
        assert_f64_eq!(arrays.equations[(1, 0)], -1.0, 1e-15);
        assert_f64_eq!(arrays.equations[(3, 3)], 0.0, 1e-15);
    }

    #[test]
    fn t_square_hull_simplices() {
        let mesh = samples::square_hull_2d().expect("cannot build square hull");
        let arrays = hull_simplices(&mesh).unwrap();
        assert_eq!(
            arrays.simplices,
            DMatrix::from_row_slice(4, 2, &[1, 2, 3, 2, 3, 4, 1, 4])
        );
        assert_eq!(
            arrays.neighbors,
            DMatrix::from_row_slice(4, 2, &[2, 4, 1, 3, 4, 2, 3, 1])
        );
    }

    #[test]
    fn t_delaunay_drops_upper_facets() {
        let mesh = samples::square_delaunay_2d().expect("cannot build triangulation");
        let arrays = delaunay_simplices(&mesh, false).unwrap();
        assert_eq!(
            arrays.simplices,
            DMatrix::from_row_slice(4, 3, &[1, 2, 5, 2, 3, 5, 3, 4, 5, 4, 1, 5])
        );
        // Ridges into the dropped upper side show up as -1.
        assert_eq!(
            arrays.neighbors,
            DMatrix::from_row_slice(4, 3, &[2, 4, -1, 3, 1, -1, 4, 2, -1, 1, 3, -1])
        );
        assert_eq!(arrays.good, vec![true; 4]);
        assert_eq!(arrays.equations.ncols(), 4);
    }

    #[test]
    fn t_furthest_site_keeps_the_other_side() {
        let mesh = samples::square_delaunay_2d().expect("cannot build triangulation");
        let arrays = delaunay_simplices(&mesh, true).unwrap();
        assert_eq!(
            arrays.simplices,
            DMatrix::from_row_slice(2, 3, &[1, 2, 3, 1, 3, 4])
        );
        assert_eq!(
            arrays.neighbors,
            DMatrix::from_row_slice(2, 3, &[-1, 2, -1, -1, -1, 1])
        );
        assert_eq!(arrays.good, vec![false, false]);
    }

    #[test]
    fn t_clockwise_facet_swapped_back() {
        let mut mesh = samples::square_delaunay_2d().expect("cannot build triangulation");
        let facets: Vec<_> = mesh.facets().collect();
        mesh.facet_status_mut(facets[0]).set_toporient(false);
        let arrays = delaunay_simplices(&mesh, false).unwrap();
        assert_eq!(arrays.simplices.row(0).iter().copied().collect::<Vec<_>>(), vec![2, 1, 5]);
        assert_eq!(arrays.neighbors.row(0).iter().copied().collect::<Vec<_>>(), vec![4, 2, -1]);
        // The other rows are untouched.
        assert_eq!(arrays.simplices.row(1).iter().copied().collect::<Vec<_>>(), vec![2, 3, 5]);
    }

    #[test]
    fn t_no_swap_for_plain_hulls() {
        let mut mesh = samples::tetrahedron_hull_3d().expect("cannot build tetrahedron");
        let facets: Vec<_> = mesh.facets().collect();
        mesh.facet_status_mut(facets[0]).set_toporient(false);
        let arrays = hull_simplices(&mesh).unwrap();
        assert_eq!(arrays.simplices.row(0).iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn t_non_simplicial_facet_rejected() {
        let mesh = samples::cube_hull_3d().expect("cannot build cube");
        assert!(matches!(
            hull_simplices(&mesh),
            Err(Error::NonSimplicialFacet(_))
        ));
    }

    #[test]
    fn t_coplanar_points_reported() {
        let mut mesh = samples::square_delaunay_2d().expect("cannot build triangulation");
        // Two extra sites the engine shelved as coplanar, one on the first
        // triangle and one on the third.
        mesh.add_points(&[0.9, 0.05, 0.8125, 0.7, 0.95, 1.3925]).unwrap();
        let facets: Vec<_> = mesh.facets().collect();
        mesh.push_coplanar(facets[0], mesh.point_ref(5)).unwrap();
        mesh.push_coplanar(facets[2], mesh.point_ref(6)).unwrap();
        let arrays = delaunay_simplices(&mesh, false).unwrap();
        assert_eq!(
            arrays.coplanar,
            DMatrix::from_row_slice(2, 3, &[6, 1, 2, 7, 3, 3])
        );
    }

    #[test]
    fn t_id_gaps_remap_to_compact_rows() {
        // A triangle ring whose second edge was created after the engine
        // discarded five ids, as merging does.
        let mut mesh = Mesh::new(2, 2);
        mesh.add_points(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        let mut verts = Vec::new();
        for i in 0..3 {
            verts.push(mesh.add_vertex(mesh.point_ref(i)).unwrap());
        }
        let r2 = 2.0f64.sqrt();
        let planes: [([f64; 2], f64); 3] = [
            ([0.0, -1.0], 0.0),
            ([1.0 / r2, 1.0 / r2], -1.0 / r2),
            ([-1.0, 0.0], 0.0),
        ];
        let mut facets = Vec::new();
        for (i, (normal, offset)) in planes.iter().enumerate() {
            if i == 1 {
                mesh.skip_facet_ids(5);
            }
            let fverts = [verts[i], verts[(i + 1) % 3]];
            let f = mesh.add_facet(normal, *offset, &fverts).unwrap();
            let status = mesh.facet_status_mut(f);
            status.set_simplicial(true);
            status.set_toporient(true);
            status.set_good(true);
            facets.push(f);
        }
        for i in 0..3 {
            let fneis = [facets[(i + 1) % 3], facets[(i + 2) % 3]];
            mesh.set_facet_neighbors(facets[i], &fneis);
        }
        assert_eq!(mesh.facet_id(facets[1]), 7);
        let arrays = hull_simplices(&mesh).unwrap();
        assert_eq!(
            arrays.simplices,
            DMatrix::from_row_slice(3, 2, &[1, 2, 2, 3, 3, 1])
        );
        assert_eq!(
            arrays.neighbors,
            DMatrix::from_row_slice(3, 2, &[2, 3, 3, 1, 1, 2])
        );
    }

    #[test]
    fn t_empty_mesh() {
        let mesh = Mesh::new(2, 2);
        let arrays = hull_simplices(&mesh).unwrap();
        assert_eq!(arrays.simplices.nrows(), 0);
        assert_eq!(arrays.simplices.ncols(), 2);
        assert_eq!(arrays.equations.ncols(), 3);
        assert_eq!(arrays.coplanar.ncols(), 3);
        assert!(arrays.good.is_empty());
    }
}
