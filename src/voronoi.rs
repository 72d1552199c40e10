use nalgebra::DMatrix;

use crate::{
    buffer::{GrowBuf, MatBuf},
    error::Error,
    mesh::{Mesh, VertexH},
    queries::{
        RidgeVisitor, each_voronoi_ridge_all, facet_center, nearest_vertex,
        order_vertex_neighbors, point_id,
    },
};

/**
 * A Voronoi diagram read off a lifted Delaunay mesh.
 *
 * Voronoi vertex ids are 1 based; id 0 stands for the point at infinity and
 * appears at most once per ridge or region. Row `k - 1` of `vertices` holds
 * the coordinates of Voronoi vertex `k`. Site references are 1 based input
 * point ids, and `point_region` holds 1 based positions into `regions`, with
 * -1 for points that never reached a region.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiDiagram {
    /// Coordinates of the bounded Voronoi vertices, `input_dim` per row.
    pub vertices: DMatrix<f64>,
    /// The two sites each ridge separates.
    pub ridge_points: Vec<[i32; 2]>,
    /// The Voronoi vertices bounding each ridge.
    pub ridge_vertices: Vec<Vec<i32>>,
    /// The Voronoi vertices around each region, in rotational order for
    /// planar input. A region reduced to the point at infinity alone comes
    /// out empty.
    pub regions: Vec<Vec<i32>>,
    /// For each input point, where its region sits in `regions`.
    pub point_region: Vec<i32>,
}

/// Collects ridges as the walk emits them. Failures are recorded on the
/// first occurrence and silence the rest of the walk; the caller re-raises
/// them once the traversal has unwound.
struct RidgeAccumulator {
    ridge_points: GrowBuf<[i32; 2]>,
    ridge_vertices: GrowBuf<Vec<i32>>,
    error: Option<Error>,
}

impl RidgeAccumulator {
    fn new() -> Self {
        RidgeAccumulator {
            ridge_points: GrowBuf::new(),
            ridge_vertices: GrowBuf::new(),
            error: None,
        }
    }

    fn record(
        &mut self,
        mesh: &Mesh,
        a: VertexH,
        b: VertexH,
        centers: &[u32],
    ) -> Result<(), Error> {
        let pa = point_id(mesh, mesh.vertex_point(a))? + 1;
        let pb = point_id(mesh, mesh.vertex_point(b))? + 1;
        let mut ids = Vec::new();
        ids.try_reserve_exact(centers.len())
            .map_err(|_| Error::ResizeFailure(centers.len()))?;
        ids.extend(centers.iter().map(|c| *c as i32));
        self.ridge_points.push([pa, pb])?;
        self.ridge_vertices.push(ids)?;
        Ok(())
    }
}

impl RidgeVisitor for RidgeAccumulator {
    fn visit(&mut self, mesh: &Mesh, a: VertexH, b: VertexH, centers: &[u32], _unbounded: bool) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.record(mesh, a, b, centers) {
            self.error = Some(e);
        }
    }
}

/// Assemble the Voronoi diagram of the mesh's sites.
///
/// `num_points` is the caller's input point count. The engine can append a
/// synthetic site of its own, which is excluded from the region tables by
/// this bound.
///
/// Runs the ridge walk, then builds one region per site from its rotationally
/// ordered neighbor facets, then computes the Voronoi vertex coordinates as
/// facet centers. Input points the engine shelved as coplanar inherit the
/// region of the nearest vertex of the facet they rest on.
pub fn voronoi_diagram(mesh: &mut Mesh, num_points: usize) -> Result<VoronoiDiagram, Error> {
    let mut acc = RidgeAccumulator::new();
    each_voronoi_ridge_all(mesh, &mut acc)?;
    if let Some(e) = acc.error.take() {
        return Err(e);
    }
    let mut point_region = Vec::new();
    point_region
        .try_reserve_exact(num_points)
        .map_err(|_| Error::ResizeFailure(num_points))?;
    point_region.resize(num_points, -1);
    let mut regions: GrowBuf<Vec<i32>> = GrowBuf::with_capacity(num_points)?;
    let verts: Vec<VertexH> = mesh.vertices().collect();
    for v in verts {
        order_vertex_neighbors(mesh, v)?;
        let pid = point_id(mesh, mesh.vertex_point(v))? as usize;
        if pid >= num_points {
            continue;
        }
        let star = mesh.vertex_neighbors(v).to_vec()?;
        let mut region = Vec::new();
        region
            .try_reserve_exact(star.len())
            .map_err(|_| Error::ResizeFailure(star.len()))?;
        let mut has_inf = false;
        for g in star {
            let id = mesh.facet_visit(g);
            if id == 0 {
                if has_inf {
                    continue;
                }
                has_inf = true;
            }
            region.push(id as i32);
        }
        if region == [0] {
            region.clear();
        }
        regions.push(region)?;
        point_region[pid] = regions.len() as i32;
    }
    let mut vertices = MatBuf::<f64>::new(mesh.input_dim());
    for f in mesh.facets() {
        if mesh.facet_visit(f) == 0 {
            continue;
        }
        debug_assert_eq!(mesh.facet_visit(f) as usize, vertices.nrows() + 1);
        let center = facet_center(mesh, f)?;
        vertices.push_row(&center)?;
        for p in mesh.facet_coplanar(f).to_vec()? {
            let near = nearest_vertex(mesh, f, p)?;
            let i = point_id(mesh, p)? as usize;
            let j = point_id(mesh, mesh.vertex_point(near))? as usize;
            if i < num_points && j < num_points {
                point_region[i] = point_region[j];
            }
        }
    }
    Ok(VoronoiDiagram {
        vertices: vertices.into_matrix(),
        ridge_points: acc.ridge_points.into_vec(),
        ridge_vertices: acc.ridge_vertices.into_vec(),
        regions: regions.into_vec(),
        point_region,
    })
}
