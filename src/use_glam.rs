/*!
This is an optional module that is enabled by the `use_glam` feature. It
converts between [`glam`](https://docs.rs/glam/latest/glam/) vectors and the
flat coordinate buffers this crate reads and writes.
*/

use crate::{error::Error, voronoi::VoronoiDiagram};

/// Packs 2d points into a flat coordinate buffer, two entries per point.
pub fn flatten_dvec2(points: &[glam::DVec2]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Packs 3d points into a flat coordinate buffer, three entries per point.
pub fn flatten_dvec3(points: &[glam::DVec3]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Lifts 2d sites onto the paraboloid, producing three entries per point
/// with the squared norm in the last slot. This is the layout a planar
/// triangulation snapshot stores its sites in.
pub fn lift_dvec2(points: &[glam::DVec2]) -> Vec<f64> {
    points
        .iter()
        .flat_map(|p| [p.x, p.y, p.length_squared()])
        .collect()
}

/// Lifts 3d sites onto the paraboloid, producing four entries per point.
pub fn lift_dvec3(points: &[glam::DVec3]) -> Vec<f64> {
    points
        .iter()
        .flat_map(|p| [p.x, p.y, p.z, p.length_squared()])
        .collect()
}

/// Reads the bounded Voronoi vertices of a planar diagram back out as 2d
/// vectors.
pub fn voronoi_vertices_dvec2(diagram: &VoronoiDiagram) -> Result<Vec<glam::DVec2>, Error> {
    if diagram.vertices.ncols() != 2 {
        return Err(Error::DimensionMismatch(2, diagram.vertices.ncols()));
    }
    Ok(diagram
        .vertices
        .row_iter()
        .map(|row| glam::dvec2(row[0], row[1]))
        .collect())
}

/// Reads the bounded Voronoi vertices of a 3d diagram back out as 3d vectors.
pub fn voronoi_vertices_dvec3(diagram: &VoronoiDiagram) -> Result<Vec<glam::DVec3>, Error> {
    if diagram.vertices.ncols() != 3 {
        return Err(Error::DimensionMismatch(3, diagram.vertices.ncols()));
    }
    Ok(diagram
        .vertices
        .row_iter()
        .map(|row| glam::dvec3(row[0], row[1], row[2]))
        .collect())
}
