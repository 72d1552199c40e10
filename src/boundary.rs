use crate::{
    buffer::GrowBuf,
    error::Error,
    mesh::{Handle, Mesh},
    queries::point_id,
    status::ORIENT_CLOCK,
};

/// Walk the boundary of a 2 dimensional hull and return the 1 based ids of
/// its extreme points in rotational order.
///
/// Each edge facet stores its two endpoints and two neighbors so that one
/// fixed slot of each, picked by the facet's top-orientation flag, points
/// forward along the ring. The walk starts at the head of the facet list,
/// emits every endpoint the first time it appears, and stops when the ring
/// comes back to the starting facet. A ring that rejoins itself anywhere
/// else, or that runs into the sentinel, is reported as broken instead of
/// returning a partial boundary.
pub fn hull_boundary_2d(mesh: &mut Mesh) -> Result<Vec<i32>, Error> {
    if mesh.hull_dim() != 2 {
        return Err(Error::DimensionMismatch(2, mesh.hull_dim()));
    }
    let start = mesh.facet_head();
    if start.is_sentinel() {
        return Ok(Vec::new());
    }
    let epoch = mesh.bump_visit_epoch();
    let vepoch = mesh.bump_vertex_epoch();
    let mut out = GrowBuf::new();
    let mut f = start;
    loop {
        if mesh.facet_visit(f) == epoch {
            if f == start {
                break;
            }
            return Err(Error::BrokenBoundaryRing(f));
        }
        mesh.set_facet_visit(f, epoch);
        let forward = mesh.facet_status(f).toporient() != ORIENT_CLOCK;
        let verts = mesh.facet_vertices(f);
        let (a, b) = if forward {
            (verts.at(1)?, verts.at(2)?)
        } else {
            (verts.at(2)?, verts.at(1)?)
        };
        let next = if forward {
            mesh.facet_neighbors(f).at(1)?
        } else {
            mesh.facet_neighbors(f).at(2)?
        };
        for v in [a, b] {
            if mesh.vertex_visit(v) != vepoch {
                mesh.set_vertex_visit(v, vepoch);
                out.push(point_id(mesh, mesh.vertex_point(v))? + 1)?;
            }
        }
        if next.is_sentinel() {
            return Err(Error::BrokenBoundaryRing(f));
        }
        f = next;
    }
    Ok(out.into_vec())
}
