use crate::{
    error::Error,
    mesh::{FacetH, Handle, Mesh, PointRef, VertexH},
    status::{FacetStatus, VertexStatus},
};

/// The foreign layout pins every handle to 32 bits, facet flag words to 32
/// bits, and vertex flag words to 8. A mismatch means the bindings drifted
/// from the engine's ABI.
fn check_handle_widths() -> Result<(), Error> {
    use std::mem::size_of;
    for width in [
        size_of::<FacetH>(),
        size_of::<VertexH>(),
        size_of::<PointRef>(),
        size_of::<FacetStatus>(),
    ] {
        if width != 4 {
            return Err(Error::StaleHandleWidth(width));
        }
    }
    let width = size_of::<VertexStatus>();
    if width != 1 {
        return Err(Error::StaleHandleWidth(width));
    }
    Ok(())
}

/// The facet list must reach the sentinel after visiting every live facet
/// exactly once. A cycle or a truncated list both come out as unterminated.
fn check_facet_list(mesh: &Mesh) -> Result<(), Error> {
    let mut count = 0usize;
    let mut f = mesh.facet_head();
    while !f.is_sentinel() {
        if !mesh.is_valid_facet(f) {
            return Err(Error::InvalidFacetHandle(f));
        }
        count += 1;
        if count > mesh.num_facets() {
            return Err(Error::UnterminatedFacetList);
        }
        f = mesh.next_facet(f);
    }
    if count != mesh.num_facets() {
        return Err(Error::UnterminatedFacetList);
    }
    Ok(())
}

fn check_vertex_list(mesh: &Mesh) -> Result<(), Error> {
    let mut count = 0usize;
    let mut v = mesh.vertex_head();
    while !v.is_sentinel() {
        if !mesh.is_valid_vertex(v) {
            return Err(Error::InvalidVertexHandle(v));
        }
        count += 1;
        if count > mesh.num_vertices() {
            return Err(Error::UnterminatedVertexList);
        }
        v = mesh.next_vertex(v);
    }
    if count != mesh.num_vertices() {
        return Err(Error::UnterminatedVertexList);
    }
    Ok(())
}

fn check_facets(mesh: &Mesh) -> Result<(), Error> {
    let dim = mesh.hull_dim();
    for f in mesh.facets() {
        if mesh.facet_id(f) >= mesh.max_facet_id() {
            return Err(Error::InvalidFacetHandle(f));
        }
        let width = mesh.facet_normal(f).len();
        if width != dim {
            return Err(Error::DimensionMismatch(dim, width));
        }
        let verts = mesh.facet_vertices(f).to_vec()?;
        let neis = mesh.facet_neighbors(f).to_vec()?;
        for v in &verts {
            if !mesh.is_valid_vertex(*v) {
                return Err(Error::InvalidVertexHandle(*v));
            }
        }
        for g in &neis {
            if !mesh.is_valid_facet(*g) {
                return Err(Error::InvalidFacetHandle(*g));
            }
        }
        for p in mesh.facet_coplanar(f).to_vec()? {
            mesh.point_coords(p)?;
        }
        if verts.is_empty() {
            return Err(Error::EmptyFacet(f));
        }
        if mesh.facet_status(f).simplicial() {
            if verts.len() != dim || neis.len() != dim {
                return Err(Error::NonSimplicialFacet(f));
            }
            // A simplicial facet's neighbor at each slot lies across from
            // the vertex at that slot, so the two must not meet.
            for (slot, (v, g)) in verts.iter().zip(neis.iter()).enumerate() {
                if mesh.facet_vertices(*g).contains(*v) {
                    return Err(Error::NeighborVertexOverlap(f, slot + 1));
                }
            }
        }
    }
    Ok(())
}

fn check_vertices(mesh: &Mesh) -> Result<(), Error> {
    for v in mesh.vertices() {
        if mesh.vertex_id(v) >= mesh.max_vertex_id() {
            return Err(Error::InvalidVertexHandle(v));
        }
        mesh.point_coords(mesh.vertex_point(v))?;
        for g in mesh.vertex_neighbors(v).to_vec()? {
            if !mesh.is_valid_facet(g) {
                return Err(Error::InvalidFacetHandle(g));
            }
        }
    }
    Ok(())
}

impl Mesh {
    /// Validate the snapshot before extraction.
    ///
    /// Walks both element lists, decodes every set, and verifies that all
    /// handles, ids, and point references resolve. Extraction routines assume
    /// a checked mesh; the few panics they could hit on a corrupt one are all
    /// caught here first.
    pub fn check(&self) -> Result<(), Error> {
        check_handle_widths()?;
        if self.hull_dim() < 2 {
            return Err(Error::DimensionMismatch(2, self.hull_dim()));
        }
        let len = self.points().len();
        if len % self.hull_dim() != 0 {
            return Err(Error::MisalignedPointBuffer(len));
        }
        check_facet_list(self)?;
        check_vertex_list(self)?;
        check_facets(self)?;
        check_vertices(self)?;
        Ok(())
    }
}
