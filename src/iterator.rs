use crate::mesh::{FacetH, Handle, Mesh, VertexH};

/**
 * Iterator over the facet list in the engine's order.
 *
 * The list is intrusive and ends at the sentinel. Iteration is additionally
 * bounded by the number of facets in the arena so that a corrupted list with
 * a cycle yields a finite sequence instead of hanging; the consistency
 * checker is the place that reports such a list as an error.
 */
pub struct FacetIter<'a> {
    mesh: &'a Mesh,
    current: FacetH,
    remaining: usize,
}

impl<'a> FacetIter<'a> {
    pub(crate) fn new(mesh: &'a Mesh, start: FacetH) -> Self {
        FacetIter {
            mesh,
            current: start,
            remaining: mesh.num_facets(),
        }
    }
}

impl Iterator for FacetIter<'_> {
    type Item = FacetH;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_sentinel() || self.remaining == 0 {
            None
        } else {
            let current = self.current;
            self.current = self.mesh.next_facet(current);
            self.remaining -= 1;
            Some(current)
        }
    }
}

/**
 * Iterator over the vertex list in the engine's order. Bounded the same way
 * as `FacetIter`.
 */
pub struct VertexIter<'a> {
    mesh: &'a Mesh,
    current: VertexH,
    remaining: usize,
}

impl<'a> VertexIter<'a> {
    pub(crate) fn new(mesh: &'a Mesh, start: VertexH) -> Self {
        VertexIter {
            mesh,
            current: start,
            remaining: mesh.num_vertices(),
        }
    }
}

impl Iterator for VertexIter<'_> {
    type Item = VertexH;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_sentinel() || self.remaining == 0 {
            None
        } else {
            let current = self.current;
            self.current = self.mesh.next_vertex(current);
            self.remaining -= 1;
            Some(current)
        }
    }
}

/// Vertices of a facet in slot order.
pub fn facet_vertex_iter(mesh: &Mesh, f: FacetH) -> impl Iterator<Item = VertexH> + use<'_> {
    mesh.facet_vertices(f).iter()
}

/// Neighbor facets of a facet in slot order.
pub fn facet_neighbor_iter(mesh: &Mesh, f: FacetH) -> impl Iterator<Item = FacetH> + use<'_> {
    mesh.facet_neighbors(f).iter()
}

/// Facets incident on a vertex in the order the neighbor pass recorded them.
pub fn vertex_facet_iter(mesh: &Mesh, v: VertexH) -> impl Iterator<Item = FacetH> + use<'_> {
    mesh.vertex_neighbors(v).iter()
}
