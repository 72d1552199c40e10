use std::path::PathBuf;

use crate::mesh::{FacetH, PointRef, VertexH};

#[derive(Debug)]
pub enum Error {
    // Sets.
    /// The trailing size slot of a set held a value larger than the set's
    /// capacity plus one. The payload is the stored value and the capacity.
    SetSizeOutOfRange(u32, u32),
    SetIndexOutOfBounds(usize, usize),
    // Mesh structure.
    UnterminatedFacetList,
    UnterminatedVertexList,
    InvalidFacetHandle(FacetH),
    InvalidVertexHandle(VertexH),
    InvalidPointRef(PointRef),
    EmptyFacet(FacetH),
    /// A facet had too few vertices to determine its Voronoi center, or its
    /// sites were affinely dependent.
    DegenerateFacet(FacetH),
    NeighborVertexOverlap(FacetH, usize),
    MisalignedPointBuffer(usize),
    DimensionMismatch(usize, usize),
    StaleHandleWidth(usize),
    // Extraction.
    NonSimplicialFacet(FacetH),
    BrokenBoundaryRing(FacetH),
    UnchainableVertexStar(VertexH),
    /// An output buffer could not reserve the requested capacity. The payload
    /// is the capacity in elements that was asked for.
    ResizeFailure(usize),
    // Obj.
    InvalidObjFile(PathBuf),
    ObjLoadFailed(String),
    IncorrectNumberOfCoordinates(usize),
}
