/*!
This crate reads the in-memory snapshot a convex hull engine leaves behind
after a run and assembles the arrays callers actually want from it. It does
not compute hulls itself; it walks the engine's arenas.

# Overview

+ [`Mesh`] owns the snapshot: a flat `f64` coordinate buffer, facet and
  vertex arenas threaded into intrusive lists, packed status words, and
  variable length element sets whose trailing slot encodes their length.
  Slot zero of every arena is the sentinel that terminates lists and
  neighbor links, so all live handles and all ids handed to callers are
  one based.

+ [`hull_boundary_2d`] walks the facet ring of a planar hull and returns
  the ids of the extreme points in counterclockwise order.

+ [`hull_simplices`] and [`delaunay_simplices`] compact the facet arena
  into dense simplex, neighbor and equation tables, remapping arena ids to
  row numbers. Delaunay extraction keeps either the lower or the upper
  facets of the lifted hull, and restores a consistent orientation for 3d
  triangulations.

+ [`voronoi_diagram`] turns a planar Delaunay snapshot into Voronoi
  vertices, ridges, regions and the point to region table. Index zero in
  ridge and region rows stands for the vertex at infinity.

+ [`Mesh::check`] validates a snapshot before extraction: list
  termination, handle bounds, set encodings and the correspondence between
  a simplicial facet's vertex and neighbor slots.

+ The [`samples`] module builds small synthetic snapshots (polygon hulls,
  boxes, wheel triangulations) for tests, demos and benchmarks.

+ The optional `use_glam` feature enables the [`use_glam`] module, which
  converts between [`glam`](https://crates.io/crates/glam) vectors and the
  flat coordinate buffers used everywhere else.
*/

mod boundary;
mod buffer;
mod check;
mod error;
mod idmap;
mod iterator;
mod macros;
mod mesh;
mod obj;
mod queries;
pub mod samples;
mod set;
mod simplex;
mod status;
mod voronoi;

#[cfg(feature = "use_glam")]
pub mod use_glam;

pub use boundary::hull_boundary_2d;
pub use buffer::{GrowBuf, MatBuf};
pub use error::Error;
pub use idmap::IdMap;
pub use iterator::{
    FacetIter, VertexIter, facet_neighbor_iter, facet_vertex_iter, vertex_facet_iter,
};
pub use mesh::{FacetH, Handle, Mesh, PointRef, VertexH};
pub use obj::load_obj_points;
pub use queries::{
    RidgeVisitor, compute_vertex_neighbors, each_voronoi_ridge, each_voronoi_ridge_all,
    facet_center, mark_voronoi, nearest_vertex, order_vertex_neighbors, paraboloid_scale_shift,
    point_id,
};
pub use set::ElemSet;
pub use simplex::{SimplexArrays, delaunay_simplices, hull_simplices};
pub use status::{FacetStatus, ORIENT_CLOCK, VertexStatus};
pub use voronoi::{VoronoiDiagram, voronoi_diagram};
