use std::fmt::{Debug, Display};

use crate::{
    error::Error,
    iterator::{FacetIter, VertexIter},
    set::ElemSet,
    status::{FacetStatus, VertexStatus},
};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * arena slot.
 */
pub trait Handle: Copy {
    /**
     * The arena slot of the element.
     */
    fn index(&self) -> u32;

    /// Slot 0 holds the list sentinel, so a handle with index 0 never names a
    /// live element.
    fn is_sentinel(&self) -> bool {
        self.index() == 0
    }
}

/**
 * Facet handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FacetH {
    idx: u32,
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VertexH {
    idx: u32,
}

/**
 * Offset of a point's first coordinate in the mesh's flat point buffer.
 *
 * The engine refers to points by where their coordinates start, not by an
 * ordinal. The ordinal is recovered by dividing the offset by the hull
 * dimension.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointRef {
    idx: u32,
}

impl Handle for FacetH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for FacetH {
    fn from(idx: u32) -> Self {
        FacetH { idx }
    }
}

impl From<&u32> for FacetH {
    fn from(idx: &u32) -> Self {
        FacetH { idx: *idx }
    }
}

impl Handle for VertexH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for VertexH {
    fn from(idx: u32) -> Self {
        VertexH { idx }
    }
}

impl From<&u32> for VertexH {
    fn from(idx: &u32) -> Self {
        VertexH { idx: *idx }
    }
}

impl Handle for PointRef {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for PointRef {
    fn from(idx: u32) -> Self {
        PointRef { idx }
    }
}

impl From<&u32> for PointRef {
    fn from(idx: &u32) -> Self {
        PointRef { idx: *idx }
    }
}

impl Display for FacetH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FacetH({})", self.index())
    }
}

impl Display for VertexH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VertexH({})", self.index())
    }
}

impl Display for PointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PointRef({})", self.index())
    }
}

impl Debug for FacetH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FacetH({})", self.index())
    }
}

impl Debug for VertexH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VertexH({})", self.index())
    }
}

impl Debug for PointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PointRef({})", self.index())
    }
}

pub(crate) struct Facet {
    pub(crate) id: u32,
    pub(crate) next: FacetH,
    pub(crate) prev: FacetH,
    pub(crate) normal: Vec<f64>,
    pub(crate) offset: f64,
    pub(crate) area: f64,
    pub(crate) vertices: ElemSet<VertexH>,
    pub(crate) neighbors: ElemSet<FacetH>,
    pub(crate) coplanar: ElemSet<PointRef>,
    pub(crate) visit: u32,
    pub(crate) status: FacetStatus,
}

pub(crate) struct Vertex {
    pub(crate) id: u32,
    pub(crate) next: VertexH,
    pub(crate) prev: VertexH,
    pub(crate) point: PointRef,
    pub(crate) neighbors: ElemSet<FacetH>,
    pub(crate) visit: u32,
    pub(crate) status: VertexStatus,
}

impl Facet {
    fn sentinel() -> Self {
        Facet {
            id: 0,
            next: 0.into(),
            prev: 0.into(),
            normal: Vec::new(),
            offset: 0.0,
            area: 0.0,
            vertices: ElemSet::new(),
            neighbors: ElemSet::new(),
            coplanar: ElemSet::new(),
            visit: 0,
            status: FacetStatus::default(),
        }
    }
}

impl Vertex {
    fn sentinel() -> Self {
        Vertex {
            id: 0,
            next: 0.into(),
            prev: 0.into(),
            point: 0.into(),
            neighbors: ElemSet::new(),
            visit: 0,
            status: VertexStatus::default(),
        }
    }
}

/**
 * A snapshot of the tessellation engine's facet mesh.
 *
 * Facets and vertices live in arenas whose slot 0 is a sentinel with id 0.
 * The live elements form intrusive doubly linked lists in insertion order,
 * terminated by the sentinel, which is how the engine hands them over. All
 * extraction routines walk these lists rather than the arenas so that the
 * engine's ordering is preserved.
 *
 * Ids are assigned by the engine starting at 1 and may have gaps where the
 * engine discarded elements before the snapshot. Slots and ids therefore
 * both identify an element but must not be conflated.
 */
pub struct Mesh {
    hull_dim: usize,
    input_dim: usize,
    points: Vec<f64>,
    facets: Vec<Facet>,
    vertices: Vec<Vertex>,
    facet_head: FacetH,
    facet_tail: FacetH,
    vertex_head: VertexH,
    vertex_tail: VertexH,
    next_facet_id: u32,
    next_vertex_id: u32,
    visit_epoch: u32,
    vertex_epoch: u32,
    scale_last: bool,
    last_low: f64,
    last_high: f64,
    last_newhigh: f64,
    total_area: f64,
    total_volume: f64,
}

impl Mesh {
    /// A mesh with no points, facets, or vertices.
    ///
    /// `hull_dim` is the dimension the engine ran in and `input_dim` the
    /// dimension of the caller's points. They differ only when the engine
    /// lifted the input onto a paraboloid, in which case `hull_dim` is
    /// `input_dim + 1`.
    pub fn new(hull_dim: usize, input_dim: usize) -> Self {
        debug_assert!(hull_dim >= input_dim && input_dim > 0);
        Mesh {
            hull_dim,
            input_dim,
            points: Vec::new(),
            facets: vec![Facet::sentinel()],
            vertices: vec![Vertex::sentinel()],
            facet_head: 0.into(),
            facet_tail: 0.into(),
            vertex_head: 0.into(),
            vertex_tail: 0.into(),
            next_facet_id: 1,
            next_vertex_id: 1,
            visit_epoch: 0,
            vertex_epoch: 0,
            scale_last: false,
            last_low: 0.0,
            last_high: 0.0,
            last_newhigh: 0.0,
            total_area: 0.0,
            total_volume: 0.0,
        }
    }

    pub fn hull_dim(&self) -> usize {
        self.hull_dim
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub(crate) fn facet(&self, f: FacetH) -> &Facet {
        &self.facets[f.index() as usize]
    }

    fn facet_mut(&mut self, f: FacetH) -> &mut Facet {
        &mut self.facets[f.index() as usize]
    }

    pub(crate) fn vertex(&self, v: VertexH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    fn vertex_mut(&mut self, v: VertexH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    // Point buffer.

    /// Append point coordinates to the flat buffer. The slice length must be
    /// a multiple of the hull dimension.
    pub fn add_points(&mut self, coords: &[f64]) -> Result<(), Error> {
        if coords.len() % self.hull_dim != 0 {
            return Err(Error::MisalignedPointBuffer(coords.len()));
        }
        self.points.extend_from_slice(coords);
        Ok(())
    }

    /// The reference of the `i`-th stored point.
    pub fn point_ref(&self, i: usize) -> PointRef {
        ((i * self.hull_dim) as u32).into()
    }

    /// Number of points in the buffer, including any the engine added on its
    /// own, such as an interior lift point.
    pub fn num_points(&self) -> usize {
        self.points.len() / self.hull_dim
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// The `hull_dim` coordinates of a point.
    pub fn point_coords(&self, p: PointRef) -> Result<&[f64], Error> {
        let start = p.index() as usize;
        if start % self.hull_dim != 0 || start + self.hull_dim > self.points.len() {
            return Err(Error::InvalidPointRef(p));
        }
        Ok(&self.points[start..(start + self.hull_dim)])
    }

    // Vertices.

    pub fn add_vertex(&mut self, point: PointRef) -> Result<VertexH, Error> {
        self.point_coords(point)?;
        let vi: VertexH = (self.vertices.len() as u32).into();
        let id = self.next_vertex_id;
        self.next_vertex_id += 1;
        let prev = self.vertex_tail;
        self.vertices.push(Vertex {
            id,
            next: 0.into(),
            prev,
            point,
            neighbors: ElemSet::new(),
            visit: 0,
            status: VertexStatus::default(),
        });
        if prev.is_sentinel() {
            self.vertex_head = vi;
        } else {
            self.vertex_mut(prev).next = vi;
        }
        self.vertex_tail = vi;
        Ok(vi)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len() - 1
    }

    /// One past the largest vertex id the engine handed out.
    pub fn max_vertex_id(&self) -> u32 {
        self.next_vertex_id
    }

    pub fn vertex_id(&self, v: VertexH) -> u32 {
        self.vertex(v).id
    }

    pub fn vertex_point(&self, v: VertexH) -> PointRef {
        self.vertex(v).point
    }

    pub fn vertex_neighbors(&self, v: VertexH) -> &ElemSet<FacetH> {
        &self.vertex(v).neighbors
    }

    pub fn set_vertex_neighbors(&mut self, v: VertexH, neighbors: &[FacetH]) {
        self.vertex_mut(v).neighbors.assign(neighbors);
    }

    pub fn vertex_status(&self, v: VertexH) -> VertexStatus {
        self.vertex(v).status
    }

    pub fn vertex_status_mut(&mut self, v: VertexH) -> &mut VertexStatus {
        &mut self.vertex_mut(v).status
    }

    pub fn vertex_visit(&self, v: VertexH) -> u32 {
        self.vertex(v).visit
    }

    pub fn set_vertex_visit(&mut self, v: VertexH, mark: u32) {
        self.vertex_mut(v).visit = mark;
    }

    pub fn next_vertex(&self, v: VertexH) -> VertexH {
        self.vertex(v).next
    }

    pub fn prev_vertex(&self, v: VertexH) -> VertexH {
        self.vertex(v).prev
    }

    pub fn vertex_head(&self) -> VertexH {
        self.vertex_head
    }

    pub fn is_valid_vertex(&self, v: VertexH) -> bool {
        !v.is_sentinel() && (v.index() as usize) < self.vertices.len()
    }

    // Facets.

    /// Append a facet with the given hyperplane and vertex set. Its neighbor
    /// set starts empty because neighbors are mutual; link them with
    /// `set_facet_neighbors` once all facets exist.
    pub fn add_facet(
        &mut self,
        normal: &[f64],
        offset: f64,
        vertices: &[VertexH],
    ) -> Result<FacetH, Error> {
        if normal.len() != self.hull_dim {
            return Err(Error::DimensionMismatch(self.hull_dim, normal.len()));
        }
        for v in vertices {
            if !self.is_valid_vertex(*v) {
                return Err(Error::InvalidVertexHandle(*v));
            }
        }
        let fi: FacetH = (self.facets.len() as u32).into();
        let id = self.next_facet_id;
        self.next_facet_id += 1;
        let prev = self.facet_tail;
        self.facets.push(Facet {
            id,
            next: 0.into(),
            prev,
            normal: normal.to_vec(),
            offset,
            area: 0.0,
            vertices: ElemSet::from_handles(vertices),
            neighbors: ElemSet::new(),
            coplanar: ElemSet::new(),
            visit: 0,
            status: FacetStatus::default(),
        });
        if prev.is_sentinel() {
            self.facet_head = fi;
        } else {
            self.facet_mut(prev).next = fi;
        }
        self.facet_tail = fi;
        Ok(fi)
    }

    /// Advance the engine's id counter without creating facets, leaving a gap
    /// like the ones merging leaves behind.
    pub fn skip_facet_ids(&mut self, count: u32) {
        self.next_facet_id += count;
    }

    pub fn num_facets(&self) -> usize {
        self.facets.len() - 1
    }

    /// One past the largest facet id the engine has handed out. Dense id
    /// indexed tables are sized with this, not with the facet count.
    pub fn max_facet_id(&self) -> u32 {
        self.next_facet_id
    }

    pub fn facet_id(&self, f: FacetH) -> u32 {
        self.facet(f).id
    }

    pub fn facet_normal(&self, f: FacetH) -> &[f64] {
        &self.facet(f).normal
    }

    pub fn facet_offset(&self, f: FacetH) -> f64 {
        self.facet(f).offset
    }

    pub fn facet_area(&self, f: FacetH) -> f64 {
        self.facet(f).area
    }

    pub fn set_facet_area(&mut self, f: FacetH, area: f64) {
        self.facet_mut(f).area = area;
    }

    pub fn facet_vertices(&self, f: FacetH) -> &ElemSet<VertexH> {
        &self.facet(f).vertices
    }

    pub fn facet_neighbors(&self, f: FacetH) -> &ElemSet<FacetH> {
        &self.facet(f).neighbors
    }

    pub fn set_facet_neighbors(&mut self, f: FacetH, neighbors: &[FacetH]) {
        self.facet_mut(f).neighbors.assign(neighbors);
    }

    pub fn facet_coplanar(&self, f: FacetH) -> &ElemSet<PointRef> {
        &self.facet(f).coplanar
    }

    pub fn push_coplanar(&mut self, f: FacetH, p: PointRef) -> Result<(), Error> {
        self.point_coords(p)?;
        self.facet_mut(f).coplanar.push(p);
        Ok(())
    }

    pub fn facet_status(&self, f: FacetH) -> FacetStatus {
        self.facet(f).status
    }

    pub fn facet_status_mut(&mut self, f: FacetH) -> &mut FacetStatus {
        &mut self.facet_mut(f).status
    }

    pub fn facet_visit(&self, f: FacetH) -> u32 {
        self.facet(f).visit
    }

    pub fn set_facet_visit(&mut self, f: FacetH, mark: u32) {
        self.facet_mut(f).visit = mark;
    }

    pub fn next_facet(&self, f: FacetH) -> FacetH {
        self.facet(f).next
    }

    pub fn prev_facet(&self, f: FacetH) -> FacetH {
        self.facet(f).prev
    }

    pub fn facet_head(&self) -> FacetH {
        self.facet_head
    }

    pub fn is_valid_facet(&self, f: FacetH) -> bool {
        !f.is_sentinel() && (f.index() as usize) < self.facets.len()
    }

    // Visit epochs.

    /// Advance the facet visit epoch and return the new value. Marks written
    /// with an older epoch compare unequal from here on, which is what makes
    /// repeated traversals cheap to restart.
    pub fn bump_visit_epoch(&mut self) -> u32 {
        self.visit_epoch += 1;
        self.visit_epoch
    }

    pub fn visit_epoch(&self) -> u32 {
        self.visit_epoch
    }

    /// Lift the facet visit epoch to at least `floor`.
    ///
    /// The ridge walk overwrites facet visit marks with small dense ids.
    /// Raising the epoch past them first keeps those marks from ever
    /// comparing equal to a later epoch.
    pub fn raise_visit_epoch(&mut self, floor: u32) {
        self.visit_epoch = self.visit_epoch.max(floor);
    }

    /// Advance the vertex visit epoch and return the new value.
    pub fn bump_vertex_epoch(&mut self) -> u32 {
        self.vertex_epoch += 1;
        self.vertex_epoch
    }

    pub fn vertex_epoch(&self) -> u32 {
        self.vertex_epoch
    }

    // Engine scalars.

    /// Record the paraboloid lift bounds the engine used. `last_low` and
    /// `last_high` bound the lifted coordinate before rescaling and
    /// `last_newhigh` is the value `last_high` was rescaled to.
    pub fn set_lift_bounds(&mut self, last_low: f64, last_high: f64, last_newhigh: f64) {
        self.scale_last = true;
        self.last_low = last_low;
        self.last_high = last_high;
        self.last_newhigh = last_newhigh;
    }

    pub fn scale_last(&self) -> bool {
        self.scale_last
    }

    pub fn lift_bounds(&self) -> (f64, f64, f64) {
        (self.last_low, self.last_high, self.last_newhigh)
    }

    pub fn set_totals(&mut self, area: f64, volume: f64) {
        self.total_area = area;
        self.total_volume = volume;
    }

    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    // Traversal.

    /// Facets in the engine's list order.
    pub fn facets(&self) -> FacetIter<'_> {
        FacetIter::new(self, self.facet_head)
    }

    /// Vertices in the engine's list order.
    pub fn vertices(&self) -> VertexIter<'_> {
        VertexIter::new(self, self.vertex_head)
    }
}

// Snapshot surgery for tests that need a malformed mesh.
#[cfg(test)]
impl Mesh {
    pub(crate) fn set_next_facet(&mut self, f: FacetH, next: FacetH) {
        self.facet_mut(f).next = next;
    }

    pub(crate) fn set_next_vertex(&mut self, v: VertexH, next: VertexH) {
        self.vertex_mut(v).next = next;
    }

    pub(crate) fn set_raw_facet_vertices(&mut self, f: FacetH, slots: Vec<u32>) {
        self.facet_mut(f).vertices = ElemSet::from_raw_slots(slots);
    }

    pub(crate) fn set_raw_facet_neighbors(&mut self, f: FacetH, slots: Vec<u32>) {
        self.facet_mut(f).neighbors = ElemSet::from_raw_slots(slots);
    }
}

#[cfg(test)]
mod test {
    use super::{Handle, Mesh, PointRef};
    use crate::error::Error;

    #[test]
    fn t_empty_mesh() {
        let mesh = Mesh::new(2, 2);
        assert_eq!(mesh.num_points(), 0);
        assert_eq!(mesh.num_facets(), 0);
        assert_eq!(mesh.num_vertices(), 0);
        assert!(mesh.facet_head().is_sentinel());
        assert!(mesh.vertex_head().is_sentinel());
        assert_eq!(mesh.facets().count(), 0);
        assert_eq!(mesh.vertices().count(), 0);
    }

    #[test]
    fn t_point_refs() {
        let mut mesh = Mesh::new(3, 3);
        mesh.add_points(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        assert_eq!(mesh.num_points(), 2);
        let p = mesh.point_ref(1);
        assert_eq!(p.index(), 3);
        assert_eq!(mesh.point_coords(p).unwrap(), &[1.0, 0.0, 0.0]);
        assert!(matches!(
            mesh.point_coords(4u32.into()),
            Err(Error::InvalidPointRef(_))
        ));
        assert!(matches!(
            mesh.add_points(&[1.0, 2.0]),
            Err(Error::MisalignedPointBuffer(2))
        ));
    }

    #[test]
    fn t_list_order_is_insertion_order() {
        let mut mesh = Mesh::new(2, 2);
        mesh.add_points(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let va = mesh.add_vertex(mesh.point_ref(0)).unwrap();
        let vb = mesh.add_vertex(mesh.point_ref(1)).unwrap();
        let vc = mesh.add_vertex(mesh.point_ref(2)).unwrap();
        assert_eq!(mesh.vertices().collect::<Vec<_>>(), vec![va, vb, vc]);
        assert_eq!(mesh.vertex_id(va), 1);
        assert_eq!(mesh.vertex_id(vc), 3);
        let fa = mesh.add_facet(&[0.0, -1.0], 0.0, &[va, vb]).unwrap();
        let fb = mesh.add_facet(&[1.0, 0.0], -1.0, &[vb, vc]).unwrap();
        assert_eq!(mesh.facets().collect::<Vec<_>>(), vec![fa, fb]);
        assert!(mesh.next_facet(fb).is_sentinel());
        assert_eq!(mesh.prev_facet(fb), fa);
    }

    #[test]
    fn t_facet_ids_skip_like_merges() {
        let mut mesh = Mesh::new(2, 2);
        mesh.add_points(&[0.0, 0.0, 1.0, 0.0]).unwrap();
        let va = mesh.add_vertex(mesh.point_ref(0)).unwrap();
        let vb = mesh.add_vertex(mesh.point_ref(1)).unwrap();
        let fa = mesh.add_facet(&[0.0, -1.0], 0.0, &[va, vb]).unwrap();
        mesh.skip_facet_ids(5);
        let fb = mesh.add_facet(&[0.0, 1.0], -1.0, &[va, vb]).unwrap();
        assert_eq!(mesh.facet_id(fa), 1);
        assert_eq!(mesh.facet_id(fb), 7);
        assert_eq!(mesh.max_facet_id(), 8);
    }

    #[test]
    fn t_add_facet_validates_input() {
        let mut mesh = Mesh::new(2, 2);
        mesh.add_points(&[0.0, 0.0]).unwrap();
        let va = mesh.add_vertex(mesh.point_ref(0)).unwrap();
        assert!(matches!(
            mesh.add_facet(&[1.0], 0.0, &[va]),
            Err(Error::DimensionMismatch(2, 1))
        ));
        assert!(matches!(
            mesh.add_facet(&[1.0, 0.0], 0.0, &[9u32.into()]),
            Err(Error::InvalidVertexHandle(_))
        ));
    }

    #[test]
    fn t_visit_epochs_monotonic() {
        let mut mesh = Mesh::new(2, 2);
        assert_eq!(mesh.visit_epoch(), 0);
        assert_eq!(mesh.bump_visit_epoch(), 1);
        assert_eq!(mesh.bump_visit_epoch(), 2);
        assert_eq!(mesh.bump_vertex_epoch(), 1);
        // Fresh elements always carry a mark older than any bumped epoch.
        mesh.add_points(&[0.0, 0.0]).unwrap();
        let v = mesh.add_vertex(PointRef::from(0u32)).unwrap();
        assert!(mesh.vertex_visit(v) < mesh.vertex_epoch());
    }

    #[test]
    fn t_neighbor_sets() {
        let mut mesh = Mesh::new(2, 2);
        mesh.add_points(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let va = mesh.add_vertex(mesh.point_ref(0)).unwrap();
        let vb = mesh.add_vertex(mesh.point_ref(1)).unwrap();
        let fa = mesh.add_facet(&[0.0, -1.0], 0.0, &[va, vb]).unwrap();
        let fb = mesh.add_facet(&[1.0, 0.0], -1.0, &[va, vb]).unwrap();
        assert!(mesh.facet_neighbors(fa).is_empty());
        mesh.set_facet_neighbors(fa, &[fb]);
        mesh.set_facet_neighbors(fb, &[fa]);
        assert_eq!(mesh.facet_neighbors(fa).at(1).unwrap(), fb);
        mesh.set_vertex_neighbors(va, &[fa, fb]);
        assert_eq!(mesh.vertex_neighbors(va).live_len().unwrap(), 2);
        mesh.push_coplanar(fa, mesh.point_ref(2)).unwrap();
        assert_eq!(mesh.facet_coplanar(fa).live_len().unwrap(), 1);
    }
}
