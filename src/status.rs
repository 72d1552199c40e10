/// Orientation convention of the facet walk.
///
/// A facet whose top-orientation flag differs from this constant lists its
/// vertices counterclockwise. The engine fixes this at compile time, so the
/// boundary walker only ever compares against it.
pub const ORIENT_CLOCK: bool = false;

const SIMPLICIAL: u32 = 1 << 0;
const TOPORIENT: u32 = 1 << 1;
const UPPER_DELAUNAY: u32 = 1 << 2;
const GOOD: u32 = 1 << 3;
const SEEN: u32 = 1 << 4;

/// Packed flag word of a facet.
///
/// The engine stores facet flags in a single 32 bit word. The bits mirrored
/// here are the ones extraction reads; the rest of the word is preserved but
/// never interpreted.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct FacetStatus {
    flags: u32,
}

impl FacetStatus {
    fn check(&self, i: u32) -> bool {
        self.flags & i > 0
    }

    fn set(&mut self, i: u32, flag: bool) {
        if flag {
            self.flags |= i;
        } else {
            self.flags &= !i;
        }
    }

    pub fn simplicial(&self) -> bool {
        self.check(SIMPLICIAL)
    }

    pub fn set_simplicial(&mut self, flag: bool) {
        self.set(SIMPLICIAL, flag);
    }

    pub fn toporient(&self) -> bool {
        self.check(TOPORIENT)
    }

    pub fn set_toporient(&mut self, flag: bool) {
        self.set(TOPORIENT, flag)
    }

    pub fn upper_delaunay(&self) -> bool {
        self.check(UPPER_DELAUNAY)
    }

    pub fn set_upper_delaunay(&mut self, flag: bool) {
        self.set(UPPER_DELAUNAY, flag)
    }

    pub fn good(&self) -> bool {
        self.check(GOOD)
    }

    pub fn set_good(&mut self, flag: bool) {
        self.set(GOOD, flag)
    }

    pub fn seen(&self) -> bool {
        self.check(SEEN)
    }

    pub fn set_seen(&mut self, flag: bool) {
        self.set(SEEN, flag)
    }
}

const VSEEN: u8 = 1 << 0;
const VDELETED: u8 = 1 << 1;

/// Packed flag word of a vertex. A single byte in the engine's layout.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexStatus {
    flags: u8,
}

impl VertexStatus {
    fn check(&self, i: u8) -> bool {
        self.flags & i > 0
    }

    fn set(&mut self, i: u8, flag: bool) {
        if flag {
            self.flags |= i;
        } else {
            self.flags &= !i;
        }
    }

    pub fn seen(&self) -> bool {
        self.check(VSEEN)
    }

    pub fn set_seen(&mut self, flag: bool) {
        self.set(VSEEN, flag)
    }

    pub fn deleted(&self) -> bool {
        self.check(VDELETED)
    }

    pub fn set_deleted(&mut self, flag: bool) {
        self.set(VDELETED, flag)
    }
}
