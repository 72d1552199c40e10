use std::marker::PhantomData;

use crate::{error::Error, mesh::Handle};

/**
 * A variable length element set in the engine's layout.
 *
 * The engine stores a set as `capacity + 1` consecutive 32 bit slots. The
 * payload occupies the first `capacity` slots and the trailing slot encodes
 * the live length: `0` means exactly `capacity` elements are live, any other
 * value `n` means `n - 1` elements are live. A trailing value larger than
 * `capacity + 1` has no meaning and is reported as an error rather than
 * trusted.
 *
 * Positional access is 1 based to match the slot numbering used by the facet
 * walk, and is bounds checked against the live length.
 */
#[derive(Clone, PartialEq, Eq)]
pub struct ElemSet<H> {
    slots: Vec<u32>,
    _elem: PhantomData<H>,
}

impl<H> std::fmt::Debug for ElemSet<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ElemSet{:?}", &self.slots[..self.stored_len()])
    }
}

impl<H> Default for ElemSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ElemSet<H> {
    /// An empty set with no room for elements.
    pub fn new() -> Self {
        ElemSet {
            slots: vec![1],
            _elem: PhantomData,
        }
    }

    /// An empty set with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = vec![0u32; capacity + 1];
        slots[capacity] = 1;
        ElemSet {
            slots,
            _elem: PhantomData,
        }
    }

    /// Wrap raw slots exactly as the engine laid them out, including the
    /// trailing size slot. No validation happens here; a corrupt size slot
    /// surfaces later through `live_len`.
    #[cfg(test)]
    pub(crate) fn from_raw_slots(slots: Vec<u32>) -> Self {
        debug_assert!(!slots.is_empty());
        ElemSet {
            slots,
            _elem: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Live length with the size slot taken at face value, clamped to the
    /// capacity. Internal traversals use this; callers that cannot trust the
    /// set go through `live_len`.
    fn stored_len(&self) -> usize {
        let cap = self.capacity();
        match self.slots[cap] {
            0 => cap,
            n => ((n - 1) as usize).min(cap),
        }
    }

    /// The number of live elements, decoded from the trailing size slot.
    pub fn live_len(&self) -> Result<usize, Error> {
        let cap = self.capacity();
        match self.slots[cap] {
            0 => Ok(cap),
            n if (n as usize) > cap + 1 => Err(Error::SetSizeOutOfRange(n, cap as u32)),
            n => Ok((n - 1) as usize),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stored_len() == 0
    }
}

impl<H> ElemSet<H>
where
    H: Handle + From<u32>,
{
    /// A set holding exactly the given elements, with no spare capacity. The
    /// trailing size slot uses the `0` encoding.
    pub fn from_handles(handles: &[H]) -> Self {
        let mut slots: Vec<u32> = handles.iter().map(|h| h.index()).collect();
        slots.push(0);
        ElemSet {
            slots,
            _elem: PhantomData,
        }
    }

    /// The element at 1 based position `pos`, bounds checked against the
    /// decoded live length.
    pub fn at(&self, pos: usize) -> Result<H, Error> {
        let len = self.live_len()?;
        if pos == 0 || pos > len {
            Err(Error::SetIndexOutOfBounds(pos, len))
        } else {
            Ok(self.slots[pos - 1].into())
        }
    }

    /// Iterator over the live elements in slot order.
    ///
    /// Iteration trusts the size slot after clamping it to the capacity.
    /// Callers that receive a set from outside should check `live_len` first
    /// if they need the corruption reported.
    pub fn iter(&self) -> impl Iterator<Item = H> + use<'_, H> {
        self.slots[..self.stored_len()].iter().map(|i| (*i).into())
    }

    pub fn contains(&self, h: H) -> bool {
        self.slots[..self.stored_len()].iter().any(|i| *i == h.index())
    }

    /// The live elements as an owned vector, with the size slot validated.
    pub fn to_vec(&self) -> Result<Vec<H>, Error> {
        let len = self.live_len()?;
        Ok(self.slots[..len].iter().map(|i| (*i).into()).collect())
    }

    /// Append an element, growing the storage when the payload slots are
    /// exhausted.
    pub fn push(&mut self, h: H) {
        let cap = self.capacity();
        let len = self.stored_len();
        if len == cap {
            let newcap = (cap * 2).max(4);
            self.slots.resize(newcap + 1, 0);
            self.slots[newcap] = 0;
        }
        self.slots[len] = h.index();
        let cap = self.capacity();
        self.slots[cap] = if len + 1 == cap { 0 } else { (len + 2) as u32 };
    }

    /// Replace the live elements with the given sequence, reusing the storage
    /// when it is large enough. Used when a traversal rewrites a neighbor set
    /// into a new order.
    pub(crate) fn assign(&mut self, handles: &[H]) {
        if handles.len() <= self.capacity() {
            for (slot, h) in self.slots.iter_mut().zip(handles.iter()) {
                *slot = h.index();
            }
            let cap = self.capacity();
            self.slots[cap] = if handles.len() == cap {
                0
            } else {
                (handles.len() + 1) as u32
            };
        } else {
            *self = Self::from_handles(handles);
        }
    }
}

#[cfg(test)]
mod test {
    use super::ElemSet;
    use crate::{error::Error, mesh::FacetH};

    fn fh(i: u32) -> FacetH {
        i.into()
    }

    #[test]
    fn t_full_set_size_slot_zero() {
        let set = ElemSet::from_handles(&[fh(3), fh(5), fh(7)]);
        assert_eq!(set.capacity(), 3);
        assert_eq!(set.live_len().unwrap(), 3);
        assert_eq!(set.at(1).unwrap(), fh(3));
        assert_eq!(set.at(2).unwrap(), fh(5));
        assert_eq!(set.at(3).unwrap(), fh(7));
    }

    #[test]
    fn t_partial_set_size_slot_offset_by_one() {
        let set = ElemSet::<FacetH>::from_raw_slots(vec![3, 5, 7, 0, 3]);
        assert_eq!(set.capacity(), 4);
        assert_eq!(set.live_len().unwrap(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![fh(3), fh(5)]);
    }

    #[test]
    fn t_at_is_one_based_and_bounds_checked() {
        let set = ElemSet::from_handles(&[fh(2), fh(4)]);
        assert!(matches!(set.at(0), Err(Error::SetIndexOutOfBounds(0, 2))));
        assert!(matches!(set.at(3), Err(Error::SetIndexOutOfBounds(3, 2))));
    }

    #[test]
    fn t_corrupt_size_slot_is_an_error() {
        let set = ElemSet::<FacetH>::from_raw_slots(vec![3, 5, 9]);
        assert!(matches!(set.live_len(), Err(Error::SetSizeOutOfRange(9, 2))));
        assert!(matches!(set.at(1), Err(Error::SetSizeOutOfRange(9, 2))));
    }

    #[test]
    fn t_full_via_max_plus_one_encoding() {
        // Both 0 and capacity + 1 in the size slot mean a full set.
        let set = ElemSet::<FacetH>::from_raw_slots(vec![3, 5, 3]);
        assert_eq!(set.live_len().unwrap(), 2);
    }

    #[test]
    fn t_push_tracks_size_slot() {
        let mut set = ElemSet::<FacetH>::with_capacity(2);
        assert_eq!(set.live_len().unwrap(), 0);
        assert!(set.is_empty());
        set.push(fh(9));
        assert_eq!(set.live_len().unwrap(), 1);
        set.push(fh(8));
        assert_eq!(set.live_len().unwrap(), 2);
        // Storage was exactly full, so this grows.
        set.push(fh(7));
        assert_eq!(set.live_len().unwrap(), 3);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![fh(9), fh(8), fh(7)]
        );
    }

    #[test]
    fn t_contains() {
        let set = ElemSet::from_handles(&[fh(1), fh(6)]);
        assert!(set.contains(fh(6)));
        assert!(!set.contains(fh(2)));
    }

    #[test]
    fn t_assign_reuses_storage() {
        let mut set = ElemSet::<FacetH>::with_capacity(4);
        set.push(fh(1));
        set.push(fh(2));
        set.push(fh(3));
        set.assign(&[fh(3), fh(1), fh(2)]);
        assert_eq!(set.capacity(), 4);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![fh(3), fh(1), fh(2)]
        );
    }
}
