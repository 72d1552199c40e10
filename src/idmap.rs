use crate::error::Error;

/**
 * Transient translation table from engine facet ids to compact 1 based
 * output indices.
 *
 * Engine ids are sparse because merging discards facets without reusing
 * their ids, so the table is sized by the maximum id rather than the facet
 * count. Unmapped ids hold -1. Built once per extraction call and dropped
 * with it.
 */
pub struct IdMap {
    map: Vec<i32>,
}

impl IdMap {
    /// A map covering ids below `max_id` with every entry unmapped.
    pub fn unmapped(max_id: u32) -> Result<Self, Error> {
        let n = max_id as usize;
        let mut map = Vec::new();
        map.try_reserve_exact(n).map_err(|_| Error::ResizeFailure(n))?;
        map.resize(n, -1);
        Ok(IdMap { map })
    }

    pub fn insert(&mut self, id: u32, index: i32) {
        self.map[id as usize] = index;
    }

    /// The compact index assigned to `id`, or -1 when the facet was not
    /// kept. Ids at or above the size this map was built with are a caller
    /// bug; the consistency checker validates them up front.
    pub fn get(&self, id: u32) -> i32 {
        self.map[id as usize]
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::IdMap;

    #[test]
    fn t_starts_unmapped() {
        let map = IdMap::unmapped(6).unwrap();
        assert_eq!(map.len(), 6);
        for id in 0..6 {
            assert_eq!(map.get(id), -1);
        }
    }

    #[test]
    fn t_sparse_ids_compact_indices() {
        // Ids with gaps, as left behind by merging.
        let mut map = IdMap::unmapped(10).unwrap();
        for (index, id) in [2u32, 3, 7, 9].iter().enumerate() {
            map.insert(*id, (index + 1) as i32);
        }
        assert_eq!(map.get(2), 1);
        assert_eq!(map.get(3), 2);
        assert_eq!(map.get(7), 3);
        assert_eq!(map.get(9), 4);
        assert_eq!(map.get(4), -1);
        assert_eq!(map.get(0), -1);
    }
}
