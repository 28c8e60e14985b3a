use crate::{cache::Cache, error::SimError, org::Organization};

/// Direct-mapped organization: one slot per line residue class. Eviction is
/// forced by the slot mapping, never policy-driven.
#[derive(Debug, Default)]
pub struct Direct {
    slots: Vec<Option<u64>>,
}

impl Cache<Direct> {
    pub fn direct(line_size: u64, total_size: u64) -> Result<Self, SimError> {
        let mut cache = Cache::new(line_size, total_size, Direct::default())?;
        cache.org.slots = vec![None; cache.blocks];
        Ok(cache)
    }
}

impl Organization for Direct {
    fn probe(cache: &mut Cache<Direct>, line: u64) -> Result<bool, SimError> {
        let slot = (line % cache.blocks as u64) as usize;
        if cache.org.slots[slot] == Some(line) {
            return Ok(true);
        }

        if let Some(evicted) = cache.org.slots[slot] {
            cache.history.insert(evicted, cache.requests);
        }
        cache.org.slots[slot] = Some(line);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_line_always_hits_after_first_touch() {
        let mut cache = Cache::direct(64, 3 * 1024).unwrap();
        assert!(!cache.get(0).unwrap());
        // Distinct addresses within the 64-byte line alias to one slot entry.
        for addr in [0, 8, 32, 63, 0] {
            assert!(cache.get(addr).unwrap());
        }
    }

    #[test]
    fn one_more_conflicting_line_than_slots_never_hits() {
        let mut cache = Cache::direct(64, 3 * 1024).unwrap();
        let blocks = cache.blocks as u64;

        // blocks + 1 lines, all congruent mod blocks, touched round-robin.
        for _ in 0..3 {
            for i in 0..=blocks {
                let addr = i * blocks * 64;
                assert!(!cache.get(addr).unwrap());
            }
        }
        assert_eq!(cache.hits, 0);
    }

    #[test]
    fn unrelated_slots_do_not_interfere() {
        let mut cache = Cache::direct(64, 256).unwrap();
        assert!(!cache.get(0).unwrap());
        assert!(!cache.get(64).unwrap());
        assert!(!cache.get(128).unwrap());
        assert!(cache.get(0).unwrap());
        assert!(cache.get(64).unwrap());
    }
}
