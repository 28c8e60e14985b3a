use std::collections::BTreeMap;

use crate::{cache::Cache, displace::Displace, error::SimError, org::Organization};

/// Fully-associative organization: any line may occupy any block, eviction
/// is delegated to the displacement strategy.
#[derive(Debug)]
pub struct Assoc<D: Displace> {
    displace: D,
    /// Resident line -> request index stamped at insertion. Ordered so
    /// strategy iteration is deterministic.
    pub resident: BTreeMap<u64, u64>,
    /// Victim of the most recent evicting miss, consumed by a composing
    /// set-associative cache. Cleared only by a non-evicting insert.
    pub last_replaced: Option<u64>,
}

impl<D: Displace> Assoc<D> {
    pub fn new(displace: D) -> Self {
        Assoc {
            displace,
            resident: BTreeMap::new(),
            last_replaced: None,
        }
    }
}

impl<D: Displace> Cache<Assoc<D>> {
    pub fn fully_associative(
        line_size: u64,
        total_size: u64,
        displace: D,
    ) -> Result<Self, SimError> {
        Cache::new(line_size, total_size, Assoc::new(displace))
    }
}

impl<D: Displace> Organization for Assoc<D> {
    fn probe(cache: &mut Cache<Assoc<D>>, line: u64) -> Result<bool, SimError> {
        if cache.org.resident.contains_key(&line) {
            return Ok(true);
        }

        // Stamp one ahead of the pre-increment count so the victim's history
        // entry lines up with the miss-path stamp of the incoming line.
        let stamp = cache.requests + 1;
        if cache.org.resident.len() < cache.blocks {
            cache.org.last_replaced = None;
        } else {
            let Assoc {
                displace,
                resident,
                last_replaced,
            } = &mut cache.org;
            let victim = displace.pick(resident);
            resident.remove(&victim);
            *last_replaced = Some(victim);
            cache.history.insert(victim, stamp);
        }
        cache.org.resident.insert(line, stamp);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::displace::{oldest::Oldest, random::Rand};

    fn filled(blocks: u64) -> Cache<Assoc<Oldest>> {
        let mut cache = Cache::fully_associative(64, blocks * 64, Oldest::new()).unwrap();
        for i in 0..blocks {
            assert!(!cache.get(i * 64).unwrap());
        }
        cache
    }

    #[test]
    fn under_capacity_inserts_do_not_evict() {
        let mut cache = filled(3);
        assert_eq!(cache.org.resident.len(), 3);
        assert_eq!(cache.org.last_replaced, None);
        assert!(cache.history.get(&0).is_some());

        // All three lines still resident.
        for addr in [0, 64, 128] {
            assert!(cache.get(addr).unwrap());
        }
    }

    #[test]
    fn oldest_strategy_evicts_the_earliest_insertion() {
        let mut cache = filled(3);
        // A hit does not refresh the insertion stamp.
        assert!(cache.get(0).unwrap());

        assert!(!cache.get(3 * 64).unwrap());
        assert_eq!(cache.org.last_replaced, Some(0));
        let resident: Vec<u64> = cache.org.resident.keys().copied().collect();
        assert_eq!(resident, vec![1, 2, 3]);

        assert!(!cache.get(0).unwrap());
    }

    #[test]
    fn evicted_line_is_stamped_into_history() {
        let mut cache = filled(2);
        // Third insert happens on request 3, so the victim is stamped 3.
        assert!(!cache.get(2 * 64).unwrap());
        assert_eq!(cache.history.get(&0), Some(&3));
    }

    #[test]
    fn random_strategy_evicts_a_resident_line() {
        let mut cache = Cache::fully_associative(64, 3 * 64, Rand::with_seed(7)).unwrap();
        for line in [10u64, 20, 30] {
            assert!(!cache.get(line * 64).unwrap());
        }

        for (request, line) in (40u64..60).enumerate() {
            assert!(!cache.get(line * 64).unwrap());
            let victim = cache.org.last_replaced.expect("full cache must evict");
            assert!(!cache.org.resident.contains_key(&victim));
            assert!(cache.org.resident.contains_key(&line));
            assert_eq!(cache.org.resident.len(), 3);
            assert_eq!(cache.requests, 4 + request as u64);
        }
    }
}
