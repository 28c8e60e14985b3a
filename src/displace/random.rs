use std::collections::BTreeMap;

use super::Displace;

/// Evicts a uniformly random resident line.
#[derive(Debug)]
pub struct Rand {
    rng: fastrand::Rng,
}

impl Rand {
    pub fn new() -> Self {
        Rand {
            rng: fastrand::Rng::new(),
        }
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Rand {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Clone for Rand {
    // Each clone is freshly seeded so composed sets draw distinct streams.
    fn clone(&self) -> Self {
        Rand::new()
    }
}

impl Displace for Rand {
    fn pick(&mut self, resident: &BTreeMap<u64, u64>) -> u64 {
        let nth = self.rng.usize(..resident.len());
        *resident
            .keys()
            .nth(nth)
            .expect("displacement over an empty cache")
    }
}
