pub mod oldest;
pub mod random;

use std::collections::BTreeMap;

/// Picks the victim among resident lines (line number -> insertion request
/// index). Only invoked on a capacity miss, so the map is never empty.
pub trait Displace {
    fn pick(&mut self, resident: &BTreeMap<u64, u64>) -> u64;
}
