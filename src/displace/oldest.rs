use std::collections::BTreeMap;

use super::Displace;

/// Evicts the line with the smallest insertion stamp. Equal stamps fall to
/// the lowest line number: the map iterates ascending by line and the first
/// minimum wins.
#[derive(Debug, Clone, Default)]
pub struct Oldest;

impl Oldest {
    pub fn new() -> Self {
        Oldest
    }
}

impl Displace for Oldest {
    fn pick(&mut self, resident: &BTreeMap<u64, u64>) -> u64 {
        let (&line, _) = resident
            .iter()
            .min_by_key(|&(_, &stamp)| stamp)
            .expect("displacement over an empty cache");
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_minimum_stamp() {
        let resident = BTreeMap::from([(5, 3), (2, 9), (9, 1)]);
        assert_eq!(Oldest::new().pick(&resident), 9);
    }

    #[test]
    fn ties_fall_to_the_lowest_line() {
        let resident = BTreeMap::from([(7, 2), (3, 2), (5, 2)]);
        assert_eq!(Oldest::new().pick(&resident), 3);
    }
}
