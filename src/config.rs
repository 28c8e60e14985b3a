use crate::{
    cache::{Cache, CacheSim},
    displace::{oldest::Oldest, random::Rand},
    error::SimError,
};

pub const LINE_SIZE: u64 = 64;
pub const TOTAL_SIZE: u64 = 3 * 1024;

/// Mode index into the five preconfigured scenarios, plus the set count the
/// set-associative modes consume.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub mode: usize,
    pub sets: usize,
}

impl Scenario {
    /// Builds the named cache for this scenario. The label keys the results
    /// dump file.
    pub fn build(&self) -> Result<(String, Box<dyn CacheSim>), SimError> {
        Ok(match self.mode {
            0 => (
                "direct".into(),
                Box::new(Cache::direct(LINE_SIZE, TOTAL_SIZE)?),
            ),
            1 => (
                "associative_oldest".into(),
                Box::new(Cache::fully_associative(
                    LINE_SIZE,
                    TOTAL_SIZE,
                    Oldest::new(),
                )?),
            ),
            2 => (
                "associative_random".into(),
                Box::new(Cache::fully_associative(LINE_SIZE, TOTAL_SIZE, Rand::new())?),
            ),
            3 => (
                format!("set_{}_oldest", self.sets),
                Box::new(Cache::set_associative(
                    LINE_SIZE,
                    TOTAL_SIZE,
                    self.sets,
                    Oldest::new(),
                )?),
            ),
            4 => (
                format!("set_{}_random", self.sets),
                Box::new(Cache::set_associative(
                    LINE_SIZE,
                    TOTAL_SIZE,
                    self.sets,
                    Rand::new(),
                )?),
            ),
            mode => return Err(SimError::UnknownMode(mode)),
        })
    }
}
