pub mod assoc;
pub mod direct;
pub mod set_assoc;

use crate::{cache::Cache, error::SimError};

/// The organization-specific residency decision. The probe gets the whole
/// cache: it reads the pre-increment `requests` count, mutates its own
/// occupancy state, and stamps `history` for any line it evicts. A hit must
/// leave `history` untouched. Fallible because a composed inner cache may
/// spill samples to disk during delegation.
pub trait Organization: Sized {
    fn probe(cache: &mut Cache<Self>, line: u64) -> Result<bool, SimError>;
}
