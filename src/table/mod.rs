//! Hash Table Module
//!
//! Open-addressing storage behind every configuration store.
//!
//! ## Responsibilities
//! - Case-insensitive key lookup (FNV-1a with ASCII case folding)
//! - Linear probing for collision resolution
//! - Doubling once the load factor crosses the configured threshold
//! - Deletion without tombstones (probe chains repaired by back-shifting)
//!
//! ## Layout
//! ```text
//! slot:   0      1      2      3      4      5      6      7
//!       ┌──────┬──────┬──────┬──────┬──────┬──────┬──────┬──────┐
//!       │ None │ a=1  │ b=2  │ None │ None │ c=3  │ None │ None │
//!       └──────┴──────┴──────┴──────┴──────┴──────┴──────┴──────┘
//!                 ▲      │
//!                 └ home ┘  (b collided with a, probed one slot forward)
//! ```

mod hash;
mod hash_table;

pub use hash::{fnv1a_folded, hash_slot, FNV_OFFSET_BASIS, FNV_PRIME};
pub use hash_table::{HashTable, Iter, Probe};

/// A live key/value pair occupying one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Key as inserted; compared without regard to ASCII case
    pub key: String,

    /// Owned value string
    pub value: String,
}
