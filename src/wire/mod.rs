//! Wire Module
//!
//! Compact, length-prefixed snapshot format for shipping a store across a
//! process or network boundary.
//!
//! ## Example
//! ```text
//! hcfg:2 8 5"alpha" 1"1" 4"beta" 1"2"
//! ```
//!
//! The declared logsize lets the receiver size its table once up front
//! instead of growing while entries arrive.

mod codec;

pub use codec::{deserialize_into, serialize, serialize_into, MAX_STRING_LEN, WIRE_MAGIC};
