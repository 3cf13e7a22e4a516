//! # hcfg
//!
//! A case-insensitive configuration store for tuning frameworks, with:
//! - Open-addressing hash table (FNV-1a, linear probing, doubling growth)
//! - Line-oriented `key=value` text format with `#` comments
//! - Length-prefixed wire format for shipping state between processes
//! - Non-overwriting merge and fallible deep copy
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Hcfg (store)                          │
//! │        get / set / unset / merge / try_copy / iter           │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     format      │                │      wire       │
//!   │ key=value lines │                │ hcfg:<n> <log>  │
//!   └────────┬────────┘                └────────┬────────┘
//!            │                                  │
//!            └───────────────┬──────────────────┘
//!                            ▼
//!                   ┌─────────────────┐
//!                   │    HashTable    │
//!                   │ (open address)  │
//!                   └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use hcfg::Hcfg;
//!
//! let mut cfg = Hcfg::new();
//! cfg.load("Alpha = 1\n# comment\n\nBeta=2\n".as_bytes()).unwrap();
//! assert_eq!(cfg.get("ALPHA"), Some("1"));
//!
//! let wire = cfg.serialize().unwrap();
//! let mut copy = Hcfg::new();
//! copy.deserialize(&wire).unwrap();
//! assert_eq!(copy.get("beta"), Some("2"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod store;
pub mod format;
pub mod wire;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HcfgError, ParseErrorKind, Result};
pub use config::StoreConfig;
pub use format::{LoadReport, LoadWarning};
pub use store::Hcfg;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hcfg
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
