//! Configuration for the hcfg store
//!
//! Centralized tuning knobs for the hash table and the line reader, with
//! sensible defaults.

use crate::error::{HcfgError, Result};

/// Largest table size exponent the 32-bit slot hash can address
pub const MAX_HASH_BITS: u32 = 31;

/// Tuning parameters for an [`Hcfg`](crate::Hcfg) instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Hash Table Configuration
    // -------------------------------------------------------------------------
    /// Table size exponent for a freshly created store (capacity = 2^n)
    pub initial_logsize: u32,

    /// Load factor, in percent, above which the table doubles
    pub growth_threshold: usize,

    /// Resizing beyond this exponent emits a warning
    pub warn_logsize: u32,

    /// Hard upper bound on the table size exponent
    pub max_logsize: u32,

    // -------------------------------------------------------------------------
    // Line Reader Configuration
    // -------------------------------------------------------------------------
    /// Size of the line scanner buffer (in bytes)
    /// Lines that do not fit, terminator included, are skipped.
    pub line_buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_logsize: 8,
            growth_threshold: 50,
            warn_logsize: 16,
            max_logsize: 28,
            line_buffer_size: 4096,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Check that the parameters describe a usable table
    pub fn validate(&self) -> Result<()> {
        if self.initial_logsize == 0 || self.initial_logsize > self.max_logsize {
            return Err(HcfgError::InvalidArgument(format!(
                "initial_logsize {} must be within 1..={}",
                self.initial_logsize, self.max_logsize
            )));
        }
        if self.max_logsize > MAX_HASH_BITS {
            return Err(HcfgError::InvalidArgument(format!(
                "max_logsize {} exceeds the {}-bit slot index",
                self.max_logsize, MAX_HASH_BITS
            )));
        }
        if !(1..=99).contains(&self.growth_threshold) {
            return Err(HcfgError::InvalidArgument(format!(
                "growth_threshold {} must be within 1..=99",
                self.growth_threshold
            )));
        }
        if self.line_buffer_size < 2 {
            return Err(HcfgError::InvalidArgument(format!(
                "line_buffer_size {} is too small",
                self.line_buffer_size
            )));
        }
        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the starting table size exponent
    pub fn initial_logsize(mut self, logsize: u32) -> Self {
        self.config.initial_logsize = logsize;
        self
    }

    /// Set the growth threshold (percent load)
    pub fn growth_threshold(mut self, percent: usize) -> Self {
        self.config.growth_threshold = percent;
        self
    }

    /// Set the exponent above which resizes are reported
    pub fn warn_logsize(mut self, logsize: u32) -> Self {
        self.config.warn_logsize = logsize;
        self
    }

    /// Set the largest permitted table size exponent
    pub fn max_logsize(mut self, logsize: u32) -> Self {
        self.config.max_logsize = logsize;
        self
    }

    /// Set the line scanner buffer size (in bytes)
    pub fn line_buffer_size(mut self, size: usize) -> Self {
        self.config.line_buffer_size = size;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
