//! HashTable implementation
//!
//! `Vec<Option<Entry>>` with `2^logsize` slots and linear probing.

use std::mem;

use crate::config::StoreConfig;
use crate::error::{HcfgError, Result};

use super::{hash_slot, Entry};

/// Outcome of probing for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Slot holding the key
    Found(usize),

    /// First empty slot on the probe path (where the key would go)
    Vacant(usize),

    /// Every slot was visited without finding the key or a gap
    Full,
}

/// Open-addressing table of case-insensitive string keys
///
/// ## Invariants
/// - `slots.len() == 1 << logsize`
/// - `count` equals the number of occupied slots
/// - every entry is reachable by probing forward from its home slot
///   without crossing an empty slot
#[derive(Debug, Clone)]
pub struct HashTable {
    /// Slot array
    slots: Vec<Option<Entry>>,

    /// Number of live entries
    count: usize,

    /// Current size exponent
    logsize: u32,

    /// Growth policy
    config: StoreConfig,
}

impl HashTable {
    /// Create an empty table sized by `config.initial_logsize`
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let slots = allocate_slots(1usize << config.initial_logsize)?;

        Ok(Self {
            slots,
            count: 0,
            logsize: config.initial_logsize,
            config,
        })
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn logsize(&self) -> u32 {
        self.logsize
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Probe for `key`, ignoring ASCII case
    pub fn find(&self, key: &str) -> Probe {
        let mask = self.slots.len() - 1;
        let home = hash_slot(key, self.logsize);
        let mut idx = home;

        loop {
            match &self.slots[idx] {
                None => return Probe::Vacant(idx),
                Some(entry) if entry.key.eq_ignore_ascii_case(key) => return Probe::Found(idx),
                Some(_) => {}
            }

            idx = (idx + 1) & mask;
            if idx == home {
                return Probe::Full;
            }
        }
    }

    /// Look up the entry for `key`
    pub fn get(&self, key: &str) -> Option<&Entry> {
        match self.find(key) {
            Probe::Found(idx) => self.slots[idx].as_ref(),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Insert a new entry or replace the value of an existing one
    ///
    /// Returns the previous value when the key was already present; the
    /// stored key keeps its original spelling in that case. A failed growth
    /// step after a successful insert is only logged.
    pub fn insert(&mut self, key: String, value: String) -> Result<Option<String>> {
        match self.find(&key) {
            Probe::Found(idx) => Ok(self.slots[idx]
                .as_mut()
                .map(|entry| mem::replace(&mut entry.value, value))),
            Probe::Vacant(idx) => {
                self.slots[idx] = Some(Entry { key, value });
                self.count += 1;

                if self.count * 100 / self.capacity() > self.config.growth_threshold {
                    if let Err(e) = self.resize(self.logsize + 1) {
                        tracing::warn!(
                            "Table growth to logsize {} failed, continuing at {}% load: {}",
                            self.logsize + 1,
                            self.count * 100 / self.capacity(),
                            e
                        );
                    }
                }
                Ok(None)
            }
            Probe::Full => Err(HcfgError::TableFull {
                capacity: self.capacity(),
            }),
        }
    }

    /// Remove the entry for `key`
    ///
    /// Entries further along the probe chain are shifted back into the
    /// vacated slot when their home slot does not lie between the hole and
    /// their current position, so no lookup ever stops early at the hole.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let mut hole = match self.find(key) {
            Probe::Found(idx) => idx,
            Probe::Vacant(_) | Probe::Full => return None,
        };

        let removed = self.slots[hole].take();
        self.count -= 1;

        let mask = self.slots.len() - 1;
        let mut idx = (hole + 1) & mask;
        loop {
            let home = match &self.slots[idx] {
                Some(entry) => hash_slot(&entry.key, self.logsize),
                None => break,
            };

            // Leave the entry where it is if its home lies cyclically in (hole, idx]
            let reachable = if hole <= idx {
                hole < home && home <= idx
            } else {
                hole < home || home <= idx
            };

            if !reachable {
                self.slots[hole] = self.slots[idx].take();
                hole = idx;
            }
            idx = (idx + 1) & mask;
        }

        removed
    }

    /// Rehash every entry into a table of `2^new_logsize` slots
    ///
    /// Entries are moved, not copied. Shrinking is allowed as long as one
    /// slot stays free after the move.
    pub fn resize(&mut self, new_logsize: u32) -> Result<()> {
        if new_logsize == self.logsize {
            return Ok(());
        }

        if new_logsize == 0 || new_logsize > self.config.max_logsize {
            return Err(HcfgError::InvalidArgument(format!(
                "table logsize {} outside 1..={}",
                new_logsize, self.config.max_logsize
            )));
        }

        let new_capacity = 1usize << new_logsize;
        if self.count >= new_capacity {
            return Err(HcfgError::InvalidArgument(format!(
                "{} entries do not fit in {} slots",
                self.count, new_capacity
            )));
        }

        let mut new_slots = allocate_slots(new_capacity)?;
        let mask = new_capacity - 1;

        for entry in self.slots.drain(..).flatten() {
            let mut idx = hash_slot(&entry.key, new_logsize);
            while new_slots[idx].is_some() {
                idx = (idx + 1) & mask;
            }
            new_slots[idx] = Some(entry);
        }

        tracing::debug!(
            "Resized table: logsize {} -> {} ({} entries)",
            self.logsize,
            new_logsize,
            self.count
        );

        self.slots = new_slots;
        self.logsize = new_logsize;

        if self.logsize > self.config.warn_logsize {
            tracing::warn!(
                "Internal hash grew beyond expectation: logsize {} ({} slots)",
                self.logsize,
                self.slots.len()
            );
        }

        Ok(())
    }

    /// Drop every entry, keeping the current size
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.count = 0;
    }

    /// Deep copy with fallible allocation
    ///
    /// The copy has the same size and slot layout. If any allocation fails,
    /// everything cloned so far is dropped and the error is returned.
    pub fn try_clone(&self) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(self.slots.len())
            .map_err(|e| HcfgError::Allocation(format!("{} slots: {}", self.slots.len(), e)))?;

        for slot in &self.slots {
            let copy = match slot {
                Some(entry) => Some(Entry {
                    key: try_clone_str(&entry.key)?,
                    value: try_clone_str(&entry.value)?,
                }),
                None => None,
            };
            slots.push(copy);
        }

        Ok(Self {
            slots,
            count: self.count,
            logsize: self.logsize,
            config: self.config,
        })
    }

    /// Iterate live entries in slot order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.count,
        }
    }
}

impl Default for HashTable {
    fn default() -> Self {
        let config = StoreConfig::default();
        let mut slots = Vec::new();
        slots.resize_with(1usize << config.initial_logsize, || None);

        Self {
            slots,
            count: 0,
            logsize: config.initial_logsize,
            config,
        }
    }
}

/// Iterator over live entries, in slot order
pub struct Iter<'a> {
    slots: std::slice::Iter<'a, Option<Entry>>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(entry) = slot {
                self.remaining -= 1;
                return Some((entry.key.as_str(), entry.value.as_str()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn allocate_slots(capacity: usize) -> Result<Vec<Option<Entry>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|e| HcfgError::Allocation(format!("{} slots: {}", capacity, e)))?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

fn try_clone_str(s: &str) -> Result<String> {
    let mut copy = String::new();
    copy.try_reserve_exact(s.len())
        .map_err(|e| HcfgError::Allocation(format!("{} byte string: {}", s.len(), e)))?;
    copy.push_str(s);
    Ok(copy)
}
