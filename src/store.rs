//! Store Module
//!
//! The public configuration store.
//!
//! ## Responsibilities
//! - Case-insensitive get/set/unset over the hash table
//! - Non-overwriting merge of one store into another
//! - Fallible deep copy
//! - Entry points for the line format and the wire format

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};

use crate::config::StoreConfig;
use crate::error::{HcfgError, Result};
use crate::format::{self, LoadReport};
use crate::table::{HashTable, Iter};
use crate::wire;

/// Case-insensitive string configuration store
///
/// Keys set through [`Hcfg::set`] keep their spelling; keys read from the
/// line format are lowercased. Lookups ignore ASCII case either way.
/// Enumeration follows table slot order, not insertion order.
#[derive(Debug, Clone)]
pub struct Hcfg {
    table: HashTable,
}

impl Hcfg {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self {
            table: HashTable::default(),
        }
    }

    /// Create an empty store with a custom configuration
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            table: HashTable::new(config)?,
        })
    }

    /// Deep copy that reports allocation failure instead of aborting
    ///
    /// The copy keeps the table size and shares no memory with `self`.
    pub fn try_copy(&self) -> Result<Self> {
        Ok(Self {
            table: self.table.try_clone()?,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the value for `key`, ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(|entry| entry.value.as_str())
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.get(key).is_some()
    }

    /// Set or delete a key
    ///
    /// `Some(value)` inserts or replaces; `None` deletes, and deleting a
    /// missing key is not an error.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => {
                if key.is_empty() {
                    return Err(HcfgError::InvalidArgument("empty key".to_string()));
                }
                self.table.insert(key.to_owned(), value.to_owned())?;
            }
            None => {
                self.table.remove(key);
            }
        }
        Ok(())
    }

    /// Delete `key`, returning its value if it was present
    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.table.remove(key).map(|entry| entry.value)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of table slots
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Table size exponent (capacity = 2^logsize)
    pub fn logsize(&self) -> u32 {
        self.table.logsize()
    }

    pub fn config(&self) -> &StoreConfig {
        self.table.config()
    }

    /// Remove every entry, keeping the table size
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Resize the table to `2^logsize` slots
    pub fn resize(&mut self, logsize: u32) -> Result<()> {
        self.table.resize(logsize)
    }

    /// Iterate `(key, value)` pairs in slot order
    pub fn iter(&self) -> Iter<'_> {
        self.table.iter()
    }

    /// Iterate keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.iter().map(|(key, _)| key)
    }

    pub(crate) fn table_mut(&mut self) -> &mut HashTable {
        &mut self.table
    }

    // =========================================================================
    // Typed Accessors
    // =========================================================================

    /// Parse the value for `key` with `FromStr`
    ///
    /// Surrounding whitespace is ignored. Returns `Ok(None)` when the key is
    /// absent.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid_value(key, value)),
        }
    }

    /// Interpret the value for `key` as a boolean
    ///
    /// Accepts `1/true/yes/on` and `0/false/no/off`, in any case.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(invalid_value(key, value)),
        }
    }

    /// Interpret the value for `key` as a signed integer
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_parsed(key)
    }

    /// Interpret the value for `key` as a floating point number
    pub fn get_real(&self, key: &str) -> Result<Option<f64>> {
        self.get_parsed(key)
    }

    // =========================================================================
    // Combining Stores
    // =========================================================================

    /// Copy in every entry of `src` whose key is absent here
    ///
    /// Existing keys are never overwritten, so the first store merged in
    /// wins.
    pub fn merge(&mut self, src: &Hcfg) -> Result<()> {
        for (key, value) in src.iter() {
            if self.contains_key(key) {
                continue;
            }
            self.table.insert(key.to_owned(), value.to_owned())?;
        }
        Ok(())
    }

    // =========================================================================
    // Line Format
    // =========================================================================

    /// Read `key=value` lines from `reader`
    ///
    /// The reader stays open; pass `&mut file` to keep using it afterwards.
    /// On a structural error the entries read so far remain in the store.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<LoadReport> {
        format::load(self, reader)
    }

    /// Open `path` and load it; the file is closed before returning
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let file = File::open(path.as_ref())?;
        self.load(file)
    }

    /// Write every entry as a `key=value` line
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        format::write(self, writer)
    }

    /// Create (or truncate) `path` and write the store to it
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write(BufWriter::new(file))
    }

    // =========================================================================
    // Wire Format
    // =========================================================================

    /// Encode the store in the length-prefixed wire format
    pub fn serialize(&self) -> Result<Bytes> {
        wire::serialize(self)
    }

    /// Append the wire encoding to `buf`, returning the bytes written
    pub fn serialize_into(&self, buf: &mut BytesMut) -> Result<usize> {
        wire::serialize_into(self, buf)
    }

    /// Decode wire-format entries into this store
    ///
    /// Returns the number of bytes consumed. After an error the store may
    /// be partially populated and should be discarded.
    pub fn deserialize(&mut self, input: &[u8]) -> Result<usize> {
        wire::deserialize_into(self, input)
    }
}

impl Default for Hcfg {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Hcfg {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn invalid_value(key: &str, value: &str) -> HcfgError {
    HcfgError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
