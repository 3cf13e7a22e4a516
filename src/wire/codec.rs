//! Wire codec
//!
//! Encoding and decoding of a store snapshot.
//!
//! ## Wire Format
//! ```text
//! hcfg:<count> <logsize> <len>"<key>" <len>"<value>" <len>"<key>" ...
//! └──── header ────────┘ └──────────── count pairs ─────────────┘
//! ```
//!
//! - `count` and `logsize` are unsigned decimal integers.
//! - Every string is its decimal byte length, a `"`, exactly that many raw
//!   bytes, a closing `"` and one space. Embedded quotes, spaces and
//!   newlines need no escaping because the length is authoritative.
//! - The decoder skips whitespace before each number; everything else must
//!   match exactly.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{HcfgError, Result};
use crate::store::Hcfg;

/// Literal header prefix
pub const WIRE_MAGIC: &[u8] = b"hcfg:";

/// Maximum length of a single encoded string (16 MB)
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

// =============================================================================
// Encoding
// =============================================================================

/// Append the encoding of `store` to `buf`
///
/// Returns the number of bytes appended. On error `buf` is restored to its
/// original length.
pub fn serialize_into(store: &Hcfg, buf: &mut BytesMut) -> Result<usize> {
    let start = buf.len();

    let result = encode(store, buf);
    if result.is_err() {
        buf.truncate(start);
    }
    result.map(|()| buf.len() - start)
}

/// Encode `store` into a fresh buffer
pub fn serialize(store: &Hcfg) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(encoded_len_hint(store));
    serialize_into(store, &mut buf)?;
    Ok(buf.freeze())
}

fn encode(store: &Hcfg, buf: &mut BytesMut) -> Result<()> {
    buf.put_slice(WIRE_MAGIC);
    buf.put_slice(format!("{} {} ", store.len(), store.logsize()).as_bytes());

    for (key, value) in store.iter() {
        encode_str(buf, key)?;
        encode_str(buf, value)?;
    }
    Ok(())
}

/// Append one length-prefixed string
fn encode_str(buf: &mut BytesMut, s: &str) -> Result<()> {
    if s.len() > MAX_STRING_LEN {
        return Err(HcfgError::InvalidArgument(format!(
            "string of {} bytes exceeds wire limit of {}",
            s.len(),
            MAX_STRING_LEN
        )));
    }

    buf.put_slice(s.len().to_string().as_bytes());
    buf.put_u8(b'"');
    buf.put_slice(s.as_bytes());
    buf.put_slice(b"\" ");
    Ok(())
}

fn encoded_len_hint(store: &Hcfg) -> usize {
    let strings: usize = store
        .iter()
        .map(|(key, value)| key.len() + value.len() + 2 * 12)
        .sum();
    WIRE_MAGIC.len() + 24 + strings
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a snapshot from `input` into `store`
///
/// The store is resized once to the declared logsize before any entry is
/// inserted. Returns the number of bytes consumed. On error the store may
/// hold some of the decoded entries and should be discarded.
pub fn deserialize_into(store: &mut Hcfg, input: &[u8]) -> Result<usize> {
    let mut decoder = Decoder::new(input);

    let (count, logsize) = decoder.header()?;
    store.resize(logsize)?;

    for _ in 0..count {
        let key_offset = decoder.pos;
        let key = decoder.string()?;
        let value = decoder.string()?;

        if key.is_empty() {
            return Err(HcfgError::wire(key_offset, "empty key"));
        }
        store.table_mut().insert(key, value)?;
    }

    Ok(decoder.pos)
}

/// Cursor over the encoded bytes
struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse `hcfg:<count> <logsize> `
    fn header(&mut self) -> Result<(usize, u32)> {
        self.skip_space();
        if !self.input[self.pos..].starts_with(WIRE_MAGIC) {
            return Err(HcfgError::wire(self.pos, "missing hcfg: header"));
        }
        self.pos += WIRE_MAGIC.len();

        let count = self.number("entry count")?;
        let logsize_offset = self.pos;
        let logsize = self.number("table logsize")?;
        let logsize = u32::try_from(logsize)
            .map_err(|_| HcfgError::wire(logsize_offset, format!("logsize {} too large", logsize)))?;

        self.skip_one_space();
        Ok((count, logsize))
    }

    /// Parse `<len>"<bytes>" `
    fn string(&mut self) -> Result<String> {
        let len_offset = self.pos;
        let len = self.number("string length")?;
        if len > MAX_STRING_LEN {
            return Err(HcfgError::wire(
                len_offset,
                format!("string length {} exceeds limit of {}", len, MAX_STRING_LEN),
            ));
        }

        self.expect(b'"', "opening quote")?;

        let available = self.input.len() - self.pos;
        if len > available {
            return Err(HcfgError::wire(
                self.pos,
                format!("truncated string: expected {} bytes, {} available", len, available),
            ));
        }
        let start = self.pos;
        self.pos += len;

        self.expect(b'"', "closing quote (string length mismatch)")?;
        self.skip_one_space();

        String::from_utf8(self.input[start..start + len].to_vec())
            .map_err(|_| HcfgError::wire(start, "string is not valid UTF-8"))
    }

    /// Parse an unsigned decimal integer, skipping leading whitespace
    fn number(&mut self, what: &str) -> Result<usize> {
        self.skip_space();
        let start = self.pos;
        let mut value: usize = 0;

        while let Some(&byte) = self.input.get(self.pos) {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(byte - b'0')))
                .ok_or_else(|| HcfgError::wire(start, format!("{} overflows", what)))?;
            self.pos += 1;
        }

        if self.pos == start {
            return Err(HcfgError::wire(start, format!("expected {}", what)));
        }
        Ok(value)
    }

    fn expect(&mut self, byte: u8, what: &str) -> Result<()> {
        match self.input.get(self.pos) {
            Some(&b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(HcfgError::wire(self.pos, format!("expected {}", what))),
        }
    }

    fn skip_space(&mut self) {
        while self.input.get(self.pos).is_some_and(|&b| is_space_byte(b)) {
            self.pos += 1;
        }
    }

    fn skip_one_space(&mut self) {
        if self.input.get(self.pos).is_some_and(|&b| is_space_byte(b)) {
            self.pos += 1;
        }
    }
}

fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}
