//! Variable-length length prefixes ("compact-u16" / shortvec).
//!
//! Every array in the wire format is prefixed with its length, 7 bits per
//! byte, low group first, with `0x80` set on every byte except the last.
//!
//! - Values 0..0x7f       -> 1 byte
//! - Values 0x80..0x3fff  -> 2 bytes
//! - Values 0x4000..      -> 3+ bytes

use crate::error::DecodeError;

/// A `u64` needs at most ten 7-bit groups.
const MAX_ENCODING_LENGTH: usize = 10;

/// Encode a length prefix.
pub fn encode_length(value: u64) -> Vec<u8> {
    let mut val = value;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a length prefix from the start of `data`.
///
/// Returns `(value, bytes_consumed)`. Running out of input while the
/// continuation bit is set is [`DecodeError::Truncated`]; an encoding that
/// would overflow a `u64` is [`DecodeError::Invalid`].
pub fn decode_length(data: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value: u64 = 0;
    let mut consumed = 0usize;

    loop {
        let Some(&byte) = data.get(consumed) else {
            return Err(DecodeError::Truncated {
                needed: consumed + 1,
                remaining: data.len(),
            });
        };
        if consumed == MAX_ENCODING_LENGTH {
            return Err(DecodeError::Invalid("length prefix overflows u64".into()));
        }

        let group = (byte & 0x7f) as u64;
        let shift = 7 * consumed as u32;
        if shift == 63 && group > 1 {
            return Err(DecodeError::Invalid("length prefix overflows u64".into()));
        }
        value |= group << shift;
        consumed += 1;

        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((value, consumed))
}

/// A forward-only cursor over wire bytes.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(DecodeError::Truncated {
                needed: len,
                remaining,
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a length prefix and convert it to `usize`.
    pub(crate) fn read_length(&mut self) -> Result<usize, DecodeError> {
        let (value, consumed) = decode_length(self.remaining())?;
        self.pos += consumed;
        usize::try_from(value)
            .map_err(|_| DecodeError::Invalid(format!("length {value} does not fit in memory")))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }
}
