//! Utility types for reading ledger binary data.
//!
//! Provides compact-size (`VarInt`) decoding and the `ByteReader` cursor
//! used to walk fixed and variable-length fields of serialized records.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A compact-size variable-length integer.
///
/// A first byte below `0xfd` is the value itself. The prefixes `0xfd`,
/// `0xfe` and `0xff` announce a following 2, 4 or 8-byte little-endian
/// value, so an encoding occupies 1, 3, 5 or 9 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the start of a byte slice.
    ///
    /// # Arguments
    /// * `data` - Byte slice starting with a compact-size encoding. Bytes
    ///   past the encoding are ignored.
    ///
    /// # Returns
    /// A tuple of `(VarInt, bytes_consumed)`, or `UnexpectedEof` when the
    /// slice is shorter than the prefix demands.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let prefix = *data.first().ok_or(PrimitivesError::UnexpectedEof {
            needed: 1,
            available: 0,
        })?;
        let consumed = match prefix {
            0xff => 9,
            0xfe => 5,
            0xfd => 3,
            b => return Ok((VarInt(b as u64), 1)),
        };
        if data.len() < consumed {
            return Err(PrimitivesError::UnexpectedEof {
                needed: consumed,
                available: data.len(),
            });
        }
        let mut buf = [0u8; 8];
        buf[..consumed - 1].copy_from_slice(&data[1..consumed]);
        Ok((VarInt(u64::from_le_bytes(buf)), consumed))
    }

    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector using the minimal form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        match self.length() {
            1 => buf.push(v as u8),
            3 => {
                buf.push(0xfd);
                buf.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                buf.push(0xfe);
                buf.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                buf.push(0xff);
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor-based reader over serialized ledger data.
///
/// Wraps a byte slice and maintains a read position, providing methods
/// to read fixed-size little-endian integers and compact-size values.
/// Every read is bounds-checked and reports how many bytes were missing.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof {
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Advance the position by `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<(), PrimitivesError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a little-endian u32 and advance the position by 4 bytes.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a compact-size integer and advance past its encoding.
    ///
    /// # Returns
    /// The decoded `VarInt` together with the number of bytes it occupied.
    pub fn read_varint(&mut self) -> Result<(VarInt, usize), PrimitivesError> {
        let (varint, consumed) = VarInt::from_bytes(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok((varint, consumed))
    }

    /// Return the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}
