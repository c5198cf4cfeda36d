//! Big-endian byte cursor used by every decoder in this crate.
//!
//! Two flavours of read are provided. The `read_*_at` family is pure: it
//! reads at an explicit offset and never moves the cursor. The `parse_*`
//! family reads at the current offset and advances past what it read. A failed
//! read never advances the cursor.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum ParseError {
    /// A read wanted more bytes than were left in the buffer. `offset` is the
    /// absolute position of the read within the outermost input.
    #[error("wanted {wanted} byte(s) at offset {offset:#x}, but only {available} remain")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        available: usize,
    },

    /// A literal byte sequence did not match.
    #[error("unexpected byte at offset {offset:#x}")]
    Mismatch { offset: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ByteParser<'src> {
    src: &'src [u8],
    /// Position of the cursor, relative to the start of `src`.
    pub offset: usize,
    /// Absolute position of `src[0]` in the outermost buffer. Non-zero only
    /// for parsers created by `split`.
    base: usize,
}

impl<'src> ByteParser<'src> {
    pub fn new(src: &'src [u8]) -> Self {
        ByteParser {
            src,
            offset: 0,
            base: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.src.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Absolute offset of the cursor within the outermost input buffer.
    pub fn position(&self) -> usize {
        self.base + self.offset
    }

    fn slice_at(&self, offset: usize, len: usize) -> ParseResult<&'src [u8]> {
        let available = self.src.len().saturating_sub(offset);
        if available < len {
            Err(ParseError::OutOfBounds {
                offset: self.base + offset,
                wanted: len,
                available,
            })
        } else {
            Ok(&self.src[offset..offset + len])
        }
    }

    pub fn read_u8_at(&self, offset: usize) -> ParseResult<u8> {
        self.slice_at(offset, 1).map(|b| b[0])
    }

    pub fn read_u16_at(&self, offset: usize) -> ParseResult<u16> {
        self.slice_at(offset, 2).map(BigEndian::read_u16)
    }

    pub fn read_u32_at(&self, offset: usize) -> ParseResult<u32> {
        self.slice_at(offset, 4).map(BigEndian::read_u32)
    }

    pub fn read_i8_at(&self, offset: usize) -> ParseResult<i8> {
        self.read_u8_at(offset).map(|b| b as i8)
    }

    pub fn read_i16_at(&self, offset: usize) -> ParseResult<i16> {
        self.slice_at(offset, 2).map(BigEndian::read_i16)
    }

    pub fn read_i32_at(&self, offset: usize) -> ParseResult<i32> {
        self.slice_at(offset, 4).map(BigEndian::read_i32)
    }

    pub fn read_i64_at(&self, offset: usize) -> ParseResult<i64> {
        self.slice_at(offset, 8).map(BigEndian::read_i64)
    }

    /// Takes `tag.len()` bytes and returns an error if the bytes did not match.
    pub fn expect(&mut self, tag: &[u8]) -> ParseResult<()> {
        let found = self.slice_at(self.offset, tag.len())?;
        match found.iter().zip(tag).position(|(a, b)| a != b) {
            Some(i) => Err(ParseError::Mismatch {
                offset: self.position() + i,
            }),
            None => {
                self.offset += tag.len();
                Ok(())
            }
        }
    }

    /// Takes `len` bytes, and errors if there were not enough bytes remaining.
    pub fn take(&mut self, len: usize) -> ParseResult<&'src [u8]> {
        let res = self.slice_at(self.offset, len)?;
        self.offset += len;
        Ok(res)
    }

    /// Like `take`, but hands back a parser over the taken bytes that still
    /// reports absolute positions.
    pub fn split(&mut self, len: usize) -> ParseResult<ByteParser<'src>> {
        let base = self.position();
        self.take(len).map(|src| ByteParser {
            src,
            offset: 0,
            base,
        })
    }

    /// Like `take`, but does not advance the parser.
    pub fn peek(&self, len: usize) -> ParseResult<&'src [u8]> {
        self.slice_at(self.offset, len)
    }

    /// Applies `func` exactly `len` times, and returns a vector of the items
    /// produced by `func`.
    pub fn seq<F, T, E>(&mut self, len: usize, mut func: F) -> Result<Vec<T>, E>
    where
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(func(self)?);
        }
        Ok(vec)
    }

    pub fn parse_u8(&mut self) -> ParseResult<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn parse_u16(&mut self) -> ParseResult<u16> {
        self.take(2).map(BigEndian::read_u16)
    }

    pub fn parse_u32(&mut self) -> ParseResult<u32> {
        self.take(4).map(BigEndian::read_u32)
    }

    pub fn parse_u64(&mut self) -> ParseResult<u64> {
        self.take(8).map(BigEndian::read_u64)
    }

    pub fn parse_i8(&mut self) -> ParseResult<i8> {
        self.take(1).map(|b| b[0] as i8)
    }

    pub fn parse_i16(&mut self) -> ParseResult<i16> {
        self.take(2).map(BigEndian::read_i16)
    }

    pub fn parse_i32(&mut self) -> ParseResult<i32> {
        self.take(4).map(BigEndian::read_i32)
    }

    pub fn parse_i64(&mut self) -> ParseResult<i64> {
        self.take(8).map(BigEndian::read_i64)
    }
}
