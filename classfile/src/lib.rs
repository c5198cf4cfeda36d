pub mod access;
pub mod attribute;
pub mod class;
pub mod code;
pub mod constant;
pub mod descriptor;
pub mod field;
pub mod method;
mod mutf8;
pub mod opcode;
pub mod options;
pub mod parse;

pub use crate::{
    access::{AccessFlags, AccessTarget, Flag},
    class::{Class, DecodeError, Section, Version},
    constant::{Constant, ConstantPool, PoolIndex},
    mutf8::*,
    options::DecodeOptions,
    parse::{ByteParser, ParseError},
};

use thiserror::Error;

pub type ClassResult<T> = Result<T, ClassError>;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum ClassError {
    #[error(transparent)]
    Truncated(#[from] ParseError),

    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    // Constant pool errors
    #[error("malformed constant pool")]
    MalformedPool(#[from] PoolFault),
    #[error("constant pool entry #{index} is {found}, expected {expected}")]
    BadPoolReference {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid descriptor {0:?}")]
    InvalidDescriptor(String),

    // Code errors
    #[error("unsupported opcode {opcode:#04x} at code offset {offset}")]
    UnsupportedOpcode { offset: usize, opcode: u8 },
    #[error("malformed switch table at code offset {offset}")]
    MalformedSwitch { offset: usize },
    #[error("malformed exception handler range [{start}, {end})")]
    MalformedExceptionRange { start: usize, end: usize },

    #[error("attribute length {0} does not fit in memory")]
    AttributeTooLarge(u32),

    #[error("invalid modified UTF-8 byte {byte:#04x} at offset {offset}")]
    InvalidModifiedUtf8 { offset: usize, byte: u8 },

    #[error("illegal {target} access flags {flags:#06x}")]
    IllegalAccessFlags { target: AccessTarget, flags: u16 },

    /// `inner` happened in the record starting at absolute `offset`.
    #[error("{inner} in record at offset {offset:#x}")]
    Located {
        offset: usize,
        inner: Box<ClassError>,
    },
}

impl ClassError {
    /// Absolute input offset this error already knows about, if any.
    pub fn location(&self) -> Option<usize> {
        match self {
            ClassError::Truncated(ParseError::OutOfBounds { offset, .. })
            | ClassError::Truncated(ParseError::Mismatch { offset })
            | ClassError::InvalidModifiedUtf8 { offset, .. }
            | ClassError::Located { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Pins the error to the record starting at `offset`, unless a more
    /// precise location is already known.
    pub fn at(self, offset: usize) -> ClassError {
        match self.location() {
            Some(_) => self,
            None => ClassError::Located {
                offset,
                inner: Box::new(self),
            },
        }
    }

    /// The error with any `Located` wrapper removed.
    pub fn without_location(self) -> ClassError {
        match self {
            ClassError::Located { inner, .. } => *inner,
            other => other,
        }
    }
}

/// Runs `func` on the record at the cursor, pinning unlocated errors to the
/// record's first byte.
pub(crate) fn located<'src, T, F>(input: &mut ByteParser<'src>, func: F) -> ClassResult<T>
where
    F: FnOnce(&mut ByteParser<'src>) -> ClassResult<T>,
{
    let start = input.position();
    func(input).map_err(|err| err.at(start))
}

/// The ways a constant pool can be structurally broken, as opposed to merely
/// pointing at the wrong kind of entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum PoolFault {
    #[error("declared pool size is zero")]
    ZeroSize,
    #[error("unknown tag {tag} at slot #{index}")]
    UnknownTag { index: u16, tag: u8 },
    #[error("unknown method handle kind {kind} at slot #{index}")]
    UnknownMethodHandleKind { index: u16, kind: u8 },
    #[error("index #0 is never valid")]
    NullIndex,
    #[error("index #{index} is past the end of a pool with {len} slots")]
    OutOfRange { index: u16, len: usize },
    #[error("index #{index} is the unusable upper half of a long or double")]
    UpperHalf { index: u16 },
}
