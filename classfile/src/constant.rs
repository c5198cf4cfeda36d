//! # Constant Pool
//! Entries in the constant pool start at 1, and indices into the pool are
//! likewise 1-based. Each entry is comprised of a 1-byte tag, followed by a
//! number of content bytes decided by the tag. Only `Utf8` entries are
//! variable-length; they carry their own 2-byte length prefix.
//!
//! ### Oddities
//! The declared count is one greater than the number of addressable slots.
//!
//! Long and Double entries take up two slots in the constant pool, but the
//! upper slot is never directly referenced. It is kept in the arena as
//! `Constant::Unusable` so that slot arithmetic stays trivial, and resolving
//! it is an error.
//!
//! ```txt
//! tag  kind                 content
//!  1   Utf8                 length: u16, bytes: [u8; length]
//!  3   Integer              i32
//!  4   Float                f32
//!  5   Long                 i64
//!  6   Double               f64
//!  7   Class                name: u16
//!  8   String               utf8: u16
//!  9   FieldRef             class: u16, name_and_type: u16
//! 10   MethodRef            class: u16, name_and_type: u16
//! 11   InterfaceMethodRef   class: u16, name_and_type: u16
//! 12   NameAndType          name: u16, descriptor: u16
//! 15   MethodHandle         kind: u8, reference: u16
//! 16   MethodType           descriptor: u16
//! 17   Dynamic              bootstrap: u16, name_and_type: u16
//! 18   InvokeDynamic        bootstrap: u16, name_and_type: u16
//! 19   Module               name: u16
//! 20   Package              name: u16
//! ```
//!
//! References between entries are stored as plain indices and resolved on
//! access, so an entry may point forwards to a slot that had not been decoded
//! yet when it was read.

use crate::{located, mutf8::decode_mutf8, parse::ByteParser, ClassError, ClassResult, PoolFault};
use tracing::{debug, trace};

/// A 1-based handle into a `ConstantPool`. Any `u16` can be wrapped; whether
/// it actually points at something is checked when it is resolved.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PoolIndex(pub u16);

impl PoolIndex {
    /// For fields where `0` means "absent", such as the superclass.
    pub fn nonzero(raw: u16) -> Option<PoolIndex> {
        match raw {
            0 => None,
            raw => Some(PoolIndex(raw)),
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn parse_index(input: &mut ByteParser<'_>) -> ClassResult<PoolIndex> {
    Ok(PoolIndex(input.parse_u16()?))
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstantTag {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module,
    Package,
}

impl ConstantTag {
    pub fn from_u8(tag: u8) -> Option<ConstantTag> {
        Some(match tag {
            1 => ConstantTag::Utf8,
            3 => ConstantTag::Integer,
            4 => ConstantTag::Float,
            5 => ConstantTag::Long,
            6 => ConstantTag::Double,
            7 => ConstantTag::Class,
            8 => ConstantTag::String,
            9 => ConstantTag::FieldRef,
            10 => ConstantTag::MethodRef,
            11 => ConstantTag::InterfaceMethodRef,
            12 => ConstantTag::NameAndType,
            15 => ConstantTag::MethodHandle,
            16 => ConstantTag::MethodType,
            17 => ConstantTag::Dynamic,
            18 => ConstantTag::InvokeDynamic,
            19 => ConstantTag::Module,
            20 => ConstantTag::Package,
            _ => return None,
        })
    }

    /// Number of content bytes following the tag, or `None` for `Utf8`, whose
    /// length is given by a prefix.
    pub fn fixed_len(self) -> Option<usize> {
        Some(match self {
            ConstantTag::Utf8 => return None,
            ConstantTag::Class
            | ConstantTag::String
            | ConstantTag::MethodType
            | ConstantTag::Module
            | ConstantTag::Package => 2,
            ConstantTag::MethodHandle => 3,
            ConstantTag::Integer
            | ConstantTag::Float
            | ConstantTag::FieldRef
            | ConstantTag::MethodRef
            | ConstantTag::InterfaceMethodRef
            | ConstantTag::NameAndType
            | ConstantTag::Dynamic
            | ConstantTag::InvokeDynamic => 4,
            ConstantTag::Long | ConstantTag::Double => 8,
        })
    }
}

/// Which bytecode behaviour a `MethodHandle` constant stands for.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MethodHandleKind {
    GetField = 1,
    GetStatic = 2,
    PutField = 3,
    PutStatic = 4,
    InvokeVirtual = 5,
    InvokeStatic = 6,
    InvokeSpecial = 7,
    NewInvokeSpecial = 8,
    InvokeInterface = 9,
}

impl MethodHandleKind {
    pub fn from_u8(kind: u8) -> Option<MethodHandleKind> {
        Some(match kind {
            1 => MethodHandleKind::GetField,
            2 => MethodHandleKind::GetStatic,
            3 => MethodHandleKind::PutField,
            4 => MethodHandleKind::PutStatic,
            5 => MethodHandleKind::InvokeVirtual,
            6 => MethodHandleKind::InvokeStatic,
            7 => MethodHandleKind::InvokeSpecial,
            8 => MethodHandleKind::NewInvokeSpecial,
            9 => MethodHandleKind::InvokeInterface,
            _ => return None,
        })
    }

    fn accepts(self, target: &Constant) -> bool {
        use self::MethodHandleKind::*;
        match (self, target) {
            (GetField | GetStatic | PutField | PutStatic, Constant::FieldRef { .. }) => true,
            (InvokeVirtual | NewInvokeSpecial, Constant::MethodRef { .. }) => true,
            (
                InvokeStatic | InvokeSpecial,
                Constant::MethodRef { .. } | Constant::InterfaceMethodRef { .. },
            ) => true,
            (InvokeInterface, Constant::InterfaceMethodRef { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Constant {
    /// Occupies the slot after a `Long` or `Double`. Never a valid target.
    Unusable,

    Utf8(String),
    Integer(i32),
    /// Raw IEEE 754 bits; see `Constant::float_value`.
    Float(u32),
    Long(i64),
    /// Raw IEEE 754 bits; see `Constant::double_value`.
    Double(u64),

    Class(PoolIndex),
    String(PoolIndex),
    FieldRef {
        class: PoolIndex,
        name_and_type: PoolIndex,
    },
    MethodRef {
        class: PoolIndex,
        name_and_type: PoolIndex,
    },
    InterfaceMethodRef {
        class: PoolIndex,
        name_and_type: PoolIndex,
    },
    NameAndType {
        name: PoolIndex,
        descriptor: PoolIndex,
    },
    MethodHandle {
        kind: MethodHandleKind,
        reference: PoolIndex,
    },
    MethodType(PoolIndex),
    /// `bootstrap` indexes the `BootstrapMethods` attribute, not the pool.
    Dynamic {
        bootstrap: u16,
        name_and_type: PoolIndex,
    },
    InvokeDynamic {
        bootstrap: u16,
        name_and_type: PoolIndex,
    },
    Module(PoolIndex),
    Package(PoolIndex),
}

impl Constant {
    /// Human-readable kind, used in diagnostics and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Constant::Unusable => "Unusable",
            Constant::Utf8(_) => "Utf8",
            Constant::Integer(_) => "Integer",
            Constant::Float(_) => "Float",
            Constant::Long(_) => "Long",
            Constant::Double(_) => "Double",
            Constant::Class(_) => "Class",
            Constant::String(_) => "String",
            Constant::FieldRef { .. } => "FieldRef",
            Constant::MethodRef { .. } => "MethodRef",
            Constant::InterfaceMethodRef { .. } => "InterfaceMethodRef",
            Constant::NameAndType { .. } => "NameAndType",
            Constant::MethodHandle { .. } => "MethodHandle",
            Constant::MethodType(_) => "MethodType",
            Constant::Dynamic { .. } => "Dynamic",
            Constant::InvokeDynamic { .. } => "InvokeDynamic",
            Constant::Module(_) => "Module",
            Constant::Package(_) => "Package",
        }
    }

    /// Whether this entry also occupies the slot after it.
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }

    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            Constant::Utf8(data) => Some(data),
            _ => None,
        }
    }

    pub fn float_value(&self) -> Option<f32> {
        match self {
            Constant::Float(bits) => Some(f32::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn double_value(&self) -> Option<f64> {
        match self {
            Constant::Double(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

/// A resolved field, method or interface method reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MemberRef<'a> {
    pub class: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

/// The decoded pool: an arena of entries addressed by `PoolIndex`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ConstantPool {
    /// `entries[i]` is the entry at index `i + 1`.
    entries: Vec<Constant>,
    /// Bytes the pool occupied on disk, including the count prefix.
    byte_len: usize,
}

impl ConstantPool {
    /// Number of addressable slots, counting the upper halves of wide entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn get(&self, index: PoolIndex) -> ClassResult<&Constant> {
        let slot = match index.0 {
            0 => return Err(PoolFault::NullIndex.into()),
            k => k as usize - 1,
        };

        match self.entries.get(slot) {
            Some(Constant::Unusable) => Err(PoolFault::UpperHalf { index: index.0 }.into()),
            Some(constant) => Ok(constant),
            None => Err(PoolFault::OutOfRange {
                index: index.0,
                len: self.entries.len(),
            }
            .into()),
        }
    }

    /// Every usable entry, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolIndex, &Constant)> + '_ {
        self.entries
            .iter()
            .zip(1..)
            .filter(|(constant, _)| **constant != Constant::Unusable)
            .map(|(constant, idx)| (PoolIndex(idx), constant))
    }

    fn mismatch(index: PoolIndex, expected: &'static str, found: &Constant) -> ClassError {
        ClassError::BadPoolReference {
            index: index.0,
            expected,
            found: found.kind(),
        }
    }

    /// Like `get`, but an index that lands on no entry at all is reported as
    /// a reference to the wrong kind of thing.
    fn resolve(&self, index: PoolIndex, expected: &'static str) -> ClassResult<&Constant> {
        match self.get(index) {
            Err(ClassError::MalformedPool(PoolFault::NullIndex))
            | Err(ClassError::MalformedPool(PoolFault::OutOfRange { .. })) => {
                Err(ClassError::BadPoolReference {
                    index: index.0,
                    expected,
                    found: "nothing",
                })
            }
            other => other,
        }
    }

    pub fn utf8(&self, index: PoolIndex) -> ClassResult<&str> {
        match self.resolve(index, "Utf8")? {
            Constant::Utf8(data) => Ok(data),
            other => Err(Self::mismatch(index, "Utf8", other)),
        }
    }

    /// Follows a `Class` entry to its internal name, e.g. `java/lang/Object`.
    pub fn class_name(&self, index: PoolIndex) -> ClassResult<&str> {
        match self.resolve(index, "Class")? {
            Constant::Class(name) => self.utf8(*name),
            other => Err(Self::mismatch(index, "Class", other)),
        }
    }

    pub fn string(&self, index: PoolIndex) -> ClassResult<&str> {
        match self.resolve(index, "String")? {
            Constant::String(data) => self.utf8(*data),
            other => Err(Self::mismatch(index, "String", other)),
        }
    }

    /// Returns `(name, descriptor)`.
    pub fn name_and_type(&self, index: PoolIndex) -> ClassResult<(&str, &str)> {
        match self.resolve(index, "NameAndType")? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            other => Err(Self::mismatch(index, "NameAndType", other)),
        }
    }

    pub fn member_ref(&self, index: PoolIndex) -> ClassResult<MemberRef<'_>> {
        match self.resolve(index, "member reference")? {
            Constant::FieldRef {
                class,
                name_and_type,
            }
            | Constant::MethodRef {
                class,
                name_and_type,
            }
            | Constant::InterfaceMethodRef {
                class,
                name_and_type,
            } => {
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                Ok(MemberRef {
                    class: self.class_name(*class)?,
                    name,
                    descriptor,
                })
            }
            other => Err(Self::mismatch(index, "member reference", other)),
        }
    }

    /// Eagerly checks that every reference inside the pool lands on an entry
    /// of the right kind.
    pub fn verify_references(&self) -> ClassResult<()> {
        for (index, constant) in self.iter() {
            match constant {
                Constant::Class(name) | Constant::Module(name) | Constant::Package(name) => {
                    self.utf8(*name)?;
                }
                Constant::String(data) | Constant::MethodType(data) => {
                    self.utf8(*data)?;
                }
                Constant::FieldRef { .. }
                | Constant::MethodRef { .. }
                | Constant::InterfaceMethodRef { .. } => {
                    self.member_ref(index)?;
                }
                Constant::NameAndType { .. } => {
                    self.name_and_type(index)?;
                }
                Constant::MethodHandle { kind, reference } => {
                    let target = self.resolve(*reference, "member reference")?;
                    if !kind.accepts(target) {
                        return Err(Self::mismatch(*reference, "member reference", target));
                    }
                    self.member_ref(*reference)?;
                }
                Constant::Dynamic { name_and_type, .. }
                | Constant::InvokeDynamic { name_and_type, .. } => {
                    self.name_and_type(*name_and_type)?;
                }
                Constant::Utf8(_)
                | Constant::Integer(_)
                | Constant::Float(_)
                | Constant::Long(_)
                | Constant::Double(_)
                | Constant::Unusable => {}
            }
        }
        Ok(())
    }
}

pub fn parse_constant(input: &mut ByteParser<'_>, index: u16) -> ClassResult<Constant> {
    let tag = input.parse_u8()?;
    let tag = ConstantTag::from_u8(tag).ok_or(PoolFault::UnknownTag { index, tag })?;

    let len = match tag.fixed_len() {
        Some(len) => len,
        None => input.parse_u16()? as usize,
    };
    let mut content = input.split(len)?;

    Ok(match tag {
        ConstantTag::Utf8 => Constant::Utf8(decode_mutf8(content)?.into_owned()),
        ConstantTag::Integer => Constant::Integer(content.parse_i32()?),
        ConstantTag::Float => Constant::Float(content.parse_u32()?),
        ConstantTag::Long => Constant::Long(content.parse_i64()?),
        ConstantTag::Double => Constant::Double(content.parse_u64()?),

        ConstantTag::Class => Constant::Class(parse_index(&mut content)?),
        ConstantTag::String => Constant::String(parse_index(&mut content)?),
        ConstantTag::MethodType => Constant::MethodType(parse_index(&mut content)?),
        ConstantTag::Module => Constant::Module(parse_index(&mut content)?),
        ConstantTag::Package => Constant::Package(parse_index(&mut content)?),

        ConstantTag::FieldRef => Constant::FieldRef {
            class: parse_index(&mut content)?,
            name_and_type: parse_index(&mut content)?,
        },
        ConstantTag::MethodRef => Constant::MethodRef {
            class: parse_index(&mut content)?,
            name_and_type: parse_index(&mut content)?,
        },
        ConstantTag::InterfaceMethodRef => Constant::InterfaceMethodRef {
            class: parse_index(&mut content)?,
            name_and_type: parse_index(&mut content)?,
        },
        ConstantTag::NameAndType => Constant::NameAndType {
            name: parse_index(&mut content)?,
            descriptor: parse_index(&mut content)?,
        },

        ConstantTag::MethodHandle => {
            let kind = content.parse_u8()?;
            Constant::MethodHandle {
                kind: MethodHandleKind::from_u8(kind)
                    .ok_or(PoolFault::UnknownMethodHandleKind { index, kind })?,
                reference: parse_index(&mut content)?,
            }
        }

        ConstantTag::Dynamic => Constant::Dynamic {
            bootstrap: content.parse_u16()?,
            name_and_type: parse_index(&mut content)?,
        },
        ConstantTag::InvokeDynamic => Constant::InvokeDynamic {
            bootstrap: content.parse_u16()?,
            name_and_type: parse_index(&mut content)?,
        },
    })
}

/// Decodes the pool, starting at its 2-byte count.
pub fn parse_constant_pool(input: &mut ByteParser<'_>) -> ClassResult<ConstantPool> {
    let start = input.position();
    let slots = match input.parse_u16()? as usize {
        0 => return Err(PoolFault::ZeroSize.into()),
        declared => declared - 1,
    };

    let mut entries = Vec::with_capacity(slots);
    while entries.len() < slots {
        let index = entries.len() as u16 + 1;
        let constant = located(input, |input| parse_constant(input, index))?;
        trace!(index, kind = constant.kind(), "decoded constant");

        let is_wide = constant.is_wide();
        entries.push(constant);
        if is_wide {
            if entries.len() == slots {
                return Err(PoolFault::OutOfRange {
                    index: index + 1,
                    len: slots,
                }
                .into());
            }
            entries.push(Constant::Unusable);
        }
    }

    let byte_len = input.position() - start;
    debug!(slots, byte_len, "decoded constant pool");

    Ok(ConstantPool { entries, byte_len })
}
