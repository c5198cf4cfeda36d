//! Access flags are stored as a big-endian `u16`, but the meaning of each bit
//! depends on what the flags are attached to. `0x0020` is `super` on a class
//! and `synchronized` on a method; `0x0040` is `volatile` on a field and
//! `bridge` on a method.
//!
//! Each target has a static table describing which byte of the pair a flag
//! lives in and its mask within that byte. A flag is present when all of its
//! mask bits are set.

use crate::{ClassError, ClassResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AccessTarget {
    Class,
    Field,
    Method,
}

impl std::fmt::Display for AccessTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            AccessTarget::Class => "class",
            AccessTarget::Field => "field",
            AccessTarget::Method => "method",
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Flag {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Super,
    Synchronized,
    Volatile,
    Bridge,
    Transient,
    Varargs,
    Native,
    Interface,
    Abstract,
    Strict,
    Synthetic,
    Annotation,
    Enum,
    Module,
}

impl Flag {
    /// The source keyword for this flag, or a lowercase name for flags that
    /// have no keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Flag::Public => "public",
            Flag::Private => "private",
            Flag::Protected => "protected",
            Flag::Static => "static",
            Flag::Final => "final",
            Flag::Super => "super",
            Flag::Synchronized => "synchronized",
            Flag::Volatile => "volatile",
            Flag::Bridge => "bridge",
            Flag::Transient => "transient",
            Flag::Varargs => "varargs",
            Flag::Native => "native",
            Flag::Interface => "interface",
            Flag::Abstract => "abstract",
            Flag::Strict => "strictfp",
            Flag::Synthetic => "synthetic",
            Flag::Annotation => "annotation",
            Flag::Enum => "enum",
            Flag::Module => "module",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
enum Byte {
    /// The first byte on disk, i.e. bits 8-15.
    High,
    Low,
}

#[derive(Copy, Clone, Debug)]
struct FlagDef {
    flag: Flag,
    byte: Byte,
    mask: u8,
    in_source: bool,
}

const fn def(flag: Flag, byte: Byte, mask: u8, in_source: bool) -> FlagDef {
    FlagDef {
        flag,
        byte,
        mask,
        in_source,
    }
}

use self::{Byte::*, Flag::*};

static CLASS_FLAGS: &[FlagDef] = &[
    def(Public, Low, 0x01, true),
    def(Abstract, High, 0x04, true),
    def(Final, Low, 0x10, true),
    def(Interface, High, 0x02, true),
    def(Enum, High, 0x40, true),
    def(Super, Low, 0x20, false),
    def(Synthetic, High, 0x10, false),
    def(Annotation, High, 0x20, false),
    def(Module, High, 0x80, false),
];

static FIELD_FLAGS: &[FlagDef] = &[
    def(Public, Low, 0x01, true),
    def(Private, Low, 0x02, true),
    def(Protected, Low, 0x04, true),
    def(Static, Low, 0x08, true),
    def(Volatile, Low, 0x40, true),
    def(Transient, Low, 0x80, true),
    def(Final, Low, 0x10, true),
    def(Enum, High, 0x40, false),
    def(Synthetic, High, 0x10, false),
];

static METHOD_FLAGS: &[FlagDef] = &[
    def(Public, Low, 0x01, true),
    def(Private, Low, 0x02, true),
    def(Protected, Low, 0x04, true),
    def(Static, Low, 0x08, true),
    def(Abstract, High, 0x04, true),
    def(Synchronized, Low, 0x20, true),
    def(Final, Low, 0x10, true),
    def(Strict, High, 0x08, true),
    def(Native, High, 0x01, true),
    def(Bridge, Low, 0x40, false),
    def(Varargs, Low, 0x80, false),
    def(Synthetic, High, 0x10, false),
];

impl AccessTarget {
    fn table(self) -> &'static [FlagDef] {
        match self {
            AccessTarget::Class => CLASS_FLAGS,
            AccessTarget::Field => FIELD_FLAGS,
            AccessTarget::Method => METHOD_FLAGS,
        }
    }
}

/// A decoded set of access flags. Bits with no meaning for the target are
/// kept in `raw` but never reported as flags.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AccessFlags {
    target: AccessTarget,
    raw: u16,
}

impl AccessFlags {
    pub fn new(target: AccessTarget, raw: u16) -> Self {
        AccessFlags { target, raw }
    }

    /// Builds a flag set from the two bytes as they appear on disk.
    pub fn decode(target: AccessTarget, first: u8, second: u8) -> Self {
        AccessFlags::new(target, u16::from_be_bytes([first, second]))
    }

    pub fn target(&self) -> AccessTarget {
        self.target
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    fn is_set(&self, def: &FlagDef) -> bool {
        let [high, low] = self.raw.to_be_bytes();
        let byte = match def.byte {
            High => high,
            Low => low,
        };
        byte & def.mask == def.mask
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.target
            .table()
            .iter()
            .any(|def| def.flag == flag && self.is_set(def))
    }

    /// Present flags, in table order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.target
            .table()
            .iter()
            .filter(move |def| self.is_set(def))
            .map(|def| def.flag)
    }

    /// Present flags that are written as modifiers in source, in table order.
    pub fn source_modifiers(&self) -> impl Iterator<Item = Flag> + '_ {
        self.target
            .table()
            .iter()
            .filter(move |def| def.in_source && self.is_set(def))
            .map(|def| def.flag)
    }

    pub fn is_legal(&self) -> bool {
        let has = |flag| self.contains(flag);
        let any = |flags: &[Flag]| flags.iter().any(|&flag| has(flag));

        let visibility = [Public, Private, Protected]
            .iter()
            .filter(|&&flag| has(flag))
            .count();
        if visibility > 1 {
            return false;
        }

        match self.target {
            AccessTarget::Class => {
                if has(Annotation) && !has(Interface) {
                    return false;
                }
                if has(Interface) && (!has(Abstract) || any(&[Final, Super, Enum])) {
                    return false;
                }
                if has(Enum) && any(&[Interface, Annotation]) {
                    return false;
                }
                !(has(Final) && has(Abstract))
            }
            AccessTarget::Field => !(has(Final) && has(Volatile)),
            AccessTarget::Method => {
                !(has(Abstract) && any(&[Final, Native, Private, Static, Strict, Synchronized]))
            }
        }
    }

    /// Fails with `IllegalAccessFlags` when the combination could not have
    /// come from a conforming compiler.
    pub fn validate(&self) -> ClassResult<()> {
        if self.is_legal() {
            Ok(())
        } else {
            Err(ClassError::IllegalAccessFlags {
                target: self.target,
                flags: self.raw,
            })
        }
    }
}

impl std::fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", flag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_flags(first: u8, second: u8) -> Vec<Flag> {
        let mut flags: Vec<_> = AccessFlags::decode(AccessTarget::Class, first, second)
            .iter()
            .collect();
        flags.sort();
        flags
    }

    fn sorted(mut flags: Vec<Flag>) -> Vec<Flag> {
        flags.sort();
        flags
    }

    #[test]
    fn test_class_flags_by_byte() {
        assert_eq!(class_flags(0x02, 0x10), sorted(vec![Interface, Final]));
        assert_eq!(
            class_flags(0x12, 0x10),
            sorted(vec![Synthetic, Interface, Final])
        );
        assert_eq!(
            class_flags(0x12, 0x21),
            sorted(vec![Synthetic, Interface, Super, Public])
        );
        assert_eq!(
            class_flags(0x24, 0x10),
            sorted(vec![Annotation, Abstract, Final])
        );
        assert_eq!(class_flags(0x44, 0x10), sorted(vec![Enum, Abstract, Final]));
    }

    #[test]
    fn test_same_bit_means_different_things() {
        let class = AccessFlags::new(AccessTarget::Class, 0x0020);
        let method = AccessFlags::new(AccessTarget::Method, 0x0020);
        assert!(class.contains(Super));
        assert!(!class.contains(Synchronized));
        assert!(method.contains(Synchronized));
        assert!(!method.contains(Super));

        // 0x10 is final in the low byte and synthetic in the high byte
        let field = AccessFlags::new(AccessTarget::Field, 0x1000);
        assert_eq!(field.iter().collect::<Vec<_>>(), vec![Synthetic]);
    }

    #[test]
    fn test_unknown_bits_are_kept_but_not_reported() {
        let field = AccessFlags::new(AccessTarget::Field, 0x0401);
        assert_eq!(field.raw(), 0x0401);
        assert_eq!(field.iter().collect::<Vec<_>>(), vec![Public]);
        assert!(!field.contains(Abstract));
    }

    #[test]
    fn test_source_modifiers_skip_hidden_flags() {
        let method = AccessFlags::new(AccessTarget::Method, 0x1089);
        assert_eq!(method.iter().count(), 4);
        assert_eq!(
            method.source_modifiers().collect::<Vec<_>>(),
            vec![Public, Static]
        );
        assert_eq!(method.to_string(), "public static varargs synthetic");
    }

    #[test]
    fn test_legal_combinations() {
        let legal = [
            AccessFlags::new(AccessTarget::Class, 0x0021),
            AccessFlags::new(AccessTarget::Class, 0x0601),
            AccessFlags::new(AccessTarget::Class, 0x2601),
            AccessFlags::new(AccessTarget::Field, 0x0019),
            AccessFlags::new(AccessTarget::Method, 0x0401),
        ];
        for flags in &legal {
            assert_eq!(flags.validate(), Ok(()), "{:?}", flags);
        }
    }

    #[test]
    fn test_illegal_combinations() {
        let illegal = [
            // interface without abstract
            AccessFlags::new(AccessTarget::Class, 0x0201),
            // annotation without interface
            AccessFlags::new(AccessTarget::Class, 0x2401),
            // final and abstract
            AccessFlags::new(AccessTarget::Class, 0x0411),
            // interface enum
            AccessFlags::new(AccessTarget::Class, 0x4600),
            // public and private
            AccessFlags::new(AccessTarget::Field, 0x0003),
            // final and volatile
            AccessFlags::new(AccessTarget::Field, 0x0050),
            // abstract and static
            AccessFlags::new(AccessTarget::Method, 0x0408),
        ];
        for flags in &illegal {
            assert_eq!(
                flags.validate(),
                Err(ClassError::IllegalAccessFlags {
                    target: flags.target(),
                    flags: flags.raw(),
                }),
                "{:?}",
                flags
            );
        }
    }
}
