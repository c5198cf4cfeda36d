//! # Class File Format
//!
//! ```txt
//! ClassFile {
//!     magic: u32 = 0xCAFEBABE,
//!     minor_version: u16,
//!     major_version: u16,
//!     constant_pool_count: u16,
//!     constant_pool: [Constant; constant_pool_count - 1],
//!     access_flags: u16,
//!     this_class: u16,
//!     super_class: u16,
//!     interfaces_count: u16,
//!     interfaces: [u16; interfaces_count],
//!     fields_count: u16,
//!     fields: [Field; fields_count],
//!     methods_count: u16,
//!     methods: [Method; methods_count],
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//! ```
//!
//! Sections are strictly sequential: each one starts where the previous one
//! ended, so nothing after a misread section can be trusted. Decoding stops
//! at the first error, which is reported along with the section it came from.

use crate::{
    access::{AccessFlags, AccessTarget},
    attribute::{parse_attributes, AttributeInfo},
    constant::{parse_constant_pool, ConstantPool, PoolIndex},
    field::{parse_field, Field},
    method::{parse_method, Method},
    options::DecodeOptions,
    located,
    parse::ByteParser,
    ClassError, ClassResult,
};
use thiserror::Error;
use tracing::{debug, warn};

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Superclass of every class that does not name one.
pub const ROOT_CLASS: &str = "java/lang/Object";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Top-level regions of a class file, in the order they are decoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Section {
    Header,
    ConstantPool,
    AccessFlags,
    ThisClass,
    Interfaces,
    Fields,
    Methods,
    Attributes,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Section::Header => "header",
            Section::ConstantPool => "constant pool",
            Section::AccessFlags => "access flags",
            Section::ThisClass => "class names",
            Section::Interfaces => "interfaces",
            Section::Fields => "fields",
            Section::Methods => "methods",
            Section::Attributes => "attributes",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("error decoding {section} at offset {offset:#x}")]
pub struct DecodeError {
    pub section: Section,
    /// Absolute byte offset of the failing read, or of the start of the
    /// innermost record that failed.
    pub offset: usize,
    /// Never `ClassError::Located`; the location is in `offset`.
    pub source: ClassError,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Class {
    raw: Box<[u8]>,

    pub version: Version,
    pub pool: ConstantPool,
    pub access: AccessFlags,
    /// Internal name, e.g. `java/util/ArrayList`.
    pub name: String,
    pub super_name: String,
    pub interfaces: Box<[String]>,
    pub fields: Box<[Field]>,
    pub methods: Box<[Method]>,
    pub attributes: Box<[AttributeInfo]>,
}

impl Class {
    pub fn parse<B: Into<Box<[u8]>>>(src: B) -> Result<Class, DecodeError> {
        Class::parse_with(src, &DecodeOptions::default())
    }

    pub fn parse_with<B: Into<Box<[u8]>>>(
        src: B,
        options: &DecodeOptions,
    ) -> Result<Class, DecodeError> {
        let raw = src.into();
        let parts = decode(&raw, options)?;

        Ok(Class {
            raw,
            version: parts.version,
            pool: parts.pool,
            access: parts.access,
            name: parts.name,
            super_name: parts.super_name,
            interfaces: parts.interfaces,
            fields: parts.fields,
            methods: parts.methods,
            attributes: parts.attributes,
        })
    }

    /// The bytes this class was decoded from.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Internal name of the package, or `None` for the default package.
    pub fn package(&self) -> Option<&str> {
        self.name.rfind('/').map(|slash| &self.name[..slash])
    }

    pub fn simple_name(&self) -> &str {
        match self.name.rfind('/') {
            Some(slash) => &self.name[slash + 1..],
            None => &self.name,
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Everything but the raw buffer, which cannot move while it is borrowed.
struct Parts {
    version: Version,
    pool: ConstantPool,
    access: AccessFlags,
    name: String,
    super_name: String,
    interfaces: Box<[String]>,
    fields: Box<[Field]>,
    methods: Box<[Method]>,
    attributes: Box<[AttributeInfo]>,
}

struct Decoder<'src> {
    input: ByteParser<'src>,
}

impl<'src> Decoder<'src> {
    fn section<T, F>(&mut self, section: Section, func: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut ByteParser<'src>) -> ClassResult<T>,
    {
        debug!(%section, offset = self.input.position(), "decoding");

        let start = self.input.position();
        func(&mut self.input).map_err(|err| {
            let offset = err.location().unwrap_or(start);
            DecodeError {
                section,
                offset,
                source: err.without_location(),
            }
        })
    }
}

fn parse_header(input: &mut ByteParser<'_>, options: &DecodeOptions) -> ClassResult<Version> {
    let magic = input.parse_u32()?;
    if magic != MAGIC {
        return Err(ClassError::BadMagic(magic).at(0));
    }

    let version_offset = input.position();
    let minor = input.parse_u16()?;
    let major = input.parse_u16()?;
    if let Some(max) = options.max_major_version {
        if major > max {
            return Err(ClassError::UnsupportedVersion { major, minor }.at(version_offset));
        }
    }

    Ok(Version { major, minor })
}

fn parse_class_names(input: &mut ByteParser<'_>, pool: &ConstantPool) -> ClassResult<(String, String)> {
    let this = PoolIndex(input.parse_u16()?);
    let super_class = input.parse_u16()?;

    let name = pool.class_name(this)?.to_owned();
    let super_name = match PoolIndex::nonzero(super_class) {
        Some(index) => pool.class_name(index)?.to_owned(),
        None => ROOT_CLASS.to_owned(),
    };
    Ok((name, super_name))
}

fn parse_interfaces(input: &mut ByteParser<'_>, pool: &ConstantPool) -> ClassResult<Box<[String]>> {
    let len = input.parse_u16()? as usize;
    input
        .seq(len, |input| {
            located(input, |input| {
                let index = PoolIndex(input.parse_u16()?);
                pool.class_name(index).map(ToOwned::to_owned)
            })
        })
        .map(Into::into)
}

fn decode(src: &[u8], options: &DecodeOptions) -> Result<Parts, DecodeError> {
    let mut decoder = Decoder {
        input: ByteParser::new(src),
    };

    let version = decoder.section(Section::Header, |input| parse_header(input, options))?;

    let pool = decoder.section(Section::ConstantPool, |input| {
        let pool = parse_constant_pool(input)?;
        if options.verify_pool_references {
            pool.verify_references()?;
        }
        Ok(pool)
    })?;

    let access = decoder.section(Section::AccessFlags, |input| {
        let access = AccessFlags::new(AccessTarget::Class, input.parse_u16()?);
        if options.strict_access_flags {
            access.validate()?;
        }
        Ok(access)
    })?;

    let (name, super_name) =
        decoder.section(Section::ThisClass, |input| parse_class_names(input, &pool))?;
    let interfaces =
        decoder.section(Section::Interfaces, |input| parse_interfaces(input, &pool))?;

    let fields = decoder.section(Section::Fields, |input| {
        let len = input.parse_u16()? as usize;
        input.seq(len, |input| located(input, |input| parse_field(input, &pool, options)))
    })?;
    let methods = decoder.section(Section::Methods, |input| {
        let len = input.parse_u16()? as usize;
        input.seq(len, |input| located(input, |input| parse_method(input, &pool, options)))
    })?;

    let attributes = decoder.section(Section::Attributes, |input| parse_attributes(input, &pool))?;

    if !decoder.input.is_empty() {
        warn!(
            offset = decoder.input.position(),
            trailing = decoder.input.remaining(),
            "ignoring trailing bytes after class file"
        );
    }
    debug!(
        %name,
        fields = fields.len(),
        methods = methods.len(),
        "decoded class"
    );

    Ok(Parts {
        version,
        pool,
        access,
        name,
        super_name,
        interfaces,
        fields: fields.into(),
        methods: methods.into(),
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(major: u16) -> Vec<u8> {
        let mut bytes = MAGIC.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0x00, 0x00]);
        bytes.extend_from_slice(&major.to_be_bytes());
        bytes
    }

    #[test]
    fn test_bad_magic() {
        let err = Class::parse(&b"\xca\xfe\xd0\x0d\x00\x00\x00\x34"[..]).unwrap_err();
        assert_eq!(err.section, Section::Header);
        assert_eq!(err.source, ClassError::BadMagic(0xcafe_d00d));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_cause_is_printed_once() {
        use std::error::Error as _;

        let err = Class::parse(&b"\xca\xfe\xd0\x0d\x00\x00\x00\x34"[..]).unwrap_err();
        assert_eq!(err.to_string(), "error decoding header at offset 0x0");
        assert_eq!(
            err.source().map(ToString::to_string),
            Some(String::from("bad magic number 0xcafed00d"))
        );

        let pool = ClassError::from(crate::PoolFault::ZeroSize);
        assert_eq!(pool.to_string(), "malformed constant pool");
        assert_eq!(
            pool.source().map(ToString::to_string),
            Some(String::from("declared pool size is zero"))
        );
    }

    #[test]
    fn test_header_only_is_truncated() {
        let err = Class::parse(header(52)).unwrap_err();
        assert_eq!(err.section, Section::ConstantPool);
        assert_eq!(err.offset, 8);
        assert!(matches!(err.source, ClassError::Truncated(_)));
    }

    #[test]
    fn test_max_version() {
        let options = DecodeOptions::default().max_major_version(52);
        let err = Class::parse_with(header(61), &options).unwrap_err();
        assert_eq!(
            err.source,
            ClassError::UnsupportedVersion {
                major: 61,
                minor: 0
            }
        );
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_names() {
        let mut bytes = header(52);
        #[rustfmt::skip]
        let rest = [
            0x00, 0x03,
            0x01, 0x00, 0x0b, b'c', b'o', b'm', b'/', b'a', b'c', b'm', b'e', b'/', b'F', b'o',
            0x07, 0x00, 0x01,
            0x00, 0x21,
            0x00, 0x02, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        bytes.extend_from_slice(&rest);
        let class = Class::parse(bytes.clone()).unwrap();
        assert_eq!(class.name, "com/acme/Fo");
        assert_eq!(class.package(), Some("com/acme"));
        assert_eq!(class.simple_name(), "Fo");
        assert_eq!(class.super_name, ROOT_CLASS);
        assert_eq!(class.version.to_string(), "52.0");
        assert_eq!(class.raw(), &bytes[..]);
    }
}
