//! # Attribute Format
//! Every attribute starts with an index into the constant pool naming it,
//! followed by the byte length of the *rest* of the attribute.
//!
//! ```txt
//! AttributeInfo {
//!     name_index: u16,
//!     length: u32,
//!     info: [u8; length],
//! }
//! ```
//!
//! Only `Code` is decoded; every other attribute is kept as its raw payload.

use crate::{
    code::{parse_code, Code},
    constant::{ConstantPool, PoolIndex},
    located,
    parse::ByteParser,
    ClassError, ClassResult,
};
use tracing::warn;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attribute {
    Code(Code),
    Other(Box<[u8]>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeInfo {
    pub name_index: PoolIndex,
    pub name: String,
    pub attr: Attribute,
}

impl AttributeInfo {
    pub fn as_code(&self) -> Option<&Code> {
        match &self.attr {
            Attribute::Code(code) => Some(code),
            Attribute::Other(_) => None,
        }
    }

    /// The undecoded payload, for attributes other than `Code`.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.attr {
            Attribute::Code(_) => None,
            Attribute::Other(data) => Some(data),
        }
    }
}

pub fn parse_attribute(input: &mut ByteParser<'_>, pool: &ConstantPool) -> ClassResult<AttributeInfo> {
    let name_index = PoolIndex(input.parse_u16()?);
    let name = pool.utf8(name_index)?;

    let len = input.parse_u32()?;
    let len = usize::try_from(len).map_err(|_| ClassError::AttributeTooLarge(len))?;
    let mut payload = input.split(len)?;

    let attr = if name.eq_ignore_ascii_case("Code") {
        let code = parse_code(&mut payload, pool)?;
        if !payload.is_empty() {
            warn!(
                offset = payload.position(),
                trailing = payload.remaining(),
                "ignoring trailing bytes after code attribute"
            );
        }
        Attribute::Code(code)
    } else {
        Attribute::Other(payload.take(len)?.into())
    };

    Ok(AttributeInfo {
        name_index,
        name: name.into(),
        attr,
    })
}

pub fn parse_attributes(input: &mut ByteParser<'_>, pool: &ConstantPool) -> ClassResult<Box<[AttributeInfo]>> {
    let len = input.parse_u16()? as usize;
    input
        .seq(len, |input| located(input, |input| parse_attribute(input, pool)))
        .map(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::parse_constant_pool;

    // #1 "SourceFile", #2 "Code", #3 "code"
    fn pool() -> ConstantPool {
        let mut bytes = vec![0x00, 0x04];
        for name in &["SourceFile", "Code", "code"] {
            bytes.push(1);
            bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
            bytes.extend_from_slice(name.as_bytes());
        }
        parse_constant_pool(&mut ByteParser::new(&bytes)).unwrap()
    }

    #[test]
    fn test_opaque_attribute() {
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x07, 0xff];
        let mut input = ByteParser::new(&bytes);
        let attr = parse_attribute(&mut input, &pool()).unwrap();
        assert_eq!(attr.name, "SourceFile");
        assert_eq!(attr.data(), Some(&[0x00, 0x07][..]));
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_code_name_is_case_insensitive() {
        #[rustfmt::skip]
        let bytes = [
            0x00, 0x03, 0x00, 0x00, 0x00, 0x0d,
            0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xb1,
            0x00, 0x00, 0x00, 0x00,
        ];
        let attr = parse_attribute(&mut ByteParser::new(&bytes), &pool()).unwrap();
        assert_eq!(attr.as_code().map(|code| code.instructions.len()), Some(1));
    }

    #[test]
    fn test_trailing_bytes_inside_code_are_skipped() {
        #[rustfmt::skip]
        let bytes = [
            0x00, 0x02, 0x00, 0x00, 0x00, 0x0f,
            0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xb1,
            0x00, 0x00, 0x00, 0x00, 0xaa, 0xbb,
            0x99,
        ];
        let mut input = ByteParser::new(&bytes);
        let attr = parse_attribute(&mut input, &pool()).unwrap();
        assert!(attr.as_code().is_some());
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_name_must_be_utf8() {
        let bytes = [0x00, 0x09, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            parse_attribute(&mut ByteParser::new(&bytes), &pool()),
            Err(ClassError::BadPoolReference {
                index: 9,
                expected: "Utf8",
                found: "nothing"
            })
        );
    }

    #[test]
    fn test_payload_past_end() {
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00];
        assert!(matches!(
            parse_attribute(&mut ByteParser::new(&bytes), &pool()),
            Err(ClassError::Truncated(_))
        ));
    }
}
