//! ```txt
//! Field {
//!     access:           u16
//!     name:             u16
//!     descriptor:       u16
//!     attributes_count: u16
//!     attributes:       [Attribute; attributes_count]
//! }
//! ```

use crate::{
    access::{AccessFlags, AccessTarget},
    attribute::{parse_attributes, AttributeInfo},
    constant::{ConstantPool, PoolIndex},
    descriptor::TypeDescriptor,
    options::DecodeOptions,
    parse::ByteParser,
    ClassError, ClassResult,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub access: AccessFlags,
    pub name: String,
    /// The descriptor exactly as it appears in the pool.
    pub descriptor: String,
    pub ty: TypeDescriptor,
    pub attributes: Box<[AttributeInfo]>,
}

pub fn parse_field(
    input: &mut ByteParser<'_>,
    pool: &ConstantPool,
    options: &DecodeOptions,
) -> ClassResult<Field> {
    let access = AccessFlags::new(AccessTarget::Field, input.parse_u16()?);
    if options.strict_access_flags {
        access.validate()?;
    }

    let name = pool.utf8(PoolIndex(input.parse_u16()?))?;
    let descriptor = pool.utf8(PoolIndex(input.parse_u16()?))?;
    let ty = TypeDescriptor::parse(descriptor)?;
    if ty.is_void() {
        return Err(ClassError::InvalidDescriptor(descriptor.into()));
    }

    let attributes = parse_attributes(input, pool)?;

    Ok(Field {
        access,
        name: name.into(),
        descriptor: descriptor.into(),
        ty,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{access::Flag, constant::parse_constant_pool, descriptor::BaseType};

    // #1 "count", #2 "[J", #3 "V", #4 "ConstantValue"
    fn pool() -> ConstantPool {
        let mut bytes = vec![0x00, 0x05];
        for text in &["count", "[J", "V", "ConstantValue"] {
            bytes.push(1);
            bytes.extend_from_slice(&(text.len() as u16).to_be_bytes());
            bytes.extend_from_slice(text.as_bytes());
        }
        parse_constant_pool(&mut ByteParser::new(&bytes)).unwrap()
    }

    #[test]
    fn test_parse_field() {
        #[rustfmt::skip]
        let bytes = [
            0x00, 0x1a,
            0x00, 0x01,
            0x00, 0x02,
            0x00, 0x01,
            0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x03,
        ];
        let field = parse_field(
            &mut ByteParser::new(&bytes),
            &pool(),
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(field.name, "count");
        assert_eq!(field.descriptor, "[J");
        assert_eq!(field.ty.base, BaseType::Long);
        assert_eq!(field.ty.dimensions, 1);
        assert_eq!(
            field.access.iter().collect::<Vec<_>>(),
            vec![Flag::Private, Flag::Static, Flag::Final]
        );
        assert_eq!(field.attributes[0].name, "ConstantValue");
    }

    #[test]
    fn test_void_field() {
        let bytes = [0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x00, 0x00];
        assert_eq!(
            parse_field(
                &mut ByteParser::new(&bytes),
                &pool(),
                &DecodeOptions::default()
            ),
            Err(ClassError::InvalidDescriptor(String::from("V")))
        );
    }

    #[test]
    fn test_strict_flags() {
        // final volatile
        let bytes = [0x00, 0x50, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00];
        let lenient = parse_field(
            &mut ByteParser::new(&bytes),
            &pool(),
            &DecodeOptions::default(),
        );
        assert!(lenient.is_ok());

        let strict = parse_field(
            &mut ByteParser::new(&bytes),
            &pool(),
            &DecodeOptions::default().strict_access_flags(true),
        );
        assert_eq!(
            strict,
            Err(ClassError::IllegalAccessFlags {
                target: AccessTarget::Field,
                flags: 0x0050
            })
        );
    }
}
