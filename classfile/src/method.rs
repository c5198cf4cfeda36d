//! ```txt
//! Method {
//!     access_flags: u16,
//!     name_index: u16,
//!     descriptor_index: u16,
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//! ```

use crate::{
    access::{AccessFlags, AccessTarget},
    attribute::{parse_attributes, AttributeInfo},
    code::Code,
    constant::{ConstantPool, PoolIndex},
    descriptor::{parse_prefix, TypeDescriptor},
    options::DecodeOptions,
    parse::ByteParser,
    ClassError, ClassResult,
};

/// A method descriptor such as `(I[Ljava/lang/String;)V`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<TypeDescriptor>,
    /// `void` for methods that return nothing.
    pub ret: TypeDescriptor,
}

impl MethodDescriptor {
    pub fn parse(descriptor: &str) -> ClassResult<MethodDescriptor> {
        let invalid = || ClassError::InvalidDescriptor(descriptor.into());

        let mut rest = descriptor.strip_prefix('(').ok_or_else(invalid)?;
        let mut params = Vec::new();
        loop {
            if let Some(tail) = rest.strip_prefix(')') {
                rest = tail;
                break;
            }

            let (param, tail) = parse_prefix(rest).ok_or_else(invalid)?;
            if param.is_void() {
                return Err(invalid());
            }
            params.push(param);
            rest = tail;
        }

        match parse_prefix(rest) {
            Some((ret, "")) => Ok(MethodDescriptor { params, ret }),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} (", self.ret)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Method {
    pub access: AccessFlags,
    pub name: String,
    /// The descriptor exactly as it appears in the pool.
    pub descriptor: String,
    pub signature: MethodDescriptor,
    pub attributes: Box<[AttributeInfo]>,
}

impl Method {
    /// The method body. Absent for `abstract` and `native` methods.
    pub fn code(&self) -> Option<&Code> {
        self.attributes.iter().find_map(AttributeInfo::as_code)
    }
}

pub fn parse_method(
    input: &mut ByteParser<'_>,
    pool: &ConstantPool,
    options: &DecodeOptions,
) -> ClassResult<Method> {
    let access = AccessFlags::new(AccessTarget::Method, input.parse_u16()?);
    if options.strict_access_flags {
        access.validate()?;
    }

    let name = pool.utf8(PoolIndex(input.parse_u16()?))?;
    let descriptor = pool.utf8(PoolIndex(input.parse_u16()?))?;
    let signature = MethodDescriptor::parse(descriptor)?;
    let attributes = parse_attributes(input, pool)?;

    Ok(Method {
        access,
        name: name.into(),
        descriptor: descriptor.into(),
        signature,
        attributes,
    })
}
