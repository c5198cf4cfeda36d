//! Field type descriptors, e.g. `I`, `[[J` or `Ljava/util/List;`.

use crate::{ClassError, ClassResult};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// Only valid as a method return type.
    Void,
    /// Internal (slash-separated) class name.
    Object(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeDescriptor {
    pub dimensions: usize,
    pub base: BaseType,
}

impl TypeDescriptor {
    /// Parses a descriptor that must span the whole string.
    pub fn parse(descriptor: &str) -> ClassResult<TypeDescriptor> {
        match parse_prefix(descriptor) {
            Some((ty, "")) => Ok(ty),
            _ => Err(ClassError::InvalidDescriptor(descriptor.into())),
        }
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void
    }

    /// The name a source file would use: the primitive keyword, or the class
    /// name without its package.
    pub fn canonical_name(&self) -> &str {
        match &self.base {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
            BaseType::Void => "void",
            BaseType::Object(name) => match name.rfind('/') {
                Some(slash) => &name[slash + 1..],
                None => name,
            },
        }
    }

    /// The dotted import a source file would need to name this type. Types
    /// directly inside `java.lang` and the default package need none.
    pub fn required_import(&self) -> Option<String> {
        match &self.base {
            BaseType::Object(name) => {
                let implicit = name.starts_with("java/lang/") && name.matches('/').count() == 2;
                if implicit || !name.contains('/') {
                    None
                } else {
                    Some(name.replace('/', "."))
                }
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.canonical_name())?;
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Parses one descriptor off the front of `input`, returning it with the
/// unconsumed remainder.
pub(crate) fn parse_prefix(input: &str) -> Option<(TypeDescriptor, &str)> {
    let body = input.trim_start_matches('[');
    let dimensions = input.len() - body.len();

    let mut chars = body.chars();
    let base = match chars.next()? {
        'B' => BaseType::Byte,
        'C' => BaseType::Char,
        'D' => BaseType::Double,
        'F' => BaseType::Float,
        'I' => BaseType::Int,
        'J' => BaseType::Long,
        'S' => BaseType::Short,
        'Z' => BaseType::Boolean,
        'V' if dimensions == 0 => BaseType::Void,
        'L' => {
            let end = body.find(';')?;
            let name = &body[1..end];
            if name.is_empty() {
                return None;
            }
            let ty = TypeDescriptor {
                dimensions,
                base: BaseType::Object(name.into()),
            };
            return Some((ty, &body[end + 1..]));
        }
        _ => return None,
    };

    Some((TypeDescriptor { dimensions, base }, chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive() {
        let ty = TypeDescriptor::parse("I").unwrap();
        assert_eq!(ty.base, BaseType::Int);
        assert_eq!(ty.dimensions, 0);
        assert_eq!(ty.to_string(), "int");
        assert_eq!(ty.required_import(), None);
    }

    #[test]
    fn test_arrays() {
        let ty = TypeDescriptor::parse("[[J").unwrap();
        assert_eq!(ty.dimensions, 2);
        assert_eq!(ty.to_string(), "long[][]");
    }

    #[test]
    fn test_java_lang_needs_no_import() {
        let ty = TypeDescriptor::parse("[Ljava/lang/String;").unwrap();
        assert_eq!(ty.to_string(), "String[]");
        assert_eq!(ty.required_import(), None);

        // only direct members of java.lang are implicit
        let ty = TypeDescriptor::parse("Ljava/lang/reflect/Method;").unwrap();
        assert_eq!(ty.canonical_name(), "Method");
        assert_eq!(
            ty.required_import(),
            Some(String::from("java.lang.reflect.Method"))
        );
    }

    #[test]
    fn test_packaged_class() {
        let ty = TypeDescriptor::parse("Ljava/util/List;").unwrap();
        assert_eq!(ty.canonical_name(), "List");
        assert_eq!(ty.required_import(), Some(String::from("java.util.List")));
    }

    #[test]
    fn test_default_package() {
        let ty = TypeDescriptor::parse("LFoo;").unwrap();
        assert_eq!(ty.canonical_name(), "Foo");
        assert_eq!(ty.required_import(), None);
    }

    #[test]
    fn test_invalid() {
        for bad in &["", "Q", "[", "Ljava/lang/String", "L;", "II", "[V", "Ljava/util/List;I"] {
            assert_eq!(
                TypeDescriptor::parse(bad),
                Err(ClassError::InvalidDescriptor(String::from(*bad))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_prefix_leaves_remainder() {
        let (ty, rest) = parse_prefix("[Ljava/lang/Object;IZ)V").unwrap();
        assert_eq!(ty.base, BaseType::Object(String::from("java/lang/Object")));
        assert_eq!(ty.dimensions, 1);
        assert_eq!(rest, "IZ)V");
    }
}
