//! Plain-text listing of a decoded class.

use crate::style::Painter;
use classfile::{
    attribute::{Attribute, AttributeInfo},
    code::Code,
    AccessFlags, Class, Constant,
};
use std::fmt::{self, Write};

pub fn render(class: &Class, painter: &Painter) -> String {
    Report { class, painter }.to_string()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{:02X}", byte);
        out
    })
}

/// Content bytes of a pool entry as they appear on disk, tag excluded.
fn constant_content(constant: &Constant) -> Vec<u8> {
    let pair = |a: u16, b: u16| [a.to_be_bytes(), b.to_be_bytes()].concat();

    match constant {
        Constant::Unusable => vec![],
        Constant::Utf8(text) => text.as_bytes().to_vec(),
        Constant::Integer(value) => value.to_be_bytes().to_vec(),
        Constant::Float(bits) => bits.to_be_bytes().to_vec(),
        Constant::Long(value) => value.to_be_bytes().to_vec(),
        Constant::Double(bits) => bits.to_be_bytes().to_vec(),
        Constant::Class(index)
        | Constant::String(index)
        | Constant::MethodType(index)
        | Constant::Module(index)
        | Constant::Package(index) => index.get().to_be_bytes().to_vec(),
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
        } => pair(class.get(), name_and_type.get()),
        Constant::NameAndType { name, descriptor } => pair(name.get(), descriptor.get()),
        Constant::MethodHandle { kind, reference } => {
            let mut out = vec![*kind as u8];
            out.extend_from_slice(&reference.get().to_be_bytes());
            out
        }
        Constant::Dynamic {
            bootstrap,
            name_and_type,
        }
        | Constant::InvokeDynamic {
            bootstrap,
            name_and_type,
        } => pair(*bootstrap, name_and_type.get()),
    }
}

struct Report<'a> {
    class: &'a Class,
    painter: &'a Painter,
}

impl Report<'_> {
    fn heading(&self, f: &mut fmt::Formatter, text: &str) -> fmt::Result {
        writeln!(f, "{}", self.painter.paint("heading", text))
    }

    fn access(&self, f: &mut fmt::Formatter, indent: &str, access: &AccessFlags) -> fmt::Result {
        writeln!(
            f,
            "{}Access flags: {}",
            indent,
            self.painter.paint("access", access)
        )
    }

    fn pool(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.heading(f, "Constant pool dump:")?;
        for (index, constant) in self.class.pool.iter() {
            let value = match constant {
                Constant::Utf8(text) => self
                    .painter
                    .paint("pool.val.string", text.replace('\n', "\\n")),
                other => self.painter.paint("pool.val", hex(&constant_content(other))),
            };
            writeln!(
                f,
                "  {}: {} - {}",
                self.painter.paint("pool.index", index.get()),
                self.painter.paint("pool.kind", constant.kind()),
                value
            )?;
        }
        Ok(())
    }

    fn code(&self, f: &mut fmt::Formatter, code: &Code) -> fmt::Result {
        writeln!(f, "        Max stack size: {}", code.max_stack)?;
        writeln!(f, "        Max local variables: {}", code.max_locals)?;
        writeln!(
            f,
            "        Exception handlers: {} (not dumped)",
            code.handlers.len()
        )?;
        writeln!(f, "        Attributes: {} (not dumped)", code.attributes.len())?;
        writeln!(f, "        Body:")?;
        for insn in code.instructions.iter() {
            write!(f, "          {}", self.painter.paint("opcode", insn.opcode))?;
            if !insn.operands.is_empty() {
                let key = match insn.switch_table() {
                    Some(_) => "opcode.immediate.switch",
                    None => "opcode.immediate",
                };
                write!(f, " {}", self.painter.paint(key, hex(&insn.operands)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn attributes(&self, f: &mut fmt::Formatter, indent: &str, attrs: &[AttributeInfo]) -> fmt::Result {
        for attr in attrs {
            match &attr.attr {
                Attribute::Code(code) => {
                    writeln!(f, "{}{}:", indent, attr.name)?;
                    self.code(f, code)?;
                }
                Attribute::Other(data) => writeln!(f, "{}{}: {}", indent, attr.name, hex(data))?,
            }
        }
        Ok(())
    }

    fn member(
        &self,
        f: &mut fmt::Formatter,
        name: &str,
        access: &AccessFlags,
        descriptor: &str,
        attrs: &[AttributeInfo],
    ) -> fmt::Result {
        writeln!(f, "  {}:", self.painter.paint("heading.member", name))?;
        self.access(f, "    ", access)?;
        writeln!(
            f,
            "    Descriptor: {}",
            self.painter.paint("descriptor", descriptor)
        )?;
        writeln!(f, "    Attributes:")?;
        self.attributes(f, "      ", attrs)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let class = self.class;

        writeln!(
            f,
            "{}\n",
            self.painter.paint("banner", "Generated by class-dump")
        )?;
        writeln!(
            f,
            "Class name: {}",
            self.painter.paint("name.class", &class.name)
        )?;
        writeln!(
            f,
            "Superclass name: {}",
            self.painter.paint("name.class", &class.super_name)
        )?;
        writeln!(f, "Class major/minor version: {}", class.version)?;
        writeln!(f)?;

        self.pool(f)?;
        writeln!(f)?;

        self.access(f, "", &class.access)?;
        writeln!(f)?;

        self.heading(f, "Interfaces:")?;
        for interface in class.interfaces.iter() {
            writeln!(f, "  {}", self.painter.paint("name", interface))?;
        }
        writeln!(f)?;

        self.heading(f, "Fields:")?;
        for field in class.fields.iter() {
            self.member(f, &field.name, &field.access, &field.descriptor, &field.attributes)?;
        }
        writeln!(f)?;

        self.heading(f, "Methods:")?;
        for method in class.methods.iter() {
            self.member(f, &method.name, &method.access, &method.descriptor, &method.attributes)?;
        }
        writeln!(f)?;

        self.heading(f, "Attributes:")?;
        self.attributes(f, "  ", &class.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    fn report() -> String {
        render(&fixture::sample(), &Painter::plain())
    }

    #[test]
    fn test_header() {
        let report = report();
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("Generated by class-dump"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Class name: com/example/Greeter"));
        assert_eq!(lines.next(), Some("Superclass name: java/lang/Object"));
        assert_eq!(lines.next(), Some("Class major/minor version: 52.0"));
    }

    #[test]
    fn test_pool_lines() {
        let report = report();
        assert!(report.contains("  1: Utf8 - com/example/Greeter\n"));
        assert!(report.contains("  2: Class - 0001\n"));
        assert!(report.contains(": Utf8 - line\\nbreak\n"));
        // the upper half of the long is not listed
        assert!(report.contains(": Long - 000000000000002A\n"));
        assert!(!report.contains("Unusable"));
    }

    #[test]
    fn test_members() {
        let report = report();
        assert!(report.contains("Access flags: public super\n"));
        assert!(report.contains(
            "  greeting:\n    Access flags: private final\n    Descriptor: Ljava/lang/String;\n    Attributes:\n"
        ));
        assert!(report.contains("      Code:\n        Max stack size: 1\n        Max local variables: 1\n"));
        assert!(report.contains("        Exception handlers: 0 (not dumped)\n"));
        assert!(report.contains("        Body:\n          aload_0\n          invokespecial 0007\n          return\n"));
        assert!(report.trim_end().ends_with("SourceFile: 000C"));
    }
}
