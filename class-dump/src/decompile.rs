use crate::style::Painter;
use classfile::{Class, Flag};
use std::fmt::Write;

/// Source-shaped outline of `class`: package, declaration line and an empty
/// body.
pub fn skeleton(class: &Class, painter: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        painter.paint("comment", "// generated by class-dump")
    );

    if let Some(package) = class.package() {
        let _ = writeln!(out, "package {};\n", package.replace('/', "."));
    }

    for flag in class.access.source_modifiers() {
        let _ = write!(out, "{} ", painter.paint("access", flag));
    }
    if !class.access.contains(Flag::Enum) && !class.access.contains(Flag::Interface) {
        out.push_str("class ");
    }
    let _ = writeln!(
        out,
        "{} {{",
        painter.paint("name.class", class.simple_name())
    );
    let _ = writeln!(
        out,
        "    {}",
        painter.paint("comment", "// decompilation not implemented")
    );
    out.push_str("}\n");
    out
}
