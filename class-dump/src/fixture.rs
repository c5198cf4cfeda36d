//! A small hand-assembled class shared by the renderer tests.

use classfile::Class;

fn utf8(out: &mut Vec<u8>, text: &str) {
    out.push(1);
    out.extend_from_slice(&(text.len() as u16).to_be_bytes());
    out.extend_from_slice(text.as_bytes());
}

fn tagged(out: &mut Vec<u8>, tag: u8, content: &[u16]) {
    out.push(tag);
    for value in content {
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// A class named `name` with one field, a trivial constructor and a
/// `SourceFile` attribute.
pub fn bytes(access: u16, name: &str) -> Vec<u8> {
    let mut out = vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x34];

    out.extend_from_slice(&17u16.to_be_bytes());
    utf8(&mut out, name); // 1
    tagged(&mut out, 7, &[1]); // 2
    utf8(&mut out, "java/lang/Object"); // 3
    tagged(&mut out, 7, &[3]); // 4
    utf8(&mut out, "<init>"); // 5
    utf8(&mut out, "()V"); // 6
    tagged(&mut out, 10, &[4, 8]); // 7
    tagged(&mut out, 12, &[5, 6]); // 8
    utf8(&mut out, "Code"); // 9
    utf8(&mut out, "greeting"); // 10
    utf8(&mut out, "Ljava/lang/String;"); // 11
    utf8(&mut out, "Greeter.java"); // 12
    utf8(&mut out, "SourceFile"); // 13
    utf8(&mut out, "line\nbreak"); // 14
    out.push(5); // 15, 16
    out.extend_from_slice(&42i64.to_be_bytes());

    // access, this, super, no interfaces
    out.extend_from_slice(&access.to_be_bytes());
    out.extend_from_slice(&[0x00, 0x02, 0x00, 0x04, 0x00, 0x00]);

    // private final String greeting
    #[rustfmt::skip]
    let field = [
        0x00, 0x01,
        0x00, 0x12, 0x00, 0x0a, 0x00, 0x0b, 0x00, 0x00,
    ];
    out.extend_from_slice(&field);

    // public <init>()V { aload_0; invokespecial #7; return }
    #[rustfmt::skip]
    let init = [
        0x00, 0x01,
        0x00, 0x01, 0x00, 0x05, 0x00, 0x06, 0x00, 0x01,
        0x00, 0x09, 0x00, 0x00, 0x00, 0x11,
        0x00, 0x01, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x05,
        0x2a, 0xb7, 0x00, 0x07, 0xb1,
        0x00, 0x00,
        0x00, 0x00,
    ];
    out.extend_from_slice(&init);

    // SourceFile
    #[rustfmt::skip]
    let source = [
        0x00, 0x01,
        0x00, 0x0d, 0x00, 0x00, 0x00, 0x02, 0x00, 0x0c,
    ];
    out.extend_from_slice(&source);

    out
}

pub fn sample() -> Class {
    Class::parse(bytes(0x0021, "com/example/Greeter")).unwrap()
}
