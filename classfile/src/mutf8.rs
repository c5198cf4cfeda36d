//! Modified UTF-8, as used by `Utf8` constant pool entries.
//!
//! It differs from standard UTF-8 in two ways: NUL is written as the overlong
//! pair `C0 80`, and supplementary characters are written as a surrogate pair
//! with each half encoded separately as three bytes. Raw `00` bytes and four
//! byte sequences never appear.

use crate::{parse::ByteParser, ClassError, ClassResult};
use std::borrow::Cow;

const REPLACEMENT: char = '\u{fffd}';

fn invalid(offset: usize, byte: u8) -> ClassError {
    ClassError::InvalidModifiedUtf8 { offset, byte }
}

/// Reads one continuation byte of the sequence led by `lead` at `lead_offset`.
/// Running out of bytes blames the lead, since the entry itself is complete.
fn continuation(parser: &mut ByteParser<'_>, lead_offset: usize, lead: u8) -> ClassResult<u32> {
    let offset = parser.position();
    match parser.parse_u8() {
        Ok(byte) if byte & 0xc0 == 0x80 => Ok((byte & 0x3f) as u32),
        Ok(byte) => Err(invalid(offset, byte)),
        Err(_) => Err(invalid(lead_offset, lead)),
    }
}

// 1110xxxx 10xxxxxx 10xxxxxx
fn three_byte_unit(parser: &mut ByteParser<'_>, lead_offset: usize, lead: u8) -> ClassResult<u32> {
    let b2 = continuation(parser, lead_offset, lead)?;
    let b3 = continuation(parser, lead_offset, lead)?;
    Ok(((lead & 0x0f) as u32) << 12 | b2 << 6 | b3)
}

fn is_high_surrogate(unit: u32) -> bool {
    (0xd800..0xdc00).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xdc00..0xe000).contains(&unit)
}

/// Consumes the next unit only if it is an encoded low surrogate.
fn take_low_surrogate(parser: &mut ByteParser<'_>) -> Option<u32> {
    let mut ahead = *parser;
    let offset = ahead.position();
    let lead = ahead.parse_u8().ok()?;
    if lead & 0xf0 != 0xe0 {
        return None;
    }
    let unit = three_byte_unit(&mut ahead, offset, lead).ok()?;
    if !is_low_surrogate(unit) {
        return None;
    }
    *parser = ahead;
    Some(unit)
}

/// Decodes modified UTF-8. Input that is already plain UTF-8 is borrowed.
/// Unpaired surrogates become U+FFFD.
pub fn parse_mutf8(bytes: &[u8]) -> ClassResult<Cow<'_, str>> {
    decode_mutf8(ByteParser::new(bytes))
}

/// Like `parse_mutf8`, over everything left in `parser`. Error offsets are
/// absolute positions in the parser's outermost input.
pub(crate) fn decode_mutf8(mut parser: ByteParser<'_>) -> ClassResult<Cow<'_, str>> {
    let bytes = parser.peek(parser.remaining())?;

    // Without raw NULs or four-byte leads, anything std accepts is identical
    // in both encodings; `C0 80` and encoded surrogates are rejected by std.
    if !bytes.iter().any(|&b| b == 0 || b >= 0xf0) {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Ok(Cow::Borrowed(text));
        }
    }

    let mut out = String::with_capacity(bytes.len());

    while !parser.is_empty() {
        let start = parser.position();
        let b1 = parser.parse_u8()?;

        let ch = match b1 {
            0x01..=0x7f => b1 as char,
            // 110xxxxx 10xxxxxx, which includes the `C0 80` NUL
            0xc0..=0xdf => {
                let codepoint = ((b1 & 0x1f) as u32) << 6 | continuation(&mut parser, start, b1)?;
                char::from_u32(codepoint).ok_or_else(|| invalid(start, b1))?
            }
            0xe0..=0xef => {
                let unit = three_byte_unit(&mut parser, start, b1)?;
                if is_high_surrogate(unit) {
                    match take_low_surrogate(&mut parser) {
                        Some(low) => {
                            let codepoint = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
                            char::from_u32(codepoint).ok_or_else(|| invalid(start, b1))?
                        }
                        None => REPLACEMENT,
                    }
                } else if is_low_surrogate(unit) {
                    REPLACEMENT
                } else {
                    char::from_u32(unit).ok_or_else(|| invalid(start, b1))?
                }
            }
            other => return Err(invalid(start, other)),
        };

        out.push(ch);
    }

    Ok(Cow::Owned(out))
}
