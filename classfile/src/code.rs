//! The `Code` attribute: a method's bytecode, its exception table, and any
//! attributes nested inside it.
//!
//! ```txt
//! Code {
//!     max_stack: u16,
//!     max_locals: u16,
//!     code_length: u32,
//!     code: [u8; code_length],
//!     handlers_len: u16,
//!     handlers: [ExceptionHandler; handlers_len],
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//!
//! ExceptionHandler {
//!     start_pc: u16,
//!     end_pc: u16,
//!     handler_pc: u16,
//!     catch_type: u16,
//! }
//! ```
//!
//! Instructions are decoded into opcode plus raw operand bytes. Most opcodes
//! have a fixed operand length; `tableswitch`, `lookupswitch` and `wide`
//! encode their own length and are sized before their operands are taken.

use crate::{
    attribute::{parse_attributes, AttributeInfo},
    constant::{ConstantPool, PoolIndex},
    opcode::{Opcode, OperandLen},
    located,
    parse::{ByteParser, ParseError},
    ClassError, ClassResult,
};
use std::ops::Range;
use tracing::trace;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HalfOpen<Idx> {
    pub start: Idx,
    pub end: Idx,
}

impl<I> From<Range<I>> for HalfOpen<I> {
    fn from(range: Range<I>) -> Self {
        HalfOpen {
            start: range.start,
            end: range.end,
        }
    }
}

impl<I: PartialOrd> HalfOpen<I> {
    pub fn contains(&self, idx: &I) -> bool {
        self.start <= *idx && *idx < self.end
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum CatchType {
    /// Catch type index 0, used for `finally` blocks.
    Any,
    /// Internal name of the caught class.
    Class(String),
}

impl std::fmt::Display for CatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CatchType::Any => f.write_str("any"),
            CatchType::Class(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExceptionHandler {
    /// Code offsets covered by this handler.
    pub range: HalfOpen<usize>,
    pub handler_pc: usize,
    pub catch_type: CatchType,
}

impl ExceptionHandler {
    pub fn new(
        start: usize,
        end: usize,
        handler_pc: usize,
        catch_type: CatchType,
    ) -> ClassResult<ExceptionHandler> {
        if end <= start {
            return Err(ClassError::MalformedExceptionRange { start, end });
        }

        Ok(ExceptionHandler {
            range: HalfOpen::from(start..end),
            handler_pc,
            catch_type,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SwitchTable {
    /// Jump targets for the keys `low..=low + offsets.len() - 1`.
    Table {
        default: i32,
        low: i32,
        offsets: Vec<i32>,
    },
    /// `(key, offset)` pairs.
    Lookup { default: i32, pairs: Vec<(i32, i32)> },
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
    /// Offset of the opcode byte from the start of the code array.
    pub pc: usize,
    pub opcode: Opcode,
    /// Everything after the opcode byte, including switch padding.
    pub operands: Box<[u8]>,
}

impl Instruction {
    /// Encoded size in bytes, opcode included.
    pub fn len(&self) -> usize {
        1 + self.operands.len()
    }

    /// Interprets the operands of a `tableswitch` or `lookupswitch`.
    pub fn switch_table(&self) -> Option<SwitchTable> {
        let mut operands = ByteParser::new(&self.operands);
        operands.take(switch_padding(self.pc)).ok()?;
        let default = operands.parse_i32().ok()?;

        match self.opcode {
            Opcode::Tableswitch => {
                let low = operands.parse_i32().ok()?;
                let high = operands.parse_i32().ok()?;
                let count = usize::try_from(high as i64 - low as i64 + 1).ok()?;
                if count > operands.remaining() / 4 {
                    return None;
                }
                let offsets = operands.seq(count, ByteParser::parse_i32).ok()?;
                Some(SwitchTable::Table {
                    default,
                    low,
                    offsets,
                })
            }
            Opcode::Lookupswitch => {
                let npairs = usize::try_from(operands.parse_i32().ok()?).ok()?;
                if npairs > operands.remaining() / 8 {
                    return None;
                }
                let pairs = operands
                    .seq(npairs, |input| {
                        Ok::<_, ParseError>((input.parse_i32()?, input.parse_i32()?))
                    })
                    .ok()?;
                Some(SwitchTable::Lookup { default, pairs })
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Code {
    /// The maximum depth of the operand stack
    pub max_stack: u16,
    /// Local variable slots, including method parameters. `long` and `double`
    /// take up two.
    pub max_locals: u16,
    pub code_length: usize,
    pub instructions: Box<[Instruction]>,
    pub handlers: Box<[ExceptionHandler]>,
    /// Usually `LineNumberTable`, `LocalVariableTable` and `StackMapTable`.
    pub attributes: Box<[AttributeInfo]>,
}

impl Code {
    /// The instruction starting at `pc`, if any.
    pub fn instruction_at(&self, pc: usize) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&pc, |insn| insn.pc)
            .ok()
            .map(|idx| &self.instructions[idx])
    }
}

/// Bytes between a switch opcode at `pc` and its first 4-byte aligned operand.
fn switch_padding(pc: usize) -> usize {
    (4 - (pc + 1) % 4) % 4
}

/// Works out how many operand bytes follow a variable-length opcode at `pc`,
/// without consuming anything.
fn variable_operand_len(code: &ByteParser<'_>, pc: usize, opcode: Opcode) -> ClassResult<usize> {
    let malformed = ClassError::MalformedSwitch { offset: pc };
    let operands = pc + 1;
    let padding = switch_padding(pc);
    let aligned = operands + padding;

    match opcode {
        // default, low, high, offsets[high - low + 1]
        Opcode::Tableswitch => {
            let low = code.read_i32_at(aligned + 4)?;
            let high = code.read_i32_at(aligned + 8)?;
            if high < low {
                return Err(malformed);
            }
            let count = high as i64 - low as i64 + 1;
            usize::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(4))
                .and_then(|len| len.checked_add(padding + 12))
                .ok_or(malformed)
        }

        // default, npairs, pairs[npairs]
        Opcode::Lookupswitch => {
            let npairs = code.read_i32_at(aligned + 4)?;
            usize::try_from(npairs)
                .ok()
                .and_then(|npairs| npairs.checked_mul(8))
                .and_then(|len| len.checked_add(padding + 8))
                .ok_or(malformed)
        }

        Opcode::Wide => {
            let modified = code.read_u8_at(operands)?;
            match Opcode::from_byte(modified) {
                Some(
                    Opcode::Iload
                    | Opcode::Lload
                    | Opcode::Fload
                    | Opcode::Dload
                    | Opcode::Aload
                    | Opcode::Istore
                    | Opcode::Lstore
                    | Opcode::Fstore
                    | Opcode::Dstore
                    | Opcode::Astore
                    | Opcode::Ret,
                ) => Ok(3),
                Some(Opcode::Iinc) => Ok(5),
                _ => Err(ClassError::UnsupportedOpcode {
                    offset: operands,
                    opcode: modified,
                }),
            }
        }

        other => Err(ClassError::UnsupportedOpcode {
            offset: pc,
            opcode: other.byte(),
        }),
    }
}

/// Decodes one instruction. `code` must be positioned relative to the start
/// of the code array, since switch padding depends on it.
pub fn parse_instruction(code: &mut ByteParser<'_>) -> ClassResult<Instruction> {
    let pc = code.offset;
    let byte = code.parse_u8()?;
    let opcode = Opcode::from_byte(byte).ok_or(ClassError::UnsupportedOpcode {
        offset: pc,
        opcode: byte,
    })?;

    let len = match opcode.operand_len() {
        OperandLen::Fixed(len) => len as usize,
        OperandLen::Variable => variable_operand_len(code, pc, opcode)?,
    };
    let operands = code.take(len)?;
    trace!(pc, %opcode, len, "decoded instruction");

    Ok(Instruction {
        pc,
        opcode,
        operands: operands.into(),
    })
}

pub fn parse_instructions(mut code: ByteParser<'_>) -> ClassResult<Vec<Instruction>> {
    let mut instructions = Vec::new();
    while !code.is_empty() {
        instructions.push(located(&mut code, parse_instruction)?);
    }
    Ok(instructions)
}

pub fn parse_exception_handler(
    input: &mut ByteParser<'_>,
    pool: &ConstantPool,
    code_length: usize,
) -> ClassResult<ExceptionHandler> {
    let start = input.parse_u16()? as usize;
    let end = input.parse_u16()? as usize;
    let handler_pc = input.parse_u16()? as usize;

    let catch_type = match PoolIndex::nonzero(input.parse_u16()?) {
        None => CatchType::Any,
        Some(index) => CatchType::Class(pool.class_name(index)?.into()),
    };

    let handler = ExceptionHandler::new(start, end, handler_pc, catch_type)?;
    if end > code_length {
        return Err(ClassError::MalformedExceptionRange { start, end });
    }
    Ok(handler)
}

pub fn parse_code(input: &mut ByteParser<'_>, pool: &ConstantPool) -> ClassResult<Code> {
    let max_stack = input.parse_u16()?;
    let max_locals = input.parse_u16()?;
    let code_length = input.parse_u32()?;
    let code_length =
        usize::try_from(code_length).map_err(|_| ClassError::AttributeTooLarge(code_length))?;
    let instructions = parse_instructions(input.split(code_length)?)?;

    let handlers_len = input.parse_u16()? as usize;
    let handlers = input.seq(handlers_len, |input| {
        located(input, |input| parse_exception_handler(input, pool, code_length))
    })?;

    let attributes = parse_attributes(input, pool)?;

    trace!(
        max_stack,
        max_locals,
        code_length,
        instructions = instructions.len(),
        handlers = handlers.len(),
        "decoded code"
    );

    Ok(Code {
        max_stack,
        max_locals,
        code_length,
        instructions: instructions.into(),
        handlers: handlers.into(),
        attributes,
    })
}
