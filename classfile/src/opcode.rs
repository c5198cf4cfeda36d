//! Opcode table: mnemonic and trailing operand length for every assigned
//! opcode byte.

/// How many operand bytes follow an opcode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperandLen {
    Fixed(u8),
    /// Length is determined by the operands themselves: the switches and
    /// `wide`.
    Variable,
}

macro_rules! opcodes {
    ($($opcode:literal => $name:ident, $display:expr, $len:expr;)*) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum Opcode {
            $($name = $opcode,)*
        }

        /// Every assigned opcode, in byte order.
        pub static OPCODES: &[Opcode] = &[
            $(Opcode::$name,)*
        ];

        impl Opcode {
            pub fn from_byte(byte: u8) -> Option<Opcode> {
                match byte {
                    $($opcode => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$name => $display,)*
                }
            }

            pub fn operand_len(self) -> OperandLen {
                use self::OperandLen::*;
                match self {
                    $(Opcode::$name => $len,)*
                }
            }
        }
    };
}

impl Opcode {
    pub fn byte(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

opcodes! {
    0x00 => Nop, "nop", Fixed(0);
    0x01 => AconstNull, "aconst_null", Fixed(0);
    0x02 => IconstM1, "iconst_m1", Fixed(0);
    0x03 => Iconst0, "iconst_0", Fixed(0);
    0x04 => Iconst1, "iconst_1", Fixed(0);
    0x05 => Iconst2, "iconst_2", Fixed(0);
    0x06 => Iconst3, "iconst_3", Fixed(0);
    0x07 => Iconst4, "iconst_4", Fixed(0);
    0x08 => Iconst5, "iconst_5", Fixed(0);
    0x09 => Lconst0, "lconst_0", Fixed(0);
    0x0a => Lconst1, "lconst_1", Fixed(0);
    0x0b => Fconst0, "fconst_0", Fixed(0);
    0x0c => Fconst1, "fconst_1", Fixed(0);
    0x0d => Fconst2, "fconst_2", Fixed(0);
    0x0e => Dconst0, "dconst_0", Fixed(0);
    0x0f => Dconst1, "dconst_1", Fixed(0);
    0x10 => Bipush, "bipush", Fixed(1);
    0x11 => Sipush, "sipush", Fixed(2);
    0x12 => Ldc, "ldc", Fixed(1);
    0x13 => LdcW, "ldc_w", Fixed(2);
    0x14 => Ldc2W, "ldc2_w", Fixed(2);
    0x15 => Iload, "iload", Fixed(1);
    0x16 => Lload, "lload", Fixed(1);
    0x17 => Fload, "fload", Fixed(1);
    0x18 => Dload, "dload", Fixed(1);
    0x19 => Aload, "aload", Fixed(1);
    0x1a => Iload0, "iload_0", Fixed(0);
    0x1b => Iload1, "iload_1", Fixed(0);
    0x1c => Iload2, "iload_2", Fixed(0);
    0x1d => Iload3, "iload_3", Fixed(0);
    0x1e => Lload0, "lload_0", Fixed(0);
    0x1f => Lload1, "lload_1", Fixed(0);
    0x20 => Lload2, "lload_2", Fixed(0);
    0x21 => Lload3, "lload_3", Fixed(0);
    0x22 => Fload0, "fload_0", Fixed(0);
    0x23 => Fload1, "fload_1", Fixed(0);
    0x24 => Fload2, "fload_2", Fixed(0);
    0x25 => Fload3, "fload_3", Fixed(0);
    0x26 => Dload0, "dload_0", Fixed(0);
    0x27 => Dload1, "dload_1", Fixed(0);
    0x28 => Dload2, "dload_2", Fixed(0);
    0x29 => Dload3, "dload_3", Fixed(0);
    0x2a => Aload0, "aload_0", Fixed(0);
    0x2b => Aload1, "aload_1", Fixed(0);
    0x2c => Aload2, "aload_2", Fixed(0);
    0x2d => Aload3, "aload_3", Fixed(0);
    0x2e => Iaload, "iaload", Fixed(0);
    0x2f => Laload, "laload", Fixed(0);
    0x30 => Faload, "faload", Fixed(0);
    0x31 => Daload, "daload", Fixed(0);
    0x32 => Aaload, "aaload", Fixed(0);
    0x33 => Baload, "baload", Fixed(0);
    0x34 => Caload, "caload", Fixed(0);
    0x35 => Saload, "saload", Fixed(0);
    0x36 => Istore, "istore", Fixed(1);
    0x37 => Lstore, "lstore", Fixed(1);
    0x38 => Fstore, "fstore", Fixed(1);
    0x39 => Dstore, "dstore", Fixed(1);
    0x3a => Astore, "astore", Fixed(1);
    0x3b => Istore0, "istore_0", Fixed(0);
    0x3c => Istore1, "istore_1", Fixed(0);
    0x3d => Istore2, "istore_2", Fixed(0);
    0x3e => Istore3, "istore_3", Fixed(0);
    0x3f => Lstore0, "lstore_0", Fixed(0);
    0x40 => Lstore1, "lstore_1", Fixed(0);
    0x41 => Lstore2, "lstore_2", Fixed(0);
    0x42 => Lstore3, "lstore_3", Fixed(0);
    0x43 => Fstore0, "fstore_0", Fixed(0);
    0x44 => Fstore1, "fstore_1", Fixed(0);
    0x45 => Fstore2, "fstore_2", Fixed(0);
    0x46 => Fstore3, "fstore_3", Fixed(0);
    0x47 => Dstore0, "dstore_0", Fixed(0);
    0x48 => Dstore1, "dstore_1", Fixed(0);
    0x49 => Dstore2, "dstore_2", Fixed(0);
    0x4a => Dstore3, "dstore_3", Fixed(0);
    0x4b => Astore0, "astore_0", Fixed(0);
    0x4c => Astore1, "astore_1", Fixed(0);
    0x4d => Astore2, "astore_2", Fixed(0);
    0x4e => Astore3, "astore_3", Fixed(0);
    0x4f => Iastore, "iastore", Fixed(0);
    0x50 => Lastore, "lastore", Fixed(0);
    0x51 => Fastore, "fastore", Fixed(0);
    0x52 => Dastore, "dastore", Fixed(0);
    0x53 => Aastore, "aastore", Fixed(0);
    0x54 => Bastore, "bastore", Fixed(0);
    0x55 => Castore, "castore", Fixed(0);
    0x56 => Sastore, "sastore", Fixed(0);
    0x57 => Pop, "pop", Fixed(0);
    0x58 => Pop2, "pop2", Fixed(0);
    0x59 => Dup, "dup", Fixed(0);
    0x5a => DupX1, "dup_x1", Fixed(0);
    0x5b => DupX2, "dup_x2", Fixed(0);
    0x5c => Dup2, "dup2", Fixed(0);
    0x5d => Dup2X1, "dup2_x1", Fixed(0);
    0x5e => Dup2X2, "dup2_x2", Fixed(0);
    0x5f => Swap, "swap", Fixed(0);
    0x60 => Iadd, "iadd", Fixed(0);
    0x61 => Ladd, "ladd", Fixed(0);
    0x62 => Fadd, "fadd", Fixed(0);
    0x63 => Dadd, "dadd", Fixed(0);
    0x64 => Isub, "isub", Fixed(0);
    0x65 => Lsub, "lsub", Fixed(0);
    0x66 => Fsub, "fsub", Fixed(0);
    0x67 => Dsub, "dsub", Fixed(0);
    0x68 => Imul, "imul", Fixed(0);
    0x69 => Lmul, "lmul", Fixed(0);
    0x6a => Fmul, "fmul", Fixed(0);
    0x6b => Dmul, "dmul", Fixed(0);
    0x6c => Idiv, "idiv", Fixed(0);
    0x6d => Ldiv, "ldiv", Fixed(0);
    0x6e => Fdiv, "fdiv", Fixed(0);
    0x6f => Ddiv, "ddiv", Fixed(0);
    0x70 => Irem, "irem", Fixed(0);
    0x71 => Lrem, "lrem", Fixed(0);
    0x72 => Frem, "frem", Fixed(0);
    0x73 => Drem, "drem", Fixed(0);
    0x74 => Ineg, "ineg", Fixed(0);
    0x75 => Lneg, "lneg", Fixed(0);
    0x76 => Fneg, "fneg", Fixed(0);
    0x77 => Dneg, "dneg", Fixed(0);
    0x78 => Ishl, "ishl", Fixed(0);
    0x79 => Lshl, "lshl", Fixed(0);
    0x7a => Ishr, "ishr", Fixed(0);
    0x7b => Lshr, "lshr", Fixed(0);
    0x7c => Iushr, "iushr", Fixed(0);
    0x7d => Lushr, "lushr", Fixed(0);
    0x7e => Iand, "iand", Fixed(0);
    0x7f => Land, "land", Fixed(0);
    0x80 => Ior, "ior", Fixed(0);
    0x81 => Lor, "lor", Fixed(0);
    0x82 => Ixor, "ixor", Fixed(0);
    0x83 => Lxor, "lxor", Fixed(0);
    0x84 => Iinc, "iinc", Fixed(2);
    0x85 => I2l, "i2l", Fixed(0);
    0x86 => I2f, "i2f", Fixed(0);
    0x87 => I2d, "i2d", Fixed(0);
    0x88 => L2i, "l2i", Fixed(0);
    0x89 => L2f, "l2f", Fixed(0);
    0x8a => L2d, "l2d", Fixed(0);
    0x8b => F2i, "f2i", Fixed(0);
    0x8c => F2l, "f2l", Fixed(0);
    0x8d => F2d, "f2d", Fixed(0);
    0x8e => D2i, "d2i", Fixed(0);
    0x8f => D2l, "d2l", Fixed(0);
    0x90 => D2f, "d2f", Fixed(0);
    0x91 => I2b, "i2b", Fixed(0);
    0x92 => I2c, "i2c", Fixed(0);
    0x93 => I2s, "i2s", Fixed(0);
    0x94 => Lcmp, "lcmp", Fixed(0);
    0x95 => Fcmpl, "fcmpl", Fixed(0);
    0x96 => Fcmpg, "fcmpg", Fixed(0);
    0x97 => Dcmpl, "dcmpl", Fixed(0);
    0x98 => Dcmpg, "dcmpg", Fixed(0);
    0x99 => Ifeq, "ifeq", Fixed(2);
    0x9a => Ifne, "ifne", Fixed(2);
    0x9b => Iflt, "iflt", Fixed(2);
    0x9c => Ifge, "ifge", Fixed(2);
    0x9d => Ifgt, "ifgt", Fixed(2);
    0x9e => Ifle, "ifle", Fixed(2);
    0x9f => IfIcmpeq, "if_icmpeq", Fixed(2);
    0xa0 => IfIcmpne, "if_icmpne", Fixed(2);
    0xa1 => IfIcmplt, "if_icmplt", Fixed(2);
    0xa2 => IfIcmpge, "if_icmpge", Fixed(2);
    0xa3 => IfIcmpgt, "if_icmpgt", Fixed(2);
    0xa4 => IfIcmple, "if_icmple", Fixed(2);
    0xa5 => IfAcmpeq, "if_acmpeq", Fixed(2);
    0xa6 => IfAcmpne, "if_acmpne", Fixed(2);
    0xa7 => Goto, "goto", Fixed(2);
    0xa8 => Jsr, "jsr", Fixed(2);
    0xa9 => Ret, "ret", Fixed(1);
    0xaa => Tableswitch, "tableswitch", Variable;
    0xab => Lookupswitch, "lookupswitch", Variable;
    0xac => Ireturn, "ireturn", Fixed(0);
    0xad => Lreturn, "lreturn", Fixed(0);
    0xae => Freturn, "freturn", Fixed(0);
    0xaf => Dreturn, "dreturn", Fixed(0);
    0xb0 => Areturn, "areturn", Fixed(0);
    0xb1 => Return, "return", Fixed(0);
    0xb2 => Getstatic, "getstatic", Fixed(2);
    0xb3 => Putstatic, "putstatic", Fixed(2);
    0xb4 => Getfield, "getfield", Fixed(2);
    0xb5 => Putfield, "putfield", Fixed(2);
    0xb6 => Invokevirtual, "invokevirtual", Fixed(2);
    0xb7 => Invokespecial, "invokespecial", Fixed(2);
    0xb8 => Invokestatic, "invokestatic", Fixed(2);
    0xb9 => Invokeinterface, "invokeinterface", Fixed(4);
    0xba => Invokedynamic, "invokedynamic", Fixed(4);
    0xbb => New, "new", Fixed(2);
    0xbc => Newarray, "newarray", Fixed(1);
    0xbd => Anewarray, "anewarray", Fixed(2);
    0xbe => Arraylength, "arraylength", Fixed(0);
    0xbf => Athrow, "athrow", Fixed(0);
    0xc0 => Checkcast, "checkcast", Fixed(2);
    0xc1 => Instanceof, "instanceof", Fixed(2);
    0xc2 => Monitorenter, "monitorenter", Fixed(0);
    0xc3 => Monitorexit, "monitorexit", Fixed(0);
    0xc4 => Wide, "wide", Variable;
    0xc5 => Multianewarray, "multianewarray", Fixed(3);
    0xc6 => Ifnull, "ifnull", Fixed(2);
    0xc7 => Ifnonnull, "ifnonnull", Fixed(2);
    0xc8 => GotoW, "goto_w", Fixed(4);
    0xc9 => JsrW, "jsr_w", Fixed(4);

    // reserved
    0xca => Breakpoint, "breakpoint", Fixed(0);
    0xfe => Impdep1, "impdep1", Fixed(0);
    0xff => Impdep2, "impdep2", Fixed(0);
}
