//! ECMA-335 instruction definitions and the once-built opcode lookup tables.
//!
//! The instruction set is declared as one flat definition slice ([`INSTRUCTION_SET`])
//! and bucketed on first use into two fixed-size tables: a primary table for
//! single-byte opcodes and an extended table for the `0xFE`-prefixed opcode space,
//! keyed by the low byte. The tables are built exactly once per process via
//! [`std::sync::OnceLock`] and are immutable afterwards, so lookups are race-free
//! without locking.
//!
//! The instruction set is closed and fixed; duplicate definitions (there are none)
//! would silently overwrite by last-write, so table construction has no error path.

use std::sync::OnceLock;

/// The escape byte introducing the extended (two-byte) opcode space.
pub const ESCAPE_BYTE: u8 = 0xFE;

/// Opcode of the direct call instruction (`call`).
pub const CALL: u16 = 0x0028;
/// Opcode of the virtual call instruction (`callvirt`).
pub const CALLVIRT: u16 = 0x006F;

/// Operand encoding of an instruction, determining how many bytes follow the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand bytes
    None,
    /// One unsigned byte (short-form variable/argument index, alignment)
    UInt8,
    /// One signed byte (short-form branch target, `ldc.i4.s`)
    Int8,
    /// Two unsigned bytes (long-form variable/argument index)
    UInt16,
    /// Four signed bytes (long-form branch target, `ldc.i4`)
    Int32,
    /// Eight signed bytes (`ldc.i8`)
    Int64,
    /// Four-byte IEEE 754 single (`ldc.r4`)
    Float32,
    /// Eight-byte IEEE 754 double (`ldc.r8`)
    Float64,
    /// Four-byte little-endian metadata token
    Token,
    /// Variable length: a 4-byte case count followed by that many 4-byte targets
    Switch,
}

impl OperandKind {
    /// Fixed operand width in bytes, or `None` for the variable-length `switch` form.
    #[must_use]
    pub fn width(self) -> Option<usize> {
        match self {
            OperandKind::None => Some(0),
            OperandKind::UInt8 | OperandKind::Int8 => Some(1),
            OperandKind::UInt16 => Some(2),
            OperandKind::Int32 | OperandKind::Float32 | OperandKind::Token => Some(4),
            OperandKind::Int64 | OperandKind::Float64 => Some(8),
            OperandKind::Switch => None,
        }
    }
}

/// A single instruction definition: symbolic identifier, numeric code, operand shape.
///
/// Extended-space instructions carry their full two-byte code (`0xFE00 | low`).
#[derive(Debug)]
pub struct InstructionDef {
    /// Symbolic instruction identifier (ECMA-335 mnemonic)
    pub mnemonic: &'static str,
    /// Numeric code; values below 0x100 are single-byte encodings
    pub code: u16,
    /// Operand encoding following the opcode
    pub operand: OperandKind,
}

impl InstructionDef {
    /// Returns true for call-class instructions (direct call, virtual call) whose
    /// token operand is subject to reference analysis.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self.code, CALL | CALLVIRT)
    }
}

const fn def(mnemonic: &'static str, code: u16, operand: OperandKind) -> InstructionDef {
    InstructionDef {
        mnemonic,
        code,
        operand,
    }
}

use OperandKind::{
    Float32, Float64, Int32, Int64, Int8, None as NoOperand, Switch, Token, UInt16, UInt8,
};

/// The full ECMA-335 instruction set, single-byte and `0xFE`-prefixed.
pub static INSTRUCTION_SET: &[InstructionDef] = &[
    def("nop", 0x00, NoOperand),
    def("break", 0x01, NoOperand),
    def("ldarg.0", 0x02, NoOperand),
    def("ldarg.1", 0x03, NoOperand),
    def("ldarg.2", 0x04, NoOperand),
    def("ldarg.3", 0x05, NoOperand),
    def("ldloc.0", 0x06, NoOperand),
    def("ldloc.1", 0x07, NoOperand),
    def("ldloc.2", 0x08, NoOperand),
    def("ldloc.3", 0x09, NoOperand),
    def("stloc.0", 0x0A, NoOperand),
    def("stloc.1", 0x0B, NoOperand),
    def("stloc.2", 0x0C, NoOperand),
    def("stloc.3", 0x0D, NoOperand),
    def("ldarg.s", 0x0E, UInt8),
    def("ldarga.s", 0x0F, UInt8),
    def("starg.s", 0x10, UInt8),
    def("ldloc.s", 0x11, UInt8),
    def("ldloca.s", 0x12, UInt8),
    def("stloc.s", 0x13, UInt8),
    def("ldnull", 0x14, NoOperand),
    def("ldc.i4.m1", 0x15, NoOperand),
    def("ldc.i4.0", 0x16, NoOperand),
    def("ldc.i4.1", 0x17, NoOperand),
    def("ldc.i4.2", 0x18, NoOperand),
    def("ldc.i4.3", 0x19, NoOperand),
    def("ldc.i4.4", 0x1A, NoOperand),
    def("ldc.i4.5", 0x1B, NoOperand),
    def("ldc.i4.6", 0x1C, NoOperand),
    def("ldc.i4.7", 0x1D, NoOperand),
    def("ldc.i4.8", 0x1E, NoOperand),
    def("ldc.i4.s", 0x1F, Int8),
    def("ldc.i4", 0x20, Int32),
    def("ldc.i8", 0x21, Int64),
    def("ldc.r4", 0x22, Float32),
    def("ldc.r8", 0x23, Float64),
    def("dup", 0x25, NoOperand),
    def("pop", 0x26, NoOperand),
    def("jmp", 0x27, Token),
    def("call", 0x28, Token),
    def("calli", 0x29, Token),
    def("ret", 0x2A, NoOperand),
    def("br.s", 0x2B, Int8),
    def("brfalse.s", 0x2C, Int8),
    def("brtrue.s", 0x2D, Int8),
    def("beq.s", 0x2E, Int8),
    def("bge.s", 0x2F, Int8),
    def("bgt.s", 0x30, Int8),
    def("ble.s", 0x31, Int8),
    def("blt.s", 0x32, Int8),
    def("bne.un.s", 0x33, Int8),
    def("bge.un.s", 0x34, Int8),
    def("bgt.un.s", 0x35, Int8),
    def("ble.un.s", 0x36, Int8),
    def("blt.un.s", 0x37, Int8),
    def("br", 0x38, Int32),
    def("brfalse", 0x39, Int32),
    def("brtrue", 0x3A, Int32),
    def("beq", 0x3B, Int32),
    def("bge", 0x3C, Int32),
    def("bgt", 0x3D, Int32),
    def("ble", 0x3E, Int32),
    def("blt", 0x3F, Int32),
    def("bne.un", 0x40, Int32),
    def("bge.un", 0x41, Int32),
    def("bgt.un", 0x42, Int32),
    def("ble.un", 0x43, Int32),
    def("blt.un", 0x44, Int32),
    def("switch", 0x45, Switch),
    def("ldind.i1", 0x46, NoOperand),
    def("ldind.u1", 0x47, NoOperand),
    def("ldind.i2", 0x48, NoOperand),
    def("ldind.u2", 0x49, NoOperand),
    def("ldind.i4", 0x4A, NoOperand),
    def("ldind.u4", 0x4B, NoOperand),
    def("ldind.i8", 0x4C, NoOperand),
    def("ldind.i", 0x4D, NoOperand),
    def("ldind.r4", 0x4E, NoOperand),
    def("ldind.r8", 0x4F, NoOperand),
    def("ldind.ref", 0x50, NoOperand),
    def("stind.ref", 0x51, NoOperand),
    def("stind.i1", 0x52, NoOperand),
    def("stind.i2", 0x53, NoOperand),
    def("stind.i4", 0x54, NoOperand),
    def("stind.i8", 0x55, NoOperand),
    def("stind.r4", 0x56, NoOperand),
    def("stind.r8", 0x57, NoOperand),
    def("add", 0x58, NoOperand),
    def("sub", 0x59, NoOperand),
    def("mul", 0x5A, NoOperand),
    def("div", 0x5B, NoOperand),
    def("div.un", 0x5C, NoOperand),
    def("rem", 0x5D, NoOperand),
    def("rem.un", 0x5E, NoOperand),
    def("and", 0x5F, NoOperand),
    def("or", 0x60, NoOperand),
    def("xor", 0x61, NoOperand),
    def("shl", 0x62, NoOperand),
    def("shr", 0x63, NoOperand),
    def("shr.un", 0x64, NoOperand),
    def("neg", 0x65, NoOperand),
    def("not", 0x66, NoOperand),
    def("conv.i1", 0x67, NoOperand),
    def("conv.i2", 0x68, NoOperand),
    def("conv.i4", 0x69, NoOperand),
    def("conv.i8", 0x6A, NoOperand),
    def("conv.r4", 0x6B, NoOperand),
    def("conv.r8", 0x6C, NoOperand),
    def("conv.u4", 0x6D, NoOperand),
    def("conv.u8", 0x6E, NoOperand),
    def("callvirt", 0x6F, Token),
    def("cpobj", 0x70, Token),
    def("ldobj", 0x71, Token),
    def("ldstr", 0x72, Token),
    def("newobj", 0x73, Token),
    def("castclass", 0x74, Token),
    def("isinst", 0x75, Token),
    def("conv.r.un", 0x76, NoOperand),
    def("unbox", 0x79, Token),
    def("throw", 0x7A, NoOperand),
    def("ldfld", 0x7B, Token),
    def("ldflda", 0x7C, Token),
    def("stfld", 0x7D, Token),
    def("ldsfld", 0x7E, Token),
    def("ldsflda", 0x7F, Token),
    def("stsfld", 0x80, Token),
    def("stobj", 0x81, Token),
    def("conv.ovf.i1.un", 0x82, NoOperand),
    def("conv.ovf.i2.un", 0x83, NoOperand),
    def("conv.ovf.i4.un", 0x84, NoOperand),
    def("conv.ovf.i8.un", 0x85, NoOperand),
    def("conv.ovf.u1.un", 0x86, NoOperand),
    def("conv.ovf.u2.un", 0x87, NoOperand),
    def("conv.ovf.u4.un", 0x88, NoOperand),
    def("conv.ovf.u8.un", 0x89, NoOperand),
    def("conv.ovf.i.un", 0x8A, NoOperand),
    def("conv.ovf.u.un", 0x8B, NoOperand),
    def("box", 0x8C, Token),
    def("newarr", 0x8D, Token),
    def("ldlen", 0x8E, NoOperand),
    def("ldelema", 0x8F, Token),
    def("ldelem.i1", 0x90, NoOperand),
    def("ldelem.u1", 0x91, NoOperand),
    def("ldelem.i2", 0x92, NoOperand),
    def("ldelem.u2", 0x93, NoOperand),
    def("ldelem.i4", 0x94, NoOperand),
    def("ldelem.u4", 0x95, NoOperand),
    def("ldelem.i8", 0x96, NoOperand),
    def("ldelem.i", 0x97, NoOperand),
    def("ldelem.r4", 0x98, NoOperand),
    def("ldelem.r8", 0x99, NoOperand),
    def("ldelem.ref", 0x9A, NoOperand),
    def("stelem.i", 0x9B, NoOperand),
    def("stelem.i1", 0x9C, NoOperand),
    def("stelem.i2", 0x9D, NoOperand),
    def("stelem.i4", 0x9E, NoOperand),
    def("stelem.i8", 0x9F, NoOperand),
    def("stelem.r4", 0xA0, NoOperand),
    def("stelem.r8", 0xA1, NoOperand),
    def("stelem.ref", 0xA2, NoOperand),
    def("ldelem", 0xA3, Token),
    def("stelem", 0xA4, Token),
    def("unbox.any", 0xA5, Token),
    def("conv.ovf.i1", 0xB3, NoOperand),
    def("conv.ovf.u1", 0xB4, NoOperand),
    def("conv.ovf.i2", 0xB5, NoOperand),
    def("conv.ovf.u2", 0xB6, NoOperand),
    def("conv.ovf.i4", 0xB7, NoOperand),
    def("conv.ovf.u4", 0xB8, NoOperand),
    def("conv.ovf.i8", 0xB9, NoOperand),
    def("conv.ovf.u8", 0xBA, NoOperand),
    def("refanyval", 0xC2, Token),
    def("ckfinite", 0xC3, NoOperand),
    def("mkrefany", 0xC6, Token),
    def("ldtoken", 0xD0, Token),
    def("conv.u2", 0xD1, NoOperand),
    def("conv.u1", 0xD2, NoOperand),
    def("conv.i", 0xD3, NoOperand),
    def("conv.ovf.i", 0xD4, NoOperand),
    def("conv.ovf.u", 0xD5, NoOperand),
    def("add.ovf", 0xD6, NoOperand),
    def("add.ovf.un", 0xD7, NoOperand),
    def("mul.ovf", 0xD8, NoOperand),
    def("mul.ovf.un", 0xD9, NoOperand),
    def("sub.ovf", 0xDA, NoOperand),
    def("sub.ovf.un", 0xDB, NoOperand),
    def("endfinally", 0xDC, NoOperand),
    def("leave", 0xDD, Int32),
    def("leave.s", 0xDE, Int8),
    def("stind.i", 0xDF, NoOperand),
    def("conv.u", 0xE0, NoOperand),
    def("arglist", 0xFE00, NoOperand),
    def("ceq", 0xFE01, NoOperand),
    def("cgt", 0xFE02, NoOperand),
    def("cgt.un", 0xFE03, NoOperand),
    def("clt", 0xFE04, NoOperand),
    def("clt.un", 0xFE05, NoOperand),
    def("ldftn", 0xFE06, Token),
    def("ldvirtftn", 0xFE07, Token),
    def("ldarg", 0xFE09, UInt16),
    def("ldarga", 0xFE0A, UInt16),
    def("starg", 0xFE0B, UInt16),
    def("ldloc", 0xFE0C, UInt16),
    def("ldloca", 0xFE0D, UInt16),
    def("stloc", 0xFE0E, UInt16),
    def("localloc", 0xFE0F, NoOperand),
    def("endfilter", 0xFE11, NoOperand),
    def("unaligned.", 0xFE12, UInt8),
    def("volatile.", 0xFE13, NoOperand),
    def("tail.", 0xFE14, NoOperand),
    def("initobj", 0xFE15, Token),
    def("constrained.", 0xFE16, Token),
    def("cpblk", 0xFE17, NoOperand),
    def("initblk", 0xFE18, NoOperand),
    def("rethrow", 0xFE1A, NoOperand),
    def("sizeof", 0xFE1C, Token),
    def("refanytype", 0xFE1D, NoOperand),
    def("readonly.", 0xFE1E, NoOperand),
];

/// Opcode lookup tables, bucketed once from [`INSTRUCTION_SET`].
pub struct OpcodeTable {
    primary: [Option<&'static InstructionDef>; 256],
    extended: [Option<&'static InstructionDef>; 256],
}

impl OpcodeTable {
    fn build() -> Self {
        let mut primary = [None; 256];
        let mut extended = [None; 256];

        for instruction in INSTRUCTION_SET {
            if instruction.code < 0x100 {
                primary[instruction.code as usize] = Some(instruction);
            } else {
                extended[(instruction.code & 0xFF) as usize] = Some(instruction);
            }
        }

        OpcodeTable { primary, extended }
    }

    /// Looks up a single-byte opcode in the primary table.
    #[must_use]
    pub fn primary(&self, opcode: u8) -> Option<&'static InstructionDef> {
        self.primary[opcode as usize]
    }

    /// Looks up the second byte of a `0xFE`-prefixed opcode in the extended table.
    #[must_use]
    pub fn extended(&self, opcode: u8) -> Option<&'static InstructionDef> {
        self.extended[opcode as usize]
    }
}

/// Returns the process-wide opcode table, building it on first use.
///
/// The table is immutable after construction; concurrent first calls race only on
/// who builds it, never on reads.
pub fn opcode_table() -> &'static OpcodeTable {
    static TABLE: OnceLock<OpcodeTable> = OnceLock::new();
    TABLE.get_or_init(OpcodeTable::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_lookup() {
        let table = opcode_table();

        let ret = table.primary(0x2A).unwrap();
        assert_eq!(ret.mnemonic, "ret");
        assert_eq!(ret.operand, OperandKind::None);

        let call = table.primary(0x28).unwrap();
        assert_eq!(call.mnemonic, "call");
        assert_eq!(call.operand, OperandKind::Token);
        assert!(call.is_call());
    }

    #[test]
    fn extended_lookup() {
        let table = opcode_table();

        let ceq = table.extended(0x01).unwrap();
        assert_eq!(ceq.mnemonic, "ceq");

        let ldarg = table.extended(0x09).unwrap();
        assert_eq!(ldarg.mnemonic, "ldarg");
        assert_eq!(ldarg.operand, OperandKind::UInt16);
    }

    #[test]
    fn unassigned_opcodes_are_absent() {
        let table = opcode_table();

        assert!(table.primary(0x24).is_none());
        assert!(table.primary(0xFF).is_none());
        assert!(table.extended(0x08).is_none());
        assert!(table.extended(0xFF).is_none());
    }

    #[test]
    fn call_class_is_exactly_call_and_callvirt() {
        let calls: Vec<_> = INSTRUCTION_SET
            .iter()
            .filter(|instruction| instruction.is_call())
            .map(|instruction| instruction.mnemonic)
            .collect();

        assert_eq!(calls, vec!["call", "callvirt"]);
    }

    #[test]
    fn call_class_operands_are_tokens() {
        for instruction in INSTRUCTION_SET.iter().filter(|def| def.is_call()) {
            assert_eq!(instruction.operand, OperandKind::Token);
            assert_eq!(instruction.operand.width(), Some(4));
        }
    }

    #[test]
    fn switch_width_is_variable() {
        assert_eq!(OperandKind::Switch.width(), None);
        assert_eq!(OperandKind::Int64.width(), Some(8));
    }

    #[test]
    fn every_definition_is_reachable_through_the_table() {
        let table = opcode_table();

        for instruction in INSTRUCTION_SET {
            let found = if instruction.code < 0x100 {
                table.primary(instruction.code as u8)
            } else {
                table.extended((instruction.code & 0xFF) as u8)
            };
            assert_eq!(found.unwrap().code, instruction.code);
        }
    }
}
