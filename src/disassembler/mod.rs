//! CIL instruction decoding for call-reference analysis.
//!
//! This module provides the minimal disassembly surface the flattening validator
//! needs: the ECMA-335 opcode tables and a call-site scanner that walks an accessor
//! body and reports every resolved call target in stream order.
//!
//! # Key Types
//! - [`InstructionDef`] - a single instruction definition (mnemonic, code, operand)
//! - [`OperandKind`] - operand encoding and width
//! - [`OpcodeTable`] - the once-built primary/extended lookup tables
//!
//! # Main Functions
//! - [`opcode_table`] - access the process-wide opcode table
//! - [`scan_calls`] - collect resolved call targets from a raw body

mod instructions;
mod scanner;

pub use instructions::{
    opcode_table, InstructionDef, OpcodeTable, OperandKind, ESCAPE_BYTE, INSTRUCTION_SET,
};
pub use scanner::scan_calls;
