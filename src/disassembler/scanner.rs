//! Call-site scanner for raw accessor instruction streams.
//!
//! [`scan_calls`] walks a method body byte-by-byte, decoding each instruction through
//! the opcode tables and collecting the resolved callee of every call-class
//! instruction. The operand width of *every* instruction is decoded — including the
//! variable-length `switch` form — so the cursor always lands on the next opcode even
//! when unrelated variable-length instructions precede a call.
//!
//! # Example
//!
//! ```rust
//! use flatscope::disassembler::scan_calls;
//! use flatscope::metadata::{MethodDef, Token, TypeUniverse};
//!
//! let helper = Token::method_def(1);
//! let universe = TypeUniverse::builder()
//!     .add_method(MethodDef::new(helper, "Helper", Token::type_def(1), None))
//!     .build();
//!
//! // call 0x06000001; ret
//! let body = [0x28, 0x01, 0x00, 0x00, 0x06, 0x2A];
//! let targets = scan_calls(&body, &universe)?;
//! assert_eq!(targets, vec![helper]);
//! # Ok::<(), flatscope::Error>(())
//! ```

use crate::{
    disassembler::instructions::{opcode_table, ESCAPE_BYTE},
    metadata::{Token, TypeUniverse},
    parser::Parser,
    Result,
};

/// Scans an instruction stream and returns the ordered list of resolved call targets.
///
/// For each call-class instruction (`call`, `callvirt`) the 4-byte little-endian
/// operand is read as a metadata token and resolved against `universe`; tokens that do
/// not resolve to a loaded method (cross-module calls, stripped metadata) are skipped
/// silently — they are irrelevant to in-type reference analysis. Duplicates are
/// preserved in stream order.
///
/// An empty body yields an empty list. The scan holds no hidden state; rerunning over
/// the same bytes yields identical results.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for unknown or reserved opcodes and
/// [`crate::Error::OutOfBounds`] when an operand extends past the end of the stream.
pub fn scan_calls(body: &[u8], universe: &TypeUniverse) -> Result<Vec<Token>> {
    let table = opcode_table();
    let mut parser = Parser::new(body);
    let mut targets = Vec::new();

    while parser.has_more_data() {
        let first_byte = parser.read_le::<u8>()?;

        let instruction = if first_byte == ESCAPE_BYTE {
            let second_byte = parser.read_le::<u8>()?;
            match table.extended(second_byte) {
                Some(instruction) => instruction,
                None => return Err(malformed_error!("Invalid opcode: FE {:02X}", second_byte)),
            }
        } else {
            match table.primary(first_byte) {
                Some(instruction) => instruction,
                None => return Err(malformed_error!("Invalid opcode: {:02X}", first_byte)),
            }
        };

        if instruction.is_call() {
            let token = Token::new(parser.read_le::<u32>()?);
            if let Some(resolved) = universe.resolve_call(token) {
                targets.push(resolved);
            }
            continue;
        }

        match instruction.operand.width() {
            Some(width) => parser.advance_by(width)?,
            None => {
                // switch: 4-byte case count, then one 4-byte target per case
                let case_count = parser.read_le::<u32>()?;
                parser.advance_by((case_count as usize).saturating_mul(4))?;
            }
        }
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MethodDef;
    use crate::test::{body, call, callvirt};

    fn universe_with(methods: &[Token]) -> TypeUniverse {
        let mut builder = TypeUniverse::builder();
        for &token in methods {
            builder = builder.add_method(MethodDef::new(token, "M", Token::type_def(1), None));
        }
        builder.build()
    }

    #[test]
    fn empty_body_yields_no_calls() {
        let universe = universe_with(&[]);
        assert!(scan_calls(&[], &universe).unwrap().is_empty());
    }

    #[test]
    fn body_without_calls_yields_nothing() {
        let universe = universe_with(&[]);
        // ldarg.0; ldfld <field token>; ret
        let stream = body(&[&[0x02], &[0x7B, 0x01, 0x00, 0x00, 0x04], &[0x2A]]);
        assert!(scan_calls(&stream, &universe).unwrap().is_empty());
    }

    #[test]
    fn direct_call_is_collected() {
        let target = Token::method_def(5);
        let universe = universe_with(&[target]);

        let stream = body(&[&[0x02], &call(target), &[0x2A]]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn virtual_call_is_collected() {
        let target = Token::method_def(5);
        let universe = universe_with(&[target]);

        let stream = body(&[&[0x02], &callvirt(target), &[0x2A]]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn duplicates_are_preserved_in_order() {
        let first = Token::method_def(1);
        let second = Token::method_def(2);
        let universe = universe_with(&[first, second]);

        let stream = body(&[&call(first), &call(second), &call(first), &[0x2A]]);
        assert_eq!(
            scan_calls(&stream, &universe).unwrap(),
            vec![first, second, first]
        );
    }

    #[test]
    fn unresolvable_token_is_swallowed() {
        let known = Token::method_def(1);
        let universe = universe_with(&[known]);

        // A MemberRef-style token (0x0A) that the universe cannot resolve.
        let stream = body(&[&call(Token::new(0x0A000001)), &call(known), &[0x2A]]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![known]);
    }

    #[test]
    fn non_call_token_operands_are_skipped() {
        let target = Token::method_def(1);
        let universe = universe_with(&[target]);

        // newobj takes a token operand too, but is not call-class; its operand
        // happens to equal the known method token and must not be collected.
        let stream = body(&[&[0x73], &target.value().to_le_bytes(), &call(target), &[0x2A]]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn variable_length_operands_before_a_call() {
        let target = Token::method_def(1);
        let universe = universe_with(&[target]);

        // ldc.i8 <8 bytes>; ldc.i4.s <1 byte>; call; ret — wrong cursor advancement
        // over either operand would desynchronize the call decode.
        let stream = body(&[
            &[0x21, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88],
            &[0x1F, 0x2A],
            &call(target),
            &[0x2A],
        ]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn switch_operand_is_skipped_entirely() {
        let target = Token::method_def(1);
        let universe = universe_with(&[target]);

        // switch with 2 cases (8 bytes of targets), then a call
        let stream = body(&[
            &[0x45, 0x02, 0x00, 0x00, 0x00],
            &[0x0A, 0x00, 0x00, 0x00],
            &[0x14, 0x00, 0x00, 0x00],
            &call(target),
            &[0x2A],
        ]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn extended_opcodes_are_decoded() {
        let target = Token::method_def(1);
        let universe = universe_with(&[target]);

        // ceq (FE 01); ldarg 7 (FE 09 07 00); call; ret
        let stream = body(&[
            &[0xFE, 0x01],
            &[0xFE, 0x09, 0x07, 0x00],
            &call(target),
            &[0x2A],
        ]);
        assert_eq!(scan_calls(&stream, &universe).unwrap(), vec![target]);
    }

    #[test]
    fn invalid_opcode_is_malformed() {
        let universe = universe_with(&[]);
        assert!(scan_calls(&[0xFF], &universe).is_err());
    }

    #[test]
    fn invalid_extended_opcode_is_malformed() {
        let universe = universe_with(&[]);
        assert!(scan_calls(&[0xFE, 0xFF], &universe).is_err());
    }

    #[test]
    fn truncated_operand_is_out_of_bounds() {
        let universe = universe_with(&[]);
        // call with only two operand bytes
        let result = scan_calls(&[0x28, 0x01, 0x00], &universe);
        assert!(matches!(result, Err(crate::Error::OutOfBounds)));
    }

    #[test]
    fn rescanning_is_stable() {
        let target = Token::method_def(1);
        let universe = universe_with(&[target]);
        let stream = body(&[&call(target), &[0x2A]]);

        let first = scan_calls(&stream, &universe).unwrap();
        let second = scan_calls(&stream, &universe).unwrap();
        assert_eq!(first, second);
    }
}
