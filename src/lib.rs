// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # flatscope
//!
//! A static validator for flattened view-DTO mapping contracts in .NET CIL assemblies.
//!
//! Code-generation pipelines that "flatten" a class — replacing stored properties with
//! computed ones standing in for them — need proof that every computed accessor still
//! derives its value from retained state. `flatscope` provides that proof by static
//! inspection of the compiled CIL accessor bodies: it decodes each accessor's
//! instruction stream, resolves its call operands to symbolic method identities, and
//! runs a recursive, cycle-safe reachability analysis classifying each accessor as
//! valid, invalid, or muddied (tainted by dependence on another removed property).
//!
//! ## Features
//!
//! - **Compact CIL decoding** - full ECMA-335 opcode coverage with correct cursor
//!   advancement over every operand encoding, including variable-length `switch`
//! - **Cycle-safe reachability** - visited-set guarded recursion through in-type
//!   helper methods and muddied-property chains
//! - **Contract conformance** - checks each participant type against its declared
//!   truth interface (property presence by name and exact type)
//! - **Deterministic reports** - one merged diagnostic per offending class, ordered
//!   by registration, byte-identical across repeated and parallel runs
//!
//! ## Quick Start
//!
//! Add `flatscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! flatscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use flatscope::prelude::*;
//!
//! let universe = TypeUniverse::builder()
//!     .add_type(
//!         TypeDef::new(Token::type_def(1), "App.CoordinateView")
//!             .with_flags(TypeFlags::FLATTEN_PARTICIPANT),
//!     )
//!     .build();
//!
//! let report = MappingValidator::validate(&universe, ValidationConfig::default());
//! for (class_name, diagnostic) in &report {
//!     eprintln!("{class_name}:\n{diagnostic}");
//! }
//! ```
//!
//! ## Architecture
//!
//! `flatscope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - The pre-built type universe: types, properties, accessor bodies
//! - [`disassembler`] - CIL opcode tables and the call-site scanner
//! - [`validation`] - Reference resolution, reachability analysis, and the
//!   whole-universe orchestrator
//! - [`Error`] and [`Result`] - Decode-level error handling
//!
//! The validator never touches a live runtime type system or PE file. A front end
//! (project compilation, metadata reader, test fixture) builds a [`metadata::TypeUniverse`]
//! from whatever it could load, and every pass derives its results fresh from that
//! table. The only process-lifetime state is the opcode lookup table, built once on
//! first use and immutable thereafter.
//!
//! ## Error Handling
//!
//! Errors are confined to instruction-stream decoding ([`Error::Malformed`],
//! [`Error::OutOfBounds`]). Validation findings are data, not errors: a damaged
//! accessor body classifies as invalid and surfaces as a diagnostic, so one broken
//! class can never abort a whole-universe pass.
//!
//! ## Standards Compliance
//!
//! Instruction decoding follows the **ECMA-335 specification** (6th edition) for the
//! Common Language Infrastructure.
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification

#[macro_use]
pub(crate) mod error;
pub(crate) mod parser;


/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use flatscope::prelude::*;
///
/// let universe = TypeUniverse::builder().build();
/// let report = MappingValidator::validate(&universe, ValidationConfig::default());
/// assert!(report.is_empty());
/// ```
pub mod prelude;

/// CIL instruction decoding based on ECMA-335
///
/// This module provides the decoding surface the validator needs:
///
/// - **Opcode Tables**: the full ECMA-335 instruction set, bucketed once into
///   primary and extended lookup tables
/// - **Call-Site Scanning**: walk a raw accessor body and collect every resolved
///   call target in stream order
///
/// # Key Types
///
/// - [`disassembler::InstructionDef`] - A single instruction definition
/// - [`disassembler::OperandKind`] - Operand encoding and byte width
/// - [`disassembler::OpcodeTable`] - The process-wide lookup tables
///
/// # Main Functions
///
/// - [`disassembler::scan_calls`] - Collect resolved call targets from a body
pub mod disassembler;

/// The pre-built symbol table the validator consumes
///
/// Types, flattened property sets, accessor identities and raw bodies, registered by
/// a front end via [`metadata::UniverseBuilder`] and exposed read-only through
/// [`metadata::TypeUniverse`].
///
/// # Key Types
///
/// - [`metadata::Token`] - 32-bit metadata token used as type/method identity
/// - [`metadata::TypeDef`] / [`metadata::Property`] / [`metadata::MethodDef`]
/// - [`metadata::TypeFlags`] / [`metadata::PropertyFlags`] / [`metadata::AccessorFlags`] -
///   flattening tags
pub mod metadata;

/// Flattening-contract validation
///
/// Reference resolution, the recursive reachability core, and the whole-universe
/// orchestrator with its append-only diagnostic report.
///
/// # Key Types
///
/// - [`validation::MappingValidator`] - Top-level entry point
/// - [`validation::Outcome`] - Valid / Invalid / Muddied classification
/// - [`validation::MappingReport`] - Ordered, per-class-merged diagnostics
/// - [`validation::ValidationConfig`] - Pass-level switches
pub mod validation;

pub use crate::error::Error;
pub use crate::parser::Parser;

/// Specialized [`crate::Result`] type for operations that can fail with [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;
