//! # flatscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from
//! the flatscope library. Import this module to get quick access to the essential
//! types for flattening-contract validation.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flatscope operations
pub use crate::Error;

/// The result type used throughout flatscope
pub use crate::Result;

/// Low-level byte stream parsing utilities
pub use crate::Parser;

// ================================================================================================
// Metadata System - The Type Universe
// ================================================================================================

/// Metadata token type used as type/method identity
pub use crate::metadata::Token;

/// The symbol table the validator consumes, and its builder
pub use crate::metadata::{TypeUniverse, UniverseBuilder};

/// Type, property and method descriptors
pub use crate::metadata::{MethodDef, Property, PropertyAccessor, TypeDef};

/// Flattening tags
pub use crate::metadata::{AccessorFlags, PropertyFlags, TypeFlags};

// ================================================================================================
// Validation
// ================================================================================================

/// Top-level entry point for whole-universe validation
pub use crate::validation::MappingValidator;

/// Configuration for a validation pass
pub use crate::validation::ValidationConfig;

/// Accessor classification produced by the reachability core
pub use crate::validation::{InvalidReason, Outcome};

/// Ordered, per-class-merged diagnostic collection
pub use crate::validation::MappingReport;

// ================================================================================================
// Disassembly
// ================================================================================================

/// Call-site scanning over raw accessor bodies
pub use crate::disassembler::scan_calls;
