//! Symbol-table metadata consumed by the flattening validator.
//!
//! This module holds the data model the validator operates on: metadata tokens as
//! method/type identity, flattening tag flags, and the pre-built [`TypeUniverse`]
//! symbol table supplied by the loading front end.
//!
//! # Key Types
//! - [`Token`] - 32-bit metadata token (table + row) used as identity
//! - [`TypeFlags`], [`PropertyFlags`], [`AccessorFlags`] - flattening tags
//! - [`TypeUniverse`] / [`UniverseBuilder`] - the loaded type universe
//! - [`TypeDef`], [`Property`], [`MethodDef`] - its building blocks

mod flags;
mod token;
mod universe;

pub use flags::{AccessorFlags, PropertyFlags, TypeFlags};
pub use token::{Token, TABLE_METHOD_DEF, TABLE_TYPE_DEF};
pub use universe::{
    MethodDef, Property, PropertyAccessor, TypeDef, TypeUniverse, UniverseBuilder,
};
