//! Flattening tag flags for types, properties, and accessors.
//!
//! The code-generation front end marks declarations with flattening tags; this module
//! defines their in-memory representation. Tags arrive pre-extracted in the symbol
//! table — the validator never inspects custom attribute blobs itself.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Class-level flattening tags
    pub struct TypeFlags: u32 {
        /// Type is opted into flattening validation (carries the view-DTO marker)
        const FLATTEN_PARTICIPANT = 0x0001;
        /// Type is explicitly exempted from flattening ("ignore when flattening")
        const FLATTEN_IGNORE = 0x0002;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Property-level flattening tags
    pub struct PropertyFlags: u32 {
        /// Property will not appear in the generated flattened projection; its
        /// accessors must prove they derive from retained state
        const REMOVED = 0x0001;
        /// Property is exempted from validation entirely
        const ORPHAN = 0x0002;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Accessor-level flattening tags
    pub struct AccessorFlags: u32 {
        /// This individual accessor is exempted from validation
        const ORPHAN = 0x0001;
    }
}
