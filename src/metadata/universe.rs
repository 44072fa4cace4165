//! The pre-built symbol table consumed by the flattening validator.
//!
//! A [`TypeUniverse`] is constructed once per validation pass by whatever front end
//! parses the target assembly (project compilation, metadata reader, test fixture) and
//! handed to the validator as plain data. The validator never queries a live runtime
//! type system; everything it needs — type declarations, flattened property sets,
//! accessor identities, raw accessor bodies — lives here.
//!
//! # Architecture
//!
//! - [`TypeDef`] - a declared type: identity, base type, contract interface, tags,
//!   declared properties
//! - [`Property`] - a property descriptor with flattening tags and accessor references
//! - [`MethodDef`] - a method: identity, owning type, optional raw instruction stream,
//!   and a lazily-decoded call-target cache
//! - [`TypeUniverse`] - the container, built via [`UniverseBuilder`]
//!
//! Front ends that fail to load part of an assembly simply register the loadable
//! subset; the validator operates on whatever is present.
//!
//! # Usage Examples
//!
//! ```rust
//! use flatscope::metadata::{MethodDef, Property, Token, TypeDef, TypeFlags, TypeUniverse};
//!
//! let getter = Token::method_def(1);
//! let universe = TypeUniverse::builder()
//!     .add_type(
//!         TypeDef::new(Token::type_def(1), "Geo.Coordinate")
//!             .with_flags(TypeFlags::FLATTEN_PARTICIPANT)
//!             .with_property(Property::new("Latitude", "System.Double").with_getter(getter)),
//!     )
//!     .add_method(MethodDef::new(getter, "get_Latitude", Token::type_def(1), None))
//!     .build();
//!
//! assert_eq!(universe.participants().count(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::{
    disassembler::scan_calls,
    metadata::{
        flags::{AccessorFlags, PropertyFlags, TypeFlags},
        token::Token,
    },
    Result,
};

/// Reference to a property accessor method, together with its own flattening tags.
#[derive(Debug, Clone)]
pub struct PropertyAccessor {
    /// Identity of the accessor method
    pub method: Token,
    /// Accessor-level flattening tags
    pub flags: AccessorFlags,
}

impl PropertyAccessor {
    /// Returns true if this accessor is individually exempted from validation
    #[must_use]
    pub fn is_orphan(&self) -> bool {
        self.flags.contains(AccessorFlags::ORPHAN)
    }
}

/// A property descriptor: name, declared type, flattening tags, and accessor references.
#[derive(Debug, Clone)]
pub struct Property {
    /// Property name (simple name, unique within a type after flattening)
    pub name: String,
    /// Fully-qualified name of the property's declared type
    pub type_name: String,
    /// Property-level flattening tags
    pub flags: PropertyFlags,
    /// Getter accessor, if the property declares one
    pub getter: Option<PropertyAccessor>,
    /// Setter accessor, if the property declares one
    pub setter: Option<PropertyAccessor>,
}

impl Property {
    /// Creates a new property descriptor with no tags and no accessors.
    ///
    /// # Arguments
    /// * `name` - Simple property name
    /// * `type_name` - Fully-qualified name of the declared property type
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            type_name: type_name.into(),
            flags: PropertyFlags::default(),
            getter: None,
            setter: None,
        }
    }

    /// Sets the property-level flattening tags.
    #[must_use]
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attaches a getter accessor with no accessor-level tags.
    #[must_use]
    pub fn with_getter(self, method: Token) -> Self {
        self.with_tagged_getter(method, AccessorFlags::default())
    }

    /// Attaches a getter accessor with the given accessor-level tags.
    #[must_use]
    pub fn with_tagged_getter(mut self, method: Token, flags: AccessorFlags) -> Self {
        self.getter = Some(PropertyAccessor { method, flags });
        self
    }

    /// Attaches a setter accessor with no accessor-level tags.
    #[must_use]
    pub fn with_setter(self, method: Token) -> Self {
        self.with_tagged_setter(method, AccessorFlags::default())
    }

    /// Attaches a setter accessor with the given accessor-level tags.
    #[must_use]
    pub fn with_tagged_setter(mut self, method: Token, flags: AccessorFlags) -> Self {
        self.setter = Some(PropertyAccessor { method, flags });
        self
    }

    /// Returns true if this property is tagged as removed from the flattened projection
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.flags.contains(PropertyFlags::REMOVED)
    }

    /// Returns true if this property is exempted from validation entirely
    #[must_use]
    pub fn is_orphan(&self) -> bool {
        self.flags.contains(PropertyFlags::ORPHAN)
    }

    /// Iterates over the accessor method identities this property declares
    pub fn accessor_tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.getter
            .iter()
            .chain(self.setter.iter())
            .map(|accessor| accessor.method)
    }
}

/// A method definition: identity, owning type, and a lazily-decoded instruction stream.
///
/// Equality of methods is by [`Token`] identity, never by body content. The call-target
/// list is decoded from the raw body on first use and cached for the lifetime of the
/// universe (decode once, read many).
#[derive(Debug)]
pub struct MethodDef {
    /// Identity of this method
    pub token: Token,
    /// Method name, used in diagnostics
    pub name: String,
    /// Token of the declaring type
    pub owner: Token,
    /// Raw CIL instruction stream, or `None` for bodyless (abstract/extern) methods
    body: Option<Vec<u8>>,
    /// Resolved call targets, populated on first scan
    call_targets: OnceLock<Vec<Token>>,
}

impl MethodDef {
    /// Creates a new method definition.
    ///
    /// # Arguments
    /// * `token` - Identity of the method
    /// * `name` - Method name for diagnostics
    /// * `owner` - Token of the declaring type
    /// * `body` - Raw instruction stream; `None` means "no body available", which is a
    ///   valid terminal state (the method reaches nothing), not an error
    pub fn new(token: Token, name: impl Into<String>, owner: Token, body: Option<Vec<u8>>) -> Self {
        MethodDef {
            token,
            name: name.into(),
            owner,
            body,
            call_targets: OnceLock::new(),
        }
    }

    /// Returns the raw instruction stream, if one is available.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns the ordered list of in-module call targets of this method.
    ///
    /// The body is scanned on first call and the result cached; a bodyless method
    /// yields an empty list. Rerunning against the same universe is restartable and
    /// yields identical results.
    ///
    /// # Errors
    /// Returns an error if the instruction stream is malformed or truncated. Decode
    /// failures are not cached, but the stream is immutable so a retry fails the same
    /// way.
    pub fn call_targets(&self, universe: &TypeUniverse) -> Result<&[Token]> {
        if let Some(cached) = self.call_targets.get() {
            return Ok(cached);
        }

        let scanned = match &self.body {
            Some(bytes) => scan_calls(bytes, universe)?,
            None => Vec::new(),
        };

        Ok(self.call_targets.get_or_init(|| scanned))
    }
}

/// A declared type: identity, inheritance link, contract interface, tags, and the
/// properties it declares itself (inherited properties are flattened on demand via
/// [`TypeUniverse::flattened_properties`]).
#[derive(Debug)]
pub struct TypeDef {
    /// Identity of this type
    pub token: Token,
    /// Fully-qualified type name, used as the diagnostic key
    pub name: String,
    /// Token of the base type, if any (and if it was loadable)
    pub base: Option<Token>,
    /// Token of the declared truth interface this type must satisfy
    pub contract: Option<Token>,
    /// Class-level flattening tags
    pub flags: TypeFlags,
    /// Properties declared directly on this type, in declaration order
    pub properties: Vec<Property>,
}

impl TypeDef {
    /// Creates a new type definition with no base, contract, tags, or properties.
    pub fn new(token: Token, name: impl Into<String>) -> Self {
        TypeDef {
            token,
            name: name.into(),
            base: None,
            contract: None,
            flags: TypeFlags::default(),
            properties: Vec::new(),
        }
    }

    /// Sets the base type token.
    #[must_use]
    pub fn with_base(mut self, base: Token) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the declared truth interface token.
    #[must_use]
    pub fn with_contract(mut self, contract: Token) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Sets the class-level flattening tags.
    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Appends a declared property.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns true if this type carries the flattening-participant marker
    #[must_use]
    pub fn is_participant(&self) -> bool {
        self.flags.contains(TypeFlags::FLATTEN_PARTICIPANT)
    }

    /// Returns true if this type is explicitly exempted from flattening
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.flags.contains(TypeFlags::FLATTEN_IGNORE)
    }
}

/// The loaded type universe: every type and method the front end could load, exposed
/// as an immutable lookup structure.
///
/// All data is read-only after [`UniverseBuilder::build`]; concurrent validation
/// workers share it by reference without locking.
#[derive(Debug, Default)]
pub struct TypeUniverse {
    /// Types in registration order (drives deterministic report ordering)
    types: Vec<TypeDef>,
    /// Token -> index into `types`
    type_index: HashMap<Token, usize>,
    /// Token -> method definition
    methods: HashMap<Token, MethodDef>,
}

impl TypeUniverse {
    /// Creates a builder for assembling a universe.
    #[must_use]
    pub fn builder() -> UniverseBuilder {
        UniverseBuilder::default()
    }

    /// Iterates over all loaded types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }

    /// Iterates over the types tagged as flattening participants, in registration order.
    pub fn participants(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter().filter(|ty| ty.is_participant())
    }

    /// Looks up a type by token.
    #[must_use]
    pub fn type_by_token(&self, token: Token) -> Option<&TypeDef> {
        self.type_index.get(&token).map(|&index| &self.types[index])
    }

    /// Looks up a method by token.
    #[must_use]
    pub fn method(&self, token: Token) -> Option<&MethodDef> {
        self.methods.get(&token)
    }

    /// Resolves a raw call operand token to a method identity within this module.
    ///
    /// Returns `None` for tokens that do not refer to a loaded method (cross-module
    /// references, stripped metadata). Callers skip such operands silently; they are
    /// expected, out-of-scope noise for in-type reference analysis.
    #[must_use]
    pub fn resolve_call(&self, token: Token) -> Option<Token> {
        self.methods.contains_key(&token).then_some(token)
    }

    /// Returns the type's full property set, flattened across its inheritance chain.
    ///
    /// Properties are deduplicated by name; the most-derived declaration wins. A
    /// broken or cyclic base chain terminates the walk rather than erroring — partial
    /// loads are tolerated.
    #[must_use]
    pub fn flattened_properties<'a>(&'a self, ty: &'a TypeDef) -> Vec<&'a Property> {
        let mut result = Vec::new();
        let mut seen_names = HashSet::new();
        let mut seen_types = HashSet::new();

        let mut current = Some(ty);
        while let Some(type_def) = current {
            if !seen_types.insert(type_def.token) {
                break;
            }

            for property in &type_def.properties {
                if seen_names.insert(property.name.as_str()) {
                    result.push(property);
                }
            }

            current = type_def.base.and_then(|base| self.type_by_token(base));
        }

        result
    }
}

/// Incremental builder for a [`TypeUniverse`].
///
/// Front ends register whatever they could load; types or methods that failed to load
/// are simply absent, and validation proceeds over the loaded subset.
#[derive(Debug, Default)]
pub struct UniverseBuilder {
    types: Vec<TypeDef>,
    methods: Vec<MethodDef>,
}

impl UniverseBuilder {
    /// Registers a type. Re-registering a token replaces the earlier entry
    /// (last-write-wins, matching edit-and-continue style reloads).
    #[must_use]
    pub fn add_type(mut self, type_def: TypeDef) -> Self {
        self.types.retain(|existing| existing.token != type_def.token);
        self.types.push(type_def);
        self
    }

    /// Registers a method.
    #[must_use]
    pub fn add_method(mut self, method: MethodDef) -> Self {
        self.methods.retain(|existing| existing.token != method.token);
        self.methods.push(method);
        self
    }

    /// Finalizes the universe.
    #[must_use]
    pub fn build(self) -> TypeUniverse {
        let type_index = self
            .types
            .iter()
            .enumerate()
            .map(|(index, ty)| (ty.token, index))
            .collect();

        let methods = self
            .methods
            .into_iter()
            .map(|method| (method.token, method))
            .collect();

        TypeUniverse {
            types: self.types,
            type_index,
            methods,
        }
    }
}
