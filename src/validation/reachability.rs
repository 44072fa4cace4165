//! Recursive, cycle-safe reachability analysis for accessor bodies.
//!
//! The core question: does a removed property's accessor provably derive its value
//! from retained (non-removed) properties of its owning type, directly or through a
//! chain of in-type helper calls? [`validate_reachability`] answers it with an
//! [`Outcome`], which is plain data — the orchestrator turns failed outcomes into
//! diagnostics, nothing here is ever thrown.
//!
//! Two different recursion scopes are in play, and they deliberately do not share a
//! visited set:
//!
//! - **Helper recursion** (step 4): helper methods reached from one accessor walk a
//!   single call graph, so they share the caller's visited set — re-entering a method
//!   within one walk is a cycle and terminates as Invalid.
//! - **Muddied-property recursion** (step 3): when the only discovered reference is to
//!   another *removed* property, that property's own getter is a distinct validation
//!   root with its own legitimate mutual-recursion space, so it starts from a fresh
//!   visited set. A separate guard tracks the roots currently on the muddied
//!   validation stack: removed properties whose accessors reference each other would
//!   otherwise alternate between fresh walks forever, so re-entering a root
//!   terminates as a cycle.

use std::collections::HashSet;

use crate::{
    metadata::{MethodDef, Token, TypeDef, TypeUniverse},
    validation::resolver::references_property,
};

/// Why an accessor failed reachability validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum InvalidReason {
    /// The method was re-entered during one validation walk
    #[strum(serialize = "cycle detected")]
    Cycle,
    /// No retained property is reachable from the accessor body
    #[strum(serialize = "no legitimate property reached")]
    NoLegitimateReference,
    /// The accessor's instruction stream could not be decoded
    #[strum(serialize = "instruction stream could not be decoded")]
    UndecodableBody,
}

/// Result of validating one accessor method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The accessor transitively reaches at least one retained property
    Valid,
    /// The accessor reaches nothing retained
    Invalid(InvalidReason),
    /// The accessor's only discovered reference is to another removed property whose
    /// own accessor chain is broken. Always names the tainting property and embeds
    /// the outcome of validating that property's own getter.
    Muddied {
        /// Name of the removed property that caused the taint
        property: String,
        /// Outcome of validating the tainting property's own getter
        chain: Box<Outcome>,
    },
}

impl Outcome {
    /// Returns true only for [`Outcome::Valid`]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }
}

/// Validates that `method` transitively derives its value from non-removed properties
/// of `owning_type`.
///
/// `visited` is the cycle guard for the current walk: a method already present is not
/// re-entered and yields `Invalid(Cycle)`. Callers start a top-level accessor
/// validation with a fresh, empty set.
///
/// Decode failures (malformed or truncated bodies) surface as
/// `Invalid(UndecodableBody)` — never as an error — so one broken accessor cannot
/// abort a whole-universe pass. A bodyless accessor makes no calls and therefore
/// reaches nothing.
pub fn validate_reachability(
    universe: &TypeUniverse,
    method: &MethodDef,
    owning_type: &TypeDef,
    visited: &mut HashSet<Token>,
) -> Outcome {
    validate_walk(universe, method, owning_type, visited, &mut HashSet::new())
}

/// The recursive walk behind [`validate_reachability`].
///
/// `muddied_roots` holds the getters currently being validated as muddied-property
/// roots. Each root gets a fresh `visited` set, but the roots themselves form one
/// stack: re-entering a getter already on it means two removed properties reference
/// each other, which terminates as `Invalid(Cycle)` instead of recursing forever.
fn validate_walk(
    universe: &TypeUniverse,
    method: &MethodDef,
    owning_type: &TypeDef,
    visited: &mut HashSet<Token>,
    muddied_roots: &mut HashSet<Token>,
) -> Outcome {
    if !visited.insert(method.token) {
        return Outcome::Invalid(InvalidReason::Cycle);
    }

    let Ok(calls) = method.call_targets(universe) else {
        return Outcome::Invalid(InvalidReason::UndecodableBody);
    };

    let properties = universe.flattened_properties(owning_type);
    let mut resolved_passthrough = false;

    for property in &properties {
        if !references_property(calls, property) {
            continue;
        }

        if !property.is_removed() {
            // First legitimate reference wins.
            return Outcome::Valid;
        }

        // The reference is to another removed property: its own getter becomes a
        // distinct validation root with a fresh cycle-tracking scope.
        let nested = match property
            .getter
            .as_ref()
            .and_then(|accessor| universe.method(accessor.method))
        {
            Some(getter) => {
                if muddied_roots.insert(getter.token) {
                    let outcome = validate_walk(
                        universe,
                        getter,
                        owning_type,
                        &mut HashSet::new(),
                        muddied_roots,
                    );
                    muddied_roots.remove(&getter.token);
                    outcome
                } else {
                    // Already on the muddied validation stack: the removed
                    // properties reference each other.
                    Outcome::Invalid(InvalidReason::Cycle)
                }
            }
            None => Outcome::Invalid(InvalidReason::NoLegitimateReference),
        };

        if !nested.is_valid() {
            return Outcome::Muddied {
                property: property.name.clone(),
                chain: Box::new(nested),
            };
        }
        // Pass-through flattening: the chain bottoms out at retained state, so this
        // reference is resolved; keep scanning so a later broken chain still surfaces.
        resolved_passthrough = true;
    }

    if resolved_passthrough {
        return Outcome::Valid;
    }

    // No direct property reference decided the walk; follow in-type helper calls,
    // sharing the visited set — helpers are part of this accessor's call graph.
    let accessor_tokens: HashSet<Token> = properties
        .iter()
        .flat_map(|property| property.accessor_tokens())
        .collect();

    for &target in calls {
        if accessor_tokens.contains(&target) {
            continue;
        }

        let Some(helper) = universe.method(target) else {
            continue;
        };

        if helper.owner != owning_type.token {
            continue;
        }

        if validate_walk(universe, helper, owning_type, visited, muddied_roots).is_valid() {
            return Outcome::Valid;
        }
    }

    Outcome::Invalid(InvalidReason::NoLegitimateReference)
}
