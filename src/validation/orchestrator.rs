//! Top-level mapping validation over a loaded type universe.
//!
//! [`MappingValidator`] enumerates every flattening-participant type, checks it
//! against its declared contract interface, and runs the reachability analysis over
//! each removed property's accessors. All findings accumulate into a
//! [`MappingReport`]; nothing short of a poisoned thread pool aborts a pass, and a
//! broken class never blocks validation of the classes after it.
//!
//! Per-class validation is independent once the opcode table is built, so the pass
//! distributes classes across a rayon pool when [`ValidationConfig::parallel`] is
//! set. The report ranks entries by the universe's registration order, which keeps
//! parallel and sequential output byte-identical.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::{
    metadata::{Property, TypeDef, TypeUniverse},
    validation::{
        config::ValidationConfig,
        reachability::{validate_reachability, Outcome},
        report::MappingReport,
    },
};

/// Entry point for whole-universe flattening validation.
///
/// Stateless; every pass derives its data fresh from the supplied universe, so
/// repeated passes over an unchanged universe yield byte-identical reports.
pub struct MappingValidator;

impl MappingValidator {
    /// Validates every flattening-participant type in `universe`.
    ///
    /// Returns one `(class name, merged diagnostic text)` pair per offending class,
    /// ordered by type registration order. An empty result means the whole universe
    /// satisfies its contracts — absence signifies success.
    #[must_use]
    pub fn validate(universe: &TypeUniverse, config: ValidationConfig) -> Vec<(String, String)> {
        let report = MappingReport::new();

        let participants: Vec<(usize, &TypeDef)> = universe
            .types()
            .enumerate()
            .filter(|(_, ty)| ty.is_participant() && !ty.is_ignored())
            .collect();

        if config.parallel {
            participants.par_iter().for_each(|&(order, ty)| {
                for message in Self::validate_type(universe, ty, config) {
                    report.append(order, ty.name.clone(), message);
                }
            });
        } else {
            for (order, ty) in participants {
                for message in Self::validate_type(universe, ty, config) {
                    report.append(order, ty.name.clone(), message);
                }
            }
        }

        report.finalize()
    }

    /// Validates one participant type, returning its raw diagnostic messages.
    fn validate_type(
        universe: &TypeUniverse,
        ty: &TypeDef,
        config: ValidationConfig,
    ) -> Vec<String> {
        let mut messages = Vec::new();

        if config.enable_contract_validation {
            let contract = ty
                .contract
                .and_then(|token| universe.type_by_token(token));

            let Some(contract) = contract else {
                // Fatal for this class only; the pass continues with other types.
                messages.push("no contract interface declared".to_string());
                return messages;
            };

            let own_properties = universe.flattened_properties(ty);
            for required in universe.flattened_properties(contract) {
                let satisfied = own_properties.iter().any(|property| {
                    property.name == required.name && property.type_name == required.type_name
                });
                if !satisfied {
                    messages.push(format!(
                        "contract property '{}: {}' of '{}' has no exact match",
                        required.name, required.type_name, contract.name
                    ));
                }
            }

            if !messages.is_empty() {
                // An incomplete mapping cannot be reasoned about; skip the type's
                // flattening validation entirely.
                return messages;
            }
        }

        if config.enable_reachability_validation {
            for property in universe.flattened_properties(ty) {
                if let Some(message) = Self::validate_removed_property(universe, ty, property) {
                    messages.push(message);
                }
            }
        }

        messages
    }

    /// Validates one removed property's accessors, honoring orphan opt-outs.
    ///
    /// Getter and setter are validated independently, each walk starting from its
    /// own fresh visited set. Returns one message citing every failed accessor, or
    /// `None` when the property needs no diagnostic.
    fn validate_removed_property(
        universe: &TypeUniverse,
        ty: &TypeDef,
        property: &Property,
    ) -> Option<String> {
        if !property.is_removed() || property.is_orphan() {
            return None;
        }

        let mut failures = Vec::new();
        for (label, accessor) in [("getter", &property.getter), ("setter", &property.setter)] {
            let Some(accessor) = accessor else {
                continue;
            };
            if accessor.is_orphan() {
                continue;
            }
            // Accessor methods the front end failed to load are absent from the
            // universe; validation covers the loaded subset.
            let Some(method) = universe.method(accessor.method) else {
                continue;
            };

            let outcome = validate_reachability(universe, method, ty, &mut HashSet::new());
            if !outcome.is_valid() {
                failures.push(format!("{} failed ({})", label, describe(&outcome)));
            }
        }

        if failures.is_empty() {
            None
        } else {
            Some(format!(
                "removed property '{}': {}",
                property.name,
                failures.join("; ")
            ))
        }
    }
}

/// Renders a failed outcome for a diagnostic, naming the tainting property of every
/// muddied link in the chain.
fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Valid => "valid".to_string(),
        Outcome::Invalid(reason) => reason.to_string(),
        Outcome::Muddied { property, chain } => {
            format!("muddied by removed property '{}': {}", property, describe(chain))
        }
    }
}
