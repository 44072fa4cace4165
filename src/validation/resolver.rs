//! Reference resolution between scanned call lists and property accessors.

use crate::metadata::{Property, Token};

/// Returns true if any resolved callee in `calls` is one of `property`'s accessors.
///
/// Pure predicate over the scanner's output; accessor identity is token equality, so
/// this is O(k) in the call count with no side effects.
#[must_use]
pub fn references_property(calls: &[Token], property: &Property) -> bool {
    property
        .accessor_tokens()
        .any(|accessor| calls.contains(&accessor))
}
