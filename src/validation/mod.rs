//! Flattening-contract validation.
//!
//! The layers here answer, for every flattening-participant type in a loaded
//! universe, whether each removed property's accessors provably derive their value
//! from retained state:
//!
//! - [`resolver`] - does a scanned call list hit a specific property's accessors
//! - [`reachability`] - the recursive, cycle-safe core classifying one accessor as
//!   [`Outcome::Valid`], [`Outcome::Invalid`], or [`Outcome::Muddied`]
//! - [`orchestrator`] - whole-universe enumeration, contract conformance, and
//!   per-class diagnostic aggregation
//! - [`report`] - the append-only, order-stable diagnostic container
//! - [`config`] - pass-level switches
//!
//! # Usage Examples
//!
//! ```rust
//! use flatscope::metadata::{TypeUniverse, TypeDef, TypeFlags, Token};
//! use flatscope::validation::{MappingValidator, ValidationConfig};
//!
//! let universe = TypeUniverse::builder()
//!     .add_type(
//!         TypeDef::new(Token::type_def(1), "App.View")
//!             .with_flags(TypeFlags::FLATTEN_PARTICIPANT),
//!     )
//!     .build();
//!
//! let report = MappingValidator::validate(&universe, ValidationConfig::default());
//! // App.View declares no contract interface, so it is reported.
//! assert_eq!(report.len(), 1);
//! ```

pub mod config;
pub mod orchestrator;
pub mod reachability;
pub mod report;
pub mod resolver;

pub use config::ValidationConfig;
pub use orchestrator::MappingValidator;
pub use reachability::{validate_reachability, InvalidReason, Outcome};
pub use report::MappingReport;
pub use resolver::references_property;
