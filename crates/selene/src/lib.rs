//! Applying/separating classification for aspects between moving bodies.
//!
//! Positions and speeds come from an external ephemeris; this crate only
//! decides whether the gap to an exact aspect is shrinking or growing.

pub mod aspects;
pub mod config;
pub mod error;

pub use aspects::{
    AspectCalculator, AspectDefinition, AspectEvaluator, AspectMotion, BodyState,
    EvaluationResult, LeadPolicy, LeadRole,
};
pub use config::EvaluatorConfig;
pub use error::AspectError;
