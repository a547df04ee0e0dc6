pub mod audit;
pub mod calculator;
pub mod chart;
pub mod geometry;
pub mod policy;
pub mod trend;
pub mod types;

pub use audit::{audit_chart, AuditRecord, AuditReport, AuditSummary};
pub use calculator::{AspectCalculator, AspectCore, AspectPair, AspectSettings};
pub use chart::{ChartBody, ChartPositions};
pub use geometry::{
    closest_target, normalize_signed, orb, resolve_targets, signed_separation, TargetSet,
};
pub use policy::{AspectEvaluator, LeadPolicy};
pub use trend::{closed_form_applying, estimate_applying, project_unsigned};
pub use types::{
    AspectDefinition, AspectMotion, BodyState, EvaluationResult, LeadRole, UnsignedProjection,
};
