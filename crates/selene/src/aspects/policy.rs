//! Lead-assignment conventions layered over the trend estimator.
//!
//! All variants run the same projection; they differ only in which body is
//! treated as the lead and whether its retrograde state counts.

use crate::aspects::trend::{estimate_applying, project_unsigned};
use crate::aspects::types::{
    AspectDefinition, BodyState, EvaluationResult, LeadRole, UnsignedProjection,
};
use crate::config::EvaluatorConfig;
use crate::error::AspectError;
use serde::{Deserialize, Serialize};

/// How the lead body is chosen for an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadPolicy {
    /// The faster body (larger |speed|) applies to the slower one.
    FasterLeads,
    /// The distinguished body leads and always moves forward.
    DistinguishedLeads,
    /// Call order: primary leads. Used as the reference for auditing.
    FixedOrder,
}

impl LeadPolicy {
    pub const ALL: [LeadPolicy; 3] = [
        LeadPolicy::FasterLeads,
        LeadPolicy::DistinguishedLeads,
        LeadPolicy::FixedOrder,
    ];

    /// Pick the lead between `primary` and `secondary`.
    pub fn select_lead(&self, primary: &BodyState, secondary: &BodyState) -> LeadRole {
        match self {
            LeadPolicy::FasterLeads => {
                let (p, s) = (primary.speed.abs(), secondary.speed.abs());
                if p > s {
                    LeadRole::Primary
                } else if s > p {
                    LeadRole::Secondary
                } else {
                    distinguished_or_primary(primary, secondary)
                }
            }
            LeadPolicy::DistinguishedLeads => distinguished_or_primary(primary, secondary),
            LeadPolicy::FixedOrder => LeadRole::Primary,
        }
    }
}

fn distinguished_or_primary(primary: &BodyState, secondary: &BodyState) -> LeadRole {
    if secondary.is_distinguished && !primary.is_distinguished {
        LeadRole::Secondary
    } else {
        LeadRole::Primary
    }
}

/// Checked entry points for applying/separating classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectEvaluator {
    config: EvaluatorConfig,
}

impl AspectEvaluator {
    pub fn new(config: EvaluatorConfig) -> Result<Self, AspectError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Classify under `policy`. `result.lead` reports which argument led.
    pub fn evaluate(
        &self,
        policy: LeadPolicy,
        primary: &BodyState,
        secondary: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<EvaluationResult, AspectError> {
        self.validate_pair(primary, secondary, aspect)?;

        let role = policy.select_lead(primary, secondary);
        let (lead, other) = match role {
            LeadRole::Primary => (*primary, *secondary),
            LeadRole::Secondary => (*secondary, *primary),
        };
        let lead = match policy {
            LeadPolicy::DistinguishedLeads => forward_moving(lead),
            _ => lead,
        };

        let mut result = estimate_applying(&lead, &other, aspect, self.config.time_step_days);
        result.lead = role;
        Ok(result)
    }

    /// Unsigned-separation check, audited against the signed variants.
    pub fn unsigned_projection(
        &self,
        a: &BodyState,
        b: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<UnsignedProjection, AspectError> {
        self.validate_pair(a, b, aspect)?;
        Ok(project_unsigned(a, b, aspect, self.config.time_step_days))
    }

    /// Both states and the aspect are well formed, and neither the bodies
    /// nor their separation can move by a non-finite amount in one step.
    fn validate_pair(
        &self,
        a: &BodyState,
        b: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<(), AspectError> {
        a.validate()?;
        b.validate()?;
        aspect.validate()?;
        let days = self.config.time_step_days;
        if !((a.speed.abs() + b.speed.abs()) * days).is_finite() {
            return Err(AspectError::UnboundedMotion {
                primary: a.speed,
                secondary: b.speed,
                days,
            });
        }
        Ok(())
    }

    /// Faster body applies to the slower one.
    pub fn is_applying_enhanced(
        &self,
        a: &BodyState,
        b: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<EvaluationResult, AspectError> {
        self.evaluate(LeadPolicy::FasterLeads, a, b, aspect)
    }

    /// Moon-role predicate: `moon` leads whatever the speeds, and is never
    /// treated as retrograde.
    pub fn is_moon_applying(
        &self,
        moon: &BodyState,
        other: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<bool, AspectError> {
        Ok(self.moon_evaluation(moon, other, aspect)?.applying)
    }

    /// Negation of [`is_moon_applying`](Self::is_moon_applying).
    pub fn is_moon_separating(
        &self,
        moon: &BodyState,
        other: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<bool, AspectError> {
        Ok(!self.is_moon_applying(moon, other, aspect)?)
    }

    /// Full result for the Moon-role predicates.
    pub fn moon_evaluation(
        &self,
        moon: &BodyState,
        other: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<EvaluationResult, AspectError> {
        let moon = BodyState {
            is_distinguished: true,
            ..*moon
        };
        let other = BodyState {
            is_distinguished: false,
            ..*other
        };
        self.evaluate(LeadPolicy::DistinguishedLeads, &moon, &other, aspect)
    }

    /// Reference classification in call order, the ground truth the other
    /// variants are audited against.
    pub fn authoritative(
        &self,
        primary: &BodyState,
        secondary: &BodyState,
        aspect: &AspectDefinition,
    ) -> Result<EvaluationResult, AspectError> {
        self.evaluate(LeadPolicy::FixedOrder, primary, secondary, aspect)
    }
}

fn forward_moving(body: BodyState) -> BodyState {
    if body.is_distinguished {
        BodyState {
            speed: body.speed.abs(),
            ..body
        }
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(lon: f64, speed: f64) -> BodyState {
        BodyState::new(lon, speed, false).unwrap()
    }

    fn moon(lon: f64, speed: f64) -> BodyState {
        BodyState::new(lon, speed, true).unwrap()
    }

    #[test]
    fn test_faster_body_leads() {
        let policy = LeadPolicy::FasterLeads;
        assert_eq!(policy.select_lead(&body(0.0, 1.0), &body(0.0, 13.0)), LeadRole::Secondary);
        assert_eq!(policy.select_lead(&body(0.0, -2.0), &body(0.0, 1.0)), LeadRole::Primary);
    }

    #[test]
    fn test_speed_tie_prefers_distinguished_then_primary() {
        let policy = LeadPolicy::FasterLeads;
        assert_eq!(policy.select_lead(&body(0.0, 1.0), &moon(0.0, 1.0)), LeadRole::Secondary);
        assert_eq!(policy.select_lead(&body(0.0, 1.0), &body(0.0, -1.0)), LeadRole::Primary);
    }

    #[test]
    fn test_distinguished_leads_regardless_of_speed() {
        let policy = LeadPolicy::DistinguishedLeads;
        assert_eq!(policy.select_lead(&body(0.0, 20.0), &moon(0.0, 0.1)), LeadRole::Secondary);
        assert_eq!(policy.select_lead(&body(0.0, 20.0), &body(0.0, 0.1)), LeadRole::Primary);
    }

    #[test]
    fn test_fixed_order_ignores_speed() {
        assert_eq!(
            LeadPolicy::FixedOrder.select_lead(&body(0.0, 0.1), &moon(0.0, 13.0)),
            LeadRole::Primary
        );
    }

    #[test]
    fn test_moon_with_negative_speed_moves_forward() {
        let eval = AspectEvaluator::default();
        // Moon at 50 behind a conjunction with a body at 55; forward motion
        // closes the gap even though the raw speed sign says otherwise.
        let m = BodyState::new(50.0, -0.5, true).unwrap();
        let p = body(55.0, 0.0);
        let r = eval.moon_evaluation(&m, &p, &AspectDefinition::conjunction()).unwrap();
        assert_eq!(r.relative_speed_deg_per_day, 0.5);
        assert!(r.applying);
        // The reference method uses the raw speed and disagrees.
        let auth = eval.authoritative(&m, &p, &AspectDefinition::conjunction()).unwrap();
        assert!(!auth.applying);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let eval = AspectEvaluator::default();
        let bad = BodyState {
            longitude: 360.0,
            speed: 1.0,
            is_distinguished: false,
        };
        let good = body(10.0, 1.0);
        let trine = AspectDefinition::trine();
        assert!(eval.authoritative(&bad, &good, &trine).is_err());
        assert!(eval.is_moon_applying(&good, &bad, &trine).is_err());
        let wide = AspectDefinition {
            name: "wide".to_string(),
            exact_separation_deg: 200.0,
        };
        assert!(eval.is_applying_enhanced(&good, &good, &wide).is_err());
    }

    #[test]
    fn test_overflowing_speeds_are_rejected() {
        let eval = AspectEvaluator::default();
        let fast = body(10.0, 1e308);
        let backwards = body(0.0, -1e308);
        let trine = AspectDefinition::trine();
        for policy in LeadPolicy::ALL {
            assert!(matches!(
                eval.evaluate(policy, &fast, &backwards, &trine),
                Err(AspectError::UnboundedMotion { .. })
            ));
        }
        assert!(eval.is_moon_applying(&fast, &backwards, &trine).is_err());
        assert!(eval.unsigned_projection(&fast, &backwards, &trine).is_err());

        // Large but bounded motion still yields finite numbers
        let r = eval.authoritative(&body(10.0, 1e300), &body(0.0, -1e300), &trine).unwrap();
        assert!(r.relative_speed_deg_per_day.is_finite());
        assert!(r.projected_separation_deg.is_finite());
        assert!(r.projected_orb_deg.is_finite());
    }

    #[test]
    fn test_long_step_overflow_is_rejected() {
        let eval = AspectEvaluator::new(EvaluatorConfig::new(1e300, 8.0).unwrap()).unwrap();
        let r = eval.authoritative(&body(10.0, 1e10), &body(0.0, 0.0), &AspectDefinition::trine());
        assert!(r.is_err());
    }

    #[test]
    fn test_evaluator_rejects_bad_config() {
        let config = EvaluatorConfig {
            time_step_days: 0.0,
            orb_filter_deg: 8.0,
        };
        assert!(AspectEvaluator::new(config).is_err());
    }
}
