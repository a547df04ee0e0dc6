use crate::aspects::chart::{ChartBody, ChartPositions};
use crate::aspects::geometry::unsigned_separation;
use crate::aspects::policy::AspectEvaluator;
use crate::aspects::types::{AspectDefinition, BodyState, EvaluationResult};
use crate::config::validate_orb;
use crate::error::AspectError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Within this many degrees an aspect is reported as exact
const EXACT_THRESHOLD_DEG: f64 = 0.1;

/// Settings for chart scans
#[derive(Debug, Clone)]
pub struct AspectSettings {
    /// Aspects to look for
    pub aspects: Vec<AspectDefinition>,
    /// Orb overrides per aspect name; others use the evaluator's orb filter
    pub orb_settings: HashMap<String, f64>,
    /// Body IDs to include (empty = all)
    pub include_objects: Vec<String>,
}

impl AspectSettings {
    pub fn orb_for(&self, aspect_name: &str) -> Option<f64> {
        self.orb_settings.get(aspect_name).copied()
    }
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            aspects: AspectDefinition::majors(),
            orb_settings: HashMap::new(),
            include_objects: Vec::new(),
        }
    }
}

/// Core aspect information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectCore {
    /// Aspect name: "conjunction", "trine", etc.
    pub aspect_type: String,
    /// Exact angle for this aspect
    pub exact_angle: f64,
    /// Deviation of the unsigned separation from the exact angle
    pub orb: f64,
    /// Whether the aspect is applying (faster body leads)
    pub is_applying: bool,
    /// Whether the aspect is exact (within 0.1 degrees)
    pub is_exact: bool,
    /// Whether either body is retrograde
    pub is_retrograde: bool,
    /// Full classification behind `is_applying`
    pub evaluation: EvaluationResult,
}

/// An aspect between two chart bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectPair {
    pub from: String,
    pub to: String,
    pub aspect: AspectCore,
}

/// Finds in-orb aspects in a chart and classifies them.
///
/// Orb filtering lives here, not in the evaluator: the evaluator classifies
/// any pair it is handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectCalculator {
    evaluator: AspectEvaluator,
}

impl AspectCalculator {
    pub fn new(evaluator: AspectEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &AspectEvaluator {
        &self.evaluator
    }

    /// Body pairs to examine, each ordered with the distinguished body first.
    pub fn candidate_pairs<'a>(
        &self,
        chart: &'a ChartPositions,
        settings: &AspectSettings,
    ) -> Vec<(&'a ChartBody, &'a ChartBody)> {
        let bodies: Vec<&ChartBody> = if settings.include_objects.is_empty() {
            chart.bodies.iter().collect()
        } else {
            let include_set: HashSet<&str> =
                settings.include_objects.iter().map(|s| s.as_str()).collect();
            chart
                .bodies
                .iter()
                .filter(|b| include_set.contains(b.id.as_str()))
                .collect()
        };

        let mut pairs = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (bodies[i], bodies[j]);
                if a.id == b.id {
                    continue;
                }
                if b.distinguished && !a.distinguished {
                    pairs.push((b, a));
                } else {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Aspects from `settings` that the two bodies currently form.
    pub fn calculate_aspects(
        &self,
        a: &BodyState,
        b: &BodyState,
        settings: &AspectSettings,
    ) -> Result<Vec<AspectCore>, AspectError> {
        let separation = unsigned_separation(a, b);
        let mut found = Vec::new();
        for aspect in &settings.aspects {
            let Some(orb_value) = self.orb_within(separation, aspect, settings)? else {
                continue;
            };
            let evaluation = self.evaluator.is_applying_enhanced(a, b, aspect)?;
            found.push(AspectCore {
                aspect_type: aspect.name.clone(),
                exact_angle: aspect.exact_separation_deg,
                orb: orb_value,
                is_applying: evaluation.applying,
                is_exact: orb_value < EXACT_THRESHOLD_DEG,
                is_retrograde: a.is_retrograde() || b.is_retrograde(),
                evaluation,
            });
        }
        Ok(found)
    }

    /// Orb of `separation` from `aspect`, or `None` when it exceeds the
    /// allowed orb.
    pub fn orb_within(
        &self,
        separation: f64,
        aspect: &AspectDefinition,
        settings: &AspectSettings,
    ) -> Result<Option<f64>, AspectError> {
        let allowed = settings
            .orb_for(&aspect.name)
            .unwrap_or(self.evaluator.config().orb_filter_deg);
        validate_orb(allowed)?;
        let orb_value = (separation - aspect.exact_separation_deg).abs();
        Ok((orb_value <= allowed).then_some(orb_value))
    }

    /// Every in-orb aspect between the chart's bodies.
    pub fn find_aspects(
        &self,
        chart: &ChartPositions,
        settings: &AspectSettings,
    ) -> Result<Vec<AspectPair>, AspectError> {
        let mut pairs = Vec::new();
        for (a, b) in self.candidate_pairs(chart, settings) {
            let state_a = a.state()?;
            let state_b = b.state()?;
            for aspect in self.calculate_aspects(&state_a, &state_b, settings)? {
                log::debug!(
                    "{} {} {}: orb {:.2}, {}",
                    a.id,
                    aspect.aspect_type,
                    b.id,
                    aspect.orb,
                    if aspect.is_applying { "applying" } else { "separating" }
                );
                pairs.push(AspectPair {
                    from: a.id.clone(),
                    to: b.id.clone(),
                    aspect,
                });
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartPositions {
        ChartPositions {
            label: "test".to_string(),
            bodies: vec![
                ChartBody::new("sun", 100.0, 1.0),
                ChartBody::new("moon", 102.0, 13.0),
                ChartBody::new("saturn", 281.0, -0.05),
            ],
        }
    }

    #[test]
    fn test_distinguished_body_is_placed_first() {
        let calculator = AspectCalculator::default();
        let chart = chart();
        let pairs = calculator.candidate_pairs(&chart, &AspectSettings::default());
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].0.id, "moon");
        assert_eq!(pairs[0].1.id, "sun");
        assert_eq!(pairs[2].0.id, "moon");
        assert_eq!(pairs[2].1.id, "saturn");
    }

    #[test]
    fn test_include_objects_filters_pairs() {
        let calculator = AspectCalculator::default();
        let chart = chart();
        let settings = AspectSettings {
            include_objects: vec!["sun".to_string(), "saturn".to_string()],
            ..AspectSettings::default()
        };
        let pairs = calculator.candidate_pairs(&chart, &settings);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.id, "sun");
    }

    #[test]
    fn test_orb_override_excludes_wide_aspect() {
        let calculator = AspectCalculator::default();
        let mut settings = AspectSettings::default();
        settings.orb_settings.insert("conjunction".to_string(), 1.0);
        let pairs = calculator.find_aspects(&chart(), &settings).unwrap();
        assert!(pairs.iter().all(|p| !(p.from == "moon" && p.to == "sun")));
    }

    #[test]
    fn test_retrograde_flag() {
        let calculator = AspectCalculator::default();
        let pairs = calculator.find_aspects(&chart(), &AspectSettings::default()).unwrap();
        let opp = pairs
            .iter()
            .find(|p| p.to == "saturn" && p.from == "sun")
            .expect("sun opposition saturn");
        assert_eq!(opp.aspect.aspect_type, "opposition");
        assert!(opp.aspect.is_retrograde);
    }
}
