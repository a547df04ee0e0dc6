//! Cross-checks the lead conventions against the fixed-order reference.
//!
//! Every in-orb pair of a chart is classified by all three variants and by
//! the unsigned-separation check. Disagreements are tallied, including how
//! many involve retrograde bodies or sit near a sign boundary, where
//! longitude bugs usually show up.

use crate::aspects::calculator::{AspectCalculator, AspectSettings};
use crate::aspects::chart::ChartPositions;
use crate::aspects::geometry::unsigned_separation;
use crate::error::AspectError;
use serde::{Deserialize, Serialize};

/// Degrees from either sign edge counted as "near a boundary".
const SIGN_BOUNDARY_MARGIN_DEG: f64 = 5.0;

/// All classifications of one pair/aspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub primary: String,
    pub secondary: String,
    pub aspect_type: String,
    pub aspect_degrees: f64,
    pub primary_longitude: f64,
    pub secondary_longitude: f64,
    pub primary_speed: f64,
    pub secondary_speed: f64,
    pub primary_retrograde: bool,
    pub secondary_retrograde: bool,
    /// Primary body's degrees into its sign
    pub primary_degree_in_sign: f64,
    /// Unsigned separation in [0, 180]
    pub current_separation: f64,
    pub orb_from_exact: f64,
    pub enhanced_applying: bool,
    /// Only present when the primary is a distinguished body
    pub moon_applying: Option<bool>,
    pub moon_separating: Option<bool>,
    pub authoritative_applying: bool,
    /// Unsigned-separation classification
    pub simple_applying: bool,
    /// Change of the unsigned orb per day; negative while applying
    pub orb_change_rate: f64,
    pub relative_speed: f64,
}

impl AuditRecord {
    pub fn agrees(&self) -> bool {
        self.enhanced_applying == self.authoritative_applying
    }

    pub fn simple_agrees(&self) -> bool {
        self.simple_applying == self.authoritative_applying
    }

    /// Both Moon predicates returned the same value.
    pub fn violates_negation(&self) -> bool {
        matches!((self.moon_applying, self.moon_separating), (Some(a), Some(s)) if a == s)
    }

    pub fn involves_retrograde(&self) -> bool {
        self.primary_retrograde || self.secondary_retrograde
    }

    pub fn near_sign_boundary(&self) -> bool {
        let degree = self.primary_degree_in_sign;
        degree > 30.0 - SIGN_BOUNDARY_MARGIN_DEG || degree < SIGN_BOUNDARY_MARGIN_DEG
    }
}

/// Tallies over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: usize,
    pub agreements: usize,
    pub disagreements: usize,
    /// Percentage of records where enhanced matches authoritative
    pub accuracy: f64,
    pub authoritative_applying: usize,
    pub authoritative_separating: usize,
    pub enhanced_applying: usize,
    pub enhanced_separating: usize,
    /// Records where the unsigned check matches authoritative
    pub simple_agreements: usize,
    pub simple_disagreements: usize,
    pub retrograde_disagreements: usize,
    pub sign_boundary_disagreements: usize,
    pub negation_violations: usize,
}

impl AuditSummary {
    pub fn from_records(records: &[AuditRecord]) -> Self {
        let total = records.len();
        let agreements = records.iter().filter(|r| r.agrees()).count();
        let disagreeing: Vec<&AuditRecord> = records.iter().filter(|r| !r.agrees()).collect();
        let authoritative_applying = records.iter().filter(|r| r.authoritative_applying).count();
        let enhanced_applying = records.iter().filter(|r| r.enhanced_applying).count();
        let simple_agreements = records.iter().filter(|r| r.simple_agrees()).count();
        Self {
            total,
            agreements,
            disagreements: disagreeing.len(),
            accuracy: if total == 0 {
                100.0
            } else {
                agreements as f64 / total as f64 * 100.0
            },
            authoritative_applying,
            authoritative_separating: total - authoritative_applying,
            enhanced_applying,
            enhanced_separating: total - enhanced_applying,
            simple_agreements,
            simple_disagreements: total - simple_agreements,
            retrograde_disagreements: disagreeing
                .iter()
                .filter(|r| r.involves_retrograde())
                .count(),
            sign_boundary_disagreements: disagreeing
                .iter()
                .filter(|r| r.near_sign_boundary())
                .count(),
            negation_violations: records.iter().filter(|r| r.violates_negation()).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub label: String,
    pub summary: AuditSummary,
    pub records: Vec<AuditRecord>,
}

impl AuditReport {
    pub fn disagreements(&self) -> impl Iterator<Item = &AuditRecord> {
        self.records.iter().filter(|r| !r.agrees())
    }
}

/// Classify every in-orb pair of `chart` with all three variants.
pub fn audit_chart(
    calculator: &AspectCalculator,
    chart: &ChartPositions,
    settings: &AspectSettings,
) -> Result<AuditReport, AspectError> {
    let evaluator = calculator.evaluator();
    let mut records = Vec::new();

    for (a, b) in calculator.candidate_pairs(chart, settings) {
        let primary = a.state()?;
        let secondary = b.state()?;
        let separation = unsigned_separation(&primary, &secondary);

        for aspect in &settings.aspects {
            let Some(orb_from_exact) = calculator.orb_within(separation, aspect, settings)? else {
                continue;
            };

            let enhanced = evaluator.is_applying_enhanced(&primary, &secondary, aspect)?;
            let authoritative = evaluator.authoritative(&primary, &secondary, aspect)?;
            let simple = evaluator.unsigned_projection(&primary, &secondary, aspect)?;
            let (moon_applying, moon_separating) = if primary.is_distinguished {
                (
                    Some(evaluator.is_moon_applying(&primary, &secondary, aspect)?),
                    Some(evaluator.is_moon_separating(&primary, &secondary, aspect)?),
                )
            } else {
                (None, None)
            };

            let record = AuditRecord {
                primary: a.id.clone(),
                secondary: b.id.clone(),
                aspect_type: aspect.name.clone(),
                aspect_degrees: aspect.exact_separation_deg,
                primary_longitude: primary.longitude,
                secondary_longitude: secondary.longitude,
                primary_speed: primary.speed,
                secondary_speed: secondary.speed,
                primary_retrograde: primary.is_retrograde(),
                secondary_retrograde: secondary.is_retrograde(),
                primary_degree_in_sign: primary.degree_in_sign(),
                current_separation: separation,
                orb_from_exact,
                enhanced_applying: enhanced.applying,
                moon_applying,
                moon_separating,
                authoritative_applying: authoritative.applying,
                simple_applying: simple.applying,
                orb_change_rate: simple.orb_change_rate_deg_per_day,
                relative_speed: primary.speed - secondary.speed,
            };
            if !record.simple_agrees() {
                log::debug!(
                    "{} {} {}: unsigned check says {}, authoritative {}",
                    record.primary,
                    record.aspect_type,
                    record.secondary,
                    record.simple_applying,
                    record.authoritative_applying
                );
            }
            if !record.agrees() {
                log::warn!(
                    "{} {} {}: enhanced={} authoritative={} (orb {:.2})",
                    record.primary,
                    record.aspect_type,
                    record.secondary,
                    record.enhanced_applying,
                    record.authoritative_applying,
                    record.orb_from_exact
                );
            }
            records.push(record);
        }
    }

    let summary = AuditSummary::from_records(&records);
    log::info!(
        "{}: {}/{} agree ({:.1}%)",
        chart.label,
        summary.agreements,
        summary.total,
        summary.accuracy
    );
    Ok(AuditReport {
        label: chart.label.clone(),
        summary,
        records,
    })
}
