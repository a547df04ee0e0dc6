//! Forward-difference estimate of whether an orb is shrinking.

use crate::aspects::geometry::{
    closest_target, normalize_signed, orb, resolve_targets, signed_separation, unsigned_separation,
};
use crate::aspects::types::{
    AspectDefinition, BodyState, EvaluationResult, LeadRole, UnsignedProjection,
};

/// Project both bodies forward by `time_step_days` at constant speed and
/// compare the orb before and after.
///
/// The closest target is resolved once, at the current time, and both orbs
/// are measured against it. Re-resolving at the projected time would let
/// the answer flip when the projection crosses the midpoint between two
/// targets.
///
/// Inputs are expected to be validated already; see
/// [`AspectEvaluator`](crate::aspects::AspectEvaluator) for the checked entry
/// points.
pub fn estimate_applying(
    lead: &BodyState,
    other: &BodyState,
    aspect: &AspectDefinition,
    time_step_days: f64,
) -> EvaluationResult {
    let separation = signed_separation(lead, other);
    let targets = resolve_targets(aspect);
    let target = closest_target(separation, &targets);
    let current_orb = orb(separation, target);

    let relative_speed = lead.speed - other.speed;
    let projected_separation = normalize_signed(separation + relative_speed * time_step_days);
    let projected_orb = orb(projected_separation, target);

    // Zero relative speed cannot move the orb; do not let rounding decide.
    let applying = relative_speed != 0.0 && projected_orb < current_orb;

    EvaluationResult {
        applying,
        current_orb_deg: current_orb,
        signed_separation_deg: separation,
        closest_target_deg: target,
        relative_speed_deg_per_day: relative_speed,
        projected_separation_deg: projected_separation,
        projected_orb_deg: projected_orb,
        lead: LeadRole::Primary,
    }
}

/// Sign-based equivalent of [`estimate_applying`]: the orb shrinks exactly
/// when the relative speed points against the signed offset from the target.
///
/// Undefined at zero orb, where it returns `false`.
pub fn closed_form_applying(separation: f64, target: f64, relative_speed: f64) -> bool {
    let offset = normalize_signed(separation - target);
    if offset == 0.0 || relative_speed == 0.0 {
        return false;
    }
    (relative_speed > 0.0) != (offset > 0.0)
}

/// The naive check: move both longitudes forward, take the unsigned
/// separation again and compare its distance from the exact angle.
///
/// Blind to which side of the exact angle the bodies are on, so it misreads
/// projections that cross 0° or 180° of separation. Kept for auditing the
/// signed estimator against it.
pub fn project_unsigned(
    a: &BodyState,
    b: &BodyState,
    aspect: &AspectDefinition,
    time_step_days: f64,
) -> UnsignedProjection {
    let exact = aspect.exact_separation_deg;
    let current_orb = (unsigned_separation(a, b) - exact).abs();

    let moved = |body: &BodyState| BodyState {
        longitude: wrap_longitude(body.longitude + body.speed * time_step_days),
        ..*body
    };
    let projected_orb = (unsigned_separation(&moved(a), &moved(b)) - exact).abs();

    UnsignedProjection {
        applying: a.speed != b.speed && projected_orb < current_orb,
        current_orb_deg: current_orb,
        projected_orb_deg: projected_orb,
        orb_change_rate_deg_per_day: (projected_orb - current_orb) / time_step_days,
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    let reduced = longitude.rem_euclid(360.0);
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}
