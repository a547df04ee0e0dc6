//! Circular geometry shared by every classification.
//!
//! Separations are signed and live in (-180, 180]. A single canonical
//! representative is kept for the seam: both +180 and -180 map to +180.

use crate::aspects::types::{AspectDefinition, BodyState};

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// Normalize an angle to (-180, 180] degrees.
///
/// Angles already in range are returned unchanged so repeated normalization
/// never drifts.
pub fn normalize_signed(angle: f64) -> f64 {
    if angle > -HALF_TURN && angle <= HALF_TURN {
        return angle;
    }
    let y = (angle + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
    if y <= -HALF_TURN {
        y + FULL_TURN
    } else {
        y
    }
}

/// Signed separations equivalent to an aspect's exact separation.
///
/// Holds one value for 0° and 180°, two for anything strictly between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSet {
    values: [f64; 2],
    len: usize,
}

impl TargetSet {
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push_unique(&mut self, value: f64) {
        if self.as_slice().contains(&value) {
            return;
        }
        if self.len < self.values.len() {
            self.values[self.len] = value;
            self.len += 1;
        }
    }
}

/// Resolve the candidate list `{d, -d, d-360, 360-d}` to its distinct
/// normalized values.
///
/// `d-360` and `360-d` normalize to `-d` and `d`, so only those two are
/// built. They are compared exactly, keeping `d` and `-d` distinct however
/// small `d` is.
pub fn resolve_targets(aspect: &AspectDefinition) -> TargetSet {
    let d = aspect.exact_separation_deg;
    let mut targets = TargetSet {
        values: [0.0; 2],
        len: 0,
    };
    for candidate in [d, -d] {
        // -0.0 and 0.0 are the same target
        targets.push_unique(normalize_signed(candidate) + 0.0);
    }
    targets
}

/// Lead longitude minus other longitude, normalized.
pub fn signed_separation(lead: &BodyState, other: &BodyState) -> f64 {
    normalize_signed(lead.longitude - other.longitude)
}

/// Angular distance between a separation and a target, in [0, 180].
pub fn orb(separation: f64, target: f64) -> f64 {
    normalize_signed(separation - target).abs()
}

/// The target nearest to `separation`.
///
/// Exact ties go to the target on the same side as the separation (zero
/// counts as positive), whatever order the set was built in.
pub fn closest_target(separation: f64, targets: &TargetSet) -> f64 {
    let same_side = |t: f64| (t >= 0.0) == (separation >= 0.0);
    let mut candidates = targets.as_slice().iter().copied();
    let Some(mut best) = candidates.next() else {
        return 0.0;
    };
    let mut best_orb = orb(separation, best);
    for target in candidates {
        let d = orb(separation, target);
        if d < best_orb || (d == best_orb && same_side(target) && !same_side(best)) {
            best = target;
            best_orb = d;
        }
    }
    best
}

/// Unsigned separation in [0, 180], the quantity orb filters compare against.
pub fn unsigned_separation(a: &BodyState, b: &BodyState) -> f64 {
    signed_separation(a, b).abs()
}
