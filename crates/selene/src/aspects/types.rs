use crate::error::AspectError;
use serde::{Deserialize, Serialize};

/// Instantaneous state of a body as supplied by an ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
    /// Speed in longitude (degrees per day, negative = retrograde)
    pub speed: f64,
    /// Bodies such as the Moon that are never labelled retrograde
    #[serde(default)]
    pub is_distinguished: bool,
}

impl BodyState {
    /// Build a state, rejecting longitudes outside [0, 360) and non-finite speeds.
    pub fn new(longitude: f64, speed: f64, is_distinguished: bool) -> Result<Self, AspectError> {
        let state = Self {
            longitude,
            speed,
            is_distinguished,
        };
        state.validate()?;
        Ok(state)
    }

    /// Build a state from a raw ephemeris longitude, reducing it modulo 360.
    ///
    /// Non-finite longitudes and speeds are still rejected.
    pub fn wrapped(
        longitude: f64,
        speed: f64,
        is_distinguished: bool,
    ) -> Result<Self, AspectError> {
        if !longitude.is_finite() {
            return Err(AspectError::InvalidLongitude { longitude });
        }
        let mut reduced = longitude.rem_euclid(360.0);
        // rem_euclid can round a tiny negative input up to exactly 360.0
        if reduced >= 360.0 {
            reduced = 0.0;
        }
        Self::new(reduced, speed, is_distinguished)
    }

    pub fn validate(&self) -> Result<(), AspectError> {
        if !self.longitude.is_finite() || !(0.0..360.0).contains(&self.longitude) {
            return Err(AspectError::InvalidLongitude {
                longitude: self.longitude,
            });
        }
        if !self.speed.is_finite() {
            return Err(AspectError::NonFiniteSpeed { speed: self.speed });
        }
        Ok(())
    }

    /// Retrograde in the domain sense: moving backwards and not exempt.
    pub fn is_retrograde(&self) -> bool {
        !self.is_distinguished && self.speed < 0.0
    }

    /// Degrees into the current 30° sign.
    pub fn degree_in_sign(&self) -> f64 {
        self.longitude % 30.0
    }
}

/// A named exact separation, e.g. trine = 120°.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    /// Aspect name: "conjunction", "trine", etc.
    pub name: String,
    /// Exact separation in [0, 180]
    pub exact_separation_deg: f64,
}

impl AspectDefinition {
    pub fn new(name: impl Into<String>, exact_separation_deg: f64) -> Result<Self, AspectError> {
        let aspect = Self {
            name: name.into(),
            exact_separation_deg,
        };
        aspect.validate()?;
        Ok(aspect)
    }

    pub fn validate(&self) -> Result<(), AspectError> {
        let d = self.exact_separation_deg;
        if d.is_finite() && (0.0..=180.0).contains(&d) {
            Ok(())
        } else {
            Err(AspectError::InvalidAspect {
                name: self.name.clone(),
                degrees: d,
            })
        }
    }

    pub fn conjunction() -> Self {
        Self::major("conjunction", 0.0)
    }

    pub fn sextile() -> Self {
        Self::major("sextile", 60.0)
    }

    pub fn square() -> Self {
        Self::major("square", 90.0)
    }

    pub fn trine() -> Self {
        Self::major("trine", 120.0)
    }

    pub fn opposition() -> Self {
        Self::major("opposition", 180.0)
    }

    /// The five Ptolemaic aspects, most common first.
    pub fn majors() -> Vec<Self> {
        vec![
            Self::conjunction(),
            Self::opposition(),
            Self::trine(),
            Self::square(),
            Self::sextile(),
        ]
    }

    fn major(name: &str, degrees: f64) -> Self {
        Self {
            name: name.to_string(),
            exact_separation_deg: degrees,
        }
    }
}

/// Which argument of an evaluation call played the lead role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadRole {
    Primary,
    Secondary,
}

/// Outcome of one applying/separating evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Whether the orb shrinks over the forward step
    pub applying: bool,
    /// Orb at evaluation time, [0, 180]
    pub current_orb_deg: f64,
    /// Lead minus other, normalized to (-180, 180]
    pub signed_separation_deg: f64,
    /// Target the orb is measured against at both instants
    pub closest_target_deg: f64,
    /// Lead speed minus other speed
    pub relative_speed_deg_per_day: f64,
    /// Separation after the forward step, normalized to (-180, 180]
    pub projected_separation_deg: f64,
    /// Orb after the forward step, against the same target
    pub projected_orb_deg: f64,
    /// Argument that led
    pub lead: LeadRole,
}

/// Outcome of the unsigned-separation projection used by the audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnsignedProjection {
    pub applying: bool,
    /// Unsigned separation's distance from the exact angle, now
    pub current_orb_deg: f64,
    /// Same distance after the forward step
    pub projected_orb_deg: f64,
    /// (projected - current) / step; negative while the orb shrinks
    pub orb_change_rate_deg_per_day: f64,
}

/// Richer reading of an [`EvaluationResult`] for callers that want to flag
/// low-confidence cases instead of trusting the forced boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMotion {
    Applying,
    Separating,
    /// Orb is exactly zero right now
    Exact,
    /// Relative speed is exactly zero
    Stationary,
}

impl EvaluationResult {
    pub fn separating(&self) -> bool {
        !self.applying
    }

    pub fn motion(&self) -> AspectMotion {
        if self.relative_speed_deg_per_day == 0.0 {
            AspectMotion::Stationary
        } else if self.current_orb_deg == 0.0 {
            AspectMotion::Exact
        } else if self.applying {
            AspectMotion::Applying
        } else {
            AspectMotion::Separating
        }
    }
}
