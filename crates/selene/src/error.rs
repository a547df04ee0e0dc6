use thiserror::Error;

/// Malformed input rejected before any aspect arithmetic runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AspectError {
    #[error("Longitude {longitude} is outside [0, 360)")]
    InvalidLongitude { longitude: f64 },
    #[error("Speed {speed} is not a finite number")]
    NonFiniteSpeed { speed: f64 },
    #[error("Aspect {name} has exact separation {degrees}, expected a finite value in [0, 180]")]
    InvalidAspect { name: String, degrees: f64 },
    #[error("Time step {days} days must be finite and greater than zero")]
    InvalidTimeStep { days: f64 },
    #[error("Orb {degrees} must be finite and within [0, 180]")]
    InvalidOrb { degrees: f64 },
    #[error("Speeds {primary} and {secondary} over {days} days overflow the projection")]
    UnboundedMotion {
        primary: f64,
        secondary: f64,
        days: f64,
    },
}
