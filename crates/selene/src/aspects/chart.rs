use crate::aspects::types::BodyState;
use crate::error::AspectError;
use serde::{Deserialize, Serialize};

/// One body of an ephemeris snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBody {
    /// Body ID: "sun", "moon", "mercury", etc.
    pub id: String,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
    /// Whether the body is exempt from the retrograde label (the Moon)
    #[serde(default)]
    pub distinguished: bool,
}

impl ChartBody {
    pub fn new(id: impl Into<String>, longitude: f64, speed: f64) -> Self {
        let id = id.into();
        let distinguished = id.eq_ignore_ascii_case("moon");
        Self {
            id,
            longitude,
            speed,
            distinguished,
        }
    }

    /// Validated state, with the raw longitude reduced modulo 360.
    pub fn state(&self) -> Result<BodyState, AspectError> {
        BodyState::wrapped(self.longitude, self.speed, self.distinguished)
    }
}

/// Bodies of one chart, in a stable order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartPositions {
    /// Free-form label, e.g. the chart name or timestamp
    #[serde(default)]
    pub label: String,
    pub bodies: Vec<ChartBody>,
}

impl ChartPositions {
    pub fn get(&self, id: &str) -> Option<&ChartBody> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
