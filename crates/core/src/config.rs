//! Tunable constants for the particle backdrop, loadable from JSON.
//!
//! Every key is optional. Missing keys or keys of the wrong JSON type fall
//! back to the defaults, which reproduce the portfolio hero section. Values
//! of the right type but outside their valid range are rejected by
//! [`BackdropConfig::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BackdropError;
use crate::particle::clamp_count;

/// Default number of particles per field.
pub const DEFAULT_PARTICLE_COUNT: usize = 100;
/// Largest accepted particle count; larger requests are clamped to it.
pub const MAX_PARTICLE_COUNT: usize = 10_000;
/// Default smallest particle radius.
pub const DEFAULT_RADIUS_MIN: f64 = 1.0;
/// Default largest particle radius (exclusive).
pub const DEFAULT_RADIUS_MAX: f64 = 5.0;
/// Default half-width of each velocity component's range.
pub const DEFAULT_SPEED: f64 = 0.5;
/// Default distance below which two particles are linked.
pub const DEFAULT_LINK_DISTANCE: f64 = 150.0;
/// Default stroke width of a link.
pub const DEFAULT_LINK_WIDTH: f64 = 0.5;

/// Particle field and renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackdropConfig {
    /// Number of particles created per field.
    pub particle_count: usize,
    /// Radius range lower bound.
    pub radius_min: f64,
    /// Radius range upper bound (exclusive).
    pub radius_max: f64,
    /// Each velocity component is drawn from [-speed, speed).
    pub speed: f64,
    /// Pairs closer than this are linked.
    pub link_distance: f64,
    /// Link stroke width.
    pub link_width: f64,
    /// Fixed PRNG seed; `None` seeds once from the clock when the loop is
    /// built, and later rebuilds keep drawing from that generator.
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            radius_min: DEFAULT_RADIUS_MIN,
            radius_max: DEFAULT_RADIUS_MAX,
            speed: DEFAULT_SPEED,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_width: DEFAULT_LINK_WIDTH,
            seed: None,
        }
    }
}

impl BackdropConfig {
    /// Reads settings from a JSON object, falling back to defaults per key.
    ///
    /// A negative or fractional `particle_count` loads as 0 and one above
    /// [`MAX_PARTICLE_COUNT`] is clamped to it. The result is validated.
    pub fn from_json(params: &Value) -> Result<Self, BackdropError> {
        let number = |name: &str, default: f64| {
            params.get(name).and_then(Value::as_f64).unwrap_or(default)
        };
        let particle_count = match params.get("particle_count") {
            Some(v) if v.is_number() => match (v.as_i64(), v.as_u64()) {
                (Some(n), _) => clamp_count(n),
                (None, Some(_)) => MAX_PARTICLE_COUNT,
                (None, None) => 0,
            },
            _ => DEFAULT_PARTICLE_COUNT,
        };
        let config = Self {
            particle_count,
            radius_min: number("radius_min", DEFAULT_RADIUS_MIN),
            radius_max: number("radius_max", DEFAULT_RADIUS_MAX),
            speed: number("speed", DEFAULT_SPEED),
            link_distance: number("link_distance", DEFAULT_LINK_DISTANCE),
            link_width: number("link_width", DEFAULT_LINK_WIDTH),
            seed: params.get("seed").and_then(Value::as_u64),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, BackdropError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BackdropError::Io(format!("{}: {e}", path.display())))?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| BackdropError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json(&value)
    }

    /// Checks that every range is usable.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.particle_count > MAX_PARTICLE_COUNT {
            return Err(BackdropError::InvalidConfig(format!(
                "particle_count {} exceeds {MAX_PARTICLE_COUNT}",
                self.particle_count
            )));
        }
        let finite = [
            ("radius_min", self.radius_min),
            ("radius_max", self.radius_max),
            ("speed", self.speed),
            ("link_distance", self.link_distance),
            ("link_width", self.link_width),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(BackdropError::InvalidConfig(format!(
                "{name} must be a finite, non-negative number"
            )));
        }
        if self.radius_min <= 0.0 {
            return Err(BackdropError::InvalidConfig(
                "radius_min must be positive".to_string(),
            ));
        }
        if self.radius_max < self.radius_min {
            return Err(BackdropError::InvalidConfig(format!(
                "radius_max ({}) is below radius_min ({})",
                self.radius_max, self.radius_min
            )));
        }
        Ok(())
    }

    /// Current settings as a JSON object (the inverse of [`Self::from_json`]).
    pub fn to_json(&self) -> Value {
        json!({
            "particle_count": self.particle_count,
            "radius_min": self.radius_min,
            "radius_max": self.radius_max,
            "speed": self.speed,
            "link_distance": self.link_distance,
            "link_width": self.link_width,
            "seed": self.seed,
        })
    }
}
