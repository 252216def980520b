//! Simulation settings
//!
//! Loaded from a JSON file. Every field has a default, so a partial file (or
//! an empty object) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Placeholder name for checkpoints beyond the configured name list
pub const UNNAMED_CHECKPOINT: &str = "--";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Physics and board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Fixed tick duration (ms)
    pub time_step_size: u32,
    /// Maximum distance covered per collision substep
    pub position_step_size: f32,

    // === Physics ===
    /// Multiplier from tilt input to acceleration
    pub acceleration_factor: f32,
    /// Share of the reflected normal component restored on impact
    pub damping_factor: f32,

    // === Geometry ===
    pub ball_radius: u32,
    pub hole_radius: u32,
    pub screen_width: u32,
    pub screen_height: u32,

    // === Map ===
    /// Tab-separated checkpoint display names, assigned in map order
    #[serde(rename = "checkpoints")]
    pub checkpoint_names: String,
    pub map_file_name: String,

    // === Feedback ===
    /// Haptic pulse length for a wall impact (ms)
    pub haptic_pulse_ms: u32,
    /// Time between hole capture and respawn (ms)
    pub respawn_delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_step_size: TICK_MS,
            position_step_size: POSITION_STEP,

            acceleration_factor: ACCELERATION_FACTOR,
            damping_factor: DAMPING_FACTOR,

            ball_radius: BALL_RADIUS,
            hole_radius: HOLE_RADIUS,
            screen_width: GRID_WIDTH,
            screen_height: GRID_HEIGHT,

            checkpoint_names: "1H\t9O\t7L\t0E".to_string(),
            map_file_name: "maps/demo.txt".to_string(),

            haptic_pulse_ms: HAPTIC_PULSE_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &str) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        if self.time_step_size == 0 {
            return Err(invalid("time_step_size", "must be positive"));
        }
        if !(self.position_step_size > 0.0) {
            return Err(invalid("position_step_size", "must be positive"));
        }
        if !self.acceleration_factor.is_finite() {
            return Err(invalid("acceleration_factor", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(invalid("damping_factor", "must be within [0, 1]"));
        }
        if self.ball_radius == 0 {
            return Err(invalid("ball_radius", "must be positive"));
        }
        if self.hole_radius == 0 {
            return Err(invalid("hole_radius", "must be positive"));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(invalid("screen_width", "grid must not be empty"));
        }
        Ok(())
    }

    /// Tick duration in seconds
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.time_step_size as f32 / 1000.0
    }

    /// Display name for the checkpoint with the given map index
    pub fn checkpoint_name(&self, index: usize) -> String {
        self.checkpoint_names
            .split('\t')
            .nth(index)
            .unwrap_or(UNNAMED_CHECKPOINT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.time_step_size, 20);
        assert_eq!(settings.ball_radius, 10);
        assert_eq!(settings.hole_radius, 12);
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{"damping_factor": 0.5, "checkpoints": "A\tB"}"#).unwrap();
        assert_eq!(settings.damping_factor, 0.5);
        assert_eq!(settings.checkpoint_name(0), "A");
        assert_eq!(settings.checkpoint_name(1), "B");
        assert_eq!(settings.checkpoint_name(2), UNNAMED_CHECKPOINT);
        assert_eq!(settings.screen_width, 800);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"position_step_size": 0.0}"#),
            Err(SettingsError::Invalid {
                field: "position_step_size",
                ..
            })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"damping_factor": 3.0}"#),
            Err(SettingsError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Json(_))
        ));
    }
}
