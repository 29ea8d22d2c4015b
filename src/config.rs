//! Game tunables.
//!
//! One immutable [`GameConfig`] is handed to every core component at
//! construction. Distances are screen pixels, times are milliseconds, speeds
//! are pixels per millisecond.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reference screen the default speeds were tuned for.
const REFERENCE_WIDTH: f64 = 568.0;
const REFERENCE_HEIGHT: f64 = 512.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub screen_width: usize,
    pub screen_height: usize,

    /// Fixed column of the flight entity's left edge.
    pub flight_x: i32,
    pub flight_width: usize,
    pub flight_height: usize,

    pub gravity_speed: f64,
    pub flying_speed: f64,
    /// Horizontal scroll speed shared by every obstacle pair and the backdrop.
    pub animation_speed: f64,

    /// Length of one climb once ascend is triggered.
    pub fly_time_ms: f64,
    pub add_interval_ms: f64,
    /// How long each wing frame is shown.
    pub wing_frame_ms: f64,

    pub pair_width: usize,
    pub piece_height: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: REFERENCE_WIDTH as usize,
            screen_height: REFERENCE_HEIGHT as usize,
            flight_x: 50,
            flight_width: 32,
            flight_height: 32,
            gravity_speed: 0.12,
            flying_speed: 0.4,
            animation_speed: 0.18,
            fly_time_ms: 111.3,
            add_interval_ms: 3000.0,
            wing_frame_ms: 250.0,
            pair_width: 80,
            piece_height: 32,
        }
    }
}

impl GameConfig {
    /// Reference tuning rescaled to a terminal pixel grid.
    ///
    /// Vertical speeds scale with the height, the scroll speed with the width,
    /// so a pass takes about as long as it does on the reference screen.
    pub fn for_terminal(
        width: usize,
        height: usize,
        flight_size: (usize, usize),
        pair_width: usize,
        piece_height: usize,
    ) -> Self {
        let reference = Self::default();
        let sy = height as f64 / REFERENCE_HEIGHT;
        let sx = width as f64 / REFERENCE_WIDTH;
        Self {
            screen_width: width,
            screen_height: height,
            flight_x: ((width as f64 * 0.2) as i32).max(4),
            flight_width: flight_size.0,
            flight_height: flight_size.1,
            gravity_speed: reference.gravity_speed * sy,
            flying_speed: reference.flying_speed * sy,
            animation_speed: reference.animation_speed * sx,
            pair_width,
            piece_height,
            ..reference
        }
    }

    /// Body pieces shared between the two segments of every pair, excluding
    /// the two tips. Leaves room for three flight heights plus one piece.
    pub fn body_piece_total(&self) -> usize {
        let reserved = 3 * self.flight_height + 3 * self.piece_height;
        if self.piece_height == 0 || self.screen_height < reserved {
            return 0;
        }
        (self.screen_height - reserved) / self.piece_height
    }

    /// Vertical opening between the two tips. Identical for every pair.
    pub fn gap_px(&self) -> usize {
        self.screen_height
            .saturating_sub((self.body_piece_total() + 2) * self.piece_height)
    }

    /// Horizontal distance between the left edges of consecutive pairs.
    pub fn pair_spacing_px(&self) -> f64 {
        self.animation_speed * self.add_interval_ms
    }

    /// Vertical start that centers the flight entity.
    pub fn start_y(&self) -> f64 {
        self.screen_height as f64 / 2.0 - self.flight_height as f64 / 2.0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |msg: String| Err(CoreError::InvalidConfig(msg));

        if self.screen_width == 0 || self.screen_height == 0 {
            return invalid(format!(
                "screen must be non-empty, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if self.flight_width == 0 || self.flight_height == 0 {
            return invalid("flight entity must be non-empty".into());
        }
        if self.pair_width == 0 || self.piece_height == 0 {
            return invalid("obstacle pieces must be non-empty".into());
        }
        if self.flight_x < 0 || self.flight_x as usize + self.flight_width > self.screen_width {
            return invalid(format!(
                "flight column {}..{} is off a {}px wide screen",
                self.flight_x,
                self.flight_x as i64 + self.flight_width as i64,
                self.screen_width
            ));
        }
        for (name, value) in [
            ("gravity_speed", self.gravity_speed),
            ("flying_speed", self.flying_speed),
            ("animation_speed", self.animation_speed),
            ("add_interval_ms", self.add_interval_ms),
            ("wing_frame_ms", self.wing_frame_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.fly_time_ms.is_finite() || self.fly_time_ms < 0.0 {
            return invalid(format!(
                "fly_time_ms must be non-negative, got {}",
                self.fly_time_ms
            ));
        }
        if self.body_piece_total() < 1 {
            return invalid(format!(
                "screen height {} leaves no room for a passable gap",
                self.screen_height
            ));
        }
        if self.pair_spacing_px() < self.pair_width as f64 {
            return invalid(format!(
                "pairs {:.1}px apart would overlap at width {}",
                self.pair_spacing_px(),
                self.pair_width
            ));
        }
        Ok(())
    }
}

/// Partial tuning loaded from a file; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningOverrides {
    pub gravity_speed: Option<f64>,
    pub flying_speed: Option<f64>,
    pub animation_speed: Option<f64>,
    pub fly_time_ms: Option<f64>,
    pub add_interval_ms: Option<f64>,
}

impl TuningOverrides {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Applies the overrides and re-validates the result.
    pub fn apply(&self, config: &GameConfig) -> Result<GameConfig, CoreError> {
        let mut out = config.clone();
        if let Some(v) = self.gravity_speed {
            out.gravity_speed = v;
        }
        if let Some(v) = self.flying_speed {
            out.flying_speed = v;
        }
        if let Some(v) = self.animation_speed {
            out.animation_speed = v;
        }
        if let Some(v) = self.fly_time_ms {
            out.fly_time_ms = v;
        }
        if let Some(v) = self.add_interval_ms {
            out.add_interval_ms = v;
        }
        out.validate()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        // (512 - 96 - 96) / 32
        assert_eq!(config.body_piece_total(), 10);
        assert_eq!(config.gap_px(), 512 - 12 * 32);
        assert!((config.start_y() - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gap_always_fits_three_flight_heights() {
        for height in 100..600 {
            let config = GameConfig {
                screen_height: height,
                ..GameConfig::default()
            };
            if config.body_piece_total() >= 1 {
                assert!(config.gap_px() >= 3 * config.flight_height + config.piece_height);
            }
        }
    }

    #[test]
    fn test_too_short_screen_rejected() {
        let config = GameConfig {
            screen_height: 200,
            ..GameConfig::default()
        };
        assert_eq!(config.body_piece_total(), 0);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_overlapping_spacing_rejected() {
        let config = GameConfig {
            add_interval_ms: 100.0,
            ..GameConfig::default()
        };
        // 0.18 * 100 = 18px < 80px wide pairs
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        let config = GameConfig {
            gravity_speed: 0.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            flying_speed: f64::NAN,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flight_column_must_be_on_screen() {
        let config = GameConfig {
            flight_x: -1,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let config = GameConfig {
            flight_x: 537,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        // Right edge flush with the screen is fine.
        let config = GameConfig {
            flight_x: 536,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_terminal_scales_speeds() {
        let config = GameConfig::for_terminal(142, 128, (8, 6), 10, 4);
        assert!((config.gravity_speed - 0.03).abs() < 1e-12);
        assert!((config.flying_speed - 0.1).abs() < 1e-12);
        assert!((config.animation_speed - 0.045).abs() < 1e-12);
        assert_eq!(config.flight_x, 28);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_apply_and_validate() {
        let overrides = TuningOverrides::from_json(r#"{ "gravity_speed": 0.2 }"#).unwrap();
        let config = overrides.apply(&GameConfig::default()).unwrap();
        assert!((config.gravity_speed - 0.2).abs() < f64::EPSILON);
        assert!((config.flying_speed - 0.4).abs() < f64::EPSILON);

        let overrides = TuningOverrides::from_json(r#"{ "add_interval_ms": -1.0 }"#).unwrap();
        assert!(overrides.apply(&GameConfig::default()).is_err());
    }

    #[test]
    fn test_overrides_reject_unknown_fields() {
        assert!(TuningOverrides::from_json(r#"{ "gravity": 0.2 }"#).is_err());
    }
}
