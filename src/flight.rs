//! The player's lizard: fixed column, vertical-only motion.

use log::debug;

use crate::config::GameConfig;
use crate::error::CoreError;
use crate::mask::Mask;
use crate::sprite::Sprite;
use crate::{Rect, check_elapsed};

/// Enumerated animation frame of the flight entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WingFrame {
    Down,
    Up,
}

impl WingFrame {
    /// Frame shown at `clock_ms`: `Down` for the first `frame_ms` of every
    /// cycle, then `Up`.
    pub fn at(clock_ms: f64, frame_ms: f64) -> WingFrame {
        if (clock_ms / frame_ms) as u64 % 2 == 0 {
            WingFrame::Down
        } else {
            WingFrame::Up
        }
    }
}

/// One sprite per wing frame, consumed once at construction.
#[derive(Debug, Clone)]
pub struct FlightSprites {
    pub up: Sprite,
    pub down: Sprite,
}

#[derive(Debug, Clone)]
pub struct FlightModel {
    x: i32,
    y: f64,
    climb_remaining_ms: f64,
    clock_ms: f64,

    width: usize,
    height: usize,
    gravity_speed: f64,
    flying_speed: f64,
    fly_time_ms: f64,
    wing_frame_ms: f64,

    mask_up: Mask,
    mask_down: Mask,
}

impl FlightModel {
    /// Falling, at `config.flight_x` and the given height.
    pub fn new(config: &GameConfig, y: f64, sprites: &FlightSprites) -> Result<Self, CoreError> {
        config.validate()?;
        let expected = (config.flight_width, config.flight_height);
        sprites.up.expect_size(expected)?;
        sprites.down.expect_size(expected)?;

        Ok(Self {
            x: config.flight_x,
            y,
            climb_remaining_ms: 0.0,
            clock_ms: 0.0,
            width: config.flight_width,
            height: config.flight_height,
            gravity_speed: config.gravity_speed,
            flying_speed: config.flying_speed,
            fly_time_ms: config.fly_time_ms,
            wing_frame_ms: config.wing_frame_ms,
            mask_up: Mask::from_sprite(&sprites.up),
            mask_down: Mask::from_sprite(&sprites.down),
        })
    }

    /// Restarts the climb. Resets rather than extends when already climbing.
    pub fn ascend(&mut self) {
        self.climb_remaining_ms = self.fly_time_ms;
    }

    /// One physics step of `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: f64) -> Result<(), CoreError> {
        check_elapsed(elapsed_ms)?;
        self.clock_ms += elapsed_ms;

        if self.is_climbing() {
            self.y -= self.flying_speed * elapsed_ms;
            // No carry-over into the fall within the same step.
            self.climb_remaining_ms = (self.climb_remaining_ms - elapsed_ms).max(0.0);
            if self.climb_remaining_ms == 0.0 {
                debug!("climb finished at y={:.1}", self.y);
            }
        } else {
            self.y += self.gravity_speed * elapsed_ms;
        }
        Ok(())
    }

    pub fn is_climbing(&self) -> bool {
        self.climb_remaining_ms > 0.0
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn climb_remaining_ms(&self) -> f64 {
        self.climb_remaining_ms
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x as f64,
            y: self.y,
            w: self.width as f64,
            h: self.height as f64,
        }
    }

    pub fn wing_frame(&self) -> WingFrame {
        WingFrame::at(self.clock_ms, self.wing_frame_ms)
    }

    /// Silhouette of the frame currently shown.
    pub fn mask(&self) -> &Mask {
        match self.wing_frame() {
            WingFrame::Up => &self.mask_up,
            WingFrame::Down => &self.mask_down,
        }
    }

    /// True once any part of the box leaves `0..screen_height`.
    pub fn out_of_bounds(&self, screen_height: usize) -> bool {
        self.y < 0.0 || self.y + self.height as f64 > screen_height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Rgba;

    fn sprites(config: &GameConfig) -> FlightSprites {
        let solid = |w, h| Sprite::new(w, h, vec![Rgba::opaque(0, 200, 0); w * h]).unwrap();
        let mut up_pixels = vec![Rgba::TRANSPARENT; config.flight_width * config.flight_height];
        up_pixels[0] = Rgba::opaque(0, 200, 0);
        FlightSprites {
            up: Sprite::new(config.flight_width, config.flight_height, up_pixels).unwrap(),
            down: solid(config.flight_width, config.flight_height),
        }
    }

    fn model(config: &GameConfig, y: f64) -> FlightModel {
        FlightModel::new(config, y, &sprites(config)).unwrap()
    }

    fn scenario_config() -> GameConfig {
        GameConfig {
            gravity_speed: 0.2,
            flying_speed: 0.2,
            fly_time_ms: 333.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_falls_under_gravity() {
        let config = scenario_config();
        let mut flight = model(&config, 200.0);
        flight.update(100.0).unwrap();
        assert!((flight.y() - 220.0).abs() < 1e-9);
        assert!(!flight.is_climbing());
    }

    #[test]
    fn test_fall_is_linear_in_elapsed() {
        let config = GameConfig::default();
        for t in [0.0, 1.0, 16.7, 33.3, 250.0] {
            let mut flight = model(&config, 100.0);
            let before = flight.y();
            flight.update(t).unwrap();
            assert_eq!(flight.y(), before + config.gravity_speed * t);
        }
    }

    #[test]
    fn test_climb_scenario() {
        let config = scenario_config();
        let mut flight = model(&config, 200.0);
        flight.ascend();
        assert_eq!(flight.climb_remaining_ms(), 333.0);

        flight.update(111.0).unwrap();
        flight.update(111.0).unwrap();
        assert!(flight.is_climbing());
        flight.update(111.0).unwrap();

        assert_eq!(flight.climb_remaining_ms(), 0.0);
        assert!(!flight.is_climbing());
        assert!((flight.y() - (200.0 - 66.6)).abs() < 1e-9);
    }

    #[test]
    fn test_climb_floors_at_zero() {
        let config = scenario_config();
        let mut flight = model(&config, 200.0);
        flight.ascend();
        flight.update(500.0).unwrap();
        assert_eq!(flight.climb_remaining_ms(), 0.0);
        // The whole step is spent climbing.
        assert!((flight.y() - 100.0).abs() < 1e-9);

        flight.update(10.0).unwrap();
        assert!((flight.y() - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_reascend_resets_not_stacks() {
        let config = scenario_config();
        let mut flight = model(&config, 200.0);
        flight.ascend();
        flight.update(100.0).unwrap();
        flight.ascend();
        assert_eq!(flight.climb_remaining_ms(), 333.0);
        flight.ascend();
        assert_eq!(flight.climb_remaining_ms(), 333.0);
    }

    #[test]
    fn test_invalid_elapsed_rejected() {
        let config = GameConfig::default();
        let mut flight = model(&config, 200.0);
        assert_eq!(
            flight.update(-1.0),
            Err(CoreError::InvalidElapsed(-1.0))
        );
        assert!(flight.update(f64::NAN).is_err());
        assert!(flight.update(f64::INFINITY).is_err());
        assert_eq!(flight.y(), 200.0);
    }

    #[test]
    fn test_wrong_sprite_size_rejected() {
        let config = GameConfig::default();
        let small = Sprite::new(2, 2, vec![Rgba::TRANSPARENT; 4]).unwrap();
        let sprites = FlightSprites {
            up: small.clone(),
            down: small,
        };
        assert!(matches!(
            FlightModel::new(&config, 0.0, &sprites),
            Err(CoreError::SpriteSize { .. })
        ));
    }

    #[test]
    fn test_wing_frame_cycles() {
        assert_eq!(WingFrame::at(0.0, 250.0), WingFrame::Down);
        assert_eq!(WingFrame::at(249.9, 250.0), WingFrame::Down);
        assert_eq!(WingFrame::at(250.0, 250.0), WingFrame::Up);
        assert_eq!(WingFrame::at(499.0, 250.0), WingFrame::Up);
        assert_eq!(WingFrame::at(500.0, 250.0), WingFrame::Down);
    }

    #[test]
    fn test_mask_follows_wing_frame() {
        let config = GameConfig::default();
        let mut flight = model(&config, 200.0);
        assert_eq!(flight.mask().count(), 32 * 32);
        flight.update(300.0).unwrap();
        assert_eq!(flight.wing_frame(), WingFrame::Up);
        assert_eq!(flight.mask().count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let config = GameConfig::default();
        assert!(!model(&config, 0.0).out_of_bounds(512));
        assert!(!model(&config, 480.0).out_of_bounds(512));
        assert!(model(&config, -0.5).out_of_bounds(512));
        assert!(model(&config, 480.5).out_of_bounds(512));
    }
}
