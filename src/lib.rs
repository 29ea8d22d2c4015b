//! Simulation core for Flappy Lizard.
//!
//! The lizard flies at a fixed column while obstacle pairs scroll in from the
//! right. Everything here is frame-stepped: time only advances through the
//! elapsed milliseconds handed to the `update`/`step` calls, so a run can be
//! replayed exactly by feeding the same elapsed-time sequence and RNG seed.

pub mod config;
pub mod error;
pub mod flight;
pub mod mask;
pub mod obstacle;
pub mod session;
pub mod sprite;

pub use config::{GameConfig, TuningOverrides};
pub use error::CoreError;
pub use flight::{FlightModel, FlightSprites, WingFrame};
pub use mask::Mask;
pub use obstacle::{ObstaclePair, ObstacleStream};
pub use session::{GameSession, StepOutcome};
pub use sprite::{Rgba, Sprite};

/// Axis-aligned box in screen pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// True when the horizontal extents share any column.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right()
    }
}

pub(crate) fn check_elapsed(elapsed_ms: f64) -> Result<(), CoreError> {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        return Err(CoreError::InvalidElapsed(elapsed_ms));
    }
    Ok(())
}
