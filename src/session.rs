//! One round of play: the per-frame driver around the flight model and the
//! obstacle stream.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::error::CoreError;
use crate::flight::{FlightModel, FlightSprites};
use crate::obstacle::ObstacleStream;
use crate::sprite::Sprite;

/// What a frame step ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still flying; `scored` pairs were passed during this step.
    Running { scored: u32 },
    /// Touched an obstacle.
    Crashed,
    /// Left the top or bottom of the screen.
    OutOfBounds,
}

impl StepOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, StepOutcome::Running { .. })
    }
}

#[derive(Debug)]
pub struct GameSession<R: Rng> {
    config: GameConfig,
    flight: FlightModel,
    stream: ObstacleStream<R>,
    score: u32,
    ended: Option<StepOutcome>,
}

impl<R: Rng> GameSession<R> {
    /// Starts a round with the lizard centered and the first pair already at
    /// the right edge.
    pub fn new(
        config: &GameConfig,
        rng: R,
        flight_sprites: &FlightSprites,
        tip: &Sprite,
        body: &Sprite,
    ) -> Result<Self, CoreError> {
        let flight = FlightModel::new(config, config.start_y(), flight_sprites)?;
        let mut stream = ObstacleStream::new(config, rng, tip, body)?;
        stream.spawn_pair();
        debug!(
            "new session {}x{}, gap {}px",
            config.screen_width,
            config.screen_height,
            config.gap_px()
        );

        Ok(Self {
            config: config.clone(),
            flight,
            stream,
            score: 0,
            ended: None,
        })
    }

    pub fn ascend(&mut self) {
        if self.ended.is_none() {
            self.flight.ascend();
        }
    }

    /// Advances one frame: flight, obstacles, collision, scoring, bounds.
    /// Once the round has ended, returns the final outcome without changes.
    pub fn step(&mut self, elapsed_ms: f64) -> Result<StepOutcome, CoreError> {
        if let Some(outcome) = self.ended {
            return Ok(outcome);
        }

        self.flight.update(elapsed_ms)?;
        self.stream.update(elapsed_ms)?;

        // A pair passed on the crash frame still counts.
        let crashed = self.stream.collides_with(&self.flight);
        let scored = self.stream.score_passed(&self.flight);
        self.score += scored;

        if crashed {
            return Ok(self.end(StepOutcome::Crashed));
        }
        if self.flight.out_of_bounds(self.config.screen_height) {
            return Ok(self.end(StepOutcome::OutOfBounds));
        }

        Ok(StepOutcome::Running { scored })
    }

    fn end(&mut self, outcome: StepOutcome) -> StepOutcome {
        info!(
            "round over: {outcome:?} at y={:.1}, score {}",
            self.flight.y(),
            self.score
        );
        self.ended = Some(outcome);
        outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    pub fn outcome(&self) -> Option<StepOutcome> {
        self.ended
    }

    pub fn flight(&self) -> &FlightModel {
        &self.flight
    }

    pub fn stream(&self) -> &ObstacleStream<R> {
        &self.stream
    }
}
