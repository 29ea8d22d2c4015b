//! Cactus pairs scrolling in from the right.

use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::CoreError;
use crate::flight::FlightModel;
use crate::mask::Mask;
use crate::sprite::Sprite;
use crate::{Rect, check_elapsed};

/// A top and a bottom cactus with a passable gap between them.
///
/// Piece counts exclude the tip that caps each segment, so a segment is
/// `(count + 1) * piece_height` tall.
#[derive(Debug, Clone)]
pub struct ObstaclePair {
    x: f64,
    top_piece_count: usize,
    bottom_piece_count: usize,
    scored: bool,

    width: usize,
    piece_height: usize,
    screen_height: usize,
    top_mask: Mask,
    bottom_mask: Mask,
}

impl ObstaclePair {
    fn new(
        config: &GameConfig,
        x: f64,
        top_piece_count: usize,
        bottom_piece_count: usize,
        tip: &Mask,
        body: &Mask,
    ) -> Self {
        let piece = config.piece_height as i32;
        let segment = |count: usize| Mask::empty(config.pair_width, (count + 1) * config.piece_height);

        // Body hangs from the ceiling, tip at its lower end.
        let mut top_mask = segment(top_piece_count);
        for i in 0..top_piece_count as i32 {
            top_mask.draw(body, 0, i * piece);
        }
        top_mask.draw(tip, 0, top_piece_count as i32 * piece);

        // Tip first, body down to the floor.
        let mut bottom_mask = segment(bottom_piece_count);
        bottom_mask.draw(tip, 0, 0);
        for i in 1..=bottom_piece_count as i32 {
            bottom_mask.draw(body, 0, i * piece);
        }

        Self {
            x,
            top_piece_count,
            bottom_piece_count,
            scored: false,
            width: config.pair_width,
            piece_height: config.piece_height,
            screen_height: config.screen_height,
            top_mask,
            bottom_mask,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn top_piece_count(&self) -> usize {
        self.top_piece_count
    }

    pub fn bottom_piece_count(&self) -> usize {
        self.bottom_piece_count
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    /// Height of the top segment including its tip.
    pub fn top_height_px(&self) -> usize {
        (self.top_piece_count + 1) * self.piece_height
    }

    /// Height of the bottom segment including its tip.
    pub fn bottom_height_px(&self) -> usize {
        (self.bottom_piece_count + 1) * self.piece_height
    }

    pub fn gap_px(&self) -> usize {
        self.screen_height - self.top_height_px() - self.bottom_height_px()
    }

    /// Screen row where the bottom segment starts.
    pub fn bottom_y(&self) -> usize {
        self.screen_height - self.bottom_height_px()
    }

    pub fn top_rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: 0.0,
            w: self.width as f64,
            h: self.top_height_px() as f64,
        }
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.bottom_y() as f64,
            w: self.width as f64,
            h: self.bottom_height_px() as f64,
        }
    }

    /// Full column the pair occupies, for horizontal tests.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: 0.0,
            w: self.width as f64,
            h: self.screen_height as f64,
        }
    }

    /// Any column of the pair lies inside `0..screen_width`.
    pub fn is_visible(&self, screen_width: usize) -> bool {
        -(self.width as f64) < self.x && self.x < screen_width as f64
    }

    pub fn is_retired(&self) -> bool {
        self.x + (self.width as f64) < 0.0
    }

    /// Pixel-exact test against the flight entity's current silhouette.
    pub fn collides_with(&self, flight: &FlightModel) -> bool {
        if !self.rect().overlaps_x(&flight.rect()) {
            return false;
        }
        let fx = flight.x();
        let fy = flight.y().floor() as i32;
        let px = self.x.floor() as i32;
        let mask = flight.mask();

        mask.overlaps(&self.top_mask, px - fx, -fy)
            || mask.overlaps(&self.bottom_mask, px - fx, self.bottom_y() as i32 - fy)
    }
}

/// Ordered set of live pairs. Front is leftmost and oldest.
#[derive(Debug)]
pub struct ObstacleStream<R: Rng> {
    pairs: Vec<ObstaclePair>,
    ms_since_last_add: f64,
    rng: R,

    config: GameConfig,
    tip_mask: Mask,
    body_mask: Mask,
}

impl<R: Rng> ObstacleStream<R> {
    /// Empty stream. Tip and body sprites must be `pair_width` by
    /// `piece_height`.
    pub fn new(config: &GameConfig, rng: R, tip: &Sprite, body: &Sprite) -> Result<Self, CoreError> {
        config.validate()?;
        let expected = (config.pair_width, config.piece_height);
        tip.expect_size(expected)?;
        body.expect_size(expected)?;

        Ok(Self {
            pairs: Vec::new(),
            ms_since_last_add: 0.0,
            rng,
            config: config.clone(),
            tip_mask: Mask::from_sprite(tip),
            body_mask: Mask::from_sprite(body),
        })
    }

    /// Adds a pair at the right edge with a random split.
    pub fn spawn_pair(&mut self) -> &ObstaclePair {
        self.spawn_pair_at(self.config.screen_width as f64 - 1.0)
    }

    fn spawn_pair_at(&mut self, x: f64) -> &ObstaclePair {
        let (top, bottom) = self.draw_split();
        debug!("spawning pair at x={x:.1}: top={top} bottom={bottom}");

        let pair = ObstaclePair::new(&self.config, x, top, bottom, &self.tip_mask, &self.body_mask);
        self.pairs.push(pair);
        &self.pairs[self.pairs.len() - 1]
    }

    /// `(top, bottom)` piece counts for the next pair.
    fn draw_split(&mut self) -> (usize, usize) {
        let total = self.config.body_piece_total();
        let bottom = self.rng.gen_range(1..=total);
        (total - bottom, bottom)
    }

    /// Spawns, scrolls and retires pairs for one frame. Returns how many
    /// pairs were spawned.
    pub fn update(&mut self, elapsed_ms: f64) -> Result<usize, CoreError> {
        check_elapsed(elapsed_ms)?;
        let speed = self.config.animation_speed;

        for pair in &mut self.pairs {
            pair.x -= speed * elapsed_ms;
        }

        // Excess time carries over. A pair spawned mid-step starts as far left
        // as it would have scrolled since its spawn instant. Oldest first keeps
        // the sequence left to right.
        self.ms_since_last_add += elapsed_ms;
        let spawn_x = self.config.screen_width as f64 - 1.0;
        let mut spawned = 0;
        let mut skipped = 0;
        while self.ms_since_last_add >= self.config.add_interval_ms {
            self.ms_since_last_add -= self.config.add_interval_ms;
            spawned += 1;

            let x = spawn_x - speed * self.ms_since_last_add;
            if x + (self.config.pair_width as f64) < 0.0 {
                // Already gone. The split is still drawn so the rng stays in
                // step with shorter frames.
                self.draw_split();
                skipped += 1;
                continue;
            }
            self.spawn_pair_at(x);
        }
        if skipped > 0 {
            debug!("skipped {skipped} pair(s) that scrolled off within one update");
        }

        let before = self.pairs.len();
        self.pairs.retain(|pair| !pair.is_retired());
        let retired = before - self.pairs.len();
        if retired > 0 {
            debug!("retired {retired} pair(s), {} live", self.pairs.len());
        }

        Ok(spawned)
    }

    /// True if any pair overlapping the flight entity's column touches its
    /// silhouette.
    pub fn collides_with(&self, flight: &FlightModel) -> bool {
        self.pairs.iter().any(|pair| pair.collides_with(flight))
    }

    /// Marks every pair now wholly behind the flight entity as scored and
    /// returns how many flipped this call.
    pub fn score_passed(&mut self, flight: &FlightModel) -> u32 {
        let mut newly = 0;
        for pair in &mut self.pairs {
            if !pair.scored && pair.x + (pair.width as f64) < flight.x() as f64 {
                pair.scored = true;
                newly += 1;
            }
        }
        newly
    }

    pub fn pairs(&self) -> &[ObstaclePair] {
        &self.pairs
    }

    /// Pairs with at least one column on screen, left to right.
    pub fn visible_pairs(&self) -> impl Iterator<Item = &ObstaclePair> {
        let width = self.config.screen_width;
        self.pairs.iter().filter(move |pair| pair.is_visible(width))
    }

    pub fn ms_since_last_add(&self) -> f64 {
        self.ms_since_last_add
    }
}
