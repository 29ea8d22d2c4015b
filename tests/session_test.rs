//! End-to-end rounds driven by synthetic frame times.

use flappy_lizard::{
    FlightSprites, GameConfig, GameSession, ObstacleStream, Rgba, Sprite, StepOutcome,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME_MS: f64 = 16.0;

fn solid(w: usize, h: usize) -> Sprite {
    Sprite::new(w, h, vec![Rgba::opaque(90, 170, 60); w * h]).unwrap()
}

fn test_config() -> GameConfig {
    GameConfig {
        gravity_speed: 0.2,
        ..GameConfig::default()
    }
}

fn new_session(config: &GameConfig, seed: u64) -> GameSession<ChaCha8Rng> {
    let body = solid(config.flight_width, config.flight_height);
    let sprites = FlightSprites {
        up: body.clone(),
        down: body,
    };
    let piece = solid(config.pair_width, config.piece_height);
    GameSession::new(config, ChaCha8Rng::seed_from_u64(seed), &sprites, &piece, &piece).unwrap()
}

/// Ascends whenever the lizard's center sinks below the next gap's middle.
fn autopilot(session: &mut GameSession<ChaCha8Rng>) {
    let flight = session.flight();
    let next = session
        .stream()
        .pairs()
        .iter()
        .find(|pair| pair.x() + pair.width() as f64 >= flight.x() as f64);
    if let Some(pair) = next {
        let target = pair.top_height_px() as f64 + pair.gap_px() as f64 / 2.0;
        let center = flight.y() + flight.height() as f64 / 2.0;
        if !flight.is_climbing() && center > target + 8.0 {
            session.ascend();
        }
    }
}

#[test]
fn test_autopilot_survives_and_scores() {
    let config = test_config();
    let mut session = new_session(&config, 2024);

    let mut total_scored = 0;
    for _ in 0..3750 {
        autopilot(&mut session);
        match session.step(FRAME_MS).unwrap() {
            StepOutcome::Running { scored } => total_scored += scored,
            other => panic!("round ended early: {other:?} with score {}", session.score()),
        }
    }

    assert_eq!(total_scored, session.score());
    assert!(session.score() >= 18, "score {}", session.score());
    assert!(session.stream().pairs().iter().all(|p| p.x() + p.width() as f64 >= 0.0));
}

#[test]
fn test_idle_lizard_falls_out() {
    let config = test_config();
    let mut session = new_session(&config, 1);
    let mut frames = 0;
    let outcome = loop {
        let outcome = session.step(FRAME_MS).unwrap();
        frames += 1;
        if outcome.is_over() {
            break outcome;
        }
    };
    assert_eq!(outcome, StepOutcome::OutOfBounds);
    // 240px of room at 3.2px per frame.
    assert!((75..=76).contains(&frames), "fell out after {frames} frames");
    assert_eq!(session.score(), 0);
}

#[test]
fn test_flying_into_ceiling_is_out_of_bounds() {
    let config = test_config();
    let mut session = new_session(&config, 1);
    let outcome = loop {
        session.ascend();
        let outcome = session.step(FRAME_MS).unwrap();
        if outcome.is_over() {
            break outcome;
        }
    };
    assert_eq!(outcome, StepOutcome::OutOfBounds);
    assert!(session.flight().y() < 0.0);
}

#[test]
fn test_same_seed_and_inputs_replay_identically() {
    let config = test_config();
    let mut a = new_session(&config, 77);
    let mut b = new_session(&config, 77);
    for _ in 0..2000 {
        autopilot(&mut a);
        autopilot(&mut b);
        assert_eq!(a.step(FRAME_MS).unwrap(), b.step(FRAME_MS).unwrap());
        assert_eq!(a.flight().y(), b.flight().y());
    }
    let splits = |s: &GameSession<ChaCha8Rng>| -> Vec<(usize, usize)> {
        s.stream()
            .pairs()
            .iter()
            .map(|p| (p.top_piece_count(), p.bottom_piece_count()))
            .collect()
    };
    assert_eq!(splits(&a), splits(&b));
    assert_eq!(a.score(), b.score());
}

#[test]
fn test_spawn_positions_independent_of_frame_rate() {
    let config = GameConfig::default();
    let piece = solid(config.pair_width, config.piece_height);
    let mut fine = ObstacleStream::new(&config, ChaCha8Rng::seed_from_u64(9), &piece, &piece).unwrap();
    let mut coarse =
        ObstacleStream::new(&config, ChaCha8Rng::seed_from_u64(9), &piece, &piece).unwrap();

    for _ in 0..400 {
        fine.update(16.0).unwrap();
    }
    coarse.update(6400.0).unwrap();

    assert_eq!(fine.pairs().len(), coarse.pairs().len());
    for (f, c) in fine.pairs().iter().zip(coarse.pairs()) {
        assert!((f.x() - c.x()).abs() < 1e-6, "{} vs {}", f.x(), c.x());
        assert_eq!(f.bottom_piece_count(), c.bottom_piece_count());
    }
    assert!((fine.ms_since_last_add() - coarse.ms_since_last_add()).abs() < 1e-6);
}
