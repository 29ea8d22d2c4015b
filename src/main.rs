mod art;
mod audio;
mod render;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, MouseEventKind},
    execute, terminal,
};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::{self, File};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use flappy_lizard::{GameConfig, GameSession, StepOutcome, TuningOverrides};

use art::{Art, CACTUS_WIDTH, LIZARD_SIZE, PIECE_HEIGHT};
use audio::Audio;
use render::{Overlay, PixelBuf, Scene};

const CONFIG_ENV: &str = "FLAPPY_LIZARD_CONFIG";
const LOG_ENV: &str = "FLAPPY_LIZARD_LOG";

// ── App ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    /// No valid config fits the terminal; waits for a resize.
    TooSmall,
    Ready,
    Playing,
    Paused,
    Dead,
}

/// Config and session for the current terminal size.
struct Round {
    config: GameConfig,
    session: GameSession<StdRng>,
}

struct App {
    art: Art,
    audio: Option<Audio>,
    overrides: TuningOverrides,
    // None exactly when the screen is TooSmall.
    round: Option<Round>,
    screen: Screen,
    best: u32,
    // Drives the title bob and the backdrop; runs on every screen but Paused.
    clock_ms: f64,
    backdrop_x: f64,
}

impl App {
    fn new(pw: usize, ph: usize, art: Art, audio: Option<Audio>, overrides: TuningOverrides) -> Result<Self> {
        let mut app = Self {
            art,
            audio,
            overrides,
            round: None,
            screen: Screen::TooSmall,
            best: 0,
            clock_ms: 0.0,
            backdrop_x: 0.0,
        };
        app.resize(pw, ph)?;
        Ok(app)
    }

    fn restart(&mut self) -> Result<()> {
        if let Some(round) = &mut self.round {
            round.session = new_session(&round.config, &self.art)?;
            self.screen = Screen::Ready;
        }
        Ok(())
    }

    /// Starts a fresh round at the new size, or parks on the too-small
    /// screen. The best score survives either way.
    fn resize(&mut self, pw: usize, ph: usize) -> Result<()> {
        match build_config(pw, ph, &self.overrides) {
            Ok(config) => {
                let session = new_session(&config, &self.art)?;
                self.round = Some(Round { config, session });
                self.screen = Screen::Ready;
            }
            Err(err) => {
                warn!("{err:#}");
                self.round = None;
                self.screen = Screen::TooSmall;
            }
        }
        Ok(())
    }

    fn ascend(&mut self) -> Result<()> {
        match self.screen {
            Screen::Dead => return self.restart(),
            Screen::Paused | Screen::TooSmall => return Ok(()),
            Screen::Ready => self.screen = Screen::Playing,
            Screen::Playing => {}
        }
        if let Some(round) = &mut self.round {
            round.session.ascend();
        }
        if let Some(audio) = &self.audio {
            audio.ascend();
        }
        Ok(())
    }

    fn toggle_pause(&mut self) {
        self.screen = match self.screen {
            Screen::Playing => Screen::Paused,
            Screen::Paused => Screen::Playing,
            other => other,
        };
    }

    fn update(&mut self, elapsed_ms: f64) -> Result<()> {
        if self.screen == Screen::Paused {
            return Ok(());
        }
        self.clock_ms += elapsed_ms;
        let Some(round) = &mut self.round else {
            return Ok(());
        };

        match self.screen {
            Screen::Ready => self.backdrop_x += round.config.animation_speed * 0.3 * elapsed_ms,
            Screen::Playing => {
                self.backdrop_x += round.config.animation_speed * elapsed_ms;
                match round.session.step(elapsed_ms)? {
                    StepOutcome::Running { scored: 0 } => {}
                    StepOutcome::Running { .. } => {
                        if let Some(audio) = &self.audio {
                            audio.score();
                        }
                    }
                    outcome => {
                        let score = round.session.score();
                        self.best = self.best.max(score);
                        self.screen = Screen::Dead;
                        info!("{outcome:?}: score {score}, best {}", self.best);
                        if let Some(audio) = &self.audio {
                            audio.crash();
                        }
                    }
                }
            }
            Screen::TooSmall | Screen::Paused | Screen::Dead => {}
        }
        Ok(())
    }

    fn draw(&self, buf: &mut PixelBuf) {
        let Some(round) = &self.round else {
            render::draw_too_small(buf);
            return;
        };
        let session = &round.session;
        let flight = session.flight();
        let flight_y = match self.screen {
            Screen::Ready => {
                let bob = (self.clock_ms * 0.005).sin() * 2.0;
                round.config.start_y() + bob
            }
            _ => flight.y(),
        };
        let overlay = match self.screen {
            Screen::Ready => Overlay::Title,
            Screen::Playing | Screen::TooSmall => Overlay::None,
            Screen::Paused => Overlay::Paused,
            Screen::Dead => Overlay::GameOver {
                score: session.score(),
                best: self.best,
            },
        };
        let scene = Scene {
            flight,
            flight_y,
            pairs: session.stream().visible_pairs().collect(),
            piece_height: round.config.piece_height,
            backdrop_x: self.backdrop_x,
            score: session.score(),
            overlay,
        };
        render::draw(buf, &self.art, scene);
    }
}

fn build_config(pw: usize, ph: usize, overrides: &TuningOverrides) -> Result<GameConfig> {
    let base = GameConfig::for_terminal(pw, ph, LIZARD_SIZE, CACTUS_WIDTH, PIECE_HEIGHT);
    overrides
        .apply(&base)
        .with_context(|| format!("terminal of {pw}x{ph} pixels cannot host the game"))
}

fn new_session(config: &GameConfig, art: &Art) -> Result<GameSession<StdRng>> {
    let session = GameSession::new(
        config,
        StdRng::from_entropy(),
        &art.flight_sprites(),
        &art.cactus_tip,
        &art.cactus_body,
    )?;
    Ok(session)
}

// ── Bootstrapping ───────────────────────────────────────────────────────────

/// Logs go to a file only; the terminal is owned by the game.
fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_overrides() -> Result<TuningOverrides> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(TuningOverrides::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let overrides =
        TuningOverrides::from_json(&text).with_context(|| format!("parsing {path}"))?;
    info!("loaded tuning overrides from {path}: {overrides:?}");
    Ok(overrides)
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging()?;
    let overrides = load_overrides()?;
    let art = Art::load().context("building sprites")?;

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let result = run(&mut out, art, overrides);

    execute!(
        out,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;

    if let Ok(score) = &result {
        println!("Thanks for playing! Best score: {score}");
    }
    result.map(|_| ())
}

/// Frame loop. Returns the best score of the run.
fn run(out: &mut io::Stdout, art: Art, overrides: TuningOverrides) -> Result<u32> {
    let (cols, rows) = terminal::size()?;
    let pw = cols as usize;
    let ph = rows as usize * 2;

    let mut buf = PixelBuf::new(pw, ph);
    let mut app = App::new(pw, ph, art, Audio::open(), overrides)?;
    info!("started at {pw}x{ph} pixels");

    let frame_dur = Duration::from_millis(16); // ~60 fps
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(app.best),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => app.ascend()?,
                    KeyCode::Char('p') | KeyCode::Pause => app.toggle_pause(),
                    _ => {}
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Up(_)) => {
                    app.ascend()?
                }
                Event::Resize(c, r) => {
                    let npw = c as usize;
                    let nph = r as usize * 2;
                    buf.resize(npw, nph);
                    app.resize(npw, nph)?;
                }
                _ => {}
            }
        }

        // Update
        let elapsed_ms = last.elapsed().as_secs_f64() * 1000.0;
        last = Instant::now();
        app.update(elapsed_ms)?;

        // Render
        app.draw(&mut buf);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
