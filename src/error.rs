use std::fmt;

/// Misuse of the simulation core. Game over is not an error; see
/// [`crate::StepOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Elapsed frame time was negative, NaN or infinite.
    InvalidElapsed(f64),
    /// A tunable failed validation.
    InvalidConfig(String),
    /// A sprite with no pixels was supplied.
    EmptySprite,
    /// A sprite does not match the dimensions the config promises.
    SpriteSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidElapsed(ms) => write!(f, "invalid elapsed frame time: {ms} ms"),
            CoreError::InvalidConfig(msg) => write!(f, "invalid game config: {msg}"),
            CoreError::EmptySprite => write!(f, "sprite has no pixels"),
            CoreError::SpriteSize { expected, actual } => write!(
                f,
                "sprite is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for CoreError {}
