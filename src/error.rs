//! Error types for the arcade core.
//!
//! The simulation itself has no failure modes; errors come from the edges:
//! writing frames to the terminal, reading the TOML config, and rejecting
//! config values the simulation cannot run with.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// Terminal or log-file I/O failed.
    Io(io::Error),

    /// The config file could not be read.
    ConfigRead {
        path: PathBuf,
        source: io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::GameConfig`].
    ConfigParse {
        path: PathBuf,
        message: String,
    },

    /// A config value is outside the range the simulation supports.
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io(err) => write!(f, "i/o error: {}", err),
            GameError::ConfigRead { path, source } => {
                write!(f, "cannot read config '{}': {}", path.display(), source)
            }
            GameError::ConfigParse { path, message } => {
                write!(f, "invalid config '{}': {}", path.display(), message)
            }
            GameError::InvalidConfig { field, reason } => {
                write!(f, "config field '{}' {}", field, reason)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(err) => Some(err),
            GameError::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(err: io::Error) -> Self {
        GameError::Io(err)
    }
}

pub type GameResult<T> = Result<T, GameError>;
