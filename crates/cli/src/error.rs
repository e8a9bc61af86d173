//! Errors reported by the CLI, each with its own exit code.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: sketch error (unknown sketch, bad dimensions)
//! - 11: file error (snapshot write, seed record read/write)
//! - 12: input error (bad `--params` JSON, malformed seed record)
//! - 13: JSON output could not be serialized

use huahua_core::SketchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sketch(SketchError),

    #[error("cannot write snapshot {}: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },

    #[error("cannot {action} seed record {}: {source}", path.display())]
    SeedFile {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid --params JSON: {0}")]
    Params(#[source] serde_json::Error),

    #[error("invalid seed record: {0}")]
    InvalidSeed(String),

    #[error("cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sketch(_) => 10,
            CliError::Snapshot { .. } | CliError::SeedFile { .. } => 11,
            CliError::Params(_) | CliError::InvalidSeed(_) => 12,
            CliError::Output(_) => 13,
        }
    }

    pub fn seed_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::SeedFile { action: "read", path: path.into(), source }
    }

    pub fn seed_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::SeedFile { action: "write", path: path.into(), source }
    }

    /// Snapshot failures keep the output path; anything else is a sketch error.
    pub fn snapshot(path: impl Into<PathBuf>, err: SketchError) -> Self {
        match err {
            SketchError::Io(message) => CliError::Snapshot { path: path.into(), message },
            other => CliError::from(other),
        }
    }
}

impl From<SketchError> for CliError {
    fn from(e: SketchError) -> Self {
        match e {
            SketchError::InvalidSeed(msg) => CliError::InvalidSeed(msg),
            other => CliError::Sketch(other),
        }
    }
}
