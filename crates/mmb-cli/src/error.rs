use mmbsetup::io::json::{JobParseError, JobWriteError};
use mmbsetup::io::script::ScriptError;
use mmbsetup::store::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Job is invalid: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Failed to parse job file '{path}': {source}", path = path.display())]
    JobParsing {
        path: PathBuf,
        #[source]
        source: JobParseError,
    },

    #[error(transparent)]
    JobWriting(#[from] JobWriteError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
