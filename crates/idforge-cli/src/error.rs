// CLI error types and user-facing messages

use std::path::PathBuf;

use idforge_entity_id::EntityIdError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'idforge --help' for usage information.",
                    message
                )
            }
            CliError::Io { path, source } => {
                format!("File operation failed on {}: {}", path.display(), source)
            }
            CliError::Parse { path, message } => {
                format!("Could not read declarations from {}: {}", path.display(), message)
            }
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nRun 'idforge config' to check your configuration.",
                    msg
                )
            }
            CliError::Generation(msg) => {
                format!("Entity ID generation failed: {}", msg)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    /// User message, followed by the technical details in verbose mode
    pub fn report(&self, verbose: bool) -> String {
        if verbose {
            format!("{}\n\nDetails: {}", self.user_message(), self.technical_details())
        } else {
            self.user_message()
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<EntityIdError> for CliError {
    fn from(err: EntityIdError) -> Self {
        match err {
            EntityIdError::Config(msg) => CliError::Config(msg),
            other => CliError::Generation(other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
