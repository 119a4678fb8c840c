//! Error types for entity ID synthesis

use idforge_codegen::CodegenError;
use thiserror::Error;

use crate::backing::BackingKind;

/// Result type for entity ID synthesis
pub type Result<T> = std::result::Result<T, EntityIdError>;

/// Errors raised while configuring or running entity ID synthesis
#[derive(Debug, Error)]
pub enum EntityIdError {
    /// Template, placeholder, shape or builder failure
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("The backing type {kind} is not supported for entity ID generation")]
    UnsupportedBackingKind { kind: BackingKind },

    #[error("Invalid argument '{parameter}': {message}")]
    InvalidArgument {
        parameter: &'static str,
        message: String,
    },

    /// A marker argument carries a value of the wrong shape
    #[error("Invalid marker argument {argument} = {value}: {message}")]
    InvalidMarker {
        argument: String,
        value: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure while synthesizing one marked declaration
    #[error("Failed to generate entity ID '{subject}': {source}")]
    Subject {
        subject: String,
        #[source]
        source: Box<EntityIdError>,
    },
}

impl EntityIdError {
    /// Attach the subject name to an error
    pub fn for_subject(subject: impl Into<String>, source: EntityIdError) -> Self {
        EntityIdError::Subject {
            subject: subject.into(),
            source: Box::new(source),
        }
    }

    /// The underlying error with any subject context removed
    pub fn root(&self) -> &EntityIdError {
        match self {
            EntityIdError::Subject { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<config::ConfigError> for EntityIdError {
    fn from(err: config::ConfigError) -> Self {
        EntityIdError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for EntityIdError {
    fn from(err: toml::ser::Error) -> Self {
        EntityIdError::Config(err.to_string())
    }
}
