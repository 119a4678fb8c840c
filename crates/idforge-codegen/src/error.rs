//! Error types for declaration synthesis

use thiserror::Error;

use crate::syntax::{Position, TypeKind};

/// Errors that can occur while loading templates or synthesizing declarations
#[derive(Debug, Error)]
pub enum CodegenError {
    /// No template resource matches the requested name
    #[error("Template not found: '{name}' (searched {searched})")]
    TemplateNotFound {
        /// Logical template name
        name: String,
        /// Description of the locations that were searched
        searched: String,
    },

    /// A template placeholder has no usable value in the template data
    #[error("Unable to resolve template key '{key}' in {placeholder}")]
    UnresolvedPlaceholder {
        /// Key captured from the placeholder
        key: String,
        /// The full placeholder text as it appears in the template
        placeholder: String,
    },

    /// The parsed template does not declare the requested kind of member
    #[error("Template '{template}' does not represent a {kind} declaration")]
    TemplateShapeMismatch {
        /// Logical template name
        template: String,
        /// The declaration kind that was requested
        kind: TypeKind,
    },

    /// A required constructor input was missing or empty
    #[error("Invalid argument '{parameter}': {message}")]
    InvalidArgument {
        /// Name of the offending parameter
        parameter: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Source text could not be parsed into declarations
    #[error("Syntax error at {position}: {message}")]
    Syntax {
        /// Where the error was detected
        position: Position,
        /// Error message
        message: String,
    },

    /// A template merged cleanly but is not valid source
    #[error("Template '{template}' is not valid source at {position}: {message}")]
    InvalidTemplate {
        /// Logical template name
        template: String,
        /// Where the parser stopped
        position: Position,
        /// Parser message
        message: String,
    },

    /// IO error while reading a template
    #[error("IO error reading template '{name}': {source}")]
    Io {
        /// Logical template name
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Shorthand for an [`CodegenError::InvalidArgument`] with a "must not be empty" message
    pub fn empty_argument(parameter: &'static str) -> Self {
        CodegenError::InvalidArgument {
            parameter,
            message: "value must not be empty".to_string(),
        }
    }

    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        CodegenError::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, CodegenError>;
