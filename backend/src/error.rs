//! Error types for the burden engine.
//!
//! Expected empty outcomes (no suggestions, no hotspots, unmatched targets)
//! are never errors. Errors are reserved for rejected input and bad
//! configuration.

use std::fmt;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Where an engine error arose.
///
/// Renders as a parenthesized suffix, or as nothing when empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Engine step that failed, such as `load_config` or `validate_schedule`.
    pub stage: Option<&'static str>,
    /// Config key, protocol name or file path the failure is about.
    pub subject: Option<String>,
    /// Position inside the input, e.g. `line 3, column 7`.
    pub location: Option<String>,
}

impl ErrorContext {
    pub fn at(stage: &'static str) -> Self {
        Self {
            stage: Some(stage),
            ..Default::default()
        }
    }

    pub fn about(mut self, subject: impl fmt::Display) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn located(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stage.is_none() && self.subject.is_none() && self.location.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let parts: Vec<String> = self
            .stage
            .map(|stage| format!("in {}", stage))
            .into_iter()
            .chain(self.subject.clone())
            .chain(self.location.clone())
            .collect();
        write!(f, " ({})", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Schedule failed structural validation and must not reach the engine.
    #[error("Validation error: {message}{context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Engine configuration is unreadable or inconsistent.
    #[error("Configuration error: {message}{context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Input could not be parsed into the schedule model.
    #[error("Parse error: {message}{context}")]
    ParseError {
        message: String,
        context: ErrorContext,
    },
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Attach context, replacing any existing context.
    pub fn with_context(self, context: ErrorContext) -> Self {
        match self {
            Self::ValidationError { message, .. } => Self::ValidationError { message, context },
            Self::ConfigurationError { message, .. } => {
                Self::ConfigurationError { message, context }
            }
            Self::ParseError { message, .. } => Self::ParseError { message, context },
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::ParseError { context, .. } => context,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::ParseError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::parse(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::configuration(format!("Failed to parse config: {}", err))
    }
}
