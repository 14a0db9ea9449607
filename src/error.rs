//! Error types for the consultation service.

use crate::consultation::graph::EventKind;
use crate::consultation::model::{ProjectType, Step};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Why an event was refused. The session it was applied to is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Event {event} is not legal at step {step} (project: {project:?})")]
    InvalidTransition {
        step: Step,
        project: Option<ProjectType>,
        event: EventKind,
    },

    #[error("Unrecognized {field} '{value}' (project: {project:?})")]
    UnrecognizedOption {
        field: &'static str,
        value: String,
        project: Option<ProjectType>,
        /// Reply to show instead of failing the flow.
        acknowledgement: String,
    },
}

impl TransitionError {
    /// Whether the event was off the step graph.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Fallback reply for unrecognized answers.
    pub fn acknowledgement(&self) -> Option<&str> {
        match self {
            Self::UnrecognizedOption {
                acknowledgement, ..
            } => Some(acknowledgement),
            Self::InvalidTransition { .. } => None,
        }
    }
}

/// Quantity calculation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("Unsupported number of paint layers: {0} (expected 1 to 3)")]
    UnsupportedLayers(u8),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_step_and_event() {
        let err = TransitionError::InvalidTransition {
            step: Step::Intro,
            project: None,
            event: EventKind::SubmitTools,
        };
        let msg = err.to_string();
        assert!(msg.contains("submit_tools"));
        assert!(msg.contains("intro"));
        assert!(err.is_invalid_transition());
        assert!(err.acknowledgement().is_none());
    }

    #[test]
    fn unrecognized_option_carries_acknowledgement() {
        let err = TransitionError::UnrecognizedOption {
            field: "diagnosis",
            value: "rotten".into(),
            project: Some(ProjectType::Flooring),
            acknowledgement: "Understood.".into(),
        };
        assert_eq!(err.acknowledgement(), Some("Understood."));
        assert!(!err.is_invalid_transition());
    }

    #[test]
    fn top_level_wraps_config_error() {
        let err: Error = ConfigError::InvalidValue {
            key: "RENO_CONSULT_PORT".into(),
            message: "'eighty': invalid digit found in string".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
        assert!(err.to_string().contains("RENO_CONSULT_PORT"));
    }
}
