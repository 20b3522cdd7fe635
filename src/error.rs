//! Error handling for section generation and storage
//!
//! One typed error enum covers the whole pipeline. Failures inside a
//! generation run are wrapped at the orchestration boundary into
//! [`SectionsError::Generation`], which keeps the original cause for both
//! the caller-visible message and test assertions.

use thiserror::Error;

/// Main error type for the section generation service.
#[derive(Error, Debug)]
pub enum SectionsError {
    /// The model credential is not configured. Raised before any network
    /// activity and mapped to a client error at the boundary.
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,

    /// The model call succeeded transport-wise but carried no usable text.
    #[error("AI returned no response")]
    EmptyCompletion,

    /// The model replied with a non-success HTTP status.
    #[error("model API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// One or more expected sections could not be located in the reply.
    #[error("missing sections: {}", .missing.join(", "))]
    MissingSections { missing: Vec<String> },

    /// Malformed or missing required fields in a request.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport-level failure talking to the model provider.
    #[error("model transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Persistence-layer failure.
    #[error("storage error: {0}")]
    Store(#[from] sqlx::Error),

    /// Orchestration-boundary wrapper: any failure during a generation run,
    /// re-raised with the original cause preserved.
    #[error("failed to generate sections: {0}")]
    Generation(#[source] Box<SectionsError>),
}

impl SectionsError {
    /// Whether the failure is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::Validation(_))
    }

    /// The underlying failure, unwrapping the generation wrapper if present.
    pub fn root_cause(&self) -> &SectionsError {
        match self {
            Self::Generation(inner) => inner.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_message_lists_names() {
        let err = SectionsError::MissingSections {
            missing: vec!["Hero".to_string(), "Contact".to_string()],
        };
        assert_eq!(err.to_string(), "missing sections: Hero, Contact");
    }

    #[test]
    fn test_generation_wrapper_keeps_cause_text() {
        let err = SectionsError::Generation(Box::new(SectionsError::EmptyCompletion));
        assert_eq!(
            err.to_string(),
            "failed to generate sections: AI returned no response"
        );
        assert!(matches!(
            err.root_cause(),
            SectionsError::EmptyCompletion
        ));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(SectionsError::MissingApiKey.is_client_error());
        assert!(SectionsError::Validation("bad".to_string()).is_client_error());
        assert!(!SectionsError::EmptyCompletion.is_client_error());
        assert!(
            !SectionsError::Generation(Box::new(SectionsError::EmptyCompletion)).is_client_error()
        );
    }
}
