//! Error kinds surfaced by the tutoring core.

/// A specialized `Result` type for tutoring operations.
pub type Result<T> = std::result::Result<T, TutorError>;

/// Failures that callers of the learning flow can observe.
///
/// `MalformedGenerationOutput` never leaves the gateway: quiz generation
/// recovers from it by retrying and then falling back to a fixed question.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Topic required")]
    TopicRequired,
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),
    #[error("Malformed generation output: {0}")]
    MalformedGenerationOutput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(TutorError::TopicRequired.to_string(), "Topic required");
        assert_eq!(
            TutorError::GenerationUnavailable("timed out".into()).to_string(),
            "Generation unavailable: timed out"
        );
    }
}
