//! Common error type and result alias.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Prompt source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Prompt ID '{0}' not found")]
    PromptNotFound(String),

    #[error("No prompt provided")]
    NoPrompt,

    #[error("Generation API returned no candidates (block reason: {})", .block_reason.as_deref().unwrap_or("none"))]
    NoCandidates { block_reason: Option<String> },

    #[error("Generation API did not return an image (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    NoImageInResponse { finish_reason: Option<String> },

    #[error("Generation transport error: {0}")]
    Transport(String),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// True for the kinds a generation attempt can end in.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            AppError::NoPrompt
                | AppError::NoCandidates { .. }
                | AppError::NoImageInResponse { .. }
                | AppError::Transport(_)
        )
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::SourceUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::Transport(format!("image decode failed: {}", e))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_kinds_are_grouped() {
        assert!(AppError::NoPrompt.is_generation_failure());
        assert!(AppError::NoCandidates { block_reason: None }.is_generation_failure());
        assert!(AppError::Transport("boom".into()).is_generation_failure());
        assert!(!AppError::PromptNotFound("7".into()).is_generation_failure());
        assert!(!AppError::SourceUnavailable("gone".into()).is_generation_failure());
    }

    #[test]
    fn display_includes_reasons() {
        let e = AppError::NoCandidates { block_reason: Some("SAFETY".into()) };
        assert!(e.to_string().contains("SAFETY"));
        let e = AppError::NoImageInResponse { finish_reason: None };
        assert!(e.to_string().contains("unknown"));
    }
}
