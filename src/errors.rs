/*!
 * Error types for the chapterize application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the analysis/transcription provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The model returned an empty candidate list
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur during the transcription workflow.
///
/// Poll-timeout, processing-failure and cancellation are deliberately
/// distinct variants: the caller suppresses error messaging for an explicit
/// cancel and words the other two differently.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Uploaded file never reached the ACTIVE state within the poll budget
    #[error("File processing timed out after {attempts} status checks")]
    PollTimeout {
        /// Number of status checks performed
        attempts: u32,
    },

    /// The provider reported the uploaded file as FAILED
    #[error("File processing failed on the provider side")]
    ProcessingFailed,

    /// A local subprocess exited with a non-zero status
    #[error("{program} exited with an error: {stderr}")]
    SubprocessFailed {
        /// Program name
        program: String,
        /// Captured stderr
        stderr: String,
    },

    /// The operation was cancelled by the user
    #[error("Transcription was cancelled")]
    Cancelled,

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),
}

impl TranscriptionError {
    /// Whether this error is an explicit user cancellation rather than a
    /// genuine failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TranscriptionError::Cancelled)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<std::io::Error> for TranscriptionError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
