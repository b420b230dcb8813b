/*!
 * Error types for the mdxlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
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

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The workflow run produced no output within the poll budget
    #[error("Workflow produced no output after {polls} polls")]
    PollBudgetExceeded {
        /// Number of polls performed
        polls: u32,
    },

    /// The configured response selector matched no output node
    #[error("No output node matched response selector '{selector}'")]
    MissingOutputNode {
        /// Configured output node identifier
        selector: String,
    },
}

/// Errors raised when the translated document structure no longer matches the source
#[derive(Error, Debug)]
pub enum StructureError {
    /// The translated body contains fewer headings than the source recorded
    #[error(
        "Heading count mismatch at index {index}: source recorded level {expected_level} \
         heading '{anchor}' but the translated document has only {found} heading(s)"
    )]
    HeadingCountMismatch {
        /// Index of the first missing heading
        index: usize,
        /// Level recorded from the source heading
        expected_level: u8,
        /// Anchor slug recorded from the source heading
        anchor: String,
        /// Number of headings found in the translated body
        found: usize,
    },

    /// The translated heading at some index has a different level than the source
    #[error(
        "Heading level drift at index {index}: source level {expected_level} ('{anchor}'), \
         translated level {found_level} ('{excerpt}')"
    )]
    HeadingLevelMismatch {
        /// Index of the drifted heading
        index: usize,
        /// Level recorded from the source heading
        expected_level: u8,
        /// Anchor slug recorded from the source heading
        anchor: String,
        /// Level found in the translated body
        found_level: u8,
        /// Text excerpt of the translated heading
        excerpt: String,
    },
}

/// Errors that can occur during segmentation
#[derive(Error, Debug)]
pub enum SegmentError {
    /// A segment exceeds the token ceiling and the oversize policy is Fail
    #[error("Segment of {tokens} tokens exceeds ceiling of {ceiling}: {excerpt}...")]
    Oversize {
        /// Token count of the segment
        tokens: usize,
        /// Configured token ceiling
        ceiling: usize,
        /// Leading excerpt of the segment content
        excerpt: String,
    },

    /// Rendering a block back to Markdown failed
    #[error("Markdown render failed: {0}")]
    Render(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider kept failing after the bounded retry budget
    #[error("Translation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the last provider error
        last_error: String,
    },

    /// Structural mismatch between source and translated document
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from segmentation
    #[error("Segment error: {0}")]
    Segment(#[from] SegmentError),

    /// Error from document structure verification
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

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
