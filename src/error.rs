//! Unified error types for tgpress.
//!
//! This module provides a single [`PressError`] enum that covers every error
//! the library surfaces to its callers.
//!
//! # Error Handling Philosophy
//!
//! - **Input-validation errors** (unknown channel, chunk index out of range,
//!   unknown page size) are returned as typed variants you can match on
//! - **Data-integrity gaps** (a post vanished, an image is missing on disk)
//!   are *not* errors: they are logged and the item is skipped
//! - **IO errors during save** propagate after the scratch directory is removed

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for tgpress operations.
///
/// # Example
///
/// ```rust
/// use tgpress::error::Result;
/// use tgpress::Post;
///
/// fn my_function() -> Result<Vec<Post>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, PressError>;

/// The error type for all tgpress operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PressError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The archive or layout file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the IDML package)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// Raised when an archive, a frozen layout or a config file is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP packaging error while writing an IDML file.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested channel does not exist in the repository.
    #[error("Channel '{channel_id}' not found")]
    ChannelNotFound {
        /// The channel identifier that was looked up
        channel_id: String,
    },

    /// The requested chunk index is out of range.
    #[error("Chunk {index} not found. Total chunks: {total}")]
    ChunkNotFound {
        /// The requested index
        index: usize,
        /// Number of chunks the channel actually has
        total: usize,
    },

    /// The print settings reference a page size missing from the table.
    #[error("Unknown page size '{name}'. Known sizes: {known}")]
    UnknownPageSize {
        /// The page size name from the print settings
        name: String,
        /// Comma-separated list of configured names
        known: String,
    },

    /// An output format name or file extension was not recognized.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What kind of format was expected (e.g., "output")
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A frozen layout document failed validation.
    #[error("Invalid layout{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    InvalidLayout {
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A document builder operation was called out of order.
    #[error("Cannot {operation} while the document is {state}")]
    InvalidState {
        /// The operation that was attempted
        operation: &'static str,
        /// The builder state at the time of the call
        state: &'static str,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl PressError {
    /// Creates a channel-not-found error.
    pub fn channel_not_found(channel_id: impl Into<String>) -> Self {
        PressError::ChannelNotFound {
            channel_id: channel_id.into(),
        }
    }

    /// Creates a chunk-not-found error.
    pub fn chunk_not_found(index: usize, total: usize) -> Self {
        PressError::ChunkNotFound { index, total }
    }

    /// Creates an invalid layout error.
    pub fn invalid_layout(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        PressError::InvalidLayout {
            message: message.into(),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        PressError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid state error.
    pub fn invalid_state(operation: &'static str, state: &'static str) -> Self {
        PressError::InvalidState { operation, state }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, PressError::Io(_))
    }

    /// Returns `true` if this error means something was not found.
    ///
    /// Callers exposing an API map these to a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PressError::ChannelNotFound { .. } | PressError::ChunkNotFound { .. }
        )
    }

    /// Returns `true` if this is a layout validation error.
    pub fn is_invalid_layout(&self) -> bool {
        matches!(self, PressError::InvalidLayout { .. })
    }
}
