//! Error types for copydeck operations.
//!
//! This module defines the main error type [`CopydeckError`] which represents
//! all possible errors that can occur while parsing documents, rewriting
//! preview output, and writing files.
//!
//! # Example
//!
//! ```rust
//! use copydeck_core::{CopydeckError, Result};
//!
//! fn check_input(html: &str) -> Result<()> {
//!     if html.is_empty() {
//!         return Err(CopydeckError::HtmlParse("empty input".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for content-field extraction and editing.
///
/// Note that an extraction that finds zero editable fields is *not* an
/// error: it is reported as an empty group list so callers can show
/// guidance instead of a failure message.
#[derive(Error, Debug)]
pub enum CopydeckError {
    /// HTML parsing errors.
    ///
    /// Returned when the document tree cannot be built or a CSS selector
    /// is invalid.
    #[error("Failed to parse HTML: {0}")]
    HtmlParse(String),

    /// Streaming rewrite errors.
    ///
    /// Returned when the preview rewriter fails while injecting the
    /// sandbox policy into the output document.
    #[error("Failed to rewrite HTML: {0}")]
    Rewrite(String),

    /// File write errors.
    ///
    /// Wraps standard I/O errors for file operations.
    #[error("Failed to write to file: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type alias for CopydeckError.
///
/// This is a convenience alias for `std::result::Result<T, CopydeckError>`.
pub type Result<T> = std::result::Result<T, CopydeckError>;
