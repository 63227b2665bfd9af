//! Unified error handling for the route-geometry library.
//!
//! Geometry functions are total over well-formed track data; errors arise
//! only at the file boundary. Each step of the atomic rewrite sequence
//! fails with its own variant so the caller can log exactly which
//! filesystem step went wrong.

use std::fmt;

/// Unified error type for track file operations.
#[derive(Debug, Clone)]
pub enum TrackFileError {
    /// Backing track file missing at a path the caller believed valid.
    /// Checked explicitly before parsing.
    NotFound { path: String },
    /// File exists but is not a structurally valid GPX document.
    Parse { path: String, message: String },
    /// Failed to write the temporary file during an atomic rewrite.
    /// The original file is untouched.
    Write { path: String, message: String },
    /// Failed to delete the original file during an atomic rewrite.
    /// The original file is still in place.
    Delete { path: String, message: String },
    /// Failed to promote the temporary file onto the original path.
    /// The original has already been deleted at this point, so this is
    /// the one failure that can leave no valid file on disk.
    Rename {
        from: String,
        to: String,
        message: String,
    },
}

impl fmt::Display for TrackFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFileError::NotFound { path } => {
                write!(f, "Track file '{}' not found", path)
            }
            TrackFileError::Parse { path, message } => {
                write!(f, "Failed to parse '{}': {}", path, message)
            }
            TrackFileError::Write { path, message } => {
                write!(f, "Failed to write temp file '{}': {}", path, message)
            }
            TrackFileError::Delete { path, message } => {
                write!(f, "Failed to delete existing file '{}': {}", path, message)
            }
            TrackFileError::Rename { from, to, message } => {
                write!(f, "Failed to rename '{}' to '{}': {}", from, to, message)
            }
        }
    }
}

impl std::error::Error for TrackFileError {}

/// Result type alias for track file operations.
pub type Result<T> = std::result::Result<T, TrackFileError>;
