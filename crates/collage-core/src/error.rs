//! Crate-level error type.
//!
//! Each stage has its own error enum; `CollageError` folds them into the
//! categories a caller reports on. Every variant is terminal for the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::layout::LayoutError;
use crate::select::SelectError;

#[derive(Debug, Error)]
pub enum CollageError {
    /// Non-positive grid parameters, an oversized canvas, or a zero-sized image.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source directory is missing.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The source directory could not be listed.
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate file is not a decodable image.
    #[error("Failed to decode {}", .path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// Nothing in the source directory survived selection.
    #[error("No usable images in {}", .0.display())]
    NoImages(PathBuf),

    /// The canvas could not be encoded.
    #[error("Failed to encode collage")]
    EncodeFailure(#[from] EncodeError),

    /// The encoded collage could not be written to its output path.
    #[error("Failed to write {}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<LayoutError> for CollageError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidArgument(message) => CollageError::InvalidArgument(message),
        }
    }
}

impl From<SelectError> for CollageError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::DirectoryNotFound(path) => CollageError::DirectoryNotFound(path),
            SelectError::Io { path, source } => CollageError::Io { path, source },
            SelectError::Decode { path, source } => CollageError::DecodeFailure { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_maps_to_invalid_argument() {
        let err: CollageError = LayoutError::InvalidArgument("columns".to_string()).into();
        assert!(matches!(err, CollageError::InvalidArgument(ref m) if m == "columns"));
        assert_eq!(err.to_string(), "Invalid argument: columns");
    }

    #[test]
    fn test_select_errors_map_by_kind() {
        let err: CollageError = SelectError::DirectoryNotFound(PathBuf::from("/photos")).into();
        assert!(matches!(err, CollageError::DirectoryNotFound(_)));
        assert_eq!(err.to_string(), "Directory not found: /photos");

        let err: CollageError = SelectError::Decode {
            path: PathBuf::from("bad.jpg"),
            source: DecodeError::InvalidFormat,
        }
        .into();
        assert_eq!(err.to_string(), "Failed to decode bad.jpg");
    }

    #[test]
    fn test_display_leaves_cause_to_source_chain() {
        use std::error::Error as _;

        let err: CollageError = EncodeError::InvalidDimensions {
            width: 1024,
            height: 0,
        }
        .into();
        assert_eq!(err.to_string(), "Failed to encode collage");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("Invalid dimensions: width (1024) and height (0) must be non-zero")
        );

        let err = CollageError::WriteFailure {
            path: PathBuf::from("out.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write out.png");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("denied"));
    }

    #[test]
    fn test_no_images_display() {
        let err = CollageError::NoImages(PathBuf::from("/photos"));
        assert_eq!(err.to_string(), "No usable images in /photos");
    }

    #[test]
    fn test_encode_error_converts() {
        let err: CollageError = EncodeError::InvalidDimensions {
            width: 1024,
            height: 0,
        }
        .into();
        assert!(matches!(err, CollageError::EncodeFailure(_)));
    }
}
