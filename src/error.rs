use std::path::PathBuf;

use crate::helpers::docker_image::ImageError;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BuildContextError — everything that can go wrong building a context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, thiserror::Error)]
pub enum BuildContextError {
    // Validation errors
    #[error("Invalid Build context, an image or path to dockerfile is required.")]
    MissingImageSource,
    #[error(transparent)]
    InvalidImage(#[from] ImageError),

    // Reference errors
    #[error("Unresolved reference: {{{{ {expression} }}}}")]
    UnresolvedReference { expression: String },
    #[error("Reference {{{{ {expression} }}}} resolved to an invalid value: {reason}")]
    InvalidReferenceValue { expression: String, reason: String },

    // Loading errors
    #[error("Build context file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },
    #[error("Failed to parse build context at `{path}`: {message}")]
    Parse { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for BuildContextError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse {
            path: ".".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BuildContextError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            path: ".".to_string(),
            message: err.to_string(),
        }
    }
}

impl<E: std::fmt::Display> From<serde_path_to_error::Error<E>> for BuildContextError {
    fn from(err: serde_path_to_error::Error<E>) -> Self {
        Self::Parse {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}
