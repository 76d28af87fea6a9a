//! Error types for translation, rendering, formats and builds

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Errors raised while translating one source document.
///
/// None of these affect other documents of the same build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    /// The nesting stack did not unwind to the root frame.
    #[error("nesting stack of '{document}' left {remaining} open frame(s) after the walk")]
    UnbalancedStack { document: String, remaining: usize },
    /// Every handler in the dispatch chain passed.
    #[error("no handler accepted '{kind}' node at {location}")]
    Unhandled { kind: String, location: String },
    /// A handler needs an attribute the node does not carry.
    #[error("'{kind}' node at {location} is missing required attribute '{attribute}'")]
    MissingAttribute {
        kind: String,
        attribute: String,
        location: String,
    },
}

impl TranslateError {
    /// Internal consistency failures, as opposed to problems with the input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TranslateError::UnbalancedStack { .. } | TranslateError::Unhandled { .. }
        )
    }
}

/// Errors reported by an [`HtmlToTree`](crate::formats::html::HtmlToTree) renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The fragment is not well-formed HTML.
    #[error("malformed HTML: {0}")]
    Malformed(String),
    /// The renderer cannot serve requests at all.
    #[error("HTML renderer unavailable: {0}")]
    Unavailable(String),
}

/// Why a single document of a build produced no output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Build-level failures; any of these aborts the whole build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("renderer check failed: {0}")]
    Renderer(#[from] RenderError),
    #[error("invalid document bundle: {0}")]
    Bundle(#[from] serde_json::Error),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_yaml_ng::Error),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
