//! Output paths, cross-document links and static assets
//!
//! [`Pathfinder`] is a pure function of its configuration: it maps document ids to output
//! files and rewrites links between documents. [`StaticFiles`] is the build-scoped asset
//! map; it is the only stateful piece and is shared between translations behind a lock.

mod assets;
mod util;

pub use assets::{CopyFailure, StaticFiles};

use std::path::{Path, PathBuf};
use url::{ParseError, Url};

/// Output naming options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOptions {
    /// Appended to every document id, e.g. `.mdx`.
    pub suffix: String,
    /// Directory under the output root that receives copied assets.
    pub assets_dir: String,
    /// Lowercase document paths.
    pub lowercase: bool,
    /// Removed from the front of document ids.
    pub strip_prefix: String,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            suffix: ".mdx".to_string(),
            assets_dir: "_assets".to_string(),
            lowercase: false,
            strip_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pathfinder {
    source_root: PathBuf,
    output_root: PathBuf,
    options: PathOptions,
}

impl Pathfinder {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            options: PathOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    pub fn assets_root(&self) -> PathBuf {
        self.output_root.join(&self.options.assets_dir)
    }

    /// Output file of `doc_id`, relative to the output root, with forward slashes.
    ///
    /// The suffix is appended, never substituted: `api/v1.2` becomes `api/v1.2.mdx`.
    pub fn relative_output_path(&self, doc_id: &str) -> String {
        let id = doc_id
            .strip_prefix(self.options.strip_prefix.as_str())
            .unwrap_or(doc_id)
            .trim_start_matches('/');
        let id = if self.options.lowercase {
            id.to_lowercase()
        } else {
            id.to_string()
        };
        format!("{id}{}", self.options.suffix)
    }

    pub fn output_path(&self, doc_id: &str) -> PathBuf {
        self.output_root.join(self.relative_output_path(doc_id))
    }

    /// Directory holding the source of `doc_id`.
    ///
    /// Uses the declared source file when there is one, else the id itself.
    pub fn source_dir(&self, doc_id: &str, source: Option<&Path>) -> PathBuf {
        let relative = source
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(doc_id));
        match relative.parent() {
            Some(parent) => self.source_root.join(parent),
            None => self.source_root.clone(),
        }
    }

    /// Appends the output suffix to the path part of an internal reference.
    ///
    /// Fragments and queries are kept as they are; a reference made of a fragment only
    /// is returned untouched.
    pub fn rewrite_cross_document_link(&self, reference: &str) -> String {
        let split = reference.find(['#', '?']).unwrap_or(reference.len());
        let (path, rest) = reference.split_at(split);
        if path.is_empty() {
            return reference.to_string();
        }
        let path = if self.options.lowercase {
            path.to_lowercase()
        } else {
            path.to_string()
        };
        format!("{path}{}{rest}", self.options.suffix)
    }
}

/// Resolves an internal reference found in `doc_id` to the document id it points at.
///
/// `resolve_reference("guide/intro", "../api/index#top")` is `api/index`.
pub fn resolve_reference(doc_id: &str, reference: &str) -> String {
    let split = reference.find(['#', '?']).unwrap_or(reference.len());
    let path = &reference[..split];
    let base = Path::new(doc_id).parent().unwrap_or_else(|| Path::new(""));
    let joined = if let Some(absolute) = path.strip_prefix('/') {
        PathBuf::from(absolute)
    } else {
        base.join(path)
    };
    util::to_forward_slashes(&util::clean_path(&joined))
}

/// Whether `uri` points outside the documentation set.
///
/// Anything with a scheme other than `file` is external. References without a scheme are
/// internal, unless their first path segment contains a colon: such a string is neither
/// a valid relative reference nor a URL and is treated as external.
pub fn is_external(uri: &str) -> bool {
    match Url::parse(uri) {
        Ok(url) => url.scheme() != "file",
        Err(ParseError::RelativeUrlWithoutBase) => {
            let end = uri.find(['/', '?', '#']).unwrap_or(uri.len());
            uri[..end].contains(':')
        }
        Err(_) => true,
    }
}
