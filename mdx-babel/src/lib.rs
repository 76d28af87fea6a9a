//! Translation of structured document trees into MDX
//!
//!     This crate takes the document trees an upstream structured-text compiler produces for
//!     reStructuredText and Markdown sources and turns them into MDX: Markdown block and inline
//!     syntax plus JSX component elements carrying attributes.
//!
//!     This is a pure lib, that is, it powers mdx-cli but is shell agnostic. No code here should
//!     assume a shell environment, be it std print, env vars etc. Everything is reported through
//!     return values and `tracing` events.
//!
//! Architecture
//!
//!     Translation is split in two halves that meet at the target tree (./ir/nodes.rs):
//!
//!     - source → target: the translator (./translate/mod.rs) walks a source tree and builds
//!       a target tree on a nesting stack. What each source kind becomes is decided by the
//!       handlers (./translate/handlers), one module per family of kinds.
//!     - target → text: formats (./formats) serialize the target tree. The MDX serializer is a
//!       pure fold; it never looks at the source tree.
//!
//!     Around those sit the path resolver (./paths), which owns every decision about output
//!     file names, cross-document links and asset locations, and the sidebar projector
//!     (./sidebar.rs), which reads the navigation trees of the source documents.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── publish.rs              # Build pipeline over a whole document set
//!     ├── sidebar.rs              # Navigation projection and manifest
//!     ├── source                  # Source trees and document sets (input)
//!     ├── ir                      # Target tree (output of translation)
//!     ├── translate
//!     │   ├── mod.rs              # Translator, environment, nesting stack
//!     │   ├── dispatch.rs         # Handler table and fallback chains
//!     │   ├── scope.rs            # Context scopes
//!     │   ├── markup.rs           # Containers under construction
//!     │   └── handlers            # What every source kind becomes
//!     ├── paths                   # Output paths, links, assets
//!     ├── formats
//!     │   ├── mdx                 # MDX serializer
//!     │   ├── json                # Target tree dump
//!     │   └── html                # Companion HTML renderer (raw HTML → target nodes)
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>
//!         ├── mod.rs
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The heavy lifting is the translator: it has to turn a tree whose shape follows the
//!     source markup into a tree whose shape follows MDX, where one source node may become
//!     several target nodes, none at all, or a container that collects siblings. Handlers
//!     never build subtrees themselves; they open and close frames and the translator
//!     attaches finished markup to its parent. Handlers find their fallback through the
//!     lineage of their kind (a `note` is an `admonition` is an `element`), so adding a kind
//!     means registering one handler.
//!
//! Library Choices
//!
//!     - html5ever + markup5ever_rcdom: raw HTML fragments are parsed, not pattern matched.
//!     - serde_json / serde_yaml_ng: source trees, attribute values and front matter.
//!     - url + pathdiff: link classification and relative asset paths.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod paths;
pub mod publish;
pub mod registry;
pub mod sidebar;
pub mod source;
pub mod translate;

pub use error::{BuildError, DocumentError, FormatError, RenderError, TranslateError};
pub use format::Format;
pub use paths::{PathOptions, Pathfinder};
pub use publish::{build, BuildReport, BuildSpec};
pub use registry::FormatRegistry;
pub use source::{DocumentSet, SourceDocument, SourceNode};
pub use translate::{Environment, TranslateOptions};

/// Translates a single source tree with default settings.
///
/// Links and assets resolve against the working directory; use an [`Environment`] for
/// anything else.
pub fn translate(doc_id: &str, tree: &SourceNode) -> Result<ir::nodes::Document, TranslateError> {
    Environment::new(Pathfinder::new(".", ".")).translate(doc_id, None, tree)
}
