//! Build pipeline.
//!
//! Turns a whole [`DocumentSet`] into output files: one serialized file per document, the
//! copied assets and the navigation manifest. This is the single entry point the CLI uses
//! for `mdx build`.
//!
//! The pipeline runs in this order:
//!
//! 1. the HTML renderer is probed; a renderer that cannot serve requests aborts the build
//! 2. every document's assets are resolved sequentially, so disambiguated asset names do
//!    not depend on how translations are scheduled
//! 3. documents are translated and serialized on up to `jobs` worker threads
//! 4. outputs are written below the output root
//! 5. assets are copied
//! 6. the sidebar is projected from the root document and the manifest written
//!
//! A document that fails to translate is logged and recorded in the [`BuildReport`]; the
//! other documents are still written. Renderer, I/O and manifest failures abort the build.
//!
//! For a single tree without any of the above, use [`Environment::translate`] and the
//! [`FormatRegistry`] directly.

use crate::error::{BuildError, DocumentError};
use crate::formats::html::HtmlToTree;
use crate::paths::{CopyFailure, Pathfinder};
use crate::registry::FormatRegistry;
use crate::sidebar::{self, Manifest};
use crate::source::{DocumentSet, SourceDocument};
use crate::translate::{Environment, TranslateOptions};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{debug, error, info};

/// Specifies one build.
///
/// ```ignore
/// let spec = BuildSpec::new(&documents, Pathfinder::new("docs", "out"))
///     .with_format("mdx")
///     .with_jobs(4);
/// let report = build(spec)?;
/// ```
pub struct BuildSpec<'a> {
    pub documents: &'a DocumentSet,
    pub pathfinder: Pathfinder,
    pub options: TranslateOptions,
    /// Registered format name used for every document.
    pub format: String,
    /// Worker threads; `None` uses the available parallelism.
    pub jobs: Option<NonZeroUsize>,
    /// File name of the manifest under the output root; `None` skips it.
    pub manifest: Option<String>,
    /// Overrides the project name of the bundle.
    pub project: Option<String>,
    /// Overrides the root document of the bundle.
    pub root_doc: Option<String>,
    renderer: Option<Box<dyn HtmlToTree>>,
}

impl<'a> BuildSpec<'a> {
    pub fn new(documents: &'a DocumentSet, pathfinder: Pathfinder) -> Self {
        Self {
            documents,
            pathfinder,
            options: TranslateOptions::default(),
            format: "mdx".to_string(),
            jobs: None,
            manifest: Some("manifest.yml".to_string()),
            project: None,
            root_doc: None,
            renderer: None,
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// `0` means "use the available parallelism".
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = NonZeroUsize::new(jobs);
        self
    }

    pub fn with_manifest(mut self, manifest: Option<String>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    pub fn with_root_doc(mut self, root_doc: Option<String>) -> Self {
        self.root_doc = root_doc;
        self
    }

    /// Replaces the in-process html5ever renderer.
    pub fn with_renderer(mut self, renderer: Box<dyn HtmlToTree>) -> Self {
        self.renderer = Some(renderer);
        self
    }
}

/// A document that produced no output.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFailure {
    pub id: String,
    pub error: DocumentError,
}

/// What a build did.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output files, in bundle order.
    pub written: Vec<PathBuf>,
    pub failed: Vec<DocumentFailure>,
    pub copied_assets: usize,
    pub copy_failures: Vec<CopyFailure>,
    pub manifest: Option<PathBuf>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.copy_failures.is_empty()
    }
}

/// Runs a build.
///
/// # Errors
///
/// Returns [`BuildError`] if:
/// - The renderer probe fails
/// - The format is not registered
/// - An output file, directory or the manifest cannot be written
///
/// Failures of individual documents and asset copies are reported in the
/// [`BuildReport`] instead.
pub fn build(spec: BuildSpec<'_>) -> Result<BuildReport, BuildError> {
    let BuildSpec {
        documents,
        pathfinder,
        options,
        format,
        jobs,
        manifest,
        project,
        root_doc,
        renderer,
    } = spec;

    let registry = FormatRegistry::with_defaults();
    let format = registry.get(&format)?;

    let mut env = Environment::new(pathfinder)
        .with_options(options)
        .with_documents(documents);
    if let Some(renderer) = renderer {
        env = env.with_renderer(renderer);
    }
    env.renderer().probe()?;

    for document in documents.iter() {
        env.preload_assets(&document.id, document.source.as_deref(), &document.tree);
    }
    debug!(assets = env.assets().len(), "asset pre-pass done");

    let jobs = jobs
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    info!(documents = documents.len(), jobs, "translating");
    let outcomes = translate_all(documents, jobs, |document| {
        let tree = env.translate(&document.id, document.source.as_deref(), &document.tree)?;
        Ok(format.serialize(&tree)?)
    });

    let mut report = BuildReport::default();
    for (document, outcome) in documents.iter().zip(outcomes) {
        match outcome {
            Ok(text) => {
                let path = env.pathfinder.output_path(&document.id);
                write_file(&path, &text)?;
                debug!(document = %document.id, path = %path.display(), "written");
                report.written.push(path);
            }
            Err(error) => {
                error!(document = %document.id, %error, "document failed");
                report.failed.push(DocumentFailure {
                    id: document.id.clone(),
                    error,
                });
            }
        }
    }

    let assets = env.assets().clone();
    report.copy_failures = assets.copy_all();
    report.copied_assets = assets.len() - report.copy_failures.len();

    if let Some(name) = manifest {
        let root = root_doc.as_deref().unwrap_or(documents.root());
        let items = sidebar::project(root, documents, &env.pathfinder);
        let project = project.or_else(|| documents.project().map(str::to_string));
        let path = env.pathfinder.output_root().join(name);
        write_file(&path, &Manifest::new(project, items).to_yaml()?)?;
        report.manifest = Some(path);
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        assets = report.copied_assets,
        "build finished"
    );
    Ok(report)
}

type Outcome = Result<String, DocumentError>;

/// Runs `work` over every document on `jobs` scoped threads; outcomes keep bundle order.
fn translate_all<F>(documents: &DocumentSet, jobs: usize, work: F) -> Vec<Outcome>
where
    F: Fn(&SourceDocument) -> Outcome + Sync,
{
    let queue: Vec<&SourceDocument> = documents.iter().collect();
    let next = AtomicUsize::new(0);
    let results = Mutex::new(Vec::with_capacity(queue.len()));
    let workers = jobs.clamp(1, queue.len().max(1));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(document) = queue.get(index) else {
                    break;
                };
                let outcome = work(document);
                results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((index, outcome));
            });
        }
    });

    let mut results = results
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, outcome)| outcome).collect()
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::io(parent, source))?;
    }
    fs::write(path, contents).map_err(|source| BuildError::io(path, source))
}
