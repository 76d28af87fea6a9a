//! Build-scoped map of static files referenced by documents.

use super::util::{absolutize, normalize_path};
use super::{is_external, Pathfinder};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An asset that could not be copied.
#[derive(Debug)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: io::Error,
}

/// Maps source files to their location under the assets directory.
///
/// Inclusion is idempotent and files sharing a name are disambiguated as `name-1.ext`,
/// `name-2.ext`, … in the order they were first included.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    assets_root: PathBuf,
    entries: Vec<(PathBuf, PathBuf)>,
    by_source: HashMap<PathBuf, usize>,
    taken: HashSet<PathBuf>,
}

impl StaticFiles {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
            entries: Vec::new(),
            by_source: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    pub fn for_pathfinder(pathfinder: &Pathfinder) -> Self {
        Self::new(pathfinder.assets_root())
    }

    /// Output path for the asset at `source`, allocating one on first sight.
    pub fn include_asset(&mut self, source: &Path) -> PathBuf {
        let source = absolutize(source);
        if let Some(&index) = self.by_source.get(&source) {
            return self.entries[index].1.clone();
        }

        let destination = self.free_destination(&source);
        debug!(source = %source.display(), destination = %destination.display(), "asset included");
        self.taken.insert(destination.clone());
        self.by_source.insert(source.clone(), self.entries.len());
        self.entries.push((source, destination.clone()));
        destination
    }

    fn free_destination(&self, source: &Path) -> PathBuf {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        let candidate = self.assets_root.join(&file_name);
        if !self.taken.contains(&candidate) {
            return candidate;
        }

        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (file_name.as_str(), None),
        };
        (1..)
            .map(|n| match extension {
                Some(extension) => self.assets_root.join(format!("{stem}-{n}.{extension}")),
                None => self.assets_root.join(format!("{stem}-{n}")),
            })
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or(candidate)
    }

    /// Link target for an image referenced by `doc_id`.
    ///
    /// External URIs pass through. Local ones are included and returned relative to the
    /// directory of the document's output file.
    pub fn add_image(
        &mut self,
        pathfinder: &Pathfinder,
        doc_id: &str,
        source: Option<&Path>,
        uri: &str,
    ) -> String {
        self.add_local(pathfinder, doc_id, source, uri)
    }

    /// Link target for a downloadable file referenced by `doc_id`.
    pub fn add_download(
        &mut self,
        pathfinder: &Pathfinder,
        doc_id: &str,
        source: Option<&Path>,
        target: &str,
    ) -> String {
        self.add_local(pathfinder, doc_id, source, target)
    }

    fn add_local(
        &mut self,
        pathfinder: &Pathfinder,
        doc_id: &str,
        source: Option<&Path>,
        uri: &str,
    ) -> String {
        if is_external(uri) {
            return uri.to_string();
        }
        let asset = match uri.strip_prefix('/') {
            Some(rooted) => pathfinder.source_root().join(rooted),
            None => pathfinder.source_dir(doc_id, source).join(uri),
        };
        let destination = self.include_asset(&asset);

        let output = absolutize(&pathfinder.output_path(doc_id));
        let document_dir = output.parent();
        normalize_path(&absolutize(&destination), document_dir)
    }

    /// `(source, destination)` pairs in inclusion order.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(source, destination)| (source.as_path(), destination.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every included file; failures are logged and returned, never fatal.
    pub fn copy_all(&self) -> Vec<CopyFailure> {
        let mut failures = Vec::new();
        for (source, destination) in &self.entries {
            if let Err(error) = copy_file(source, destination) {
                warn!(
                    source = %source.display(),
                    destination = %destination.display(),
                    %error,
                    "failed to copy asset"
                );
                failures.push(CopyFailure {
                    source: source.clone(),
                    destination: destination.clone(),
                    error,
                });
            }
        }
        failures
    }
}

fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination).map(|_| ())
}
