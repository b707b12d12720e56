//! Source location index: which file declares each type, and its siblings.

use crate::error::{Error, Result};
use crate::linker::is_excluded_directory;
use crate::model::TypeDescriptor;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source files under a root, keyed by stem and by directory. All stored
/// paths are relative to the root.
#[derive(Debug, Default)]
pub struct SourceIndex {
    root: PathBuf,
    by_stem: BTreeMap<String, Vec<PathBuf>>,
    by_dir: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl SourceIndex {
    /// Scan `root` recursively for files with `extension`, skipping ignored
    /// and hidden directories.
    pub fn scan(root: &Path, extension: &str) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::SourceRootMissing(root.to_path_buf()));
        }

        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(&root.to_string_lossy()),
            Pattern::escape(extension)
        );
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let matches = glob::glob_with(&pattern, options).map_err(|e| Error::SourcePattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable source path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            if in_excluded_directory(root, rel) {
                debug!(file = %rel.display(), "skipping file in ignored directory");
                continue;
            }
            files.push(rel.to_path_buf());
        }

        Ok(Self::from_files(root.to_path_buf(), files))
    }

    /// Build an index from paths already relative to `root`.
    pub fn from_files(root: PathBuf, files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut index = Self {
            root,
            ..Default::default()
        };
        for file in files {
            if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
                index
                    .by_stem
                    .entry(stem.to_string())
                    .or_default()
                    .push(file.clone());
            }
            let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
            index.by_dir.entry(dir).or_default().push(file);
        }
        for files in index.by_stem.values_mut().chain(index.by_dir.values_mut()) {
            files.sort();
            files.dedup();
        }
        index
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.by_dir.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dir.is_empty()
    }

    /// The single file whose stem equals `type_name`.
    pub fn resolve(&self, type_name: &str) -> Result<&Path> {
        match self.by_stem.get(type_name).map(Vec::as_slice) {
            None | Some([]) => Err(Error::MissingSource {
                type_name: type_name.to_string(),
            }),
            Some([only]) => Ok(only.as_path()),
            Some(many) => Err(Error::AmbiguousSource {
                type_name: type_name.to_string(),
                candidates: many.to_vec(),
            }),
        }
    }

    /// Resolve a type, preferring its declared `source_file` when present.
    pub fn resolve_type(&self, ty: &TypeDescriptor) -> Result<&Path> {
        match ty.source_file {
            Some(ref hint) => self
                .siblings(hint)
                .iter()
                .find(|f| *f == hint)
                .map(PathBuf::as_path)
                .ok_or_else(|| Error::MissingSource {
                    type_name: ty.name.clone(),
                }),
            None => self.resolve(&ty.name),
        }
    }

    /// Files in the same directory as `file` (including it), sorted.
    pub fn siblings(&self, file: &Path) -> &[PathBuf] {
        let dir = file.parent().unwrap_or(Path::new(""));
        self.by_dir.get(dir).map(Vec::as_slice).unwrap_or_default()
    }

    /// The sibling files immediately before and after `file`, counting only
    /// those for which `has_page` holds.
    pub fn neighbours<F>(&self, file: &Path, has_page: F) -> (Option<&Path>, Option<&Path>)
    where
        F: Fn(&Path) -> bool,
    {
        let paged: Vec<&Path> = self
            .siblings(file)
            .iter()
            .map(PathBuf::as_path)
            .filter(|f| *f == file || has_page(*f))
            .collect();
        let Some(pos) = paged.iter().position(|f| *f == file) else {
            return (None, None);
        };
        let previous = pos.checked_sub(1).map(|i| paged[i]);
        let next = paged.get(pos + 1).copied();
        (previous, next)
    }
}

fn in_excluded_directory(root: &Path, rel: &Path) -> bool {
    let Some(parent) = rel.parent() else {
        return false;
    };
    let mut dir = root.to_path_buf();
    for component in parent.components() {
        dir.push(component);
        let name = component.as_os_str().to_string_lossy();
        if is_excluded_directory(&dir, &name) {
            return true;
        }
    }
    false
}
