//! Directory index builder: one link page per retained output directory.
//!
//! Retention is a bottom-up fold over the output tree. A subdirectory is
//! dropped when its name is in [`IGNORED_DIRECTORIES`], when it is hidden,
//! or when nothing in its subtree survives. The output root itself is always
//! kept since its link page is the entry point of the site.

use crate::error::{Error, Result};
use crate::render::linker_page::LinkerPage;
use crate::render::{write_page, PageChrome};
use crate::{linker_file_name, IGNORED_DIRECTORIES};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A retained directory with its retained pages and subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub name: String,
    /// Page file names directly inside this directory, sorted.
    pub pages: Vec<String>,
    /// Retained subdirectories, sorted by name.
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    pub fn linker_path(&self) -> PathBuf {
        self.path.join(linker_file_name(&self.name))
    }

    /// Every node in the tree, pre-order, paired with its depth below this one.
    pub fn nodes(&self) -> Vec<(usize, &DirectoryNode)> {
        let mut out = Vec::new();
        self.collect(0, &mut out);
        out
    }

    fn collect<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a DirectoryNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.collect(depth + 1, out);
        }
    }
}

/// Names that are never part of the site, regardless of content.
pub fn is_ignored_name(name: &str) -> bool {
    IGNORED_DIRECTORIES.contains(&name)
}

/// Dot-prefixed names, plus the hidden attribute on Windows.
pub fn is_hidden(path: &Path, name: &str) -> bool {
    name.starts_with('.') || has_hidden_attribute(path)
}

#[cfg(windows)]
fn has_hidden_attribute(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    fs::metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_path: &Path) -> bool {
    false
}

/// True for a directory that can never be retained, whatever it contains.
pub fn is_excluded_directory(path: &Path, name: &str) -> bool {
    is_ignored_name(name) || is_hidden(path, name)
}

/// Fold the output tree rooted at `root` into retained directories.
pub fn scan_site(root: &Path) -> Result<DirectoryNode> {
    let name = dir_name(root);
    let (pages, children) = fold_directory(root, &name).map_err(|source| Error::OutputRoot {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(DirectoryNode {
        path: root.to_path_buf(),
        name,
        pages,
        children,
    })
}

/// Retained pages and subdirectories directly inside `path`.
fn fold_directory(path: &Path, name: &str) -> io::Result<(Vec<String>, Vec<DirectoryNode>)> {
    let own_linker = linker_file_name(name);
    let mut entries = fs::read_dir(path)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut pages = Vec::new();
    let mut children = Vec::new();
    for entry in entries {
        let Ok(entry_name) = entry.file_name().into_string() else {
            continue;
        };
        let entry_path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if let Some(child) = retain_directory(&entry_path, &entry_name) {
                children.push(child);
            }
        } else if file_type.is_file()
            && entry_name.ends_with(".html")
            && entry_name != own_linker
        {
            pages.push(entry_name);
        }
    }
    Ok((pages, children))
}

fn retain_directory(path: &Path, name: &str) -> Option<DirectoryNode> {
    if is_excluded_directory(path, name) {
        return None;
    }
    match fold_directory(path, name) {
        Ok((pages, children)) if pages.is_empty() && children.is_empty() => None,
        Ok((pages, children)) => Some(DirectoryNode {
            path: path.to_path_buf(),
            name: name.to_string(),
            pages,
            children,
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable directory");
            None
        }
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Outcome of writing every link page of a tree.
#[derive(Debug, Default)]
pub struct LinkerReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<Error>,
}

/// Write the link page of every node. A failed write is reported and the
/// remaining directories are still written.
pub fn write_linker_pages(root: &DirectoryNode, chrome: &PageChrome) -> LinkerReport {
    let mut report = LinkerReport::default();
    for (depth, node) in root.nodes() {
        let path = node.linker_path();
        match write_page(&path, &LinkerPage::new(node), &chrome.at_depth(depth)) {
            Ok(()) => {
                info!(directory = %node.name, "wrote directory page");
                report.written.push(path);
            }
            Err(e) => {
                warn!(error = %e, "failed to write directory page");
                report.failures.push(e);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn ignored_names() {
        assert!(is_ignored_name("bin"));
        assert!(is_ignored_name("obj"));
        assert!(is_ignored_name("Properties"));
        assert!(!is_ignored_name("Models"));
    }

    #[test]
    fn collects_pages_and_skips_own_linker() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        touch(&root, "Widget.html");
        touch(&root, "Site Linker.html");
        touch(&root, "notes.txt");

        let tree = scan_site(&root).unwrap();
        assert_eq!(tree.name, "Site");
        assert_eq!(tree.pages, vec!["Widget.html"]);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn drops_ignored_hidden_and_empty_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        touch(&root, "Widget.html");
        touch(&root, "bin/Debug/Widget.dll");
        touch(&root, "bin/Stray.html");
        touch(&root, ".cache/Hidden.html");
        touch(&root, "Styles/w3.css");
        touch(&root, "Empty/obj/Gen.html");
        touch(&root, "Models/Gadget.html");

        let tree = scan_site(&root).unwrap();
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Models"]);
    }

    #[test]
    fn keeps_directory_whose_pages_are_only_deeper() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        touch(&root, "A/B/C/Deep.html");

        let tree = scan_site(&root).unwrap();
        let a = &tree.children[0];
        assert_eq!(a.name, "A");
        assert!(a.pages.is_empty());
        let c = &a.children[0].children[0];
        assert_eq!(c.name, "C");
        assert_eq!(c.pages, vec!["Deep.html"]);
    }

    #[test]
    fn root_is_kept_even_when_empty() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        fs::create_dir_all(&root).unwrap();
        let tree = scan_site(&root).unwrap();
        assert!(tree.pages.is_empty() && tree.children.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = scan_site(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::OutputRoot { .. }));
    }

    #[test]
    fn nodes_are_pre_order_with_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        touch(&root, "A/One.html");
        touch(&root, "A/B/Two.html");
        touch(&root, "C/Three.html");

        let tree = scan_site(&root).unwrap();
        let order: Vec<_> = tree
            .nodes()
            .into_iter()
            .map(|(d, n)| (d, n.name.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Site".to_string()),
                (1, "A".to_string()),
                (2, "B".to_string()),
                (1, "C".to_string()),
            ]
        );
    }

    #[test]
    fn writes_one_linker_per_node() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Site");
        touch(&root, "Widget.html");
        touch(&root, "Models/Gadget.html");

        let tree = scan_site(&root).unwrap();
        let report = write_linker_pages(&tree, &PageChrome::default());
        assert!(report.failures.is_empty());
        assert_eq!(report.written.len(), 2);
        assert!(root.join("Site Linker.html").is_file());
        assert!(root.join("Models/Models Linker.html").is_file());
    }
}
