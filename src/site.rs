//! Orchestrator: one full documentation run.
//!
//! Order of operations:
//!
//! 0. check that the assembly name is a single plain path component
//! 1. load the documentation file (fatal on failure, before anything is deleted)
//! 2. scan the source tree
//! 3. delete and recreate the output root, copy the stylesheet
//! 4. render one class page per resolvable type
//! 5. fold the output tree and write a link page per retained directory

use crate::docs::DocIndex;
use crate::error::{Error, Result};
use crate::linker::{self, write_linker_pages};
use crate::linker_file_name;
use crate::model::{MetadataModel, TypeDescriptor};
use crate::render::type_page::{Link, Navigation, TypePage};
use crate::render::{write_page, PageChrome, STYLES_DIR};
use crate::source::SourceIndex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Everything a run needs besides the metadata model.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub source_root: PathBuf,
    pub docs_path: PathBuf,
    /// Site root; deleted and recreated by the run.
    pub output_root: PathBuf,
    /// Local stylesheet copied into `Styles/`.
    pub stylesheet: Option<PathBuf>,
    /// Script includes emitted at the end of every page.
    pub scripts: Vec<String>,
    /// Extension of source files, without the dot.
    pub source_extension: String,
}

impl SiteConfig {
    /// Config whose site root is `<output_parent>/<assembly>`.
    pub fn new(source_root: PathBuf, docs_path: PathBuf, output_parent: &Path, assembly: &str) -> Self {
        Self {
            source_root,
            docs_path,
            output_root: output_parent.join(assembly),
            stylesheet: None,
            scripts: Vec::new(),
            source_extension: "cs".to_string(),
        }
    }
}

/// A type that produced no page, and why.
#[derive(Debug)]
pub struct Skipped {
    pub type_name: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct SiteReport {
    pub pages: Vec<PathBuf>,
    pub linkers: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
    /// Pages or link pages that could not be written.
    pub failures: Vec<Error>,
}

impl SiteReport {
    /// Path of the root link page, the entry point of the site.
    pub fn entry_point(&self) -> Option<&Path> {
        self.linkers.first().map(PathBuf::as_path)
    }
}

/// The assembly names the directory that is deleted and rebuilt, so it must
/// be one normal path component: not empty, `.`, `..`, absolute, or nested.
pub fn check_assembly_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == OsStr::new(name)
    );
    if plain && !name.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(Error::InvalidAssemblyName {
            name: name.to_string(),
        })
    }
}

/// Delete any previous site at `root` and create an empty directory.
pub fn prepare_output_dir(root: &Path) -> Result<()> {
    let to_error = |source| Error::OutputRoot {
        path: root.to_path_buf(),
        source,
    };
    if root.exists() {
        info!(path = %root.display(), "existing documentation folder found, deleting and rebuilding");
        fs::remove_dir_all(root).map_err(to_error)?;
    }
    info!(path = %root.display(), "creating documentation directory");
    fs::create_dir_all(root).map_err(to_error)
}

/// Copy `stylesheet` into `<root>/Styles/`, returning its file name.
pub fn provision_stylesheet(root: &Path, stylesheet: Option<&Path>) -> Result<Option<String>> {
    let Some(source) = stylesheet else {
        return Ok(None);
    };
    let to_error = |e| Error::Stylesheet {
        path: source.to_path_buf(),
        source: e,
    };
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| to_error(std::io::Error::other("stylesheet path has no file name")))?;
    let styles = root.join(STYLES_DIR);
    fs::create_dir_all(&styles).map_err(to_error)?;
    fs::copy(source, styles.join(&name)).map_err(to_error)?;
    Ok(Some(name))
}

/// Run the whole pipeline.
///
/// Returns `Err` only for whole-run failures; per-type and per-file
/// problems are collected in the report.
pub fn generate(model: &MetadataModel, config: &SiteConfig) -> Result<SiteReport> {
    check_assembly_name(&model.assembly)?;

    let docs = DocIndex::load(&config.docs_path)?;
    info!(entries = docs.len(), path = %config.docs_path.display(), "loaded documentation");

    let sources = SourceIndex::scan(&config.source_root, &config.source_extension)?;
    info!(files = sources.len(), root = %sources.root().display(), "indexed source files");

    prepare_output_dir(&config.output_root)?;
    let chrome = PageChrome {
        stylesheet: provision_stylesheet(&config.output_root, config.stylesheet.as_deref())?,
        scripts: config.scripts.clone(),
        depth: 0,
    };

    let mut report = SiteReport::default();
    let placed = place_types(model, &sources, &mut report)?;
    let page_names: HashMap<&Path, &str> = placed
        .iter()
        .map(|(ty, file)| (*file, ty.name.as_str()))
        .collect();

    for (ty, file) in &placed {
        let rel_dir = file.parent().unwrap_or(Path::new(""));
        let out_dir = config.output_root.join(rel_dir);
        let nav = navigation(&sources, file, &out_dir, &page_names);
        let page = TypePage::new(ty, &docs, nav);
        let path = out_dir.join(format!("{}.html", ty.name));

        let written = fs::create_dir_all(&out_dir)
            .map_err(|source| Error::Write {
                path: out_dir.clone(),
                source,
            })
            .and_then(|()| write_page(&path, &page, &chrome.at_depth(rel_dir.components().count())));
        match written {
            Ok(()) => {
                info!(type_name = %ty.name, "wrote class page");
                report.pages.push(path);
            }
            Err(e) if e.is_recoverable() => {
                warn!(type_name = %ty.name, error = %e, "failed to write class page");
                report.failures.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    let tree = linker::scan_site(&config.output_root)?;
    let linkers = write_linker_pages(&tree, &chrome);
    report.linkers = linkers.written;
    report.failures.extend(linkers.failures);

    info!(
        pages = report.pages.len(),
        directories = report.linkers.len(),
        skipped = report.skipped.len(),
        failures = report.failures.len(),
        "documentation run finished"
    );
    Ok(report)
}

/// Resolve every type to its declaring file. Unresolvable types and
/// duplicates are skipped with a warning; any other error aborts the run.
fn place_types<'m, 's>(
    model: &'m MetadataModel,
    sources: &'s SourceIndex,
    report: &mut SiteReport,
) -> Result<Vec<(&'m TypeDescriptor, &'s Path)>> {
    let mut placed = Vec::new();
    let mut seen_names = HashSet::new();
    let mut seen_files = HashSet::new();

    for ty in &model.types {
        let outcome = if seen_names.insert(ty.name.as_str()) {
            sources.resolve_type(ty).and_then(|file| {
                if seen_files.insert(file) {
                    Ok(file)
                } else {
                    Err(Error::SourceAlreadyUsed {
                        type_name: ty.name.clone(),
                        path: file.to_path_buf(),
                    })
                }
            })
        } else {
            Err(Error::DuplicateType {
                type_name: ty.name.clone(),
            })
        };

        match outcome {
            Ok(file) => placed.push((ty, file)),
            Err(error) if error.is_recoverable() => {
                warn!(type_name = %ty.name, %error, "skipping type");
                report.skipped.push(Skipped {
                    type_name: ty.name.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }
    Ok(placed)
}

fn navigation(
    sources: &SourceIndex,
    file: &Path,
    out_dir: &Path,
    page_names: &HashMap<&Path, &str>,
) -> Navigation {
    let parent = out_dir.file_name().map(|name| {
        let name = name.to_string_lossy();
        Link {
            href: linker_file_name(&name),
            label: name.into_owned(),
        }
    });
    let (previous, next) = sources.neighbours(file, |f| page_names.contains_key(f));
    let to_link = |f: &Path| page_names.get(f).map(|name| Link::page(name));

    Navigation {
        parent,
        previous: previous.and_then(to_link),
        next: next.and_then(to_link),
    }
}
