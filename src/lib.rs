//! docsite: turn type metadata and XML doc comments into a static HTML site.
//!
//! The pipeline has two halves:
//!
//! - **Pages**: every type in the [`model::MetadataModel`] is resolved to its
//!   declaring source file ([`source::SourceIndex`]), each member is matched to
//!   its doc comment ([`correlate`]) and one page is rendered per type
//!   ([`render::type_page`]).
//! - **Navigation**: the output tree is folded bottom-up into retained
//!   directories ([`linker`]) and a link page is written for each of them.
//!
//! [`site::generate`] sequences both halves.

pub mod correlate;
pub mod docs;
pub mod error;
pub mod linker;
pub mod model;
pub mod render;
pub mod site;
pub mod source;
pub mod writer;

pub use error::{Error, Result};

/// Suffix appended to a directory's name to form the name of its link page.
pub const LINKER_SUFFIX: &str = " Linker.html";

/// Directory names that never appear in the generated site.
pub const IGNORED_DIRECTORIES: &[&str] = &["bin", "obj", "Properties", ".vs", ".git"];

/// File name of the link page for a directory called `dir_name`.
pub fn linker_file_name(dir_name: &str) -> String {
    format!("{}{}", dir_name, LINKER_SUFFIX)
}
