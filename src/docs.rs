//! Doc comment index: XML documentation file loaded into memory.
//!
//! The file follows the compiler doc-comment layout:
//!
//! ```xml
//! <doc>
//!   <members>
//!     <member name="M:Widget.Save(System.Int32,System.String)">
//!       <summary>Persists the widget</summary>
//!       <param name="id">row id</param>
//!       <returns>true on success</returns>
//!     </member>
//!   </members>
//! </doc>
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One `<member>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocEntry {
    /// The `name` attribute, e.g. `M:Widget.Save(System.Int32)`.
    pub signature: String,
    pub summary: Option<String>,
    /// `<param>` descriptions in document order.
    pub params: Vec<ParamDoc>,
    pub returns: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDoc {
    pub name: String,
    pub description: String,
}

/// Read-only index of every documented member, in load order.
#[derive(Debug, Default)]
pub struct DocIndex {
    entries: Vec<DocEntry>,
}

impl DocIndex {
    /// Load and parse the documentation file. Both a missing file and a
    /// malformed one are fatal to the run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::DocSourceMissing {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|reason| Error::MalformedDocs {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse documentation XML from a string.
    pub fn parse(xml: &str) -> std::result::Result<Self, String> {
        let doc = Document::parse(xml).map_err(|e| e.to_string())?;
        let root = doc.root_element();
        if !root.has_tag_name("doc") {
            return Err(format!(
                "expected <doc> root element, found <{}>",
                root.tag_name().name()
            ));
        }

        let entries = root
            .descendants()
            .filter(|n| n.has_tag_name("member"))
            .filter_map(parse_member)
            .collect();
        Ok(Self { entries })
    }

    /// First entry whose signature contains every fragment.
    pub fn find_member(&self, contains_all: &[&str]) -> Option<&DocEntry> {
        self.find_members(contains_all).next()
    }

    /// All entries whose signature contains every fragment, in load order.
    pub fn find_members<'s, 'q>(
        &'s self,
        contains_all: &'q [&'q str],
    ) -> impl Iterator<Item = &'s DocEntry> + 'q
    where
        's: 'q,
    {
        self.entries
            .iter()
            .filter(move |e| contains_all.iter().all(|f| e.signature.contains(f)))
    }

    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_member(node: Node) -> Option<DocEntry> {
    let signature = node.attribute("name")?.to_string();
    let mut entry = DocEntry {
        signature,
        ..Default::default()
    };

    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "summary" => entry.summary = non_empty(element_text(child)),
            "returns" => entry.returns = non_empty(element_text(child)),
            "param" => {
                if let Some(name) = child.attribute("name") {
                    entry.params.push(ParamDoc {
                        name: name.to_string(),
                        description: element_text(child),
                    });
                }
            }
            _ => {}
        }
    }

    Some(entry)
}

/// Text content of an element with inline references flattened and
/// whitespace collapsed.
fn element_text(node: Node) -> String {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    RE_WHITESPACE.replace_all(&raw, " ").trim().to_string()
}

fn collect_text(node: Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
            continue;
        }
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "see" | "seealso" => {
                if let Some(cref) = child.attribute("cref") {
                    // "T:Namespace.Widget" → "Namespace.Widget"
                    out.push_str(cref.split_once(':').map_or(cref, |(_, name)| name));
                } else if let Some(word) = child.attribute("langword") {
                    out.push_str(word);
                } else {
                    collect_text(child, out);
                }
            }
            "paramref" | "typeparamref" => {
                if let Some(name) = child.attribute("name") {
                    out.push_str(name);
                }
            }
            "para" => {
                out.push(' ');
                collect_text(child, out);
                out.push(' ');
            }
            _ => collect_text(child, out),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
