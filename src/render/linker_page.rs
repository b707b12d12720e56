//! Directory page: links to the class pages and subdirectories of one level.

use crate::linker::DirectoryNode;
use crate::linker_file_name;
use crate::render::{href_escape, html_escape, PagePhases};
use crate::writer::HtmlWriter;
use std::io;

pub struct LinkerPage<'a> {
    node: &'a DirectoryNode,
}

impl<'a> LinkerPage<'a> {
    pub fn new(node: &'a DirectoryNode) -> Self {
        Self { node }
    }
}

/// Relative href from a directory page to a subdirectory's page.
pub fn subdirectory_href(name: &str) -> String {
    format!("{}/{}", name, linker_file_name(name))
}

impl PagePhases for LinkerPage<'_> {
    fn title(&self) -> String {
        self.node.name.clone()
    }

    fn body(&self, w: &mut HtmlWriter<'_>) -> io::Result<()> {
        w.line("<header>")?;
        w.line(&format!(
            "<h1 id=\"page_title\">{} Directory</h1>",
            html_escape(&self.node.name)
        ))?;
        w.line("</header>")?;

        for page in &self.node.pages {
            let label = page.strip_suffix(".html").unwrap_or(page);
            w.line(&format!(
                "<a href=\"{}\">{}</a>",
                href_escape(page),
                html_escape(label)
            ))?;
            w.line("<br/>")?;
        }

        for child in &self.node.children {
            w.line(&format!(
                "<a href=\"{}\">{} Directory</a>",
                href_escape(&subdirectory_href(&child.name)),
                html_escape(&child.name)
            ))?;
            w.line("<br/>")?;
        }
        Ok(())
    }
}
