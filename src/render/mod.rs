//! Page rendering: phase-based templates over [`HtmlWriter`].
//!
//! Every page shares the same skeleton. A [`PagePhases`] implementation
//! supplies the title and the content of the head, body and post-script
//! phases; [`PageChrome`] supplies the boilerplate that depends on where the
//! page sits in the output tree.

pub mod linker_page;
pub mod type_page;

use crate::error::{Error, Result};
use crate::writer::HtmlWriter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Remote stylesheet every page links before the local one.
pub const W3_CSS_URL: &str = "https://www.w3schools.com/w3css/4/w3.css";

/// Name of the directory under the output root that holds stylesheets.
pub const STYLES_DIR: &str = "Styles";

/// Content hooks for one page.
pub trait PagePhases {
    fn title(&self) -> String;

    /// Extra lines inside `<head>` after the boilerplate and title.
    fn head(&self, _out: &mut HtmlWriter<'_>) -> io::Result<()> {
        Ok(())
    }

    fn body(&self, out: &mut HtmlWriter<'_>) -> io::Result<()>;

    /// Lines emitted at the very end of `<body>`.
    fn post_scripts(&self, _out: &mut HtmlWriter<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Site-wide boilerplate, positioned for a page `depth` levels below the
/// output root.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    /// File name of the provisioned stylesheet inside `Styles/`.
    pub stylesheet: Option<String>,
    /// Script includes, relative to the output root unless absolute.
    pub scripts: Vec<String>,
    pub depth: usize,
}

impl PageChrome {
    pub fn at_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }

    /// Rewrite a root-relative href so it resolves from this page. The
    /// result is ready to place in an attribute.
    pub fn site_href(&self, href: &str) -> String {
        if href.contains("://") || href.starts_with('/') {
            html_escape(href)
        } else {
            format!("{}{}", "../".repeat(self.depth), href_escape(href))
        }
    }

    fn write_head(&self, w: &mut HtmlWriter<'_>) -> io::Result<()> {
        w.line("<meta charset=\"utf-8\" />")?;
        w.line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />")?;
        w.line(&format!("<link rel=\"stylesheet\" href=\"{}\" />", W3_CSS_URL))?;
        if let Some(ref css) = self.stylesheet {
            let href = self.site_href(&format!("{}/{}", STYLES_DIR, css));
            w.line(&format!("<link rel=\"stylesheet\" href=\"{}\" />", href))?;
        }
        Ok(())
    }

    fn write_scripts(&self, w: &mut HtmlWriter<'_>) -> io::Result<()> {
        for script in &self.scripts {
            w.line(&format!(
                "<script src=\"{}\"></script>",
                self.site_href(script)
            ))?;
        }
        Ok(())
    }
}

/// Render a complete page into `out`.
pub fn render_page(page: &dyn PagePhases, chrome: &PageChrome, out: &mut dyn Write) -> io::Result<()> {
    let mut w = HtmlWriter::new(out);

    w.line("<!DOCTYPE html>")?;
    w.line("<html>")?;

    w.line("<head>")?;
    w.nested(|w| {
        chrome.write_head(w)?;
        w.line(&format!("<title>{}</title>", html_escape(&page.title())))?;
        page.head(w)
    })?;
    w.line("</head>")?;

    w.line("<body class=\"w3-container w3-margin-0\" id=\"page_body\">")?;
    w.nested(|w| page.body(w))?;
    w.nested(|w| {
        chrome.write_scripts(w)?;
        page.post_scripts(w)
    })?;
    w.line("</body>")?;
    w.line("</html>")?;

    w.finish()
}

/// Create (or truncate) `path` and render `page` into it.
///
/// The file is closed when this returns, on success and on failure.
pub fn write_page(path: &Path, page: &dyn PagePhases, chrome: &PageChrome) -> Result<()> {
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    render_page(page, chrome, &mut out).map_err(to_error)?;
    out.flush().map_err(to_error)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode each segment of a relative path for an `href` attribute.
/// Only `/` separators and unreserved characters are left as-is.
pub fn href_escape(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
