//! Class page: one per documented type.

use crate::correlate::correlate_member;
use crate::docs::{DocEntry, DocIndex};
use crate::model::{MemberDescriptor, TypeDescriptor, Visibility};
use crate::render::{href_escape, html_escape, PagePhases};
use crate::writer::HtmlWriter;
use std::io;

/// A relative link to another page of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub label: String,
}

impl Link {
    /// Link to a class page in the same directory.
    pub fn page(stem: &str) -> Self {
        Self {
            href: format!("{}.html", stem),
            label: stem.to_string(),
        }
    }
}

/// Links from a class page to its directory page and neighbouring classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub parent: Option<Link>,
    pub previous: Option<Link>,
    pub next: Option<Link>,
}

pub struct TypePage<'a> {
    ty: &'a TypeDescriptor,
    docs: &'a DocIndex,
    nav: Navigation,
}

impl<'a> TypePage<'a> {
    pub fn new(ty: &'a TypeDescriptor, docs: &'a DocIndex, nav: Navigation) -> Self {
        Self { ty, docs, nav }
    }

    fn write_navigation(&self, w: &mut HtmlWriter<'_>) -> io::Result<()> {
        let links: Vec<(&str, &Link)> = [
            ("parent", self.nav.parent.as_ref()),
            ("previous", self.nav.previous.as_ref()),
            ("next", self.nav.next.as_ref()),
        ]
        .into_iter()
        .filter_map(|(rel, link)| link.map(|l| (rel, l)))
        .collect();

        if links.is_empty() {
            return Ok(());
        }

        w.line("<nav>")?;
        w.nested(|w| {
            for (rel, link) in links {
                w.line(&format!(
                    "<a class=\"nav_{}\" href=\"{}\">{}</a>",
                    rel,
                    href_escape(&link.href),
                    html_escape(&link.label)
                ))?;
            }
            Ok(())
        })?;
        w.line("</nav>")
    }

    fn write_section(
        &self,
        w: &mut HtmlWriter<'_>,
        id: &str,
        heading: &str,
        visibility: Visibility,
    ) -> io::Result<()> {
        w.line(&format!("<h2 id=\"{}\">{}</h2>", id, heading))?;
        w.nested(|w| {
            for member in self.ty.documented_members(visibility) {
                let doc = correlate_member(self.docs, self.ty, member);
                write_member(w, member, doc)?;
            }
            Ok(())
        })
    }
}

impl PagePhases for TypePage<'_> {
    fn title(&self) -> String {
        self.ty.name.clone()
    }

    fn body(&self, w: &mut HtmlWriter<'_>) -> io::Result<()> {
        w.line("<header>")?;
        w.line(&format!(
            "<h1 id=\"page_title\">{} Class</h1>",
            html_escape(&self.ty.name)
        ))?;
        w.line("</header>")?;

        self.write_navigation(w)?;

        self.write_section(w, "public_methods", "Public Methods", Visibility::Public)?;
        self.write_section(w, "non_public_methods", "Non Public Methods", Visibility::NonPublic)
    }
}

/// Signature heading followed by whatever documentation was found.
fn write_member(
    w: &mut HtmlWriter<'_>,
    member: &MemberDescriptor,
    doc: Option<&DocEntry>,
) -> io::Result<()> {
    w.line(&member_heading(member))?;

    let Some(doc) = doc else {
        return Ok(());
    };
    if let Some(ref summary) = doc.summary {
        w.line(&format!("<p>{}</p>", html_escape(summary)))?;
    }
    for param in &doc.params {
        w.line(&format!(
            "<p>{} - {}</p>",
            html_escape(&param.name),
            html_escape(&param.description)
        ))?;
    }
    if let Some(ref returns) = doc.returns {
        w.line(&format!("<p>returns - {}</p>", html_escape(returns)))?;
    }
    Ok(())
}

fn member_heading(member: &MemberDescriptor) -> String {
    let params = member
        .parameters
        .iter()
        .map(|p| {
            format!(
                "<span title=\"Parameter type\" class=\"parameter_type\">{}</span> <span title=\"Parameter name\">{}</span>",
                html_escape(&p.type_name),
                html_escape(&p.name)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut heading = format!(
        "<h4><span title=\"Return type\" class=\"return_type\">{}</span> <span title=\"Method name\">{}</span>({})",
        html_escape(&member.return_type),
        html_escape(&member.name),
        params
    );
    if member.is_virtual {
        heading.push_str(
            " <span class=\"virtual\" title=\"Method is virtual or overrides a virtual function\">(Virtual)</span>",
        );
    }
    heading.push_str("</h4>");
    heading
}
