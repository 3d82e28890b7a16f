//! HTML and table of contents emission for an [`Outline`].

use std::fmt::Write;

use crate::outline::{Outline, Section};

/// Escape sequence in prose that forces a line break.
const LINE_BREAK_ESCAPE: &str = "\\\\";
/// HTML emitted for [`LINE_BREAK_ESCAPE`].
const LINE_BREAK_HTML: &str = "<br>";

fn heading(section: &Section<'_>, numbered: bool) -> String {
    if numbered {
        format!("{} - {}", section.label, section.title)
    } else {
        section.title.clone()
    }
}

fn paragraph(lines: &[&str], separator: &str, out: &mut String) {
    out.push_str("<p>");
    out.push_str(&lines.join(separator).replace(LINE_BREAK_ESCAPE, LINE_BREAK_HTML));
    out.push_str("</p>");
}

/// Article HTML: one heading plus paragraph per section, in document order.
pub(crate) fn content_html(outline: &Outline<'_>, numbered: bool, separator: &str) -> String {
    let mut out = String::new();

    if !outline.preamble.is_empty() {
        paragraph(&outline.preamble, separator, &mut out);
    }

    for section in outline.in_order() {
        let tag = if section.label.is_top() { "h2" } else { "h3" };
        let _ = write!(
            out,
            "<{tag} id='{}'>{}</{tag}>",
            section.label,
            heading(section, numbered)
        );
        paragraph(&section.prose, separator, &mut out);
    }

    out
}

/// Nested `<ul>` table of contents linking to each section id.
pub(crate) fn toc_html(outline: &Outline<'_>, numbered: bool) -> String {
    let mut out = String::from("<ul>");

    for &root in &outline.roots {
        let section = &outline.sections[root];
        toc_link(section, numbered, &mut out);

        if !section.children.is_empty() {
            out.push_str("<ul>");
            for &child in &section.children {
                toc_link(&outline.sections[child], numbered, &mut out);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }

        out.push_str("</li>");
    }

    out.push_str("</ul>");
    out
}

fn toc_link(section: &Section<'_>, numbered: bool, out: &mut String) {
    let _ = write!(
        out,
        "<li><a href='#{}'>{}</a>",
        section.label,
        heading(section, numbered)
    );
}
