//! Markdown passthrough for `{Filetype}{markdown}` documents.

use pulldown_cmark::{Options, Parser, html};

/// Render a CommonMark body (with tables and strikethrough) to HTML.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
