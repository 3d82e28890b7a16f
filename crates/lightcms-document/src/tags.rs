//! Tag-line grammar.
//!
//! A tag line binds a name to a value with brace groups:
//!
//! ```text
//! {Author}{J Doe}
//! {Note}{uses {braces} inside}
//! {Draft}
//! ```
//!
//! The name is the first brace pair. The value opens at the first `{` after
//! the name and closes at the last `}` on the line, so inner braces survive.
//! A line with a single group uses that group as both name and value.

/// One classified line of the tag block.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TagLine<'a> {
    Blank,
    Tag { name: &'a str, value: &'a str },
    Malformed,
}

pub(crate) fn parse_tag_line(line: &str) -> TagLine<'_> {
    if line.trim().is_empty() {
        return TagLine::Blank;
    }

    let Some(name_open) = line.find('{') else {
        return TagLine::Malformed;
    };
    let Some(name_close) = line[name_open + 1..].find('}').map(|i| name_open + 1 + i) else {
        return TagLine::Malformed;
    };
    let name = &line[name_open + 1..name_close];
    if name.is_empty() {
        return TagLine::Malformed;
    }

    let value = match line[name_close + 1..].find('{') {
        Some(offset) => {
            let value_open = name_close + 1 + offset;
            match line.rfind('}') {
                Some(value_close) if value_close > value_open => {
                    &line[value_open + 1..value_close]
                }
                _ => "",
            }
        }
        None => name,
    };

    TagLine::Tag { name, value }
}
