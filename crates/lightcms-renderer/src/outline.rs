//! Section tree built from outline markup.
//!
//! Sections live in an arena (`Vec<Section>`) and refer to their subsections
//! by index. While scanning, a stack of arena indices tracks the open frames:
//! prose goes to the top of the stack, a `*` heading resets the stack, and a
//! `**` heading pops back to the enclosing top-level frame before pushing.

use std::fmt;

use lightcms_document::title_case;

use crate::RenderError;

/// Marker opening a top-level heading line.
const MARKER: char = '*';
/// Marker opening a subsection heading line.
const SUB_MARKER: &str = "**";

/// Numeric label of a section, rendered as `2` or `2.3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionLabel {
    /// Top-level section number.
    Top(u32),
    /// Subsection `major.minor`.
    Sub(u32, u32),
}

impl SectionLabel {
    /// Whether this is a top-level label.
    pub fn is_top(self) -> bool {
        matches!(self, Self::Top(_))
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top(major) => write!(f, "{major}"),
            Self::Sub(major, minor) => write!(f, "{major}.{minor}"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Section<'a> {
    pub(crate) label: SectionLabel,
    pub(crate) title: String,
    pub(crate) prose: Vec<&'a str>,
    pub(crate) children: Vec<usize>,
}

/// Parsed outline: top-level sections in order, each with its subsections.
#[derive(Debug)]
pub struct Outline<'a> {
    pub(crate) sections: Vec<Section<'a>>,
    pub(crate) roots: Vec<usize>,
    pub(crate) preamble: Vec<&'a str>,
}

impl<'a> Outline<'a> {
    /// Build the section tree from body lines.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OrphanSubsection`] if a `**` heading comes
    /// before any `*` heading.
    pub fn parse<I>(lines: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outline = Self {
            sections: Vec::new(),
            roots: Vec::new(),
            preamble: Vec::new(),
        };
        let mut stack: Vec<usize> = Vec::new();
        let mut major = 0;
        let mut minor = 0;

        for (number, line) in lines.into_iter().enumerate() {
            if let Some(rest) = line.strip_prefix(SUB_MARKER) {
                while let Some(&open) = stack.last() {
                    if outline.sections[open].label.is_top() {
                        break;
                    }
                    stack.pop();
                }
                let Some(&parent) = stack.last() else {
                    return Err(RenderError::OrphanSubsection {
                        line: number + 1,
                        heading: line.to_owned(),
                    });
                };
                minor += 1;
                let index = outline.push(SectionLabel::Sub(major, minor), rest);
                outline.sections[parent].children.push(index);
                stack.push(index);
            } else if let Some(rest) = line.strip_prefix(MARKER) {
                major += 1;
                minor = 0;
                let index = outline.push(SectionLabel::Top(major), rest);
                outline.roots.push(index);
                stack.clear();
                stack.push(index);
            } else {
                let prose = line.trim_end();
                if prose.is_empty() {
                    continue;
                }
                match stack.last() {
                    Some(&open) => outline.sections[open].prose.push(prose),
                    None => outline.preamble.push(prose),
                }
            }
        }

        Ok(outline)
    }

    /// Labels of all sections in document order.
    pub fn labels(&self) -> Vec<SectionLabel> {
        self.in_order().map(|section| section.label).collect()
    }

    /// Whether the outline has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in document order: each top-level section followed by its
    /// subsections.
    pub(crate) fn in_order(&self) -> impl Iterator<Item = &Section<'a>> {
        self.roots.iter().flat_map(move |&root| {
            std::iter::once(&self.sections[root])
                .chain(self.sections[root].children.iter().map(|&i| &self.sections[i]))
        })
    }

    fn push(&mut self, label: SectionLabel, heading: &str) -> usize {
        let title = match heading.strip_prefix('_') {
            Some(verbatim) => verbatim.trim().to_owned(),
            None => title_case(heading.trim()),
        };
        self.sections.push(Section {
            label,
            title,
            prose: Vec::new(),
            children: Vec::new(),
        });
        self.sections.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(SectionLabel::Top(2).to_string(), "2");
        assert_eq!(SectionLabel::Sub(2, 3).to_string(), "2.3");
        assert_eq!(SectionLabel::Sub(1, 10).to_string(), "1.10");
    }

    #[test]
    fn test_numbering() {
        let outline =
            Outline::parse(["*Intro", "prose", "**Background", "prose", "*Methods"]).unwrap();
        assert_eq!(
            outline.labels(),
            vec![
                SectionLabel::Top(1),
                SectionLabel::Sub(1, 1),
                SectionLabel::Top(2)
            ]
        );
    }

    #[test]
    fn test_subsection_counter_resets() {
        let outline = Outline::parse(["*A", "**a", "**b", "*B", "**c"]).unwrap();
        assert_eq!(
            outline.labels(),
            vec![
                SectionLabel::Top(1),
                SectionLabel::Sub(1, 1),
                SectionLabel::Sub(1, 2),
                SectionLabel::Top(2),
                SectionLabel::Sub(2, 1)
            ]
        );
    }

    #[test]
    fn test_orphan_subsection() {
        let err = Outline::parse(["intro text", "**Lost"]).unwrap_err();
        assert_eq!(
            err,
            RenderError::OrphanSubsection {
                line: 2,
                heading: "**Lost".to_owned()
            }
        );
    }

    #[test]
    fn test_prose_goes_to_latest_frame() {
        let outline = Outline::parse(["*A", "one", "**a", "two", "", "three"]).unwrap();
        let sections: Vec<_> = outline.in_order().collect();
        assert_eq!(sections[0].prose, vec!["one"]);
        assert_eq!(sections[1].prose, vec!["two", "three"]);
    }

    #[test]
    fn test_preamble_collected() {
        let outline = Outline::parse(["before", "*A"]).unwrap();
        assert_eq!(outline.preamble, vec!["before"]);
    }

    #[test]
    fn test_heading_text_rules() {
        let outline = Outline::parse(["* getting started ", "**_iOS notes", "*_ spaced"]).unwrap();
        let titles: Vec<_> = outline.in_order().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Getting Started", "iOS notes", "spaced"]);
    }

    #[test]
    fn test_triple_marker_is_subsection() {
        let outline = Outline::parse(["*A", "***x"]).unwrap();
        let sections: Vec<_> = outline.in_order().collect();
        assert_eq!(sections[1].label, SectionLabel::Sub(1, 1));
        assert_eq!(sections[1].title, "*X");
    }
}
