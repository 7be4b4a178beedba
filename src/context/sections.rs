//! Splits a context document into weighted pseudo-sections.

use regex::Regex;
use std::sync::LazyLock;

static HEADING1: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^#\s+(.+)$"));
static HEADING2: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^##\s+(.+)$"));
static HEADING3: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^###\s+(.+)$"));
static ANY_HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^#+\s+.+$"));
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)```.*?```"));
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^[*-]\s+.+$"));
static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^[^#\n].+$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("section patterns are valid")
}

/// Kind of pseudo-section found in a context document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    CodeBlock,
    List,
}

impl SectionKind {
    pub const ALL: [Self; 6] = [
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Paragraph,
        Self::CodeBlock,
        Self::List,
    ];

    /// Weight added to a context keyword per occurrence in this kind of section.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Heading1 => 3.0,
            Self::Heading2 => 2.5,
            Self::Heading3 => 2.0,
            Self::CodeBlock => 1.5,
            Self::Paragraph | Self::List => 1.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Paragraph => "paragraph",
            Self::CodeBlock => "codeblock",
            Self::List => "list",
        }
    }
}

/// Returns the text of every section kind, in [`SectionKind::ALL`] order.
///
/// Matches of one kind are joined with spaces; a kind with no matches has
/// empty text. Paragraphs are whatever lines remain once headings, code
/// blocks and list items are removed.
pub fn extract_sections(content: &str) -> [(SectionKind, String); 6] {
    SectionKind::ALL.map(|kind| {
        let text = match kind {
            SectionKind::Heading1 => join_matches(&HEADING1, content),
            SectionKind::Heading2 => join_matches(&HEADING2, content),
            SectionKind::Heading3 => join_matches(&HEADING3, content),
            SectionKind::CodeBlock => join_matches(&CODE_BLOCK, content),
            SectionKind::List => join_matches(&LIST_ITEM, content),
            SectionKind::Paragraph => {
                let rest = ANY_HEADING.replace_all(content, "");
                let rest = CODE_BLOCK.replace_all(&rest, "");
                let rest = LIST_ITEM.replace_all(&rest, "");
                join_matches(&PARAGRAPH, &rest)
            }
        };
        (kind, text)
    })
}

fn join_matches(pattern: &Regex, text: &str) -> String {
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
