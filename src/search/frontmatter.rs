//! Front-matter splitting and field extraction.
//!
//! Two fenced syntaxes are recognised at the very start of a document:
//! - `---` blocks holding YAML
//! - `+++` blocks holding TOML
//!
//! Only the handful of keys the index cares about are extracted.

use std::collections::HashMap;

const YAML_FENCE: &str = "---";
const TOML_FENCE: &str = "+++";

#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("front-matter opened with `{0}` is never closed")]
    Unterminated(&'static str),
    #[error("invalid TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A front-matter value, reduced to what the index can use.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Str(String),
    List(Vec<String>),
    /// Numbers, booleans, tables and anything else that is not a string.
    Other,
}

/// Fields extracted from a document's front-matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub keywords: Vec<String>,
}

/// A document split into front-matter and body.
#[derive(Debug)]
pub struct ParsedDocument<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

/// Splits `text` into front-matter and body.
///
/// A document without an opening fence is all body.
pub fn parse(text: &str) -> Result<ParsedDocument<'_>, FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (first_line, rest) = split_first_line(text);
    let fence = match first_line.trim_end() {
        YAML_FENCE => YAML_FENCE,
        TOML_FENCE => TOML_FENCE,
        _ => {
            return Ok(ParsedDocument {
                front_matter: FrontMatter::default(),
                body: text,
            });
        }
    };

    let (block, body) = split_at_fence(rest, fence).ok_or(FrontMatterError::Unterminated(fence))?;

    let values = if fence == TOML_FENCE {
        parse_toml(block)?
    } else {
        parse_yaml(block)?
    };

    Ok(ParsedDocument {
        front_matter: FrontMatter::from_values(&values),
        body,
    })
}

impl FrontMatter {
    fn from_values(values: &HashMap<String, Value>) -> Self {
        let string = |key: &str| match values.get(key) {
            Some(Value::Str(s)) => Some(s.clone()),
            _ => None,
        };

        let keywords = match values.get("keywords") {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Str(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            title: string("title"),
            description: string("description"),
            slug: string("slug"),
            category: string("category"),
            keywords,
        }
    }
}

fn split_first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    }
}

/// Finds the closing fence line; returns the block before it and the body after it.
fn split_at_fence<'a>(text: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == fence {
            let block = &text[..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn parse_toml(block: &str) -> Result<HashMap<String, Value>, FrontMatterError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => Value::Str(s),
                toml::Value::Array(items) => Value::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            toml::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => Value::Other,
            };
            (key, value)
        })
        .collect())
}

fn parse_yaml(block: &str) -> Result<HashMap<String, Value>, FrontMatterError> {
    let serde_yaml::Value::Mapping(mapping) = serde_yaml::from_str::<serde_yaml::Value>(block)? else {
        // Empty or comment-only blocks, and documents that are not a mapping.
        return Ok(HashMap::new());
    };

    Ok(mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let serde_yaml::Value::String(key) = key else {
                return None;
            };
            let value = match value {
                serde_yaml::Value::String(s) => Value::Str(s),
                serde_yaml::Value::Sequence(items) => Value::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            serde_yaml::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => Value::Other,
            };
            Some((key, value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[test]
    fn test_yaml_front_matter() {
        let text = "---\ntitle: \"Getting Started\"\ndescription: Intro guide\nslug: /start\ncategory: guides\n---\nWelcome.\n";
        let_assert!(Ok(doc) = parse(text));
        check!(doc.front_matter.title.as_deref() == Some("Getting Started"));
        check!(doc.front_matter.description.as_deref() == Some("Intro guide"));
        check!(doc.front_matter.slug.as_deref() == Some("/start"));
        check!(doc.front_matter.category.as_deref() == Some("guides"));
        check!(doc.body == "Welcome.\n");
    }

    #[rstest]
    #[case("title: \"Getting Started\" # shown in nav", "Getting Started")]
    #[case("title: 'It''s here'", "It's here")]
    #[case("title: Plain words # trailing", "Plain words")]
    #[case("title: >-\n  Install the\n  toolchain", "Install the toolchain")]
    #[case("title: |-\n  First line\n  second line", "First line\nsecond line")]
    fn test_yaml_scalar_forms(#[case] block: &str, #[case] expected: &str) {
        let text = format!("---\n{}\n---\nBody", block);
        let_assert!(Ok(doc) = parse(&text));
        check!(doc.front_matter.title.as_deref() == Some(expected));
    }

    #[test]
    fn test_yaml_folded_description() {
        let text = "---\ntitle: Setup\ndescription: >-\n  Install the\n  toolchain\n---\nBody";
        let_assert!(Ok(doc) = parse(text));
        check!(doc.front_matter.title.as_deref() == Some("Setup"));
        check!(doc.front_matter.description.as_deref() == Some("Install the toolchain"));
        check!(doc.body == "Body");
    }

    #[rstest]
    #[case("")]
    #[case("# only a comment")]
    fn test_empty_yaml_block(#[case] block: &str) {
        let text = format!("---\n{}\n---\nBody", block);
        let_assert!(Ok(doc) = parse(&text));
        check!(doc.front_matter == FrontMatter::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let_assert!(Err(FrontMatterError::Yaml(_)) = parse("---\ntitle: [unclosed\n---\nBody"));
    }

    #[test]
    fn test_toml_front_matter() {
        let text = "+++\ntitle = \"Config\"\nkeywords = [\"toml\", \"settings\"]\n+++\nBody";
        let_assert!(Ok(doc) = parse(text));
        check!(doc.front_matter.title.as_deref() == Some("Config"));
        check!(doc.front_matter.keywords == vec!["toml", "settings"]);
        check!(doc.body == "Body");
    }

    #[rstest]
    #[case("keywords: [alpha, 'beta', \"gamma\"]", &["alpha", "beta", "gamma"])]
    #[case("keywords: alpha, beta", &["alpha", "beta"])]
    #[case("keywords:\n  - alpha\n  - beta", &["alpha", "beta"])]
    fn test_keyword_forms(#[case] block: &str, #[case] expected: &[&str]) {
        let text = format!("---\n{}\n---\n", block);
        let_assert!(Ok(doc) = parse(&text));
        check!(doc.front_matter.keywords == expected);
    }

    #[rstest]
    #[case("title: 42")]
    #[case("title: true")]
    #[case("title:\n  - a")]
    fn test_non_string_title_ignored(#[case] block: &str) {
        let text = format!("---\n{}\n---\nBody", block);
        let_assert!(Ok(doc) = parse(&text));
        check!(doc.front_matter.title.is_none());
    }

    #[test]
    fn test_no_front_matter() {
        let_assert!(Ok(doc) = parse("# Heading\n\nText"));
        check!(doc.front_matter == FrontMatter::default());
        check!(doc.body == "# Heading\n\nText");
    }

    #[test]
    fn test_unterminated_is_error() {
        let_assert!(Err(FrontMatterError::Unterminated("---")) = parse("---\ntitle: x\nno close"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let_assert!(Err(FrontMatterError::Toml(_)) = parse("+++\ntitle = \n+++\n"));
    }

    #[test]
    fn test_crlf_and_bom() {
        let text = "\u{feff}---\r\ntitle: Windows\r\n---\r\nBody";
        let_assert!(Ok(doc) = parse(text));
        check!(doc.front_matter.title.as_deref() == Some("Windows"));
        check!(doc.body == "Body");
    }
}
