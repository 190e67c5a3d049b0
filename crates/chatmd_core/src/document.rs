use once_cell::sync::Lazy;
use regex::Regex;

use crate::tags::Tag;

static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Squeeze runs of three or more newlines down to one blank line.
pub fn collapse_blank_lines(markdown: &str) -> String {
    BLANK_RUN_RE.replace_all(markdown, "\n\n").into_owned()
}

/// One exported message: frontmatter fields plus markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub date: Option<String>,
    pub author: String,
    pub tags: Vec<Tag>,
    pub body: String,
}

impl OutputDocument {
    /// Render as `---` delimited frontmatter, a blank line, then the body.
    /// `date` and `tags` are left out entirely when absent.
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        if let Some(date) = &self.date {
            out.push_str(&format!("date: {date}\n"));
        }
        out.push_str(&format!("author: \"{}\"\n", escape_quoted(&self.author)));
        if !self.tags.is_empty() {
            out.push_str("tags:\n");
            for tag in &self.tags {
                out.push_str(&format!("  - {tag}\n"));
            }
        }
        out.push_str("---\n\n");
        out.push_str(&self.body);
        out
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn five_newlines_become_two() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn single_and_double_newlines_are_kept() {
        assert_eq!(collapse_blank_lines("a\nb\n\nc"), "a\nb\n\nc");
    }

    #[test]
    fn full_frontmatter() {
        let doc = OutputDocument {
            date: Some("2023-03-15".into()),
            author: "Jane".into(),
            tags: vec![Tag::Design, Tag::Management],
            body: "**Great design tips**\nfor teams".into(),
        };
        assert_eq!(
            doc.render(),
            "---\ndate: 2023-03-15\nauthor: \"Jane\"\ntags:\n  - design\n  - management\n---\n\n**Great design tips**\nfor teams"
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let doc = OutputDocument {
            date: None,
            author: "Bob".into(),
            tags: Vec::new(),
            body: "hi".into(),
        };
        assert_eq!(doc.render(), "---\nauthor: \"Bob\"\n---\n\nhi");
    }

    #[test]
    fn author_quotes_are_escaped() {
        let doc = OutputDocument {
            date: None,
            author: r#"The "Ops" \ Team"#.into(),
            tags: Vec::new(),
            body: String::new(),
        };
        assert!(doc.render().contains(r#"author: "The \"Ops\" \\ Team""#));
    }
}
