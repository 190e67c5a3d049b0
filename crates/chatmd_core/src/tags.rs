use std::collections::BTreeSet;
use std::fmt;

/// Topical label attached to an exported message.
///
/// Variants are declared in alphabetical order so the derived `Ord` sorts
/// them the way they appear in frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Design,
    Management,
    Product,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Design => "design",
            Tag::Management => "management",
            Tag::Product => "product",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase keywords per tag. A tag applies when any keyword occurs as a
/// substring of the lowercased message text plus author.
pub const TAG_KEYWORDS: &[(Tag, &[&str])] = &[
    (Tag::Design, &["design", "дизайн", "ux", "ui"]),
    (Tag::Product, &["product", "продакт", "продукт"]),
    (Tag::Management, &["team", "тимлид", "команд"]),
];

/// Tags for a message, sorted and without repeats.
pub fn classify(text: &str, author: &str) -> Vec<Tag> {
    let haystack = format!("{text} {author}").to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(tag, _)| *tag)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
