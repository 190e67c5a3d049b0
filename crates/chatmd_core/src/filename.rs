use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on a title stem, counted in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Longest filename, extension included, most filesystems accept.
pub const MAX_FILENAME_BYTES: usize = 255;

// Keycaps first so the base digit goes with its combining marks; then
// pictographs, skin tones, flags, tag sequences, joiners and presentation selectors.
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[0-9#*]\x{FE0F}?\x{20E3}",
        r"|[\p{Extended_Pictographic}\x{1F3FB}-\x{1F3FF}\x{1F1E6}-\x{1F1FF}\x{E0020}-\x{E007F}\x{200D}\x{FE0F}\x{20E3}]",
    ))
    .expect("valid emoji regex")
});

/// Remove emoji glyphs (including modifiers and joiners) from `input`.
pub fn strip_emoji(input: &str) -> String {
    EMOJI_RE.replace_all(input, "").into_owned()
}

/// Filename stem for a document title: emoji removed, path-hostile characters
/// replaced, trailing punctuation dropped, whitespace collapsed and the result
/// bounded to [`MAX_TITLE_CHARS`] at a word boundary.
///
/// Markdown emphasis that survives the character rules (backticks, underscores)
/// stays in the stem. An empty return means the text carries no usable title.
pub fn normalize_title(input: &str) -> String {
    let without_emoji = strip_emoji(input);
    let replaced: String = without_emoji
        .chars()
        .map(|c| if is_forbidden(c) { ' ' } else { c })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut title = strip_trailing_punctuation(&collapsed).to_string();

    if title.chars().count() > MAX_TITLE_CHARS {
        title = truncate_at_word(&title, MAX_TITLE_CHARS);
    }
    title
}

/// `{title}.{extension}`, with the title shortened at a word (or char)
/// boundary when the name would exceed [`MAX_FILENAME_BYTES`].
pub fn document_filename(title: &str, extension: &str) -> String {
    numbered_filename(title, "", extension)
}

/// `{title}{suffix}.{extension}` within [`MAX_FILENAME_BYTES`]; only the title
/// part is shortened.
pub fn numbered_filename(title: &str, suffix: &str, extension: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(suffix.len() + extension.len() + 1);
    let stem = fit_bytes(title, budget);
    format!("{stem}{suffix}.{extension}")
}

fn fit_bytes(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut cut = max_bytes;
    while !input.is_char_boundary(cut) {
        cut -= 1;
    }
    let prefix = &input[..cut];
    let at_word = match prefix.rfind(' ') {
        Some(space) if space > 0 && input[cut..].starts_with(|c: char| c != ' ') => {
            &prefix[..space]
        }
        _ => prefix,
    };
    match strip_trailing_punctuation(at_word) {
        "" => prefix,
        stripped => stripped,
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\n' | '\r'
    )
}

fn is_trailing_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':')
}

fn strip_trailing_punctuation(input: &str) -> &str {
    input.trim_end_matches(|c: char| is_trailing_punctuation(c) || c.is_whitespace())
}

fn truncate_at_word(input: &str, max_chars: usize) -> String {
    let cut = input
        .char_indices()
        .nth(max_chars)
        .map_or(input.len(), |(idx, _)| idx);
    let prefix = &input[..cut];
    let bounded = match prefix.rfind(' ') {
        Some(space) => &prefix[..space],
        None => prefix,
    };
    strip_trailing_punctuation(bounded).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn forbidden_characters_become_spaces() {
        assert_eq!(normalize_title("a<b>c:d\"e/f\\g|h?i*j"), "a b c d e f g h i j");
        assert_eq!(normalize_title("line one\r\nline two"), "line one line two");
    }

    #[test]
    fn trailing_punctuation_is_dropped_but_inner_kept() {
        assert_eq!(normalize_title("Hello, world!!!"), "Hello, world");
        assert_eq!(normalize_title("Wait... what;"), "Wait... what");
        assert_eq!(normalize_title("Done. "), "Done");
    }

    #[test]
    fn emoji_are_removed() {
        assert_eq!(normalize_title("🔥 Hot take 👍🏽"), "Hot take");
        assert_eq!(normalize_title("Family 👨‍👩‍👧 photo"), "Family photo");
        assert_eq!(normalize_title("Step 1️⃣ begins"), "Step begins");
        assert_eq!(normalize_title("Trip 🇩🇪 notes"), "Trip notes");
    }

    #[test]
    fn plain_digits_and_symbols_are_not_emoji() {
        assert_eq!(strip_emoji("Top 10 # tips"), "Top 10 # tips");
    }

    #[test]
    fn long_titles_back_off_to_word_boundary() {
        let word = "abcdefghi";
        let input = vec![word; 15].join(" ");
        let out = normalize_title(&input);
        assert!(out.chars().count() <= MAX_TITLE_CHARS);
        assert!(out.split(' ').all(|w| w == word));
        assert_eq!(out.split(' ').count(), 10);
    }

    #[test]
    fn long_title_without_spaces_is_cut_on_char_boundary() {
        let input = "ж".repeat(150);
        let out = normalize_title(&input);
        assert_eq!(out.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn wide_titles_fit_filename_byte_limit() {
        let title = normalize_title(&"设".repeat(150));
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);

        let name = document_filename(&title, "md");
        assert!(name.len() <= MAX_FILENAME_BYTES);
        assert_eq!(name, format!("{}.md", "设".repeat(84)));
    }

    #[test]
    fn byte_limit_backs_off_to_word_boundary() {
        let title = vec!["дизайн"; 30].join(" ");
        let name = document_filename(&title, "md");
        assert!(name.len() <= MAX_FILENAME_BYTES);
        let stem = name.strip_suffix(".md").unwrap();
        assert!(stem.split(' ').all(|w| w == "дизайн"));
    }

    #[test]
    fn numbered_suffix_survives_shortening() {
        let title = "设".repeat(100);
        let name = numbered_filename(&title, "_12", "md");
        assert!(name.len() <= MAX_FILENAME_BYTES);
        assert!(name.ends_with("_12.md"));
    }

    #[test]
    fn short_titles_are_untouched() {
        assert_eq!(document_filename("Great design tips", "md"), "Great design tips.md");
    }

    #[test]
    fn empty_and_symbol_only_input_yield_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("  ?? ** \n"), "");
        assert_eq!(normalize_title("🎉🎉"), "");
    }
}
