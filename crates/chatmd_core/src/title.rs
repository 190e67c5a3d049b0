use chrono::NaiveDate;

use crate::filename::normalize_title;

/// A line at least this many characters long is preferred as the title line.
pub const MIN_MEANINGFUL_CHARS: usize = 10;

const EXPORT_DATE_FORMAT: &str = "%d.%m.%Y";

/// First trimmed line of at least [`MIN_MEANINGFUL_CHARS`] characters, falling
/// back to the first non-blank line. `None` when every line is blank.
pub fn meaningful_line(text: &str) -> Option<&str> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let first = lines.next()?;
    if first.chars().count() >= MIN_MEANINGFUL_CHARS {
        return Some(first);
    }
    Some(
        lines
            .find(|line| line.chars().count() >= MIN_MEANINGFUL_CHARS)
            .unwrap_or(first),
    )
}

/// Normalized title for converted message text, or `None` if the message has
/// nothing to name it by.
pub fn derive_title(markdown: &str) -> Option<String> {
    let line = meaningful_line(markdown)?;
    let title = normalize_title(line);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Parse the leading `DD.MM.YYYY` token of an export timestamp such as
/// `"15.03.2023 14:22:01 UTC+03:00"` into `YYYY-MM-DD`.
pub fn parse_export_date(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, EXPORT_DATE_FORMAT)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_first_long_line() {
        let text = "Hi\n\n   Here is the real topic   \nmore";
        assert_eq!(meaningful_line(text), Some("Here is the real topic"));
    }

    #[test]
    fn falls_back_to_first_non_blank_line() {
        assert_eq!(meaningful_line("\n  ok  \nyes\n"), Some("ok"));
        assert_eq!(meaningful_line(" \n\t\n"), None);
    }

    #[test]
    fn length_is_counted_in_characters() {
        // ten Cyrillic letters are twenty bytes but exactly ten characters
        assert_eq!(meaningful_line("да\nпривет мир"), Some("привет мир"));
    }

    #[test]
    fn title_from_symbol_only_line_is_none() {
        assert_eq!(derive_title("???"), None);
        assert_eq!(derive_title(""), None);
    }

    #[test]
    fn export_dates_parse_leading_token() {
        assert_eq!(
            parse_export_date("15.03.2023 14:22:01 UTC+03:00").as_deref(),
            Some("2023-03-15")
        );
        assert_eq!(parse_export_date("01.12.2021").as_deref(), Some("2021-12-01"));
    }

    #[test]
    fn other_date_formats_are_rejected() {
        assert_eq!(parse_export_date("2023-03-15 14:22"), None);
        assert_eq!(parse_export_date("31.02.2023"), None);
        assert_eq!(parse_export_date(""), None);
        assert_eq!(parse_export_date("15.03.2023x"), None);
    }
}
