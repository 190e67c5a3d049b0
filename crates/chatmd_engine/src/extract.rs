use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chatmd_logging::chatmd_info;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::decode::decode_source;
use crate::error::SourceError;

/// Selectors for a Telegram desktop HTML export. Service messages (date
/// separators, joins) lack the `default` class and are never selected.
struct MessageSelectors {
    message: Selector,
    body: Selector,
    author: Selector,
    date: Selector,
}

static SELECTORS: Lazy<MessageSelectors> = Lazy::new(|| MessageSelectors {
    message: Selector::parse(".message.default.clearfix").expect("valid message selector"),
    body: Selector::parse(".text").expect("valid body selector"),
    author: Selector::parse(".from_name").expect("valid author selector"),
    date: Selector::parse(".date").expect("valid date selector"),
});

/// One message element, in document order.
#[derive(Debug, Clone)]
pub struct MessageRecord<'a> {
    pub author: Option<String>,
    pub body: Option<ElementRef<'a>>,
    /// Raw `title` attribute of the date element, e.g. `15.03.2023 14:22:01 UTC+03:00`.
    pub date: Option<String>,
}

impl MessageRecord<'_> {
    /// True when there is no body, or the body holds only whitespace text.
    pub fn has_empty_body(&self) -> bool {
        self.body
            .map_or(true, |body| body.text().all(|chunk| chunk.trim().is_empty()))
    }
}

/// A loaded and parsed export file.
pub struct SourceDocument {
    pub path: PathBuf,
    pub encoding_label: String,
    pub html: Html,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("path", &self.path)
            .field("encoding_label", &self.encoding_label)
            .finish_non_exhaustive()
    }
}

impl SourceDocument {
    pub fn parse(path: impl Into<PathBuf>, html: &str) -> Self {
        Self {
            path: path.into(),
            encoding_label: "UTF-8".to_string(),
            html: Html::parse_document(html),
        }
    }

    pub fn messages(&self) -> Vec<MessageRecord<'_>> {
        extract_messages(&self.html)
    }
}

/// Read, decode and parse one export file.
pub fn load_source(path: &Path) -> Result<SourceDocument, SourceError> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        },
    })?;
    let decoded = decode_source(&bytes).map_err(|source| SourceError::Undecodable {
        path: path.to_path_buf(),
        source,
    })?;
    chatmd_info!("Loaded {:?} ({} bytes)", path, bytes.len());
    Ok(SourceDocument {
        path: path.to_path_buf(),
        encoding_label: decoded.encoding_label,
        html: Html::parse_document(&decoded.html),
    })
}

/// All content messages of a parsed export, in document order.
pub fn extract_messages(html: &Html) -> Vec<MessageRecord<'_>> {
    html.select(&SELECTORS.message)
        .map(|message| MessageRecord {
            author: message
                .select(&SELECTORS.author)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string()),
            body: message.select(&SELECTORS.body).next(),
            date: message
                .select(&SELECTORS.date)
                .next()
                .and_then(|el| el.value().attr("title"))
                .map(str::to_string),
        })
        .collect()
}
