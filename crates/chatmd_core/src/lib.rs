//! Chatmd core: pure text rules shared by the export pipeline.
//!
//! Nothing in this crate touches the filesystem or a parsed document; the
//! engine crate feeds it strings and writes what it returns.
mod document;
mod filename;
mod state;
mod tags;
mod title;

pub use document::{collapse_blank_lines, OutputDocument};
pub use filename::{
    document_filename, normalize_title, numbered_filename, strip_emoji, MAX_FILENAME_BYTES,
    MAX_TITLE_CHARS,
};
pub use state::{
    DuplicatePolicy, FilenameRegistry, LastAuthor, RunState, SkipReason, UNKNOWN_AUTHOR,
};
pub use tags::{classify, Tag, TAG_KEYWORDS};
pub use title::{derive_title, meaningful_line, parse_export_date, MIN_MEANINGFUL_CHARS};
