//! Chatmd engine: reads chat export documents and writes one markdown file per message.
mod convert;
mod decode;
mod error;
mod extract;
mod persist;
mod pipeline;

pub use convert::{RichNode, RichTextConverter};
pub use decode::{decode_source, DecodeError, DecodedSource};
pub use error::{ExportError, SourceError};
pub use extract::{extract_messages, load_source, MessageRecord, SourceDocument};
pub use persist::{AtomicFileWriter, DocumentSink, PersistError};
pub use pipeline::{export_sources, ExportSettings, MessagePipeline, RecordOutcome, RunSummary};
