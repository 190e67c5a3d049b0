use std::path::PathBuf;

use chatmd_core::{
    classify, collapse_blank_lines, derive_title, parse_export_date, DuplicatePolicy,
    OutputDocument, RunState, SkipReason,
};
use chatmd_logging::{chatmd_debug, chatmd_info};

use crate::convert::RichTextConverter;
use crate::error::ExportError;
use crate::extract::{load_source, MessageRecord, SourceDocument};
use crate::persist::{AtomicFileWriter, DocumentSink, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub extension: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("telegram_messages"),
            extension: "md".to_string(),
            duplicate_policy: DuplicatePolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped_empty: usize,
    pub skipped_untitled: usize,
    pub skipped_duplicate: usize,
}

impl RunSummary {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::EmptyBody => self.skipped_empty += 1,
            SkipReason::NoTitle => self.skipped_untitled += 1,
            SkipReason::DuplicateFilename => self.skipped_duplicate += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Emit {
        filename: String,
        title: String,
        document: OutputDocument,
    },
    Skip(SkipReason),
}

/// Walks message records in document order. Holds the only state shared
/// between messages: used filenames and the carried-forward author.
#[derive(Debug)]
pub struct MessagePipeline {
    extension: String,
    duplicate_policy: DuplicatePolicy,
    converter: RichTextConverter,
    state: RunState,
    summary: RunSummary,
}

impl MessagePipeline {
    pub fn new(settings: &ExportSettings) -> Self {
        Self {
            extension: settings.extension.clone(),
            duplicate_policy: settings.duplicate_policy,
            converter: RichTextConverter::new(),
            state: RunState::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Decide what one record becomes. Claims the filename on success, so the
    /// caller must write every `Emit` it receives.
    pub fn process(&mut self, record: &MessageRecord<'_>) -> RecordOutcome {
        let outcome = self.process_inner(record);
        if let RecordOutcome::Skip(reason) = &outcome {
            self.summary.record_skip(*reason);
        }
        outcome
    }

    fn process_inner(&mut self, record: &MessageRecord<'_>) -> RecordOutcome {
        let body = match record.body {
            Some(body) if !record.has_empty_body() => body,
            _ => return RecordOutcome::Skip(SkipReason::EmptyBody),
        };

        let author = self.state.last_author.resolve(record.author.as_deref());
        let raw = self.converter.convert(body);
        let markdown = collapse_blank_lines(&raw);
        let tags = classify(&markdown, &author);

        let Some(title) = derive_title(&raw) else {
            return RecordOutcome::Skip(SkipReason::NoTitle);
        };
        let date = record.date.as_deref().and_then(parse_export_date);

        let Some(filename) = self
            .state
            .filenames
            .claim(&title, &self.extension, self.duplicate_policy)
        else {
            return RecordOutcome::Skip(SkipReason::DuplicateFilename);
        };

        RecordOutcome::Emit {
            filename,
            title,
            document: OutputDocument {
                date,
                author,
                tags,
                body: markdown,
            },
        }
    }

    /// Process every message of `source`, writing emitted documents to `sink`.
    pub fn run_source(
        &mut self,
        source: &SourceDocument,
        sink: &dyn DocumentSink,
    ) -> Result<(), PersistError> {
        let messages = source.messages();
        chatmd_info!(
            "{:?} ({}): {} messages",
            source.path,
            source.encoding_label,
            messages.len()
        );
        for (index, record) in messages.iter().enumerate() {
            match self.process(record) {
                RecordOutcome::Emit {
                    filename, document, ..
                } => {
                    let path = sink.write_document(&filename, &document.render())?;
                    self.summary.converted += 1;
                    chatmd_debug!("message {} -> {:?}", index, path);
                }
                RecordOutcome::Skip(reason) => {
                    chatmd_debug!("message {} skipped: {}", index, reason);
                }
            }
        }
        Ok(())
    }
}

/// Convert every source, in order, into `settings.output_dir`.
///
/// All sources are loaded before the output directory is touched, so an
/// unreadable source leaves nothing behind.
pub fn export_sources(
    sources: &[PathBuf],
    settings: &ExportSettings,
) -> Result<RunSummary, ExportError> {
    let documents = sources
        .iter()
        .map(|path| load_source(path))
        .collect::<Result<Vec<_>, _>>()?;

    let writer = AtomicFileWriter::create(settings.output_dir.clone())?;
    chatmd_info!("Writing documents to {:?}", writer.dir());

    let mut pipeline = MessagePipeline::new(settings);
    for document in &documents {
        pipeline.run_source(document, &writer)?;
    }

    let summary = pipeline.summary();
    chatmd_info!(
        "converted={} empty={} untitled={} duplicate={}",
        summary.converted,
        summary.skipped_empty,
        summary.skipped_untitled,
        summary.skipped_duplicate
    );
    Ok(summary)
}
