use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {path:?} as output directory: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("failed to write {filename:?}: {source}")]
    Write {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Where finished documents go.
pub trait DocumentSink {
    fn write_document(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError>;
}

/// Writes each document next to its final name and renames it into place, so
/// an interrupted run never leaves a half-written markdown file.
#[derive(Debug)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    /// Create `dir` if needed and check that files can be created in it.
    pub fn create(dir: PathBuf) -> Result<Self, PersistError> {
        let unusable = |reason: String| PersistError::OutputDir {
            path: dir.clone(),
            reason,
        };
        match fs::metadata(&dir) {
            Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".into())),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&dir).map_err(|e| unusable(e.to_string()))?;
            }
            Err(err) => return Err(unusable(err.to_string())),
        }
        NamedTempFile::new_in(&dir).map_err(|e| unusable(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_atomically(&self, target: &Path, content: &str) -> io::Result<()> {
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_bytes())?;
        staged.as_file_mut().sync_all()?;
        if target.exists() {
            fs::remove_file(target)?;
        }
        staged.persist(target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl DocumentSink for AtomicFileWriter {
    fn write_document(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        self.write_atomically(&target, content)
            .map_err(|source| PersistError::Write {
                filename: filename.to_string(),
                source,
            })?;
        Ok(target)
    }
}
