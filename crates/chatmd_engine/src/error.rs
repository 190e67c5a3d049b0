use std::io;
use std::path::PathBuf;

use crate::decode::DecodeError;
use crate::persist::PersistError;

/// Failure to obtain a usable source document. Always fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("the file {0:?} was not found")]
    NotFound(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path:?}: {source}")]
    Undecodable {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}
