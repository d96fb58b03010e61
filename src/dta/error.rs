use std::io;
use std::path::PathBuf;
use thiserror::Error;


/// Everything that can stop an archive from loading.
///
/// Dangling references and unknown tags never show up here, the dispatcher
/// absorbs them and only counts them in `LoadStats`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open archive {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: io::Error,
    },

    #[error("read past end of archive at offset {offset:#x} (need {need} bytes, archive is {len:#x} bytes)")]
    OutOfBounds {
        offset: u64,
        need: u64,
        len: u64,
    },

    #[error("chunk {tag} at offset {offset:#x} does not advance the cursor (target {target:#x})")]
    Stalled {
        tag: &'static str,
        offset: u64,
        target: u64,
    },

    #[error("palette {path:?} must be exactly 1024 bytes, found {found}")]
    Palette {
        path: PathBuf,
        found: usize,
    },

    #[error("failed to export {what}: {message}")]
    Export {
        what: String,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// true for the errors a resync scan treats as a plain end of stream
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::OutOfBounds { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
