use std::path::PathBuf;

/// Errors produced while loading assets, reading or writing scenes, and
/// editing objects.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("sprite atlas has no slice named `{0}`")]
    UnknownSlice(String),
    #[error("asset id {id} is out of range (palette has {len} entries)")]
    InvalidAssetId { id: usize, len: usize },
    #[error("scene name is empty")]
    EmptySceneName,
    #[error("no object with id {0}")]
    UnknownObject(u32),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EngineError::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
