//! Ошибки конвейера предобработки

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("no data found under {dir} (expected batch*.dat files)")]
    NoDataFound { dir: PathBuf },

    #[error("{file}:{line}: malformed record: {detail}")]
    MalformedRecord {
        file: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("failed to load {file}")]
    PartialLoad {
        file: PathBuf,
        #[source]
        source: Box<PreprocessError>,
    },

    #[error("empty feature table")]
    EmptyTable,

    #[error("normalizer not fitted")]
    NotFitted,

    #[error("failed to write artifact {path}: {detail}")]
    Persistence { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("stage {stage} failed")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<PreprocessError>,
    },
}

impl PreprocessError {
    /// Привязка ошибки к этапу конвейера
    pub fn at_stage(stage: &'static str, source: PreprocessError) -> Self {
        Self::Stage {
            stage,
            source: Box::new(source),
        }
    }
}
