use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RecsysError {
    #[error("dataset has no usable records")]
    EmptyDataset,

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failures reading the source dataset.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no '{column}' column (found: {found:?})")]
    MissingColumn {
        path: PathBuf,
        column: String,
        found: Vec<String>,
    },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("no .csv, .json or .jsonl files under {0}")]
    NoInputFiles(PathBuf),
}

pub type Result<T> = std::result::Result<T, RecsysError>;
