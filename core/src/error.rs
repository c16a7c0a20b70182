use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Data format error in row {row}, field '{field}': {message}")]
    DataFormat {
        row: usize,
        field: String,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(
        "Sync of {entity} stopped at '{failed}' after {} committed upserts [{}]: {source}",
        .committed.len(),
        .committed.join(", ")
    )]
    SyncIncomplete {
        entity: &'static str,
        committed: Vec<String>,
        failed: String,
        #[source]
        source: Box<AnalyticsError>,
    },

    #[error("Insufficient data: need at least {required} records, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalyticsError {
    pub fn data_format(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self::DataFormat {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for failures raised at the store boundary.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::SyncIncomplete { .. })
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
