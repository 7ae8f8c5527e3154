use hostdb_common::FormatError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unparsable MAC or IP address.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The database file (or a legacy line) does not have the expected structure.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("record index {index} is out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("merge needs at least one record index")]
    NothingToMerge,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode database: {0}")]
    Encode(#[from] serde_json::Error),
}
