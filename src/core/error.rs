use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable store could not be opened, read or written.
    #[error("persistence failure: {0:#}")]
    Persistence(#[source] anyhow::Error),

    #[error("no project with id {0}")]
    NotFound(Uuid),

    #[error("no project at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("corrupt project record {id:?}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<crate::core::db::CorruptRow>() {
            Ok(row) => StoreError::CorruptRecord {
                id: row.id,
                reason: row.reason,
            },
            Err(err) => StoreError::Persistence(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
