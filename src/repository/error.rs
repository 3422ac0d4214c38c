use thiserror::Error;

use crate::context::Interrupted;
use crate::store::StoreError;

/// Error type for repository operations. Every variant carries the name of
/// the operation that failed (e.g. `repository.get_one`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The store adapter failed.
    #[error("{op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
    /// No record, or an inactive record read through an active-only lookup.
    #[error("{op}: not found: {collection}/{id}")]
    NotFound {
        op: &'static str,
        collection: String,
        id: String,
    },
    /// The caller's context was cancelled before the store call completed.
    #[error("{op}: cancelled")]
    Cancelled { op: &'static str },
    /// The caller's context deadline passed before the store call completed.
    #[error("{op}: deadline exceeded")]
    DeadlineExceeded { op: &'static str },
    /// Rejected before reaching the store.
    #[error("{op}: invalid argument: {message}")]
    InvalidArgument { op: &'static str, message: String },
}

impl RepositoryError {
    /// Wrap an adapter error. Adapter `NotFound` becomes `RepositoryError::NotFound`.
    pub(crate) fn from_store(op: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => RepositoryError::NotFound {
                op,
                collection,
                id,
            },
            other => RepositoryError::Store { op, source: other },
        }
    }

    pub(crate) fn interrupted(op: &'static str, reason: Interrupted) -> Self {
        match reason {
            Interrupted::Cancelled => RepositoryError::Cancelled { op },
            Interrupted::DeadlineExceeded => RepositoryError::DeadlineExceeded { op },
        }
    }

    /// The operation that failed.
    pub fn op(&self) -> &'static str {
        match self {
            RepositoryError::Store { op, .. }
            | RepositoryError::NotFound { op, .. }
            | RepositoryError::Cancelled { op }
            | RepositoryError::DeadlineExceeded { op }
            | RepositoryError::InvalidArgument { op, .. } => op,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    /// Cancelled or past the deadline.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RepositoryError::Cancelled { .. } | RepositoryError::DeadlineExceeded { .. }
        )
    }
}
