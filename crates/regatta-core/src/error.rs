use thiserror::Error;

/// Errors surfaced by the scoring and seeding operations.
#[derive(Error, Debug)]
pub enum RegattaError {
    #[error("Inconsistent input: {0}")]
    InputConsistency(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures raised by a [`RegattaStore`](crate::store::RegattaStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Integrity violation: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, RegattaError>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maximum length for detail text carried in error messages
const MAX_DETAIL_LENGTH: usize = 200;

impl RegattaError {
    /// Truncate a detail string so a long id list does not flood the log
    fn truncate_detail(detail: &str) -> String {
        if detail.len() <= MAX_DETAIL_LENGTH {
            detail.to_string()
        } else {
            let cut: String = detail.chars().take(MAX_DETAIL_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, detail.len())
        }
    }

    pub fn inconsistent(detail: impl AsRef<str>) -> Self {
        RegattaError::InputConsistency(Self::truncate_detail(detail.as_ref()))
    }

    pub fn not_found(what: &str, id: i64) -> Self {
        RegattaError::NotFound(format!("{} {}", what, id))
    }

    /// True for errors caused by the caller's data rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RegattaError::InputConsistency(_) | RegattaError::NotFound(_)
        )
    }
}
