use async_trait::async_trait;

use crate::{QuestionBank, ResponseRecord, SourceError, StoreError};

/// Supplies the fixed, ordered questionnaire.
///
/// The question list is not user-editable; implementations return the same
/// bank on every call unless their backing data changes.
pub trait QuestionSource: Send + Sync {
    /// Load the current question bank.
    fn load(&self) -> Result<QuestionBank, SourceError>;
}

/// Persists response records and lists them back.
///
/// Records are append-only. Concurrent inserts from independent sessions
/// must be safe; implementations get this from the backing store.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Short name of the backend, used in logs and health output.
    fn label(&self) -> &'static str;

    /// Persist a record.
    async fn insert(&self, record: &ResponseRecord) -> Result<(), StoreError>;

    /// All records, newest first (timestamp descending).
    async fn list_newest_first(&self) -> Result<Vec<ResponseRecord>, StoreError>;
}
