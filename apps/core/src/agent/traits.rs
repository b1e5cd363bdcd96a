use crate::database;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

/// Defines the public interface for conversation persistence.
///
/// This trait abstracts the storage backend so the orchestrator can be
/// tested against mocks. A failing store must never fail the reply path:
/// the orchestrator logs and continues.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Persists one conversation turn.
    async fn save_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        agent_response: &str,
        intent: &str,
    ) -> Result<(), AppError>;

    /// Increments an awareness metric counter, scoped to an intent label.
    async fn increment_metric(&self, metric_name: &str, intent: &str) -> Result<(), AppError>;
}

/// Production store backed by the SQLite pool.
pub struct SqliteConversationStore {
    pool: SqlitePool,
}

impl SqliteConversationStore {
    /// Wrap an initialized pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn save_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        agent_response: &str,
        intent: &str,
    ) -> Result<(), AppError> {
        database::save_conversation(&self.pool, user_id, user_message, agent_response, intent)
            .await?;
        Ok(())
    }

    async fn increment_metric(&self, metric_name: &str, intent: &str) -> Result<(), AppError> {
        database::increment_metric(&self.pool, metric_name, intent).await?;
        Ok(())
    }
}
