use crate::models::{Conversation, MetricCount};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Initialize the SQLite pool and create the schema if missing.
///
/// Pass `":memory:"` for an ephemeral database (used by tests).
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let db_url = if db_path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}", db_path)
    };

    info!("Initializing database at: {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    // Every pooled connection to ":memory:" is a distinct database, so the
    // ephemeral variant must stay on a single connection.
    let max_connections = if db_path == ":memory:" { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            user_message TEXT NOT NULL,
            agent_response TEXT NOT NULL,
            intent TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            metric_name TEXT NOT NULL,
            value INTEGER NOT NULL,
            intent TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

// --- Conversations ---

pub async fn save_conversation(
    pool: &SqlitePool,
    user_id: &str,
    user_message: &str,
    agent_response: &str,
    intent: &str,
) -> Result<Conversation, sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (user_id, user_message, agent_response, intent, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, user_message, agent_response, intent, created_at
        "#,
    )
    .bind(user_id)
    .bind(user_message)
    .bind(agent_response)
    .bind(intent)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn get_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, user_message, agent_response, intent, created_at
        FROM conversations
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

// --- Metrics ---

pub async fn increment_metric(
    pool: &SqlitePool,
    metric_name: &str,
    intent: &str,
) -> Result<(), sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO metrics (metric_name, value, intent, created_at)
        VALUES (?, 1, ?, ?)
        "#,
    )
    .bind(metric_name)
    .bind(intent)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_metrics_summary(pool: &SqlitePool) -> Result<Vec<MetricCount>, sqlx::Error> {
    sqlx::query_as::<_, MetricCount>(
        r#"
        SELECT metric_name, intent, COUNT(*) as count
        FROM metrics
        GROUP BY metric_name, intent
        ORDER BY metric_name, intent
        "#,
    )
    .fetch_all(pool)
    .await
}
