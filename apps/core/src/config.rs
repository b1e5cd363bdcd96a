use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Runtime configuration, read once at startup from the environment
/// (with `.env` support).
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path to the knowledge base YAML file.
    pub kb_path: PathBuf,
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Minimum cosine similarity to trust a retrieved entry.
    pub min_confidence: f32,
    /// Maximum number of related-question suggestions per reply.
    pub max_suggestions: usize,
}

impl Config {
    /// Build the configuration from `CYBERGUARD_*` environment variables,
    /// falling back to development defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr = env::var("CYBERGUARD_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CYBERGUARD_BIND_ADDR: {}", e)))?;

        let kb_path = PathBuf::from(
            env::var("CYBERGUARD_KB_PATH")
                .unwrap_or_else(|_| "apps/core/data/knowledge_base.yaml".to_string()),
        );

        let db_path = env::var("CYBERGUARD_DB_PATH")
            .unwrap_or_else(|_| "apps/core/data/conversations.sqlite".to_string());

        let min_confidence = env::var("CYBERGUARD_MIN_CONFIDENCE")
            .unwrap_or_else(|_| "0.15".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CYBERGUARD_MIN_CONFIDENCE: {}", e)))?;

        let max_suggestions = env::var("CYBERGUARD_MAX_SUGGESTIONS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CYBERGUARD_MAX_SUGGESTIONS: {}", e)))?;

        Ok(Self {
            bind_addr,
            kb_path,
            db_path,
            min_confidence,
            max_suggestions,
        })
    }
}
