//! CyberGuard backend library.
//!
//! A small security-awareness assistant: rule-based intent detection plus
//! TF-IDF retrieval over a YAML knowledge base, served over HTTP with
//! SQLite conversation logging.

pub mod agent;
pub mod brain;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod knowledge;
pub mod models;

#[cfg(test)]
mod tests;
