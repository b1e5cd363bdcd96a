//! Knowledge base loading and validation.
//!
//! The FAQ entries and the tip list are loaded from a YAML source once at
//! startup (or on an explicit reload) and are immutable afterwards. A
//! malformed or empty source is fatal: the service must not come up with
//! a partial corpus.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::brain::text::tokenize;
use crate::error::AppError;
use crate::models::FaqEntry;

/// On-disk shape of the knowledge base file.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    faq: Vec<FaqEntry>,
    #[serde(default)]
    tips: Vec<String>,
}

/// Immutable, in-memory knowledge base.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
    tips: Vec<String>,
}

impl KnowledgeBase {
    /// Load and validate the knowledge base from a YAML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::KnowledgeBase(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file: KnowledgeFile = serde_yaml::from_str(&raw)?;
        let kb = Self::from_parts(file.faq, file.tips)?;
        info!(
            "Knowledge base loaded: {} entries, {} tips from {}",
            kb.entries.len(),
            kb.tips.len(),
            path.display()
        );
        Ok(kb)
    }

    /// Build a knowledge base from already-parsed parts, enforcing the
    /// load-time invariants.
    pub fn from_parts(entries: Vec<FaqEntry>, tips: Vec<String>) -> Result<Self, AppError> {
        if entries.is_empty() {
            return Err(AppError::KnowledgeBase(
                "Knowledge base contains no FAQ entries".to_string(),
            ));
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        for entry in &entries {
            entry.validate().map_err(|e| {
                AppError::KnowledgeBase(format!("Invalid entry '{}': {}", entry.id, e))
            })?;
            if !seen_ids.insert(entry.id.as_str()) {
                return Err(AppError::KnowledgeBase(format!(
                    "Duplicate entry id '{}'",
                    entry.id
                )));
            }
            // Every entry must contribute at least one vectorizable token,
            // otherwise it can never be retrieved.
            let searchable = format!("{} {}", entry.question, entry.keywords.join(" "));
            if tokenize(&searchable).is_empty() {
                return Err(AppError::KnowledgeBase(format!(
                    "Entry '{}' has no searchable tokens",
                    entry.id
                )));
            }
        }

        Ok(Self { entries, tips })
    }

    /// All FAQ entries in insertion order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// The entry at the given insertion index, if any.
    pub fn entry(&self, idx: usize) -> Option<&FaqEntry> {
        self.entries.get(idx)
    }

    /// The loaded security tips.
    pub fn tips(&self) -> &[String] {
        &self.tips
    }
}
