//! # Brain Module
//!
//! The matching engine of CyberGuard. Analyzes user input without any ML
//! model: rule-based intent detection plus TF-IDF retrieval over the FAQ
//! corpus, merged into a structured reply.
//!
//! ## Components
//! - `text`: shared normalization and tokenization (build and query paths
//!   must match exactly)
//! - `intent`: ordered keyword-table intent detection (first-match-wins)
//! - `semantic`: TF-IDF vector space with cosine-similarity ranking
//! - `composer`: threshold-gated reply composition with fallbacks

pub mod composer;
pub mod intent;
pub mod semantic;
pub mod text;

pub use composer::ResponseComposer;
pub use intent::{Intent, IntentDetector};
pub use semantic::{MatchResult, SemanticIndex};
