//! Orchestrator actor.
//!
//! The handle/runner pair that sequences the brain components per request
//! and talks to the conversation store. The actor owns the knowledge base
//! and its index, so reloads swap both as one unit.

pub mod messages;
pub mod orchestrator;
pub mod traits;

pub use orchestrator::{EngineSettings, OrchestratorHandle};
pub use traits::{ConversationStore, SqliteConversationStore};
