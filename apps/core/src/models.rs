use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::brain::intent::Intent;

/// A single FAQ entry in the knowledge base.
///
/// Entries are deserialized from the YAML source at startup and are immutable
/// for the lifetime of the loaded knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaqEntry {
    /// Stable, unique identifier for the entry.
    #[validate(length(min = 1))]
    pub id: String,
    /// The canonical question this entry answers.
    #[validate(length(min = 1))]
    pub question: String,
    /// The explanation shown as the primary answer text.
    #[validate(length(min = 1))]
    pub answer: String,
    /// Ordered remediation steps.
    #[serde(default)]
    pub steps: Vec<String>,
    /// Normalized keyword tokens that enrich the searchable text.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// The intent/category label this entry belongs to.
    #[validate(length(min = 1))]
    pub category: String,
    /// Optional escalation contact (e.g., the security team mailbox).
    #[serde(default)]
    pub escalation_contact: Option<String>,
}

/// A related-question suggestion attached to a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// The canonical question text of the suggested entry.
    pub question: String,
    /// Cosine similarity score in [0, 1].
    pub score: f32,
}

/// The structured reply returned for every user message.
///
/// Constructed fresh per request and never persisted by the core; the
/// conversation logger only stores a summary of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedReply {
    /// The detected intent label.
    pub intent: Intent,
    /// The primary answer text.
    pub message: String,
    /// Ordered remediation steps (may be empty).
    pub steps: Vec<String>,
    /// Related-question suggestions, best first (may be empty).
    pub suggestions: Vec<Suggestion>,
    /// One randomly selected security tip.
    pub tip: String,
    /// Optional follow-up question for guided flows.
    pub follow_up: Option<String>,
}

/// A logged conversation turn.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// The unique identifier for the turn.
    pub id: i64,
    /// The ID of the user who sent the message.
    pub user_id: String,
    /// The raw user message.
    pub user_message: String,
    /// A summary of the agent reply (primary answer text).
    pub agent_response: String,
    /// The detected intent label, as text.
    pub intent: String,
    /// Unix timestamp of when the turn was logged.
    pub created_at: i64,
}

/// An aggregated awareness metric row.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MetricCount {
    /// The metric name (e.g., "question_asked").
    pub metric_name: String,
    /// The intent label the metric was scoped to ("" for unscoped).
    pub intent: String,
    /// Number of recorded occurrences.
    pub count: i64,
}

/// Inbound chat request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// The free-text user message. An empty message is well-formed and
    /// resolves to the unknown-intent reply, so only an upper bound applies.
    #[validate(length(max = 4000))]
    pub message: String,
    /// Optional user identifier; defaults to "anonymous".
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Outbound chat response payload.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The user ID the reply was addressed to.
    pub id: String,
    /// The detected intent label.
    pub intent: Intent,
    /// The primary answer text.
    pub response: String,
    /// Ordered remediation steps.
    pub steps: Vec<String>,
    /// Related-question suggestions.
    pub suggestions: Vec<Suggestion>,
    /// The attached security tip.
    pub tip: String,
    /// Optional follow-up question.
    pub follow_up: Option<String>,
}

impl ChatResponse {
    /// Build the wire response from a composed reply.
    pub fn from_reply(user_id: String, reply: ComposedReply) -> Self {
        Self {
            id: user_id,
            intent: reply.intent,
            response: reply.message,
            steps: reply.steps,
            suggestions: reply.suggestions,
            tip: reply.tip,
            follow_up: reply.follow_up,
        }
    }
}
