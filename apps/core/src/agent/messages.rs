use tokio::sync::oneshot;

use crate::error::AppError;
use crate::models::ComposedReply;

/// Messages that can be sent to the orchestrator actor.
#[derive(Debug)]
pub enum AgentMessage {
    /// A request to answer a user's message.
    Answer {
        user_id: String,
        message: String,
        /// A channel to send the composed reply back.
        responder: oneshot::Sender<Result<ComposedReply, AppError>>,
    },
    /// A request to reload the knowledge base and rebuild the index.
    /// The swap is atomic from the requesters' perspective: the actor
    /// owns the engine, so no request ever observes a half-built index.
    Reload {
        /// A channel to send the new entry count back.
        responder: oneshot::Sender<Result<usize, AppError>>,
    },
    /// A command to shut down the orchestrator.
    #[allow(dead_code)]
    Shutdown,
}
