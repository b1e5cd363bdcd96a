use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::sqlite::SqlitePool;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};

use crate::agent::messages::AgentMessage;
use crate::agent::traits::{ConversationStore, SqliteConversationStore};
use crate::brain::{IntentDetector, ResponseComposer, SemanticIndex};
use crate::error::AppError;
use crate::knowledge::KnowledgeBase;
use crate::models::ComposedReply;

/// The knowledge base and its derived index, swapped as one unit.
struct Engine {
    kb: Arc<KnowledgeBase>,
    index: SemanticIndex,
}

impl Engine {
    fn build(kb: KnowledgeBase) -> Self {
        let index = SemanticIndex::build(kb.entries());
        Self {
            kb: Arc::new(kb),
            index,
        }
    }
}

/// Tuning knobs for the matching engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Minimum cosine similarity to trust a retrieved entry.
    pub min_confidence: f32,
    /// Maximum number of related-question suggestions per reply.
    pub max_suggestions: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.15,
            max_suggestions: 3,
        }
    }
}

/// A handle to the orchestrator actor.
///
/// This is the primary entry point for all business logic: it sequences
/// intent detection, semantic retrieval and reply composition, then logs
/// the exchange.
#[derive(Clone)]
pub struct OrchestratorHandle {
    sender: mpsc::Sender<AgentMessage>,
}

impl OrchestratorHandle {
    /// Creates the orchestrator with the production SQLite store.
    ///
    /// `kb_path` enables the reload operation; without it a reload request
    /// fails with a configuration error.
    pub fn new_with_pool(
        kb: KnowledgeBase,
        kb_path: Option<PathBuf>,
        pool: Option<SqlitePool>,
        settings: EngineSettings,
    ) -> Self {
        let store = pool.map(|p| Arc::new(SqliteConversationStore::new(p)));
        Self::spawn(kb, kb_path, store, settings, None)
    }

    /// Spawns the actor with an explicit store and optional RNG seed.
    ///
    /// Tests use this to inject mock stores and pin the tip draw.
    pub fn spawn<S: ConversationStore>(
        kb: KnowledgeBase,
        kb_path: Option<PathBuf>,
        store: Option<Arc<S>>,
        settings: EngineSettings,
        rng_seed: Option<u64>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let runner = OrchestratorRunner {
            receiver,
            engine: Engine::build(kb),
            detector: IntentDetector::new(),
            composer: ResponseComposer::new(settings.min_confidence, settings.max_suggestions),
            store,
            kb_path,
            rng,
            settings,
        };
        tokio::spawn(async move { runner.run().await });
        Self { sender }
    }

    /// Answers a user message.
    ///
    /// Always yields a reply object for well-formed input; "no match" and
    /// "unknown intent" are normal reply states, not errors.
    #[instrument(skip(self))]
    pub async fn answer(&self, user_id: String, message: String) -> Result<ComposedReply, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = AgentMessage::Answer {
            user_id,
            message,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Agent(e.to_string()))?;
        timeout(Duration::from_secs(10), recv)
            .await?
            .map_err(|e| AppError::Agent(e.to_string()))?
    }

    /// Reloads the knowledge base from disk and rebuilds the index.
    ///
    /// Returns the new entry count. On failure the previous engine stays
    /// in place.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<usize, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(AgentMessage::Reload { responder: send })
            .await
            .map_err(|e| AppError::Agent(e.to_string()))?;
        timeout(Duration::from_secs(30), recv)
            .await?
            .map_err(|e| AppError::Agent(e.to_string()))?
    }
}

// --- Actor Runner ---
struct OrchestratorRunner<S>
where
    S: ConversationStore,
{
    receiver: mpsc::Receiver<AgentMessage>,
    engine: Engine,
    detector: IntentDetector,
    composer: ResponseComposer,
    store: Option<Arc<S>>,
    kb_path: Option<PathBuf>,
    rng: StdRng,
    settings: EngineSettings,
}

impl<S> OrchestratorRunner<S>
where
    S: ConversationStore,
{
    async fn run(mut self) {
        info!("Orchestrator started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                AgentMessage::Answer {
                    user_id,
                    message,
                    responder,
                } => {
                    let reply = self.handle_answer(&user_id, &message).await;
                    let _ = responder.send(Ok(reply));
                }
                AgentMessage::Reload { responder } => {
                    let result = self.handle_reload();
                    if let Err(e) = &result {
                        error!("Knowledge base reload failed: {:?}", e);
                    }
                    let _ = responder.send(result);
                }
                AgentMessage::Shutdown => {
                    info!("Orchestrator shutting down...");
                    break;
                }
            }
        }
        info!("Orchestrator stopped");
    }

    /// Detection and retrieval both run over the same raw text; the
    /// composer merges their outputs.
    async fn handle_answer(&mut self, user_id: &str, message: &str) -> ComposedReply {
        let intent = self.detector.detect(message);
        // One extra result: the top match becomes the primary answer, the
        // rest become suggestions.
        let matches = self
            .engine
            .index
            .query(message, self.settings.max_suggestions + 1);
        let reply = self
            .composer
            .compose(intent, &matches, &self.engine.kb, &mut self.rng);

        info!(
            "Answered user={} intent={} matches={}",
            user_id,
            intent,
            matches.len()
        );

        // Log-and-continue: persistence failures never block the reply.
        if let Some(store) = &self.store {
            if let Err(e) = store
                .save_conversation(user_id, message, &reply.message, intent.label())
                .await
            {
                warn!("Failed to log conversation: {}", e);
            }
            if let Err(e) = store.increment_metric("question_asked", intent.label()).await {
                warn!("Failed to record metric: {}", e);
            }
        }

        reply
    }

    fn handle_reload(&mut self) -> Result<usize, AppError> {
        let path = self.kb_path.as_ref().ok_or_else(|| {
            AppError::Config("No knowledge base path configured for reload".to_string())
        })?;
        let kb = KnowledgeBase::load(path)?;
        let count = kb.entries().len();
        // Whole-engine swap: the new index only becomes visible once fully built.
        self.engine = Engine::build(kb);
        info!("Knowledge base reloaded: {} entries", count);
        Ok(count)
    }
}
