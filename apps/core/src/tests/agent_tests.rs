//! Orchestrator actor tests with mock conversation stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::agent::{ConversationStore, EngineSettings, OrchestratorHandle, SqliteConversationStore};
use crate::brain::Intent;
use crate::error::AppError;
use crate::knowledge::KnowledgeBase;
use crate::models::FaqEntry;

// --- Mock Stores ---

#[derive(Default)]
struct RecordingStore {
    conversations: Mutex<Vec<(String, String, String)>>,
    metrics: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ConversationStore for RecordingStore {
    async fn save_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        _agent_response: &str,
        intent: &str,
    ) -> Result<(), AppError> {
        self.conversations.lock().unwrap().push((
            user_id.to_string(),
            user_message.to_string(),
            intent.to_string(),
        ));
        Ok(())
    }

    async fn increment_metric(&self, metric_name: &str, intent: &str) -> Result<(), AppError> {
        self.metrics
            .lock()
            .unwrap()
            .push((metric_name.to_string(), intent.to_string()));
        Ok(())
    }
}

struct FailingStore;

#[async_trait]
impl ConversationStore for FailingStore {
    async fn save_conversation(
        &self,
        _user_id: &str,
        _user_message: &str,
        _agent_response: &str,
        _intent: &str,
    ) -> Result<(), AppError> {
        Err(AppError::Internal("store is down".to_string()))
    }

    async fn increment_metric(&self, _metric_name: &str, _intent: &str) -> Result<(), AppError> {
        Err(AppError::Internal("store is down".to_string()))
    }
}

// --- Test Setup ---

fn test_kb() -> KnowledgeBase {
    let entries = vec![FaqEntry {
        id: "phishing-report".to_string(),
        question: "How do I report a phishing email?".to_string(),
        answer: "Use the report button and notify the security team.".to_string(),
        steps: vec!["Do not click links.".to_string()],
        keywords: vec!["phishing".to_string(), "report".to_string()],
        category: "phishing_incident".to_string(),
        escalation_contact: None,
    }];
    let tips = vec!["Tip A.".to_string(), "Tip B.".to_string()];
    KnowledgeBase::from_parts(entries, tips).unwrap()
}

// --- Tests ---

#[tokio::test]
async fn test_answer_nominal_and_logged() {
    let store = Arc::new(RecordingStore::default());
    let handle = OrchestratorHandle::spawn(
        test_kb(),
        None,
        Some(store.clone()),
        EngineSettings::default(),
        Some(1),
    );

    let reply = handle
        .answer("alice".to_string(), "I got a phishing email".to_string())
        .await
        .unwrap();

    assert_eq!(reply.intent, Intent::PhishingIncident);
    assert!(reply.message.starts_with("Use the report button"));
    assert!(!reply.tip.is_empty());

    let conversations = store.conversations.lock().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].0, "alice");
    assert_eq!(conversations[0].2, "phishing_incident");

    let metrics = store.metrics.lock().unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].0, "question_asked");
}

#[tokio::test]
async fn test_store_failure_never_blocks_reply() {
    let handle = OrchestratorHandle::spawn(
        test_kb(),
        None,
        Some(Arc::new(FailingStore)),
        EngineSettings::default(),
        Some(1),
    );

    let reply = handle
        .answer("alice".to_string(), "phishing email".to_string())
        .await
        .unwrap();

    // Log-and-continue: the broken store must not surface to the caller.
    assert_eq!(reply.intent, Intent::PhishingIncident);
}

#[tokio::test]
async fn test_answer_without_store() {
    let handle = OrchestratorHandle::spawn::<SqliteConversationStore>(
        test_kb(),
        None,
        None,
        EngineSettings::default(),
        Some(1),
    );

    let reply = handle
        .answer("alice".to_string(), "hello".to_string())
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::Greeting);
}

#[tokio::test]
async fn test_unknown_input_gets_fallback_reply() {
    let handle = OrchestratorHandle::spawn::<SqliteConversationStore>(
        test_kb(),
        None,
        None,
        EngineSettings::default(),
        Some(1),
    );

    let reply = handle
        .answer("alice".to_string(), "asdkjasdk random text".to_string())
        .await
        .unwrap();

    assert_eq!(reply.intent, Intent::Unknown);
    assert!(reply.suggestions.is_empty());
    assert!(reply.steps.is_empty());
}

#[tokio::test]
async fn test_seeded_rng_pins_tip_selection() {
    let first = OrchestratorHandle::spawn::<SqliteConversationStore>(
        test_kb(),
        None,
        None,
        EngineSettings::default(),
        Some(42),
    );
    let second = OrchestratorHandle::spawn::<SqliteConversationStore>(
        test_kb(),
        None,
        None,
        EngineSettings::default(),
        Some(42),
    );

    let a = first.answer("u".to_string(), "hello".to_string()).await.unwrap();
    let b = second.answer("u".to_string(), "hello".to_string()).await.unwrap();

    assert_eq!(a.tip, b.tip);
}

#[tokio::test]
async fn test_reload_without_path_fails() {
    let handle = OrchestratorHandle::spawn::<SqliteConversationStore>(
        test_kb(),
        None,
        None,
        EngineSettings::default(),
        Some(1),
    );

    let err = handle.reload().await.unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[tokio::test]
async fn test_reload_swaps_knowledge_base() {
    let dir = tempfile::tempdir().unwrap();
    let kb_path = dir.path().join("kb.yaml");

    let v1 = r#"
faq:
  - id: mfa-what
    question: "What is MFA?"
    answer: "A second proof of identity."
    keywords: ["mfa"]
    category: mfa
tips: ["Tip."]
"#;
    std::fs::write(&kb_path, v1).unwrap();

    let kb = KnowledgeBase::load(&kb_path).unwrap();
    let handle = OrchestratorHandle::spawn::<SqliteConversationStore>(
        kb,
        Some(kb_path.clone()),
        None,
        EngineSettings::default(),
        Some(1),
    );

    // Not in the v1 corpus and not a keyword intent hit above threshold.
    let before = handle
        .answer("u".to_string(), "how do i connect to the vpn".to_string())
        .await
        .unwrap();
    assert!(before.message.contains("VPN protects"));

    let v2 = r#"
faq:
  - id: mfa-what
    question: "What is MFA?"
    answer: "A second proof of identity."
    keywords: ["mfa"]
    category: mfa
  - id: vpn-connect
    question: "How do I connect to the VPN?"
    answer: "Install the client from the IT portal."
    steps: ["Download the client."]
    keywords: ["vpn", "connect"]
    category: vpn
tips: ["Tip."]
"#;
    std::fs::write(&kb_path, v2).unwrap();

    let count = handle.reload().await.unwrap();
    assert_eq!(count, 2);

    let after = handle
        .answer("u".to_string(), "how do i connect to the vpn".to_string())
        .await
        .unwrap();
    assert_eq!(after.message, "Install the client from the IT portal.");
}

#[tokio::test]
async fn test_reload_failure_keeps_previous_engine() {
    let dir = tempfile::tempdir().unwrap();
    let kb_path = dir.path().join("kb.yaml");
    std::fs::write(
        &kb_path,
        r#"
faq:
  - id: mfa-what
    question: "What is MFA?"
    answer: "A second proof of identity."
    keywords: ["mfa"]
    category: mfa
tips: ["Tip."]
"#,
    )
    .unwrap();

    let kb = KnowledgeBase::load(&kb_path).unwrap();
    let handle = OrchestratorHandle::spawn::<SqliteConversationStore>(
        kb,
        Some(kb_path.clone()),
        None,
        EngineSettings::default(),
        Some(1),
    );

    // Corrupt the file: the reload must fail and the old corpus must keep
    // serving.
    std::fs::write(&kb_path, "faq: [ {id: broken").unwrap();
    assert!(handle.reload().await.is_err());

    let reply = handle
        .answer("u".to_string(), "what is mfa".to_string())
        .await
        .unwrap();
    assert_eq!(reply.message, "A second proof of identity.");
}
