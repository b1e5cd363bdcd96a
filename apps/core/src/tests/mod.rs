//! Test Module
//!
//! Cross-component test suite for the CyberGuard backend.
//!
//! ## Test Categories
//! - `brain_tests`: detector + index + composer working together
//! - `database_tests`: conversation log and metrics CRUD
//! - `agent_tests`: orchestrator actor behavior, mocks, reload
//! - `http_tests`: router round trips over the full stack

pub mod agent_tests;
