//! services/api/src/adapters/echo.rs
//!
//! The default chat responder used when no LLM key is configured. It simply
//! echoes the prompt back with a fixed prefix.

use async_trait::async_trait;
use health_tracker_core::{
    domain::ChatMessage,
    ports::{ChatResponder, PortResult},
};

pub const ECHO_PREFIX: &str = "AI response: ";

#[derive(Clone, Default)]
pub struct EchoResponder;

#[async_trait]
impl ChatResponder for EchoResponder {
    async fn respond(&self, _history: &[ChatMessage], prompt: &str) -> PortResult<String> {
        Ok(format!("{}{}", ECHO_PREFIX, prompt))
    }
}
