//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the health-assistant chat LLM.
//! It implements the `ChatResponder` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use health_tracker_core::{
    domain::{ChatMessage, ChatRole},
    ports::{ChatResponder, PortError, PortResult},
};

const SYSTEM_INSTRUCTIONS: &str = "You are the assistant of a personal health tracking app. \
You help users with healthy living, nutrition and fitness. Keep answers short and practical, \
and tailor suggestions to the user's goals when they mention them. You are not a doctor: \
for symptoms or medical conditions, suggest seeing a professional.";

/// Only the most recent messages are sent along as context.
const HISTORY_LIMIT: usize = 20;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatResponder` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn history_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
        let built: ChatCompletionRequestMessage = match message.role {
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        };
        Ok(built)
    }
}

//=========================================================================================
// `ChatResponder` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatResponder for OpenAiChatAdapter {
    /// Sends the system prompt, the recent history and the new prompt as one chat completion.
    async fn respond(&self, history: &[ChatMessage], prompt: &str) -> PortResult<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let recent = &history[history.len().saturating_sub(HISTORY_LIMIT)..];
        for message in recent {
            messages.push(Self::history_message(message)?);
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                PortError::Unexpected("Chat LLM response contained no text content.".to_string())
            })
    }
}
