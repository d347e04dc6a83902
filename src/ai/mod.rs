//! Boundary with the external AI collaborator
//!
//! The engine never talks to a model directly. It hands a [`AiCaller`] the
//! two-message exchange built by [`build_locate_messages`] (or its extract
//! and assert counterparts) and receives the parsed JSON answer, which
//! [`AiResponse::from_value`] classifies for locate calls.

pub mod prompt;
pub mod response;
pub mod types;

pub use prompt::{
    build_assert_messages, build_extract_messages, build_locate_messages, find_element_prompt,
    system_prompt_to_locate_element,
};
pub use response::{
    AiElementRef, AiResponse, AssertionResponse, ElementListResponse, ExtractResponse, assertion_response_schema,
    element_response_schema, extract_response_schema,
};
pub use types::{AiActionType, AiCallResponse, ChatMessage, ContentPart, ImageUrl, MessageContent};

use crate::error::Result;
use async_trait::async_trait;

/// Invokes a model and returns its parsed JSON answer
///
/// Implementations own transport, schema enforcement and retries.
#[async_trait]
pub trait AiCaller: Send + Sync {
    async fn call(&self, messages: Vec<ChatMessage>, action: AiActionType) -> Result<AiCallResponse>;
}

#[async_trait]
impl<T: AiCaller + ?Sized> AiCaller for std::sync::Arc<T> {
    async fn call(&self, messages: Vec<ChatMessage>, action: AiActionType) -> Result<AiCallResponse> {
        (**self).call(messages, action).await
    }
}
