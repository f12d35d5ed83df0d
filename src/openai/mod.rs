//! # OpenAI Integration Module
//!
//! Turns a listening history into short pieces of text through the chat
//! completions endpoint. The model is treated as an opaque function: one
//! request per reflection, fixed sampling parameters, and the first choice's
//! content is returned unchanged.

mod prompts;

pub use prompts::PromptKind;

use reqwest::{Client, StatusCode};

use crate::{
    error::{MelodyError, body_snippet},
    spotify::status_and_body,
    types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const MAX_TOKENS: u32 = 150;
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 1.0;
pub const FREQUENCY_PENALTY: f32 = 0.5;
pub const PRESENCE_PENALTY: f32 = 0.0;

/// Builds the chat completion request body for a reflection.
pub fn build_request(model: &str, kind: PromptKind, track_descriptions: &[String]) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: kind.build_prompt(track_descriptions),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        frequency_penalty: FREQUENCY_PENALTY,
        presence_penalty: PRESENCE_PENALTY,
    }
}

/// Asks the model for a reflection on the given tracks.
///
/// `track_descriptions` are lines of the form `"<track> by <artists>"`.
///
/// # Errors
///
/// - [`MelodyError::GenerationError`] for a non-200 answer, or a 200 answer
///   without any completion content
/// - [`MelodyError::Timeout`], [`MelodyError::Http`], [`MelodyError::Parse`]
///   for transport and decoding failures
pub async fn generate(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    kind: PromptKind,
    track_descriptions: &[String],
) -> Result<String, MelodyError> {
    let request = build_request(model, kind, track_descriptions);
    let response = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let (status, body) = status_and_body(response).await;
        return Err(MelodyError::GenerationError { status, body });
    }

    let body = response.text().await?;
    let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| MelodyError::GenerationError {
            status: StatusCode::OK.as_u16(),
            body: body_snippet(&body),
        })
}
