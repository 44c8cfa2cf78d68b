//! services/api/src/adapters/vision_llm.rs
//!
//! This module contains the adapter for the vision-capable chat model that
//! reads a dating-profile screenshot and suggests an opener. It implements
//! the `ImageAnalysisService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are Wingman, a warm and witty dating and relationship coach.

The user will share a screenshot of someone's dating profile and may add a note about what they want.

Your role:
- Study the photos, bio, prompts and interests visible in the screenshot.
- Suggest a conversation opener that refers to something specific from the profile.
- Keep it light, genuine and respectful. No pickup lines, no negging, nothing explicit.
- If the user asked for something specific (tone, length, language), follow it.
- If the image is not a dating profile or is unreadable, say so kindly and ask for a clearer screenshot.

Style:
- Reply with the opener first, then at most two short tips on how to keep the conversation going.
- Sound like a friend giving advice, not a textbook."#;

const MAX_TOKENS: u32 = 1000;

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use wingman_core::domain::InferenceResponse;
use wingman_core::ports::{ImageAnalysisService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ImageAnalysisService` using an OpenAI-compatible chat model.
#[derive(Clone)]
pub struct OpenAiVisionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiVisionAdapter {
    /// Creates a new `OpenAiVisionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// The chat completion body: fixed coach instructions, then one user turn
    /// holding the prompt text and the image inlined as a data URL.
    fn build_request(&self, image_base64: &str, prompt: &str) -> Value {
        let image_url = format!("data:image/jpeg;base64,{}", image_base64);
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTIONS },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        {
                            "type": "image_url",
                            "image_url": { "url": image_url }
                        }
                    ]
                }
            ],
            "max_tokens": MAX_TOKENS
        })
    }
}

//=========================================================================================
// `ImageAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageAnalysisService for OpenAiVisionAdapter {
    async fn analyze_image(
        &self,
        image_base64: &str,
        prompt: &str,
    ) -> PortResult<InferenceResponse> {
        let request = self.build_request(image_base64, prompt);

        // Untyped on both ends so the body reaches the caller exactly as the API sent it.
        let response: Value = self
            .client
            .chat()
            .create_byot(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        info!(model = %self.model, "Vision model answered");
        Ok(response)
    }
}
