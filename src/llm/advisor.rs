use crate::collaborators::{AdviceLine, AdviceProvider, ADVICE_EMPTY, ADVICE_UNAVAILABLE};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{advice_prompt, SYSTEM_PROMPT_ADVICE};
use crate::llm::types::Content;
use async_trait::async_trait;
use log::warn;

pub struct GeminiAdvisor {
    client: GeminiClient,
    model: String,
}

impl GeminiAdvisor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl AdviceProvider for GeminiAdvisor {
    async fn advise(&self, lines: &[AdviceLine]) -> String {
        let data = match serde_json::to_string(lines) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not serialize advice request: {}", e);
                return ADVICE_UNAVAILABLE.to_string();
            }
        };

        let result = self
            .client
            .generate_content(
                &self.model,
                Some(SYSTEM_PROMPT_ADVICE),
                vec![Content::user(advice_prompt(&data))],
                None,
            )
            .await;

        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => ADVICE_EMPTY.to_string(),
            Err(e) => {
                warn!("Gemini advice error: {}", e);
                ADVICE_UNAVAILABLE.to_string()
            }
        }
    }
}
