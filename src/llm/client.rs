use crate::error::{PlannerError, Result};
use crate::llm::types::*;
use log::debug;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends one prompt and returns the first text part of the first candidate.
    ///
    /// With a `response_schema` the model is asked for JSON matching it.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        messages: Vec<Content>,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let generation_config = match response_schema {
            Some(schema) => GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
            },
            None => GenerationConfig {
                response_mime_type: None,
                response_schema: None,
            },
        };

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: system_prompt.map(Content::user),
            generation_config,
        };

        debug!("Calling Gemini model {}", model);
        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(PlannerError::Extraction(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        first_text(body)
    }
}

fn first_text(body: GenerateContentResponse) -> Result<String> {
    let part = body
        .candidates
        .ok_or_else(|| PlannerError::Extraction("No candidates returned".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::Extraction("Empty candidates list".to_string()))?
        .content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::Extraction("No parts in content".to_string()))?;

    match part {
        Part::Text { text } => Ok(text),
    }
}
