use crate::collaborators::{ExtractionGuess, ExtractionRequest, PaymentExtractor};
use crate::error::{PlannerError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{extraction_prompt, SYSTEM_PROMPT_EXTRACTION};
use crate::llm::types::Content;
use crate::llm::utils::{card_list, clean_json_output, to_gemini_schema};
use crate::utils::format_iso_date;
use async_trait::async_trait;
use log::{info, warn};

pub struct GeminiPaymentExtractor {
    client: GeminiClient,
    model: String,
    system_prompt: String,
}

impl GeminiPaymentExtractor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: SYSTEM_PROMPT_EXTRACTION.to_string(),
        }
    }

    /// Replace the default instructions, e.g. for a card issuer with unusual notices.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn response_schema() -> Result<serde_json::Value> {
        let schema = serde_json::to_value(schemars::schema_for!(ExtractionGuess))?;
        Ok(to_gemini_schema(schema))
    }
}

pub fn parse_guess(raw: &str) -> Result<ExtractionGuess> {
    let guess: ExtractionGuess = serde_json::from_str(&clean_json_output(raw))
        .map_err(|e| PlannerError::Extraction(format!("Unusable model output: {}", e)))?;
    if !guess.amount.is_finite() || guess.amount < 0.0 {
        return Err(PlannerError::Extraction(format!(
            "Model returned invalid amount {}",
            guess.amount
        )));
    }
    Ok(guess)
}

#[async_trait]
impl PaymentExtractor for GeminiPaymentExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionGuess> {
        let prompt = extraction_prompt(
            &request.text,
            &card_list(&request.cards),
            &format_iso_date(request.today),
        );

        let raw = self
            .client
            .generate_content(
                &self.model,
                Some(&self.system_prompt),
                vec![Content::user(prompt)],
                Some(Self::response_schema()?),
            )
            .await
            .map_err(|e| {
                warn!("Gemini parse error: {}", e);
                e
            })?;

        let guess = parse_guess(&raw)?;
        info!(
            "Extracted amount {} (card {:?})",
            guess.amount, guess.card_id
        );
        Ok(guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guess() {
        let guess = parse_guess(r#"{"amount": 48200, "cardId": "2", "paymentDay": 10}"#).unwrap();
        assert_eq!(guess.amount, 48200.0);
        assert_eq!(guess.card_id.as_deref(), Some("2"));
        assert_eq!(guess.payment_day, Some(10));
    }

    #[test]
    fn test_parse_guess_rejects_unusable_output() {
        assert!(matches!(parse_guess("I could not find an amount."), Err(PlannerError::Extraction(_))));
        assert!(matches!(parse_guess(r#"{"amount": -5}"#), Err(PlannerError::Extraction(_))));
    }

    #[test]
    fn test_response_schema_requires_amount() {
        let schema = GeminiPaymentExtractor::response_schema().unwrap();
        assert_eq!(schema["type"], serde_json::json!("object"));
        assert_eq!(schema["required"], serde_json::json!(["amount"]));
    }
}
