//! Contracts for the two external services the planner talks to: a free-text payment
//! extractor and an advice writer. Concrete adapters live behind the `gemini` feature.

use crate::error::Result;
use crate::schema::Card;
use async_trait::async_trait;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Returned by advice providers when the service cannot be reached.
pub const ADVICE_UNAVAILABLE: &str = "AI advice is currently unavailable.";

/// Returned by advice providers when the service answered with nothing usable.
pub const ADVICE_EMPTY: &str = "Could not get advice for this schedule.";

/// Best-effort reading of a pasted payment notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionGuess {
    #[schemars(description = "The billed amount in whole currency units.")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "ID of the matching card from the provided list, or null if unknown.")]
    pub card_id: Option<String>,

    #[serde(default)]
    #[schemars(description = "Day of month the amount is debited, if stated.")]
    pub payment_day: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Month of the debit, 1 = January, if stated.")]
    pub payment_month: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Four digit year of the debit, if stated.")]
    pub payment_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRef {
    pub card_id: String,
    pub card_name: String,
}

impl From<&Card> for CardRef {
    fn from(card: &Card) -> Self {
        Self {
            card_id: card.id.clone(),
            card_name: card.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub text: String,
    pub cards: Vec<CardRef>,
    pub today: NaiveDate,
}

impl ExtractionRequest {
    pub fn new(text: impl Into<String>, cards: &[Card], today: NaiveDate) -> Self {
        Self {
            text: text.into(),
            cards: cards.iter().map(CardRef::from).collect(),
            today,
        }
    }
}

/// One account's line in the advice request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceLine {
    /// Holder-qualified label, e.g. `Sumitomo (self)`.
    pub bank_name: String,
    pub total_amount: u64,
    /// `YYYY-MM-DD`
    pub earliest_payment_date: String,
}

#[async_trait]
pub trait PaymentExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionGuess>;
}

/// Advice never fails from the caller's side: providers return a fallback text instead.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, lines: &[AdviceLine]) -> String;
}
