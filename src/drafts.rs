//! Partially filled card and payment forms. A draft only becomes a record through `build`,
//! which is the single validation gate in front of the persisted collections.

use crate::error::{PlannerError, Result};
use crate::schema::{Card, DaySetting, Payment, CARD_COLORS};
use crate::utils::YearMonth;
use uuid::Uuid;

pub const DEFAULT_OWNER: &str = "self";
pub const DEFAULT_CLOSING_DAY: u32 = 1;
pub const DEFAULT_PAYMENT_DAY: u32 = 27;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub name: Option<String>,
    pub bank_name: Option<String>,
    pub closing_day: Option<u32>,
    pub payment_day: Option<u32>,
    pub color: Option<String>,
    pub owner: Option<String>,
    pub payment_source_owner: Option<String>,
}

impl Default for CardDraft {
    fn default() -> Self {
        Self {
            name: None,
            bank_name: None,
            closing_day: Some(DEFAULT_CLOSING_DAY),
            payment_day: Some(DEFAULT_PAYMENT_DAY),
            color: Some(CARD_COLORS[0].to_string()),
            owner: Some(DEFAULT_OWNER.to_string()),
            payment_source_owner: Some(DEFAULT_OWNER.to_string()),
        }
    }
}

impl CardDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.bank_name = Some(bank_name.into());
        self
    }

    pub fn closing_day(mut self, day: u32) -> Self {
        self.closing_day = Some(day);
        self
    }

    pub fn payment_day(mut self, day: u32) -> Self {
        self.payment_day = Some(day);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Changing the card user leaves the account holder alone.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn payment_source_owner(mut self, holder: impl Into<String>) -> Self {
        self.payment_source_owner = Some(holder.into());
        self
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if non_empty(&self.name).is_none() {
            missing.push("name");
        }
        if non_empty(&self.bank_name).is_none() {
            missing.push("bank_name");
        }
        if self.closing_day.is_none() {
            missing.push("closing_day");
        }
        if self.payment_day.is_none() {
            missing.push("payment_day");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn build(&self) -> Result<Card> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PlannerError::IncompleteDraft(missing.join(", ")));
        }
        let (Some(name), Some(bank_name), Some(closing), Some(payment)) = (
            non_empty(&self.name),
            non_empty(&self.bank_name),
            self.closing_day,
            self.payment_day,
        ) else {
            return Err(PlannerError::IncompleteDraft("card fields".to_string()));
        };

        let owner = non_empty(&self.owner).unwrap_or(DEFAULT_OWNER).to_string();
        let holder = non_empty(&self.payment_source_owner)
            .map(str::to_string)
            .unwrap_or_else(|| owner.clone());

        Ok(Card {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            bank_name: bank_name.to_string(),
            closing_day: DaySetting::new(closing)?,
            payment_day: DaySetting::new(payment)?,
            color: non_empty(&self.color)
                .unwrap_or(CARD_COLORS[0])
                .to_string(),
            owner,
            payment_source_owner: Some(holder),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDraft {
    pub card_id: Option<String>,
    pub amount: Option<u64>,
    pub target: Option<YearMonth>,
    pub notes: Option<String>,
}

impl PaymentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_id(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// `month0` is 0-based.
    pub fn target(mut self, year: i32, month0: u32) -> Self {
        self.target = Some(YearMonth::new(year, month0));
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if non_empty(&self.card_id).is_none() {
            missing.push("card_id");
        }
        if !matches!(self.amount, Some(amount) if amount > 0) {
            missing.push("amount");
        }
        if self.target.is_none() {
            missing.push("target_month");
        }
        missing
    }

    /// Mirrors the form's commit button: enabled only once card, amount and month are set.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn build(&self) -> Result<Payment> {
        let (Some(card_id), Some(amount), Some(target)) =
            (non_empty(&self.card_id), self.amount, self.target)
        else {
            return Err(PlannerError::IncompleteDraft(self.missing_fields().join(", ")));
        };
        if amount == 0 {
            return Err(PlannerError::IncompleteDraft("amount".to_string()));
        }

        Ok(Payment {
            id: Uuid::new_v4().to_string(),
            card_id: card_id.to_string(),
            amount,
            month: target.month0,
            year: target.year,
            is_confirmed: true,
            is_paid: false,
            notes: non_empty(&self.notes).map(str::to_string),
        })
    }
}
