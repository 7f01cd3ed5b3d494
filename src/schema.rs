use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Wire value of the "last day of the month" day setting.
pub const END_OF_MONTH: u32 = 99;

pub const CARD_COLORS: [&str; 8] = [
    "bg-blue-500",
    "bg-emerald-500",
    "bg-indigo-500",
    "bg-rose-500",
    "bg-amber-500",
    "bg-purple-500",
    "bg-cyan-500",
    "bg-slate-600",
];

/// A nominal closing or payment day.
///
/// Stored as a plain integer so that `99` keeps meaning "end of month" on disk. Deserializing
/// is lenient: a numeric day is never checked against month lengths here, the resolver clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum DaySetting {
    Day(u32),
    EndOfMonth,
}

impl DaySetting {
    /// Strict constructor used by drafts: accepts 1-31 or the end-of-month sentinel.
    pub fn new(value: u32) -> Result<Self> {
        match value {
            END_OF_MONTH => Ok(Self::EndOfMonth),
            1..=31 => Ok(Self::Day(value)),
            other => Err(PlannerError::InvalidDaySetting(other)),
        }
    }

    /// Day number used when comparing against "today"; end of month counts as 31.
    pub fn comparable_day(self) -> u32 {
        match self {
            Self::Day(day) => day,
            Self::EndOfMonth => 31,
        }
    }

    pub fn is_end_of_month(self) -> bool {
        matches!(self, Self::EndOfMonth)
    }
}

impl From<u32> for DaySetting {
    fn from(value: u32) -> Self {
        if value == END_OF_MONTH {
            Self::EndOfMonth
        } else {
            Self::Day(value)
        }
    }
}

impl From<DaySetting> for u32 {
    fn from(setting: DaySetting) -> Self {
        match setting {
            DaySetting::Day(day) => day,
            DaySetting::EndOfMonth => END_OF_MONTH,
        }
    }
}

impl std::fmt::Display for DaySetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(day) => write!(f, "day {}", day),
            Self::EndOfMonth => write!(f, "end of month"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    /// Free text, used verbatim as part of the grouping key.
    pub bank_name: String,
    pub closing_day: DaySetting,
    pub payment_day: DaySetting,
    pub color: String,
    /// Who uses the card.
    pub owner: String,
    /// Who holds the debited bank account. Falls back to `owner` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_source_owner: Option<String>,
}

impl Card {
    pub fn account_holder(&self) -> &str {
        match self.payment_source_owner.as_deref() {
            Some(holder) if !holder.is_empty() => holder,
            _ => &self.owner,
        }
    }

    pub fn group_id(&self) -> String {
        bank_group_id(&self.bank_name, self.account_holder())
    }
}

pub fn bank_group_id(bank_name: &str, account_holder: &str) -> String {
    format!("{}-{}", bank_name, account_holder)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub card_id: String,
    pub amount: u64,
    /// 0-based month index (January = 0).
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Payment {
    pub fn is_in_month(&self, year: i32, month0: u32) -> bool {
        self.year == year && self.month == month0
    }
}

/// Funding requirement for one bank account over the aggregation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSummary {
    /// `bank_name + "-" + account_holder`
    pub id: String,
    pub bank_name: String,
    pub account_holder: String,
    pub total_amount: u64,
    pub payments: Vec<Payment>,
    pub earliest_payment_date: NaiveDate,
}

impl BankSummary {
    pub fn label(&self) -> String {
        format!("{} ({})", self.bank_name, self.account_holder)
    }

    pub fn unpaid_amount(&self) -> u64 {
        self.payments
            .iter()
            .filter(|p| !p.is_paid)
            .map(|p| p.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(owner: &str, source: Option<&str>) -> Card {
        Card {
            id: "c1".to_string(),
            name: "Main".to_string(),
            bank_name: "Rakuten".to_string(),
            closing_day: DaySetting::Day(15),
            payment_day: DaySetting::EndOfMonth,
            color: CARD_COLORS[0].to_string(),
            owner: owner.to_string(),
            payment_source_owner: source.map(str::to_string),
        }
    }

    #[test]
    fn test_day_setting_wire_format() {
        let json = serde_json::to_string(&card("self", None)).unwrap();
        assert!(json.contains("\"paymentDay\":99"));
        assert!(json.contains("\"closingDay\":15"));
        assert!(!json.contains("paymentSourceOwner"));

        let parsed: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.payment_day, DaySetting::EndOfMonth);
    }

    #[test]
    fn test_lenient_load_strict_construction() {
        assert_eq!(DaySetting::from(45), DaySetting::Day(45));
        assert!(DaySetting::new(45).is_err());
        assert!(DaySetting::new(0).is_err());
        assert_eq!(DaySetting::new(99).unwrap(), DaySetting::EndOfMonth);
        assert_eq!(DaySetting::new(31).unwrap(), DaySetting::Day(31));
    }

    #[test]
    fn test_account_holder_falls_back_to_owner() {
        assert_eq!(card("wife", None).account_holder(), "wife");
        assert_eq!(card("wife", Some("")).account_holder(), "wife");
        assert_eq!(card("wife", Some("self")).account_holder(), "self");
        assert_eq!(card("wife", Some("self")).group_id(), "Rakuten-self");
    }

    #[test]
    fn test_loads_original_payment_json() {
        let json = r#"{"id":"p1","cardId":"1","amount":12000,"month":11,"year":2023,"isConfirmed":true,"isPaid":false}"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.month, 11);
        assert!(payment.is_in_month(2023, 11));
        assert!(payment.notes.is_none());
    }
}
