//! # Card Cycle Planner
//!
//! A library that turns credit card billing settings into concrete debit dates and tells a
//! household which bank account needs how much money, and by when.
//!
//! ## Core Concepts
//!
//! - **Day settings**: a card's closing and payment day are either a day number or "end of
//!   month"; they are resolved per month, clamping to the month's last day
//! - **Bank summaries**: payments grouped by bank name and account holder, summed over a one
//!   or two month window, with the earliest debit date of each group
//! - **Readiness**: a manual per-account, per-month flag confirming the money is in place
//! - **Paid status**: a per-payment flag that never changes totals
//! - **Target-month inference**: which month a pasted payment notice belongs to
//!
//! ## Example
//!
//! ```rust,ignore
//! use card_cycle_planner::*;
//! use chrono::NaiveDate;
//!
//! let mut session = PlannerSession::open(MemoryStorage::new())?;
//! let card = session.add_card(
//!     &CardDraft::new()
//!         .name("Gold")
//!         .bank_name("Sumitomo")
//!         .payment_day(27)
//!         .owner("self")
//!         .payment_source_owner("self"),
//! )?;
//! session.add_payment(&PaymentDraft::new().card_id(&card.id).amount(50_000).target(2024, 0))?;
//!
//! let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let summaries = session.summaries(reference, AggregationWindow::SingleMonth);
//! assert_eq!(summaries[0].total_amount, 50_000);
//! ```

pub mod collaborators;
pub mod config;
pub mod drafts;
pub mod engine;
pub mod error;
pub mod inference;
pub mod pending;
pub mod readiness;
pub mod schema;
pub mod session;
pub mod storage;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use collaborators::*;
pub use config::PlannerConfig;
pub use drafts::{CardDraft, PaymentDraft};
pub use engine::{
    advice_lines, aggregate, owner_totals, payments_due_on, payments_in_month, total_outflow,
    AggregationWindow, Aggregator, UNASSIGNED_OWNER,
};
pub use error::{PlannerError, Result};
pub use inference::{draft_from_guess, infer_target_month};
pub use pending::{RequestGuard, RequestKind, RequestToken};
pub use readiness::{readiness_key, ReadinessMap, ReadinessTracker};
pub use schema::*;
pub use session::PlannerSession;
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use utils::{last_day_of_month, resolve_date, resolve_day, YearMonth};

use chrono::{Local, NaiveDate};

/// The real current date. Inference must be fed this, not the month a view is showing.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_scenario() {
        let mut session = PlannerSession::open(MemoryStorage::new()).unwrap();
        let card = session
            .add_card(
                &CardDraft::new()
                    .name("Gold")
                    .bank_name("Sumitomo")
                    .payment_day(27)
                    .owner("self")
                    .payment_source_owner("self"),
            )
            .unwrap();
        let draft = PaymentDraft::new().card_id(&card.id).amount(50000).target(2024, 0);
        session.add_payment(&draft).unwrap();

        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let expected_date = NaiveDate::from_ymd_opt(2024, 1, 27).unwrap();

        let summaries = session.summaries(reference, AggregationWindow::SingleMonth);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].bank_name, "Sumitomo");
        assert_eq!(summaries[0].account_holder, "self");
        assert_eq!(summaries[0].total_amount, 50000);
        assert_eq!(summaries[0].earliest_payment_date, expected_date);

        session.add_payment(&draft.amount(20000)).unwrap();
        let summaries = session.summaries(reference, AggregationWindow::SingleMonth);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_amount, 70000);
        assert_eq!(summaries[0].earliest_payment_date, expected_date);
        assert_eq!(summaries[0].payments.len(), 2);
    }
}
