use crate::collaborators::AdviceLine;
use crate::schema::*;
use crate::utils::{format_iso_date, resolve_date, YearMonth};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Owner label for payments whose card no longer exists.
pub const UNASSIGNED_OWNER: &str = "unassigned";

/// The calendar months considered when building summaries, anchored at the reference month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationWindow {
    SingleMonth,
    /// Reference month plus the following month.
    #[default]
    TwoMonth,
}

impl AggregationWindow {
    pub fn month_count(self) -> u32 {
        match self {
            Self::SingleMonth => 1,
            Self::TwoMonth => 2,
        }
    }

    pub fn months(self, reference: NaiveDate) -> Vec<YearMonth> {
        let start = YearMonth::from_date(reference);
        (0..self.month_count()).map(|i| start.offset(i)).collect()
    }
}

pub struct Aggregator {
    window: AggregationWindow,
}

// Working state for one group while payments are folded in.
struct GroupSlot {
    bank_name: String,
    account_holder: String,
    total_amount: u64,
    payments: Vec<Payment>,
    earliest_payment_date: NaiveDate,
}

impl Aggregator {
    pub fn new(window: AggregationWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> AggregationWindow {
        self.window
    }

    /// Builds one summary per (bank, account holder) pair seen in the window.
    ///
    /// Output is in first-seen group order and each group keeps its payments in input order.
    /// The earliest date is only replaced by a strictly earlier one, so on ties the first
    /// payment seen stays authoritative.
    pub fn aggregate(
        &self,
        cards: &[Card],
        payments: &[Payment],
        reference: NaiveDate,
    ) -> Vec<BankSummary> {
        let months = self.window.months(reference);
        let cards_by_id: HashMap<&str, &Card> = cards.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, GroupSlot> = HashMap::new();

        for payment in payments {
            let ym = YearMonth::new(payment.year, payment.month);
            if !months.contains(&ym) {
                continue;
            }

            let Some(card) = cards_by_id.get(payment.card_id.as_str()) else {
                debug!(
                    "Skipping payment {}: card {} no longer exists",
                    payment.id, payment.card_id
                );
                continue;
            };

            let Some(debit_date) = resolve_date(payment.year, payment.month, card.payment_day)
            else {
                warn!(
                    "Skipping payment {}: {} {} is outside the supported calendar",
                    payment.id, payment.year, payment.month
                );
                continue;
            };

            let account_holder = card.account_holder();
            let key = bank_group_id(&card.bank_name, account_holder);

            let slot = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                GroupSlot {
                    bank_name: card.bank_name.clone(),
                    account_holder: account_holder.to_string(),
                    total_amount: 0,
                    payments: Vec::new(),
                    earliest_payment_date: debit_date,
                }
            });

            slot.total_amount += payment.amount;
            slot.payments.push(payment.clone());
            if debit_date < slot.earliest_payment_date {
                slot.earliest_payment_date = debit_date;
            }
        }

        debug!(
            "Aggregated {} payments into {} account groups over {:?}",
            payments.len(),
            order.len(),
            months
        );

        order
            .into_iter()
            .filter_map(|id| {
                groups.remove(&id).map(|slot| BankSummary {
                    id,
                    bank_name: slot.bank_name,
                    account_holder: slot.account_holder,
                    total_amount: slot.total_amount,
                    payments: slot.payments,
                    earliest_payment_date: slot.earliest_payment_date,
                })
            })
            .collect()
    }
}

pub fn aggregate(
    cards: &[Card],
    payments: &[Payment],
    reference: NaiveDate,
    window: AggregationWindow,
) -> Vec<BankSummary> {
    Aggregator::new(window).aggregate(cards, payments, reference)
}

pub fn total_outflow(summaries: &[BankSummary]) -> u64 {
    summaries.iter().map(|s| s.total_amount).sum()
}

/// Totals per card user (not per account holder) across the given summaries.
pub fn owner_totals(summaries: &[BankSummary], cards: &[Card]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for payment in summaries.iter().flat_map(|s| &s.payments) {
        let owner = cards
            .iter()
            .find(|c| c.id == payment.card_id)
            .map(|c| c.owner.as_str())
            .filter(|owner| !owner.is_empty())
            .unwrap_or(UNASSIGNED_OWNER);
        *totals.entry(owner.to_string()).or_insert(0) += payment.amount;
    }
    totals
}

/// Payments whose resolved debit date falls exactly on `date`.
pub fn payments_due_on<'a>(
    cards: &[Card],
    payments: &'a [Payment],
    date: NaiveDate,
) -> Vec<&'a Payment> {
    let ym = YearMonth::from_date(date);
    payments
        .iter()
        .filter(|p| p.is_in_month(ym.year, ym.month0))
        .filter(|p| {
            cards
                .iter()
                .find(|c| c.id == p.card_id)
                .and_then(|c| resolve_date(p.year, p.month, c.payment_day))
                == Some(date)
        })
        .collect()
}

pub fn payments_in_month(payments: &[Payment], year: i32, month0: u32) -> Vec<&Payment> {
    payments
        .iter()
        .filter(|p| p.is_in_month(year, month0))
        .collect()
}

/// Payload for the advice collaborator.
pub fn advice_lines(summaries: &[BankSummary]) -> Vec<AdviceLine> {
    summaries
        .iter()
        .map(|s| AdviceLine {
            bank_name: s.label(),
            total_amount: s.total_amount,
            earliest_payment_date: format_iso_date(s.earliest_payment_date),
        })
        .collect()
}
