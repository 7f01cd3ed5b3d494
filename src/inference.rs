use crate::collaborators::ExtractionGuess;
use crate::drafts::PaymentDraft;
use crate::schema::Card;
use crate::utils::YearMonth;
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Picks the billing month a freshly extracted payment belongs to.
///
/// `today` must be the real current date, never the month a calendar view happens to show.
/// An explicit month and year from the guess win. Otherwise, once the card's payment day has
/// passed this month the debit must be next month's; with no card the current month is used.
pub fn infer_target_month(
    guess: &ExtractionGuess,
    card: Option<&Card>,
    today: NaiveDate,
) -> YearMonth {
    if let (Some(month), Some(year)) = (guess.payment_month, guess.payment_year) {
        if (1..=12).contains(&month) {
            return YearMonth::new(year, month - 1);
        }
        debug!("Ignoring out of range month {} from extraction", month);
    }

    let current = YearMonth::from_date(today);
    match card {
        Some(card) if today.day() > card.payment_day.comparable_day() => current.next(),
        _ => current,
    }
}

/// The card the guess actually names, if it is one of `cards`.
pub fn identified_card<'a>(guess: &ExtractionGuess, cards: &'a [Card]) -> Option<&'a Card> {
    guess
        .card_id
        .as_deref()
        .and_then(|id| cards.iter().find(|c| c.id == id))
}

/// Card to prefill the form with; unknown or missing ids fall back to the first registered card.
pub fn resolve_guessed_card<'a>(guess: &ExtractionGuess, cards: &'a [Card]) -> Option<&'a Card> {
    identified_card(guess, cards).or_else(|| cards.first())
}

fn whole_amount(amount: f64) -> Option<u64> {
    if amount.is_finite() && amount >= 0.0 {
        Some(amount.round() as u64)
    } else {
        None
    }
}

/// Prefills a payment form from an extraction guess. The user can still edit it before commit.
///
/// Only a card the guess names drives the month; the first-card fallback is a form default.
pub fn draft_from_guess(guess: &ExtractionGuess, cards: &[Card], today: NaiveDate) -> PaymentDraft {
    let target = infer_target_month(guess, identified_card(guess, cards), today);
    PaymentDraft {
        card_id: resolve_guessed_card(guess, cards).map(|c| c.id.clone()),
        amount: whole_amount(guess.amount),
        target: Some(target),
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DaySetting, CARD_COLORS};

    fn card(id: &str, payment_day: DaySetting) -> Card {
        Card {
            id: id.to_string(),
            name: "JCB".to_string(),
            bank_name: "Sumitomo".to_string(),
            closing_day: DaySetting::Day(15),
            payment_day,
            color: CARD_COLORS[2].to_string(),
            owner: "self".to_string(),
            payment_source_owner: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn guess(card_id: Option<&str>) -> ExtractionGuess {
        ExtractionGuess {
            amount: 50000.0,
            card_id: card_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_month_and_year_win() {
        let mut g = guess(Some("a"));
        g.payment_month = Some(3);
        g.payment_year = Some(2025);
        let c = card("a", DaySetting::Day(10));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 6, 20)), YearMonth::new(2025, 2));
    }

    #[test]
    fn test_month_without_year_is_not_explicit() {
        let mut g = guess(None);
        g.payment_month = Some(3);
        assert_eq!(infer_target_month(&g, None, date(2024, 6, 20)), YearMonth::new(2024, 5));
    }

    #[test]
    fn test_payment_day_passed_moves_to_next_month() {
        let c = card("a", DaySetting::Day(10));
        let g = guess(Some("a"));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 6, 20)), YearMonth::new(2024, 6));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 12, 20)), YearMonth::new(2025, 0));
    }

    #[test]
    fn test_on_or_before_payment_day_stays_current() {
        let c = card("a", DaySetting::Day(10));
        let g = guess(Some("a"));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 6, 10)), YearMonth::new(2024, 5));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 6, 1)), YearMonth::new(2024, 5));
    }

    #[test]
    fn test_end_of_month_card_never_rolls_forward() {
        let c = card("a", DaySetting::EndOfMonth);
        let g = guess(Some("a"));
        assert_eq!(infer_target_month(&g, Some(&c), date(2024, 1, 31)), YearMonth::new(2024, 0));
    }

    #[test]
    fn test_draft_from_guess_falls_back_to_first_card() {
        let cards = vec![card("first", DaySetting::Day(5)), card("second", DaySetting::Day(5))];

        // The fallback card fills the form but does not push the month forward.
        let draft = draft_from_guess(&guess(Some("unknown")), &cards, date(2024, 3, 20));
        assert_eq!(draft.card_id.as_deref(), Some("first"));
        assert_eq!(draft.target, Some(YearMonth::new(2024, 2)));

        let draft = draft_from_guess(&guess(Some("second")), &cards, date(2024, 3, 20));
        assert_eq!(draft.card_id.as_deref(), Some("second"));
        assert_eq!(draft.target, Some(YearMonth::new(2024, 3)));
        assert_eq!(draft.amount, Some(50000));
    }

    #[test]
    fn test_unattributed_guess_stays_in_current_month() {
        let cards = vec![card("only", DaySetting::Day(10))];
        let g = ExtractionGuess {
            amount: 1000.0,
            card_id: None,
            ..Default::default()
        };

        let draft = draft_from_guess(&g, &cards, date(2024, 6, 20));
        assert_eq!(draft.target, Some(YearMonth::new(2024, 5)));
        assert_eq!(draft.card_id.as_deref(), Some("only"));

        let draft = draft_from_guess(&guess(Some("only")), &cards, date(2024, 6, 20));
        assert_eq!(draft.target, Some(YearMonth::new(2024, 6)));
    }

    #[test]
    fn test_draft_from_guess_without_cards_is_incomplete() {
        let mut g = guess(None);
        g.amount = -3.0;
        let draft = draft_from_guess(&g, &[], date(2024, 3, 20));
        assert!(draft.card_id.is_none());
        assert!(draft.amount.is_none());
        assert!(!draft.is_complete());
    }
}
