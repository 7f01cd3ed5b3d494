use crate::collaborators::{AdviceProvider, ExtractionGuess, ExtractionRequest, PaymentExtractor};
use crate::drafts::{CardDraft, PaymentDraft};
use crate::engine::{advice_lines, AggregationWindow, Aggregator};
use crate::error::{PlannerError, Result};
use crate::inference::draft_from_guess;
use crate::pending::{RequestGuard, RequestKind, RequestToken};
use crate::readiness::ReadinessTracker;
use crate::schema::{BankSummary, Card, Payment};
use crate::storage::Storage;
use crate::utils::YearMonth;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// The planner's working state: cards, payments and readiness flags loaded from a storage
/// backend. Each mutating call writes the affected collection back before returning; when that
/// write fails the in-memory change is undone and the error returned.
pub struct PlannerSession<S: Storage> {
    storage: S,
    cards: Vec<Card>,
    payments: Vec<Payment>,
    readiness: ReadinessTracker,
    requests: RequestGuard,
}

impl<S: Storage> PlannerSession<S> {
    pub fn open(storage: S) -> Result<Self> {
        let cards = storage.load_cards()?;
        let payments = storage.load_payments()?;
        let readiness = ReadinessTracker::from_map(storage.load_readiness()?);
        info!(
            "Opened planner session with {} cards and {} payments",
            cards.len(),
            payments.len()
        );
        Ok(Self {
            storage,
            cards,
            payments,
            readiness,
            requests: RequestGuard::new(),
        })
    }

    /// Writes every collection and hands the storage back.
    pub fn close(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.storage)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.storage.save_cards(&self.cards)?;
        self.storage.save_payments(&self.payments)?;
        self.storage.save_readiness(self.readiness.as_map())?;
        debug!("Flushed planner session");
        Ok(())
    }

    // A two-collection write can fail halfway; put back what memory holds.
    fn restore_storage(&mut self) {
        let restored = self
            .storage
            .save_cards(&self.cards)
            .and_then(|_| self.storage.save_payments(&self.payments));
        if let Err(e) = restored {
            warn!("Storage may be out of date until the next flush: {}", e);
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    // --- cards ---

    pub fn add_card(&mut self, draft: &CardDraft) -> Result<Card> {
        let card = draft.build()?;
        self.cards.push(card.clone());
        if let Err(e) = self.storage.save_cards(&self.cards) {
            self.cards.pop();
            return Err(e);
        }
        info!("Added card {} ({})", card.name, card.group_id());
        Ok(card)
    }

    /// Deletes a card together with every payment recorded against it.
    /// Returns the number of payments removed.
    pub fn remove_card(&mut self, card_id: &str) -> Result<usize> {
        if self.card(card_id).is_none() {
            return Err(PlannerError::CardNotFound(card_id.to_string()));
        }
        let previous_cards = self.cards.clone();
        let previous_payments = self.payments.clone();
        self.cards.retain(|c| c.id != card_id);
        self.payments.retain(|p| p.card_id != card_id);
        let removed = previous_payments.len() - self.payments.len();

        let saved = self
            .storage
            .save_payments(&self.payments)
            .and_then(|_| self.storage.save_cards(&self.cards));
        if let Err(e) = saved {
            warn!("Could not remove card {}, restoring it: {}", card_id, e);
            self.cards = previous_cards;
            self.payments = previous_payments;
            self.restore_storage();
            return Err(e);
        }
        info!("Removed card {} and {} payments", card_id, removed);
        Ok(removed)
    }

    // --- payments ---

    pub fn add_payment(&mut self, draft: &PaymentDraft) -> Result<Payment> {
        let payment = draft.build()?;
        if self.card(&payment.card_id).is_none() {
            return Err(PlannerError::CardNotFound(payment.card_id));
        }
        self.payments.push(payment.clone());
        if let Err(e) = self.storage.save_payments(&self.payments) {
            self.payments.pop();
            return Err(e);
        }
        debug!(
            "Added payment {} of {} for card {} in {}",
            payment.id,
            payment.amount,
            payment.card_id,
            YearMonth::new(payment.year, payment.month)
        );
        Ok(payment)
    }

    pub fn remove_payment(&mut self, payment_id: &str) -> Result<()> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| PlannerError::PaymentNotFound(payment_id.to_string()))?;
        let payment = self.payments.remove(index);
        if let Err(e) = self.storage.save_payments(&self.payments) {
            self.payments.insert(index, payment);
            return Err(e);
        }
        Ok(())
    }

    /// Flips the paid flag of one payment and returns the new value. Totals are unaffected.
    pub fn toggle_paid(&mut self, payment_id: &str) -> Result<bool> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| PlannerError::PaymentNotFound(payment_id.to_string()))?;
        self.payments[index].is_paid = !self.payments[index].is_paid;
        if let Err(e) = self.storage.save_payments(&self.payments) {
            self.payments[index].is_paid = !self.payments[index].is_paid;
            return Err(e);
        }
        Ok(self.payments[index].is_paid)
    }

    // --- readiness ---

    pub fn is_ready(&self, group_id: &str, month_key: &str) -> bool {
        self.readiness.is_ready(group_id, month_key)
    }

    pub fn toggle_readiness(&mut self, group_id: &str, month_key: &str) -> Result<bool> {
        let month = YearMonth::parse_key(month_key)?;
        let ready = self.readiness.toggle_for(group_id, month);
        if let Err(e) = self.storage.save_readiness(self.readiness.as_map()) {
            self.readiness.toggle_for(group_id, month);
            return Err(e);
        }
        Ok(ready)
    }

    pub fn readiness(&self) -> &ReadinessTracker {
        &self.readiness
    }

    // --- aggregation ---

    pub fn summaries(&self, reference: NaiveDate, window: AggregationWindow) -> Vec<BankSummary> {
        Aggregator::new(window).aggregate(&self.cards, &self.payments, reference)
    }

    // --- collaborators ---

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.requests.is_pending(kind)
    }

    /// Starts an extraction. Any earlier extraction still in flight becomes stale.
    pub fn begin_extraction(
        &mut self,
        text: &str,
        today: NaiveDate,
    ) -> (RequestToken, ExtractionRequest) {
        let token = self.requests.issue(RequestKind::Extraction);
        (token, ExtractionRequest::new(text, &self.cards, today))
    }

    /// Applies an extraction outcome. Stale or failed outcomes leave every collection untouched;
    /// a usable guess becomes a prefilled draft that still has to go through `add_payment`.
    pub fn complete_extraction(
        &mut self,
        token: RequestToken,
        today: NaiveDate,
        outcome: Result<ExtractionGuess>,
    ) -> Result<PaymentDraft> {
        self.requests.accept(token)?;
        let guess = outcome.map_err(|e| {
            warn!("Payment extraction failed, manual entry needed: {}", e);
            match e {
                PlannerError::Extraction(msg) => PlannerError::Extraction(msg),
                other => PlannerError::Extraction(other.to_string()),
            }
        })?;
        Ok(draft_from_guess(&guess, &self.cards, today))
    }

    pub async fn extract_payment(
        &mut self,
        extractor: &dyn PaymentExtractor,
        text: &str,
        today: NaiveDate,
    ) -> Result<PaymentDraft> {
        if text.trim().is_empty() {
            return Err(PlannerError::IncompleteDraft("text".to_string()));
        }
        let (token, request) = self.begin_extraction(text, today);
        let outcome = extractor.extract(&request).await;
        self.complete_extraction(token, today, outcome)
    }

    pub fn begin_advice(&mut self) -> RequestToken {
        self.requests.issue(RequestKind::Advice)
    }

    pub fn complete_advice(&mut self, token: RequestToken, advice: String) -> Result<String> {
        self.requests.accept(token)?;
        Ok(advice)
    }

    pub async fn request_advice(
        &mut self,
        advisor: &dyn AdviceProvider,
        summaries: &[BankSummary],
    ) -> Result<String> {
        let token = self.begin_advice();
        let advice = advisor.advise(&advice_lines(summaries)).await;
        self.complete_advice(token, advice)
    }
}
