use crate::domain::card::CardInstrument;
use crate::domain::money::FeeBreakdown;
use crate::domain::transaction::Transaction;

/// Per-checkout state carried between the collection step and the
/// confirmation step.
///
/// The card instrument is the only sensitive value here and it is dropped the
/// moment the transaction snapshot turns terminal, so a session that outlives
/// the checkout holds no card data.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    transaction: Transaction,
    card: Option<CardInstrument>,
    fees: FeeBreakdown,
}

impl CheckoutSession {
    pub fn begin(transaction: Transaction) -> Self {
        let fees = FeeBreakdown::for_amount(transaction.amount);
        Self {
            transaction,
            card: None,
            fees,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn fees(&self) -> &FeeBreakdown {
        &self.fees
    }

    pub fn enter_card(&mut self, card: CardInstrument) {
        self.card = Some(card);
    }

    pub fn card(&self) -> Option<&CardInstrument> {
        self.card.as_ref()
    }

    /// Replaces the snapshot with an updated record, clearing the card
    /// instrument once a terminal status has been reached.
    pub fn apply(&mut self, updated: Transaction) {
        if updated.status.is_terminal() {
            self.card = None;
        }
        self.fees = FeeBreakdown::for_amount(updated.amount);
        self.transaction = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionStatus;
    use chrono::Utc;

    fn tx(status: TransactionStatus) -> Transaction {
        Transaction {
            id: "tx_1".to_string(),
            product_id: "prd_1".to_string(),
            amount: 10000,
            status,
            created_at: Utc::now(),
        }
    }

    fn card() -> CardInstrument {
        CardInstrument {
            number: "4242424242424242".to_string(),
            cvc: "123".to_string(),
            exp_month: "12".to_string(),
            exp_year: "29".to_string(),
            holder: "Demo Customer".to_string(),
        }
    }

    #[test]
    fn test_fees_computed_from_snapshot() {
        let session = CheckoutSession::begin(tx(TransactionStatus::Pending));
        assert_eq!(session.fees().total(), 10250);
    }

    #[test]
    fn test_card_survives_non_terminal_updates() {
        let mut session = CheckoutSession::begin(tx(TransactionStatus::Pending));
        session.enter_card(card());
        session.apply(tx(TransactionStatus::Pending));
        assert!(session.card().is_some());
    }

    #[test]
    fn test_card_cleared_on_terminal_status() {
        let mut session = CheckoutSession::begin(tx(TransactionStatus::Pending));
        session.enter_card(card());
        session.apply(tx(TransactionStatus::Completed));
        assert!(session.card().is_none());
        assert_eq!(session.transaction().status, TransactionStatus::Completed);
    }
}
