//! # Order Placement
//!
//! Validates a purchase against the ledger and commits the debit. The card must be
//! active first; an inactive card sends the student back to the wallet page instead
//! of touching any state.

use serde::Serialize;
use thiserror::Error;

use crate::{
    ledger::{Ledger, LedgerError},
    storage::Storage,
};

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("activate your meal card first")]
    CardNotActive,

    #[error("order total overflows")]
    TotalOverflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// An order being put together: quantity adjusts up and down with a floor of 1.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub restaurant: String,
    pub unit_price: u64,
    quantity: u32,
}

impl OrderDraft {
    pub fn new(restaurant: String, unit_price: u64) -> Self {
        Self {
            restaurant,
            unit_price,
            quantity: 1,
        }
    }

    pub fn with_quantity(restaurant: String, unit_price: u64, quantity: u32) -> Self {
        Self {
            restaurant,
            unit_price,
            quantity: quantity.max(1),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn increment(&mut self) {
        self.quantity += 1;
    }

    pub fn decrement(&mut self) {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
    }

    /// `None` when price times quantity does not fit in u64; both values come
    /// from the client.
    pub fn total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub restaurant: String,
    pub quantity: u32,
    pub total: u64,
    pub new_balance: u64,
    pub message: String,
}

/// Commits the draft: the whole total debits in one step or not at all.
pub async fn place<S: Storage>(
    draft: &OrderDraft,
    ledger: &mut Ledger<S>,
) -> Result<OrderConfirmation, OrderError> {
    if !ledger.is_active() {
        return Err(OrderError::CardNotActive);
    }

    let total = draft.total().ok_or(OrderError::TotalOverflow)?;
    let new_balance = ledger.debit(total).await?;

    Ok(OrderConfirmation {
        restaurant: draft.restaurant.clone(),
        quantity: draft.quantity,
        total,
        new_balance,
        message: format!(
            "Order placed at {} for {} meals!",
            draft.restaurant, draft.quantity
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KEY_BALANCE, MemoryStorage, Storage};

    async fn active_ledger(balance: u64) -> Ledger<MemoryStorage> {
        let store = MemoryStorage::new();
        store.put(KEY_BALANCE, &balance.to_string()).await.unwrap();

        let mut ledger = Ledger::load(store).await.unwrap();
        ledger.activate().await.unwrap();
        ledger
    }

    #[tokio::test]
    async fn commit_debits_the_exact_total() {
        let mut ledger = active_ledger(12_400).await;
        let draft = OrderDraft::with_quantity("UR - Huye Campus Canteen".to_string(), 1_500, 3);

        let confirmation = place(&draft, &mut ledger).await.unwrap();

        assert_eq!(confirmation.total, 4_500);
        assert_eq!(confirmation.new_balance, 7_900);
        assert_eq!(ledger.snapshot().balance, 7_900);
    }

    #[tokio::test]
    async fn commit_rejects_when_total_exceeds_balance() {
        let mut ledger = active_ledger(12_400).await;
        let draft = OrderDraft::with_quantity("UR - Huye Campus Canteen".to_string(), 1_500, 10);

        let err = place(&draft, &mut ledger).await.unwrap_err();

        assert!(matches!(
            err,
            OrderError::Ledger(LedgerError::InsufficientBalance {
                needed: 15_000,
                available: 12_400
            })
        ));
        assert_eq!(ledger.snapshot().balance, 12_400);
    }

    #[tokio::test]
    async fn inactive_card_is_rejected_before_any_debit() {
        let store = MemoryStorage::new();
        store.put(KEY_BALANCE, "12400").await.unwrap();
        let mut ledger = Ledger::load(store).await.unwrap();

        let draft = OrderDraft::new("RP - Tumba Bistro".to_string(), 1_500);
        let err = place(&draft, &mut ledger).await.unwrap_err();

        assert!(matches!(err, OrderError::CardNotActive));
        assert_eq!(ledger.snapshot().balance, 12_400);
    }

    #[tokio::test]
    async fn wrapped_total_is_rejected_not_committed() {
        let mut ledger = active_ledger(12_400).await;
        let draft =
            OrderDraft::with_quantity("UR - Huye Campus Canteen".to_string(), 1 << 63, 2);

        assert_eq!(draft.total(), None);

        let err = place(&draft, &mut ledger).await.unwrap_err();

        assert!(matches!(err, OrderError::TotalOverflow));
        assert_eq!(ledger.snapshot().balance, 12_400);
    }

    #[tokio::test]
    async fn quantity_never_drops_below_one() {
        let mut draft = OrderDraft::new("RP - IPRC Kigali Mess".to_string(), 1_500);

        draft.decrement();
        assert_eq!(draft.quantity(), 1);

        draft.increment();
        draft.increment();
        assert_eq!(draft.quantity(), 3);
        assert_eq!(draft.total(), Some(4_500));

        assert_eq!(
            OrderDraft::with_quantity("x".to_string(), 100, 0).quantity(),
            1
        );
    }
}
