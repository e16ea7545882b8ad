//! # Wallet Ledger
//!
//! Balance and meal-count bookkeeping.
//!
//! The ledger is the only writer of wallet state. Single-threaded from its own point of
//! view (the server serializes access behind a mutex), so "atomic" here means a mutation
//! either fully applies and is mirrored to storage, or is rejected with state untouched.
//!
//! ## Invariants
//!
//! - `balance` never goes negative
//! - `meals_used <= meals_total`
//! - A rejected operation leaves both memory and storage unchanged

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{
    CARD_MEAL, CARD_NONE, KEY_BALANCE, KEY_MEAL_WALLET, KEY_SELECTED_CARD, Storage, StorageError,
};

/// Seed balance the prototype starts from when nothing is stored yet.
pub const DEFAULT_BALANCE: u64 = 12_400;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed} RWF, have {available} RWF")]
    InsufficientBalance { needed: u64, available: u64 },

    #[error("meal wallet is empty")]
    WalletEmpty,

    #[error("amount overflows the wallet")]
    BalanceOverflow,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted meal-pack counters, stored as a JSON blob under `mealWallet`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MealWallet {
    #[serde(rename = "totalMeals")]
    pub total_meals: u32,
    #[serde(rename = "usedCount")]
    pub used_count: u32,
}

/// Point-in-time view of everything the ledger tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletSnapshot {
    pub balance: u64,
    pub meals_total: u32,
    pub meals_used: u32,
    pub active: bool,
}

pub struct Ledger<S> {
    balance: u64,
    meals: MealWallet,
    active: bool,
    store: S,
}

impl<S: Storage> Ledger<S> {
    /// Restores the last persisted snapshot, falling back to the seed defaults for
    /// anything not stored yet.
    pub async fn load(store: S) -> Result<Self, LedgerError> {
        let balance = match store.get(KEY_BALANCE).await? {
            Some(raw) => raw.parse().unwrap_or(DEFAULT_BALANCE),
            None => DEFAULT_BALANCE,
        };

        let meals = match store.get(KEY_MEAL_WALLET).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => MealWallet::default(),
        };

        let active = store.get(KEY_SELECTED_CARD).await?.as_deref() == Some(CARD_MEAL);

        Ok(Self {
            balance,
            meals,
            active,
            store,
        })
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            balance: self.balance,
            meals_total: self.meals.total_meals,
            meals_used: self.meals.used_count,
            active: self.active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Top-up from a successful payment. The amount is client-supplied, so a sum
    /// that would not fit is rejected rather than wrapped.
    pub async fn credit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.mirror_balance().await?;

        Ok(self.balance)
    }

    /// Meal-pack purchase: adds whole meals instead of currency.
    pub async fn credit_meals(&mut self, count: u32) -> Result<u32, LedgerError> {
        self.meals.total_meals = self
            .meals
            .total_meals
            .checked_add(count)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.mirror_meals().await?;

        Ok(self.meals.total_meals)
    }

    pub async fn debit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.mirror_balance().await?;

        Ok(self.balance)
    }

    pub async fn use_meal(&mut self) -> Result<u32, LedgerError> {
        if self.meals.used_count >= self.meals.total_meals {
            return Err(LedgerError::WalletEmpty);
        }

        self.meals.used_count += 1;
        self.mirror_meals().await?;

        Ok(self.meals.total_meals - self.meals.used_count)
    }

    /// Marks the card active after a successful unlock and persists the choice.
    pub async fn activate(&mut self) -> Result<(), LedgerError> {
        self.active = true;
        self.store.put(KEY_SELECTED_CARD, CARD_MEAL).await?;

        Ok(())
    }

    pub async fn deactivate(&mut self) -> Result<(), LedgerError> {
        self.active = false;
        self.store.put(KEY_SELECTED_CARD, CARD_NONE).await?;

        Ok(())
    }

    async fn mirror_balance(&self) -> Result<(), LedgerError> {
        self.store
            .put(KEY_BALANCE, &self.balance.to_string())
            .await?;

        Ok(())
    }

    async fn mirror_meals(&self) -> Result<(), LedgerError> {
        let blob = serde_json::to_string(&self.meals)
            .map_err(|e| StorageError::Backend(Box::new(e)))?;

        self.store.put(KEY_MEAL_WALLET, &blob).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn fresh() -> Ledger<MemoryStorage> {
        Ledger::load(MemoryStorage::new()).await.unwrap()
    }

    #[tokio::test]
    async fn credit_adds_exactly() {
        let mut ledger = fresh().await;
        let before = ledger.snapshot().balance;

        ledger.credit(5_000).await.unwrap();

        assert_eq!(ledger.snapshot().balance, before + 5_000);
    }

    #[tokio::test]
    async fn debit_beyond_balance_fails_unchanged() {
        let store = MemoryStorage::new();
        store.put(KEY_BALANCE, "1000").await.unwrap();
        let mut ledger = Ledger::load(store).await.unwrap();

        let err = ledger.debit(1_500).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                needed: 1_500,
                available: 1_000
            }
        ));
        assert_eq!(ledger.snapshot().balance, 1_000);
    }

    #[tokio::test]
    async fn use_meal_fails_when_exhausted() {
        let mut ledger = fresh().await;
        ledger.credit_meals(2).await.unwrap();

        assert_eq!(ledger.use_meal().await.unwrap(), 1);
        assert_eq!(ledger.use_meal().await.unwrap(), 0);

        assert!(matches!(
            ledger.use_meal().await.unwrap_err(),
            LedgerError::WalletEmpty
        ));
        assert_eq!(ledger.snapshot().meals_used, 2);
    }

    #[tokio::test]
    async fn reload_restores_identical_snapshot() {
        let store = MemoryStorage::new();

        let mut ledger = Ledger::load(store.clone()).await.unwrap();
        ledger.credit(3_000).await.unwrap();
        ledger.credit_meals(5).await.unwrap();
        ledger.use_meal().await.unwrap();
        ledger.activate().await.unwrap();
        let before = ledger.snapshot();
        drop(ledger);

        let reloaded = Ledger::load(store).await.unwrap();

        assert_eq!(reloaded.snapshot(), before);
    }

    #[tokio::test]
    async fn credit_rejects_a_sum_that_would_wrap() {
        let mut ledger = fresh().await;
        let before = ledger.snapshot().balance;

        assert!(matches!(
            ledger.credit(u64::MAX).await.unwrap_err(),
            LedgerError::BalanceOverflow
        ));
        assert_eq!(ledger.snapshot().balance, before);

        ledger.credit_meals(u32::MAX).await.unwrap();
        assert!(matches!(
            ledger.credit_meals(1).await.unwrap_err(),
            LedgerError::BalanceOverflow
        ));
        assert_eq!(ledger.snapshot().meals_total, u32::MAX);
    }

    #[tokio::test]
    async fn defaults_apply_when_nothing_stored() {
        let ledger = fresh().await;
        let snap = ledger.snapshot();

        assert_eq!(snap.balance, DEFAULT_BALANCE);
        assert_eq!(snap.meals_total, 0);
        assert!(!snap.active);
    }
}
