//! # Storage
//!
//! Key-value persistence behind the ledger.
//!
//! Core purpose is to mirror every successful wallet mutation so a page reload (or a
//! process restart) restores the last snapshot exactly.
//!
//! ## Requirements
//!
//! - Fast lookups, tiny dataset (4 fixed keys per student)
//! - Writes happen synchronously after each mutation, reads only on load
//!
//! ## Keys
//!
//! - `selectedCard`: `"No Card" | "Meal Card"`
//! - `balance`: decimal string encoding an integer RWF amount
//! - `theme`: `"light" | "dark"`
//! - `mealWallet`: JSON `{ "totalMeals": u32, "usedCount": u32 }`

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::Mutex;

pub const KEY_SELECTED_CARD: &str = "selectedCard";
pub const KEY_BALANCE: &str = "balance";
pub const KEY_THEME: &str = "theme";
pub const KEY_MEAL_WALLET: &str = "mealWallet";

pub const CARD_NONE: &str = "No Card";
pub const CARD_MEAL: &str = "Meal Card";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn put(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory backend for tests and the tester binary.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .lock()
            .await
            .insert(key.to_string(), value.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStorage::new();

        store.put(KEY_THEME, "dark").await.unwrap();

        assert_eq!(store.get(KEY_THEME).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(KEY_BALANCE).await.unwrap(), None);
    }
}
