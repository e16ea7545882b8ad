//! # Redis
//!
//! RAM database behind the wallet storage port.
//!
//! Core purpose is to mirror wallet state (`selectedCard`, `balance`, `theme`,
//! `mealWallet`) so a restart restores the last snapshot.
//!
//! ## Requirements
//!
//! - Fast lookups
//! - Tiny dataset: 4 fixed keys per student
//! - One synchronous write after each successful mutation, reads only on load

use std::time::Duration;

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use wallet::storage::{Storage, StorageError};

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

/// Redis-backed implementation of the wallet storage port.
#[derive(Clone)]
pub struct RedisStorage {
    connection: ConnectionManager,
}

impl RedisStorage {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

impl Storage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut connection = self.connection.clone();

        let value: Option<String> = connection
            .get(key)
            .await
            .map_err(|e| StorageError::Backend(Box::new(e)))?;

        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut connection = self.connection.clone();

        let _: () = connection
            .set(key, value)
            .await
            .map_err(|e| StorageError::Backend(Box::new(e)))?;

        Ok(())
    }
}
