//! # Igifu Wallet
//!
//! Domain logic for the Igifu campus meal-payment platform.
//!
//! ## Overall Data Structures
//!
//! In-memory structures:
//! - Wallet snapshot (balance: **int**, totalMeals: **int**, usedCount: **int**): The single
//!   source of truth for what a student can spend. Every successful mutation is mirrored
//!   into the storage backend so a reload restores the exact same snapshot.
//!
//! - Unlock flow (state + attempt counter): Gates activation of a freshly purchased card
//!   behind a 4-digit PIN with a hard cap of 3 attempts. Never persisted.
//!
//! - Restaurant catalog (static list + favorite flags): Partner restaurants with their
//!   price plans. Only the favorite flag mutates, and only in memory.
//!
//! ### Storage
//! - Key-value pairs under fixed keys: `selectedCard` (**string**), `balance` (**decimal
//!   string**), `theme` (**string**), `mealWallet` (**JSON blob**). Redis in production,
//!   in-memory for tests and the tester binary.
//!
//! ### External services
//! - Payment gateway (mobile money) and card activation are ports. The mock
//!   implementations reproduce the demo behavior (fixed secret, simulated latency);
//!   the HTTP implementations talk to a real endpoint and surface decline, timeout,
//!   and transport failures.

pub mod auth;
pub mod board;
pub mod catalog;
pub mod gateway;
pub mod ledger;
pub mod order;
pub mod storage;
pub mod unlock;
