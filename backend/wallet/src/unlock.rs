//! # Unlock State Machine
//!
//! Activation of a purchased meal card.
//!
//! `Locked → AwaitingPin → Unlocked`, with `LockedOut` terminal after 3 wrong attempts.
//! The attempt counter is transient: a successful unlock or a dismissal resets it, and
//! nothing here is ever persisted. Dismissing the prompt keeps the credited payment,
//! only activation is undone.

use thiserror::Error;

use crate::gateway::{CardActivation, GatewayError};

pub const MAX_PIN_ATTEMPTS: u8 = 3;
pub const PIN_LENGTH: usize = 4;

#[derive(Error, Debug)]
pub enum UnlockError {
    #[error("enter a {PIN_LENGTH}-digit PIN")]
    PinLength,

    #[error("wrong PIN, attempts left: {remaining}")]
    WrongPin { remaining: u8 },

    #[error("max attempts reached, contact support")]
    LockedOut,

    #[error("no card awaiting unlock")]
    NotAwaitingPin,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    Locked,
    AwaitingPin { card_id: String, attempts: u8 },
    Unlocked,
    LockedOut,
}

#[derive(Debug)]
pub struct UnlockFlow {
    state: CardState,
}

impl Default for UnlockFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockFlow {
    pub fn new() -> Self {
        Self {
            state: CardState::Locked,
        }
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn attempts(&self) -> u8 {
        match self.state() {
            CardState::AwaitingPin { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    /// A successful payment hands over its card id and opens the PIN prompt.
    /// `LockedOut` is terminal: only out-of-band support recovers it, so a new
    /// payment cannot reopen the prompt.
    pub fn begin(&mut self, card_id: String) -> Result<(), UnlockError> {
        if self.state == CardState::LockedOut {
            return Err(UnlockError::LockedOut);
        }

        self.state = CardState::AwaitingPin {
            card_id,
            attempts: 0,
        };

        Ok(())
    }

    /// Dismissing the prompt returns to `Locked` and forgets the attempt count.
    pub fn cancel(&mut self) {
        self.state = CardState::Locked;
    }

    /// Checks the PIN against the activation service. A short PIN is rejected up
    /// front without consuming an attempt.
    pub async fn submit_pin<A: CardActivation>(
        &mut self,
        pin: &str,
        activation: &A,
    ) -> Result<(), UnlockError> {
        let (card_id, attempts) = match self.state() {
            CardState::AwaitingPin { card_id, attempts } => (card_id.clone(), *attempts),
            CardState::LockedOut => return Err(UnlockError::LockedOut),
            _ => return Err(UnlockError::NotAwaitingPin),
        };

        if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(UnlockError::PinLength);
        }

        if activation.validate(&card_id, pin).await? {
            self.state = CardState::Unlocked;
            return Ok(());
        }

        let attempts = attempts + 1;
        if attempts >= MAX_PIN_ATTEMPTS {
            self.state = CardState::LockedOut;
            return Err(UnlockError::LockedOut);
        }

        self.state = CardState::AwaitingPin { card_id, attempts };

        Err(UnlockError::WrongPin {
            remaining: MAX_PIN_ATTEMPTS - attempts,
        })
    }
}
