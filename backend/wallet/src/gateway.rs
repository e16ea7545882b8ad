//! # Payment & Activation Ports
//!
//! The prototype faked its network calls with fixed timers. Here that boundary is
//! explicit: a mobile-money gateway accepts a payment and answers with an opaque card
//! id, and a card-activation service checks a PIN against that id. Both are traits so
//! tests can drive the failure paths the mocks never exercised.
//!
//! ## Implementations
//!
//! - Mock: reproduces the demo behavior. Fixed secret `"1234"`, configurable simulated
//!   latency, card ids counting up from `MC-12345`.
//! - HTTP: posts JSON to a configured endpoint and maps decline, timeout, and transport
//!   failures into [`GatewayError`].

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;

/// Demo activation secret. Lives only in the mock; a real deployment verifies
/// server-side behind [`CardActivation`].
pub const MOCK_PIN: &str = "1234";

const FIRST_CARD_ID: u32 = 12_345;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway timed out")]
    Timeout,

    #[error("gateway transport: {0}")]
    Transport(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Mtn,
    Airtel,
}

#[derive(Serialize, Debug, Clone)]
pub struct PaymentRequest {
    pub provider: Provider,
    pub phone: String,
    pub amount: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaymentReceipt {
    pub card_id: String,
    pub credited: u64,
    pub message: String,
}

pub trait PaymentGateway: Send + Sync {
    fn pay(
        &self,
        req: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentReceipt, GatewayError>> + Send;
}

pub trait CardActivation: Send + Sync {
    fn validate(
        &self,
        card_id: &str,
        pin: &str,
    ) -> impl Future<Output = Result<bool, GatewayError>> + Send;
}

/// Stand-in gateway with the prototype's fixed latency and secret.
pub struct MockGateway {
    latency: Duration,
    next_card: AtomicU32,
}

impl MockGateway {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            next_card: AtomicU32::new(FIRST_CARD_ID),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        // The prototype's timers sat in the 1-1.5s band.
        Self::new(Duration::from_millis(1_200))
    }
}

impl PaymentGateway for MockGateway {
    async fn pay(&self, req: &PaymentRequest) -> Result<PaymentReceipt, GatewayError> {
        sleep(self.latency).await;

        if req.phone.trim().is_empty() {
            return Err(GatewayError::Declined("missing phone number".to_string()));
        }
        if req.amount == 0 {
            return Err(GatewayError::Declined("zero amount".to_string()));
        }

        let id = self.next_card.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "verbose")]
        println!("Mock gateway credited {} RWF to card MC-{id}", req.amount);

        Ok(PaymentReceipt {
            card_id: format!("MC-{id}"),
            credited: req.amount,
            message: "Payment successful!".to_string(),
        })
    }
}

impl CardActivation for MockGateway {
    async fn validate(&self, _card_id: &str, pin: &str) -> Result<bool, GatewayError> {
        sleep(self.latency).await;

        Ok(pin == MOCK_PIN)
    }
}

#[derive(Deserialize)]
struct ActivationResponse {
    success: bool,
}

/// Real gateway client talking JSON to a configured endpoint.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(Box::new(e)))?;

        Ok(Self { client, base_url })
    }

    fn map_send_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(Box::new(e))
        }
    }
}

impl PaymentGateway for HttpGateway {
    async fn pay(&self, req: &PaymentRequest) -> Result<PaymentReceipt, GatewayError> {
        let res = self
            .client
            .post(format!("{}/pay", self.base_url))
            .json(req)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !res.status().is_success() {
            let reason = res.text().await.unwrap_or_default();
            return Err(GatewayError::Declined(reason));
        }

        res.json().await.map_err(Self::map_send_error)
    }
}

impl CardActivation for HttpGateway {
    async fn validate(&self, card_id: &str, pin: &str) -> Result<bool, GatewayError> {
        let payload = serde_json::json!({ "cardId": card_id, "pin": pin });

        let res = self
            .client
            .post(format!("{}/unlock", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let body: ActivationResponse = res.json().await.map_err(Self::map_send_error)?;

        Ok(body.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> MockGateway {
        MockGateway::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn mock_pay_issues_sequential_card_ids() {
        let gateway = instant();
        let req = PaymentRequest {
            provider: Provider::Mtn,
            phone: "0788000000".to_string(),
            amount: 10_000,
        };

        let first = gateway.pay(&req).await.unwrap();
        let second = gateway.pay(&req).await.unwrap();

        assert_eq!(first.card_id, "MC-12345");
        assert_eq!(second.card_id, "MC-12346");
        assert_eq!(first.credited, 10_000);
    }

    #[tokio::test]
    async fn mock_pay_declines_bad_requests() {
        let gateway = instant();

        let no_phone = PaymentRequest {
            provider: Provider::Airtel,
            phone: "  ".to_string(),
            amount: 5_000,
        };
        assert!(matches!(
            gateway.pay(&no_phone).await.unwrap_err(),
            GatewayError::Declined(_)
        ));

        let zero = PaymentRequest {
            provider: Provider::Airtel,
            phone: "0733000000".to_string(),
            amount: 0,
        };
        assert!(matches!(
            gateway.pay(&zero).await.unwrap_err(),
            GatewayError::Declined(_)
        ));
    }

    #[tokio::test]
    async fn mock_validate_checks_the_demo_secret() {
        let gateway = instant();

        assert!(gateway.validate("MC-12345", MOCK_PIN).await.unwrap());
        assert!(!gateway.validate("MC-12345", "0000").await.unwrap());
    }
}
