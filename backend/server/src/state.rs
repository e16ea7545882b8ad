use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use wallet::{
    auth::RoleSecrets,
    board::OrderBoard,
    catalog::Catalog,
    gateway::{
        CardActivation, GatewayError, HttpGateway, MockGateway, PaymentGateway, PaymentReceipt,
        PaymentRequest,
    },
    ledger::Ledger,
    unlock::UnlockFlow,
};

use super::{
    config::Config,
    database::{RedisStorage, init_redis},
};

/// Configured gateway backend: the mock unless `GATEWAY_URL` points at a real one.
pub enum Gateway {
    Mock(MockGateway),
    Http(HttpGateway),
}

impl PaymentGateway for Gateway {
    async fn pay(&self, req: &PaymentRequest) -> Result<PaymentReceipt, GatewayError> {
        match self {
            Gateway::Mock(g) => g.pay(req).await,
            Gateway::Http(g) => g.pay(req).await,
        }
    }
}

impl CardActivation for Gateway {
    async fn validate(&self, card_id: &str, pin: &str) -> Result<bool, GatewayError> {
        match self {
            Gateway::Mock(g) => g.validate(card_id, pin).await,
            Gateway::Http(g) => g.validate(card_id, pin).await,
        }
    }
}

pub struct State {
    pub config: Config,
    pub storage: RedisStorage,
    pub ledger: Mutex<Ledger<RedisStorage>>,
    pub unlock: Mutex<UnlockFlow>,
    pub catalog: Mutex<Catalog>,
    pub board: Mutex<OrderBoard>,
    pub gateway: Gateway,
    pub secrets: RoleSecrets,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let redis_connection = init_redis(&config.redis_url).await;
        let storage = RedisStorage::new(redis_connection);
        let ledger = Ledger::load(storage.clone()).await.unwrap();

        let gateway = match &config.gateway_url {
            Some(url) => Gateway::Http(
                HttpGateway::new(
                    url.clone(),
                    Duration::from_millis(config.gateway_timeout_ms),
                )
                .unwrap(),
            ),
            None => Gateway::Mock(MockGateway::new(Duration::from_millis(
                config.gateway_latency_ms,
            ))),
        };

        Arc::new(Self {
            config,
            storage,
            ledger: Mutex::new(ledger),
            unlock: Mutex::new(UnlockFlow::new()),
            catalog: Mutex::new(Catalog::seed()),
            board: Mutex::new(OrderBoard::new()),
            gateway,
            secrets: RoleSecrets::default(),
        })
    }
}
