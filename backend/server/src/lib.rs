//! # Igifu Backend
//!
//! HTTP surface of the campus meal-payment platform.
//!
//! # General Infrastructure
//! - Frontend talks JSON to this server
//! - Wallet state lives in Redis under the same keys the prototype used in the
//!   browser (`selectedCard`, `balance`, `theme`, `mealWallet`)
//! - Payment and card activation go through ports: a mock gateway by default,
//!   a real HTTP gateway when `GATEWAY_URL` is set
//!
//! # Routes
//! - `POST /pay`: mobile-money purchase of a meal card, credits the wallet and
//!   opens the unlock prompt
//! - `POST /unlock`: 4-digit PIN, 3 attempts, then locked out
//! - `DELETE /unlock`: dismiss the prompt, keeping the credited amount
//! - `POST /order`: debit the wallet for a restaurant order
//! - `GET /wallet`: current snapshot plus card state
//! - `POST /meals/buy`, `POST /meals/use`: meal-pack counters
//! - `GET /theme`, `POST /theme`: persisted light/dark preference
//! - `GET /restaurants`: browse with filter predicates in the query string
//! - `POST /restaurants/favorite`: toggle the in-memory favorite flag
//! - `POST /signup`, `POST /login`: role-gated entry validation
//! - `GET /board`, `POST /board/advance`, `POST /board/decline`: owner dashboard

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod state;

use routes::{
    board_advance_handler, board_decline_handler, board_handler, buy_meals_handler,
    cancel_unlock_handler, favorite_handler, login_handler, order_handler, pay_handler,
    restaurants_handler, set_theme_handler, signup_handler, theme_handler, unlock_handler,
    use_meal_handler, wallet_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/pay", post(pay_handler))
        .route("/unlock", post(unlock_handler).delete(cancel_unlock_handler))
        .route("/order", post(order_handler))
        .route("/wallet", get(wallet_handler))
        .route("/meals/buy", post(buy_meals_handler))
        .route("/meals/use", post(use_meal_handler))
        .route("/theme", get(theme_handler).post(set_theme_handler))
        .route("/restaurants", get(restaurants_handler))
        .route("/restaurants/favorite", post(favorite_handler))
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/board", get(board_handler))
        .route("/board/advance", post(board_advance_handler))
        .route("/board/decline", post(board_decline_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
