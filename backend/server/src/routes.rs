use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use wallet::{
    auth::{Role, SignupForm},
    board::OrderStatus,
    catalog::RestaurantFilter,
    gateway::{PaymentGateway, PaymentRequest, Provider},
    ledger::WalletSnapshot,
    order::{self, OrderDraft},
    storage::{KEY_THEME, Storage},
    unlock::{CardState, UnlockError},
};

use crate::{error::AppError, state::State as AppState};

#[derive(Deserialize)]
pub struct PayPayload {
    pub provider: Provider,
    pub phone: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct PayResponse {
    pub card_id: String,
    pub balance: u64,
    pub message: String,
}

pub async fn pay_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PayPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Locked-out cards recover through support, not by paying again. Refuse
    // before any money moves.
    if *state.unlock.lock().await.state() == CardState::LockedOut {
        warn!("Payment refused: card is locked out");
        return Err(UnlockError::LockedOut.into());
    }

    let request = PaymentRequest {
        provider: payload.provider,
        phone: payload.phone,
        amount: payload.amount,
    };

    let receipt = state.gateway.pay(&request).await?;

    let balance = state.ledger.lock().await.credit(receipt.credited).await?;
    state.unlock.lock().await.begin(receipt.card_id.clone())?;

    info!("Payment accepted, card {} awaiting unlock", receipt.card_id);

    Ok(Json(PayResponse {
        card_id: receipt.card_id,
        balance,
        message: receipt.message,
    }))
}

#[derive(Deserialize)]
pub struct UnlockPayload {
    pub pin: String,
}

pub async fn unlock_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UnlockPayload>,
) -> Result<impl IntoResponse, AppError> {
    state
        .unlock
        .lock()
        .await
        .submit_pin(&payload.pin, &state.gateway)
        .await?;

    state.ledger.lock().await.activate().await?;

    Ok((
        StatusCode::OK,
        "Meal Card unlocked! Now order at restaurants.",
    ))
}

pub async fn cancel_unlock_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.unlock.lock().await.cancel();

    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct OrderPayload {
    pub restaurant: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub customer: Option<String>,
}

pub async fn order_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let draft = OrderDraft::with_quantity(payload.restaurant, payload.unit_price, payload.quantity);

    let confirmation = {
        let mut ledger = state.ledger.lock().await;
        order::place(&draft, &mut ledger).await?
    };

    state.board.lock().await.push(
        payload.customer.unwrap_or_else(|| "Student".to_string()),
        format!("{}x meal", confirmation.quantity),
        confirmation.total,
    );

    Ok(Json(confirmation))
}

#[derive(Serialize)]
pub struct WalletResponse {
    #[serde(flatten)]
    pub snapshot: WalletSnapshot,
    pub card_state: String,
}

pub async fn wallet_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.ledger.lock().await.snapshot();

    let card_state = match state.unlock.lock().await.state() {
        CardState::Locked => "locked",
        CardState::AwaitingPin { .. } => "awaiting_pin",
        CardState::Unlocked => "unlocked",
        CardState::LockedOut => "locked_out",
    };

    Json(WalletResponse {
        snapshot,
        card_state: card_state.to_string(),
    })
}

pub async fn restaurants_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RestaurantFilter>,
) -> impl IntoResponse {
    let shown = state.catalog.lock().await.browse(&filter);

    Json(shown)
}

#[derive(Deserialize)]
pub struct FavoritePayload {
    pub name: String,
}

pub async fn favorite_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FavoritePayload>,
) -> Result<impl IntoResponse, AppError> {
    if !state.catalog.lock().await.toggle_favorite(&payload.name) {
        return Err(AppError::MalformedPayload);
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn signup_handler(Json(form): Json<SignupForm>) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    Ok((StatusCode::CREATED, "Account created"))
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub role: Role,
    pub pin: String,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    state.secrets.verify(payload.role, &payload.pin)?;

    Ok((StatusCode::OK, "Logged in"))
}

#[derive(Deserialize)]
pub struct MealPackPayload {
    pub count: u32,
}

pub async fn buy_meals_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MealPackPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.count == 0 {
        return Err(AppError::MalformedPayload);
    }

    let total = state.ledger.lock().await.credit_meals(payload.count).await?;

    Ok(Json(serde_json::json!({ "totalMeals": total })))
}

pub async fn use_meal_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let remaining = state.ledger.lock().await.use_meal().await?;

    Ok(Json(serde_json::json!({ "remaining": remaining })))
}

#[derive(Deserialize)]
pub struct ThemePayload {
    pub theme: String,
}

pub async fn theme_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let theme = state
        .storage
        .get(KEY_THEME)
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?
        .unwrap_or_else(|| "light".to_string());

    Ok(Json(serde_json::json!({ "theme": theme })))
}

pub async fn set_theme_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ThemePayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.theme != "light" && payload.theme != "dark" {
        return Err(AppError::MalformedPayload);
    }

    state
        .storage
        .put(KEY_THEME, &payload.theme)
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct BoardQuery {
    pub status: Option<OrderStatus>,
}

pub async fn board_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoardQuery>,
) -> impl IntoResponse {
    let board = state.board.lock().await;

    Json(serde_json::json!({
        "counts": board.counts(),
        "orders": board.tab(query.status),
    }))
}

#[derive(Deserialize)]
pub struct BoardOrderPayload {
    pub id: u32,
}

pub async fn board_advance_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BoardOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let status = state.board.lock().await.advance(payload.id)?;

    Ok(Json(serde_json::json!({ "id": payload.id, "status": status })))
}

pub async fn board_decline_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BoardOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    state.board.lock().await.decline(payload.id)?;

    Ok(StatusCode::NO_CONTENT)
}
