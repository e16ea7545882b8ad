use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use wallet::{
    auth::SignupError,
    board::BoardError,
    gateway::GatewayError,
    ledger::LedgerError,
    order::OrderError,
    unlock::UnlockError,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Unlock(#[from] UnlockError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Signup(#[from] SignupError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

fn ledger_status(e: &LedgerError) -> StatusCode {
    match e {
        LedgerError::InsufficientBalance { .. } | LedgerError::WalletEmpty => {
            StatusCode::PAYMENT_REQUIRED
        }
        LedgerError::BalanceOverflow => StatusCode::BAD_REQUEST,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn gateway_status(e: &GatewayError) -> StatusCode {
    match e {
        GatewayError::Declined(_) => StatusCode::PAYMENT_REQUIRED,
        GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::Ledger(e) => ledger_status(e),
            AppError::Unlock(e) => match e {
                UnlockError::PinLength => StatusCode::BAD_REQUEST,
                UnlockError::WrongPin { .. } => StatusCode::UNAUTHORIZED,
                UnlockError::LockedOut => StatusCode::LOCKED,
                UnlockError::NotAwaitingPin => StatusCode::CONFLICT,
                UnlockError::Gateway(e) => gateway_status(e),
            },
            AppError::Order(e) => match e {
                OrderError::CardNotActive => StatusCode::CONFLICT,
                OrderError::TotalOverflow => StatusCode::BAD_REQUEST,
                OrderError::Ledger(e) => ledger_status(e),
            },
            AppError::Signup(e) => match e {
                SignupError::WrongRolePin(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::Gateway(e) => gateway_status(e),
            AppError::Board(e) => match e {
                BoardError::NotFound(_) => StatusCode::NOT_FOUND,
                BoardError::AlreadyReady(_) => StatusCode::CONFLICT,
            },
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
