//! Error types for Navalha server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    BadValue = 5,
    SlotConflict = 6,
    HoldExpired = 7,
    HoldAlreadyConsumed = 8,
    InvalidTransition = 9,
    DepositRequired = 10,
    DepositNotPaid = 11,
    ClientBlocked = 12,
    PaymentFailure = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Slot conflict: {0}")]
    SlotConflict(String),

    #[error("Hold expired: {0}")]
    HoldExpired(String),

    #[error("Hold already consumed: {0}")]
    HoldAlreadyConsumed(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Deposit required: {0}")]
    DepositRequired(String),

    #[error("Deposit not paid: {0}")]
    DepositNotPaid(String),

    #[error("Client blocked: {0}")]
    ClientBlocked(String),

    #[error("Payment gateway error: {0}")]
    Payment(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    /// Overlap races lost at the storage layer surface as exclusion or
    /// unique violations; both mean "someone else took the slot".
    fn is_overlap_violation(err: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db) = err {
            matches!(db.code().as_deref(), Some("23P01") | Some("23505"))
        } else {
            false
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::SlotConflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotConflict, msg.clone())
            }
            AppError::HoldExpired(msg) => {
                (StatusCode::GONE, ErrorCode::HoldExpired, msg.clone())
            }
            AppError::HoldAlreadyConsumed(msg) => {
                (StatusCode::CONFLICT, ErrorCode::HoldAlreadyConsumed, msg.clone())
            }
            AppError::InvalidTransition(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InvalidTransition, msg.clone())
            }
            AppError::DepositRequired(msg) => {
                (StatusCode::PAYMENT_REQUIRED, ErrorCode::DepositRequired, msg.clone())
            }
            AppError::DepositNotPaid(msg) => {
                (StatusCode::PAYMENT_REQUIRED, ErrorCode::DepositNotPaid, msg.clone())
            }
            AppError::ClientBlocked(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::ClientBlocked, msg.clone())
            }
            AppError::Payment(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::PaymentFailure, msg.clone())
            }
            AppError::Database(e) if Self::is_overlap_violation(e) => (
                StatusCode::CONFLICT,
                ErrorCode::SlotConflict,
                "Slot was taken by a concurrent booking".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
