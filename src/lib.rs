//! Navalha Salon Management System
//!
//! A Rust REST API server for multi-tenant salon management, centered on
//! the appointment scheduling and booking-concurrency engine:
//! availability computation, hold-based slot reservation for online
//! booking, deposit gating, and the appointment lifecycle.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: sqlx::PgPool,
}
