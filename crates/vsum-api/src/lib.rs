//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload into the analysis pipeline's input prefix
//! - Readiness polling and assembled results as JSON
//! - Thin HTML pages over the same flow
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{UploadError, UploadPipeline, UploadReceipt};
pub use state::AppState;
