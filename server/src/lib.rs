//! Ratedesk server
//!
//! Serves the exchange-rate table over HTTP: rate lookup with inverse
//! derivation, amount conversion, and token-gated rate administration.

pub mod auth;
pub mod config;
pub mod http;
pub mod metrics;
pub mod state;

pub use auth::{AuthError, Authenticator, StaticTokenAuthenticator};
pub use config::ServerConfig;
pub use metrics::{Metrics, MetricsSnapshot, SharedMetrics};
pub use state::AppState;
