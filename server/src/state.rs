//! Shared request state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratedesk_fx::{RateResolver, SharedRateStore};

use crate::auth::Authenticator;
use crate::metrics::{Metrics, SharedMetrics};

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Rate table.
    pub store: SharedRateStore,
    /// Resolver over `store`.
    pub resolver: RateResolver,
    /// Gate for mutation routes.
    pub auth: Arc<dyn Authenticator>,
    /// Request counters.
    pub metrics: SharedMetrics,
    /// When this process started serving.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state over a store and an authenticator.
    pub fn new(store: SharedRateStore, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            resolver: RateResolver::new(store.clone()),
            store,
            auth,
            metrics: Arc::new(Metrics::new()),
            started_at: Utc::now(),
        }
    }
}
