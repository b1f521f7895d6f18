//! RateDesk FX Engine
//!
//! Rate storage and resolution for currency conversion.
//!
//! # Features
//!
//! - Pluggable rate stores (in-memory, SQLite) behind one trait
//! - Direct-then-inverse rate resolution
//! - Amount conversion that never yields a non-number
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ratedesk_fx::{InMemoryRateStore, RateResolver, default_rates};
//! use ratedesk_common::{Currency, CurrencyPair};
//!
//! let store = Arc::new(InMemoryRateStore::with_entries(default_rates()));
//! let resolver = RateResolver::new(store);
//!
//! // EUR-USD is stored directly, USD-CHF comes from the inverse of CHF-USD
//! let rate = resolver.resolve(&CurrencyPair::new(Currency::usd(), Currency::chf())).await?;
//! ```

pub mod store;
pub mod memory;
pub mod sqlite;
pub mod resolver;
pub mod conversion;
pub mod seed;
pub mod error;

pub use store::{seed_if_empty, RateStore, SharedRateStore};
pub use memory::InMemoryRateStore;
pub use sqlite::SqliteRateStore;
pub use resolver::{RateResolver, RateSource, ResolvedRate};
pub use conversion::{convert, sanitize_amount, Quote};
pub use seed::default_rates;
pub use error::{RateError, RateResult};
