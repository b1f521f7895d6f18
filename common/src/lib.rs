//! RateDesk Common Types
//!
//! Currency codes, ordered currency pairs and stored rate entries shared by the
//! rate engine and the HTTP server.

pub mod monetary;
pub mod error;

pub use monetary::*;
pub use error::*;
