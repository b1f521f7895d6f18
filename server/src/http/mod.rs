//! HTTP API: route table, handlers, payload normalisation and error mapping.

pub mod handlers;
pub mod payload;
pub mod problem;
pub mod routes;
