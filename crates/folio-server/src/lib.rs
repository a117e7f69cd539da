//! Folio HTTP server.
//!
//! Wires the document store, credential store, and session table into an
//! Axum router serving the document pages at `/` and sign-in at `/users/*`,
//! plus the background worker that prunes expired sessions.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod worker;
