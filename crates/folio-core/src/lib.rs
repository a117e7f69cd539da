//! Core library for Folio.
//!
//! Contains the document store, credential store, sign-in gate, renderer,
//! and session table. This crate depends on `folio-storage` for the backend
//! trait and knows nothing about HTTP, cookies, or HTML pages.

pub mod auth;
pub mod credentials;
pub mod document;
pub mod error;
pub mod render;
pub mod session;
