//! HTTP/REST API layer for PPSS.
//!
//! Axum-based JSON API mounted at `/api`, with permissive CORS and
//! `{ "error": "..." }` error bodies.

pub mod error;
pub mod handlers;
pub mod router;
