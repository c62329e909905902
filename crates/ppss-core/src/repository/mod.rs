//! Repository trait definitions (ports) for PPSS persistence.
//!
//! All traits use native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in ppss-infra (e.g., `SqliteSessionRepository`).
//! The stores are keyed independently: nothing enforces that a conversation
//! references a session whose profile exists.

pub mod analysis;
pub mod conversation;
pub mod session;
pub mod summary;
