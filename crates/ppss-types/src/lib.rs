//! Shared domain types for the Public Participation Support System (PPSS).
//!
//! This crate contains the domain types used across the workspace:
//! sessions and agent profiles, conversation messages, workflow stages,
//! stage summaries, analysis queries, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod analysis;
pub mod config;
pub mod error;
pub mod gateway;
pub mod message;
pub mod session;
pub mod stage;
