//! Infrastructure implementations for PPSS.
//!
//! SQLite-backed repositories for the traits in `ppss-core`, the live
//! OpenAI-compatible chat gateway, and configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
