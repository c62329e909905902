//! Business logic and repository trait definitions for PPSS.
//!
//! This crate defines the "ports" (repository traits and the chat gateway
//! trait) that the infrastructure layer implements, plus the services that
//! orchestrate them. It depends only on `ppss-types` -- never on
//! `ppss-infra` or any database/IO crate.

pub mod gateway;
pub mod prompt;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
