//! Observability setup for PPSS: structured logging plus optional
//! OpenTelemetry span export.

pub mod tracing_setup;
