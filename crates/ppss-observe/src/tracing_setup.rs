//! Tracing subscriber initialization.
//!
//! ```no_run
//! use ppss_observe::tracing_setup::{LogFormat, TracingOptions, init_tracing};
//!
//! init_tracing(&TracingOptions {
//!     default_directive: "info".to_string(),
//!     format: LogFormat::Pretty,
//!     enable_otel: false,
//! })
//! .unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Tracer name reported on exported spans.
pub const TRACER_NAME: &str = "ppss";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines with span close timing.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Filter used when `RUST_LOG` is not set, e.g. `"info"` or `"ppss=debug"`.
    pub default_directive: String,
    pub format: LogFormat,
    /// Bridge spans to OpenTelemetry with a stdout exporter.
    pub enable_otel: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            format: LogFormat::Pretty,
            enable_otel: false,
        }
    }
}

/// `RUST_LOG` wins; otherwise `default_directive`.
fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(options: &TracingOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = build_filter(&options.default_directive);

    let otel_layer = if options.enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer(TRACER_NAME);
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(otel_layer);

    match options.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }

    Ok(())
}

/// Flush buffered spans and shut down the tracer provider, if one was installed.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TracingOptions::default();
        assert_eq!(options.default_directive, "info");
        assert_eq!(options.format, LogFormat::Pretty);
        assert!(!options.enable_otel);
    }

    #[test]
    fn test_filter_accepts_directive() {
        let filter = build_filter("ppss_api=debug,tower_http=info");
        let rendered = filter.to_string();
        assert!(rendered.contains("ppss_api=debug") || std::env::var("RUST_LOG").is_ok());
    }

    #[test]
    fn test_shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
