//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! Swallowed storage failures (journal appends, recovery, backend fallback)
//! surface here as `warn` events, so running without this initialized means
//! running blind.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Keeps the OTel tracer provider alive so it can be flushed on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Initialize the global tracing subscriber.
///
/// Installs a structured `fmt` layer filtered by `RUST_LOG` (defaulting to
/// `info`). When `enable_otel` is true, tracing spans are additionally
/// bridged to OpenTelemetry with a stdout exporter -- suitable for local
/// development; swap the exporter for OTLP in production.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("colloquy");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OTel tracer provider.
///
/// Safe to call when OTel was never enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("warning: tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_shutdown() {
        // First init wins; a second init reports the conflict instead of
        // panicking.
        init_tracing(false).unwrap();
        assert!(init_tracing(false).is_err());
        shutdown_tracing();
    }
}
