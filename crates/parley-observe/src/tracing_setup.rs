//! Global subscriber setup.
//!
//! Log lines always go to stderr, leaving stdout for chat output. With OTel
//! enabled, spans such as `gen_ai.chat` are also exported to stdout.
//!
//! ```no_run
//! parley_observe::tracing_setup::init_tracing("warn", false).unwrap();
//! // ... run ...
//! parley_observe::tracing_setup::shutdown_tracing();
//! ```

use std::error::Error;
use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const TRACER_NAME: &str = "parley";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` if set and valid, else `default_filter`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn stdout_tracer_provider() -> SdkTracerProvider {
    SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build()
}

/// Install the global subscriber. Errors if one is already installed.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let otel_layer = enable_otel.then(|| {
        let provider = TRACER_PROVIDER.get_or_init(stdout_tracer_provider).clone();
        let tracer = provider.tracer(TRACER_NAME);
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(build_filter(default_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending spans. Does nothing unless OTel was enabled.
pub fn shutdown_tracing() {
    let Some(provider) = TRACER_PROVIDER.get() else {
        return;
    };
    if let Err(e) = provider.shutdown() {
        eprintln!("Warning: span exporter shutdown failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let filter = build_filter("info,parley=debug");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_shutdown_without_init_is_noop() {
        shutdown_tracing();
    }
}
