//! Logging for the carctl binary
//!
//! One subscriber: `EnvFilter` + compact console output, plus an OTLP span
//! exporter when `--otel` is given and the `telemetry` feature is built in.
//!
//! Usage:
//!   carctl --debug serve              # Debug logging to console
//!   carctl --otel serve               # Also export spans over OTLP
//!   RUST_LOG=carctl_server=trace,tower_http=debug carctl serve
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: info, or debug with --debug)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: carctl)

use anyhow::{anyhow, Result};
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to debug level when RUST_LOG is unset; show targets
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    let default_level = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn console_layer<S>(config: &TracingConfig) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .compact()
}

/// Where spans go when exporting
#[cfg(feature = "telemetry")]
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtlpSettings {
    endpoint: String,
    service_name: String,
}

#[cfg(feature = "telemetry")]
impl OtlpSettings {
    fn from_env() -> Self {
        Self {
            endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "carctl".to_string()),
        }
    }
}

/// Batch-exporting OTLP layer. The provider is parked in the global slot;
/// `shutdown_otel` flushes it.
#[cfg(feature = "telemetry")]
fn otlp_layer<S>(settings: &OtlpSettings) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            settings.service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer("carctl");
    let _ = opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}

/// Flush pending spans
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &TracingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console_layer(config));

    #[cfg(feature = "telemetry")]
    if config.otel {
        let settings = OtlpSettings::from_env();
        registry
            .with(otlp_layer(&settings)?)
            .try_init()
            .map_err(|err| anyhow!(err))?;

        tracing::info!(
            endpoint = %settings.endpoint,
            service = %settings.service_name,
            "exporting spans over OTLP"
        );
        return Ok(());
    }

    if config.otel {
        eprintln!("warning: --otel ignored, carctl was built without the telemetry feature");
    }

    registry.try_init().map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_sets_default_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let quiet = env_filter(&TracingConfig::default());
        let debug = env_filter(&TracingConfig {
            debug: true,
            otel: false,
        });
        assert_eq!(quiet.to_string(), "info");
        assert_eq!(debug.to_string(), "debug");
    }

    #[test]
    fn second_init_is_an_error() {
        let config = TracingConfig::default();
        init(&config).unwrap();
        assert!(init(&config).is_err());
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn otlp_settings_defaults() {
        std::env::remove_var("OTEL_EXPORTER_OTLP_ENDPOINT");
        std::env::remove_var("OTEL_SERVICE_NAME");

        let settings = OtlpSettings::from_env();
        assert_eq!(settings.endpoint, "http://localhost:4317");
        assert_eq!(settings.service_name, "carctl");
    }
}
