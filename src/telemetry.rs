use color_eyre::eyre::{Result, WrapErr};
use opentelemetry::{global, trace::TracerProvider};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{logs::SdkLoggerProvider, trace::SdkTracerProvider, Resource};
use std::sync::LazyLock;
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

const SERVICE_NAME: &str = "repo-health-search";

static RESOURCE: LazyLock<Resource> =
    LazyLock::new(|| Resource::builder().with_service_name(SERVICE_NAME).build());

/// OTLP providers that must be flushed before exit.
pub struct Telemetry {
    providers: Option<(SdkLoggerProvider, SdkTracerProvider)>,
}

impl Telemetry {
    pub fn shutdown(self) -> Result<()> {
        if let Some((logger_provider, tracer_provider)) = self.providers {
            tracer_provider
                .shutdown()
                .wrap_err("Failed to flush trace exporter")?;
            logger_provider
                .shutdown()
                .wrap_err("Failed to flush log exporter")?;
        }
        Ok(())
    }
}

fn init_logs() -> Result<SdkLoggerProvider> {
    let exporter = LogExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .build()
        .wrap_err("Failed to create log exporter")?;

    Ok(SdkLoggerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(RESOURCE.clone())
        .build())
}

fn init_traces() -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .build()
        .wrap_err("Failed to create trace exporter")?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(RESOURCE.clone())
        .build())
}

/// Installs the global subscriber: env filter, fmt output, span traces for
/// error reports, and OTLP export when `otlp` is set.
pub fn init(otlp: bool) -> Result<Telemetry> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .wrap_err("Failed to create EnvFilter")?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let providers = if otlp {
        Some((init_logs()?, init_traces()?))
    } else {
        None
    };

    let (log_bridge, trace_layer) = match &providers {
        Some((logger_provider, tracer_provider)) => {
            global::set_tracer_provider(tracer_provider.clone());
            (
                Some(OpenTelemetryTracingBridge::new(logger_provider)),
                Some(tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer(SERVICE_NAME))),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .with(trace_layer)
        .with(log_bridge)
        .try_init()
        .wrap_err("Failed to set up global tracing subscriber")?;

    Ok(Telemetry { providers })
}
