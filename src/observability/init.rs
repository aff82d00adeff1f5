//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every exported span.
const SERVICE_NAME: &str = "docseek";

/// Installs the global subscriber: an `EnvFilter` built from
/// `config.trace_level` in front of an OpenTelemetry layer that exports to
/// `<data dir>/docseek-otlp.json`.
///
/// Tracing is optional. If the data directory cannot be created nothing is
/// installed, and a second call leaves the first subscriber in place.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = tracer::create_tracer_provider(data_dir.join("docseek-otlp.json"), resource);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)));

    let _ = subscriber.try_init();
}
