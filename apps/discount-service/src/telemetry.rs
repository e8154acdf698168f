//! Logging setup.
//!
//! Called once from `main`. Nothing else in the service touches global
//! subscriber state.
//!
//! ## JSON Line Shape
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.123456Z","severity":"INFO",
//!  "message":"[ApplyDiscount] completed request","target":"...",
//!  "code":"SAVE10","currency":"USD", ...}
//! ```
//! `timestamp` and `severity` are the keys the log collector ingests.

use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};
use crate::error::ServiceError;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LogConfig) -> Result<(), ServiceError> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().event_format(CollectorJson))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .pretty(),
            )
            .try_init(),
    };

    result.map_err(|e| ServiceError::Telemetry(e.to_string()))
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, ServiceError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ServiceError::Telemetry(format!("invalid LOG_LEVEL '{}': {}", config.level, e))),
    }
}

// =============================================================================
// Collector JSON Format
// =============================================================================

/// One JSON object per event, keyed `timestamp` / `severity` / `message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorJson;

impl<S, N> FormatEvent<S, N> for CollectorJson
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut timestamp = String::new();
        SystemTime.format_time(&mut Writer::new(&mut timestamp))?;

        let mut fields = JsonFields::default();
        event.record(&mut fields);
        let mut record = fields.0;
        let message = record.remove("message").unwrap_or_else(|| Value::String(String::new()));

        record.insert("timestamp".to_string(), Value::String(timestamp));
        record.insert("severity".to_string(), Value::from(severity(metadata.level())));
        record.insert("message".to_string(), message);
        record.insert("target".to_string(), Value::from(metadata.target()));

        let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Collector severity names.
fn severity(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG | Level::TRACE => "DEBUG",
    }
}

#[derive(Default)]
struct JsonFields(Map<String, Value>);

impl JsonFields {
    fn insert(&mut self, field: &Field, value: Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}
