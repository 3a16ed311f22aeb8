use crate::entry::LogEntry;
use crate::formatter::Formatter;
use crate::value::{FieldValue, Fields};
use chrono::Utc;
use std::error::Error;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Event counters shared between a [`JsonLayer`] and its owner.
#[derive(Clone, Debug, Default)]
pub struct LayerStats {
    total_events: Arc<AtomicU64>,
    written_events: Arc<AtomicU64>,
    failed_events: Arc<AtomicU64>,
}

impl LayerStats {
    /// Events observed by the layer.
    pub fn total(&self) -> u64 {
        self.total_events.load(Ordering::Relaxed)
    }

    /// Events formatted and handed to the writer.
    pub fn written(&self) -> u64 {
        self.written_events.load(Ordering::Relaxed)
    }

    /// Events dropped because formatting or writing failed.
    pub fn failed(&self) -> u64 {
        self.failed_events.load(Ordering::Relaxed)
    }
}

/// `tracing_subscriber` layer that turns every event into a [`LogEntry`],
/// renders it with a [`Formatter`] and writes the bytes to a
/// [`MakeWriter`].
///
/// The `message` field becomes the entry message; all other fields become
/// attributes. Fields recorded as `&dyn Error` are kept as error-like
/// values. The entry time is taken when the event is observed.
pub struct JsonLayer<F, W> {
    formatter: F,
    make_writer: W,
    stats: LayerStats,
}

impl<F, W> JsonLayer<F, W>
where
    F: Formatter,
    W: for<'a> MakeWriter<'a>,
{
    pub fn new(formatter: F, make_writer: W) -> Self {
        Self {
            formatter,
            make_writer,
            stats: LayerStats::default(),
        }
    }

    /// Handle to this layer's counters; stays valid after the layer is
    /// moved into a subscriber.
    pub fn stats(&self) -> LayerStats {
        self.stats.clone()
    }

    fn emit(&self, event: &Event<'_>, entry: &LogEntry) -> std::io::Result<()> {
        let bytes = self
            .formatter
            .format(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut writer = self.make_writer.make_writer_for(event.metadata());
        writer.write_all(&bytes)?;
        writer.flush()
    }
}

impl<S, F, W> Layer<S> for JsonLayer<F, W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    F: Formatter + 'static,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.stats.total_events.fetch_add(1, Ordering::Relaxed);

        let mut fields = Fields::new();
        let mut message: Option<String> = None;
        event.record(&mut FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        });

        let entry = LogEntry {
            message: message.unwrap_or_default(),
            level: (*event.metadata().level()).into(),
            time: Utc::now(),
            attributes: fields,
        };

        match self.emit(event, &entry) {
            Ok(()) => {
                self.stats.written_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("dropping log entry: {}", e);
            }
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.insert(field, FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, FieldValue::from_error(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, FieldValue::String(format!("{:?}", value)));
        }
    }
}
