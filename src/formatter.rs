use crate::config::{FieldKey, FieldKeyMap, FormatterConfig};
use crate::entry::LogEntry;
use crate::error::FormatError;
use crate::value::Fields;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key of the nested object holding the entry's attributes.
pub const FIELDS_KEY: &str = "fields";

/// Prefix given to an attribute that shares its name with a reserved key.
pub const CLASH_PREFIX: &str = "fields.";

/// Renders a [`LogEntry`] into a self-contained, newline-terminated
/// document.
///
/// Implementations must be callable from many threads at once; the
/// [`JsonLayer`](crate::layer::JsonLayer) shares one instance across every
/// event it observes.
pub trait Formatter: Send + Sync {
    /// Format a single entry.
    ///
    /// **Returns**
    /// - `Ok(bytes)` holding exactly one document followed by `\n`.
    /// - `Err(..)` if the document could not be encoded. Nothing is
    ///   partially emitted in that case.
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>, FormatError>;
}

impl<F: Formatter + ?Sized> Formatter for Arc<F> {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>, FormatError> {
        (**self).format(entry)
    }
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>, FormatError> {
        (**self).format(entry)
    }
}

/// Single-line JSON formatter.
///
/// Every attribute is nested under `"fields"`; the entry's time, level and
/// message sit at the top level under the names resolved from the
/// [`FieldKeyMap`]. An attribute whose name equals one of those resolved
/// names is additionally copied to `"fields.<name>"` inside `"fields"`.
///
/// ```
/// use json_log_formatter::{Formatter, JsonFormatter, Level, LogEntry};
///
/// let formatter = JsonFormatter::default();
/// let out = formatter.format(&LogEntry::new(Level::Info, "oh hai")).unwrap();
/// assert_eq!(
///     out,
///     b"{\"fields\":{},\"level\":\"info\",\"message\":\"oh hai\",\"timestamp\":\"0001-01-01T00:00:00Z\"}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: FormatterConfig,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Slot {
    Text(String),
    Fields(Fields),
}

impl JsonFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>, FormatError> {
        let field_map = &self.config.field_map;

        let mut fields: Fields = entry
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().normalized()))
            .collect();
        prefix_field_clashes(&mut fields, field_map);

        let mut data: BTreeMap<String, Slot> = BTreeMap::new();
        data.insert(FIELDS_KEY.to_string(), Slot::Fields(fields));

        if !self.config.disable_timestamp {
            data.insert(
                field_map.resolve(FieldKey::Time).to_string(),
                Slot::Text(self.config.timestamp_format.render(&entry.time)),
            );
        }
        data.insert(
            field_map.resolve(FieldKey::Message).to_string(),
            Slot::Text(entry.message.clone()),
        );
        data.insert(
            field_map.resolve(FieldKey::Level).to_string(),
            Slot::Text(entry.level.to_string()),
        );

        let mut serialized = serde_json::to_vec(&data)?;
        serialized.push(b'\n');
        Ok(serialized)
    }
}

/// Copy every attribute named like a reserved key to `"fields.<name>"`.
///
/// The original attribute stays in place. Roles are checked in the order
/// time, message, level.
pub fn prefix_field_clashes(fields: &mut Fields, field_map: &FieldKeyMap) {
    for key in [FieldKey::Time, FieldKey::Message, FieldKey::Level] {
        let name = field_map.resolve(key);
        if let Some(value) = fields.get(name).cloned() {
            fields.insert(format!("{}{}", CLASH_PREFIX, name), value);
        }
    }
}
