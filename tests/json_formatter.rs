use chrono::{TimeZone, Utc};
use json_log_formatter::{
    FieldKeyMap, FieldValue, FormatError, Formatter, FormatterConfig, JsonFormatter, Level,
    LogEntry, TimestampFormat,
};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt;

#[derive(Debug)]
struct Walrus;

impl fmt::Display for Walrus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("wild walrus")
    }
}

impl Error for Walrus {}

fn render(formatter: &JsonFormatter, entry: &LogEntry) -> Map<String, Value> {
    let bytes = formatter.format(entry).expect("format entry");
    assert_eq!(bytes.last(), Some(&b'\n'));
    match serde_json::from_slice(&bytes[..bytes.len() - 1]).expect("valid json") {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn fields(doc: &Map<String, Value>) -> &Map<String, Value> {
    doc["fields"].as_object().expect("fields object")
}

#[test]
fn error_not_lost() {
    let entry = LogEntry::default().with_error("error", &Walrus);
    let doc = render(&JsonFormatter::default(), &entry);
    assert_eq!(fields(&doc)["error"], "wild walrus");
}

#[test]
fn error_not_lost_on_field_not_named_error() {
    let entry = LogEntry::default().with_error("omg", &Walrus);
    let doc = render(&JsonFormatter::default(), &entry);
    assert_eq!(fields(&doc)["omg"], "wild walrus");
}

#[test]
fn attribute_named_time_is_untouched() {
    let entry = LogEntry::default().with_field("time", "right now!");
    let doc = render(&JsonFormatter::default(), &entry);

    assert_eq!(fields(&doc)["time"], "right now!");
    assert!(!fields(&doc).contains_key("fields.time"));
    assert_eq!(doc["timestamp"], "0001-01-01T00:00:00Z");
}

#[test]
fn clash_with_timestamp() {
    let time = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
    let entry = LogEntry::new(Level::Info, "tick")
        .at(time)
        .with_field("timestamp", "yesterday");
    let doc = render(&JsonFormatter::default(), &entry);

    assert_eq!(doc["timestamp"], "2020-05-17T08:30:00Z");
    assert_eq!(fields(&doc)["timestamp"], "yesterday");
    assert_eq!(fields(&doc)["fields.timestamp"], "yesterday");
}

#[test]
fn clash_with_message() {
    let entry = LogEntry::new(Level::Info, "real").with_field("message", "impostor");
    let doc = render(&JsonFormatter::default(), &entry);

    assert_eq!(doc["message"], "real");
    assert_eq!(fields(&doc)["fields.message"], "impostor");
}

#[test]
fn clash_with_level() {
    let entry = LogEntry::new(Level::Error, "x").with_field("level", "something");
    let doc = render(&JsonFormatter::default(), &entry);

    assert_eq!(doc["level"], "error");
    assert_eq!(fields(&doc)["level"], "something");
    assert_eq!(fields(&doc)["fields.level"], "something");
}

#[test]
fn clash_preserves_structured_values() {
    let entry = LogEntry::default().with_field("level", vec![1, 2, 3]);
    let doc = render(&JsonFormatter::default(), &entry);
    assert_eq!(fields(&doc)["fields.level"], json!([1, 2, 3]));
}

#[test]
fn clash_with_remapped_fields() {
    let formatter = JsonFormatter::new(FormatterConfig::default().field_map(
        FieldKeyMap::default()
            .time("@timestamp")
            .level("@level")
            .message("@message"),
    ));
    let entry = LogEntry::new(Level::Info, "structured").with_fields([
        ("@timestamp", "@timestamp"),
        ("@level", "@level"),
        ("@message", "@message"),
        ("timestamp", "timestamp"),
        ("level", "level"),
        ("msg", "msg"),
    ]);
    let doc = render(&formatter, &entry);

    for field in ["timestamp", "level", "msg"] {
        assert_eq!(fields(&doc)[field], field);
        assert!(!fields(&doc).contains_key(&format!("fields.{}", field)));
        assert!(!doc.contains_key(field));
    }

    assert_eq!(doc["@timestamp"], "0001-01-01T00:00:00Z");
    assert_eq!(doc["@level"], "info");
    assert_eq!(doc["@message"], "structured");
    for field in ["@timestamp", "@level", "@message"] {
        assert_eq!(fields(&doc)[field], field);
        assert_eq!(fields(&doc)[&format!("fields.{}", field)], field);
    }
}

#[test]
fn entry_ends_with_single_newline() {
    let entry = LogEntry::default().with_field("level", "something");
    let bytes = JsonFormatter::default().format(&entry).unwrap();

    assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);
    assert_eq!(bytes.last(), Some(&b'\n'));
    assert!(!bytes[..bytes.len() - 1].ends_with(b" "));
}

#[test]
fn oh_hai_scenario() {
    let entry = LogEntry::new(Level::Info, "oh hai");
    let bytes = JsonFormatter::default().format(&entry).unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        doc,
        json!({
            "timestamp": "0001-01-01T00:00:00Z",
            "level": "info",
            "message": "oh hai",
            "fields": {}
        })
    );
}

#[test]
fn custom_level_key() {
    let formatter = JsonFormatter::new(
        FormatterConfig::default().field_map(FieldKeyMap::default().level("somelevel")),
    );
    let doc = render(&formatter, &LogEntry::default().with_field("level", "something"));

    assert_eq!(doc["somelevel"], "info");
    assert!(!doc.contains_key("level"));
    assert_eq!(fields(&doc)["level"], "something");
}

#[test]
fn custom_time_key() {
    let formatter = JsonFormatter::new(
        FormatterConfig::default().field_map(FieldKeyMap::default().time("timeywimey")),
    );
    let doc = render(&formatter, &LogEntry::default());

    assert!(doc.contains_key("timeywimey"));
    assert!(!doc.contains_key("timestamp"));
}

#[test]
fn disable_timestamp() {
    let formatter = JsonFormatter::new(FormatterConfig::default().disable_timestamp(true));
    let bytes = formatter
        .format(&LogEntry::default().with_field("level", "something"))
        .unwrap();

    assert!(!String::from_utf8(bytes).unwrap().contains("timestamp"));
}

#[test]
fn disable_remapped_timestamp() {
    let formatter = JsonFormatter::new(
        FormatterConfig::default()
            .disable_timestamp(true)
            .field_map(FieldKeyMap::default().time("@t")),
    );
    let doc = render(&formatter, &LogEntry::default());

    assert!(!doc.contains_key("@t"));
    assert!(!doc.contains_key("timestamp"));
    assert_eq!(doc.len(), 3);
}

#[test]
fn enable_timestamp() {
    let doc = render(&JsonFormatter::default(), &LogEntry::default());
    assert!(doc.contains_key("timestamp"));
}

#[test]
fn custom_timestamp_format() {
    let formatter = JsonFormatter::new(
        FormatterConfig::default().timestamp_format(TimestampFormat::pattern("%d.%m.%Y")),
    );
    let time = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
    let doc = render(&formatter, &LogEntry::default().at(time));

    assert_eq!(doc["timestamp"], "31.12.2021");
}

#[test]
fn message_is_raw() {
    let entry = LogEntry::new(Level::Debug, "quote \" and\nnewline");
    let bytes = JsonFormatter::default().format(&entry).unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(doc["message"], "quote \" and\nnewline");
    assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);
}

#[test]
fn nested_values_are_carried() {
    let entry = LogEntry::default()
        .with_field("payload", FieldValue::from(json!({ "id": 7, "tags": ["a", "b"] })))
        .with_field("missing", None::<String>)
        .with_field("ratio", 0.5);
    let doc = render(&JsonFormatter::default(), &entry);

    assert_eq!(fields(&doc)["payload"], json!({ "id": 7, "tags": ["a", "b"] }));
    assert_eq!(fields(&doc)["missing"], Value::Null);
    assert_eq!(fields(&doc)["ratio"], 0.5);
}

#[test]
fn unrepresentable_value_fails_encoding() {
    let entry = LogEntry::default().with_field("ratio", f64::NAN);
    let err = JsonFormatter::default().format(&entry).unwrap_err();

    assert!(matches!(err, FormatError::Encoding(_)));
    assert!(err.to_string().starts_with("failed to marshal fields to JSON"));
}
