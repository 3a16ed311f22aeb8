use chrono::Utc;
use json_log_formatter::{
    FieldKeyMap, Formatter, FormatterConfig, JsonFormatter, Level, LogEntry, TimestampFormat,
};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let formatter = JsonFormatter::new(
        FormatterConfig::default()
            .timestamp_format(TimestampFormat::pattern("%Y-%m-%dT%H:%M:%S%.3fZ"))
            .field_map(
                FieldKeyMap::default()
                    .time("@timestamp")
                    .level("@level")
                    .message("@message"),
            ),
    );

    let entry = LogEntry::new(Level::Warning, "disk almost full")
        .at(Utc::now())
        .with_field("mount", "/var")
        .with_field("used_pct", 93.5)
        .with_field("@message", "shadowed by the entry message");

    let bytes = formatter.format(&entry)?;
    std::io::stdout().write_all(&bytes)?;
    Ok(())
}
