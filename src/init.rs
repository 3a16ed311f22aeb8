use crate::config::FormatterConfig;
use crate::error::InitError;
use crate::formatter::JsonFormatter;
use crate::layer::{JsonLayer, LayerStats};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration for installing the JSON layer as the global subscriber.
///
/// **Fields**
/// - `formatter`: [`FormatterConfig`] used for every event.
/// - `max_level`: most verbose level passed on to the formatter; events
///   above it never reach the layer.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub formatter: FormatterConfig,
    pub max_level: LevelFilter,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            formatter: FormatterConfig::default(),
            max_level: LevelFilter::INFO,
        }
    }
}

/// Install a global `tracing` subscriber writing JSON lines to stdout.
///
/// **Returns**
/// - [`LayerStats`] for the installed layer.
/// - `Err(InitError::SetGlobalDefault)` if a global subscriber was
///   already set.
pub fn init_json_logging(config: LayerConfig) -> Result<LayerStats, InitError> {
    init_json_logging_with_writer(config, std::io::stdout)
}

/// Same as [`init_json_logging`], writing to `make_writer` instead of
/// stdout.
pub fn init_json_logging_with_writer<W>(
    config: LayerConfig,
    make_writer: W,
) -> Result<LayerStats, InitError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = JsonLayer::new(JsonFormatter::new(config.formatter), make_writer);
    let stats = layer.stats();

    let subscriber = Registry::default().with(config.max_level).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(stats)
}
