use json_log_formatter::init::{init_json_logging, LayerConfig};
use std::error::Error;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn Error>> {
    let stats = init_json_logging(LayerConfig::default())?;

    info!("starting service");

    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "invalid password");
    error!(
        user_id = 42,
        error = &err as &(dyn Error + 'static),
        "authentication failed"
    );

    eprintln!("wrote {} of {} events", stats.written(), stats.total());
    Ok(())
}
