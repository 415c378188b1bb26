use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Sends tracing output to `log_file`, since the terminal belongs to the UI.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless.
pub fn init(log_file: &str) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    tracing::info!("tally logging initialized");
    Ok(())
}
