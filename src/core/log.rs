use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Sets up tracing. Output goes to stderr unless `log_file` is given; the
/// interactive view owns the terminal, so it wants a file.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    let app_filter = Targets::new().with_target("fxc", level_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(app_filter)
                .with(env_filter)
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .pretty()
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .with(app_filter)
                .with(env_filter)
                .try_init()?;
        }
    }
    Ok(())
}
