use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    Layer, Registry,
};

/// One rotated file per level; each file holds its level and everything above it
const LEVEL_FILES: [(&str, LevelFilter); 4] = [
    ("debug.log", LevelFilter::DEBUG),
    ("info.log", LevelFilter::INFO),
    ("warn.log", LevelFilter::WARN),
    ("error.log", LevelFilter::ERROR),
];

fn file_layers<S>(log_dir: &str) -> Vec<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    LEVEL_FILES
        .iter()
        .map(|(file, level)| {
            tracing_subscriber::fmt::layer()
                .with_writer(tracing_appender::rolling::daily(log_dir, file))
                .with_ansi(false)
                .with_filter(*level)
                .boxed()
        })
        .collect()
}

/// Initialize console and file logging.
///
/// Files rotate daily, e.g. `logs/info.log.2024-12-22`. Console output goes
/// to stderr so command output on stdout stays clean.
pub fn init(log_dir: &str, default_filter: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(file_layers::<Registry>(log_dir))
        .with(console)
        .with(env_filter)
        .init();

    Ok(())
}
