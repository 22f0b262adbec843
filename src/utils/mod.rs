// src/utils/mod.rs
use log::info;

/// Installs the global logger at `level`, writing to stderr so command
/// output on stdout stays machine readable.
pub fn setup_logging(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("redis", log::LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}
