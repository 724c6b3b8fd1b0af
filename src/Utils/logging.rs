//! Terminal logger set-up for the guide binary.
//! The library itself only emits through the `log` facade.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Maps a level name from `guide_config.json` to a filter ("info" when unknown).
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs a `TermLogger` writing to stderr and applies `level`.
/// The logger itself accepts every level, so `apply_log_level` can later
/// narrow or widen the output (e.g. once the configuration file is read).
/// Returns an error when a logger has already been installed.
pub fn init_logging(level: &str) -> Result<(), log::SetLoggerError> {
    let config: Config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();
    TermLogger::init(
        LevelFilter::Trace,
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    apply_log_level(level);
    Ok(())
}

/// Sets the global maximum level of the `log` facade.
pub fn apply_log_level(level: &str) -> LevelFilter {
    let filter = parse_level(level);
    log::set_max_level(filter);
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARNING "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_apply_log_level() {
        assert_eq!(apply_log_level("error"), LevelFilter::Error);
        assert_eq!(log::max_level(), LevelFilter::Error);
        assert_eq!(apply_log_level("debug"), LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        apply_log_level("info");
        assert_eq!(log::max_level(), LevelFilter::Info);
    }
}
