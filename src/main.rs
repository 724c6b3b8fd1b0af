use thermokinetics_guide::Utils::logging::{apply_log_level, init_logging};
use thermokinetics_guide::cli::cli_main::run_interactive_menu;
use thermokinetics_guide::guide_config::{DEFAULT_LOG_LEVEL, GuideConfigManager};

pub fn main() {
    // logger first, so problems with the configuration file are reported
    if let Err(e) = init_logging(DEFAULT_LOG_LEVEL) {
        eprintln!("Logger is not available: {}", e);
    }
    // optional argument: path of the configuration file
    let manager = match std::env::args().nth(1) {
        Some(config_file) => GuideConfigManager::with_config_file(config_file),
        None => GuideConfigManager::new(),
    };
    apply_log_level(&manager.get_config().log_level);
    if let Err(e) = run_interactive_menu(manager) {
        eprintln!("\x1b[31m{}\x1b[0m", e);
        std::process::exit(1);
    }
}
