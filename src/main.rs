use clap::Parser;
use log::{error, warn};

use netscope::cli::Cli;
use netscope::{run_scope, Lifecycle, ScopeSink, ShutdownTrigger};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    let cfg = match cli.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    let trigger = ShutdownTrigger::new();
    if let Err(e) = netscope::signal::install_interrupt_handler(trigger.clone()) {
        warn!("could not install Ctrl+C handler: {e}");
    }

    let sink = ScopeSink::new(cfg.max_samples);
    let lifecycle = Lifecycle::start(&cfg, sink.clone());

    if let Err(e) = run_scope(&cfg, sink, lifecycle, trigger) {
        error!("{e}");
        std::process::exit(1);
    }
}
