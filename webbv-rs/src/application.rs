use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

/// A buried-volume calculator for uploaded XYZ geometries.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Display more information about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub verbose: bool,
    /// Be very verbose about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub trace: bool,
}

/// Set up the log output. `RUST_LOG` wins over the command line flags.
pub fn init_logging(cli: &Cli) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }
    let level = if cli.trace {
        LevelFilter::Trace
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = Builder::new();
    builder
        .filter_module("webbv_rs", level)
        .filter_module("webbv_gui", level)
        .format_target(false)
        .init();
}
