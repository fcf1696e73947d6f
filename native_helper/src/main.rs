//! Native helper - loads the native library and bootstraps an offscreen GL context.

#![warn(rust_2018_idioms, future_incompatible)]
#![deny(clippy::all, clippy::if_not_else, clippy::enum_glob_use)]

use std::process;

use log::error;

use native_helper::cli::Options;
use native_helper::config::{self, Config};
use native_helper::loader::SystemLoader;
use native_helper::{logging, provider, startup};

fn main() {
    // Load command line options.
    let options = Options::new();

    // Initialize the logger as soon as possible as to capture output from other subsystems.
    logging::initialize(&options).expect("Unable to initialize logger");

    // Load configuration file.
    let config = config::load(&options);

    // Update the log level from config.
    log::set_max_level(config.debug.log_level);

    if let Err(err) = run(&config) {
        error!("{}", err);
        process::exit(1);
    }
}

/// Load the native library, then create, report and release a context.
fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let library = startup::load_library(&SystemLoader, config)?;

    let mut provider = provider::from_config(config, &library)?;
    startup::run(&mut *provider)?;

    Ok(())
}
