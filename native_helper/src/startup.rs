//! Startup flow of the `native-helper` executable.

use log::{error, info};

use crate::config::Config;
use crate::loader::{self, Loader};
use crate::provider::{self, ContextProvider};

/// Load the configured native library, by explicit path when one is set.
pub fn load_library<L: Loader>(loader: &L, config: &Config) -> loader::Result<L::Library> {
    match &config.library.path {
        Some(path) => loader::load_path(loader, path),
        None => loader::load(loader, &config.library.name),
    }
}

/// Create a context, report it, then release it and shut the provider down.
pub fn run<P: ContextProvider + ?Sized>(provider: &mut P) -> provider::Result<()> {
    let context = match provider.create_context() {
        Ok(context) => context,
        Err(err) if err.is_illegal_state() => {
            error!("Context could not be made current; aborting");
            return Err(err);
        },
        Err(err) => return Err(err),
    };

    info!("Context {:?} ready (current: {:?})", context.raw_handle(), context.is_current());

    context.release()?;
    provider.shutdown()
}
