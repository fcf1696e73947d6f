//! Native library loading and offscreen OpenGL ES 3 context bootstrapping.
//!
//! Startup is two independent steps: [`loader::load`] brings the application's native
//! library into the process, and a [`provider::ContextProvider`] produces a context that is
//! current on the calling thread, either through EGL ([`bootstrap::bootstrap`]) or through
//! an entry point exported by the native library.

#![warn(rust_2018_idioms, future_incompatible)]
#![deny(clippy::all, clippy::if_not_else, clippy::enum_glob_use)]

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod egl;
pub mod loader;
pub mod logging;
pub mod provider;
pub mod startup;
