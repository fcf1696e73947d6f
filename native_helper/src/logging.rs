//! Logging for the native helper.
//!
//! The main executable is supposed to call `initialize()` exactly once during
//! startup. All logging messages are written to stdout, given that their
//! log-level is sufficient for the level configured in `cli::Options`.

use std::io::{self, LineWriter, Write};
use std::sync::Mutex;
use std::time::Instant;

use log::{self, Level};

use crate::cli::Options;

/// List of targets which will be logged.
const ALLOWED_TARGETS: [&str; 1] = ["native_helper"];

pub fn initialize(options: &Options) -> Result<(), log::SetLoggerError> {
    log::set_max_level(options.log_level());

    let logger = Logger::new(io::stdout());
    log::set_boxed_logger(Box::new(logger))
}

pub struct Logger<W: Write> {
    output: Mutex<LineWriter<W>>,
    start: Instant,
}

impl<W: Write + Send> Logger<W> {
    pub fn new(output: W) -> Self {
        Logger { output: Mutex::new(LineWriter::new(output)), start: Instant::now() }
    }

    fn format(&self, level: Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
        let elapsed = self.start.elapsed().as_secs_f64();
        format!("[{:.6}s] [{:<5}] [{}] {}\n", elapsed, level, target, args)
    }
}

/// Crate part of a log target.
fn target_crate(target: &str) -> &str {
    let index = target.find(':').unwrap_or(target.len());
    &target[..index]
}

impl<W: Write + Send> log::Log for Logger<W> {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        // Get target crate.
        let target = target_crate(record.target());

        // Only log our own crates.
        if !self.enabled(record.metadata()) || !ALLOWED_TARGETS.contains(&target) {
            return;
        }

        let msg = self.format(record.level(), target, record.args());

        if let Ok(mut output) = self.output.lock() {
            let _ = output.write_all(msg.as_ref());
        }
    }

    fn flush(&self) {
        if let Ok(mut output) = self.output.lock() {
            let _ = output.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::{LevelFilter, Log};

    fn written(logger: &Logger<Vec<u8>>) -> String {
        let output = logger.output.lock().unwrap();
        String::from_utf8(output.get_ref().clone()).unwrap()
    }

    #[test]
    fn strips_module_path_from_target() {
        assert_eq!(target_crate("native_helper::bootstrap"), "native_helper");
        assert_eq!(target_crate("libloading"), "libloading");
    }

    #[test]
    fn writes_own_records_only() {
        log::set_max_level(LevelFilter::Trace);
        let logger = Logger::new(Vec::new());

        logger.log(
            &log::Record::builder()
                .args(format_args!("Loaded native library native-lib"))
                .level(Level::Info)
                .target("native_helper::loader")
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .args(format_args!("foreign"))
                .level(Level::Error)
                .target("libloading::os")
                .build(),
        );
        logger.flush();

        let output = written(&logger);
        assert!(output.ends_with("[INFO ] [native_helper] Loaded native library native-lib\n"));
        assert!(!output.contains("foreign"));
        assert_eq!(output.lines().count(), 1);
    }
}
