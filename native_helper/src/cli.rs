use std::cmp::{max, min};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::config::Config;
use crate::provider::ProviderKind;

/// CLI options for the main native helper executable.
#[derive(Parser, Default, Debug)]
#[clap(author, about, version)]
pub struct Options {
    /// Specify alternative configuration file [default:
    /// $XDG_CONFIG_HOME/native_helper/native_helper.toml].
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Name of the native library to load.
    #[clap(long, env = "NATIVE_HELPER_LIBRARY")]
    pub library: Option<String>,

    /// Where the OpenGL ES context comes from.
    #[clap(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Reduces the level of verbosity (the min level is -qq).
    #[clap(short, conflicts_with("verbose"), action = ArgAction::Count)]
    quiet: u8,

    /// Increases the level of verbosity (the max level is -vvv).
    #[clap(short, conflicts_with("quiet"), action = ArgAction::Count)]
    verbose: u8,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }

    /// Override configuration file with options from the CLI.
    pub fn override_config(&self, config: &mut Config) {
        if let Some(library) = &self.library {
            config.library.name = library.clone();
            config.library.path = None;
        }

        if let Some(provider) = self.provider {
            config.context.provider = provider;
        }

        // Verbosity flags only raise the configured level, quiet flags only lower it.
        config.debug.log_level = if self.quiet > 0 {
            min(config.debug.log_level, self.log_level())
        } else {
            max(config.debug.log_level, self.log_level())
        };
    }

    /// Logging filter level.
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            // Default.
            (0, 0) => LevelFilter::Warn,
            // Verbose.
            (_, 1) => LevelFilter::Info,
            (_, 2) => LevelFilter::Debug,
            (0, _) => LevelFilter::Trace,
            // Quiet.
            (1, _) => LevelFilter::Error,
            (..) => LevelFilter::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_library_from_cli() {
        let mut config = Config::default();
        config.library.path = Some("/tmp/libold.so".into());

        let options = Options { library: Some("filament-jni".into()), ..Options::default() };
        options.override_config(&mut config);

        assert_eq!(config.library.name, "filament-jni");
        assert_eq!(config.library.path, None);
    }

    #[test]
    fn provider_from_cli() {
        let mut config = Config::default();

        let options = Options { provider: Some(ProviderKind::Native), ..Options::default() };
        options.override_config(&mut config);

        assert_eq!(config.context.provider, ProviderKind::Native);
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut config = Config::default();
        config.context.provider = ProviderKind::Native;

        Options::default().override_config(&mut config);

        assert_eq!(config.context.provider, ProviderKind::Native);
        assert_eq!(config.library.name, "native-lib");
    }

    fn parse(args: &[&str]) -> LevelFilter {
        Options::try_parse_from(std::iter::once("native-helper").chain(args.iter().copied()))
            .unwrap()
            .log_level()
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(parse(&[]), LevelFilter::Warn);
        assert_eq!(parse(&["-v"]), LevelFilter::Info);
        assert_eq!(parse(&["-vv"]), LevelFilter::Debug);
        assert_eq!(parse(&["-vvv"]), LevelFilter::Trace);
        assert_eq!(parse(&["-q"]), LevelFilter::Error);
        assert_eq!(parse(&["-qq"]), LevelFilter::Off);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Options::try_parse_from(["native-helper", "-q", "-v"]).is_err());
    }

    #[test]
    fn config_log_level_is_not_lowered() {
        let mut config = Config::default();
        config.debug.log_level = LevelFilter::Debug;

        Options::default().override_config(&mut config);

        assert_eq!(config.debug.log_level, LevelFilter::Debug);
    }

    #[test]
    fn quiet_lowers_config_log_level() {
        for (args, expected) in [(["-q"], LevelFilter::Error), (["-qq"], LevelFilter::Off)] {
            let mut config = Config::default();
            config.debug.log_level = LevelFilter::Debug;

            let options =
                Options::try_parse_from(std::iter::once("native-helper").chain(args)).unwrap();
            options.override_config(&mut config);

            assert_eq!(config.debug.log_level, expected);
        }
    }

    #[test]
    fn quiet_overrides_default_log_level() {
        let mut config = Config::default();

        let options = Options::try_parse_from(["native-helper", "-q"]).unwrap();
        options.override_config(&mut config);

        assert_eq!(config.debug.log_level, LevelFilter::Error);
    }

    #[test]
    fn verbose_raises_config_log_level() {
        let mut config = Config::default();

        let options = Options::try_parse_from(["native-helper", "-vv"]).unwrap();
        options.override_config(&mut config);

        assert_eq!(config.debug.log_level, LevelFilter::Debug);
    }

    #[test]
    fn provider_flag_parses() {
        let options = Options::try_parse_from(["native-helper", "--provider", "native"]).unwrap();
        assert_eq!(options.provider, Some(ProviderKind::Native));
    }
}
