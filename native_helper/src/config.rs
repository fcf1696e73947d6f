use std::env;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, LevelFilter};
use serde::Deserialize;

use crate::cli::Options;
use crate::loader::DEFAULT_LIBRARY_NAME;
use crate::provider::{ProviderKind, DEFAULT_ENTRY_POINT};

/// Name of the configuration file and its directory.
const CONFIG_NAME: &str = "native_helper";

/// Result from config loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors occurring during config loading.
#[derive(Debug)]
pub enum Error {
    /// Config file not found.
    NotFound,

    /// io error reading file.
    Io(io::Error),

    /// Not valid toml or invalid values.
    Toml(toml::de::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound => None,
            Error::Io(err) => err.source(),
            Error::Toml(err) => err.source(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "Unable to locate config file"),
            Error::Io(err) => write!(f, "Error reading config file: {}", err),
            Error::Toml(err) => write!(f, "Config error: {}", err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(val: io::Error) -> Self {
        if val.kind() == io::ErrorKind::NotFound {
            Error::NotFound
        } else {
            Error::Io(val)
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(val: toml::de::Error) -> Self {
        Error::Toml(val)
    }
}

/// Top-level config type.
#[derive(Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub library: Library,
    pub egl: Egl,
    pub context: Context,
    pub debug: Debug,

    /// Path the config was loaded from.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Native library to load at startup.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Library {
    /// Library name, resolved to the platform's file name.
    pub name: String,

    /// Explicit file to load instead of resolving `name`.
    pub path: Option<PathBuf>,
}

impl Default for Library {
    fn default() -> Self {
        Self { name: DEFAULT_LIBRARY_NAME.into(), path: None }
    }
}

#[derive(Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Egl {
    /// EGL library to use instead of the system default.
    pub library: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Context {
    pub provider: ProviderKind,

    /// Symbol called by the native provider.
    pub native_entry_point: String,
}

impl Default for Context {
    fn default() -> Self {
        Self { provider: ProviderKind::default(), native_entry_point: DEFAULT_ENTRY_POINT.into() }
    }
}

/// Debugging options.
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Debug {
    pub log_level: LevelFilter,
}

impl Default for Debug {
    fn default() -> Self {
        Self { log_level: LevelFilter::Warn }
    }
}

/// Load the configuration file.
///
/// Falls back to the default configuration if the file is missing or invalid.
pub fn load(options: &Options) -> Config {
    let config_path = options.config_file.clone().or_else(installed_config);

    let mut config = config_path
        .as_ref()
        .and_then(|path| load_from(path).ok())
        .unwrap_or_else(|| {
            debug!("No config file found; using default");
            Config::default()
        });

    options.override_config(&mut config);

    config
}

/// Attempt to load the config file at `path`.
pub fn load_from(path: &Path) -> Result<Config> {
    match read_config(path) {
        Ok(mut config) => {
            config.config_path = Some(path.to_owned());
            Ok(config)
        },
        Err(Error::NotFound) => {
            error!("Unable to load config {:?}: File not found", path);
            Err(Error::NotFound)
        },
        Err(err) => {
            error!("Unable to load config {:?}: {}", path, err);
            Err(err)
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Deserialize a config from TOML.
pub fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Get the location of the first found default config file paths
/// according to the following order:
///
/// 1. $XDG_CONFIG_HOME/native_helper/native_helper.toml
/// 2. $HOME/.config/native_helper/native_helper.toml
#[cfg(not(windows))]
pub fn installed_config() -> Option<PathBuf> {
    let file_name = format!("{}.toml", CONFIG_NAME);

    xdg::BaseDirectories::with_prefix(CONFIG_NAME)
        .ok()
        .and_then(|xdg| xdg.find_config_file(&file_name))
        .or_else(|| {
            let home = env::var("HOME").ok()?;
            let fallback = PathBuf::from(home).join(".config").join(CONFIG_NAME).join(&file_name);
            fallback.exists().then_some(fallback)
        })
}

#[cfg(windows)]
pub fn installed_config() -> Option<PathBuf> {
    let appdata = env::var("APPDATA").ok()?;
    let path = PathBuf::from(appdata).join(CONFIG_NAME).join(format!("{}.toml", CONFIG_NAME));
    path.exists().then_some(path)
}
