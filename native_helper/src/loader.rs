//! Loading of the bundled native library.

use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

use libloading::Library;
use log::{debug, info};

/// Name of the native library shipped with the application.
pub const DEFAULT_LIBRARY_NAME: &str = "native-lib";

/// Result from library loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors occurring while loading the native library or resolving its symbols.
#[derive(Debug)]
pub enum Error {
    /// The dynamic loader could not locate or link the library.
    Open { name: String, source: libloading::Error },

    /// The library does not export a required symbol.
    Symbol { name: String, source: libloading::Error },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { source, .. } | Error::Symbol { source, .. } => Some(source),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open { name, source } => {
                write!(f, "Unable to load native library {}: {}", name, source)
            },
            Error::Symbol { name, source } => write!(f, "Unable to find symbol {}: {}", name, source),
        }
    }
}

/// Dynamic loader used to bring a shared library into the process.
pub trait Loader {
    type Library;

    /// Open the library at `file_name`, searching the platform's library paths when it is
    /// not a path.
    fn open(&self, file_name: &OsStr) -> std::result::Result<Self::Library, libloading::Error>;
}

/// [`Loader`] using the system's dynamic linker.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemLoader;

impl Loader for SystemLoader {
    type Library = Library;

    fn open(&self, file_name: &OsStr) -> std::result::Result<Library, libloading::Error> {
        unsafe { Library::new(file_name) }
    }
}

/// Platform file name for a library name, `native-lib` becomes `libnative-lib.so` on Linux
/// and Android.
pub fn file_name(name: &str) -> OsString {
    libloading::library_filename(name)
}

/// Load the library called `name` into the process.
///
/// The platform loader may or may not deduplicate repeated loads of the same name.
pub fn load<L: Loader>(loader: &L, name: &str) -> Result<L::Library> {
    let file_name = file_name(name);
    debug!("Loading native library {} from {:?}", name, file_name);

    let library = loader
        .open(&file_name)
        .map_err(|source| Error::Open { name: name.to_owned(), source })?;

    info!("Loaded native library {}", name);

    Ok(library)
}

/// Load a library from an explicit path instead of resolving it by name.
pub fn load_path<L: Loader>(loader: &L, path: &Path) -> Result<L::Library> {
    debug!("Loading native library from {}", path.display());

    let library = loader
        .open(path.as_os_str())
        .map_err(|source| Error::Open { name: path.display().to_string(), source })?;

    info!("Loaded native library {}", path.display());

    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingLoader {
        opened: RefCell<Vec<OsString>>,
        missing: bool,
    }

    impl Loader for RecordingLoader {
        type Library = OsString;

        fn open(&self, file_name: &OsStr) -> std::result::Result<OsString, libloading::Error> {
            self.opened.borrow_mut().push(file_name.to_owned());
            if self.missing {
                // Opening a path that cannot exist yields a genuine loader error.
                let missing = OsStr::new("/nonexistent/native_helper/libmissing.so");
                SystemLoader.open(missing).map(|_| file_name.to_owned())
            } else {
                Ok(file_name.to_owned())
            }
        }
    }

    #[test]
    fn loads_platform_file_name() {
        let loader = RecordingLoader::default();

        let library = load(&loader, DEFAULT_LIBRARY_NAME).unwrap();

        assert_eq!(library, file_name(DEFAULT_LIBRARY_NAME));
        assert_eq!(*loader.opened.borrow(), [file_name("native-lib")]);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn linux_file_name() {
        assert_eq!(file_name("native-lib"), OsString::from("libnative-lib.so"));
    }

    #[test]
    fn missing_library_is_reported() {
        let loader = RecordingLoader { missing: true, ..Default::default() };

        match load(&loader, "native-lib") {
            Err(Error::Open { name, .. }) => assert_eq!(name, "native-lib"),
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("missing library was loaded"),
        }
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let loader = RecordingLoader::default();

        let library = load_path(&loader, Path::new("/opt/app/lib/libcustom.so")).unwrap();

        assert_eq!(library, OsString::from("/opt/app/lib/libcustom.so"));
    }

    #[test]
    fn system_loader_fails_on_missing_library() {
        let err = load(&SystemLoader, "native-helper-test-library-that-does-not-exist").err();
        assert!(matches!(err, Some(Error::Open { .. })));
    }
}
