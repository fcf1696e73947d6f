//! Context providers.
//!
//! A context can either be created here through EGL ([`ManagedProvider`]) or by an entry
//! point exported from the native library ([`NativeProvider`]). The provider in use is
//! picked from the configuration with [`from_config`].

use std::fmt::{self, Display, Formatter};
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::rc::Rc;

use clap::ValueEnum;
use libloading::Library;
use log::{debug, info};
use serde::Deserialize;

use crate::bootstrap::{self, RenderingContext};
use crate::config::Config;
use crate::egl::{self, DynamicEgl, Egl, EGLContext};
use crate::loader;

/// Default symbol of the native context factory.
pub const DEFAULT_ENTRY_POINT: &str = "nCreateEGLContext";

/// Signature of the native context factory.
pub type CreateContextFn = unsafe extern "C" fn() -> *mut c_void;

/// Result from context providers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors occurring while providing a context.
#[derive(Debug)]
pub enum Error {
    /// EGL could not be loaded or the context could not be bootstrapped.
    Egl(egl::Error),

    /// The native entry point could not be resolved.
    Loader(loader::Error),

    /// The native entry point returned a null context.
    NullNativeContext(String),
}

impl Error {
    /// Whether this is the fatal illegal-state fault raised when binding the context fails.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::Egl(err) if err.is_illegal_state())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Egl(err) => Some(err),
            Error::Loader(err) => Some(err),
            Error::NullNativeContext(_) => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Egl(err) => Display::fmt(err, f),
            Error::Loader(err) => Display::fmt(err, f),
            Error::NullNativeContext(entry_point) => {
                write!(f, "Native entry point {} returned no context", entry_point)
            },
        }
    }
}

impl From<egl::Error> for Error {
    fn from(val: egl::Error) -> Self {
        Error::Egl(val)
    }
}

impl From<loader::Error> for Error {
    fn from(val: loader::Error) -> Self {
        Error::Loader(val)
    }
}

/// Where contexts come from.
#[derive(ValueEnum, Deserialize, Default, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Bootstrap the context through EGL in this process.
    #[default]
    Managed,

    /// Delegate context creation to the native library.
    Native,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Managed => f.write_str("managed"),
            ProviderKind::Native => f.write_str("native"),
        }
    }
}

/// Opaque context object handed out by the native entry point.
///
/// Its lifetime and current state are owned by the native library.
#[derive(Debug)]
pub struct NativeContext(*mut c_void);

impl NativeContext {
    #[inline]
    pub fn raw(&self) -> *mut c_void {
        self.0
    }
}

/// Context produced by a [`ContextProvider`].
pub enum ProvidedContext {
    Managed(RenderingContext),
    Native(NativeContext),
}

impl ProvidedContext {
    /// Raw handle of the context.
    pub fn raw_handle(&self) -> EGLContext {
        match self {
            ProvidedContext::Managed(context) => context.raw_context(),
            ProvidedContext::Native(context) => context.raw() as EGLContext,
        }
    }

    /// Whether the context is bound to the calling thread, when that is known.
    pub fn is_current(&self) -> Option<bool> {
        match self {
            ProvidedContext::Managed(context) => Some(context.is_current()),
            ProvidedContext::Native(_) => None,
        }
    }

    /// Release a managed context. Native contexts are left to the library that made them.
    pub fn release(self) -> Result<()> {
        match self {
            ProvidedContext::Managed(context) => Ok(context.release()?),
            ProvidedContext::Native(context) => {
                debug!("Leaving native context {:?} to its owner", context.raw());
                Ok(())
            },
        }
    }
}

/// Source of current OpenGL ES 3 contexts.
pub trait ContextProvider {
    fn kind(&self) -> ProviderKind;

    fn create_context(&mut self) -> Result<ProvidedContext>;

    /// Tear down what the provider set up for its contexts.
    ///
    /// Every context created by this provider must have been released first.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Provider bootstrapping contexts through EGL.
pub struct ManagedProvider {
    egl: Rc<dyn Egl>,
}

impl ManagedProvider {
    pub fn new(egl: Rc<dyn Egl>) -> Self {
        Self { egl }
    }
}

impl ContextProvider for ManagedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Managed
    }

    fn create_context(&mut self) -> Result<ProvidedContext> {
        let context = bootstrap::bootstrap(self.egl.clone())?;
        Ok(ProvidedContext::Managed(context))
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(bootstrap::terminate(&*self.egl)?)
    }
}

/// Provider delegating context creation to an entry point of the native library.
pub struct NativeProvider<'lib> {
    entry_point: CreateContextFn,
    name: String,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> NativeProvider<'lib> {
    /// Resolve the entry point `name` from `library`.
    pub fn resolve(library: &'lib Library, name: &str) -> Result<Self> {
        let entry_point = unsafe { library.get::<CreateContextFn>(name.as_bytes()) }
            .map_err(|source| loader::Error::Symbol { name: name.to_owned(), source })?;

        debug!("Resolved native entry point {}", name);

        Ok(Self { entry_point: *entry_point, name: name.to_owned(), _library: PhantomData })
    }

    /// Use an entry point that is already part of the process.
    ///
    /// # Safety
    ///
    /// `entry_point` must be safe to call from the current thread at any time.
    pub unsafe fn from_entry_point(entry_point: CreateContextFn, name: &str) -> Self {
        Self { entry_point, name: name.to_owned(), _library: PhantomData }
    }
}

impl<'lib> ContextProvider for NativeProvider<'lib> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Native
    }

    fn create_context(&mut self) -> Result<ProvidedContext> {
        let context = unsafe { (self.entry_point)() };
        if context.is_null() {
            return Err(Error::NullNativeContext(self.name.clone()));
        }

        info!("Native entry point {} created context {:?}", self.name, context);

        Ok(ProvidedContext::Native(NativeContext(context)))
    }
}

/// Build the provider selected by `config`.
///
/// The managed provider loads EGL now, the native provider resolves its entry point from
/// `library` now; failures of either are reported here rather than on first use.
pub fn from_config<'lib>(
    config: &Config,
    library: &'lib Library,
) -> Result<Box<dyn ContextProvider + 'lib>> {
    info!("Using {} context provider", config.context.provider);

    match config.context.provider {
        ProviderKind::Managed => {
            let egl = match &config.egl.library {
                Some(path) => DynamicEgl::load_from(path)?,
                None => DynamicEgl::load()?,
            };
            Ok(Box::new(ManagedProvider::new(Rc::new(egl))))
        },
        ProviderKind::Native => {
            let provider = NativeProvider::resolve(library, &config.context.native_entry_point)?;
            Ok(Box::new(provider))
        },
    }
}
