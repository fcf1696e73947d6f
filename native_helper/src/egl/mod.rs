//! Platform EGL API surface.
//!
//! Everything the bootstrapper needs from EGL goes through the [`Egl`] trait, so the
//! context creation sequence can run against the system `libEGL` ([`DynamicEgl`]) or
//! against a fake in tests.

use std::fmt::{self, Display, Formatter};

pub mod dynamic;
#[cfg(test)]
pub mod fake;
pub mod ffi;

pub use self::dynamic::DynamicEgl;
pub use self::ffi::{EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLint};

use self::ffi::egl;

/// Attribute requesting configs that can render OpenGL ES 3.
pub const RENDERABLE_TYPE: EGLint = egl::RENDERABLE_TYPE as EGLint;
pub const OPENGL_ES3_BIT: EGLint = egl::OPENGL_ES3_BIT as EGLint;
pub const CONTEXT_CLIENT_VERSION: EGLint = egl::CONTEXT_CLIENT_VERSION as EGLint;
pub const WIDTH: EGLint = egl::WIDTH as EGLint;
pub const HEIGHT: EGLint = egl::HEIGHT as EGLint;
/// Attribute list terminator.
pub const NONE: EGLint = egl::NONE as EGLint;

/// Thin, unchecked view of the EGL entry points used for context bootstrapping.
///
/// Implementations forward to the platform and report results the way EGL does:
/// null handles and `false` on failure, with the reason available from
/// [`Egl::error`]. Interpreting those results is the caller's job.
pub trait Egl {
    /// `eglGetDisplay(EGL_DEFAULT_DISPLAY)`.
    fn default_display(&self) -> EGLDisplay;

    /// `eglInitialize`, returning the `(major, minor)` version on success.
    fn initialize(&self, display: EGLDisplay) -> Option<(EGLint, EGLint)>;

    /// `eglChooseConfig`, filling `configs` and returning the number of matches.
    fn choose_config(
        &self,
        display: EGLDisplay,
        attributes: &[EGLint],
        configs: &mut [EGLConfig],
    ) -> Option<usize>;

    fn create_context(
        &self,
        display: EGLDisplay,
        config: EGLConfig,
        share_context: EGLContext,
        attributes: &[EGLint],
    ) -> EGLContext;

    fn create_pbuffer_surface(
        &self,
        display: EGLDisplay,
        config: EGLConfig,
        attributes: &[EGLint],
    ) -> EGLSurface;

    fn make_current(
        &self,
        display: EGLDisplay,
        draw: EGLSurface,
        read: EGLSurface,
        context: EGLContext,
    ) -> bool;

    /// Context bound to the calling thread, or `EGL_NO_CONTEXT`.
    fn current_context(&self) -> EGLContext;

    /// `eglGetError` for the calling thread.
    fn error(&self) -> EGLint;

    fn destroy_surface(&self, display: EGLDisplay, surface: EGLSurface) -> bool;

    fn destroy_context(&self, display: EGLDisplay, context: EGLContext) -> bool;

    fn terminate(&self, display: EGLDisplay) -> bool;
}

/// `EGL_NO_DISPLAY`.
pub fn no_display() -> EGLDisplay {
    egl::NO_DISPLAY as EGLDisplay
}

/// `EGL_NO_CONTEXT`.
pub fn no_context() -> EGLContext {
    egl::NO_CONTEXT as EGLContext
}

/// `EGL_NO_SURFACE`.
pub fn no_surface() -> EGLSurface {
    egl::NO_SURFACE as EGLSurface
}

/// Error code reported by `eglGetError`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub EGLint);

const ERROR_NAMES: [(EGLint, &str); 15] = [
    (egl::SUCCESS as EGLint, "EGL_SUCCESS"),
    (egl::NOT_INITIALIZED as EGLint, "EGL_NOT_INITIALIZED"),
    (egl::BAD_ACCESS as EGLint, "EGL_BAD_ACCESS"),
    (egl::BAD_ALLOC as EGLint, "EGL_BAD_ALLOC"),
    (egl::BAD_ATTRIBUTE as EGLint, "EGL_BAD_ATTRIBUTE"),
    (egl::BAD_CONFIG as EGLint, "EGL_BAD_CONFIG"),
    (egl::BAD_CONTEXT as EGLint, "EGL_BAD_CONTEXT"),
    (egl::BAD_CURRENT_SURFACE as EGLint, "EGL_BAD_CURRENT_SURFACE"),
    (egl::BAD_DISPLAY as EGLint, "EGL_BAD_DISPLAY"),
    (egl::BAD_MATCH as EGLint, "EGL_BAD_MATCH"),
    (egl::BAD_NATIVE_PIXMAP as EGLint, "EGL_BAD_NATIVE_PIXMAP"),
    (egl::BAD_NATIVE_WINDOW as EGLint, "EGL_BAD_NATIVE_WINDOW"),
    (egl::BAD_PARAMETER as EGLint, "EGL_BAD_PARAMETER"),
    (egl::BAD_SURFACE as EGLint, "EGL_BAD_SURFACE"),
    (egl::CONTEXT_LOST as EGLint, "EGL_CONTEXT_LOST"),
];

impl ErrorCode {
    /// Symbolic name of the code, if it is one EGL defines.
    pub fn name(self) -> Option<&'static str> {
        ERROR_NAMES.iter().find(|(code, _)| *code == self.0).map(|(_, name)| *name)
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "0x{:x} ({})", self.0, name),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

/// Result from EGL operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors occurring while loading EGL or bootstrapping a context.
#[derive(Debug)]
pub enum Error {
    /// No EGL library could be opened.
    Load { path: String, source: libloading::Error },

    /// The EGL library lacks a required entry point.
    MissingEntryPoint(&'static str),

    /// `eglGetDisplay` returned `EGL_NO_DISPLAY`.
    NoDisplay(ErrorCode),

    /// `eglInitialize` failed.
    Initialize(ErrorCode),

    /// `eglChooseConfig` failed.
    ChooseConfig(ErrorCode),

    /// `eglChooseConfig` succeeded but nothing matched the requested attributes.
    NoMatchingConfig,

    /// `eglCreateContext` returned `EGL_NO_CONTEXT`.
    CreateContext(ErrorCode),

    /// `eglCreatePbufferSurface` returned `EGL_NO_SURFACE`.
    CreatePbufferSurface(ErrorCode),

    /// `eglMakeCurrent` failed; the context is unusable.
    MakeCurrent(ErrorCode),

    /// Tearing down a context or its surface failed.
    Release(ErrorCode),

    /// `eglTerminate` failed.
    Terminate(ErrorCode),
}

impl Error {
    /// Whether this is the fatal illegal-state fault raised when binding the context fails.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::MakeCurrent(_))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load { path, source } => write!(f, "Unable to load {}: {}", path, source),
            Error::MissingEntryPoint(name) => write!(f, "EGL library has no symbol {}", name),
            Error::NoDisplay(code) => write!(f, "Could not get default EGL display: {}", code),
            Error::Initialize(code) => write!(f, "eglInitialize failed: {}", code),
            Error::ChooseConfig(code) => write!(f, "eglChooseConfig failed: {}", code),
            Error::NoMatchingConfig => write!(f, "No EGL config supports OpenGL ES 3"),
            Error::CreateContext(code) => write!(f, "eglCreateContext failed: {}", code),
            Error::CreatePbufferSurface(code) => {
                write!(f, "eglCreatePbufferSurface failed: {}", code)
            },
            Error::MakeCurrent(code) => write!(f, "Error making GL context: {}", code),
            Error::Release(code) => write!(f, "Failed to release EGL context: {}", code),
            Error::Terminate(code) => write!(f, "eglTerminate failed: {}", code),
        }
    }
}
