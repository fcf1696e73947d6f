//! Offscreen OpenGL ES 3 context creation.
//!
//! [`bootstrap`] runs the fixed EGL sequence: default display, initialize, choose a
//! single ES3 capable config, create a client version 3 context without sharing,
//! create a 1x1 pbuffer surface and make both current on the calling thread.
//!
//! Every step is checked. Resources created before a failing step are not cleaned up.
//!
//! The default display is shared by every context of the process, so releasing a context
//! leaves it initialized. [`terminate`] tears it down once no context uses it anymore.

use std::fmt::{self, Display, Formatter};
use std::ptr;
use std::rc::Rc;

use log::{debug, info, trace};

use crate::egl::{
    self, no_context, no_display, no_surface, Egl, EGLConfig, EGLContext, EGLDisplay, EGLSurface,
    EGLint, Error, ErrorCode,
};

/// Config selection attributes, a renderable type of OpenGL ES 3 and nothing else.
pub const CONFIG_ATTRIBUTES: [EGLint; 3] = [egl::RENDERABLE_TYPE, egl::OPENGL_ES3_BIT, egl::NONE];

/// Context attributes requesting client version 3.
pub const CONTEXT_ATTRIBUTES: [EGLint; 3] = [egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE];

/// Pbuffer attributes for the 1x1 offscreen surface.
pub const PBUFFER_ATTRIBUTES: [EGLint; 5] = [egl::WIDTH, 1, egl::HEIGHT, 1, egl::NONE];

/// EGL version reported by `eglInitialize`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: EGLint,
    pub minor: EGLint,
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A context bound to the thread that created it, along with everything it was built from.
///
/// The EGL handles are raw pointers, so this type is neither `Send` nor `Sync`.
///
/// Dropping a `RenderingContext` does not free anything. Call [`RenderingContext::release`]
/// to unbind and destroy it; bootstrapping again without releasing leaks the previous
/// context and surface.
pub struct RenderingContext {
    egl: Rc<dyn Egl>,
    display: EGLDisplay,
    config: EGLConfig,
    context: EGLContext,
    surface: EGLSurface,
    version: Version,
}

impl RenderingContext {
    #[inline]
    pub fn raw_context(&self) -> EGLContext {
        self.context
    }

    #[inline]
    pub fn display(&self) -> EGLDisplay {
        self.display
    }

    #[inline]
    pub fn config(&self) -> EGLConfig {
        self.config
    }

    #[inline]
    pub fn surface(&self) -> EGLSurface {
        self.surface
    }

    #[inline]
    pub fn egl_version(&self) -> Version {
        self.version
    }

    /// Whether this context is the one bound to the calling thread.
    #[inline]
    pub fn is_current(&self) -> bool {
        self.egl.current_context() == self.context
    }

    /// Unbind the context if it is current, then destroy surface and context.
    ///
    /// The display stays initialized for other contexts; see [`terminate`].
    ///
    /// All teardown steps are attempted; the first failure is reported.
    pub fn release(self) -> egl::Result<()> {
        let egl = &*self.egl;
        let mut failure = None;

        if self.is_current()
            && !egl.make_current(self.display, no_surface(), no_surface(), no_context())
        {
            failure.get_or_insert(ErrorCode(egl.error()));
        }

        if !egl.destroy_surface(self.display, self.surface) {
            failure.get_or_insert(ErrorCode(egl.error()));
        }

        if !egl.destroy_context(self.display, self.context) {
            failure.get_or_insert(ErrorCode(egl.error()));
        }

        match failure {
            Some(code) => Err(Error::Release(code)),
            None => {
                debug!("Released EGL context {:?}", self.context);
                Ok(())
            },
        }
    }
}

/// Create an offscreen OpenGL ES 3 context and make it current on the calling thread.
pub fn bootstrap(egl: Rc<dyn Egl>) -> egl::Result<RenderingContext> {
    let last_error = || ErrorCode(egl.error());

    let display = egl.default_display();
    if display == no_display() {
        return Err(Error::NoDisplay(last_error()));
    }
    trace!("Got default EGL display {:?}", display);

    let (major, minor) = egl.initialize(display).ok_or_else(|| Error::Initialize(last_error()))?;
    let version = Version { major, minor };
    debug!("Initialized EGL {}", version);

    let mut configs: [EGLConfig; 1] = [ptr::null()];
    let num_configs = egl
        .choose_config(display, &CONFIG_ATTRIBUTES, &mut configs)
        .ok_or_else(|| Error::ChooseConfig(last_error()))?;
    if num_configs == 0 {
        return Err(Error::NoMatchingConfig);
    }
    let config = configs[0];
    trace!("Picked EGL config {:?}", config);

    let context = egl.create_context(display, config, no_context(), &CONTEXT_ATTRIBUTES);
    if context == no_context() {
        return Err(Error::CreateContext(last_error()));
    }

    let surface = egl.create_pbuffer_surface(display, config, &PBUFFER_ATTRIBUTES);
    if surface == no_surface() {
        return Err(Error::CreatePbufferSurface(last_error()));
    }

    if !egl.make_current(display, surface, surface, context) {
        return Err(Error::MakeCurrent(last_error()));
    }

    info!("Created OpenGL ES 3 context {:?} on EGL {}", context, version);

    Ok(RenderingContext { egl, display, config, context, surface, version })
}

/// Terminate the default display.
///
/// Every context created on it must have been released, otherwise they are left on a
/// display that is no longer initialized.
pub fn terminate(egl: &dyn Egl) -> egl::Result<()> {
    let display = egl.default_display();
    if display == no_display() {
        return Err(Error::NoDisplay(ErrorCode(egl.error())));
    }

    if !egl.terminate(display) {
        return Err(Error::Terminate(ErrorCode(egl.error())));
    }

    debug!("Terminated EGL display {:?}", display);

    Ok(())
}
