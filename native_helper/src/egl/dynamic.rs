//! EGL entry points resolved from the system library at runtime.

use std::os::raw::c_void;
use std::path::Path;
use std::ptr;

use libloading::Library;
use log::debug;

use super::ffi::{self, egl, EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLint};
use super::{Egl, Error, Result};

#[cfg(target_os = "android")]
const EGL_LIBRARY_NAMES: [&str; 1] = ["libEGL.so"];
#[cfg(not(target_os = "android"))]
const EGL_LIBRARY_NAMES: [&str; 2] = ["libEGL.so.1", "libEGL.so"];

/// [`Egl`] backed by a dynamically loaded `libEGL`.
pub struct DynamicEgl {
    egl: egl::Egl,

    // Must outlive every function pointer in `egl`.
    _library: Library,
}

impl DynamicEgl {
    /// Load the platform's default EGL library.
    pub fn load() -> Result<Self> {
        let mut result = Self::load_from(Path::new(EGL_LIBRARY_NAMES[0]));
        for name in &EGL_LIBRARY_NAMES[1..] {
            match &result {
                Ok(_) => break,
                Err(err) => debug!("Falling back to {}: {}", name, err),
            }
            result = Self::load_from(Path::new(name));
        }

        result
    }

    /// Load EGL from an explicit library path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let library = unsafe { Library::new(path) }
            .map_err(|source| Error::Load { path: path.display().to_string(), source })?;

        let egl = egl::Egl::load_with(|symbol| unsafe {
            library
                .get::<*const c_void>(symbol.as_bytes())
                .map(|symbol| *symbol)
                .unwrap_or(ptr::null())
        });

        let entry_points = [
            ("eglGetDisplay", egl.GetDisplay.is_loaded()),
            ("eglInitialize", egl.Initialize.is_loaded()),
            ("eglChooseConfig", egl.ChooseConfig.is_loaded()),
            ("eglCreateContext", egl.CreateContext.is_loaded()),
            ("eglCreatePbufferSurface", egl.CreatePbufferSurface.is_loaded()),
            ("eglMakeCurrent", egl.MakeCurrent.is_loaded()),
            ("eglGetCurrentContext", egl.GetCurrentContext.is_loaded()),
            ("eglGetError", egl.GetError.is_loaded()),
            ("eglDestroySurface", egl.DestroySurface.is_loaded()),
            ("eglDestroyContext", egl.DestroyContext.is_loaded()),
            ("eglTerminate", egl.Terminate.is_loaded()),
        ];

        if let Some((name, _)) = entry_points.iter().find(|(_, loaded)| !loaded) {
            return Err(Error::MissingEntryPoint(name));
        }

        debug!("Loaded EGL from {}", path.display());

        Ok(Self { egl, _library: library })
    }
}

impl Egl for DynamicEgl {
    fn default_display(&self) -> EGLDisplay {
        unsafe { self.egl.GetDisplay(egl::DEFAULT_DISPLAY as ffi::EGLNativeDisplayType) }
    }

    fn initialize(&self, display: EGLDisplay) -> Option<(EGLint, EGLint)> {
        let mut major: EGLint = 0;
        let mut minor: EGLint = 0;
        let ret = unsafe { self.egl.Initialize(display, &mut major, &mut minor) };
        (ret != 0).then_some((major, minor))
    }

    fn choose_config(
        &self,
        display: EGLDisplay,
        attributes: &[EGLint],
        configs: &mut [EGLConfig],
    ) -> Option<usize> {
        debug_assert_eq!(attributes.last(), Some(&super::NONE));

        let mut num_configs: EGLint = 0;
        let ret = unsafe {
            self.egl.ChooseConfig(
                display,
                attributes.as_ptr(),
                configs.as_mut_ptr(),
                configs.len() as EGLint,
                &mut num_configs,
            )
        };
        (ret != 0).then_some(num_configs.max(0) as usize)
    }

    fn create_context(
        &self,
        display: EGLDisplay,
        config: EGLConfig,
        share_context: EGLContext,
        attributes: &[EGLint],
    ) -> EGLContext {
        debug_assert_eq!(attributes.last(), Some(&super::NONE));
        unsafe { self.egl.CreateContext(display, config, share_context, attributes.as_ptr()) }
    }

    fn create_pbuffer_surface(
        &self,
        display: EGLDisplay,
        config: EGLConfig,
        attributes: &[EGLint],
    ) -> EGLSurface {
        debug_assert_eq!(attributes.last(), Some(&super::NONE));
        unsafe { self.egl.CreatePbufferSurface(display, config, attributes.as_ptr()) }
    }

    fn make_current(
        &self,
        display: EGLDisplay,
        draw: EGLSurface,
        read: EGLSurface,
        context: EGLContext,
    ) -> bool {
        unsafe { self.egl.MakeCurrent(display, draw, read, context) != 0 }
    }

    fn current_context(&self) -> EGLContext {
        unsafe { self.egl.GetCurrentContext() }
    }

    fn error(&self) -> EGLint {
        unsafe { self.egl.GetError() }
    }

    fn destroy_surface(&self, display: EGLDisplay, surface: EGLSurface) -> bool {
        unsafe { self.egl.DestroySurface(display, surface) != 0 }
    }

    fn destroy_context(&self, display: EGLDisplay, context: EGLContext) -> bool {
        unsafe { self.egl.DestroyContext(display, context) != 0 }
    }

    fn terminate(&self, display: EGLDisplay) -> bool {
        unsafe { self.egl.Terminate(display) != 0 }
    }
}
