//! Scriptable in-memory [`Egl`] used by unit tests.

use std::cell::{Cell, RefCell};

use super::{
    no_context, no_display, no_surface, Egl, EGLConfig, EGLContext, EGLDisplay, EGLSurface,
    EGLint,
};

pub const EGL_BAD_MATCH: EGLint = 0x3009;

const DISPLAY: usize = 0xd15;
const CONFIG: usize = 0xc0f;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Call {
    GetDisplay,
    Initialize,
    ChooseConfig,
    CreateContext,
    CreatePbufferSurface,
    MakeCurrent,
    DestroySurface,
    DestroyContext,
    Terminate,
}

#[derive(Default)]
pub struct FakeEgl {
    /// Call that reports failure with [`EGL_BAD_MATCH`].
    pub failing: Cell<Option<Call>>,

    /// Report success from `eglChooseConfig` without matching anything.
    pub no_configs: bool,

    pub calls: RefCell<Vec<Call>>,
    pub config_attributes: RefCell<Vec<Vec<EGLint>>>,
    pub context_attributes: RefCell<Vec<Vec<EGLint>>>,
    pub surface_attributes: RefCell<Vec<Vec<EGLint>>>,
    pub share_contexts: RefCell<Vec<EGLContext>>,

    live_contexts: Cell<usize>,
    live_surfaces: Cell<usize>,
    next_handle: Cell<usize>,
    current: Cell<usize>,
    error: Cell<EGLint>,
}

impl FakeEgl {
    pub fn failing(call: Call) -> Self {
        Self { failing: Cell::new(Some(call)), ..Default::default() }
    }

    pub fn without_configs() -> Self {
        Self { no_configs: true, ..Default::default() }
    }

    pub fn live_contexts(&self) -> usize {
        self.live_contexts.get()
    }

    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces.get()
    }

    fn record(&self, call: Call) -> bool {
        self.calls.borrow_mut().push(call);
        if self.failing.get() == Some(call) {
            self.error.set(EGL_BAD_MATCH);
            false
        } else {
            true
        }
    }

    fn handle(&self) -> usize {
        let handle = self.next_handle.get() + 0x100;
        self.next_handle.set(handle);
        handle
    }
}

impl Egl for FakeEgl {
    fn default_display(&self) -> EGLDisplay {
        if self.record(Call::GetDisplay) {
            DISPLAY as EGLDisplay
        } else {
            no_display()
        }
    }

    fn initialize(&self, _display: EGLDisplay) -> Option<(EGLint, EGLint)> {
        self.record(Call::Initialize).then_some((1, 5))
    }

    fn choose_config(
        &self,
        _display: EGLDisplay,
        attributes: &[EGLint],
        configs: &mut [EGLConfig],
    ) -> Option<usize> {
        self.config_attributes.borrow_mut().push(attributes.to_vec());
        if !self.record(Call::ChooseConfig) {
            return None;
        }

        if self.no_configs || configs.is_empty() {
            return Some(0);
        }

        configs[0] = CONFIG as EGLConfig;
        Some(1)
    }

    fn create_context(
        &self,
        _display: EGLDisplay,
        _config: EGLConfig,
        share_context: EGLContext,
        attributes: &[EGLint],
    ) -> EGLContext {
        self.context_attributes.borrow_mut().push(attributes.to_vec());
        self.share_contexts.borrow_mut().push(share_context);
        if !self.record(Call::CreateContext) {
            return no_context();
        }

        self.live_contexts.set(self.live_contexts.get() + 1);
        self.handle() as EGLContext
    }

    fn create_pbuffer_surface(
        &self,
        _display: EGLDisplay,
        _config: EGLConfig,
        attributes: &[EGLint],
    ) -> EGLSurface {
        self.surface_attributes.borrow_mut().push(attributes.to_vec());
        if !self.record(Call::CreatePbufferSurface) {
            return no_surface();
        }

        self.live_surfaces.set(self.live_surfaces.get() + 1);
        self.handle() as EGLSurface
    }

    fn make_current(
        &self,
        _display: EGLDisplay,
        _draw: EGLSurface,
        _read: EGLSurface,
        context: EGLContext,
    ) -> bool {
        if !self.record(Call::MakeCurrent) {
            return false;
        }

        self.current.set(context as usize);
        true
    }

    fn current_context(&self) -> EGLContext {
        self.current.get() as EGLContext
    }

    fn error(&self) -> EGLint {
        self.error.replace(0x3000)
    }

    fn destroy_surface(&self, _display: EGLDisplay, _surface: EGLSurface) -> bool {
        let ok = self.record(Call::DestroySurface);
        if ok {
            self.live_surfaces.set(self.live_surfaces.get() - 1);
        }
        ok
    }

    fn destroy_context(&self, _display: EGLDisplay, _context: EGLContext) -> bool {
        let ok = self.record(Call::DestroyContext);
        if ok {
            self.live_contexts.set(self.live_contexts.get() - 1);
        }
        ok
    }

    fn terminate(&self, _display: EGLDisplay) -> bool {
        self.record(Call::Terminate)
    }
}
