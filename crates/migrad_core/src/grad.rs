//! Gradient-recording switch.
//!
//! While recording is disabled, graph operations still compute their values
//! but create parentless nodes, so nothing upstream receives gradient.

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(|g| g.get())
}

pub fn set_grad_enabled(enabled: bool) {
    GRAD_ENABLED.with(|g| g.set(enabled));
}

pub struct GradientGuard {
    prev_enabled: bool,
}

impl GradientGuard {
    pub fn new(enabled: bool) -> Self {
        let prev_enabled = is_grad_enabled();
        set_grad_enabled(enabled);
        Self { prev_enabled }
    }
}

impl Drop for GradientGuard {
    fn drop(&mut self) {
        set_grad_enabled(self.prev_enabled);
    }
}

pub fn no_grad_mode() -> GradientGuard {
    GradientGuard::new(false)
}

pub fn grad_mode() -> GradientGuard {
    GradientGuard::new(true)
}
