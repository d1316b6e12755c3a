//! Routing of Ctrl+C into the window's normal close path.
//!
//! The `ctrlc` handler only holds a [`ShutdownTrigger`]. Firing it marks the
//! request and, once the window exists, asks the viewport to close; the app
//! then runs the same shutdown as for a window close.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::info;

#[derive(Default)]
struct TriggerInner {
    requested: AtomicBool,
    ctx: Mutex<Option<egui::Context>>,
}

/// Cloneable shutdown request shared between the signal handler and the UI.
#[derive(Clone, Default)]
pub struct ShutdownTrigger {
    inner: Arc<TriggerInner>,
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the UI context so that [`fire`](Self::fire) can wake the event loop.
    pub fn attach(&self, ctx: &egui::Context) {
        let mut slot = self.inner.ctx.lock().unwrap_or_else(|p| p.into_inner());
        *slot = Some(ctx.clone());
    }

    pub fn fire(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        let slot = self.inner.ctx.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(ctx) = slot.as_ref() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            ctx.request_repaint();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }
}

/// Register `trigger` as the process's Ctrl+C handler.
pub fn install_interrupt_handler(trigger: ShutdownTrigger) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        info!("interrupt received");
        trigger.fire();
    })
}
