//! Top-level entry point for running the oscilloscope as a native window.

use eframe::egui;

use crate::config::ScopeConfig;
use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::signal::ShutdownTrigger;
use crate::sink::ScopeSink;

use super::ScopeApp;

/// Window options derived from the configuration.
pub fn native_options(cfg: &ScopeConfig) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(cfg.title.clone())
            .with_inner_size(egui::vec2(900.0, 500.0)),
        ..Default::default()
    }
}

/// Open the window and block until it is closed.
///
/// The [`Lifecycle`] moves into the app; it is shut down when the window
/// closes, or at the latest when the app is dropped.
pub fn run_scope(
    cfg: &ScopeConfig,
    sink: ScopeSink,
    lifecycle: Lifecycle,
    trigger: ShutdownTrigger,
) -> Result<()> {
    let app = ScopeApp::new(cfg, sink, lifecycle, trigger);
    eframe::run_native(
        &cfg.title,
        native_options(cfg),
        Box::new(|_cc| Ok(Box::new(app))),
    )?;
    Ok(())
}
