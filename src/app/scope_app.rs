//! Standalone application wrapper.
//!
//! [`ScopeApp`] implements [`eframe::App`]. It owns the [`Lifecycle`] so that
//! closing the window (or Ctrl+C) runs the teardown exactly once, and it
//! re-arms egui's repaint timer only while the connection is running.

use std::time::Duration;

use eframe::egui;
use log::debug;

use crate::config::ScopeConfig;
use crate::lifecycle::{Lifecycle, Phase, ShutdownReport};
use crate::signal::ShutdownTrigger;
use crate::sink::ScopeSink;

pub struct ScopeApp {
    pub(super) sink: ScopeSink,
    pub(super) lifecycle: Lifecycle,
    trigger: ShutdownTrigger,
    redraw_interval: Duration,
    /// Legend name used until the first labelled sample arrives.
    pub(super) default_label: String,
    trigger_attached: bool,
    report: Option<ShutdownReport>,
}

impl ScopeApp {
    pub fn new(
        cfg: &ScopeConfig,
        sink: ScopeSink,
        lifecycle: Lifecycle,
        trigger: ShutdownTrigger,
    ) -> Self {
        Self {
            sink,
            lifecycle,
            trigger,
            redraw_interval: cfg.redraw_interval(),
            default_label: "samples".to_string(),
            trigger_attached: false,
            report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Result of the teardown, once it has run.
    pub fn shutdown_report(&self) -> Option<&ShutdownReport> {
        self.report.as_ref()
    }

    fn begin_shutdown(&mut self) {
        if self.report.is_none() {
            self.report = Some(self.lifecycle.shutdown());
        }
    }

    /// Run the teardown if the window or the interrupt trigger asked for it.
    ///
    /// Returns `true` while the redraw timer should be re-armed.
    fn apply_close_requests(&mut self, window_close: bool) -> bool {
        if window_close || self.trigger.is_requested() {
            debug!("close requested (window: {window_close})");
            self.begin_shutdown();
        }
        self.lifecycle.phase() == Phase::Running
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.trigger_attached {
            self.trigger.attach(ctx);
            self.trigger_attached = true;
        }

        let close_requested = ctx.input(|i| i.viewport().close_requested());
        let rearm = self.apply_close_requests(close_requested);
        if self.trigger.is_requested() && !close_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let snapshot = self.sink.snapshot();
        self.render_status_bar(ctx, &snapshot);
        self.render_central_plot(ctx, &snapshot);

        // Redraw timer; not re-armed once teardown has started.
        if rearm {
            ctx.request_repaint_after(self.redraw_interval);
        }
    }
}
