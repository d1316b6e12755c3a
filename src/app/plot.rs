//! Plot rendering for [`ScopeApp`].
//!
//! The x axis is pinned to the buffer indices `[0, capacity]`, the y axis to
//! the bounds computed by the sink on the last append.

use egui::Color32;
use egui_plot::{Line, Plot};

use super::ScopeApp;
use crate::sink::ScopeSnapshot;

impl ScopeApp {
    /// One-line status: endpoint, phase, sample count and the latest value.
    pub(super) fn render_status_bar(&self, ctx: &egui::Context, snap: &ScopeSnapshot) {
        egui::TopBottomPanel::top("scope_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.lifecycle.endpoint());
                ui.separator();
                if self.lifecycle.is_connected() {
                    ui.label(self.lifecycle.phase().label());
                } else {
                    ui.colored_label(Color32::LIGHT_RED, "disconnected");
                }
                if self.lifecycle.is_connected() && self.lifecycle.reader_finished() {
                    ui.colored_label(Color32::YELLOW, "stream ended");
                }
                ui.separator();
                ui.label(format!("{} samples", snap.samples_received));
                if let (Some(label), Some(value)) = (&snap.last_label, snap.last_value()) {
                    ui.separator();
                    ui.label(format!("{label}: {value}"));
                }
                if let Some(t) = snap.last_sample_at {
                    ui.separator();
                    ui.label(t.format("%H:%M:%S%.3f").to_string());
                }
            });
        });
    }

    pub(super) fn render_central_plot(&self, ctx: &egui::Context, snap: &ScopeSnapshot) {
        let name = snap
            .last_label
            .clone()
            .unwrap_or_else(|| self.default_label.clone());
        let x_max = snap.capacity as f64;
        let bounds = snap.bounds;
        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("scope_plot")
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds_x(0.0..=x_max);
                    plot_ui.set_plot_bounds_y(bounds.min..=bounds.max);
                    let line = Line::new(name, snap.points.clone()).width(2.0_f32);
                    plot_ui.line(line);
                });
        });
    }
}
