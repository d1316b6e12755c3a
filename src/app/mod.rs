//! Native window for the oscilloscope.
//!
//! | Sub-module      | Responsibility |
//! | --------------- | -------------- |
//! | [`scope_app`]   | [`ScopeApp`] (eframe) wrapper, redraw cadence and close handling |
//! | [`plot`]        | Status bar and central plot rendering from a sink snapshot |
//! | [`run`]         | Top-level [`run_scope()`] entry point |

mod plot;
mod run;
mod scope_app;

pub use run::{native_options, run_scope};
pub use scope_app::ScopeApp;
