//! netscope crate root: re-exports and module wiring.
//!
//! A single-trace oscilloscope built on egui/eframe. A background thread reads
//! `label: value` lines from a TCP endpoint into a fixed-length rolling buffer;
//! the window redraws that buffer on a fixed cadence.
//!
//! - `data`: rolling buffer, bounds and line decoding
//! - `sink`: shared state between reader and UI
//! - `reader`: background stream reader
//! - `lifecycle`: connect / shutdown sequencing
//! - `signal`: Ctrl+C routing into the window close path
//! - `app`: eframe application and `run_scope`
//! - `config`, `cli`, `error`: configuration and error types

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod lifecycle;
pub mod reader;
pub mod signal;
pub mod sink;

pub use app::{run_scope, ScopeApp};
pub use config::ScopeConfig;
pub use data::buffer::{Bounds, RollingBuffer};
pub use data::line::{LineDecoder, Reading, ValueFormat};
pub use error::ScopeError;
pub use lifecycle::{Lifecycle, Phase, ShutdownReport};
pub use reader::{ReaderExit, StreamReader};
pub use signal::ShutdownTrigger;
pub use sink::{ScopeSink, ScopeSnapshot};
