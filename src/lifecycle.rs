//! Connection lifecycle: connect, run the reader, tear everything down once.
//!
//! ```text
//! Connecting ──> Running ──> ShuttingDown ──> Closed
//! ```
//!
//! A failed connect still ends in `Running`, just without a reader; the
//! window then shows the static all-zero buffer.

use std::io::{self, Read};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::config::ScopeConfig;
use crate::error::{Result, ScopeError};
use crate::reader::{is_timeout, ReaderExit, ReaderSettings, StreamReader};
use crate::sink::ScopeSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Running,
    ShuttingDown,
    Closed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Connecting => "connecting",
            Phase::Running => "running",
            Phase::ShuttingDown => "shutting down",
            Phase::Closed => "closed",
        }
    }
}

/// What happened during [`Lifecycle::shutdown`].
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// How the reader thread ended, if there was one.
    pub reader_exit: Option<ReaderExit>,
    /// Text received from the peer after the half-close.
    pub drained: String,
    /// I/O errors hit during teardown (logged, never propagated).
    pub errors: Vec<io::Error>,
}

/// Resolve `host:port` and connect with a timeout, trying every address.
pub fn connect(cfg: &ScopeConfig) -> Result<TcpStream> {
    let addr = cfg.endpoint();
    let addrs: Vec<_> = addr
        .to_socket_addrs()
        .map_err(|source| ScopeError::Resolve {
            addr: addr.clone(),
            source,
        })?
        .collect();
    if addrs.is_empty() {
        return Err(ScopeError::Resolve {
            addr,
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses"),
        });
    }
    let mut last_err = None;
    for sa in &addrs {
        match TcpStream::connect_timeout(sa, cfg.connect_timeout()) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(ScopeError::Connect {
        addr,
        source: last_err.unwrap_or_else(|| io::ErrorKind::NotConnected.into()),
    })
}

/// Read from `stream` until EOF or `deadline`, returning the received text.
fn drain_until_eof(
    stream: &mut TcpStream,
    poll: Duration,
    deadline: Instant,
    errors: &mut Vec<io::Error>,
) -> String {
    let mut text = String::new();
    if let Err(e) = stream.set_read_timeout(Some(poll)) {
        errors.push(e);
    }
    let mut chunk = [0u8; 4096];
    loop {
        if Instant::now() >= deadline {
            warn!("peer did not close within the drain timeout");
            break;
        }
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let part = String::from_utf8_lossy(&chunk[..n]);
                info!("{}", part.trim_end());
                text.push_str(&part);
            }
            Err(e) if is_timeout(&e) => continue,
            Err(e) => {
                warn!("error draining connection: {e}");
                errors.push(e);
                break;
            }
        }
    }
    text
}

/// Owns the connection and the reader thread.
pub struct Lifecycle {
    phase: Phase,
    endpoint: String,
    stream: Option<TcpStream>,
    reader: Option<StreamReader>,
    stop: Arc<AtomicBool>,
    poll: Duration,
    drain_timeout: Duration,
}

impl Lifecycle {
    /// Connect to the configured endpoint and start the reader.
    ///
    /// Never fails: connection problems are logged and leave the controller
    /// running without a reader.
    pub fn start(cfg: &ScopeConfig, sink: ScopeSink) -> Self {
        let mut this = Self {
            phase: Phase::Connecting,
            endpoint: cfg.endpoint(),
            stream: None,
            reader: None,
            stop: Arc::new(AtomicBool::new(false)),
            poll: cfg.read_poll(),
            drain_timeout: cfg.drain_timeout(),
        };
        info!("connecting to {}", this.endpoint);
        match connect(cfg) {
            Ok(stream) => this.attach(stream, sink, ReaderSettings::from_config(cfg)),
            Err(e) => error!("error connecting: {e}"),
        }
        this.phase = Phase::Running;
        this
    }

    /// Wrap an already connected stream (used by tests and embedders).
    pub fn with_stream(cfg: &ScopeConfig, stream: TcpStream, sink: ScopeSink) -> Self {
        let mut this = Self {
            phase: Phase::Connecting,
            endpoint: stream
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| cfg.endpoint()),
            stream: None,
            reader: None,
            stop: Arc::new(AtomicBool::new(false)),
            poll: cfg.read_poll(),
            drain_timeout: cfg.drain_timeout(),
        };
        this.attach(stream, sink, ReaderSettings::from_config(cfg));
        this.phase = Phase::Running;
        this
    }

    fn attach(&mut self, stream: TcpStream, sink: ScopeSink, settings: ReaderSettings) {
        let spawned = stream
            .try_clone()
            .and_then(|read_half| StreamReader::spawn(read_half, sink, self.stop.clone(), settings));
        match spawned {
            Ok(reader) => {
                info!("connected to {}", self.endpoint);
                self.reader = Some(reader);
                self.stream = Some(stream);
            }
            Err(e) => error!("failed to start reader for {}: {e}", self.endpoint),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `true` while a connection is held (degraded mode has none).
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// `true` if the reader thread has already returned (e.g. the peer went away).
    pub fn reader_finished(&self) -> bool {
        self.reader.as_ref().map_or(true, |r| r.is_finished())
    }

    /// Stop the reader, half-close, drain, close. Only the first call does work.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        if matches!(self.phase, Phase::ShuttingDown | Phase::Closed) {
            return report;
        }
        info!("shutting down...");
        self.phase = Phase::ShuttingDown;

        self.stop.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            let exit = reader.join();
            info!("reader finished: {exit:?}");
            report.reader_exit = Some(exit);
        }

        if let Some(mut stream) = self.stream.take() {
            match stream.shutdown(Shutdown::Write) {
                Ok(()) => {
                    let deadline = Instant::now() + self.drain_timeout;
                    report.drained =
                        drain_until_eof(&mut stream, self.poll, deadline, &mut report.errors);
                }
                Err(e) => {
                    warn!("half-close failed: {e}");
                    report.errors.push(e);
                }
            }
            // Dropping the stream closes the socket.
            drop(stream);
        }

        self.phase = Phase::Closed;
        info!("connection to {} closed", self.endpoint);
        report
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolvable_host_is_a_resolve_error() {
        let cfg = ScopeConfig {
            host: "bad\0host".to_string(),
            ..ScopeConfig::default()
        };
        assert!(matches!(connect(&cfg), Err(ScopeError::Resolve { .. })));
    }
}
