//! Background reader: sends the start command, then decodes incoming lines
//! into the [`ScopeSink`].
//!
//! The socket is given a short read timeout so the loop can look at the stop
//! flag between reads even while the peer is silent. Bytes of a partially
//! received line are kept across timeouts.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, error, info, trace, warn};

use crate::config::ScopeConfig;
use crate::data::line::LineDecoder;
use crate::sink::ScopeSink;

/// Size of the single reply chunk read (and logged) after the start command.
pub const GREETING_CHUNK: usize = 4096;

/// Why the reader loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderExit {
    /// The stop flag was observed.
    Stopped,
    /// The peer closed its side (EOF).
    PeerClosed,
    /// A non-recoverable read or write error.
    Failed(io::ErrorKind),
    /// The reader thread panicked.
    Panicked,
}

#[derive(Debug, Clone)]
pub struct ReaderSettings {
    pub start_command: String,
    pub decoder: LineDecoder,
    /// Socket read timeout; bounds how long a stop request can go unnoticed.
    pub poll: Duration,
}

impl ReaderSettings {
    pub fn from_config(cfg: &ScopeConfig) -> Self {
        Self {
            start_command: cfg.start_command.clone(),
            decoder: LineDecoder::new(cfg.value_format, cfg.sign_extend_24),
            poll: cfg.read_poll(),
        }
    }
}

pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Read the one reply chunk that follows the start command.
///
/// Returns `Ok(None)` if the stop flag was raised first, `Ok(Some(0))` on EOF.
fn read_greeting<S: Read>(stream: &mut S, stop: &AtomicBool) -> io::Result<Option<usize>> {
    let mut chunk = [0u8; GREETING_CHUNK];
    loop {
        if stop.load(Ordering::SeqCst) {
            return Ok(None);
        }
        match stream.read(&mut chunk) {
            Ok(n) => {
                if n > 0 {
                    info!("{}", String::from_utf8_lossy(&chunk[..n]).trim_end());
                }
                return Ok(Some(n));
            }
            Err(e) if is_timeout(&e) => continue,
            Err(e) => return Err(e),
        }
    }
}

fn handle_line(raw: &[u8], decoder: &LineDecoder, sink: &ScopeSink) {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    trace!("{line}");
    match decoder.decode(line) {
        Ok(Some(reading)) => sink.push(reading),
        Ok(None) => {}
        Err(e) => warn!("skipping line {line:?}: {e}"),
    }
}

/// Run the reader loop on the current thread until stopped, EOF or failure.
///
/// `stream` should already carry a read timeout if the caller wants the stop
/// flag to be honoured while no data arrives.
pub fn run_reader<S: Read + Write>(
    mut stream: S,
    sink: &ScopeSink,
    stop: &AtomicBool,
    settings: &ReaderSettings,
) -> ReaderExit {
    let start = stream
        .write_all(settings.start_command.as_bytes())
        .and_then(|_| stream.flush());
    if let Err(e) = start {
        error!("failed to send start command: {e}");
        return ReaderExit::Failed(e.kind());
    }

    match read_greeting(&mut stream, stop) {
        Ok(None) => return ReaderExit::Stopped,
        Ok(Some(0)) => return ReaderExit::PeerClosed,
        Ok(Some(_)) => {}
        Err(e) => {
            error!("failed to read reply to start command: {e}");
            return ReaderExit::Failed(e.kind());
        }
    }

    let mut input = BufReader::new(stream);
    let mut line = Vec::with_capacity(128);
    loop {
        if stop.load(Ordering::SeqCst) {
            debug!("reader stop requested");
            return ReaderExit::Stopped;
        }
        match input.read_until(b'\n', &mut line) {
            Ok(0) => {
                if !line.is_empty() {
                    handle_line(&line, &settings.decoder, sink);
                }
                info!("peer closed the connection");
                return ReaderExit::PeerClosed;
            }
            Ok(_) => {
                if line.ends_with(b"\n") {
                    handle_line(&line, &settings.decoder, sink);
                    line.clear();
                }
            }
            // Partial bytes stay in `line` until the newline shows up.
            Err(e) if is_timeout(&e) => continue,
            Err(e) => {
                error!("error reading sample stream: {e}");
                return ReaderExit::Failed(e.kind());
            }
        }
    }
}

/// Handle to the reader running on its own thread.
pub struct StreamReader {
    handle: JoinHandle<ReaderExit>,
}

impl StreamReader {
    /// Configure the read timeout on `stream` and start the reader thread.
    pub fn spawn(
        stream: TcpStream,
        sink: ScopeSink,
        stop: Arc<AtomicBool>,
        settings: ReaderSettings,
    ) -> io::Result<Self> {
        stream.set_read_timeout(Some(settings.poll))?;
        let handle = std::thread::Builder::new()
            .name("netscope-reader".to_string())
            .spawn(move || run_reader(stream, &sink, &stop, &settings))?;
        Ok(Self { handle })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> ReaderExit {
        self.handle.join().unwrap_or(ReaderExit::Panicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// In-memory peer: reads come from `input`, writes are captured.
    struct FakeLink {
        input: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl FakeLink {
        fn new(input: &str) -> Self {
            Self {
                input: Cursor::new(input.as_bytes().to_vec()),
                written: Vec::new(),
            }
        }
    }

    impl Read for FakeLink {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for FakeLink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn settings() -> ReaderSettings {
        ReaderSettings::from_config(&ScopeConfig::default())
    }

    #[test]
    fn stop_flag_set_before_start_returns_stopped() {
        let sink = ScopeSink::new(4);
        let stop = AtomicBool::new(true);
        let mut link = FakeLink::new("hello");
        let exit = run_reader(&mut link, &sink, &stop, &settings());
        assert_eq!(exit, ReaderExit::Stopped);
        assert_eq!(link.written, b"d\n");
        assert_eq!(sink.samples_received(), 0);
    }

    #[test]
    fn eof_during_greeting_is_peer_closed() {
        let sink = ScopeSink::new(4);
        let stop = AtomicBool::new(false);
        let exit = run_reader(FakeLink::new(""), &sink, &stop, &settings());
        assert_eq!(exit, ReaderExit::PeerClosed);
    }

    #[test]
    fn write_failure_is_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Ok(0)
            }
        }
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let sink = ScopeSink::new(4);
        let stop = AtomicBool::new(false);
        let exit = run_reader(Broken, &sink, &stop, &settings());
        assert_eq!(exit, ReaderExit::Failed(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn handle_line_skips_and_pushes() {
        let sink = ScopeSink::new(3);
        let decoder = LineDecoder::default();
        handle_line(b"garbage\n", &decoder, &sink);
        handle_line(b"A:B:C\n", &decoder, &sink);
        handle_line(b"X: nope\n", &decoder, &sink);
        assert_eq!(sink.samples_received(), 0);
        handle_line(b"CH1: 4096\r\n", &decoder, &sink);
        assert_eq!(sink.values(), vec![0, 0, 4096]);
    }

    #[test]
    fn hostile_hex_line_does_not_stop_the_reader() {
        let sink = ScopeSink::new(2);
        let settings = ReaderSettings {
            decoder: LineDecoder::new(crate::data::line::ValueFormat::Hex, false),
            ..settings()
        };
        handle_line(b"X: --8000000000000000\n", &settings.decoder, &sink);
        handle_line(b"X: 0x-5\n", &settings.decoder, &sink);
        handle_line(b"X: 1f\n", &settings.decoder, &sink);
        assert_eq!(sink.values(), vec![0, 31]);
        assert_eq!(sink.samples_received(), 1);
    }
}
