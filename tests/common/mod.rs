#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use netscope::ScopeConfig;

/// One step of a scripted endpoint.
#[derive(Clone, Debug)]
pub enum Step {
    Send(&'static str),
    Sleep(u64),
    /// Block until the client half-closes (read returns EOF).
    WaitEof,
    /// Drop the connection.
    Close,
}

/// What the fake endpoint saw from the client.
#[derive(Debug, Default)]
pub struct Seen {
    pub command: String,
    pub got_eof: bool,
}

fn read_command(stream: &mut TcpStream) -> String {
    let mut cmd = Vec::new();
    let mut byte = [0u8; 1];
    while let Ok(1) = stream.read(&mut byte) {
        cmd.push(byte[0]);
        if byte[0] == b'\n' {
            break;
        }
    }
    String::from_utf8_lossy(&cmd).into_owned()
}

/// Accept one client, read its start command, then play `script`.
pub fn fake_endpoint(script: Vec<Step>) -> (SocketAddr, JoinHandle<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut seen = Seen {
            command: read_command(&mut stream),
            got_eof: false,
        };
        for step in script {
            match step {
                Step::Send(text) => {
                    if stream.write_all(text.as_bytes()).is_err() {
                        break;
                    }
                }
                Step::Sleep(ms) => std::thread::sleep(Duration::from_millis(ms)),
                Step::WaitEof => {
                    stream
                        .set_read_timeout(Some(Duration::from_secs(10)))
                        .expect("timeout");
                    let mut buf = [0u8; 256];
                    loop {
                        match stream.read(&mut buf) {
                            Ok(0) => {
                                seen.got_eof = true;
                                break;
                            }
                            Ok(_) => continue,
                            Err(_) => break,
                        }
                    }
                }
                Step::Close => break,
            }
        }
        seen
    });
    (addr, handle)
}

pub fn config_for(addr: SocketAddr) -> ScopeConfig {
    ScopeConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        max_samples: 10,
        connect_timeout_ms: 1_000,
        read_poll_ms: 50,
        drain_timeout_ms: 2_000,
        ..ScopeConfig::default()
    }
}

pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    cond()
}
