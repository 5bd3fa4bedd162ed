//! TCP collector for device connections
//!
//! Thin ingest plumbing around the decoder: accept a connection, run the
//! device identity handshake (2-byte big-endian length followed by that many
//! identity bytes, answered with a one-byte ACK), then treat everything else
//! the device sends as an opaque payload for the stream decoder. Decoded
//! records are appended to a per-date CSV log. A misbehaving connection is
//! reported and dropped; it never takes down the listener.

use crate::error::{AvlError, Result};
use crate::parser::parse_avl_bytes;
use crate::types::AvlRecord;
use chrono::Utc;
use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Handshake reply accepting the device.
pub const ACK_ACCEPT: u8 = 0x01;
/// Handshake reply rejecting the device; the connection is closed after it.
pub const ACK_REJECT: u8 = 0x00;

/// Collector settings.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Directory receiving the per-date CSV log files.
    pub data_dir: PathBuf,
    /// When set, only these device identities are accepted.
    pub allowed_imeis: Option<Vec<String>>,
    /// Idle-read timeout after which a connection's payload is considered
    /// complete.
    pub read_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            allowed_imeis: None,
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// What happened on one device connection.
#[derive(Debug)]
pub struct ConnectionSummary {
    pub imei: String,
    pub accepted: bool,
    pub records: Vec<AvlRecord>,
}

/// Listening collector. Each accepted connection is served on its own
/// thread; decoding itself is pure and shares no state between connections.
pub struct Collector {
    listener: TcpListener,
    config: CollectorConfig,
}

impl Collector {
    pub fn bind<A: ToSocketAddrs>(addr: A, config: CollectorConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve a single connection on the calling thread.
    pub fn accept_one(&self) -> Result<ConnectionSummary> {
        let (stream, _peer) = self.listener.accept()?;
        handle_connection(stream, &self.config)
    }

    /// Accept connections forever.
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    eprintln!("Accept failed: {}", err);
                    continue;
                }
            };
            let peer = stream
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            let config = self.config.clone();
            thread::spawn(move || match handle_connection(stream, &config) {
                Ok(summary) => {
                    if summary.accepted {
                        println!(
                            "{} [{}]: {} record(s) decoded",
                            peer,
                            summary.imei,
                            summary.records.len()
                        );
                    } else {
                        println!("{} [{}]: rejected by allow-list", peer, summary.imei);
                    }
                }
                Err(err) => eprintln!("{}: connection failed: {}", peer, err),
            });
        }
        Ok(())
    }
}

/// Serve one device connection: handshake, ACK, drain payload, decode,
/// persist. Returns the decoded records alongside the identity so callers
/// can log a summary.
pub fn handle_connection(mut stream: TcpStream, config: &CollectorConfig) -> Result<ConnectionSummary> {
    stream.set_read_timeout(Some(config.read_timeout))?;

    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .map_err(|e| AvlError::Handshake(format!("reading identity length: {}", e)))?;
    let imei_len = u16::from_be_bytes(len_buf) as usize;
    if imei_len == 0 {
        return Err(AvlError::Handshake("empty device identity".to_string()));
    }

    let mut imei_buf = vec![0u8; imei_len];
    stream
        .read_exact(&mut imei_buf)
        .map_err(|e| AvlError::Handshake(format!("reading identity: {}", e)))?;
    let imei = String::from_utf8_lossy(&imei_buf).into_owned();

    let accepted = config
        .allowed_imeis
        .as_ref()
        .map_or(true, |allowed| allowed.iter().any(|a| a == &imei));

    if !accepted {
        stream.write_all(&[ACK_REJECT])?;
        return Ok(ConnectionSummary {
            imei,
            accepted: false,
            records: Vec::new(),
        });
    }
    stream.write_all(&[ACK_ACCEPT])?;

    // Everything after the ACK is opaque payload until EOF or idle timeout.
    let mut payload = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => payload.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                break
            }
            Err(e) => return Err(e.into()),
        }
    }

    let records = parse_avl_bytes(&payload);
    persist_records(&config.data_dir, &records)?;

    Ok(ConnectionSummary {
        imei,
        accepted: true,
        records,
    })
}

#[cfg(feature = "csv")]
fn persist_records(data_dir: &Path, records: &[AvlRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    crate::export::append_records_csv(&daily_log_path(data_dir), records)
}

#[cfg(not(feature = "csv"))]
fn persist_records(_data_dir: &Path, _records: &[AvlRecord]) -> Result<()> {
    Ok(())
}

/// CSV log file for records arriving today (UTC).
pub fn daily_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("records_{}.csv", Utc::now().format("%Y-%m-%d")))
}
