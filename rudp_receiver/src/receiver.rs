//! The receiver's single event loop: one datagram socket, one
//! `{peer address -> Connection}` map, driven start to finish in one task
//! (§4.3, §5 — single-threaded, no shared mutable state across threads).

use crate::connection::Connection;
use crate::error::ReceiverError;
use rudp_shared::constants::RECV_BUF_SIZE;
use rudp_shared::{Packet, logger};
use std::collections::HashMap;
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

pub struct Config {
    pub port: u16,
    pub timeout: Duration,
    pub sack_mode: bool,
    pub debug: bool,
    /// Directory the per-peer sink files are created in (§6 "receiver's
    /// working directory"). Defaults to `.`; overridable so tests don't
    /// litter the crate root.
    pub sink_dir: PathBuf,
}

pub struct Receiver {
    socket: UdpSocket,
    connections: HashMap<SocketAddr, Connection<File>>,
    last_cleanup: Instant,
    config: Config,
}

impl Receiver {
    pub async fn bind(config: Config) -> Result<Self, ReceiverError> {
        let socket = UdpSocket::bind(("0.0.0.0", config.port))
            .await
            .map_err(ReceiverError::Bind)?;
        Ok(Receiver {
            socket,
            connections: HashMap::new(),
            last_cleanup: Instant::now(),
            config,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs until cancelled (by the caller selecting on `ctrl_c`, say). A
    /// plain `loop` with one suspension point — the timed receive — per the
    /// spec's concurrency model.
    pub async fn run(&mut self) -> Result<(), ReceiverError> {
        let mut buf = vec![0u8; RECV_BUF_SIZE];
        loop {
            match tokio::time::timeout(self.config.timeout, self.socket.recv_from(&mut buf)).await
            {
                Ok(Ok((len, addr))) => {
                    self.handle_datagram(&buf[..len], addr).await;
                }
                Ok(Err(e)) => return Err(ReceiverError::Socket(e)),
                Err(_elapsed) => {
                    self.reap();
                }
            }

            if self.last_cleanup.elapsed() > self.config.timeout {
                self.reap();
            }
        }
    }

    async fn handle_datagram(&mut self, bytes: &[u8], addr: SocketAddr) {
        let Ok(text) = std::str::from_utf8(bytes) else {
            logger::log_debug(self.config.debug, &format!("dropped non-UTF8 datagram from {addr}"));
            return;
        };

        let packet = match Packet::parse(text) {
            Ok(packet) => packet,
            Err(e) => {
                logger::log_debug(self.config.debug, &format!("dropped frame from {addr}: {e}"));
                return;
            }
        };

        match packet {
            Packet::Start { seqno, payload } => {
                if !self.connections.contains_key(&addr) {
                    match self.open_sink(addr) {
                        Ok(sink) => {
                            logger::log_info(&format!("new connection from {addr}"));
                            self.connections.insert(addr, Connection::new(seqno, sink));
                        }
                        Err(e) => {
                            logger::log_error(&format!("failed to open sink for {addr}: {e}"));
                            return;
                        }
                    }
                }
                self.accept_and_ack(addr, seqno, payload).await;
            }
            Packet::Data { seqno, payload } | Packet::End { seqno, payload } => {
                if self.connections.contains_key(&addr) {
                    self.accept_and_ack(addr, seqno, payload).await;
                } else {
                    logger::log_debug(
                        self.config.debug,
                        &format!("dropped data from unknown peer {addr}"),
                    );
                }
            }
            Packet::Ack { .. } | Packet::Sack { .. } => {
                // The receiver is not a sender; these are never expected here.
            }
        }
    }

    async fn accept_and_ack(&mut self, addr: SocketAddr, seqno: u32, payload: Vec<u8>) {
        let Some(conn) = self.connections.get_mut(&addr) else {
            return;
        };
        match conn.accept(seqno, payload, self.config.sack_mode) {
            Ok(ack) => {
                let wire = ack.encode();
                if let Err(e) = self.socket.send_to(wire.as_bytes(), addr).await {
                    logger::log_warning(&format!("failed to send ack to {addr}: {e}"));
                }
            }
            Err(e) => {
                logger::log_error(&format!("{}", ReceiverError::Sink(e)));
            }
        }
    }

    fn open_sink(&self, addr: SocketAddr) -> std::io::Result<File> {
        let path = self
            .config
            .sink_dir
            .join(format!("{}.{}", addr.ip(), addr.port()));
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }

    /// Closes and drops any connection idle for longer than the timeout.
    fn reap(&mut self) {
        let now = Instant::now();
        let timeout = self.config.timeout;
        let dead: Vec<SocketAddr> = self
            .connections
            .iter()
            .filter(|(_, conn)| conn.is_idle(now, timeout))
            .map(|(addr, _)| *addr)
            .collect();
        for addr in dead {
            if let Some(conn) = self.connections.remove(&addr) {
                conn.close();
                logger::log_info(&format!("reaped idle connection {addr}"));
            }
        }
        self.last_cleanup = now;
    }
}
