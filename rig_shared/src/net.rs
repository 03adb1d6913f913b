//! Live feed networking.
//!
//! The capture process sends one UDP datagram per detection. A
//! [`LiveReceiver`] task overwrites a shared [`SampleSlot`] with each datagram;
//! the player reads the slot through [`SampleSource`] once per tick. Only the
//! most recent message is kept.

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

use anyhow::Context;
use bytes::{Bytes, BytesMut};
use tokio::{net::UdpSocket, task::JoinHandle};
use tracing::{debug, info, warn};

/// Where the capture process sends by default.
pub const DEFAULT_FEED_ADDR: &str = "127.0.0.1:8055";

/// Maximum UDP datagram size we'll receive.
pub const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Latest raw message from an external feed.
pub trait SampleSource: Send + Sync {
    /// The most recently received message, or `None` before the first one.
    fn latest(&self) -> Option<String>;
}

/// Shared, overwrite-only holder for the latest raw message.
#[derive(Debug, Clone, Default)]
pub struct SampleSlot {
    latest: Arc<RwLock<Option<String>>>,
    received: Arc<AtomicU64>,
}

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held message.
    pub fn store(&self, raw: String) {
        let mut guard = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(raw);
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of messages stored so far.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }
}

impl SampleSource for SampleSlot {
    fn latest(&self) -> Option<String> {
        self.latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Receives live messages over UDP into a [`SampleSlot`].
#[derive(Debug)]
pub struct LiveReceiver {
    socket: UdpSocket,
    slot: SampleSlot,
    buf: BytesMut,
}

impl LiveReceiver {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(addr).await.context("udp bind")?;
        Ok(Self {
            socket,
            slot: SampleSlot::new(),
            buf: BytesMut::with_capacity(MAX_DATAGRAM_SIZE),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Handle to the slot this receiver writes.
    pub fn slot(&self) -> SampleSlot {
        self.slot.clone()
    }

    /// Receives one datagram and stores it. Non-UTF-8 payloads are dropped.
    pub async fn recv_once(&mut self) -> anyhow::Result<()> {
        // Reclaims the previous datagram's storage once its `Bytes` is gone.
        self.buf.reserve(MAX_DATAGRAM_SIZE);
        let (n, from) = self
            .socket
            .recv_buf_from(&mut self.buf)
            .await
            .context("udp recv")?;
        let payload: Bytes = self.buf.split().freeze();
        match std::str::from_utf8(&payload) {
            Ok(text) => {
                debug!(%from, bytes = n, "Live sample received");
                self.slot.store(text.to_owned());
            }
            Err(e) => warn!(%from, bytes = n, error = %e, "Dropping non-UTF-8 datagram"),
        }
        Ok(())
    }

    /// Receives until a socket error.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(addr = ?self.socket.local_addr().ok(), "Live receiver running");
        loop {
            self.recv_once().await?;
        }
    }

    /// Runs [`LiveReceiver::run`] on the tokio runtime.
    pub fn spawn(self) -> JoinHandle<anyhow::Result<()>> {
        tokio::spawn(self.run())
    }
}

/// Sends live messages to a receiver.
///
/// The socket is never connected: datagrams go out with `send_to`, so an
/// absent listener does not turn later sends into `ConnectionRefused`.
#[derive(Debug)]
pub struct FeedSender {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl FeedSender {
    pub async fn bind(bind_addr: SocketAddr, peer: SocketAddr) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await.context("udp bind")?;
        Ok(Self { socket, peer })
    }

    pub async fn send(&self, message: &str) -> anyhow::Result<()> {
        self.socket
            .send_to(message.as_bytes(), self.peer)
            .await
            .context("udp send")?;
        Ok(())
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

/// Unspecified bind address of the same family as `peer`, ephemeral port.
pub fn any_addr_for(peer: SocketAddr) -> SocketAddr {
    match peer {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}
