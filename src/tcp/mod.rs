// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Async TCP layer for NMEA feeds.
//!
//! Marine data sources (AIS receivers, multiplexers, `gpsd`-style daemons)
//! serve NMEA 0183 sentences line-by-line over TCP. This module provides a
//! feed handle that manages the connection in a background task with
//! automatic reconnection, address hot-swap, and graceful shutdown.

use std::time::Duration;

use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Configuration for an NMEA feed connection.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Source address in "host:port" format.
    pub address: String,
    /// Delay before reconnecting after disconnect.
    pub reconnect_delay: Duration,
    /// Channel buffer size for received sentences.
    pub buffer_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            // 10110 is the IANA-registered NMEA-over-TCP port.
            address: "localhost:10110".to_string(),
            reconnect_delay: Duration::from_secs(5),
            buffer_size: 1024,
        }
    }
}

/// Feed connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Attempting to connect.
    Connecting,
    /// Successfully connected.
    Connected,
    /// Disconnected (will attempt reconnect).
    Disconnected,
    /// Connection error occurred.
    Error(String),
}

/// Events emitted by the feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Connection state changed.
    StateChanged(FeedState),
    /// One raw sentence, line terminator stripped.
    Sentence(String),
}

/// Handle to a managed NMEA feed.
///
/// The feed runs in a background task and automatically reconnects on
/// disconnect. Use `recv()` to receive events and `set_address()` to move
/// to a different source at runtime.
pub struct Feed {
    event_rx: mpsc::Receiver<FeedEvent>,
    address_tx: watch::Sender<String>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("address", &self.address_tx.borrow().clone())
            .finish_non_exhaustive()
    }
}

impl Feed {
    /// Spawn a new feed task with the given configuration.
    #[must_use]
    pub fn spawn(config: FeedConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.buffer_size);
        let (address_tx, address_rx) = watch::channel(config.address.clone());
        let cancel_token = CancellationToken::new();

        let task_cancel = cancel_token.clone();
        let reconnect_delay = config.reconnect_delay;

        tokio::spawn(async move {
            feed_loop(event_tx, address_rx, task_cancel, reconnect_delay).await;
        });

        Self {
            event_rx,
            address_tx,
            cancel_token,
        }
    }

    /// Receive the next event from the feed.
    ///
    /// Returns `None` once the feed has been shut down.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.event_rx.recv().await
    }

    /// Change the source address.
    ///
    /// The feed disconnects and reconnects to the new source.
    pub fn set_address(&self, address: String) {
        let _ = self.address_tx.send(address);
    }

    /// The current source address.
    #[must_use]
    pub fn current_address(&self) -> String {
        self.address_tx.borrow().clone()
    }

    /// Shut down the feed.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn feed_loop(
    event_tx: mpsc::Sender<FeedEvent>,
    mut address_rx: watch::Receiver<String>,
    cancel_token: CancellationToken,
    reconnect_delay: Duration,
) {
    loop {
        if cancel_token.is_cancelled() {
            info!("feed cancelled");
            return;
        }

        let current_address = address_rx.borrow_and_update().clone();

        if event_tx
            .send(FeedEvent::StateChanged(FeedState::Connecting))
            .await
            .is_err()
        {
            return; // Receiver dropped
        }

        info!("connecting to {current_address}...");

        match read_sentences(&current_address, &event_tx, &mut address_rx, &cancel_token).await {
            Ok(ReconnectReason::AddressChanged) => {
                info!("source address changed, reconnecting immediately...");
                continue;
            }
            Ok(ReconnectReason::ConnectionClosed) => {
                info!("feed closed by source");
                let _ = event_tx
                    .send(FeedEvent::StateChanged(FeedState::Disconnected))
                    .await;
            }
            Ok(ReconnectReason::Cancelled) => {
                info!("feed cancelled");
                return;
            }
            Err(e) => {
                error!("feed error: {e}");
                let _ = event_tx
                    .send(FeedEvent::StateChanged(FeedState::Error(e.to_string())))
                    .await;
            }
        }

        warn!("reconnecting in {} seconds...", reconnect_delay.as_secs());

        tokio::select! {
            () = sleep(reconnect_delay) => {}
            () = cancel_token.cancelled() => {
                info!("feed cancelled during reconnect delay");
                return;
            }
        }
    }
}

enum ReconnectReason {
    AddressChanged,
    ConnectionClosed,
    Cancelled,
}

async fn read_sentences(
    address: &str,
    event_tx: &mpsc::Sender<FeedEvent>,
    address_rx: &mut watch::Receiver<String>,
    cancel_token: &CancellationToken,
) -> Result<ReconnectReason, Box<dyn std::error::Error + Send + Sync>> {
    let stream = TcpStream::connect(address).await?;
    info!("connected to {address}");

    if event_tx
        .send(FeedEvent::StateChanged(FeedState::Connected))
        .await
        .is_err()
    {
        return Ok(ReconnectReason::Cancelled);
    }

    let reader = BufReader::new(stream);
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line_result = lines.next_line() => {
                match line_result {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if event_tx.send(FeedEvent::Sentence(line)).await.is_err() {
                            return Ok(ReconnectReason::Cancelled);
                        }
                    }
                    Ok(None) => {
                        return Ok(ReconnectReason::ConnectionClosed);
                    }
                    Err(e) => {
                        return Err(Box::new(e));
                    }
                }
            }

            _ = address_rx.changed() => {
                let new_address = address_rx.borrow_and_update().clone();
                if new_address != address {
                    info!("source address changed from {address} to {new_address}");
                    return Ok(ReconnectReason::AddressChanged);
                }
            }

            () = cancel_token.cancelled() => {
                return Ok(ReconnectReason::Cancelled);
            }
        }
    }
}
