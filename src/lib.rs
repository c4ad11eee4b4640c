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

//! AIS client library for connecting to and decoding marine NMEA feeds.
//!
//! This library receives NMEA 0183 sentences from a marine data source,
//! reassembles and decodes the AIS payloads they carry, and delivers
//! navigation events to the application: our own vessel's position from RMC
//! and every target vessel's position with enough information to compute
//! CPA (closest point of approach) and TCPA (time to CPA). It is built as
//! layers that can be used independently or composed together:
//!
//! - **Protocol layer**: NMEA 0183 sentence parsing (RMC, VTG, VDM)
//! - **AIS layer**: six-bit payload codec and typed messages
//!   (Types 1/2/3, 5, 18, 21, 24A/24B)
//! - **Geometry**: equirectangular range/bearing and the CPA/TCPA kernel
//! - **Handler layer**: fragment reassembly, per-vessel indexing,
//!   navigation callbacks
//! - **Connection layer**: async TCP with automatic reconnection and
//!   source hot-swap
//!
//! # Quick Start
//!
//! Use the [`Client`] type for full-stack operation:
//!
//! ```no_run
//! use ais_client::geo::{cpa, tcpa};
//! use ais_client::{Client, ClientConfig, NavEvents, Pcs};
//!
//! struct Bridge;
//!
//! impl NavEvents for Bridge {
//!     fn we(&mut self, us: &Pcs) {
//!         println!("own ship at {:?} {:?}", us.lat(), us.lon());
//!     }
//!
//!     fn they(&mut self, us: &Pcs, them: &Pcs, mmsi: u32) {
//!         if let (Some(t), Some(d)) = (tcpa(us, them), cpa(us, them, None)) {
//!             if t > 0.0 {
//!                 println!("{mmsi}: CPA {d:.1} nm in {:.0} min", t * 60.0);
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = Client::spawn(ClientConfig::default(), Bridge);
//!     client.set_source("10.0.0.5", 10110);
//!     client.run().await;
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! The codec works on its own for decoding recorded payloads:
//!
//! ```
//! use ais_client::ais::Ais;
//!
//! if let Some(Ais::Type1(cnb)) = Ais::decode("13u?etPv2;0n:dDPwUM1U1Cb069D") {
//!     println!("{} making {:?} kn", cnb.mmsi, cnb.sog());
//! }
//! ```

pub mod ais;
pub mod geo;
pub mod handler;
pub mod protocol;
pub mod tcp;

use std::collections::HashMap;

use log::warn;

pub use ais::{Ais, KEY_TYPE24A, KEY_TYPE24B};
pub use geo::Pcs;
pub use handler::{NavEvents, VesselHandler};
pub use protocol::{NmeaParser, NmeaRecord, ParseError, Protocol};
pub use tcp::{Feed, FeedConfig, FeedEvent, FeedState};

/// Configuration for the full-stack client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Feed connection configuration.
    pub feed: FeedConfig,
}

/// Full-stack AIS client that wires all layers together.
///
/// The client manages a TCP feed, parses incoming sentences and drives a
/// [`VesselHandler`] that delivers navigation events to the supplied
/// [`NavEvents`] implementation.
pub struct Client<E> {
    handler: VesselHandler<E>,
    parser: NmeaParser,
    feed: Feed,
    feed_state: FeedState,
}

impl<E> std::fmt::Debug for Client<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("feed", &self.feed)
            .field("feed_state", &self.feed_state)
            .finish_non_exhaustive()
    }
}

impl<E: NavEvents> Client<E> {
    /// Spawn a new client with the given configuration and event sink.
    ///
    /// This starts the background connection task; call [`Client::run`] (or
    /// [`Client::process_next`] in a loop) to consume the feed.
    #[must_use]
    pub fn spawn(config: ClientConfig, events: E) -> Self {
        Self {
            handler: VesselHandler::new(events),
            parser: NmeaParser::new(),
            feed: Feed::spawn(config.feed),
            feed_state: FeedState::Disconnected,
        }
    }

    /// Consume feed events until the feed shuts down.
    pub async fn run(&mut self) {
        while self.process_next().await {}
    }

    /// Process the next feed event.
    ///
    /// Returns `false` once the feed has shut down.
    pub async fn process_next(&mut self) -> bool {
        let Some(event) = self.feed.recv().await else {
            return false;
        };

        match event {
            FeedEvent::StateChanged(state) => {
                self.feed_state = state;
            }
            FeedEvent::Sentence(line) => match self.parser.parse(line.as_bytes()) {
                Ok(Some(record)) => self.handler.handle(record),
                Ok(None) => {}
                Err(e) => warn!("discarding sentence: {e}"),
            },
        }

        true
    }

    /// Replace the feed source. The feed disconnects and reconnects.
    pub fn set_source(&self, host: &str, port: u16) {
        self.feed.set_address(format!("{host}:{port}"));
    }

    /// The current feed state.
    #[must_use]
    pub fn feed_state(&self) -> &FeedState {
        &self.feed_state
    }

    /// Last reported name of a vessel.
    #[must_use]
    pub fn name(&self, mmsi: u32) -> Option<&str> {
        self.handler.name(mmsi)
    }

    /// Most recent message of one type from a vessel.
    #[must_use]
    pub fn most_recent_message(&self, mmsi: u32, type_key: u16) -> Option<&Ais> {
        self.handler.most_recent_message(mmsi, type_key)
    }

    /// Snapshot of all most-recent messages from a vessel, keyed by type.
    #[must_use]
    pub fn most_recent_messages(&self, mmsi: u32) -> HashMap<u16, Ais> {
        self.handler.most_recent_messages(mmsi)
    }

    /// Our own vessel's position, absent until the first RMC.
    #[must_use]
    pub fn own_position(&self) -> Option<&Pcs> {
        self.handler.own_position()
    }

    /// The underlying handler.
    pub fn handler(&self) -> &VesselHandler<E> {
        &self.handler
    }

    /// Mutable access to the underlying handler (and through it the event
    /// sink).
    pub fn handler_mut(&mut self) -> &mut VesselHandler<E> {
        &mut self.handler
    }

    /// Shut down the feed.
    pub fn shutdown(&self) {
        self.feed.shutdown();
    }
}
