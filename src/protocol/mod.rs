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

//! Protocol layer for NMEA 0183 sentence parsing.
//!
//! This module provides a trait-based abstraction for extensible protocol
//! support. Currently implements NMEA 0183 as spoken by AIS receivers and
//! GPS units (RMC, VTG, VDM), which is what marine TCP feeds carry.

mod nmea;

pub use nmea::NmeaParser;

use thiserror::Error;

/// Errors that can occur during sentence parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid sentence format: {0}")]
    InvalidFormat(String),

    #[error("checksum mismatch: computed {computed:02X}, sentence carries {carried}")]
    ChecksumMismatch { computed: u8, carried: String },

    #[error("invalid value for field '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// RMC: recommended minimum navigation information for our own vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct Rmc {
    pub position: Position,
    /// Track made good in degrees true, when the unit had one.
    pub track_made_good: Option<f64>,
    /// Speed over ground in knots.
    pub sog: f64,
}

/// VTG: track made good and ground speed. Carried for completeness;
/// the dispatch layer currently ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Vtg {
    pub course_true: Option<f64>,
    pub sog: Option<f64>,
}

/// VDM: one fragment of an armoured AIS payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Vdm {
    /// Six-bit armoured payload characters.
    pub payload: String,
    /// 1-based fragment number within the chain.
    pub fragment: u32,
    /// Total fragments in the chain.
    pub fragments: u32,
    /// Sequence identifier tying fragments of one chain together.
    pub msg_id: Option<String>,
    /// Radio channel the message was received on.
    pub channel: Option<char>,
    /// Fill bits appended to the last payload character.
    pub fill_bits: u8,
}

/// A parsed NMEA record.
#[derive(Debug, Clone, PartialEq)]
pub enum NmeaRecord {
    Rmc(Rmc),
    Vtg(Vtg),
    Vdm(Vdm),
}

/// Trait for protocol parsers.
///
/// Implement this trait to add support for new feed formats.
pub trait Protocol {
    /// The record type produced by this parser.
    type Message;
    /// The error type for parsing failures.
    type Error;

    /// Parse input bytes into a record.
    ///
    /// Returns `Ok(Some(record))` if parsing succeeded,
    /// `Ok(None)` if the input is valid but doesn't produce a record,
    /// or `Err(error)` if parsing failed.
    fn parse(&mut self, input: &[u8]) -> Result<Option<Self::Message>, Self::Error>;
}
