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

//! NMEA 0183 sentence parser.
//!
//! Sentences start with `$` (talker) or `!` (encapsulated), carry
//! comma-separated fields and may end with a `*hh` XOR checksum:
//!
//! ```text
//! !AIVDM,2,1,7,A,<armoured payload>,0*19
//! $GPRMC,123519,A,5000.000,N,00100.000,W,10.0,330.0,020826,,,A*57
//! ```
//!
//! The talker prefix is not interpreted; sentences are matched on the
//! three-letter type. Anything that is not an NMEA sentence, and any
//! sentence type the core does not consume, parses to `Ok(None)`.

use super::{NmeaRecord, ParseError, Position, Protocol, Rmc, Vdm, Vtg};

/// Parser for NMEA 0183 sentences.
#[derive(Debug, Default)]
pub struct NmeaParser;

impl NmeaParser {
    /// Create a new NMEA parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Protocol for NmeaParser {
    type Message = NmeaRecord;
    type Error = ParseError;

    fn parse(&mut self, input: &[u8]) -> Result<Option<NmeaRecord>, ParseError> {
        let line = std::str::from_utf8(input)
            .map_err(|_| ParseError::InvalidFormat("invalid UTF-8".to_string()))?;

        parse_sentence(line.trim())
    }
}

fn parse_sentence(line: &str) -> Result<Option<NmeaRecord>, ParseError> {
    let Some(body) = line
        .strip_prefix('!')
        .or_else(|| line.strip_prefix('$'))
    else {
        return Ok(None);
    };

    let data = match body.rsplit_once('*') {
        Some((data, carried)) => {
            let computed = data.bytes().fold(0u8, |acc, b| acc ^ b);
            let matches = u8::from_str_radix(carried.trim(), 16)
                .map(|v| v == computed)
                .unwrap_or(false);
            if !matches {
                return Err(ParseError::ChecksumMismatch {
                    computed,
                    carried: carried.trim().to_string(),
                });
            }
            data
        }
        None => body,
    };

    let fields: Vec<&str> = data.split(',').collect();
    let tag = fields[0];
    if tag.len() < 3 || !tag.is_ascii() {
        return Ok(None);
    }

    match &tag[tag.len() - 3..] {
        "RMC" => parse_rmc(&fields),
        "VTG" => parse_vtg(&fields),
        "VDM" => parse_vdm(&fields),
        _ => Ok(None),
    }
}

fn parse_rmc(fields: &[&str]) -> Result<Option<NmeaRecord>, ParseError> {
    if fields.len() < 9 {
        return Ok(None);
    }
    // Status V means the unit has no fix; there is no position to report.
    if fields[2] != "A" {
        return Ok(None);
    }
    let lat = parse_coordinate(fields[3], fields[4], "latitude")?;
    let lng = parse_coordinate(fields[5], fields[6], "longitude")?;
    let sog = parse_float(fields[7], "speed over ground")?.unwrap_or(0.0);
    let track_made_good = parse_float(fields[8], "track made good")?;

    Ok(Some(NmeaRecord::Rmc(Rmc {
        position: Position { lat, lng },
        track_made_good,
        sog,
    })))
}

fn parse_vtg(fields: &[&str]) -> Result<Option<NmeaRecord>, ParseError> {
    if fields.len() < 6 {
        return Ok(None);
    }
    let course_true = parse_float(fields[1], "course true")?;
    let sog = parse_float(fields[5], "speed over ground")?;

    Ok(Some(NmeaRecord::Vtg(Vtg { course_true, sog })))
}

fn parse_vdm(fields: &[&str]) -> Result<Option<NmeaRecord>, ParseError> {
    if fields.len() < 7 {
        return Ok(None);
    }
    let fragments = parse_int(fields[1], "fragment count")?;
    let fragment = parse_int(fields[2], "fragment number")?;
    let msg_id = (!fields[3].is_empty()).then(|| fields[3].to_string());
    let channel = fields[4].chars().next();
    let payload = fields[5].to_string();
    let fill_bits = parse_int(fields[6], "fill bits")? as u8;

    Ok(Some(NmeaRecord::Vdm(Vdm {
        payload,
        fragment,
        fragments,
        msg_id,
        channel,
        fill_bits,
    })))
}

fn parse_int(value: &str, field: &'static str) -> Result<u32, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_float(value: &str, field: &'static str) -> Result<Option<f64>, ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ParseError::InvalidValue {
            field,
            value: value.to_string(),
        })
}

/// NMEA coordinates are `ddmm.mmm` (or `dddmm.mmm`) plus a hemisphere letter.
fn parse_coordinate(
    value: &str,
    hemisphere: &str,
    field: &'static str,
) -> Result<f64, ParseError> {
    let raw: f64 = value.parse().map_err(|_| ParseError::InvalidValue {
        field,
        value: value.to_string(),
    })?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let signed = degrees + minutes / 60.0;
    Ok(match hemisphere {
        "S" | "W" => -signed,
        _ => signed,
    })
}
