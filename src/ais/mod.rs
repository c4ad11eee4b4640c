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

//! Typed AIS messages decoded from reassembled VDM payloads.
//!
//! Supports the message types a vessel-tracking application actually sees on
//! the VHF data link: position reports (Types 1/2/3 sharing the Common
//! Navigation Block), voyage statics (Type 5), class-B position reports
//! (Type 18), aids to navigation (Type 21) and the two halves of the class-B
//! static report (Type 24A/24B).
//!
//! Decoded messages keep the raw wire values; positions are stored in
//! scaled minutes as transmitted. Fields with a documented "not available"
//! sentinel are exposed through accessors that mask the sentinel:
//!
//! ```
//! use ais_client::ais::Ais;
//!
//! let msg = Ais::decode("13u?etPv2;0n:dDPwUM1U1Cb069D").unwrap();
//! let Ais::Type1(cnb) = msg else { panic!() };
//! assert_eq!(cnb.mmsi, 265547250);
//! assert_eq!(cnb.course(), Some(40.4));
//! ```

pub mod enums;
pub mod sixbit;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use log::debug;

use enums::{AID_TYPE, EPFD_FIX_TYPE, MANEUVER_INDICATOR, NAVIGATION_STATUS, SHIP_TYPE};
use sixbit::PayloadReader;

/// Speed over ground "not available" sentinel, knots.
pub const SOG_NOT_AVAILABLE: f64 = 102.3;
/// Course over ground "not available" sentinel, degrees.
pub const COURSE_NOT_AVAILABLE: f64 = 360.0;
/// True heading "not available" sentinel, degrees.
pub const HEADING_NOT_AVAILABLE: u16 = 511;
/// Latitude "not available" sentinel in scaled minutes (91 degrees).
pub const LAT_NOT_AVAILABLE_MIN: f64 = 91.0 * 60.0;
/// Longitude "not available" sentinel in scaled minutes (181 degrees).
pub const LON_NOT_AVAILABLE_MIN: f64 = 181.0 * 60.0;

/// Index key for Type 24 part A records.
pub const KEY_TYPE24A: u16 = 0x24A;
/// Index key for Type 24 part B records.
pub const KEY_TYPE24B: u16 = 0x24B;

/// Common Navigation Block shared by position report Types 1, 2 and 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Cnb {
    pub repeat: u8,
    pub mmsi: u32,
    pub status: Option<&'static str>,
    /// Rate of turn as transmitted.
    pub turn: f64,
    sog: f64,
    pub accuracy: bool,
    lon: f64,
    lat: f64,
    course: f64,
    heading: u16,
    second: u8,
    pub maneuver: Option<&'static str>,
    pub raim: bool,
    pub radio: u32,
}

impl Cnb {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            status: r.lookup(38, 4, NAVIGATION_STATUS),
            turn: r.signed_scaled(42, 8, 3)?,
            sog: r.unsigned_scaled(50, 10, 1)?,
            accuracy: r.flag(60)?,
            lon: r.signed_scaled(61, 28, 4)?,
            lat: r.signed_scaled(89, 27, 4)?,
            course: r.unsigned_scaled(116, 12, 1)?,
            heading: r.unsigned(128, 9)? as u16,
            second: r.unsigned(137, 6)? as u8,
            maneuver: r.lookup(143, 2, MANEUVER_INDICATOR),
            raim: r.flag(148)?,
            radio: r.unsigned(149, 19)? as u32,
        })
    }

    /// Speed over ground in knots.
    #[must_use]
    pub fn sog(&self) -> Option<f64> {
        (self.sog != SOG_NOT_AVAILABLE).then_some(self.sog)
    }

    /// Course over ground in degrees true.
    #[must_use]
    pub fn course(&self) -> Option<f64> {
        (self.course != COURSE_NOT_AVAILABLE).then_some(self.course)
    }

    /// True heading in degrees.
    #[must_use]
    pub fn heading(&self) -> Option<u16> {
        (self.heading != HEADING_NOT_AVAILABLE).then_some(self.heading)
    }

    /// UTC second of the position fix.
    #[must_use]
    pub fn second(&self) -> Option<u8> {
        (self.second < 60).then_some(self.second)
    }

    /// Latitude in scaled minutes.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        (self.lat != LAT_NOT_AVAILABLE_MIN).then_some(self.lat)
    }

    /// Longitude in scaled minutes.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        (self.lon != LON_NOT_AVAILABLE_MIN).then_some(self.lon)
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat_deg(&self) -> Option<f64> {
        self.lat().map(|m| m / 60.0)
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon_deg(&self) -> Option<f64> {
        self.lon().map(|m| m / 60.0)
    }

    /// Raw latitude in minutes, sentinel included (for display formatting).
    #[must_use]
    pub fn lat_minutes(&self) -> f64 {
        self.lat
    }

    /// Raw longitude in minutes, sentinel included.
    #[must_use]
    pub fn lon_minutes(&self) -> f64 {
        self.lon
    }
}

/// Type 5: static and voyage related data.
#[derive(Debug, Clone, PartialEq)]
pub struct Type5 {
    pub repeat: u8,
    pub mmsi: u32,
    pub ais_version: u8,
    pub imo: u32,
    pub callsign: String,
    pub shipname: String,
    pub shiptype: Option<&'static str>,
    pub to_bow: u16,
    pub to_stern: u16,
    pub to_port: u8,
    pub to_starboard: u8,
    pub epfd: Option<&'static str>,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// ETA resolved against the current year, rolled forward when already past.
    pub eta: Option<DateTime<Utc>>,
    pub draught: f64,
    pub destination: String,
    pub dte: bool,
}

impl Type5 {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        let month = r.unsigned(274, 4)? as u8;
        let day = r.unsigned(278, 5)? as u8;
        let hour = r.unsigned(283, 5)? as u8;
        let minute = r.unsigned(288, 6)? as u8;
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            ais_version: r.unsigned(38, 2)? as u8,
            imo: r.unsigned(40, 30)? as u32,
            callsign: r.text(70, 42),
            shipname: r.text(112, 120),
            shiptype: r.lookup(232, 8, SHIP_TYPE),
            to_bow: r.unsigned(240, 9)? as u16,
            to_stern: r.unsigned(249, 9)? as u16,
            to_port: r.unsigned(258, 6)? as u8,
            to_starboard: r.unsigned(264, 6)? as u8,
            epfd: r.lookup(270, 4, EPFD_FIX_TYPE),
            month,
            day,
            hour,
            minute,
            eta: eta_from_parts(month, day, hour, minute),
            draught: r.unsigned_scaled(294, 8, 1)?,
            destination: r.text(302, 120),
            dte: r.flag(422)?,
        })
    }
}

/// ETA fields carry no year. Resolve against the current year and roll to
/// the next one when the result is already in the past.
fn eta_from_parts(month: u8, day: u8, hour: u8, minute: u8) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    let at_year = |year: i32| {
        Utc.with_ymd_and_hms(
            year,
            u32::from(month),
            u32::from(day),
            u32::from(hour),
            u32::from(minute),
            0,
        )
        .single()
    };
    let candidate = at_year(now.year())?;
    if candidate < now {
        at_year(now.year() + 1)
    } else {
        Some(candidate)
    }
}

/// Type 18: standard class B equipment position report.
#[derive(Debug, Clone, PartialEq)]
pub struct Type18 {
    pub repeat: u8,
    pub mmsi: u32,
    speed: f64,
    pub accuracy: bool,
    lon: f64,
    lat: f64,
    course: f64,
    heading: u16,
    second: u8,
    pub regional: u8,
    pub cs: bool,
    pub display: bool,
    pub dsc: bool,
    pub band: bool,
    pub msg22: bool,
    pub assigned: bool,
    pub raim: bool,
    pub radio: u32,
}

impl Type18 {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            speed: r.unsigned_scaled(46, 10, 1)?,
            accuracy: r.flag(56)?,
            lon: r.signed_scaled(57, 28, 4)?,
            lat: r.signed_scaled(85, 27, 4)?,
            course: r.unsigned_scaled(112, 12, 1)?,
            heading: r.unsigned(124, 9)? as u16,
            second: r.unsigned(133, 6)? as u8,
            regional: r.unsigned(139, 2)? as u8,
            cs: r.flag(141)?,
            display: r.flag(142)?,
            dsc: r.flag(143)?,
            band: r.flag(144)?,
            msg22: r.flag(145)?,
            assigned: r.flag(146)?,
            raim: r.flag(147)?,
            radio: r.unsigned(148, 20)? as u32,
        })
    }

    /// Speed over ground in knots.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        (self.speed != SOG_NOT_AVAILABLE).then_some(self.speed)
    }

    /// Course over ground in degrees true.
    #[must_use]
    pub fn course(&self) -> Option<f64> {
        (self.course != COURSE_NOT_AVAILABLE).then_some(self.course)
    }

    /// True heading in degrees.
    #[must_use]
    pub fn heading(&self) -> Option<u16> {
        (self.heading != HEADING_NOT_AVAILABLE).then_some(self.heading)
    }

    /// UTC second of the position fix.
    #[must_use]
    pub fn second(&self) -> Option<u8> {
        (self.second < 60).then_some(self.second)
    }

    /// Latitude in scaled minutes.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        (self.lat != LAT_NOT_AVAILABLE_MIN).then_some(self.lat)
    }

    /// Longitude in scaled minutes.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        (self.lon != LON_NOT_AVAILABLE_MIN).then_some(self.lon)
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat_deg(&self) -> Option<f64> {
        self.lat().map(|m| m / 60.0)
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon_deg(&self) -> Option<f64> {
        self.lon().map(|m| m / 60.0)
    }

    /// Raw latitude in minutes, sentinel included.
    #[must_use]
    pub fn lat_minutes(&self) -> f64 {
        self.lat
    }

    /// Raw longitude in minutes, sentinel included.
    #[must_use]
    pub fn lon_minutes(&self) -> f64 {
        self.lon
    }
}

/// Type 21: aid-to-navigation report.
#[derive(Debug, Clone, PartialEq)]
pub struct Type21 {
    pub repeat: u8,
    pub mmsi: u32,
    pub aid_type: Option<&'static str>,
    /// Name, including the extension block when the base field is full.
    pub name: String,
    pub accuracy: bool,
    lon: f64,
    lat: f64,
    pub to_bow: u16,
    pub to_stern: u16,
    pub to_port: u8,
    pub to_starboard: u8,
    pub epfd: Option<&'static str>,
    second: u8,
    pub off_position: bool,
    pub regional: u8,
    pub raim: bool,
    pub virtual_aid: bool,
    pub assigned: bool,
}

impl Type21 {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        let mut name = r.text(43, 120);
        if name.len() == 20 {
            // Base field is full; the tail of the name lives past bit 272.
            name.push_str(&r.text(272, 88));
        }
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            aid_type: r.lookup(38, 5, AID_TYPE),
            name,
            accuracy: r.flag(163)?,
            lon: r.signed_scaled(164, 28, 4)?,
            lat: r.signed_scaled(192, 27, 4)?,
            to_bow: r.unsigned(219, 9)? as u16,
            to_stern: r.unsigned(228, 9)? as u16,
            to_port: r.unsigned(237, 6)? as u8,
            to_starboard: r.unsigned(243, 6)? as u8,
            epfd: r.lookup(249, 4, EPFD_FIX_TYPE),
            second: r.unsigned(253, 6)? as u8,
            off_position: r.flag(259)?,
            regional: r.unsigned(260, 8)? as u8,
            raim: r.flag(268)?,
            virtual_aid: r.flag(269)?,
            assigned: r.flag(270)?,
        })
    }

    /// UTC second of the position fix.
    #[must_use]
    pub fn second(&self) -> Option<u8> {
        (self.second < 60).then_some(self.second)
    }

    /// Latitude in scaled minutes.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        (self.lat != LAT_NOT_AVAILABLE_MIN).then_some(self.lat)
    }

    /// Longitude in scaled minutes.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        (self.lon != LON_NOT_AVAILABLE_MIN).then_some(self.lon)
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat_deg(&self) -> Option<f64> {
        self.lat().map(|m| m / 60.0)
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon_deg(&self) -> Option<f64> {
        self.lon().map(|m| m / 60.0)
    }

    /// Raw latitude in minutes, sentinel included.
    #[must_use]
    pub fn lat_minutes(&self) -> f64 {
        self.lat
    }

    /// Raw longitude in minutes, sentinel included.
    #[must_use]
    pub fn lon_minutes(&self) -> f64 {
        self.lon
    }
}

/// Type 24 part A: class B static data, ship name.
#[derive(Debug, Clone, PartialEq)]
pub struct Type24A {
    pub repeat: u8,
    pub mmsi: u32,
    pub shipname: String,
}

impl Type24A {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            shipname: r.text(40, 120),
        })
    }
}

/// Type 24 part B: class B static data, vendor and dimensions.
///
/// Bits 132 and up carry either the mothership MMSI (when the reporting MMSI
/// matches the auxiliary-craft pattern `98XXXYYYY`) or the ship dimensions.
/// Both interpretations are decoded; [`Type24B::is_auxiliary`] tells the
/// caller which one the sender meant.
#[derive(Debug, Clone, PartialEq)]
pub struct Type24B {
    pub repeat: u8,
    pub mmsi: u32,
    pub shiptype: Option<&'static str>,
    pub vendorid: String,
    pub model: u8,
    pub serial: u32,
    pub callsign: String,
    pub mothership_mmsi: Option<u32>,
    pub to_bow: Option<u16>,
    pub to_stern: Option<u16>,
    pub to_port: Option<u8>,
    pub to_starboard: Option<u8>,
}

impl Type24B {
    fn decode(r: &PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            repeat: r.unsigned(6, 2)? as u8,
            mmsi: r.unsigned(8, 30)? as u32,
            shiptype: r.lookup(40, 8, SHIP_TYPE),
            vendorid: r.text(48, 18),
            model: r.unsigned(66, 4)? as u8,
            serial: r.unsigned(70, 20)? as u32,
            callsign: r.text(90, 42),
            mothership_mmsi: r.unsigned(132, 30).map(|v| v as u32),
            to_bow: r.unsigned(132, 9).map(|v| v as u16),
            to_stern: r.unsigned(141, 9).map(|v| v as u16),
            to_port: r.unsigned(150, 6).map(|v| v as u8),
            to_starboard: r.unsigned(156, 6).map(|v| v as u8),
        })
    }

    /// Whether the reporting station is an auxiliary craft, in which case
    /// the dimension fields are actually the mothership MMSI.
    #[must_use]
    pub fn is_auxiliary(&self) -> bool {
        (980_000_000..990_000_000).contains(&self.mmsi)
    }
}

/// A decoded AIS message.
#[derive(Debug, Clone, PartialEq)]
pub enum Ais {
    Type1(Cnb),
    Type2(Cnb),
    Type3(Cnb),
    Type5(Type5),
    Type18(Type18),
    Type21(Type21),
    Type24A(Type24A),
    Type24B(Type24B),
}

impl Ais {
    /// Decode a reassembled six-bit payload into a typed message.
    ///
    /// Returns `None` for message types outside the supported set and for
    /// payloads too short to carry the fields of their declared type.
    #[must_use]
    pub fn decode(payload: &str) -> Option<Ais> {
        let r = PayloadReader::new(payload);
        match r.unsigned(0, 6)? {
            1 => Cnb::decode(&r).map(Ais::Type1),
            2 => Cnb::decode(&r).map(Ais::Type2),
            3 => Cnb::decode(&r).map(Ais::Type3),
            5 => Type5::decode(&r).map(Ais::Type5),
            18 => Type18::decode(&r).map(Ais::Type18),
            21 => Type21::decode(&r).map(Ais::Type21),
            24 => match r.unsigned(38, 2)? {
                0 => Type24A::decode(&r).map(Ais::Type24A),
                _ => Type24B::decode(&r).map(Ais::Type24B),
            },
            other => {
                debug!("ignoring unsupported AIS message type {other}");
                None
            }
        }
    }

    /// MMSI of the reporting station.
    #[must_use]
    pub fn mmsi(&self) -> u32 {
        match self {
            Ais::Type1(m) | Ais::Type2(m) | Ais::Type3(m) => m.mmsi,
            Ais::Type5(m) => m.mmsi,
            Ais::Type18(m) => m.mmsi,
            Ais::Type21(m) => m.mmsi,
            Ais::Type24A(m) => m.mmsi,
            Ais::Type24B(m) => m.mmsi,
        }
    }

    /// Key under which this message is indexed per MMSI.
    ///
    /// Wire type number for every variant except the two halves of Type 24,
    /// which get their own keys so they do not overwrite each other.
    #[must_use]
    pub fn type_key(&self) -> u16 {
        match self {
            Ais::Type1(_) => 1,
            Ais::Type2(_) => 2,
            Ais::Type3(_) => 3,
            Ais::Type5(_) => 5,
            Ais::Type18(_) => 18,
            Ais::Type21(_) => 21,
            Ais::Type24A(_) => KEY_TYPE24A,
            Ais::Type24B(_) => KEY_TYPE24B,
        }
    }
}
