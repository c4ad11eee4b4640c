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

//! Enumerated-field lookup tables from ITU-R M.1371 / the AIVDM reference.
//!
//! Tables are indexed by the raw wire value; an index past the end of a table
//! means the field is not available.

/// Navigation status, CNB bits 38-41.
pub const NAVIGATION_STATUS: &[&str] = &[
    "Under way using engine",
    "At anchor",
    "Not under command",
    "Restricted manoeuverability",
    "Constrained by her draught",
    "Moored",
    "Aground",
    "Engaged in Fishing",
    "Under way sailing",
    "Reserved for future amendment (HSC)",
    "Reserved for future amendment (WIG)",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "AIS-SART is active",
    "Not defined",
];

/// Maneuver indicator, CNB bits 143-144. Raw value 3 is out of range.
pub const MANEUVER_INDICATOR: &[&str] = &[
    "Not available",
    "No special maneuver",
    "Special maneuver",
];

/// Electronic position fixing device types (Types 5 and 21).
pub const EPFD_FIX_TYPE: &[&str] = &[
    "Undefined",
    "GPS",
    "GLONASS",
    "Combined GPS/GLONASS",
    "Loran-C",
    "Chayka",
    "Integrated navigation system",
    "Surveyed",
    "Galileo",
];

/// Ship and cargo types (Types 5 and 24B), wire values 0-99.
pub const SHIP_TYPE: &[&str] = &[
    "Not available",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Reserved for future use",
    "Wing in ground (WIG), all ships of this type",
    "Wing in ground (WIG), Hazardous category A",
    "Wing in ground (WIG), Hazardous category B",
    "Wing in ground (WIG), Hazardous category C",
    "Wing in ground (WIG), Hazardous category D",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Fishing",
    "Towing",
    "Towing: length exceeds 200m or breadth exceeds 25m",
    "Dredging or underwater ops",
    "Diving ops",
    "Military ops",
    "Sailing",
    "Pleasure Craft",
    "Reserved",
    "Reserved",
    "High speed craft (HSC), all ships of this type",
    "High speed craft (HSC), Hazardous category A",
    "High speed craft (HSC), Hazardous category B",
    "High speed craft (HSC), Hazardous category C",
    "High speed craft (HSC), Hazardous category D",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), No additional information",
    "Pilot Vessel",
    "Search and Rescue vessel",
    "Tug",
    "Port Tender",
    "Anti-pollution equipment",
    "Law Enforcement",
    "Spare - Local Vessel",
    "Spare - Local Vessel",
    "Medical Transport",
    "Noncombatant ship according to RR Resolution No. 18",
    "Passenger, all ships of this type",
    "Passenger, Hazardous category A",
    "Passenger, Hazardous category B",
    "Passenger, Hazardous category C",
    "Passenger, Hazardous category D",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, No additional information",
    "Cargo, all ships of this type",
    "Cargo, Hazardous category A",
    "Cargo, Hazardous category B",
    "Cargo, Hazardous category C",
    "Cargo, Hazardous category D",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, No additional information",
    "Tanker, all ships of this type",
    "Tanker, Hazardous category A",
    "Tanker, Hazardous category B",
    "Tanker, Hazardous category C",
    "Tanker, Hazardous category D",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, No additional information",
    "Other Type, all ships of this type",
    "Other Type, Hazardous category A",
    "Other Type, Hazardous category B",
    "Other Type, Hazardous category C",
    "Other Type, Hazardous category D",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, no additional information",
];

/// Aid-to-navigation types (Type 21), wire values 0-31.
pub const AID_TYPE: &[&str] = &[
    "Default, Type of Aid to Navigation not specified",
    "Reference point",
    "RACON (radar transponder marking a navigation hazard)",
    "Fixed structure off shore",
    "Spare, Reserved for future use",
    "Light, without sectors",
    "Light, with sectors",
    "Leading Light Front",
    "Leading Light Rear",
    "Beacon, Cardinal N",
    "Beacon, Cardinal E",
    "Beacon, Cardinal S",
    "Beacon, Cardinal W",
    "Beacon, Port hand",
    "Beacon, Starboard hand",
    "Beacon, Preferred Channel port hand",
    "Beacon, Preferred Channel starboard hand",
    "Beacon, Isolated danger",
    "Beacon, Safe water",
    "Beacon, Special mark",
    "Cardinal Mark N",
    "Cardinal Mark E",
    "Cardinal Mark S",
    "Cardinal Mark W",
    "Port hand Mark",
    "Starboard hand Mark",
    "Preferred Channel Port hand",
    "Preferred Channel Starboard hand",
    "Isolated danger",
    "Safe Water",
    "Special Mark",
    "Light Vessel / LANBY / Rigs",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(NAVIGATION_STATUS.len(), 16);
        assert_eq!(MANEUVER_INDICATOR.len(), 3);
        assert_eq!(EPFD_FIX_TYPE.len(), 9);
        assert_eq!(SHIP_TYPE.len(), 100);
        assert_eq!(AID_TYPE.len(), 32);
    }

    #[test]
    fn test_well_known_entries() {
        assert_eq!(NAVIGATION_STATUS[0], "Under way using engine");
        assert_eq!(NAVIGATION_STATUS[5], "Moored");
        assert_eq!(SHIP_TYPE[36], "Sailing");
        assert_eq!(SHIP_TYPE[70], "Cargo, all ships of this type");
        assert_eq!(AID_TYPE[30], "Special Mark");
        assert_eq!(EPFD_FIX_TYPE[1], "GPS");
    }
}
