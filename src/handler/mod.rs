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

//! Vessel dispatch state machine.
//!
//! Consumes the demultiplexed stream of parsed NMEA records, reassembles
//! multi-fragment VDM chains, decodes completed payloads and drives the
//! application's navigation callbacks: `we` with our own position on every
//! RMC, `they` with a target's position whenever a position-bearing AIS
//! message completes while our own position is known.
//!
//! The handler also maintains two indices for introspection: ship names per
//! MMSI, and the most recent message per MMSI and message type. Everything
//! runs on the single task that feeds it; accessors hand out snapshots when
//! the data has to cross that boundary.
//!
//! The handler is deliberately tolerant of noisy feeds. Fragments from an
//! interleaved chain are dropped without disturbing the chain in progress,
//! undecodable payloads are discarded, and no event ever panics the entry
//! point.

use std::collections::HashMap;

use log::{debug, warn};

use crate::ais::{Ais, LAT_NOT_AVAILABLE_MIN, LON_NOT_AVAILABLE_MIN};
use crate::geo::{dms, Pcs};
use crate::protocol::{NmeaRecord, Rmc, Vdm};

/// Cap on the reassembly buffer: the longest defined AIS message spans nine
/// fragments of at most 1024 payload characters.
pub const MAX_PAYLOAD_CHARS: usize = 9 * 1024;

/// Navigation events delivered by the [`VesselHandler`].
///
/// Callbacks are invoked in the exact order events arrive from the feed and
/// must not drive further reads synchronously.
pub trait NavEvents {
    /// Our own vessel's position, course and speed, once per RMC.
    fn we(&mut self, us: &Pcs);

    /// A target vessel's position, course and speed, at most once per
    /// completed position-bearing VDM. Only invoked when our own position
    /// is already known.
    fn they(&mut self, us: &Pcs, them: &Pcs, mmsi: u32);

    /// Called with a ship's name before the internal name index is updated.
    /// Override to persist names; the default does nothing.
    fn name_for(&mut self, _mmsi: u32, _shipname: &str) {}
}

/// Dispatch state machine over parsed NMEA records.
pub struct VesselHandler<E> {
    events: E,
    us: Option<Pcs>,
    payload: String,
    last_msg_id: Option<String>,
    names: HashMap<u32, String>,
    statics: HashMap<u32, HashMap<u16, Ais>>,
}

impl<E> std::fmt::Debug for VesselHandler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VesselHandler")
            .field("us", &self.us)
            .field("pending_payload_chars", &self.payload.len())
            .field("vessel_count", &self.statics.len())
            .finish_non_exhaustive()
    }
}

impl<E: NavEvents> VesselHandler<E> {
    /// Create a handler delivering to the given event sink.
    #[must_use]
    pub fn new(events: E) -> Self {
        Self {
            events,
            us: None,
            payload: String::new(),
            last_msg_id: None,
            names: HashMap::new(),
            statics: HashMap::new(),
        }
    }

    /// Feed one parsed record through the state machine.
    pub fn handle(&mut self, record: NmeaRecord) {
        match record {
            NmeaRecord::Rmc(rmc) => self.handle_rmc(&rmc),
            // Track and speed also arrive via RMC; VTG adds nothing yet.
            NmeaRecord::Vtg(_) => {}
            NmeaRecord::Vdm(vdm) => self.handle_vdm(vdm),
        }
    }

    fn handle_rmc(&mut self, rmc: &Rmc) {
        let us = Pcs::new(
            rmc.position.lat,
            rmc.position.lng,
            rmc.track_made_good.unwrap_or(0.0),
            rmc.sog,
        );
        self.events.we(&us);
        self.us = Some(us);
    }

    fn handle_vdm(&mut self, vdm: Vdm) {
        if vdm.fragment < vdm.fragments {
            if self.last_msg_id.is_none() {
                self.last_msg_id = vdm.msg_id.clone();
            } else if self.last_msg_id != vdm.msg_id {
                // A second chain interleaved with the one in progress.
                // Tolerate it: drop the stray fragment, keep accumulating.
                debug!(
                    "out-of-sequence fragment (chain {:?}, got {:?})",
                    self.last_msg_id, vdm.msg_id
                );
                return;
            }
            if self.payload.len() + vdm.payload.len() > MAX_PAYLOAD_CHARS {
                warn!("fragment chain exceeded {MAX_PAYLOAD_CHARS} chars, discarding");
                self.reset_chain();
                return;
            }
            self.payload.push_str(&vdm.payload);
            return;
        }

        // Final fragment completes the chain.
        self.payload.push_str(&vdm.payload);
        let decoded = Ais::decode(&self.payload);
        self.reset_chain();
        if let Some(msg) = decoded {
            self.dispatch(msg);
        }
    }

    fn reset_chain(&mut self) {
        self.payload.clear();
        self.last_msg_id = None;
    }

    fn dispatch(&mut self, msg: Ais) {
        match &msg {
            Ais::Type1(cnb) | Ais::Type2(cnb) | Ais::Type3(cnb) => {
                self.notify_target(cnb.mmsi, cnb.course(), cnb.lat_deg(), cnb.lon_deg(), cnb.sog());
            }
            Ais::Type18(m) => {
                self.notify_target(m.mmsi, m.course(), m.lat_deg(), m.lon_deg(), m.speed());
            }
            Ais::Type5(m) => self.update_name(m.mmsi, m.shipname.clone()),
            Ais::Type24A(m) => self.update_name(m.mmsi, m.shipname.clone()),
            Ais::Type24B(_) => {}
            Ais::Type21(m) => {
                debug!(
                    "aid to navigation {}: {} {}",
                    m.mmsi,
                    dms(m.lat_minutes(), "N", "S", LAT_NOT_AVAILABLE_MIN, 1),
                    dms(m.lon_minutes(), "E", "W", LON_NOT_AVAILABLE_MIN, 1),
                );
                self.update_name(m.mmsi, m.name.clone());
                if let (Some(lat), Some(lon)) = (m.lat_deg(), m.lon_deg()) {
                    if let Some(us) = &self.us {
                        // A fixed mark: zero course, zero speed.
                        let them = Pcs::new(lat, lon, 0.0, 0.0);
                        self.events.they(us, &them, m.mmsi);
                    }
                }
            }
        }
        self.stash(msg);
    }

    fn notify_target(
        &mut self,
        mmsi: u32,
        course: Option<f64>,
        lat_deg: Option<f64>,
        lon_deg: Option<f64>,
        sog: Option<f64>,
    ) {
        let Some(us) = &self.us else { return };
        let (Some(course), Some(lat), Some(lon)) = (course, lat_deg, lon_deg) else {
            return;
        };
        let them = Pcs::from_parts(Some(lat), Some(lon), Some(course), sog);
        self.events.they(us, &them, mmsi);
    }

    fn stash(&mut self, msg: Ais) {
        self.statics
            .entry(msg.mmsi())
            .or_default()
            .insert(msg.type_key(), msg);
    }

    fn update_name(&mut self, mmsi: u32, name: String) {
        self.events.name_for(mmsi, &name);
        self.names.insert(mmsi, name);
    }

    /// Last reported name of a vessel.
    #[must_use]
    pub fn name(&self, mmsi: u32) -> Option<&str> {
        self.names.get(&mmsi).map(String::as_str)
    }

    /// Most recent message of one type from a vessel. Type keys are the
    /// wire type number, except [`crate::ais::KEY_TYPE24A`] and
    /// [`crate::ais::KEY_TYPE24B`] for the two halves of Type 24.
    #[must_use]
    pub fn most_recent_message(&self, mmsi: u32, type_key: u16) -> Option<&Ais> {
        self.statics.get(&mmsi)?.get(&type_key)
    }

    /// Snapshot of all most-recent messages from a vessel, keyed by type.
    #[must_use]
    pub fn most_recent_messages(&self, mmsi: u32) -> HashMap<u16, Ais> {
        self.statics.get(&mmsi).cloned().unwrap_or_default()
    }

    /// Our own vessel's position, absent until the first RMC.
    #[must_use]
    pub fn own_position(&self) -> Option<&Pcs> {
        self.us.as_ref()
    }

    /// The event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Mutable access to the event sink.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ais::{KEY_TYPE24A, KEY_TYPE24B};
    use crate::geo::tcpa;
    use crate::protocol::{NmeaParser, Protocol};

    const RMC: &str = "$GPRMC,123519,A,5000.000,N,00100.000,W,10.0,000.0,020826,,,A*54";
    const VDM_TYPE1: &str = "!AIVDM,1,1,,B,13u?etPv2;0n:dDPwUM1U1Cb069D,0*27";
    const VDM_TYPE1_SENTINELS: &str = "!AIVDM,1,1,,A,11mg=5OP?w<tSF0l4Q@>4?wqP000,0*04";
    const VDM_TYPE18: &str = "!AIVDM,1,1,,A,B52K>;h0I?vnhP7:cN1hSwg5k8mC,0*51";
    const VDM_TYPE5_1: &str = "!AIVDM,2,1,7,A,53u?etP2:N2U<M1@000EHE:0LUHDp0000000,0*19";
    const VDM_TYPE5_2: &str = "!AIVDM,2,2,7,A,0016;@t:<7<=N@DSm51DQ0C@00000000000,2*4D";
    const VDM_TYPE5_2_OTHER_CHAIN: &str =
        "!AIVDM,2,2,9,A,0016;@t:<7<=N@DSm51DQ0C@00000000000,2*43";
    const VDM_TYPE21: &str =
        "!AIVDM,1,1,,B,E>jHC6?1Pa24W0V@6Pa5h9Wbb4I@KMl0@Cdp050`@CvP01F50,4*33";
    const VDM_TYPE24A: &str = "!AIVDM,1,1,,A,H3u?etPpu8@T>1=@58000000000,2*32";
    const VDM_TYPE24B: &str = "!AIVDM,1,1,,A,H3u?etTT123D30qC7ijkl0183220,0*4A";

    #[derive(Debug, Default)]
    struct Recorder {
        we_calls: Vec<Pcs>,
        they_calls: Vec<(Pcs, Pcs, u32)>,
        names: Vec<(u32, String)>,
    }

    impl NavEvents for Recorder {
        fn we(&mut self, us: &Pcs) {
            self.we_calls.push(us.clone());
        }

        fn they(&mut self, us: &Pcs, them: &Pcs, mmsi: u32) {
            self.they_calls.push((us.clone(), them.clone(), mmsi));
        }

        fn name_for(&mut self, mmsi: u32, shipname: &str) {
            self.names.push((mmsi, shipname.to_string()));
        }
    }

    fn feed(handler: &mut VesselHandler<Recorder>, sentences: &[&str]) {
        let mut parser = NmeaParser::new();
        for sentence in sentences {
            if let Ok(Some(record)) = parser.parse(sentence.as_bytes()) {
                handler.handle(record);
            }
        }
    }

    #[test]
    fn test_we_invoked_once_per_rmc() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[RMC, RMC]);
        assert_eq!(handler.events().we_calls.len(), 2);
        let us = &handler.events().we_calls[0];
        assert_eq!(us.lat(), Some(50.0));
        assert_eq!(us.lon(), Some(-1.0));
        assert_eq!(us.cog(), Some(0.0));
        assert_eq!(us.sog(), Some(10.0));
        assert!(handler.own_position().is_some());
    }

    #[test]
    fn test_rmc_without_track_defaults_course_to_zero() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(
            &mut handler,
            &["$GPRMC,123519,A,5000.000,N,00100.000,W,10.0,,020826,,,A"],
        );
        assert_eq!(handler.events().we_calls[0].cog(), Some(0.0));
    }

    #[test]
    fn test_they_not_invoked_before_own_position() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE18]);
        assert!(handler.events().they_calls.is_empty());
        // The message is still indexed.
        assert!(handler.most_recent_message(338_087_471, 18).is_some());
    }

    #[test]
    fn test_they_carries_target_pcs_for_cpa() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[RMC, VDM_TYPE18]);
        assert_eq!(handler.events().they_calls.len(), 1);
        let (us, them, mmsi) = &handler.events().they_calls[0];
        assert_eq!(*mmsi, 338_087_471);
        assert!((them.lat().unwrap() - 50.1).abs() < 1e-9);
        assert!((them.lon().unwrap() - (-1.0)).abs() < 1e-9);
        assert_eq!(them.cog(), Some(180.0));
        assert_eq!(them.sog(), Some(10.0));
        // Head-on at matched speed: closest approach eighteen minutes out.
        let t = tcpa(us, them).unwrap();
        assert!((t - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_they_invoked_for_class_a_position_reports() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[RMC, VDM_TYPE1]);
        assert_eq!(handler.events().they_calls.len(), 1);
        let (_, them, mmsi) = &handler.events().they_calls[0];
        assert_eq!(*mmsi, 265_547_250);
        assert!((them.lat().unwrap() - 3459.6212 / 60.0).abs() < 1e-9);
        assert_eq!(them.cog(), Some(40.4));
    }

    #[test]
    fn test_they_skipped_when_target_position_is_sentinel() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[RMC, VDM_TYPE1_SENTINELS]);
        assert!(handler.events().they_calls.is_empty());
        // Still indexed under its wire type.
        assert!(handler.most_recent_message(123_456_789, 1).is_some());
    }

    #[test]
    fn test_fragment_reassembly_and_name_index() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE5_1, VDM_TYPE5_2]);
        assert_eq!(handler.name(265_547_250), Some("EVER GIVEN"));
        // The persistence hook ran before the index update.
        assert_eq!(
            handler.events().names,
            vec![(265_547_250, "EVER GIVEN".to_string())]
        );
        let Some(Ais::Type5(m)) = handler.most_recent_message(265_547_250, 5) else {
            panic!("type 5 not indexed");
        };
        assert_eq!(m.destination, "ROTTERDAM");
    }

    #[test]
    fn test_out_of_sequence_fragment_does_not_corrupt_chain() {
        let mut handler = VesselHandler::new(Recorder::default());
        // A stray fragment from chain 9 lands in the middle of chain 7.
        let stray = "!AIVDM,2,1,9,A,53u?etP2:N2U<M1@000EHE:0LUHDp0000000,0*17";
        feed(&mut handler, &[VDM_TYPE5_1, stray, VDM_TYPE5_2]);
        assert_eq!(handler.name(265_547_250), Some("EVER GIVEN"));
    }

    #[test]
    fn test_completed_chain_resets_state() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE5_1, VDM_TYPE5_2, VDM_TYPE18]);
        // The single-fragment message decodes cleanly after the chain.
        assert!(handler.most_recent_message(338_087_471, 18).is_some());
    }

    #[test]
    fn test_undecodable_payload_is_discarded() {
        let mut handler = VesselHandler::new(Recorder::default());
        // First fragment of a type 5 arriving as if complete.
        feed(&mut handler, &[RMC, "!AIVDM,1,1,,A,53u?etP2:N2U<M1@,0"]);
        assert!(handler.events().they_calls.is_empty());
        assert!(handler.most_recent_messages(265_547_250).is_empty());
        // The handler keeps working afterwards.
        feed(&mut handler, &[VDM_TYPE18]);
        assert_eq!(handler.events().they_calls.len(), 1);
    }

    #[test]
    fn test_type24_parts_are_indexed_separately() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE24A, VDM_TYPE24B]);
        let a = handler.most_recent_message(265_547_250, KEY_TYPE24A);
        let b = handler.most_recent_message(265_547_250, KEY_TYPE24B);
        assert!(matches!(a, Some(Ais::Type24A(m)) if m.shipname == "NORDIC STAR"));
        assert!(matches!(b, Some(Ais::Type24B(m)) if m.vendorid == "ABC"));
        assert_eq!(handler.name(265_547_250), Some("NORDIC STAR"));
        assert_eq!(handler.most_recent_messages(265_547_250).len(), 2);
    }

    #[test]
    fn test_newer_message_replaces_older_in_index() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE18, VDM_TYPE18]);
        assert_eq!(handler.most_recent_messages(338_087_471).len(), 1);
    }

    #[test]
    fn test_aid_to_navigation_reported_as_stationary_target() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[RMC, VDM_TYPE21]);
        assert_eq!(handler.events().they_calls.len(), 1);
        let (_, them, mmsi) = &handler.events().they_calls[0];
        assert_eq!(*mmsi, 992_351_000);
        assert_eq!(them.cog(), Some(0.0));
        assert_eq!(them.sog(), Some(0.0));
        assert!((them.lat().unwrap() - 57.0).abs() < 1e-9);
        assert_eq!(handler.name(992_351_000), Some("CARDINAL MARK SOUTH2EXT"));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_updates() {
        let mut handler = VesselHandler::new(Recorder::default());
        feed(&mut handler, &[VDM_TYPE24A]);
        let snapshot = handler.most_recent_messages(265_547_250);
        feed(&mut handler, &[VDM_TYPE24B]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(handler.most_recent_messages(265_547_250).len(), 2);
    }

    #[test]
    fn test_oversized_chain_is_discarded() {
        let mut handler = VesselHandler::new(Recorder::default());
        let big = "0".repeat(1000);
        for fragment in 1..=10 {
            handler.handle(NmeaRecord::Vdm(crate::protocol::Vdm {
                payload: big.clone(),
                fragment,
                fragments: 11,
                msg_id: Some("1".to_string()),
                channel: Some('A'),
                fill_bits: 0,
            }));
        }
        // The tenth fragment tripped the cap and reset the buffer.
        assert!(handler.payload.len() < MAX_PAYLOAD_CHARS);
        assert!(handler.last_msg_id.is_none());
    }
}
