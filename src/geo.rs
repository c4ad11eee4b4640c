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

//! Navigation geometry and the closest-point-of-approach kernel.
//!
//! Distances use the equirectangular approximation, which is plenty at the
//! ranges AIS covers (tens of nautical miles). Motion is modelled as linear
//! in degrees per hour: a [`Pcs`] caches its north/east rates so the
//! position at time `t` and the CPA/TCPA solution are straight vector
//! algebra.

/// Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.0;

/// Equirectangular range between two positions, in nautical miles.
#[must_use]
pub fn range(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
    let x = (b_lon.to_radians() - a_lon.to_radians())
        * ((a_lat.to_radians() + b_lat.to_radians()) / 2.0).cos();
    let y = b_lat.to_radians() - a_lat.to_radians();
    EARTH_RADIUS_NM * x.hypot(y)
}

/// Initial bearing from `a` to `b`, degrees true in `[0, 360)`.
#[must_use]
pub fn bearing(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
    let delta = (b_lon - a_lon).to_radians();
    let y = delta.sin() * b_lat.to_radians().cos();
    let x = a_lat.to_radians().cos() * b_lat.to_radians().sin()
        - a_lat.to_radians().sin() * b_lat.to_radians().cos() * delta.cos();
    (360.0 + y.atan2(x).to_degrees()) % 360.0
}

/// Position, course and speed of a vessel.
///
/// Every input is optional; a `Pcs` built from a target report may lack any
/// of them. The derived north/east rates (`ns`/`es`, degrees per hour) are
/// computed once at construction and are `0.0` whenever course, speed or
/// latitude is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Pcs {
    lat: Option<f64>,
    lon: Option<f64>,
    cog: Option<f64>,
    sog: Option<f64>,
    ns: f64,
    es: f64,
}

impl Pcs {
    /// Build a `Pcs` with every component known.
    #[must_use]
    pub fn new(lat: f64, lon: f64, cog: f64, sog: f64) -> Self {
        Self::from_parts(Some(lat), Some(lon), Some(cog), Some(sog))
    }

    /// Build a `Pcs` from whatever components a report carried.
    #[must_use]
    pub fn from_parts(
        lat: Option<f64>,
        lon: Option<f64>,
        cog: Option<f64>,
        sog: Option<f64>,
    ) -> Self {
        let (ns, es) = match (cog, sog, lat) {
            (Some(cog), Some(sog), Some(lat)) => {
                let cog_rad = cog.to_radians();
                (
                    sog / 60.0 * cog_rad.cos(),
                    sog / 60.0 * cog_rad.sin() / lat.to_radians().cos().abs(),
                )
            }
            _ => (0.0, 0.0),
        };
        Self {
            lat,
            lon,
            cog,
            sog,
            ns,
            es,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        self.lon
    }

    /// Course over ground in degrees true.
    #[must_use]
    pub fn cog(&self) -> Option<f64> {
        self.cog
    }

    /// Speed over ground in knots.
    #[must_use]
    pub fn sog(&self) -> Option<f64> {
        self.sog
    }

    /// Northward rate in degrees of latitude per hour.
    #[must_use]
    pub fn ns(&self) -> f64 {
        self.ns
    }

    /// Eastward rate in degrees of longitude per hour.
    #[must_use]
    pub fn es(&self) -> f64 {
        self.es
    }

    /// Dead-reckoned `(lon, lat)` after `t` hours of linear motion.
    #[must_use]
    pub fn at(&self, t: f64) -> Option<(f64, f64)> {
        Some((self.lon? + self.es * t, self.lat? + self.ns * t))
    }
}

/// Time to the closest point of approach, in hours.
///
/// Positive means the closest approach lies ahead; diverging tracks give a
/// negative time. Two vessels with identical velocity vectors are already as
/// close as they will ever be, so the time is zero. Absent when our course
/// or either position is unknown.
#[must_use]
pub fn tcpa(us: &Pcs, them: &Pcs) -> Option<f64> {
    us.cog?;
    let (u_lat, u_lon) = (us.lat?, us.lon?);
    let (t_lat, t_lon) = (them.lat?, them.lon?);
    let dvx = us.es - them.es;
    let dvy = us.ns - them.ns;
    let dv2 = dvx * dvx + dvy * dvy;
    if dv2 == 0.0 {
        return Some(0.0);
    }
    Some(-((u_lon - t_lon) * dvx + (u_lat - t_lat) * dvy) / dv2)
}

/// Separation between the two dead-reckoned positions at time `t`, in
/// nautical miles. Absent when our course, the time, or either position is
/// unknown.
#[must_use]
pub fn distance(us: &Pcs, them: &Pcs, t: Option<f64>) -> Option<f64> {
    us.cog?;
    let t = t?;
    let (u_lon, u_lat) = us.at(t)?;
    let (t_lon, t_lat) = them.at(t)?;
    Some((u_lon - t_lon).hypot(u_lat - t_lat) * 60.0)
}

/// Distance at the closest point of approach, in nautical miles.
///
/// Evaluates [`distance`] at `t` when given, otherwise at [`tcpa`].
#[must_use]
pub fn cpa(us: &Pcs, them: &Pcs, t: Option<f64>) -> Option<f64> {
    distance(us, them, t.or_else(|| tcpa(us, them)))
}

/// Format a coordinate given in minutes as degrees and decimal minutes.
///
/// `v` equal to `na` renders as `"n/a"`; otherwise the suffix is picked by
/// sign and the magnitude is split as `D°M.mS` with `dp` decimal places on
/// the minutes.
#[must_use]
pub fn dms(v: f64, pos_suffix: &str, neg_suffix: &str, na: f64, dp: usize) -> String {
    if v == na {
        return "n/a".to_string();
    }
    let suffix = if v < 0.0 { neg_suffix } else { pos_suffix };
    let v = v.abs();
    let degrees = (v / 60.0).floor();
    let minutes = v - degrees * 60.0;
    format!("{}\u{b0}{:.*}{}", degrees as i64, dp, minutes, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_range_solent_crossing() {
        // 0.3 degrees of latitude and longitude apart off the south coast.
        assert!(approx(range(50.1, -1.3, 50.4, -1.6), 21.4, 0.1));
    }

    #[test]
    fn test_range_of_coincident_points_is_zero() {
        assert!(range(50.1, -1.3, 50.1, -1.3).abs() < 1e-9);
    }

    #[test]
    fn test_range_is_symmetric() {
        let ab = range(50.1, -1.3, 50.4, -1.6);
        let ba = range(50.4, -1.6, 50.1, -1.3);
        assert!(approx(ab, ba, 1e-9));
    }

    #[test]
    fn test_bearing_solent_crossing() {
        assert!(approx(bearing(50.1, -1.3, 50.4, -1.6), 327.5, 0.5));
    }

    #[test]
    fn test_bearing_of_coincident_points_is_zero() {
        assert_eq!(bearing(50.1, -1.3, 50.1, -1.3), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        assert!(approx(bearing(50.0, -1.0, 51.0, -1.0), 0.0, 1e-6));
        assert!(approx(bearing(51.0, -1.0, 50.0, -1.0), 180.0, 1e-6));
        assert!(approx(bearing(50.0, -1.0, 50.0, -0.5), 90.0, 0.5));
        assert!(approx(bearing(50.0, -0.5, 50.0, -1.0), 270.0, 0.5));
    }

    #[test]
    fn test_reciprocal_bearings_differ_by_half_a_turn() {
        let fwd = bearing(50.1, -1.3, 50.4, -1.6);
        let back = bearing(50.4, -1.6, 50.1, -1.3);
        let diff = (fwd - back + 360.0) % 360.0;
        assert!(approx(diff, 180.0, 1.0), "diff = {diff}");
    }

    #[test]
    fn test_pcs_rates() {
        // Due north at 10 knots: a sixth of a degree of latitude per hour.
        let p = Pcs::new(50.0, -1.0, 0.0, 10.0);
        assert!(approx(p.ns(), 1.0 / 6.0, 1e-9));
        assert!(approx(p.es(), 0.0, 1e-12));

        // Due east: longitude rate widened by the latitude.
        let p = Pcs::new(60.0, -1.0, 90.0, 10.0);
        assert!(approx(p.ns(), 0.0, 1e-12));
        assert!(approx(p.es(), 10.0 / 60.0 / 60.0_f64.to_radians().cos(), 1e-9));
    }

    #[test]
    fn test_pcs_rates_default_to_zero_when_inputs_absent() {
        let p = Pcs::from_parts(Some(50.0), Some(-1.0), None, Some(10.0));
        assert_eq!(p.ns(), 0.0);
        assert_eq!(p.es(), 0.0);
    }

    #[test]
    fn test_pcs_at_linear_motion() {
        let p = Pcs::new(50.0, -1.0, 0.0, 10.0);
        let (lon, lat) = p.at(0.3).unwrap();
        assert!(approx(lon, -1.0, 1e-12));
        assert!(approx(lat, 50.05, 1e-9));
        assert_eq!(Pcs::from_parts(None, Some(-1.0), None, None).at(1.0), None);
    }

    #[test]
    fn test_tcpa_head_on_meeting() {
        // Northbound at 10 kn, target six nautical miles ahead running
        // reciprocal: closing at 20 kn, closest in eighteen minutes.
        let us = Pcs::new(50.0, -1.0, 0.0, 10.0);
        let them = Pcs::new(50.1, -1.0, 180.0, 10.0);
        let t = tcpa(&us, &them).unwrap();
        assert!(approx(t, 0.3, 1e-9));
        assert!(cpa(&us, &them, None).unwrap() < 1e-9);
    }

    #[test]
    fn test_tcpa_of_identical_tracks_is_zero() {
        let p = Pcs::new(50.0, -1.0, 45.0, 12.0);
        assert_eq!(tcpa(&p, &p.clone()), Some(0.0));
    }

    #[test]
    fn test_tcpa_negative_when_diverging() {
        let us = Pcs::new(50.0, -1.0, 0.0, 10.0);
        let them = Pcs::new(49.9, -1.0, 180.0, 10.0);
        assert!(tcpa(&us, &them).unwrap() < 0.0);
    }

    #[test]
    fn test_tcpa_absent_without_own_course() {
        let us = Pcs::from_parts(Some(50.0), Some(-1.0), None, Some(10.0));
        let them = Pcs::new(50.1, -1.0, 180.0, 10.0);
        assert_eq!(tcpa(&us, &them), None);
        assert_eq!(distance(&us, &them, Some(0.5)), None);
        assert_eq!(cpa(&us, &them, None), None);
    }

    #[test]
    fn test_tcpa_absent_without_positions() {
        let us = Pcs::new(50.0, -1.0, 0.0, 10.0);
        let them = Pcs::from_parts(None, None, Some(180.0), Some(10.0));
        assert_eq!(tcpa(&us, &them), None);
    }

    #[test]
    fn test_distance_at_time_zero_matches_raw_separation() {
        let us = Pcs::new(50.0, -1.0, 0.0, 0.0);
        let them = Pcs::new(50.1, -1.0, 0.0, 0.0);
        let d = distance(&us, &them, Some(0.0)).unwrap();
        assert!(approx(d, 6.0, 1e-9));
    }

    #[test]
    fn test_dms_formatting() {
        assert_eq!(dms(3006.0, "N", "S", 5460.0, 1), "50\u{b0}6.0N");
        assert_eq!(dms(-96.0, "N", "S", 5460.0, 1), "1\u{b0}36.0S");
        assert_eq!(dms(709.9786, "E", "W", 10860.0, 1), "11\u{b0}50.0E");
        assert_eq!(dms(709.9786, "E", "W", 10860.0, 4), "11\u{b0}49.9786E");
        assert_eq!(dms(5460.0, "N", "S", 5460.0, 1), "n/a");
        assert_eq!(dms(10860.0, "E", "W", 10860.0, 1), "n/a");
    }

    #[test]
    fn test_dms_degree_part_is_floor_of_minutes() {
        for v in [0.0, 59.9, 60.0, 61.5, 3599.9, 3600.0] {
            let s = dms(v, "N", "S", f64::NAN, 1);
            let degrees: f64 = s.split('\u{b0}').next().unwrap().parse().unwrap();
            assert_eq!(degrees, (v / 60.0).floor());
        }
    }
}
