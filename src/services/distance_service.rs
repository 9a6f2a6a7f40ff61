//! Great-circle distances to the event venue and rough travel-time text.
//!
//! No routing service is involved: distance is plain haversine and the
//! travel estimate assumes 5 km/h on foot and 30 km/h through city traffic,
//! preferring the walking figure whenever it stays under half an hour.

use crate::data::VENUE_POSITION;

const EARTH_RADIUS_KM: f64 = 6371.0;
const WALK_SPEED_KMH: f64 = 5.0;
const DRIVE_SPEED_KMH: f64 = 30.0;
const WALK_CUTOFF_MINS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Walking,
    Driving,
}

#[derive(Debug, Clone)]
pub struct TravelEstimate {
    pub mode: TravelMode,
    pub minutes: u32,
    pub text: String,
}

pub struct DistanceService;

impl DistanceService {
    /// Haversine distance in kilometers between two (lat, lon) points.
    pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let d_lat = (to.0 - from.0).to_radians();
        let d_lon = (to.1 - from.1).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + from.0.to_radians().cos() * to.0.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }

    pub fn distance_to_venue(position: (f64, f64)) -> f64 {
        Self::distance_km(position, VENUE_POSITION)
    }

    pub fn walk_minutes(distance_km: f64) -> u32 {
        (distance_km / WALK_SPEED_KMH * 60.0).round() as u32
    }

    pub fn drive_minutes(distance_km: f64) -> u32 {
        ((distance_km / DRIVE_SPEED_KMH * 60.0).round() as u32).max(1)
    }

    /// Walking when under 30 minutes, driving otherwise.
    pub fn travel_estimate(distance_km: f64) -> TravelEstimate {
        let walk = Self::walk_minutes(distance_km);
        if walk < WALK_CUTOFF_MINS {
            return TravelEstimate {
                mode: TravelMode::Walking,
                minutes: walk,
                text: format!("{} min walk", walk),
            };
        }
        let drive = Self::drive_minutes(distance_km);
        TravelEstimate {
            mode: TravelMode::Driving,
            minutes: drive,
            text: format!("{} min drive", drive),
        }
    }

    /// Metres below one kilometer, otherwise one-decimal kilometers.
    pub fn format_distance(distance_km: f64) -> String {
        if distance_km < 1.0 {
            format!("{} m", (distance_km * 1000.0).round() as u32)
        } else {
            format!("{:.1} km", distance_km)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let d = DistanceService::distance_km(VENUE_POSITION, VENUE_POSITION);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn known_distance_is_plausible() {
        // Canary Wharf is roughly 3.5 km west of the venue.
        let d = DistanceService::distance_km((51.5049, -0.0195), VENUE_POSITION);
        assert!((3.0..4.0).contains(&d), "got {} km", d);
    }

    #[test]
    fn travel_text_switches_mode_at_half_an_hour() {
        // 2 km -> 24 min walk.
        let near = DistanceService::travel_estimate(2.0);
        assert_eq!(near.mode, TravelMode::Walking);
        assert_eq!(near.text, "24 min walk");

        // 4 km -> 48 min walk, so 8 min drive wins.
        let far = DistanceService::travel_estimate(4.0);
        assert_eq!(far.mode, TravelMode::Driving);
        assert_eq!(far.text, "8 min drive");
    }

    #[test]
    fn drive_minutes_never_zero() {
        assert_eq!(DistanceService::drive_minutes(0.01), 1);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(DistanceService::format_distance(0.85), "850 m");
        assert_eq!(DistanceService::format_distance(2.345), "2.3 km");
    }
}
