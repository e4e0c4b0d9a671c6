use std::fmt;

use crate::gga::{EastWest, GgaRecord, NorthSouth};

/// Highest satellite count still reported as a 2D fix.
pub const MAX_2D_SATELLITES: u32 = 4;

/// Validity tier of a resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixStatus {
    /// No usable position; latitude/longitude/altitude must not be trusted.
    #[default]
    Invalid,
    /// Position from few satellites (≤ 4), degraded accuracy.
    Fix2D,
    Fix3D,
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "NO FIX"),
            Self::Fix2D => write!(f, "2D"),
            Self::Fix3D => write!(f, "3D"),
        }
    }
}

/// Geodetic position resolved from a GPS fix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees (negative = South).
    pub latitude: f32,
    /// Longitude in decimal degrees (negative = West).
    pub longitude: f32,
    /// Altitude above mean sea level in meters.
    pub altitude: f32,
    pub status: FixStatus,
}

/// Convert a `ddmm.mmmm` value to decimal degrees.
fn ddmm_to_degrees(value: f32) -> f32 {
    let degrees = (value / 100.0).trunc();
    degrees + (value - degrees * 100.0) / 60.0
}

impl Position {
    pub fn new(latitude: f32, longitude: f32, altitude: f32, status: FixStatus) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            status,
        }
    }

    /// Resolve a raw GGA record into decimal degrees and a validity tier.
    ///
    /// A coordinate whose hemisphere is missing, or any coordinate when the
    /// receiver has no fix, is reported as zero.
    pub fn from_gga(gga: &GgaRecord) -> Self {
        let latitude = match gga.ns_indicator {
            Some(ns) if gga.has_fix() => {
                let degrees = ddmm_to_degrees(gga.latitude);
                if ns == NorthSouth::South { -degrees } else { degrees }
            }
            _ => 0.0,
        };

        let longitude = match gga.ew_indicator {
            Some(ew) if gga.has_fix() => {
                let degrees = ddmm_to_degrees(gga.longitude);
                if ew == EastWest::West { -degrees } else { degrees }
            }
            _ => 0.0,
        };

        let altitude = if gga.has_fix() { gga.altitude } else { 0.0 };

        let status = if !gga.has_fix() || gga.ns_indicator.is_none() || gga.ew_indicator.is_none() {
            FixStatus::Invalid
        } else if gga.satellites <= MAX_2D_SATELLITES {
            FixStatus::Fix2D
        } else {
            FixStatus::Fix3D
        };

        Self {
            latitude,
            longitude,
            altitude,
            status,
        }
    }

    /// Returns `true` unless the status is [`FixStatus::Invalid`].
    pub fn is_valid(&self) -> bool {
        self.status != FixStatus::Invalid
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.7}°{} {:.7}°{} {:.1} m [{}]",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew,
            self.altitude,
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fix_quality: u32, satellites: u32) -> GgaRecord {
        GgaRecord {
            latitude: 3928.3886,
            ns_indicator: Some(NorthSouth::North),
            longitude: 22.064,
            ew_indicator: Some(EastWest::West),
            fix_quality,
            satellites,
            hdop: 1.0,
            altitude: 13.0,
            ..GgaRecord::default()
        }
    }

    #[test]
    fn test_ddmm_conversion() {
        assert!((ddmm_to_degrees(4807.038) - 48.1173).abs() < 1e-4);
        assert!((ddmm_to_degrees(1131.0) - 11.516_667).abs() < 1e-4);
        assert_eq!(ddmm_to_degrees(0.0), 0.0);
        assert!((ddmm_to_degrees(18000.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_signs_hemispheres() {
        let p = Position::from_gga(&record(1, 12));
        assert!((p.latitude - 39.473_143).abs() < 1e-4);
        assert!((p.longitude + 0.367_733).abs() < 1e-4);
        assert_eq!(p.altitude, 13.0);
        assert_eq!(p.status, FixStatus::Fix3D);

        let mut gga = record(1, 12);
        gga.ns_indicator = Some(NorthSouth::South);
        gga.ew_indicator = Some(EastWest::East);
        let p = Position::from_gga(&gga);
        assert!(p.latitude < 0.0);
        assert!(p.longitude > 0.0);
    }

    #[test]
    fn test_no_fix_is_invalid_and_zeroed() {
        for satellites in [0, 4, 12] {
            let p = Position::from_gga(&record(0, satellites));
            assert_eq!(p, Position::default());
            assert!(!p.is_valid());
        }
    }

    #[test]
    fn test_missing_hemisphere_is_invalid() {
        let mut gga = record(1, 12);
        gga.ns_indicator = None;
        let p = Position::from_gga(&gga);
        assert_eq!(p.status, FixStatus::Invalid);
        assert_eq!(p.latitude, 0.0);
        // The other coordinate and the altitude are still resolved.
        assert!((p.longitude + 0.367_733).abs() < 1e-4);
        assert_eq!(p.altitude, 13.0);

        let mut gga = record(2, 12);
        gga.ew_indicator = None;
        let p = Position::from_gga(&gga);
        assert_eq!(p.status, FixStatus::Invalid);
        assert_eq!(p.longitude, 0.0);
    }

    #[test]
    fn test_satellite_threshold() {
        assert_eq!(Position::from_gga(&record(1, 0)).status, FixStatus::Fix2D);
        assert_eq!(Position::from_gga(&record(1, 4)).status, FixStatus::Fix2D);
        assert_eq!(Position::from_gga(&record(1, 5)).status, FixStatus::Fix3D);
        assert_eq!(Position::from_gga(&record(2, 5)).status, FixStatus::Fix3D);
    }

    #[test]
    fn test_display() {
        let p = Position::new(39.5, -0.25, 8.0, FixStatus::Fix2D);
        assert_eq!(p.to_string(), "39.5000000°N 0.2500000°W 8.0 m [2D]");
    }
}
