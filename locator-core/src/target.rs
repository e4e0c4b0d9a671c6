use std::fmt;
use std::str::FromStr;

use crate::error::{LocatorError, Result};
use crate::geodesy::{self, Enu};
use crate::position::Position;

/// Default target latitude (decimal degrees).
pub const DEFAULT_LATITUDE: f32 = 39.473_132_5;
/// Default target longitude (decimal degrees).
pub const DEFAULT_LONGITUDE: f32 = -0.367_732_4;
/// Default range around the target, in meters.
pub const DEFAULT_RANGE: f32 = 100.0;

/// The fixed point the user is heading for, plus how close counts as "reached".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Latitude in decimal degrees.
    pub latitude: f32,
    /// Longitude in decimal degrees.
    pub longitude: f32,
    /// Altitude in meters.
    pub altitude: f32,
    /// Range in meters; a fix at exactly this distance is in range.
    pub range: f32,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            altitude: 0.0,
            range: DEFAULT_RANGE,
        }
    }
}

impl Target {
    /// Create a target, rejecting coordinates off the globe and negative or
    /// non-finite ranges.
    pub fn new(latitude: f32, longitude: f32, altitude: f32, range: f32) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocatorError::InvalidTarget(format!("latitude {latitude} out of range")));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocatorError::InvalidTarget(format!("longitude {longitude} out of range")));
        }
        if !altitude.is_finite() {
            return Err(LocatorError::InvalidTarget(format!("altitude {altitude} is not finite")));
        }
        if !range.is_finite() || range < 0.0 {
            return Err(LocatorError::InvalidTarget(format!("range {range} must be a non-negative number")));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude,
            range,
        })
    }

    /// The same point with a different range.
    pub fn with_range(self, range: f32) -> Result<Self> {
        Self::new(self.latitude, self.longitude, self.altitude, range)
    }

    /// East-North-Up offset of `position` from the target.
    pub fn enu_of(&self, position: &Position) -> Enu {
        geodesy::geodetic_to_enu(
            position.latitude,
            position.longitude,
            position.altitude,
            self.latitude,
            self.longitude,
            self.altitude,
        )
    }

    /// Returns `true` if `distance` (m) is within range, boundary included.
    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.range
    }
}

/// Parses `LAT,LON[,ALT[,RANGE]]` in decimal degrees and meters. Omitted
/// fields take the defaults (altitude 0, range 100 m).
impl FromStr for Target {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f32>()
                    .map_err(|_| LocatorError::InvalidTarget(format!("{part:?} is not a number")))
            })
            .collect::<Result<Vec<_>>>()?;

        match values[..] {
            [lat, lon] => Self::new(lat, lon, 0.0, DEFAULT_RANGE),
            [lat, lon, alt] => Self::new(lat, lon, alt, DEFAULT_RANGE),
            [lat, lon, alt, range] => Self::new(lat, lon, alt, range),
            _ => Err(LocatorError::InvalidTarget(format!(
                "expected LAT,LON[,ALT[,RANGE]], got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.7},{:.7} {:.1} m (range {} m)",
            self.latitude, self.longitude, self.altitude, self.range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::FixStatus;

    #[test]
    fn test_default_target() {
        let target = Target::default();
        assert_eq!(target.latitude, 39.473_132_5);
        assert_eq!(target.longitude, -0.367_732_4);
        assert_eq!(target.range, 100.0);
    }

    #[test]
    fn test_parse() {
        let t: Target = "39.4731325,-0.3677324".parse().unwrap();
        assert_eq!(t, Target::default());

        let t: Target = " 10.5, -20.25 , 15 ".parse().unwrap();
        assert_eq!((t.latitude, t.longitude, t.altitude, t.range), (10.5, -20.25, 15.0, 100.0));

        let t: Target = "10.5,-20.25,15,42.5".parse().unwrap();
        assert_eq!(t.range, 42.5);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "10", "a,b", "10,20,30,40,50", "91,0", "0,181", "0,0,0,-1", "0,0,NaN"] {
            assert!(
                matches!(bad.parse::<Target>(), Err(LocatorError::InvalidTarget(_))),
                "{bad:?} parsed"
            );
        }
    }

    #[test]
    fn test_with_range() {
        let t = Target::default().with_range(5.0).unwrap();
        assert_eq!(t.range, 5.0);
        assert!(Target::default().with_range(f32::INFINITY).is_err());
    }

    #[test]
    fn test_in_range_inclusive() {
        let t = Target::default();
        assert!(t.in_range(0.0));
        assert!(t.in_range(100.0));
        assert!(!t.in_range(100.01));
    }

    #[test]
    fn test_enu_of_target_itself() {
        let t = Target::new(39.4731325, -0.3677324, 15.0, 100.0).unwrap();
        let p = Position::new(t.latitude, t.longitude, t.altitude, FixStatus::Fix3D);
        assert_eq!(t.enu_of(&p).norm(), 0.0);
    }
}
