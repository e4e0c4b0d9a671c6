//! WGS-84 geodetic, Earth-Centered Earth-Fixed and East-North-Up conversions.
//!
//! Follows "Conversion of Geodetic coordinates to the Local Tangent Plane"
//! (Farrell & Barth), in single precision throughout. A point and the ENU
//! origin go through the same [`geodetic_to_ecef`], so a point taken
//! relative to itself is exactly zero.

/// WGS-84 Earth semimajor axis (m).
pub const SEMIMAJOR_AXIS: f32 = 6_378_137.0;
/// Derived Earth semiminor axis (m).
pub const SEMIMINOR_AXIS: f32 = 6_356_752.314245;
/// Ellipsoid flattening.
pub const FLATTENING: f32 = (SEMIMAJOR_AXIS - SEMIMINOR_AXIS) / SEMIMAJOR_AXIS;
/// Square of the first eccentricity.
pub const ECCENTRICITY_SQ: f32 = FLATTENING * (2.0 - FLATTENING);

/// Degrees to radians, with pi rounded once from its full expansion.
const DEG_TO_RAD: f32 = (std::f64::consts::PI / 180.0) as f32;

/// Earth-Centered Earth-Fixed coordinates in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ecef {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// East-North-Up coordinates in meters, relative to a local tangent plane origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Enu {
    pub east: f32,
    pub north: f32,
    pub up: f32,
}

impl Ecef {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Enu {
    pub fn new(east: f32, north: f32, up: f32) -> Self {
        Self { east, north, up }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.east, self.north, self.up]
    }

    /// Distance from the local origin.
    pub fn norm(self) -> f32 {
        distance_3d([0.0; 3], self.to_array())
    }
}

/// Convert a WGS-84 geodetic point (degrees, degrees, meters) to ECEF.
pub fn geodetic_to_ecef(lat: f32, lon: f32, h: f32) -> Ecef {
    let (sin_lambda, cos_lambda) = (lat * DEG_TO_RAD).sin_cos();
    let (sin_phi, cos_phi) = (lon * DEG_TO_RAD).sin_cos();
    // Prime vertical radius of curvature.
    let n = SEMIMAJOR_AXIS / (1.0 - ECCENTRICITY_SQ * sin_lambda * sin_lambda).sqrt();

    Ecef::new(
        (h + n) * cos_lambda * cos_phi,
        (h + n) * cos_lambda * sin_phi,
        (h + (1.0 - ECCENTRICITY_SQ) * n) * sin_lambda,
    )
}

/// Convert ECEF coordinates to East-North-Up in the local tangent plane
/// centered at the geodetic point (`lat0`, `lon0`, `h0`).
pub fn ecef_to_enu(ecef: Ecef, lat0: f32, lon0: f32, h0: f32) -> Enu {
    let origin = geodetic_to_ecef(lat0, lon0, h0);
    let xd = ecef.x - origin.x;
    let yd = ecef.y - origin.y;
    let zd = ecef.z - origin.z;

    let (sin_lambda, cos_lambda) = (lat0 * DEG_TO_RAD).sin_cos();
    let (sin_phi, cos_phi) = (lon0 * DEG_TO_RAD).sin_cos();

    Enu::new(
        -sin_phi * xd + cos_phi * yd,
        -cos_phi * sin_lambda * xd - sin_lambda * sin_phi * yd + cos_lambda * zd,
        cos_lambda * cos_phi * xd + cos_lambda * sin_phi * yd + sin_lambda * zd,
    )
}

/// Convert a geodetic point to East-North-Up relative to (`lat0`, `lon0`, `h0`).
pub fn geodetic_to_enu(lat: f32, lon: f32, h: f32, lat0: f32, lon0: f32, h0: f32) -> Enu {
    ecef_to_enu(geodetic_to_ecef(lat, lon, h), lat0, lon0, h0)
}

/// Euclidean distance between two 3D points in meters.
///
/// Uses `hypot` so a tiny nonzero offset never squares away to zero.
pub fn distance_3d(p0: [f32; 3], p1: [f32; 3]) -> f32 {
    (p1[0] - p0[0]).hypot(p1[1] - p0[1]).hypot(p1[2] - p0[2])
}
