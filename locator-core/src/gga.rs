use std::fmt;

use crate::nmea::Sentence;

/// Talker + sentence identifier of the GPS fix data sentence.
pub const GGA_ID: &[u8] = b"$GPGGA";

/// Latitude hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NorthSouth {
    North,
    South,
}

/// Longitude hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EastWest {
    East,
    West,
}

impl NorthSouth {
    fn from_field(field: &[u8]) -> Option<Self> {
        match field.first() {
            Some(b'N') => Some(Self::North),
            Some(b'S') => Some(Self::South),
            _ => None,
        }
    }
}

impl EastWest {
    fn from_field(field: &[u8]) -> Option<Self> {
        match field.first() {
            Some(b'E') => Some(Self::East),
            Some(b'W') => Some(Self::West),
            _ => None,
        }
    }
}

/// UTC time of a fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtcTime {
    /// 0–23.
    pub hours: u8,
    /// 0–59.
    pub minutes: u8,
    /// 0–59 (60 on a leap second).
    pub seconds: u8,
    /// 0–999.
    pub milliseconds: u16,
}

impl UtcTime {
    /// Decode `hhmmss.sss`.
    fn from_field(field: &[u8]) -> Self {
        let t = scan_f64(field).max(0.0);
        let whole = t as u32;
        Self {
            hours: (whole / 10_000).min(u8::MAX as u32) as u8,
            minutes: ((whole % 10_000) / 100) as u8,
            seconds: (whole % 100) as u8,
            milliseconds: ((t.fract() * 1000.0).round() as u16).min(999),
        }
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

/// Raw fields of a GGA sentence, before any unit conversion.
///
/// Wire format:
/// `$GPGGA,<time>,<lat>,<N|S>,<lon>,<E|W>,<fix>,<sats>,<hdop>,<alt>,M,<geoid>,M,,*<XX>`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GgaRecord {
    pub time: UtcTime,
    /// Latitude in `ddmm.mmmm` form.
    pub latitude: f32,
    pub ns_indicator: Option<NorthSouth>,
    /// Longitude in `dddmm.mmmm` form.
    pub longitude: f32,
    pub ew_indicator: Option<EastWest>,
    /// 0 = no fix, 1 = GPS fix, 2 = differential GPS fix.
    pub fix_quality: u32,
    pub satellites: u32,
    /// Horizontal dilution of precision.
    pub hdop: f32,
    /// Antenna altitude above mean sea level (m).
    pub altitude: f32,
    /// Geoidal separation (m).
    pub geoidal_separation: f32,
}

impl GgaRecord {
    /// Decode the fields of a validated GGA sentence.
    ///
    /// Every field starts from zero, so a field missing from this sentence
    /// never keeps a value from a previous one. A field that does not scan as
    /// a number decodes as zero.
    pub fn decode(sentence: &Sentence<'_>) -> Self {
        let mut gga = Self::default();

        for (pos, field) in sentence.fields().enumerate() {
            match pos {
                0 => gga.time = UtcTime::from_field(field),
                1 => gga.latitude = scan_f32(field),
                2 => gga.ns_indicator = NorthSouth::from_field(field),
                3 => gga.longitude = scan_f32(field),
                4 => gga.ew_indicator = EastWest::from_field(field),
                5 => gga.fix_quality = scan_u32(field),
                6 => gga.satellites = scan_u32(field),
                7 => gga.hdop = scan_f32(field),
                8 => gga.altitude = scan_f32(field),
                // 9: altitude units
                10 => gga.geoidal_separation = scan_f32(field),
                _ => {}
            }
        }

        gga
    }

    /// Returns `true` if the receiver reports any kind of fix.
    pub fn has_fix(&self) -> bool {
        self.fix_quality != 0
    }
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` run of `field`.
fn numeric_prefix_len(field: &[u8]) -> usize {
    let digits = |from: usize| field[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(field.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    end += digits(end);
    if field.get(end) == Some(&b'.') {
        end += 1;
        end += digits(end);
    }
    if matches!(field.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(field.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(exp);
        if n > 0 {
            end = exp + n;
        }
    }
    end
}

fn scan_f64(field: &[u8]) -> f64 {
    std::str::from_utf8(&field[..numeric_prefix_len(field)])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

fn scan_f32(field: &[u8]) -> f32 {
    std::str::from_utf8(&field[..numeric_prefix_len(field)])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Leading decimal digits of `field`, saturating. Signs and anything else
/// scan as zero.
fn scan_u32(field: &[u8]) -> u32 {
    field
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |acc, &b| acc.saturating_mul(10).saturating_add((b - b'0') as u32))
}
