//! Sentence generators and a recording status sink for unit tests.

use crate::nmea::checksum;
use crate::status::StatusSink;

/// Wrap `body` as `$<body>*HH\r\n`.
pub fn frame(body: &str) -> String {
    format!("${body}*{:02X}\r\n", checksum(body.as_bytes()))
}

/// Inputs for a synthetic GGA sentence, coordinates in signed decimal degrees.
#[derive(Debug, Clone)]
pub struct GgaFix {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub centiseconds: u8,
    pub latitude: f64,
    pub longitude: f64,
    /// `None` leaves the hemisphere field blank.
    pub ns: Option<char>,
    pub ew: Option<char>,
    pub fix: u8,
    pub satellites: u32,
    pub hdop: f32,
    pub altitude: f32,
    pub geoidal: f32,
}

impl Default for GgaFix {
    fn default() -> Self {
        Self {
            hours: 1,
            minutes: 2,
            seconds: 3,
            centiseconds: 4,
            latitude: 39.47314319954006,
            longitude: -0.36773293176583255,
            ns: Some('N'),
            ew: Some('E'),
            fix: 1,
            satellites: 12,
            hdop: 1.0,
            altitude: 13.0,
            geoidal: 0.0,
        }
    }
}

/// Split signed degrees into `(whole degrees, minutes)` of the absolute value.
fn degrees_minutes(value: f64) -> (u32, f64) {
    let abs = value.abs();
    let degrees = abs.trunc();
    (degrees as u32, (abs - degrees) * 60.0)
}

/// The hemisphere letter for a signed coordinate: `positive` as given, flipped
/// to `negative` when the value is below zero.
fn hemisphere(letter: Option<char>, value: f64, positive: char, negative: char) -> String {
    match letter {
        None => String::new(),
        Some(l) if value < 0.0 => (if l == positive { negative } else { positive }).to_string(),
        Some(l) => l.to_string(),
    }
}

/// Encode a complete `$GPGGA` sentence terminated by `\r\n`.
pub fn gga_sentence(fix: &GgaFix) -> String {
    let (lat_deg, lat_min) = degrees_minutes(fix.latitude);
    let (lon_deg, lon_min) = degrees_minutes(fix.longitude);
    let body = format!(
        "GPGGA,{:02}{:02}{:02}.{:02},{:02}{:07.4},{},{:03}{:07.4},{},{},{:02},{:.1},{:.1},M,{:.1},M,,",
        fix.hours,
        fix.minutes,
        fix.seconds,
        fix.centiseconds,
        lat_deg,
        lat_min,
        hemisphere(fix.ns, fix.latitude, 'N', 'S'),
        lon_deg,
        lon_min,
        hemisphere(fix.ew, fix.longitude, 'E', 'W'),
        fix.fix,
        fix.satellites,
        fix.hdop,
        fix.altitude,
        fix.geoidal,
    );
    frame(&body)
}

/// A status sink that records the last value and counts every write.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub gps_fix: Option<bool>,
    pub target_reached: Option<bool>,
    pub gps_fix_updates: u32,
    pub target_reached_updates: u32,
}

impl StatusSink for RecordingSink {
    fn set_gps_fix(&mut self, active: bool) {
        self.gps_fix = Some(active);
        self.gps_fix_updates += 1;
    }

    fn set_target_reached(&mut self, reached: bool) {
        self.target_reached = Some(reached);
        self.target_reached_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gga_sentence_format() {
        let sentence = gga_sentence(&GgaFix::default());
        assert!(sentence.starts_with("$GPGGA,010203.04,3928.3886,N,00022.0640,W,1,12,1.0,13.0,M,0.0,M,,*"));
        assert!(sentence.ends_with("\r\n"));

        let blank = gga_sentence(&GgaFix { ns: None, ew: None, ..GgaFix::default() });
        assert!(blank.contains(",3928.3886,,00022.0640,,1,"));
    }
}
