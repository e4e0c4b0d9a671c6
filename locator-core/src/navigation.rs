use log::{debug, trace};

use crate::gga::{GGA_ID, GgaRecord};
use crate::nmea::{ParserStats, SentenceParser};
use crate::position::Position;

/// Counters for everything the navigation has seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationStats {
    pub parser: ParserStats,
    /// Valid sentences with an identifier other than GGA.
    pub ignored: u64,
    /// GGA sentences resolved into a position.
    pub fixes: u64,
}

/// Turns a stream of NMEA bytes into resolved positions.
///
/// Owns the sentence framer, the last raw GGA record and the current
/// position. Each instance is independent.
#[derive(Debug, Clone)]
pub struct Navigation {
    parser: SentenceParser,
    gga: GgaRecord,
    position: Position,
    ignored: u64,
    fixes: u64,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self::with_parser(SentenceParser::new())
    }

    /// Create a navigation whose sentence buffer holds at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_parser(SentenceParser::with_capacity(capacity))
    }

    fn with_parser(parser: SentenceParser) -> Self {
        Self {
            parser,
            gga: GgaRecord::default(),
            position: Position::default(),
            ignored: 0,
            fixes: 0,
        }
    }

    /// Feed one byte from the receiver.
    ///
    /// Returns the new position when `byte` completes a checksum-valid GGA
    /// sentence. The position is returned (and stored) even when its status
    /// is [`FixStatus::Invalid`](crate::FixStatus::Invalid).
    pub fn add_nmea_byte(&mut self, byte: u8) -> Option<Position> {
        let sentence = self.parser.push(byte)?;

        if !sentence.is(GGA_ID) {
            trace!(
                "ignoring {}",
                String::from_utf8_lossy(sentence.as_bytes().get(..6).unwrap_or(sentence.as_bytes()))
            );
            self.ignored += 1;
            return None;
        }

        self.gga = GgaRecord::decode(&sentence);
        self.position = Position::from_gga(&self.gga);
        self.fixes += 1;
        debug!("GGA {} sats={} -> {}", self.gga.time, self.gga.satellites, self.position);
        Some(self.position)
    }

    /// Feed a slice of bytes, returning the last position produced, if any.
    pub fn add_nmea_bytes(&mut self, bytes: &[u8]) -> Option<Position> {
        bytes.iter().fold(None, |last, &b| self.add_nmea_byte(b).or(last))
    }

    /// Current position (the last one resolved, valid or not).
    pub fn position(&self) -> Position {
        self.position
    }

    /// The raw record behind the current position.
    pub fn gga(&self) -> &GgaRecord {
        &self.gga
    }

    pub fn parser(&self) -> &SentenceParser {
        &self.parser
    }

    pub fn stats(&self) -> NavigationStats {
        NavigationStats {
            parser: self.parser.stats(),
            ignored: self.ignored,
            fixes: self.fixes,
        }
    }

    /// Forget the last fix and any partial sentence.
    pub fn reset(&mut self) {
        self.parser.reset();
        self.gga = GgaRecord::default();
        self.position = Position::default();
    }
}
