use log::trace;

/// Default sentence buffer capacity, sized to the longest sentence the
/// receiver emits.
pub const DEFAULT_CAPACITY: usize = 255;
/// NMEA sentence start byte.
pub const START: u8 = b'$';
/// Separator between sentence data and the checksum digits.
pub const CHECKSUM_DELIMITER: u8 = b'*';
/// Sentence terminator (the `\n` that usually follows is ignored).
pub const TERMINATOR: u8 = b'\r';
/// NMEA field separator.
pub const FIELD_SEPARATOR: u8 = b',';

/// Framing state of a [`SentenceParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Discarding bytes until a `$` arrives.
    #[default]
    AwaitingStart,
    /// Buffering a sentence until `\r`.
    AccumulatingBody,
}

/// Why a framed sentence was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer than 3 bytes between `$` and `\r` (inclusive of `$`).
    TooShort,
    /// The third-from-last byte is not `*`.
    MissingDelimiter,
    /// The checksum field is not two uppercase hex digits.
    BadChecksumDigits,
    /// The transmitted and computed checksums differ.
    ChecksumMismatch { expected: u8, computed: u8 },
}

/// Running counters. Purely informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Sentences that reached a terminator.
    pub sentences: u64,
    /// Sentences dropped for a bad checksum.
    pub checksum_errors: u64,
    /// Sentences dropped for malformed framing.
    pub framing_errors: u64,
    /// Sentences abandoned because the buffer filled up.
    pub overflows: u64,
}

/// A checksum-validated sentence: the bytes from `$` up to (not including) `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    data: &'a [u8],
}

impl<'a> Sentence<'a> {
    /// Returns the sentence bytes from `$` up to (not including) `*`.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Returns `true` if the sentence starts with the given `$`-prefixed identifier.
    pub fn is(&self, identifier: &[u8]) -> bool {
        self.data.starts_with(identifier)
    }

    /// The data fields following the identifier, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = &'a [u8]> {
        self.data.split(|&b| b == FIELD_SEPARATOR).skip(1)
    }
}

/// XOR of every byte in `data`.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, &b| acc ^ b)
}

/// Checksum digits are uppercase hex on the wire.
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Validate a buffered sentence (`$...*HH`, without the terminator).
///
/// The checksum is the XOR of every byte strictly between `$` and `*`.
pub fn validate(sentence: &[u8]) -> Result<Sentence<'_>, Rejection> {
    let len = sentence.len();
    if len < 3 {
        return Err(Rejection::TooShort);
    }
    if sentence[len - 3] != CHECKSUM_DELIMITER {
        return Err(Rejection::MissingDelimiter);
    }

    let expected = match (hex_value(sentence[len - 2]), hex_value(sentence[len - 1])) {
        (Some(hi), Some(lo)) => hi << 4 | lo,
        _ => return Err(Rejection::BadChecksumDigits),
    };

    let data = &sentence[..len - 3];
    let computed = checksum(data.get(1..).unwrap_or_default());
    if computed != expected {
        return Err(Rejection::ChecksumMismatch { expected, computed });
    }

    Ok(Sentence { data })
}

/// Byte-at-a-time NMEA sentence framer.
///
/// The buffer is allocated once with a fixed capacity and never grows; a
/// sentence that does not terminate before the buffer is full is dropped.
#[derive(Debug, Clone)]
pub struct SentenceParser {
    state: ParserState,
    buf: Vec<u8>,
    capacity: usize,
    stats: ParserStats,
}

impl Default for SentenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceParser {
    /// Create a parser with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a parser whose buffer holds at most `capacity` bytes (minimum 1,
    /// for the `$`).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: ParserState::AwaitingStart,
            buf: Vec::with_capacity(capacity),
            capacity,
            stats: ParserStats::default(),
        }
    }

    /// Feed one byte. Returns the sentence when `byte` terminates a sentence
    /// whose checksum is valid.
    pub fn push(&mut self, byte: u8) -> Option<Sentence<'_>> {
        match self.state {
            ParserState::AwaitingStart => {
                if byte == START {
                    self.buf.clear();
                    self.buf.push(START);
                    self.state = ParserState::AccumulatingBody;
                }
                None
            }
            ParserState::AccumulatingBody => {
                if self.buf.len() >= self.capacity {
                    trace!("sentence exceeds {} bytes, dropped", self.capacity);
                    self.stats.overflows += 1;
                    self.state = ParserState::AwaitingStart;
                    None
                } else if byte == TERMINATOR {
                    self.state = ParserState::AwaitingStart;
                    self.stats.sentences += 1;
                    match validate(&self.buf) {
                        Ok(sentence) => Some(sentence),
                        Err(rejection) => {
                            trace!("rejected {:?}: {:?}", String::from_utf8_lossy(&self.buf), rejection);
                            match rejection {
                                Rejection::ChecksumMismatch { .. } => self.stats.checksum_errors += 1,
                                _ => self.stats.framing_errors += 1,
                            }
                            None
                        }
                    }
                } else {
                    self.buf.push(byte);
                    None
                }
            }
        }
    }

    /// Drop any partial sentence and wait for the next `$`.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = ParserState::AwaitingStart;
    }

    /// Current framing state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Write position in the sentence buffer.
    pub fn cursor(&self) -> usize {
        self.buf.len()
    }

    /// Largest sentence, in bytes, that fits the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counters accumulated since creation; [`reset`](Self::reset) keeps them.
    pub fn stats(&self) -> ParserStats {
        self.stats
    }
}
