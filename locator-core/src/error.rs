use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors raised at the I/O and configuration surface.
///
/// Sentence parsing never produces one of these: a rejected sentence is
/// simply "no fix this call".
#[derive(Debug, Error)]
pub enum LocatorError {
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPS receiver serial port not found")]
    PortNotFound,

    #[error("no NMEA traffic detected on {0}")]
    NoNmeaTraffic(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
