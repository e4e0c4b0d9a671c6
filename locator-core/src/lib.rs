pub mod config;
pub mod error;
pub mod geodesy;
pub mod gga;
pub mod locator;
pub mod navigation;
pub mod nmea;
pub mod position;
pub mod status;
pub mod target;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use config::{LocatorConfig, SerialConfig};
pub use error::{LocatorError, Result};
pub use geodesy::{Ecef, Enu};
pub use gga::GgaRecord;
pub use locator::{Locator, Proximity};
pub use navigation::{Navigation, NavigationStats};
pub use nmea::{ParserStats, SentenceParser};
pub use position::{FixStatus, Position};
pub use status::{StatusBits, StatusSink};
pub use target::Target;
pub use transport::{NmeaSource, ReplaySource};
