use std::time::Duration;

use crate::nmea::DEFAULT_CAPACITY;
use crate::target::Target;

/// Configuration of the locator pipeline.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Where the user is heading and how close counts as reached.
    pub target: Target,
    /// Longest sentence accepted, in bytes, including `$` and `*HH`.
    pub buffer_capacity: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Configuration for the receiver's serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Port to open. `None` scans USB ports for a GPS receiver.
    pub port_name: Option<String>,
    /// Baud rate. `None` auto-detects.
    pub baud_rate: Option<u32>,
    /// Read timeout for a single `read()`.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: None,
            baud_rate: None,
            timeout: Duration::from_millis(500),
        }
    }
}
