use locator_core::{GgaRecord, NavigationStats, Proximity, StatusBits};

/// Commands sent from the TUI to the GPS task.
#[derive(Debug)]
pub enum GpsCommand {
    /// Forget the current fix and any partial sentence.
    Reset,
    Quit,
}

/// Snapshot of the locator published to the TUI.
#[derive(Debug, Clone, Default)]
pub struct LocatorState {
    /// Result of the last resolved fix.
    pub proximity: Option<Proximity>,
    /// Raw record behind the last fix (time, HDOP, geoid).
    pub gga: GgaRecord,
    pub status: StatusBits,
    pub stats: NavigationStats,
    pub rx_bits_per_sec: u32,
}

/// Events sent from the GPS task to the TUI.
#[derive(Debug)]
pub enum GpsEvent {
    StateUpdate(LocatorState),
    Error(String),
    Info(String),
    Connected,
    Disconnected,
}
