use std::io::{self, Write};
use std::sync::mpsc as std_mpsc;
use std::time::Instant;

use log::{info, warn};
use tokio::sync::mpsc as tokio_mpsc;

use locator_core::{GgaRecord, Locator, LocatorConfig, NavigationStats, NmeaSource, Proximity, StatusBits};

use crate::message::{GpsCommand, GpsEvent, LocatorState};

/// Bits per byte on the wire with 8N1 framing (1 start + 8 data + 1 stop).
const BITS_PER_BYTE: u64 = 10;

/// Received-bytes counter turned into a bits-per-second figure once a second.
struct ByteRate {
    since: Instant,
    bytes: u64,
    bits_per_sec: u32,
}

impl ByteRate {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            bytes: 0,
            bits_per_sec: 0,
        }
    }

    /// Count `n` bytes. Returns `true` when the rate was recomputed.
    fn record(&mut self, n: usize) -> bool {
        self.bytes += n as u64;
        let elapsed = self.since.elapsed().as_secs_f64();
        if elapsed < 1.0 {
            return false;
        }
        self.bits_per_sec = (self.bytes as f64 * BITS_PER_BYTE as f64 / elapsed).round() as u32;
        self.bytes = 0;
        self.since = Instant::now();
        true
    }
}

fn snapshot(locator: &Locator, rate: &ByteRate) -> LocatorState {
    LocatorState {
        proximity: locator.last_proximity().copied(),
        gga: *locator.navigation().gga(),
        status: *locator.sink(),
        stats: locator.navigation().stats(),
        rx_bits_per_sec: rate.bits_per_sec,
    }
}

fn is_quiet(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Run the acquisition loop on a blocking thread.
///
/// Feeds every received byte through the locator and sends a state update
/// after each resolved fix and once a second. Executes commands received on
/// `cmd_rx` between reads.
pub fn gps_loop(
    mut source: Box<dyn NmeaSource>,
    config: LocatorConfig,
    cmd_rx: std_mpsc::Receiver<GpsCommand>,
    event_tx: tokio_mpsc::UnboundedSender<GpsEvent>,
) {
    let _ = event_tx.send(GpsEvent::Connected);

    let mut locator = Locator::new(&config, StatusBits::default());
    let mut rate = ByteRate::new();
    let mut buf = [0u8; 256];
    let mut exhausted = false;

    loop {
        let command = if exhausted {
            // Nothing left to read; just wait for the TUI.
            cmd_rx.recv().map_err(|_| std_mpsc::TryRecvError::Disconnected)
        } else {
            cmd_rx.try_recv()
        };

        match command {
            Ok(GpsCommand::Quit) => {
                if !exhausted {
                    let _ = event_tx.send(GpsEvent::Disconnected);
                }
                return;
            }
            Ok(GpsCommand::Reset) => {
                locator.reset();
                let _ = event_tx.send(GpsEvent::Info("navigation reset".to_string()));
                let _ = event_tx.send(GpsEvent::StateUpdate(snapshot(&locator, &rate)));
            }
            Err(std_mpsc::TryRecvError::Empty) => {}
            Err(std_mpsc::TryRecvError::Disconnected) => return,
        }

        if exhausted {
            continue;
        }

        let n = match source.read(&mut buf) {
            Ok(0) => {
                info!("NMEA source exhausted");
                let _ = event_tx.send(GpsEvent::Info("end of NMEA input".to_string()));
                let _ = event_tx.send(GpsEvent::Disconnected);
                exhausted = true;
                continue;
            }
            Ok(n) => n,
            Err(e) if is_quiet(&e) => 0,
            Err(e) => {
                warn!("read failed: {e}");
                let _ = event_tx.send(GpsEvent::Error(format!("read failed: {e}")));
                let _ = event_tx.send(GpsEvent::Disconnected);
                exhausted = true;
                continue;
            }
        };

        for &byte in &buf[..n] {
            if locator.step(byte).is_some()
                && event_tx.send(GpsEvent::StateUpdate(snapshot(&locator, &rate))).is_err()
            {
                return;
            }
        }

        if rate.record(n) && event_tx.send(GpsEvent::StateUpdate(snapshot(&locator, &rate))).is_err() {
            return;
        }
    }
}

/// One status line for a resolved fix.
pub fn fix_line(proximity: &Proximity, gga: &GgaRecord) -> String {
    let fix = u8::from(proximity.gps_fix());
    let target = u8::from(proximity.reached);
    match proximity.distance {
        Some(distance) => format!(
            "{} FIX={fix} TARGET={target} {} sats={} hdop={:.1} distance={distance:.1} m",
            gga.time, proximity.position, gga.satellites, gga.hdop
        ),
        None => format!("{} FIX={fix} TARGET={target} no fix", gga.time),
    }
}

/// Drive the locator from `source` until it is exhausted, writing one line
/// per resolved fix to `out`.
pub fn run_headless<S, W>(source: &mut S, config: &LocatorConfig, out: &mut W) -> locator_core::Result<NavigationStats>
where
    S: NmeaSource + ?Sized,
    W: Write,
{
    let mut locator = Locator::new(config, StatusBits::default());
    let mut buf = [0u8; 256];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if is_quiet(&e) => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            if let Some(proximity) = locator.step(byte) {
                writeln!(out, "{}", fix_line(&proximity, locator.navigation().gga()))?;
            }
        }
    }

    out.flush()?;
    Ok(locator.navigation().stats())
}
