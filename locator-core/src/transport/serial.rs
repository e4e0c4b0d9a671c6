use std::io;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serialport::SerialPortType;

use crate::config::SerialConfig;
use crate::error::{LocatorError, Result};
use crate::nmea::SentenceParser;

use super::NmeaSource;

/// USB product strings of common GPS receivers and their serial bridges.
const GPS_PRODUCTS: &[&str] = &["u-blox", "GPS", "GNSS", "MTK", "SiRF"];

const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const STOP_BITS: serialport::StopBits = serialport::StopBits::One;
const PARITY: serialport::Parity = serialport::Parity::None;

/// Baud rates to try during auto-detection (NMEA 0183 default first).
const BAUD_RATES: &[u32] = &[9600, 4800, 38400, 115200];

/// How long to listen at each rate before giving up on it.
const DETECT_WINDOW: Duration = Duration::from_millis(1000);

/// An NMEA source backed by a native serial port.
pub struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
    name: String,
    baud_rate: u32,
}

impl SerialSource {
    pub fn new(port: Box<dyn serialport::SerialPort>, name: String, baud_rate: u32) -> Self {
        Self { port, name, baud_rate }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl NmeaSource for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match io::Read::read(&mut self.port, buf) {
            // A serial line never ends; a zero-length read is just quiet.
            Ok(0) => Err(io::Error::from(io::ErrorKind::TimedOut)),
            other => other,
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(io::Error::other)
    }
}

/// Find the serial port of a GPS receiver.
///
/// Scans all available serial ports and picks the first USB port whose
/// product string names a known receiver.
pub fn find_gps_port() -> Result<String> {
    let ports = serialport::available_ports()?;

    for port in &ports {
        debug!("found port: {} ({:?})", port.port_name, port.port_type);
        if let SerialPortType::UsbPort(usb_info) = &port.port_type
            && let Some(product) = &usb_info.product
            && GPS_PRODUCTS.iter().any(|p| product.contains(p))
        {
            info!("found GPS receiver {product:?} on {}", port.port_name);
            return Ok(port.port_name.clone());
        }
    }

    if ports.is_empty() {
        warn!("no serial ports found");
    } else {
        warn!("no GPS receiver among {} port(s):", ports.len());
        for port in &ports {
            warn!("  {} ({:?})", port.port_name, port.port_type);
        }
    }

    Err(LocatorError::PortNotFound)
}

/// Open a serial port as 8N1 at the given baud rate.
pub fn open_port(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<SerialSource> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DATA_BITS)
        .stop_bits(STOP_BITS)
        .parity(PARITY)
        .timeout(timeout)
        .open()?;

    info!("opened {port_name} at {baud_rate} baud");
    Ok(SerialSource::new(port, port_name.to_string(), baud_rate))
}

/// Detect the baud rate by listening at each candidate rate until a
/// checksum-valid sentence is framed.
///
/// Returns the open source on success. Receivers talk without being asked,
/// so nothing is written to the port.
pub fn auto_detect_baud(port_name: &str, timeout: Duration) -> Result<SerialSource> {
    for &baud in BAUD_RATES {
        debug!("trying {baud} baud on {port_name}");

        let mut source = match open_port(port_name, baud, timeout.min(DETECT_WINDOW)) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to open at {baud} baud: {e}");
                continue;
            }
        };

        // Stale bytes may have been received at another rate.
        if let Err(e) = source.port.clear(serialport::ClearBuffer::Input) {
            debug!("could not clear input buffer at {baud} baud: {e}");
        }

        if listen_for_sentence(&mut source) {
            info!("auto-detected {baud} baud on {port_name}");
            source.set_read_timeout(timeout)?;
            return Ok(source);
        }

        debug!("no NMEA traffic at {baud} baud");
    }

    Err(LocatorError::NoNmeaTraffic(port_name.to_string()))
}

fn listen_for_sentence(source: &mut SerialSource) -> bool {
    let mut parser = SentenceParser::new();
    let mut buf = [0u8; 64];
    let deadline = Instant::now() + DETECT_WINDOW;

    while Instant::now() < deadline {
        match source.read(&mut buf) {
            Ok(n) => {
                if buf[..n].iter().any(|&b| parser.push(b).is_some()) {
                    return true;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => {
                warn!("read failed at {} baud: {e}", source.baud_rate);
                return false;
            }
        }
    }
    false
}

/// Open the receiver described by `config`, scanning for the port and
/// detecting the baud rate where they are not given.
pub fn connect(config: &SerialConfig) -> Result<SerialSource> {
    let port_name = match &config.port_name {
        Some(name) => name.clone(),
        None => find_gps_port()?,
    };

    match config.baud_rate {
        Some(baud) => open_port(&port_name, baud, config.timeout),
        None => auto_detect_baud(&port_name, config.timeout),
    }
}
