use std::path::PathBuf;

use locator_core::{LocatorConfig, LocatorError, Result, SerialConfig, Target};

pub const USAGE: &str = "\
Usage: gps-locator [OPTIONS]

Options:
  --port NAME               Serial port of the receiver (default: scan USB ports)
  --baud N                  Baud rate (default: auto-detect)
  --replay FILE             Read NMEA from a capture file instead of a port
  --target LAT,LON[,ALT]    Target in decimal degrees and meters
  --range METERS            Distance counted as reached (default: 100)
  --buffer BYTES            Longest sentence accepted (default: 255)
  --headless                Print one line per fix instead of the TUI
  --log FILE                Write log output to FILE
  --help                    Show this help";

/// Command-line options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub serial: SerialConfig,
    pub locator: LocatorConfig,
    pub replay: Option<PathBuf>,
    pub headless: bool,
    pub log_file: Option<PathBuf>,
    pub help: bool,
}

fn value(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String> {
    args.next()
        .ok_or_else(|| LocatorError::InvalidArgument(format!("{flag} needs a value")))
}

fn number<T: std::str::FromStr>(flag: &str, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| LocatorError::InvalidArgument(format!("{flag}: {text:?} is not a valid number")))
}

impl Options {
    /// Parse the arguments following the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut range = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" => options.serial.port_name = Some(value(&arg, &mut args)?),
                "--baud" => options.serial.baud_rate = Some(number(&arg, &value(&arg, &mut args)?)?),
                "--replay" => options.replay = Some(PathBuf::from(value(&arg, &mut args)?)),
                "--target" => options.locator.target = value(&arg, &mut args)?.parse::<Target>()?,
                "--range" => range = Some(number::<f32>(&arg, &value(&arg, &mut args)?)?),
                "--buffer" => {
                    let capacity: usize = number(&arg, &value(&arg, &mut args)?)?;
                    if capacity == 0 {
                        return Err(LocatorError::InvalidArgument("--buffer must be at least 1".to_string()));
                    }
                    options.locator.buffer_capacity = capacity;
                }
                "--headless" => options.headless = true,
                "--log" => options.log_file = Some(PathBuf::from(value(&arg, &mut args)?)),
                "-h" | "--help" => options.help = true,
                other => return Err(LocatorError::InvalidArgument(format!("unknown option {other:?}"))),
            }
        }

        // Applied last so it wins over a range given inside --target.
        if let Some(range) = range {
            options.locator.target = options.locator.target.with_range(range)?;
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.locator.target, Target::default());
        assert_eq!(options.locator.buffer_capacity, 255);
        assert_eq!(options.serial.port_name, None);
        assert_eq!(options.serial.baud_rate, None);
        assert!(!options.headless);
        assert!(!options.help);
    }

    #[test]
    fn test_all_options() {
        let options = parse(&[
            "--port", "/dev/ttyUSB0", "--baud", "4800", "--range", "25", "--target", "10.5,-20.25,15",
            "--buffer", "128", "--headless", "--log", "gps.log",
        ])
        .unwrap();
        assert_eq!(options.serial.port_name.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(options.serial.baud_rate, Some(4800));
        let target = options.locator.target;
        assert_eq!((target.latitude, target.longitude, target.altitude), (10.5, -20.25, 15.0));
        assert_eq!(target.range, 25.0);
        assert_eq!(options.locator.buffer_capacity, 128);
        assert!(options.headless);
        assert_eq!(options.log_file, Some(PathBuf::from("gps.log")));
    }

    #[test]
    fn test_replay() {
        let options = parse(&["--replay", "capture.nmea"]).unwrap();
        assert_eq!(options.replay, Some(PathBuf::from("capture.nmea")));
    }

    #[test]
    fn test_errors() {
        for bad in [
            &["--port"][..],
            &["--baud", "fast"],
            &["--range", "-1"],
            &["--target", "91,0"],
            &["--buffer", "0"],
            &["--verbose"],
        ] {
            assert!(parse(bad).is_err(), "{bad:?} parsed");
        }
    }
}
