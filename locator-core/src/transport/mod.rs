use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use log::info;

#[cfg(feature = "serial")]
pub mod serial;

/// A byte-oriented source of NMEA traffic.
///
/// Implementors are synchronous and blocking.
pub trait NmeaSource: Send {
    /// Read bytes into the buffer. Returns the number of bytes read.
    /// `Ok(0)` means the source is exhausted; a read with nothing available
    /// should return `Err(TimedOut)` rather than block forever.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Set the read timeout for subsequent `read()` calls.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

/// Replays recorded NMEA traffic one line at a time.
///
/// Lines missing the `\r` before `\n` get one, so captures saved with Unix
/// line endings still frame.
pub struct ReplaySource<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
    interval: Option<Duration>,
    started: bool,
}

impl<R: BufRead + Send> ReplaySource<R> {
    /// Replay `reader`, pausing `interval` between lines when given.
    pub fn new(reader: R, interval: Option<Duration>) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
            interval,
            started: false,
        }
    }

    fn next_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        self.pos = 0;
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        match self.line.as_slice() {
            [.., b'\r', b'\n'] => {}
            [.., b'\n'] => {
                let at = self.line.len() - 1;
                self.line.insert(at, b'\r');
            }
            _ => self.line.extend_from_slice(b"\r\n"),
        }
        if self.started
            && let Some(interval) = self.interval
        {
            std::thread::sleep(interval);
        }
        self.started = true;
        Ok(true)
    }
}

impl<R: BufRead + Send> NmeaSource for ReplaySource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.line.len() {
            if !self.next_line()? {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.line.len() - self.pos);
        buf[..n].copy_from_slice(&self.line[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn set_read_timeout(&mut self, _timeout: Duration) -> io::Result<()> {
        Ok(())
    }
}

/// Open a capture file for replay.
pub fn open_replay(path: &Path, interval: Option<Duration>) -> crate::Result<ReplaySource<BufReader<File>>> {
    let file = File::open(path)?;
    info!("replaying {}", path.display());
    Ok(ReplaySource::new(BufReader::new(file), interval))
}
