use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::message::GpsEvent;

/// How often the fix age is re-evaluated and the screen redrawn.
const TICK_PERIOD: Duration = Duration::from_millis(250);

/// Unified application event.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Gps(GpsEvent),
    /// Periodic clock for fix-age bookkeeping.
    Tick(Instant),
    Resize(u16, u16),
}

/// Waits on the terminal, the GPS task and the tick clock at once.
pub struct EventHandler {
    terminal: EventStream,
    gps_rx: mpsc::UnboundedReceiver<GpsEvent>,
    gps_open: bool,
    tick: Interval,
}

impl EventHandler {
    pub fn new(gps_rx: mpsc::UnboundedReceiver<GpsEvent>) -> Self {
        let mut tick = tokio::time::interval(TICK_PERIOD);
        // A slow redraw should not be followed by a burst of catch-up ticks.
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            terminal: EventStream::new(),
            gps_rx,
            gps_open: true,
            tick,
        }
    }

    /// Wait for the next event. `None` once the terminal stops delivering input.
    pub async fn next(&mut self) -> Option<AppEvent> {
        loop {
            tokio::select! {
                event = self.gps_rx.recv(), if self.gps_open => match event {
                    Some(event) => return Some(AppEvent::Gps(event)),
                    // GPS task finished; keep serving keys and ticks.
                    None => self.gps_open = false,
                },
                event = self.terminal.next() => match event {
                    Some(Ok(Event::Key(key))) => return Some(AppEvent::Key(key)),
                    Some(Ok(Event::Resize(w, h))) => return Some(AppEvent::Resize(w, h)),
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => return None,
                },
                instant = self.tick.tick() => return Some(AppEvent::Tick(instant.into_std())),
            }
        }
    }
}
