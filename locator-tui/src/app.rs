use std::sync::mpsc as std_mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use locator_core::Target;

use crate::message::{GpsCommand, GpsEvent, LocatorState};

/// Messages kept in the log pane.
const MAX_LOG_ENTRIES: usize = 100;

/// Receivers report once a second; this many seconds of silence is a lost feed.
pub const STALE_AFTER: Duration = Duration::from_secs(3);

/// Severity of a log pane message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// Application state.
pub struct App {
    pub state: LocatorState,
    pub target: Target,
    /// Port name or replay file being read.
    pub source_name: String,
    pub baud_rate: Option<u32>,
    pub connected: bool,
    pub should_quit: bool,
    pub message_log: Vec<(Instant, LogLevel, String)>,
    /// When the last GGA fix arrived.
    pub last_fix: Option<Instant>,
    /// Age of the last fix as of the latest tick.
    pub fix_age: Option<Duration>,
    /// No fix for longer than [`STALE_AFTER`].
    pub stale: bool,

    cmd_tx: std_mpsc::Sender<GpsCommand>,
}

impl App {
    pub fn new(cmd_tx: std_mpsc::Sender<GpsCommand>, target: Target, source_name: String, baud_rate: Option<u32>) -> Self {
        Self {
            state: LocatorState::default(),
            target,
            source_name,
            baud_rate,
            connected: false,
            should_quit: false,
            message_log: Vec::new(),
            last_fix: None,
            fix_age: None,
            stale: false,
            cmd_tx,
        }
    }

    /// Handle an event from the GPS task.
    pub fn handle_gps_event(&mut self, event: GpsEvent) {
        match event {
            GpsEvent::StateUpdate(state) => {
                let was_reached = self.state.status.target_reached;
                if state.status.target_reached && !was_reached {
                    self.log(LogLevel::Info, "target reached".to_string());
                }
                if state.stats.fixes != self.state.stats.fixes {
                    self.last_fix = Some(Instant::now());
                    self.fix_age = Some(Duration::ZERO);
                    self.stale = false;
                }
                self.state = state;
            }
            GpsEvent::Error(msg) => self.log(LogLevel::Error, msg),
            GpsEvent::Info(msg) => self.log(LogLevel::Info, msg),
            GpsEvent::Connected => {
                self.connected = true;
            }
            GpsEvent::Disconnected => {
                self.connected = false;
            }
        }
    }

    /// Advance the fix-age clock to `now`, flagging a feed gone quiet.
    pub fn on_tick(&mut self, now: Instant) {
        let Some(last_fix) = self.last_fix else {
            return;
        };
        let age = now.saturating_duration_since(last_fix);
        self.fix_age = Some(age);
        if age > STALE_AFTER && !self.stale {
            self.stale = true;
            self.log(LogLevel::Error, format!("no GGA fix for {}s", age.as_secs()));
        }
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.cmd_tx.send(GpsCommand::Reset).is_err() {
                    self.log(LogLevel::Error, "GPS task is gone".to_string());
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.message_log.clear(),
            _ => {}
        }
    }

    fn log(&mut self, level: LogLevel, msg: String) {
        self.message_log.push((Instant::now(), level, msg));
        if self.message_log.len() > MAX_LOG_ENTRIES {
            let excess = self.message_log.len() - MAX_LOG_ENTRIES;
            self.message_log.drain(..excess);
        }
    }

    fn quit(&mut self) {
        let _ = self.cmd_tx.send(GpsCommand::Quit);
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_core::{NavigationStats, StatusBits};

    fn app() -> (App, std_mpsc::Receiver<GpsCommand>) {
        let (tx, rx) = std_mpsc::channel();
        (App::new(tx, Target::default(), "/dev/ttyACM0".to_string(), Some(9600)), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let (mut app, rx) = app();
            app.handle_key(key(code));
            assert!(app.should_quit);
            assert!(matches!(rx.try_recv(), Ok(GpsCommand::Quit)));
        }

        let (mut app, _rx) = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reset_key_sends_command() {
        let (mut app, rx) = app();
        app.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(rx.try_recv(), Ok(GpsCommand::Reset)));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_reset_with_task_gone_logs_error() {
        let (mut app, rx) = app();
        drop(rx);
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.message_log.len(), 1);
        assert_eq!(app.message_log[0].1, LogLevel::Error);
    }

    #[test]
    fn test_clear_log() {
        let (mut app, _rx) = app();
        app.handle_gps_event(GpsEvent::Info("hello".to_string()));
        app.handle_gps_event(GpsEvent::Error("oops".to_string()));
        assert_eq!(app.message_log.len(), 2);
        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.message_log.is_empty());
    }

    #[test]
    fn test_log_is_bounded() {
        let (mut app, _rx) = app();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            app.handle_gps_event(GpsEvent::Info(format!("msg {i}")));
        }
        assert_eq!(app.message_log.len(), MAX_LOG_ENTRIES);
        assert_eq!(app.message_log[0].2, "msg 10");
    }

    #[test]
    fn test_connection_events() {
        let (mut app, _rx) = app();
        app.handle_gps_event(GpsEvent::Connected);
        assert!(app.connected);
        app.handle_gps_event(GpsEvent::Disconnected);
        assert!(!app.connected);
    }

    #[test]
    fn test_target_reached_logged_once() {
        let (mut app, _rx) = app();
        let reached = LocatorState {
            status: StatusBits { gps_fix: true, target_reached: true },
            ..LocatorState::default()
        };
        app.handle_gps_event(GpsEvent::StateUpdate(reached.clone()));
        app.handle_gps_event(GpsEvent::StateUpdate(reached));
        assert_eq!(app.message_log.len(), 1);
        assert_eq!(app.message_log[0].2, "target reached");
        assert!(app.state.status.target_reached);
    }

    fn fix_update(fixes: u64) -> GpsEvent {
        GpsEvent::StateUpdate(LocatorState {
            stats: NavigationStats {
                fixes,
                ..NavigationStats::default()
            },
            ..LocatorState::default()
        })
    }

    #[test]
    fn test_tick_before_any_fix_does_nothing() {
        let (mut app, _rx) = app();
        app.on_tick(Instant::now() + STALE_AFTER * 10);
        assert_eq!(app.fix_age, None);
        assert!(!app.stale);
        assert!(app.message_log.is_empty());
    }

    #[test]
    fn test_fix_age_tracks_ticks() {
        let (mut app, _rx) = app();
        app.handle_gps_event(fix_update(1));
        let last_fix = app.last_fix.unwrap();

        app.on_tick(last_fix + Duration::from_millis(750));
        assert_eq!(app.fix_age, Some(Duration::from_millis(750)));
        assert!(!app.stale);
    }

    #[test]
    fn test_quiet_feed_goes_stale_once() {
        let (mut app, _rx) = app();
        app.handle_gps_event(fix_update(1));
        let last_fix = app.last_fix.unwrap();

        app.on_tick(last_fix + STALE_AFTER + Duration::from_secs(1));
        app.on_tick(last_fix + STALE_AFTER + Duration::from_secs(2));
        assert!(app.stale);
        assert_eq!(app.message_log.len(), 1);
        assert_eq!(app.message_log[0].1, LogLevel::Error);

        // A rate-only update carries no new fix.
        app.handle_gps_event(fix_update(1));
        assert!(app.stale);

        app.handle_gps_event(fix_update(2));
        assert!(!app.stale);
        assert_eq!(app.fix_age, Some(Duration::ZERO));
    }
}
