mod app;
mod args;
mod event;
mod gps_task;
mod message;
mod ui;

use std::fs::File;
use std::io;
use std::panic;
use std::process;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc as tokio_mpsc;

use locator_core::transport::{self, serial};
use locator_core::{NmeaSource, Target};

use crate::app::App;
use crate::args::{Options, USAGE};
use crate::event::{AppEvent, EventHandler};
use crate::message::{GpsCommand, GpsEvent};

/// Pause between replayed lines in TUI mode, so a capture plays back at a
/// watchable pace.
const REPLAY_INTERVAL: Duration = Duration::from_millis(200);

/// Where the NMEA bytes come from, for the status line.
struct SourceInfo {
    name: String,
    baud_rate: Option<u32>,
}

fn init_logging(options: &Options) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &options.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !options.headless {
        // Anything on stderr would draw over the TUI.
        builder.filter_level(log::LevelFilter::Off);
    }
    builder.init();
    Ok(())
}

fn open_source(options: &Options) -> locator_core::Result<(Box<dyn NmeaSource>, SourceInfo)> {
    if let Some(path) = &options.replay {
        let interval = (!options.headless).then_some(REPLAY_INTERVAL);
        let source = transport::open_replay(path, interval)?;
        let info = SourceInfo {
            name: path.display().to_string(),
            baud_rate: None,
        };
        return Ok((Box::new(source), info));
    }

    let source = serial::connect(&options.serial)?;
    let info = SourceInfo {
        name: source.name().to_string(),
        baud_rate: Some(source.baud_rate()),
    };
    Ok((Box::new(source), info))
}

fn main() {
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = init_logging(&options) {
        eprintln!("cannot open log file: {e}");
        process::exit(1);
    }

    // Connect in plain sync context (before the tokio runtime starts).
    if !options.headless {
        println!("GPS Locator");
        println!("===========");
        println!("Target: {}", options.locator.target);
        println!("Connecting to receiver...");
    }

    let (mut source, info) = match open_source(&options) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Failed to open NMEA source: {e}");
            eprintln!();
            eprintln!("Troubleshooting:");
            eprintln!("  1. Connect the GPS receiver and wait for it to enumerate");
            eprintln!("  2. Make sure your user may open the port (e.g. the dialout group)");
            eprintln!("  3. Name the port and rate explicitly: --port /dev/ttyACM0 --baud 9600");
            eprintln!("  4. Or replay a capture: --replay FILE");
            process::exit(1);
        }
    };

    if options.headless {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match gps_task::run_headless(source.as_mut(), &options.locator, &mut out) {
            Ok(stats) => eprintln!(
                "{} fixes from {} sentences ({} checksum errors, {} framing errors, {} overflows)",
                stats.fixes,
                stats.parser.sentences,
                stats.parser.checksum_errors,
                stats.parser.framing_errors,
                stats.parser.overflows
            ),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        return;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {e}");
            process::exit(1);
        }
    };
    rt.block_on(async {
        // TUI -> GPS: std::sync::mpsc (the GPS thread is blocking).
        let (cmd_tx, cmd_rx) = std_mpsc::channel();
        // GPS -> TUI: tokio unbounded (async-compatible).
        let (gps_event_tx, gps_event_rx) = tokio_mpsc::unbounded_channel::<GpsEvent>();

        let config = options.locator.clone();
        tokio::task::spawn_blocking(move || {
            gps_task::gps_loop(source, config, cmd_rx, gps_event_tx);
        });

        if let Err(e) = run_tui(cmd_tx, gps_event_rx, options.locator.target, info).await {
            eprintln!("TUI error: {e}");
            process::exit(1);
        }
    });

    // The GPS thread may be parked in a blocking read; don't wait for it.
    rt.shutdown_timeout(Duration::from_millis(100));
}

async fn run_tui(
    cmd_tx: std_mpsc::Sender<GpsCommand>,
    gps_event_rx: tokio_mpsc::UnboundedReceiver<GpsEvent>,
    target: Target,
    info: SourceInfo,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal on panic.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    let mut app = App::new(cmd_tx, target, info.name, info.baud_rate);
    let mut events = EventHandler::new(gps_event_rx);

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        let Some(event) = events.next().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => {
                // crossterm 0.28 sends both Press and Release on some platforms.
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
            AppEvent::Gps(gps_event) => app.handle_gps_event(gps_event),
            AppEvent::Tick(now) => app.on_tick(now),
            // Redraw happens at the top of the loop.
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}
