use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use locator_core::{FixStatus, Proximity, Target};

use crate::app::{App, LogLevel};
use crate::message::LocatorState;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let status = if app.connected {
        match app.baud_rate {
            Some(baud) => format!("{} @ {baud}", app.source_name),
            None => app.source_name.clone(),
        }
    } else {
        "Disconnected".to_string()
    };
    let block = Block::default()
        .title(" GPS Locator ")
        .title_bottom(format!(" {status} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.connected {
            Color::Green
        } else {
            Color::Red
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Layout: LEDs, position, time/quality, target, offset, counters, log, help bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // LEDs
            Constraint::Length(1), // position
            Constraint::Length(1), // UTC, sats, HDOP, fix age
            Constraint::Length(1), // target
            Constraint::Length(1), // ENU offset + distance
            Constraint::Length(1), // parser counters
            Constraint::Min(0),    // message log
            Constraint::Length(1), // help bar
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(render_leds(&app.state)), chunks[0]);
    frame.render_widget(Paragraph::new(render_position_row(app.state.proximity.as_ref())), chunks[1]);
    frame.render_widget(Paragraph::new(render_quality_row(app)), chunks[2]);
    frame.render_widget(Paragraph::new(render_target_row(&app.target)), chunks[3]);
    frame.render_widget(Paragraph::new(render_offset_row(app.state.proximity.as_ref())), chunks[4]);
    frame.render_widget(Paragraph::new(render_counters(&app.state)), chunks[5]);

    render_message_log(frame, app, chunks[6]);

    let help_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(chunks[7]);
    frame.render_widget(Paragraph::new(render_help()), help_chunks[0]);
    frame.render_widget(Paragraph::new(render_rate(&app.state)), help_chunks[1]);
}

fn led(label: &str, on: bool, color: Color) -> Vec<Span<'static>> {
    let (dot, style) = if on {
        ("\u{25CF}", Style::default().fg(color).add_modifier(Modifier::BOLD))
    } else {
        ("\u{25CB}", Style::default().fg(Color::DarkGray))
    };
    vec![
        Span::styled(format!(" {dot} "), style),
        Span::styled(label.to_string(), style),
    ]
}

fn render_leds(state: &LocatorState) -> Line<'static> {
    let mut spans = led("GPS FIX", state.status.gps_fix, Color::Green);
    spans.push(Span::raw("   "));
    spans.extend(led("TARGET", state.status.target_reached, Color::Yellow));
    Line::from(spans)
}

/// `dd°mm.mmm'N` style rendering of a signed coordinate.
fn degrees_minutes(value: f32, width: usize, positive: char, negative: char) -> String {
    let abs = value.abs();
    let degrees = abs.trunc();
    let minutes = (abs - degrees) * 60.0;
    let hemisphere = if value < 0.0 { negative } else { positive };
    format!("{:0width$}\u{00B0}{minutes:06.3}'{hemisphere}", degrees as u32)
}

fn render_position_row(proximity: Option<&Proximity>) -> Line<'static> {
    let position = match proximity {
        Some(p) if p.gps_fix() => p.position,
        _ => return Line::from(Span::styled(" Pos: No Fix", Style::default().fg(Color::Red))),
    };

    let tier_color = match position.status {
        FixStatus::Fix3D => Color::Green,
        FixStatus::Fix2D => Color::Yellow,
        FixStatus::Invalid => Color::Red,
    };

    Line::from(vec![
        Span::styled(" Pos: ", Style::default().fg(Color::White)),
        Span::styled(
            degrees_minutes(position.latitude, 2, 'N', 'S'),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            degrees_minutes(position.longitude, 3, 'E', 'W'),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("  Alt:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>8.1}m", position.altitude), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(format!("[{}]", position.status), Style::default().fg(tier_color)),
    ])
}

fn render_fix_age(app: &App) -> Span<'static> {
    match app.fix_age {
        None => Span::styled("--", Style::default().fg(Color::DarkGray)),
        Some(age) if app.stale => Span::styled(
            format!("{:.1}s STALE", age.as_secs_f32()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(age) => Span::raw(format!("{:.1}s", age.as_secs_f32())),
    }
}

fn render_quality_row(app: &App) -> Line<'static> {
    let gga = &app.state.gga;
    Line::from(vec![
        Span::styled(" UTC: ", Style::default().fg(Color::White)),
        Span::raw(gga.time.to_string()),
        Span::styled("  Sats:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>3}", gga.satellites), Style::default().fg(Color::Magenta)),
        Span::styled("  HDOP:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>5.1}", gga.hdop), Style::default().fg(Color::Magenta)),
        Span::styled("  Geoid:", Style::default().fg(Color::White)),
        Span::raw(format!("{:.1}m", gga.geoidal_separation)),
        Span::styled("  Age:", Style::default().fg(Color::White)),
        render_fix_age(app),
    ])
}

fn render_target_row(target: &Target) -> Line<'static> {
    Line::from(vec![
        Span::styled(" Tgt: ", Style::default().fg(Color::White)),
        Span::styled(degrees_minutes(target.latitude, 2, 'N', 'S'), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(
            degrees_minutes(target.longitude, 3, 'E', 'W'),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("  Alt:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>8.1}m", target.altitude), Style::default().fg(Color::Yellow)),
        Span::styled("  Range:", Style::default().fg(Color::White)),
        Span::raw(format!("{:.1}m", target.range)),
    ])
}

fn render_offset_row(proximity: Option<&Proximity>) -> Line<'static> {
    let Some((offset, distance, reached)) =
        proximity.and_then(|p| Some((p.offset?, p.distance?, p.reached)))
    else {
        return Line::from(Span::styled(" ENU: --", Style::default().fg(Color::DarkGray)));
    };

    let distance_color = if reached { Color::Green } else { Color::White };
    Line::from(vec![
        Span::styled(" ENU: ", Style::default().fg(Color::White)),
        Span::raw(format!(
            "E {:>+9.1}m  N {:>+9.1}m  U {:>+7.1}m",
            offset.east, offset.north, offset.up
        )),
        Span::styled("  Dist:", Style::default().fg(Color::White)),
        Span::styled(format!("{distance:>9.1}m"), Style::default().fg(distance_color)),
    ])
}

fn render_counters(state: &LocatorState) -> Line<'static> {
    let stats = &state.stats;
    Line::from(vec![
        Span::styled(" Sentences:", Style::default().fg(Color::White)),
        Span::raw(format!("{:>6}", stats.parser.sentences)),
        Span::styled("  Fixes:", Style::default().fg(Color::White)),
        Span::raw(format!("{:>6}", stats.fixes)),
        Span::styled("  Ignored:", Style::default().fg(Color::White)),
        Span::raw(format!("{:>6}", stats.ignored)),
        Span::styled("  Cksum:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>4}", stats.parser.checksum_errors), Style::default().fg(Color::Red)),
        Span::styled("  Framing:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>4}", stats.parser.framing_errors), Style::default().fg(Color::Red)),
        Span::styled("  Overflow:", Style::default().fg(Color::White)),
        Span::styled(format!("{:>4}", stats.parser.overflows), Style::default().fg(Color::Red)),
    ])
}

fn render_message_log(frame: &mut Frame, app: &App, area: Rect) {
    if app.message_log.is_empty() || area.height == 0 {
        return;
    }

    let visible = area.height as usize;
    let start = app.message_log.len().saturating_sub(visible);
    let lines: Vec<Line<'static>> = app.message_log[start..]
        .iter()
        .map(|(timestamp, level, msg)| {
            let elapsed = timestamp.elapsed().as_secs();
            let mins = elapsed / 60;
            let secs = elapsed % 60;
            let color = match level {
                LogLevel::Error => Color::Red,
                LogLevel::Info => Color::Blue,
            };
            Line::from(Span::styled(
                format!("  [{mins:>3}:{secs:02}] {msg}"),
                Style::default().fg(color),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help() -> Line<'static> {
    Line::from(Span::styled(
        "  [Q]uit  [R]eset navigation  [C]lear log",
        Style::default().fg(Color::Magenta),
    ))
}

fn render_rate(state: &LocatorState) -> Line<'static> {
    Line::from(Span::styled(
        format!("Rx: {:>5} bit/s", state.rx_bits_per_sec),
        Style::default().fg(Color::Green),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_minutes() {
        assert_eq!(degrees_minutes(39.5, 2, 'N', 'S'), "39\u{00B0}30.000'N");
        assert_eq!(degrees_minutes(-0.25, 3, 'E', 'W'), "000\u{00B0}15.000'W");
    }

    #[test]
    fn test_position_row_without_fix() {
        let line = render_position_row(None);
        assert_eq!(line.spans[0].content, " Pos: No Fix");
    }
}
