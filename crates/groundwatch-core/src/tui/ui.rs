//! UI rendering for the dashboard

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::models::{AlertView, Severity};

use super::app::App;
use super::components::{MetricCard, Status, StatusIndicator};
use super::view::SeverityFilter;

/// Main colors
const PRIMARY: Color = Color::Cyan;
const SUCCESS: Color = Color::Green;
const WARNING: Color = Color::Yellow;
const ERROR: Color = Color::Red;
const MUTED: Color = Color::DarkGray;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header + filter
            Constraint::Min(10),    // Main content
            Constraint::Length(1),  // Status bar
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(alert) = &app.inspected {
        draw_detail_overlay(frame, alert);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(40),
            Constraint::Length(24),
        ])
        .split(area);

    // Logo
    let logo = Paragraph::new("🛰 Groundwatch")
        .style(Style::default().fg(PRIMARY).bold())
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(logo, chunks[0]);

    // Severity filter bar
    let titles: Vec<Line> = SeverityFilter::ALL
        .iter()
        .map(|filter| {
            let style = if *filter == app.filter {
                Style::default().fg(PRIMARY).bold()
            } else {
                Style::default().fg(MUTED)
            };
            Line::from(format!(" {} ", filter.label())).style(style)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.filter.index())
        .highlight_style(Style::default().fg(PRIMARY))
        .block(Block::default().title("Severity").borders(Borders::NONE));
    frame.render_widget(tabs, chunks[1]);

    // Source status
    let status = if app.loading {
        StatusIndicator::new("Loading", Status::Busy)
    } else if app.error.is_some() {
        StatusIndicator::new("Load failed", Status::Error)
    } else {
        StatusIndicator::new("Connected", Status::Ok)
    };
    let status_widget = Paragraph::new(status.to_span())
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(status_widget, chunks[2]);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.loading {
        draw_loading(frame, app, area);
    } else if let Some(message) = &app.error {
        draw_error(frame, message, area);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(7)])
            .split(area);

        draw_summary_cards(frame, app, chunks[0]);
        draw_alerts_table(frame, app, chunks[1]);
    }
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Loading alerts")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED)),
        )
        .gauge_style(Style::default().fg(PRIMARY))
        .percent(u16::from(app.progress));

    frame.render_widget(gauge, chunks[1]);
}

fn draw_error(frame: &mut Frame, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(ERROR).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry",
            Style::default().fg(MUTED),
        )),
    ];

    let panel = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ERROR)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(panel, area);
}

fn draw_summary_cards(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(17),
            Constraint::Percentage(17),
            Constraint::Percentage(17),
            Constraint::Percentage(17),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
        ])
        .split(area);

    let unacked = app
        .current_alerts
        .iter()
        .filter(|a| !a.acknowledged)
        .count();

    MetricCard::new("Unacked", unacked.to_string())
        .color(if unacked > 0 { WARNING } else { SUCCESS })
        .render(frame, chunks[0]);

    for (i, severity) in Severity::ALL.iter().enumerate() {
        let count = app
            .current_alerts
            .iter()
            .filter(|a| a.error_severity == *severity)
            .count();
        MetricCard::new(severity.label(), count.to_string())
            .color(severity_color(*severity))
            .render(frame, chunks[i + 1]);
    }
}

fn draw_alerts_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(
            "Alerts ({} of {})",
            app.filtered.len(),
            app.current_alerts.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED));

    let header = Row::new(vec!["Time", "Severity", "Satellite", "Contact", "Category", "Message", "Ack"])
        .style(Style::default().fg(PRIMARY).bold())
        .height(1);

    let rows: Vec<Row> = app
        .filtered
        .iter()
        .map(|alert| {
            let severity_style = Style::default().fg(severity_color(alert.error_severity));
            let severity_style = if alert.error_severity == Severity::Critical {
                severity_style.add_modifier(Modifier::BOLD)
            } else {
                severity_style
            };

            let row_style = if alert.acknowledged {
                Style::default().fg(MUTED)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(alert.occurred_display()),
                Cell::from(alert.error_severity.label()).style(severity_style),
                Cell::from(truncate(&alert.contact_satellite, 12)),
                Cell::from(alert.contact_name.to_string()),
                Cell::from(truncate(&alert.error_category, 14)),
                Cell::from(truncate(&alert.error_message, 48)),
                Cell::from(if alert.acknowledged { "✓" } else { "" }),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Min(24),
            Constraint::Length(4),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(table, area, &mut app.table_state.clone());
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left_text = app
        .get_status()
        .unwrap_or("? Help | Tab Filter | Enter Detail | a Acknowledge | q Quit");
    let left = Paragraph::new(left_text).style(Style::default().fg(MUTED));
    frame.render_widget(left, chunks[0]);

    let right_text = format!(
        "Filter: {} | Refresh: {:?}",
        app.filter.label(),
        app.refresh_rate
    );
    let right = Paragraph::new(right_text)
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn draw_detail_overlay(frame: &mut Frame, alert: &AlertView) {
    let area = centered_rect(70, 60, frame.size());
    frame.render_widget(Clear, area);

    let ack_span = if alert.acknowledged {
        Span::styled("acknowledged", Style::default().fg(SUCCESS))
    } else {
        Span::styled("unacknowledged", Style::default().fg(WARNING))
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Severity:   ", Style::default().fg(MUTED)),
            Span::styled(
                alert.error_severity.label(),
                Style::default().fg(severity_color(alert.error_severity)).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Category:   ", Style::default().fg(MUTED)),
            Span::raw(alert.error_category.clone()),
        ]),
        Line::from(vec![
            Span::styled("Occurred:   ", Style::default().fg(MUTED)),
            Span::raw(alert.occurred_display()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Satellite:  ", Style::default().fg(MUTED)),
            Span::raw(alert.contact_satellite.clone()),
        ]),
        Line::from(vec![
            Span::styled("Contact:    ", Style::default().fg(MUTED)),
            Span::raw(alert.contact_name.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Window:     ", Style::default().fg(MUTED)),
            Span::raw(alert.window_display()),
        ]),
        Line::from(vec![
            Span::styled("Detail:     ", Style::default().fg(MUTED)),
            Span::raw(alert.contact_detail.clone()),
        ]),
        Line::from(""),
        Line::from(alert.error_message.clone()).style(Style::default().bold()),
        Line::from(alert.long_message.clone()),
        Line::from(""),
        Line::from(vec![Span::styled("Status:     ", Style::default().fg(MUTED)), ack_span]),
        Line::from(""),
        Line::from(Span::styled(
            "a Acknowledge | Esc Close",
            Style::default().fg(MUTED).italic(),
        )),
    ];

    let dialog = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!("Alert {}", alert.error_id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PRIMARY)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(dialog, area);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.size());
    frame.render_widget(Clear, area);

    let secondary = Style::default().fg(Color::Magenta);
    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().fg(PRIMARY).bold()),
        Line::from(""),
        Line::from("Navigation:").style(secondary),
        Line::from("  j/k or ↑/↓         Move through the alert list"),
        Line::from("  g/G                Jump to first/last alert"),
        Line::from("  Enter              Inspect the selected alert"),
        Line::from("  Esc                Close detail or help"),
        Line::from(""),
        Line::from("Filtering:").style(secondary),
        Line::from("  Tab / f            Next severity filter"),
        Line::from("  Shift+Tab / F      Previous severity filter"),
        Line::from(""),
        Line::from("Alerts:").style(secondary),
        Line::from("  a                  Acknowledge the selected alert"),
        Line::from("  r                  Reload from the data source"),
        Line::from(""),
        Line::from("General:").style(secondary),
        Line::from("  ?                  Toggle this help"),
        Line::from("  q / Ctrl+C         Quit"),
        Line::from(""),
        Line::from("Press Esc to close").style(Style::default().fg(MUTED).italic()),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PRIMARY)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, area);
}

// Helper functions

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => ERROR,
        Severity::Serious => Color::Magenta,
        Severity::Warning => WARNING,
        Severity::Caution => PRIMARY,
        Severity::Info => MUTED,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
