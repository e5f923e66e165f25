//! Reusable TUI components

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A metric card widget showing a single value with a label
pub struct MetricCard<'a> {
    title: &'a str,
    value: String,
    color: Color,
}

impl<'a> MetricCard<'a> {
    pub fn new(title: &'a str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            color: Color::White,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let content = Line::from(Span::styled(
            self.value,
            Style::default().fg(self.color),
        ));

        let paragraph = Paragraph::new(content)
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

/// Status indicator (colored dot with label)
pub struct StatusIndicator<'a> {
    label: &'a str,
    status: Status,
}

pub enum Status {
    Ok,
    Busy,
    Error,
}

impl<'a> StatusIndicator<'a> {
    pub fn new(label: &'a str, status: Status) -> Self {
        Self { label, status }
    }

    pub fn to_span(&self) -> Span<'a> {
        let (symbol, color) = match self.status {
            Status::Ok => ("●", Color::Green),
            Status::Busy => ("◌", Color::Yellow),
            Status::Error => ("●", Color::Red),
        };

        Span::styled(
            format!("{} {}", symbol, self.label),
            Style::default().fg(color),
        )
    }
}
