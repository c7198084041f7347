use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use vectorweb_core::model::ConnectivityStatus;

/// Title line with the connectivity badge on the right.
pub struct Header {
    pub status: ConnectivityStatus,
}

/// Badge text and color for a connectivity status.
pub fn badge(status: ConnectivityStatus) -> (&'static str, Color) {
    match status {
        ConnectivityStatus::Unknown => ("○ Checking…", Color::DarkGray),
        ConnectivityStatus::Connected => ("● Connected", Color::Green),
        ConnectivityStatus::Disconnected => ("● Preview Mode", Color::Yellow),
    }
}

impl Widget for Header {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                " VectorWeb ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Search", Style::default().add_modifier(Modifier::BOLD)),
        ]);
        buf.set_line(area.x, area.y, &title, area.width);

        let (text, color) = badge(self.status);
        let badge = Line::from(Span::styled(
            format!(" {text} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        let width = badge.width() as u16;
        if width < area.width {
            buf.set_line(area.right() - width, area.y, &badge, width);
        }
    }
}
