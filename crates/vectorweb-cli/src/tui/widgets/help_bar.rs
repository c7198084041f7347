use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::InputMode;

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar {
    pub input_mode: InputMode,
    pub detail_open: bool,
    pub has_results: bool,
}

impl HelpBar {
    fn bindings(&self) -> &'static [(&'static str, &'static str)] {
        if self.detail_open {
            return &[
                ("j/k", "scroll"),
                ("c", "copy text"),
                ("Esc", "close"),
            ];
        }
        match self.input_mode {
            InputMode::Url | InputMode::Query if self.has_results => &[
                ("Enter", "search"),
                ("Tab", "switch field"),
                ("Ctrl+U", "clear"),
                ("↓/Esc", "results"),
            ],
            InputMode::Url | InputMode::Query => &[
                ("Enter", "search"),
                ("Tab", "switch field"),
                ("Ctrl+U", "clear"),
                ("Esc", "leave form"),
            ],
            InputMode::Browse => &[
                ("j/k", "navigate"),
                ("Enter", "read context"),
                ("/", "edit query"),
                ("u", "edit url"),
                ("r", "search again"),
                ("q", "quit"),
            ],
        }
    }
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let spans: Vec<Span> = self
            .bindings()
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, key_style),
                    Span::styled(format!(" {label}  "), style),
                ]
            })
            .collect();

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
