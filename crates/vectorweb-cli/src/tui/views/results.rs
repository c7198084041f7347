use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use vectorweb_core::model::{ResultItem, ResultOrigin, ResultSet};

use crate::tui::app::{App, InputMode};

const PREVIEW_CHARS: usize = 160;

pub fn render_pending(frame: &mut Frame, area: Rect) {
    let loading = Line::from(vec![Span::styled(
        "  Vectorizing & Searching...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )]);
    frame.render_widget(loading, area);
}

pub fn render_failure(frame: &mut Frame, message: &str, area: Rect) {
    let banner = Paragraph::new(format!(" ✗ {message}"))
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Search failed "),
        );
    let height = area.height.min(4);
    frame.render_widget(banner, Rect { height, ..area });
}

pub fn render_table(frame: &mut Frame, app: &App, set: &ResultSet, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Score"),
        Cell::from("Source ID"),
        Cell::from("Content"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = if set.is_empty() {
        vec![Row::new(vec![Cell::from(Span::styled(
            "  No matches found. Press / to refine the query.",
            Style::default().fg(Color::DarkGray),
        ))])]
    } else {
        set.items
            .iter()
            .enumerate()
            .map(|(idx, item)| make_row(idx, item))
            .collect()
    };

    let widths = [
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let mut title = vec![
        Span::raw(" Search Results "),
        Span::styled(
            format!("{} Matches ", set.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if set.origin == ResultOrigin::Preview {
        title.push(Span::styled(
            " preview ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        title.push(Span::raw(" "));
    }

    let border_color = if app.input_mode == InputMode::Browse {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Line::from(title)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    if !set.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn make_row(idx: usize, item: &ResultItem) -> Row<'static> {
    let rank_cell = Cell::from(Span::styled(
        format!("#{}", idx + 1),
        Style::default().fg(Color::DarkGray),
    ));

    let score_color = if item.score >= 0.7 {
        Color::Green
    } else if item.score >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    };
    let score_cell = Cell::from(Span::styled(
        format!("{:.3}", item.score),
        Style::default().fg(score_color),
    ));

    let id_cell = Cell::from(Span::styled(
        format!("{}…", item.short_id(8)),
        Style::default().fg(Color::Cyan),
    ));

    let content_cell = Cell::from(item.content.preview(PREVIEW_CHARS));

    Row::new(vec![rank_cell, score_cell, id_cell, content_cell])
}
