use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What the client does, shown before the first search.
const FEATURES: &[(&str, Color, &str)] = &[
    (
        "HTML Extraction",
        Color::Blue,
        "The service scrapes the page, dropping scripts, styles and navigation to keep the meaningful text.",
    ),
    (
        "Vector Embeddings",
        Color::Magenta,
        "Text is split into 500-token chunks and embedded as 384-dimensional vectors.",
    ),
    (
        "Vector Search",
        Color::Green,
        "Chunks are indexed and searched by nearest neighbour, so matches follow meaning rather than keywords.",
    ),
];

/// Idle body: hero text and the feature grid.
pub fn render(frame: &mut Frame, area: Rect) {
    let [hero, grid] = Layout::vertical([Constraint::Length(4), Constraint::Min(6)]).areas(area);

    let lines = vec![
        Line::from(Span::styled(
            "Semantic Search for the Web",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Don't just match keywords. Match ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "meaning",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
            Span::styled(
                ". Enter a URL and a question to find context-aware answers.",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::NONE)),
        hero,
    );

    let cards = Layout::horizontal([Constraint::Ratio(1, 3); 3])
        .spacing(1)
        .split(grid);
    for ((title, color, text), card) in FEATURES.iter().zip(cards.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            ));
        let body = Paragraph::new(*text)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, *card);
    }
}
