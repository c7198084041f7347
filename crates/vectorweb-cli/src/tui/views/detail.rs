use std::time::Instant;

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use vectorweb_core::markup::RichText;
use vectorweb_core::model::ResultItem;

use crate::tui::app::App;

/// Modal over the results showing the focused item in full.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let presenter = app.session.presenter();
    let Some(item) = presenter.focused_item() else {
        return;
    };
    let copied = presenter.is_copied(&item.id, Instant::now());

    let [modal] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    let [modal] = Layout::vertical([Constraint::Percentage(75)])
        .flex(Flex::Center)
        .areas(modal);

    frame.render_widget(Clear, modal);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Result Details ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let [meta, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(meta_line(item)), meta);

    frame.render_widget(
        Paragraph::new(content_lines(&item.content))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0)),
        body,
    );

    let copy = if copied {
        Span::styled(
            " ✓ Copied! ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" c Copy Text ", Style::default().fg(Color::Cyan))
    };
    let footer_line = Line::from(vec![
        copy,
        Span::styled("  Esc Close ", Style::default().fg(Color::DarkGray)),
    ])
    .right_aligned();
    frame.render_widget(footer_line, footer);
}

fn meta_line(item: &ResultItem) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!(" Similarity: {:.3} ", item.score),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("ID: {}…", item.short_id(12)),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let (Some(start), Some(end)) = (item.start_index, item.end_index) {
        spans.push(Span::styled(
            format!(" │ chars {start}–{end}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Render content segments, emphasised runs highlighted.
fn content_lines(content: &RichText) -> Vec<Line<'_>> {
    let emphasis = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    content
        .lines()
        .into_iter()
        .map(|runs| {
            Line::from(
                runs.into_iter()
                    .map(|(text, emphasised)| {
                        if emphasised {
                            Span::styled(text, emphasis)
                        } else {
                            Span::raw(text)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_keep_emphasis_and_breaks() {
        let content = RichText::parse("<b>AI</b> history<br>next line");
        let lines = content_lines(&content);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "AI");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines[0].spans[1].content, " history");
        assert_eq!(lines[1].spans[0].content, "next line");
    }

    #[test]
    fn test_meta_line_includes_offsets_when_known() {
        let mut item = ResultItem {
            id: "abcdef0123456789".into(),
            score: 0.98,
            content: RichText::parse("x"),
            start_index: Some(0),
            end_index: Some(500),
        };
        let text: String = meta_line(&item)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("Similarity: 0.980"));
        assert!(text.contains("ID: abcdef012345…"));
        assert!(text.contains("chars 0–500"));

        item.end_index = None;
        let text: String = meta_line(&item)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(!text.contains("chars"));
    }
}
