use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use botlogs_types::LogEntry;
use botlogs_view::render::{format_timestamp, sanitize_terminal};

use crate::ui::{Layout, Theme};

/// Full view of one entry, including its data payload
pub struct DetailModal;

impl DetailModal {
    pub fn render(frame: &mut Frame, entry: &LogEntry) {
        let area = Layout::popup(frame.area(), 90, 30);
        frame.render_widget(Clear, area);

        frame.render_widget(
            Paragraph::new(Self::lines(entry))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Theme::border_focused())
                        .title(Span::styled(" Log Detail ", Theme::title()))
                        .title_bottom(Span::styled(" Esc to close ", Theme::text_dim())),
                ),
            area,
        );
    }

    fn lines(entry: &LogEntry) -> Vec<Line<'static>> {
        let field = |label: &str, value: Span<'static>| {
            Line::from(vec![
                Span::styled(format!("{:<10}", label), Theme::text_dim()),
                value,
            ])
        };

        let mut lines = vec![
            field(
                "Timestamp",
                Span::styled(format_timestamp(&entry.timestamp, true), Theme::text()),
            ),
            field(
                "Level",
                Span::styled(
                    sanitize_terminal(entry.level.as_str()).into_owned(),
                    Theme::level(entry.level.kind()),
                ),
            ),
            field(
                "Source",
                Span::styled(sanitize_terminal(&entry.source).into_owned(), Theme::text()),
            ),
            field(
                "Message",
                Span::styled(sanitize_terminal(&entry.message).into_owned(), Theme::text()),
            ),
            Line::from(""),
            Line::from(Span::styled("Additional Data", Theme::title())),
        ];

        match entry.pretty_data() {
            Some(json) => lines.extend(
                json.lines()
                    .map(|l| Line::from(Span::styled(sanitize_terminal(l).into_owned(), Theme::text()))),
            ),
            None => lines.push(Line::from(Span::styled("No additional data", Theme::text_dim()))),
        }
        lines
    }
}
