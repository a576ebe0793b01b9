use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use botlogs_view::render::{EMPTY_PLACEHOLDER, format_timestamp, sanitize_terminal};

use crate::app::AppState;
use crate::ui::Theme;

const TIME_WIDTH: u16 = 19;
const LEVEL_WIDTH: u16 = 7;
const SOURCE_WIDTH: u16 = 10;

/// The paginated table of log entries
pub struct LogTableScreen;

impl LogTableScreen {
    pub fn render(frame: &mut Frame, area: Rect, app: &AppState) {
        let view = &app.view;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Logs ", Theme::title()));

        if view.logs().is_empty() {
            let text = if view.is_loading() {
                "Loading…"
            } else {
                EMPTY_PLACEHOLDER
            };
            frame.render_widget(
                Paragraph::new(text)
                    .style(Theme::text_dim())
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }

        // Borders, three column gaps and the highlight symbol
        let fixed = TIME_WIDTH + LEVEL_WIDTH + SOURCE_WIDTH + 2 + 3 + 2;
        let message_width = usize::from(area.width.saturating_sub(fixed));

        let rows = view.logs().iter().map(|entry| {
            Row::new(vec![
                Cell::from(format_timestamp(&entry.timestamp, false)).style(Theme::text_dim()),
                Cell::from(
                    truncate(&sanitize_terminal(entry.level.as_str()), usize::from(LEVEL_WIDTH))
                        .into_owned(),
                )
                .style(Theme::level(entry.level.kind())),
                Cell::from(
                    truncate(&sanitize_terminal(&entry.source), usize::from(SOURCE_WIDTH))
                        .into_owned(),
                ),
                Cell::from(truncate(&sanitize_terminal(&entry.message), message_width).into_owned()),
            ])
        });

        let header = Row::new(vec!["Time", "Level", "Source", "Message"]).style(Theme::table_header());
        let table = Table::new(
            rows,
            [
                Constraint::Length(TIME_WIDTH),
                Constraint::Length(LEVEL_WIDTH),
                Constraint::Length(SOURCE_WIDTH),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Theme::row_selected())
        .highlight_symbol("▌ ");

        let mut state = TableState::default().with_selected(Some(app.ui.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

/// Cut `text` to `max` display columns, ending with `…` when shortened
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    if text.width() <= max {
        return Cow::Borrowed(text);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("connection refused", 10), "connectio…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character takes two columns
        let cut = truncate("日本語のログ", 7);
        assert_eq!(cut, "日本語…");
        assert!(cut.width() <= 7);
    }
}
