use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use botlogs_view::LogView;
use botlogs_view::render::sanitize_terminal;

use crate::app::InputMode;
use crate::ui::Theme;

/// Current filters, or the input line while a field is edited
pub struct FilterBar<'a> {
    view: &'a LogView,
    input: Option<&'a InputMode>,
}

impl<'a> FilterBar<'a> {
    pub fn new(view: &'a LogView, input: Option<&'a InputMode>) -> Self {
        Self { view, input }
    }

    fn filter_line(&self) -> Line<'a> {
        let filters = self.view.filters();
        let level = filters.level.map_or("ALL", |l| l.as_str());
        let source = filters.source.as_deref().unwrap_or("ALL");
        let from = filters.date_from.map(|d| d.to_string());
        let to = filters.date_to.map(|d| d.to_string());

        let mut spans = Vec::new();
        let mut field = |label: &'static str, value: String, style: Style| {
            if !spans.is_empty() {
                spans.push(Span::styled("  │  ", Theme::text_dim()));
            }
            spans.push(Span::styled(format!("{label}: "), Theme::text_dim()));
            spans.push(Span::styled(value, style));
        };

        let level_style = match filters.level {
            Some(l) => Theme::level(l),
            None => Theme::text(),
        };
        field("Level", level.to_string(), level_style);
        field("Source", sanitize_terminal(source).into_owned(), Theme::text());

        match self.view.pending_search() {
            Some(pending) => field(
                "Search",
                format!("{} …", sanitize_terminal(pending)),
                Theme::text_dim(),
            ),
            None if filters.search.is_empty() => field("Search", "-".to_string(), Theme::text_dim()),
            None => field(
                "Search",
                sanitize_terminal(&filters.search).into_owned(),
                Theme::text_highlight(),
            ),
        }
        field("From", from.unwrap_or_else(|| "-".to_string()), Theme::text());
        field("To", to.unwrap_or_else(|| "-".to_string()), Theme::text());

        Line::from(spans)
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (line, border) = match self.input {
            Some(input) => (
                Line::from(vec![
                    Span::styled(format!("{}: ", input.field.label()), Theme::text_highlight()),
                    Span::styled(sanitize_terminal(&input.buffer).into_owned(), Theme::text()),
                    Span::styled("▏", Theme::text_highlight()),
                ]),
                Theme::border_focused(),
            ),
            None => (self.filter_line(), Theme::border()),
        };

        let mut title = " Filters ".to_string();
        if self.view.is_refreshing() {
            title = " Filters · refreshing ".to_string();
        } else if self.view.is_loading() {
            title = " Filters · loading ".to_string();
        }

        Paragraph::new(line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Span::styled(title, Theme::title())),
            )
            .render(area, buf);
    }
}
