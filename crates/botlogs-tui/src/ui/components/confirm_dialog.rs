use ratatui::{
    Frame,
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{Layout, Theme};

/// Yes/no dialog for destructive actions
pub struct ConfirmDialog;

impl ConfirmDialog {
    pub fn render(frame: &mut Frame, prompt: &str) {
        let area = Layout::popup(frame.area(), 50, 7);
        frame.render_widget(Clear, area);

        let text = vec![
            Line::from(Span::styled(prompt.to_string(), Theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Theme::text_highlight()),
                Span::styled(" Yes    ", Theme::text()),
                Span::styled("[n]", Theme::text_highlight()),
                Span::styled(" No", Theme::text()),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Theme::error())
                        .title(Span::styled(" Confirm ", Theme::error())),
                ),
            area,
        );
    }
}
