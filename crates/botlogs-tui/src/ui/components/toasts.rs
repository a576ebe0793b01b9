use ratatui::{
    Frame,
    widgets::{Block, Borders, Clear, Paragraph},
};

use botlogs_view::render::sanitize_terminal;
use botlogs_view::{NotificationKind, Notifications};

use crate::ui::{Layout, Theme};

const TOAST_WIDTH: u16 = 56;

/// Stacked notifications, newest at the top
pub struct Toasts;

impl Toasts {
    pub fn render(frame: &mut Frame, notifications: &Notifications) {
        let area = frame.area();

        for (index, note) in notifications.iter().rev().enumerate() {
            let Some(rect) = Layout::toast(area, index as u16, TOAST_WIDTH) else {
                break;
            };
            let title = match note.kind {
                NotificationKind::Success => " ✓ ",
                NotificationKind::Error => " ✗ ",
            };

            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(sanitize_terminal(&note.message).into_owned())
                    .style(Theme::notification(note.kind))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Theme::notification(note.kind))
                            .title(title),
                    ),
                rect,
            );
        }
    }
}
