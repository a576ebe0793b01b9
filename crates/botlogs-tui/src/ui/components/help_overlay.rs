use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::popup(frame.area(), 52, 30);
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Navigation"),
            Self::key_line("j/↓", "Next row"),
            Self::key_line("k/↑", "Previous row"),
            Self::key_line("←/h", "Previous page"),
            Self::key_line("→/l", "Next page"),
            Self::key_line("Enter", "Show log detail"),
            Line::from(""),
            Self::section("Filters"),
            Self::key_line("/", "Search messages"),
            Self::key_line("v", "Cycle level"),
            Self::key_line("s", "Cycle source"),
            Self::key_line("[", "Date from"),
            Self::key_line("]", "Date to"),
            Self::key_line("n", "Reset filters"),
            Line::from(""),
            Self::section("Actions"),
            Self::key_line("r", "Refresh"),
            Self::key_line("C", "Clear all logs"),
            Self::key_line("e", "Export CSV"),
            Self::key_line("E", "Export JSON"),
            Self::key_line("H", "Save HTML snapshot"),
            Self::key_line("x", "Dismiss notifications"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Close overlay"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
