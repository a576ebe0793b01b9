pub mod components;
mod layout;
pub mod screens;
mod theme;

pub use layout::Layout;
pub use theme::Theme;

use ratatui::Frame;

use crate::app::AppState;
use components::{ConfirmDialog, DetailModal, FilterBar, HelpOverlay, StatusBar, Toasts, table_hints};
use screens::LogTableScreen;

/// Draw the whole console, overlays last
pub fn draw(frame: &mut Frame, app: &AppState) {
    let (header, content, status) = Layout::main(frame.area());
    let view = &app.view;

    frame.render_widget(FilterBar::new(view, app.ui.input.as_ref()), header);
    LogTableScreen::render(frame, content, app);

    let page = view.page();
    let mut right = format!(
        "{} · page {} of {} · {} logs",
        view.server(),
        page.current_page,
        page.total_pages,
        page.total_logs
    );
    if view.is_exporting() {
        right.push_str(" · exporting");
    }
    frame.render_widget(StatusBar::new().hints(table_hints()).right(right), status);

    if let Some(entry) = view.detail() {
        DetailModal::render(frame, entry);
    }
    if app.ui.help_visible {
        HelpOverlay::render(frame);
    }
    if let Some(confirmation) = view.confirmation() {
        ConfirmDialog::render(frame, confirmation.prompt());
    }
    Toasts::render(frame, view.notifications());
}
