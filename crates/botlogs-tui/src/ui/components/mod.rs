mod confirm_dialog;
mod detail_modal;
mod filter_bar;
mod help_overlay;
mod status_bar;
mod toasts;

pub use confirm_dialog::ConfirmDialog;
pub use detail_modal::DetailModal;
pub use filter_bar::FilterBar;
pub use help_overlay::HelpOverlay;
pub use status_bar::{StatusBar, table_hints};
pub use toasts::Toasts;
