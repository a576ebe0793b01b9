//! Log view model for botlogs
//!
//! This crate owns the filter/pagination state of the log console, issues
//! requests against a [`LogsApi`], discards superseded responses, and renders
//! pages as HTML.

mod busy;
mod debounce;
mod notify;
pub mod render;
mod view;

pub use busy::{BusyFlag, BusyGuard};
pub use debounce::Debouncer;
pub use notify::{Notification, NotificationKind, Notifications};
pub use view::{Confirmation, LogView, Pagination, ViewConfig, ViewError, ViewEvent};

// Re-export types used in our public API
pub use botlogs_api::{ApiError, LogQuery, LogsApi};
pub use botlogs_types::{ExportFormat, FilterState, FilterUpdate, LogEntry, LogLevel, PageState};
