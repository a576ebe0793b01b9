//! HTTP client for botlogs
//!
//! This crate talks to the log endpoints of the bot admin API: paginated
//! listing, clearing, and export downloads.

mod client;
mod error;

pub use client::{ClientConfig, Download, HttpLogsClient, LogQuery, LogsApi};
pub use error::{ApiError, Result};

// Re-export types that are used in our public API
pub use botlogs_types::{ExportFormat, FilterState, LogEntry, LogPage};
pub use reqwest::Url;
