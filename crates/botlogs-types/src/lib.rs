//! Shared types for botlogs
//!
//! This crate contains the log data model served by the bot admin API and the
//! filter/pagination state used across the other botlogs crates.

use chrono::{DateTime, NaiveDate, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Fixed page size requested from `/api/logs`
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Sources emitted by the bot backend. Other values are still accepted.
pub const KNOWN_SOURCES: [&str; 5] = ["SYSTEM", "WHATSAPP", "API", "WEB", "DATABASE"];

// ============================================================================
// Log Types
// ============================================================================

/// Log severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    /// Anything the backend sent that is not one of the levels above
    Unknown,
}

impl LogLevel {
    /// Every selectable level, in severity order
    pub const ALL: [LogLevel; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Fatal,
    ];

    /// Parse a level name (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Self::Debug,
            "INFO" => Self::Info,
            "WARNING" | "WARN" => Self::Warning,
            "ERROR" => Self::Error,
            "FATAL" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    /// Wire name, also used as the badge text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Visual severity of this level
    pub fn severity(&self) -> Severity {
        Severity::of(*self)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Level of a received entry, keeping the text exactly as the backend sent it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryLevel {
    kind: LogLevel,
    raw: String,
}

impl EntryLevel {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            kind: LogLevel::parse(&raw),
            raw,
        }
    }

    pub fn kind(&self) -> LogLevel {
        self.kind
    }

    /// Badge text; unrecognised levels are shown as received
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl From<LogLevel> for EntryLevel {
    fn from(level: LogLevel) -> Self {
        Self {
            kind: level,
            raw: level.as_str().to_string(),
        }
    }
}

impl PartialEq<LogLevel> for EntryLevel {
    fn eq(&self, other: &LogLevel) -> bool {
        self.kind == *other
    }
}

impl std::fmt::Display for EntryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for EntryLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EntryLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Style tag a level is rendered with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
    Neutral,
}

impl Severity {
    /// The single level → style lookup table
    pub fn of(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Info,
            LogLevel::Info => Self::Success,
            LogLevel::Warning => Self::Warning,
            LogLevel::Error | LogLevel::Fatal => Self::Danger,
            LogLevel::Unknown => Self::Neutral,
        }
    }

    /// Badge class suffix used by the HTML renderer (`badge-<class>`)
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Neutral => "secondary",
        }
    }

    /// Terminal color for this severity
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Danger => Color::Red,
            Self::Neutral => Color::Gray,
        }
    }
}

/// A single log entry as served by `/api/logs`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,

    pub timestamp: DateTime<Utc>,

    pub level: EntryLevel,

    pub source: String,

    pub message: String,

    /// Structured payload attached by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl LogEntry {
    /// Whether the entry carries a non-empty `data` object
    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// `data` pretty-printed with two-space indentation
    pub fn pretty_data(&self) -> Option<String> {
        let data = self.data.as_ref().filter(|d| !d.is_empty())?;
        serde_json::to_string_pretty(data).ok()
    }
}

// ============================================================================
// Wire envelopes
// ============================================================================

/// Response body of `GET /api/logs`
///
/// `logs` is kept as raw JSON so a single malformed entry can be skipped
/// without rejecting the whole page.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub logs: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_logs: u64,

    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of mutating endpoints such as `POST /api/logs/clear`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// One decoded page of results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogPage {
    pub logs: Vec<LogEntry>,
    pub total_pages: u32,
    pub total_logs: u64,
    /// Entries dropped because they did not decode
    pub skipped: usize,
}

impl LogPage {
    /// Decode each raw entry independently, dropping the ones that fail
    pub fn from_raw(raw: Vec<serde_json::Value>, total_pages: u32, total_logs: u64) -> Self {
        let mut logs = Vec::with_capacity(raw.len());
        let mut skipped = 0;

        for value in raw {
            match serde_json::from_value::<LogEntry>(value) {
                Ok(entry) => logs.push(entry),
                Err(_) => skipped += 1,
            }
        }

        Self {
            logs,
            total_pages,
            total_logs,
            skipped,
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Current filter selection. `None`/empty fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub level: Option<LogLevel>,
    pub source: Option<String>,
    pub search: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterState {
    /// Apply a single field update
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Level(level) => self.level = level,
            FilterUpdate::Source(source) => self.source = source,
            FilterUpdate::Search(search) => self.search = search,
            FilterUpdate::DateFrom(date) => self.date_from = date,
            FilterUpdate::DateTo(date) => self.date_to = date,
        }
    }

    /// Query parameters for every field that differs from its default
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(level) = self.level {
            pairs.push(("level", level.as_str().to_string()));
        }
        if let Some(source) = &self.source {
            pairs.push(("source", source.clone()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    /// Check if no filter is active
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Short human summary, e.g. `level=ERROR source=API`
    pub fn summary(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return "all".to_string();
        }
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A `(key, value)` change to one filter field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterUpdate {
    Level(Option<LogLevel>),
    Source(Option<String>),
    Search(String),
    DateFrom(Option<NaiveDate>),
    DateTo(Option<NaiveDate>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("unknown filter key: {0}")]
    UnknownKey(String),

    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl FilterUpdate {
    /// Parse the string-keyed form. `"all"` and `""` select the default.
    pub fn parse(key: &str, value: &str) -> Result<Self, FilterParseError> {
        let value = value.trim();
        let is_default = value.is_empty() || value.eq_ignore_ascii_case("all");

        match key {
            "level" => {
                if is_default {
                    return Ok(Self::Level(None));
                }
                match LogLevel::parse(value) {
                    LogLevel::Unknown => Err(FilterParseError::UnknownLevel(value.to_string())),
                    level => Ok(Self::Level(Some(level))),
                }
            }
            "source" => Ok(Self::Source((!is_default).then(|| value.to_string()))),
            "search" => Ok(Self::Search(value.to_string())),
            "from" | "dateFrom" => parse_date(value).map(Self::DateFrom),
            "to" | "dateTo" => parse_date(value).map(Self::DateTo),
            other => Err(FilterParseError::UnknownKey(other.to_string())),
        }
    }

    /// Whether this update targets the search field
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, FilterParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FilterParseError::InvalidDate(value.to_string()))
}

/// Cycle the level filter: all → DEBUG → ... → FATAL → all
pub fn next_level(current: Option<LogLevel>) -> Option<LogLevel> {
    match current {
        None => Some(LogLevel::ALL[0]),
        Some(level) => {
            let idx = LogLevel::ALL.iter().position(|l| *l == level)?;
            LogLevel::ALL.get(idx + 1).copied()
        }
    }
}

/// Cycle the source filter through [`KNOWN_SOURCES`], returning to all
pub fn next_source(current: Option<&str>) -> Option<String> {
    match current {
        None => Some(KNOWN_SOURCES[0].to_string()),
        Some(source) => {
            let idx = KNOWN_SOURCES.iter().position(|s| *s == source)?;
            KNOWN_SOURCES.get(idx + 1).map(|s| s.to_string())
        }
    }
}

// ============================================================================
// Pagination & export
// ============================================================================

/// Pagination counters from the last successful fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_logs: u64,
    pub limit: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_logs: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    /// Page reached by moving `delta` pages, if it lies in `[1, total_pages]`
    pub fn target(&self, delta: i64) -> Option<u32> {
        let target = i64::from(self.current_page) + delta;
        if target < 1 || target > i64::from(self.total_pages) {
            return None;
        }
        u32::try_from(target).ok()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Download format offered by `/api/logs/export`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// File extension for downloaded exports
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
