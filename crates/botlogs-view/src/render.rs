//! HTML rendering of a log page
//!
//! Every piece of server-supplied text goes through [`escape_html`] before it
//! is placed into markup.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::{DateTime, Local, TimeZone, Utc};

use botlogs_types::{FilterState, LogEntry, PageState};

/// Text of the single row shown for an empty page
pub const EMPTY_PLACEHOLDER: &str = "No logs found";

/// Column count of the log table
const COLUMNS: usize = 5;

/// Escape the five HTML-significant characters
pub fn escape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Replace control characters so terminal escape sequences stay inert
pub fn sanitize_terminal(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(char::is_control) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.chars()
            .map(|c| match c {
                '\n' | '\t' => ' ',
                c if c.is_control() => '\u{FFFD}',
                c => c,
            })
            .collect(),
    )
}

/// `YYYY-MM-DD HH:MM:SS` in `tz`, with `.mmm` appended when asked
pub fn format_timestamp_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz, with_millis: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local = ts.with_timezone(tz);
    if with_millis {
        local.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    } else {
        local.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Timestamp in the machine's local time zone
pub fn format_timestamp(ts: &DateTime<Utc>, with_millis: bool) -> String {
    format_timestamp_in(ts, &Local, with_millis)
}

fn badge(entry: &LogEntry) -> String {
    format!(
        r#"<span class="badge badge-{}">{}</span>"#,
        entry.level.severity().css_class(),
        escape_html(entry.level.as_str())
    )
}

/// `log-level-*` class suffix: lowercase, anything outside `[a-z0-9]` becomes `-`
fn level_class(entry: &LogEntry) -> String {
    entry
        .level
        .as_str()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() { c } else { '-' }
        })
        .collect()
}

/// `<tr>` rows for the table body; one placeholder row when empty
pub fn render_rows(logs: &[LogEntry]) -> String {
    if logs.is_empty() {
        return format!(
            r#"<tr class="empty-row"><td colspan="{COLUMNS}" class="text-center">{EMPTY_PLACEHOLDER}</td></tr>"#
        );
    }

    let mut out = String::new();
    for entry in logs {
        let id = escape_html(&entry.id);
        let _ = writeln!(
            out,
            concat!(
                r#"<tr class="log-entry log-level-{level}" data-id="{id}">"#,
                r#"<td class="log-time">{time}</td>"#,
                r#"<td class="log-level">{badge}</td>"#,
                r#"<td class="log-source">{source}</td>"#,
                r#"<td class="log-message">{message}</td>"#,
                r##"<td class="log-actions"><a class="log-detail-btn" href="#log-{id}">Detail</a></td>"##,
                "</tr>"
            ),
            level = level_class(entry),
            id = id,
            time = format_timestamp(&entry.timestamp, false),
            badge = badge(entry),
            source = escape_html(&entry.source),
            message = escape_html(&entry.message),
        );
    }
    out
}

/// Page counter with prev/next controls disabled at the ends
pub fn render_pagination(page: &PageState) -> String {
    let disabled = |off: bool| if off { " disabled" } else { "" };
    format!(
        concat!(
            r#"<nav class="pagination">"#,
            r#"<button class="prev-page"{prev}>&laquo;</button>"#,
            r#"<span class="page-info">Page <span id="current-page">{current}</span> of <span id="total-pages">{total}</span></span>"#,
            r#"<button class="next-page"{next}>&raquo;</button>"#,
            "</nav>"
        ),
        prev = disabled(!page.has_prev()),
        next = disabled(!page.has_next()),
        current = page.current_page,
        total = page.total_pages,
    )
}

/// Full detail block for one entry, timestamp with milliseconds
pub fn render_detail(entry: &LogEntry) -> String {
    let data = match entry.pretty_data() {
        Some(json) => format!(r#"<pre class="code-block">{}</pre>"#, escape_html(&json)),
        None => r#"<p class="text-muted">No additional data</p>"#.to_string(),
    };

    format!(
        concat!(
            r#"<section class="log-detail-content" id="log-{id}">"#,
            r#"<h3>Log Detail ({level})</h3>"#,
            r#"<dl>"#,
            r#"<dt>Timestamp</dt><dd>{time}</dd>"#,
            r#"<dt>Level</dt><dd>{badge}</dd>"#,
            r#"<dt>Source</dt><dd>{source}</dd>"#,
            r#"<dt>Message</dt><dd>{message}</dd>"#,
            r#"</dl>"#,
            r#"<h4>Additional Data</h4>{data}"#,
            "</section>"
        ),
        id = escape_html(&entry.id),
        level = escape_html(entry.level.as_str()),
        time = format_timestamp(&entry.timestamp, true),
        badge = badge(entry),
        source = escape_html(&entry.source),
        message = escape_html(&entry.message),
        data = data,
    )
}

/// Standalone HTML document of the current page and its details
pub fn render_document(
    logs: &[LogEntry],
    page: &PageState,
    filters: &FilterState,
    generated_at: DateTime<Utc>,
) -> String {
    let mut details = String::new();
    for entry in logs {
        details.push_str(&render_detail(entry));
        details.push('\n');
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>Bot logs snapshot</title>\n</head>\n<body>\n",
            "<header><h1>Bot logs</h1>",
            "<p>Generated {generated} &middot; filters: {filters} &middot; ",
            "<span id=\"log-count\">{total}</span> logs</p></header>\n",
            "<table id=\"logs-table\">\n<thead><tr>",
            "<th>Time</th><th>Level</th><th>Source</th><th>Message</th><th></th>",
            "</tr></thead>\n<tbody id=\"log-entries\">\n{rows}</tbody>\n</table>\n",
            "{pagination}\n{details}</body>\n</html>\n"
        ),
        generated = format_timestamp(&generated_at, false),
        filters = escape_html(&filters.summary()),
        total = page.total_logs,
        rows = render_rows(logs),
        pagination = render_pagination(page),
        details = details,
    )
}
