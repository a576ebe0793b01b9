use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use botlogs_api::{ApiError, LogQuery, LogsApi};
use botlogs_types::{
    DEFAULT_PAGE_SIZE, ExportFormat, FilterState, FilterUpdate, LogEntry, LogPage, PageState,
};

use crate::busy::{BusyFlag, BusyGuard};
use crate::debounce::Debouncer;
use crate::notify::Notifications;
use crate::render;

/// Tunables of a [`LogView`]
#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Entries requested per page
    pub page_size: u32,
    /// Quiet period before a search edit is sent
    pub search_debounce: Duration,
    /// Lifetime of a toast
    pub notification_ttl: Duration,
    /// Where downloads and snapshots are written
    pub export_dir: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(500),
            notification_ttl: Duration::from_secs(4),
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Results delivered back to the view by its background tasks
#[derive(Debug)]
pub enum ViewEvent {
    LogsLoaded {
        seq: u64,
        query: LogQuery,
        result: Result<LogPage, ApiError>,
    },
    SearchSettled {
        generation: u64,
        text: String,
    },
    Cleared(Result<(), ApiError>),
    Saved {
        label: String,
        result: Result<PathBuf, ViewError>,
    },
}

/// Destructive actions waiting for the user's answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    ClearAll,
}

impl Confirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::ClearAll => {
                "Delete all logs on the server? This action cannot be undone."
            }
        }
    }
}

/// Enabled state of the prev/next controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Filter/page state synchronised with the remote log endpoint
///
/// All network work runs on spawned tasks that report through the
/// [`ViewEvent`] channel; the owner feeds those events back via
/// [`handle`](Self::handle). Each reload is numbered and only the response to
/// the most recently issued reload is applied.
pub struct LogView {
    api: Arc<dyn LogsApi>,
    events: mpsc::UnboundedSender<ViewEvent>,
    config: ViewConfig,

    filters: FilterState,
    page: PageState,
    logs: Vec<LogEntry>,

    /// Search text typed but not yet applied
    pending_search: Option<String>,
    detail: Option<String>,
    confirmation: Option<Confirmation>,
    notifications: Notifications,

    latest_seq: u64,
    loading: BusyFlag,
    refreshing: BusyFlag,
    clearing: BusyFlag,
    exporting: BusyFlag,

    debouncer: Debouncer,
    cancel: CancellationToken,
    destroyed: bool,
}

impl LogView {
    pub fn new(
        api: Arc<dyn LogsApi>,
        events: mpsc::UnboundedSender<ViewEvent>,
        config: ViewConfig,
    ) -> Self {
        let page = PageState {
            limit: config.page_size,
            ..PageState::default()
        };

        Self {
            api,
            events,
            debouncer: Debouncer::new(config.search_debounce),
            notifications: Notifications::new(config.notification_ttl),
            config,
            filters: FilterState::default(),
            page,
            logs: Vec::new(),
            pending_search: None,
            detail: None,
            confirmation: None,
            latest_seq: 0,
            loading: BusyFlag::new(),
            refreshing: BusyFlag::new(),
            clearing: BusyFlag::new(),
            exporting: BusyFlag::new(),
            cancel: CancellationToken::new(),
            destroyed: false,
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Change one filter field, go back to page 1 and reload.
    /// Search edits are debounced.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        if self.destroyed {
            return;
        }
        self.page.current_page = 1;

        match update {
            FilterUpdate::Search(text) => {
                self.pending_search = Some(text.clone());
                self.debouncer.schedule(&self.events, move |generation| {
                    ViewEvent::SearchSettled { generation, text }
                });
            }
            other => {
                self.filters.apply(other);
                self.reload();
            }
        }
    }

    /// Reset every filter to its default and reload page 1
    pub fn reset_filters(&mut self) {
        if self.destroyed {
            return;
        }
        self.debouncer.cancel();
        self.pending_search = None;
        self.filters = FilterState::default();
        self.page.current_page = 1;
        self.reload();
    }

    /// Fetch the current page with the current filters; returns the request number
    pub fn reload(&mut self) -> u64 {
        self.spawn_fetch(None)
    }

    /// User-triggered reload with its own spinner; ignored while one is running
    pub fn refresh(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(guard) = self.refreshing.try_acquire() else {
            return false;
        };
        self.spawn_fetch(Some(guard));
        true
    }

    /// Move `delta` pages; no request when the target is outside `[1, total_pages]`
    pub fn go_to_page(&mut self, delta: i64) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(target) = self.page.target(delta) else {
            return false;
        };
        self.page.current_page = target;
        self.reload();
        true
    }

    /// Ask for confirmation before clearing every log on the server
    pub fn clear_all(&mut self) {
        if self.destroyed || self.clearing.is_busy() {
            return;
        }
        self.confirmation = Some(Confirmation::ClearAll);
    }

    /// Accept the pending confirmation and run its action
    pub fn confirm(&mut self) -> bool {
        match self.confirmation.take() {
            Some(Confirmation::ClearAll) => self.spawn_clear(),
            None => false,
        }
    }

    pub fn cancel_confirmation(&mut self) {
        self.confirmation = None;
    }

    /// Download the export of the current filter set (never the page)
    pub fn export_current(&mut self, format: ExportFormat) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(guard) = self.exporting.try_acquire() else {
            return false;
        };

        let url = match self.api.export_url(format, &self.filters) {
            Ok(url) => url,
            Err(e) => {
                self.notifications.error("Failed to export logs", &e);
                return false;
            }
        };
        tracing::info!(%format, filters = %self.filters.summary(), "export requested");

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let cancel = self.cancel.clone();
        let dir = self.config.export_dir.clone();
        let label = format!("{} export", format.as_str().to_uppercase());

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = download_to(api.as_ref(), &url, &dir, format) => result,
            };
            drop(guard);
            let _ = tx.send(ViewEvent::Saved { label, result });
        });
        true
    }

    /// Write the current page as a standalone HTML file
    pub fn save_snapshot(&mut self) {
        if self.destroyed {
            return;
        }
        let html = self.snapshot_html();
        let path = self.config.export_dir.join(format!(
            "logs_snapshot_{}.html",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let tx = self.events.clone();

        tokio::spawn(async move {
            let result = write_file(path, html.into_bytes()).await;
            let _ = tx.send(ViewEvent::Saved {
                label: "HTML snapshot".to_string(),
                result,
            });
        });
    }

    /// HTML rendering of the current page
    pub fn snapshot_html(&self) -> String {
        render::render_document(&self.logs, &self.page, &self.filters, Utc::now())
    }

    /// Open the detail of an entry of the current page; unknown ids are ignored
    pub fn show_detail(&mut self, id: &str) -> bool {
        if !self.logs.iter().any(|entry| entry.id == id) {
            return false;
        }
        self.detail = Some(id.to_string());
        true
    }

    pub fn hide_detail(&mut self) {
        self.detail = None;
    }

    /// Periodic housekeeping; returns whether a redraw is needed
    pub fn tick(&mut self) -> bool {
        self.notifications.prune()
    }

    /// Stop timers and in-flight tasks; later events are ignored
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.debouncer.cancel();
        self.cancel.cancel();
        self.confirmation = None;
        tracing::debug!("log view destroyed");
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Apply a result produced by one of the view's tasks
    pub fn handle(&mut self, event: ViewEvent) {
        if self.destroyed {
            return;
        }

        match event {
            ViewEvent::LogsLoaded { seq, query, result } => {
                if seq != self.latest_seq {
                    tracing::debug!(seq, latest = self.latest_seq, "discarding superseded response");
                    return;
                }
                match result {
                    Ok(page) => self.apply_page(&query, page),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load logs");
                        self.notifications.error("Failed to load logs", &e);
                    }
                }
            }

            ViewEvent::SearchSettled { generation, text } => {
                if !self.debouncer.accept(generation) {
                    return;
                }
                self.pending_search = None;
                self.filters.apply(FilterUpdate::Search(text));
                self.page.current_page = 1;
                self.reload();
            }

            ViewEvent::Cleared(result) => match result {
                Ok(()) => {
                    tracing::info!("server logs cleared");
                    self.notifications.success("Logs cleared successfully");
                    self.page.current_page = 1;
                    self.reload();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to clear logs");
                    self.notifications.error("Failed to clear logs", &e);
                }
            },

            ViewEvent::Saved { label, result } => match result {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "{} saved", label);
                    self.notifications
                        .success(format!("{} saved to {}", label, path.display()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "{} failed", label);
                    self.notifications.error(&format!("{} failed", label), &e);
                }
            },
        }
    }

    fn apply_page(&mut self, query: &LogQuery, page: LogPage) {
        tracing::debug!(
            page = query.page,
            entries = page.logs.len(),
            total_logs = page.total_logs,
            "logs loaded"
        );
        self.logs = page.logs;
        self.page.total_pages = page.total_pages;
        self.page.total_logs = page.total_logs;

        if let Some(id) = &self.detail {
            if !self.logs.iter().any(|entry| &entry.id == id) {
                self.detail = None;
            }
        }
    }

    fn query(&self) -> LogQuery {
        LogQuery {
            page: self.page.current_page,
            limit: self.page.limit,
            filters: self.filters.clone(),
        }
    }

    fn spawn_fetch(&mut self, action: Option<BusyGuard>) -> u64 {
        if self.destroyed {
            return self.latest_seq;
        }
        self.latest_seq += 1;

        let seq = self.latest_seq;
        let query = self.query();
        let loading = self.loading.acquire();
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = api.fetch_logs(&query) => result,
            };
            // Flags are clear by the time the result is observed
            drop(loading);
            drop(action);
            let _ = tx.send(ViewEvent::LogsLoaded { seq, query, result });
        });

        seq
    }

    fn spawn_clear(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(clearing) = self.clearing.try_acquire() else {
            return false;
        };

        let loading = self.loading.acquire();
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = api.clear_logs() => result,
            };
            drop(loading);
            drop(clearing);
            let _ = tx.send(ViewEvent::Cleared(result));
        });
        true
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            prev_enabled: self.page.has_prev(),
            next_enabled: self.page.has_next(),
        }
    }

    /// Entry shown in the detail modal
    pub fn detail(&self) -> Option<&LogEntry> {
        let id = self.detail.as_ref()?;
        self.logs.iter().find(|entry| &entry.id == id)
    }

    pub fn pending_search(&self) -> Option<&str> {
        self.pending_search.as_deref()
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_busy()
    }

    pub fn is_clearing(&self) -> bool {
        self.clearing.is_busy()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.is_busy()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn server(&self) -> String {
        self.api.server()
    }

    pub fn export_dir(&self) -> &std::path::Path {
        &self.config.export_dir
    }
}

impl Drop for LogView {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Fetch an export and store it under the server-suggested name
async fn download_to(
    api: &dyn LogsApi,
    url: &botlogs_api::Url,
    dir: &std::path::Path,
    format: ExportFormat,
) -> Result<PathBuf, ViewError> {
    let download = api.download(url).await?;
    let name = download.file_name.unwrap_or_else(|| {
        format!(
            "logs_export_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    });
    write_file(dir.join(name), download.bytes).await
}

async fn write_file(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, ViewError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ViewError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ViewError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use botlogs_api::{Download, Url};
    use botlogs_types::LogLevel;
    use parking_lot::Mutex;
    use tokio::sync::oneshot;

    /// A fetch waiting for the test to answer it
    struct PendingCall {
        query: LogQuery,
        reply: oneshot::Sender<Result<LogPage, ApiError>>,
    }

    struct FakeApi {
        calls: mpsc::UnboundedSender<PendingCall>,
        clear_result: Mutex<Option<Result<(), ApiError>>>,
        download_body: Vec<u8>,
    }

    #[async_trait]
    impl LogsApi for FakeApi {
        async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage, ApiError> {
            let (reply, rx) = oneshot::channel();
            let _ = self.calls.send(PendingCall {
                query: query.clone(),
                reply,
            });
            rx.await
                .unwrap_or_else(|_| Err(ApiError::Application("dropped".to_string())))
        }

        async fn clear_logs(&self) -> Result<(), ApiError> {
            self.clear_result.lock().take().unwrap_or(Ok(()))
        }

        fn export_url(&self, format: ExportFormat, filters: &FilterState) -> Result<Url, ApiError> {
            let mut url = Url::parse("http://bot.test/api/logs/export").unwrap();
            url.query_pairs_mut()
                .append_pair("format", format.as_str())
                .extend_pairs(filters.query_pairs());
            Ok(url)
        }

        async fn download(&self, _url: &Url) -> Result<Download, ApiError> {
            Ok(Download {
                file_name: Some("export.csv".to_string()),
                bytes: self.download_body.clone(),
            })
        }

        fn server(&self) -> String {
            "http://bot.test".to_string()
        }
    }

    struct Harness {
        view: LogView,
        events: mpsc::UnboundedReceiver<ViewEvent>,
        calls: mpsc::UnboundedReceiver<PendingCall>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(ViewConfig::default(), None)
        }

        fn with_config(config: ViewConfig, clear_result: Option<Result<(), ApiError>>) -> Self {
            let (calls_tx, calls) = mpsc::unbounded_channel();
            let (events_tx, events) = mpsc::unbounded_channel();
            let api = Arc::new(FakeApi {
                calls: calls_tx,
                clear_result: Mutex::new(clear_result),
                download_body: b"Timestamp,Level\n".to_vec(),
            });
            Self {
                view: LogView::new(api, events_tx, config),
                events,
                calls,
            }
        }

        async fn next_call(&mut self) -> PendingCall {
            self.calls.recv().await.expect("fetch issued")
        }

        /// Receive the next event and feed it to the view
        async fn pump(&mut self) {
            let event = self.events.recv().await.expect("view event");
            self.view.handle(event);
        }

        /// Answer the next fetch and apply its result
        async fn load(&mut self, result: Result<LogPage, ApiError>) -> LogQuery {
            let call = self.next_call().await;
            let _ = call.reply.send(result);
            self.pump().await;
            call.query
        }

        async fn assert_no_call(&mut self) {
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            assert!(self.calls.try_recv().is_err(), "unexpected fetch");
        }
    }

    fn entry(id: &str, message: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: "2024-05-01T08:00:00Z".parse().unwrap(),
            level: LogLevel::Info.into(),
            source: "SYSTEM".to_string(),
            message: message.to_string(),
            data: None,
        }
    }

    fn page(ids: &[&str], total_pages: u32, total_logs: u64) -> LogPage {
        LogPage {
            logs: ids.iter().map(|id| entry(id, "msg")).collect(),
            total_pages,
            total_logs,
            skipped: 0,
        }
    }

    #[tokio::test]
    async fn test_reload_applies_page() {
        let mut h = Harness::new();
        h.view.reload();
        assert!(h.view.is_loading());

        let query = h.load(Ok(page(&["a", "b"], 3, 60))).await;
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(h.view.logs().len(), 2);
        assert_eq!(h.view.page().total_pages, 3);
        assert_eq!(h.view.page().total_logs, 60);
        assert!(!h.view.is_loading());
    }

    #[tokio::test]
    async fn test_set_filter_always_resets_page() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a"], 5, 120))).await;

        assert!(h.view.go_to_page(1));
        h.load(Ok(page(&["b"], 5, 120))).await;
        assert_eq!(h.view.page().current_page, 2);

        let updates = [
            FilterUpdate::Level(Some(LogLevel::Error)),
            FilterUpdate::Source(Some("API".to_string())),
            FilterUpdate::Search("boom".to_string()),
            FilterUpdate::DateFrom(chrono::NaiveDate::from_ymd_opt(2024, 1, 1)),
            FilterUpdate::DateTo(None),
        ];
        for update in updates {
            h.view.set_filter(update);
            assert_eq!(h.view.page().current_page, 1);
        }
    }

    #[tokio::test]
    async fn test_filter_query_sent() {
        let mut h = Harness::new();
        h.view
            .set_filter(FilterUpdate::Level(Some(LogLevel::Warning)));
        let call = h.next_call().await;
        assert_eq!(
            call.query.pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "25".to_string()),
                ("level", "WARNING".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_prev_on_first_page_is_noop() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a"], 2, 30))).await;

        let seq = h.view.latest_seq();
        let before = *h.view.page();
        assert!(!h.view.go_to_page(-1));
        assert_eq!(*h.view.page(), before);
        assert_eq!(h.view.latest_seq(), seq);
        h.assert_no_call().await;
    }

    #[tokio::test]
    async fn test_next_on_last_page_is_noop() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a"], 2, 30))).await;
        assert!(h.view.go_to_page(1));
        h.load(Ok(page(&["b"], 2, 30))).await;
        assert_eq!(h.view.page().current_page, 2);

        let seq = h.view.latest_seq();
        assert!(!h.view.go_to_page(1));
        assert_eq!(h.view.page().current_page, 2);
        assert_eq!(h.view.latest_seq(), seq);
        h.assert_no_call().await;
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut h = Harness::new();

        h.view.set_filter(FilterUpdate::Level(Some(LogLevel::Debug)));
        let call_a = h.next_call().await;
        h.view.set_filter(FilterUpdate::Level(Some(LogLevel::Error)));
        let call_b = h.next_call().await;

        // B resolves first, then A arrives late
        let _ = call_b.reply.send(Ok(page(&["b1", "b2"], 1, 2)));
        h.pump().await;
        let _ = call_a.reply.send(Ok(page(&["a1"], 7, 160)));
        h.pump().await;

        let ids: Vec<_> = h.view.logs().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2"]);
        assert_eq!(h.view.page().total_pages, 1);
        assert_eq!(h.view.filters().level, Some(LogLevel::Error));
        assert!(!h.view.is_loading());
    }

    #[tokio::test]
    async fn test_stale_error_does_not_notify() {
        let mut h = Harness::new();
        h.view.reload();
        let call_a = h.next_call().await;
        h.view.reload();
        let call_b = h.next_call().await;

        let _ = call_a
            .reply
            .send(Err(ApiError::Application("old".to_string())));
        h.pump().await;
        let _ = call_b.reply.send(Ok(page(&["x"], 1, 1)));
        h.pump().await;

        assert!(h.view.notifications().is_empty());
        assert_eq!(h.view.logs()[0].id, "x");
    }

    #[tokio::test]
    async fn test_application_error_keeps_previous_logs() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["keep"], 1, 1))).await;

        h.view.reload();
        h.load(Err(ApiError::Application("db down".to_string())))
            .await;

        assert_eq!(h.view.logs()[0].id, "keep");
        let note = h.view.notifications().latest().unwrap();
        assert!(note.message.contains("db down"));
        assert_eq!(note.kind, crate::NotificationKind::Error);
        assert!(!h.view.is_loading());
    }

    #[tokio::test]
    async fn test_empty_page_disables_pagination() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&[], 0, 0))).await;

        assert!(h.view.logs().is_empty());
        assert_eq!(
            h.view.pagination(),
            Pagination {
                prev_enabled: false,
                next_enabled: false
            }
        );
        let html = h.view.snapshot_html();
        let body = html
            .split("<tbody id=\"log-entries\">")
            .nth(1)
            .and_then(|rest| rest.split("</tbody>").next())
            .unwrap();
        assert_eq!(body.matches("<tr").count(), 1);
        assert!(body.contains(render::EMPTY_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_detail_lookup() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a", "b"], 1, 2))).await;

        assert!(!h.view.show_detail("zzz"));
        assert!(h.view.detail().is_none());

        assert!(h.view.show_detail("b"));
        assert_eq!(h.view.detail().unwrap().id, "b");

        // Unknown id leaves the open modal as it was
        assert!(!h.view.show_detail("zzz"));
        assert_eq!(h.view.detail().unwrap().id, "b");

        h.view.hide_detail();
        assert!(h.view.detail().is_none());
    }

    #[tokio::test]
    async fn test_detail_closes_when_entry_leaves_page() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a"], 2, 26))).await;
        h.view.show_detail("a");

        h.view.go_to_page(1);
        h.load(Ok(page(&["z"], 2, 26))).await;
        assert!(h.view.detail().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let mut h = Harness::new();
        for text in ["e", "er", "err"] {
            h.view.set_filter(FilterUpdate::Search(text.to_string()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(h.view.pending_search(), Some("err"));
        assert_eq!(h.view.filters().search, "");

        h.pump().await;
        let call = h.next_call().await;
        assert_eq!(call.query.filters.search, "err");
        assert_eq!(call.query.page, 1);
        assert_eq!(h.view.pending_search(), None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(h.events.try_recv().is_err());
        assert!(h.calls.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let mut h = Harness::new();
        h.view.reload();
        h.load(Ok(page(&["a"], 3, 70))).await;
        h.view.go_to_page(1);
        h.load(Ok(page(&["b"], 3, 70))).await;

        h.view.clear_all();
        assert_eq!(h.view.confirmation(), Some(Confirmation::ClearAll));
        h.view.cancel_confirmation();
        assert!(!h.view.confirm());
        h.assert_no_call().await;

        h.view.clear_all();
        assert!(h.view.confirm());
        h.pump().await;

        let query = h.load(Ok(page(&[], 0, 0))).await;
        assert_eq!(query.page, 1);
        assert_eq!(h.view.page().current_page, 1);
        let note = h.view.notifications().latest().unwrap();
        assert_eq!(note.message, "Logs cleared successfully");
        assert!(!h.view.is_clearing());
    }

    #[tokio::test]
    async fn test_clear_failure_notifies() {
        let mut h = Harness::with_config(
            ViewConfig::default(),
            Some(Err(ApiError::Application("locked".to_string()))),
        );
        h.view.clear_all();
        h.view.confirm();
        h.pump().await;

        let note = h.view.notifications().latest().unwrap();
        assert_eq!(note.message, "Failed to clear logs: locked");
        h.assert_no_call().await;
    }

    #[tokio::test]
    async fn test_export_writes_file_without_touching_state() {
        let dir = std::env::temp_dir().join(format!("botlogs-export-{}", std::process::id()));
        let config = ViewConfig {
            export_dir: dir.clone(),
            ..ViewConfig::default()
        };
        let mut h = Harness::with_config(config, None);
        h.view.set_filter(FilterUpdate::Source(Some("WEB".to_string())));
        h.load(Ok(page(&["a"], 2, 30))).await;
        let before = (h.view.logs().to_vec(), *h.view.page(), h.view.filters().clone());

        assert!(h.view.export_current(ExportFormat::Csv));
        assert!(h.view.is_exporting());
        assert!(!h.view.export_current(ExportFormat::Json));
        h.pump().await;

        assert!(!h.view.is_exporting());
        let written = std::fs::read(dir.join("export.csv")).unwrap();
        assert_eq!(written, b"Timestamp,Level\n");
        assert_eq!(
            (h.view.logs().to_vec(), *h.view.page(), h.view.filters().clone()),
            before
        );
        h.assert_no_call().await;
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_destroy_ignores_late_events() {
        let mut h = Harness::new();
        h.view.reload();
        let call = h.next_call().await;

        h.view.destroy();
        let _ = call.reply.send(Ok(page(&["late"], 1, 1)));
        h.view.handle(ViewEvent::LogsLoaded {
            seq: h.view.latest_seq(),
            query: call.query,
            result: Ok(page(&["late"], 1, 1)),
        });

        assert!(h.view.logs().is_empty());
        assert!(!h.view.go_to_page(1));
        assert!(!h.view.refresh());
        assert!(!h.view.is_refreshing());
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(!h.view.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_cancels_pending_search() {
        let mut h = Harness::new();
        h.view.set_filter(FilterUpdate::Search("abc".to_string()));
        h.view.destroy();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(h.events.try_recv().is_err());
    }
}
