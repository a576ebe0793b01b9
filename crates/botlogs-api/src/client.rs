//! HTTP client for the bot admin log endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url, header};

use botlogs_types::{ActionResponse, ExportFormat, FilterState, LogPage, LogsResponse};

use crate::error::{ApiError, Result};

/// Header the backend reads the API token from
const TOKEN_HEADER: &str = "X-Access-Token";

/// Connection settings for [`HttpLogsClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the bot server (default: http://localhost:8080)
    pub base_url: String,
    /// Value sent as `X-Access-Token`
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            access_token: None,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Page and filters of one `/api/logs` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: FilterState,
}

impl LogQuery {
    /// Query parameters, page and limit first
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

/// Body of an export download, stored verbatim
#[derive(Clone, Debug)]
pub struct Download {
    /// Name suggested by `Content-Disposition`, if any
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// The log endpoints the console depends on
#[async_trait]
pub trait LogsApi: Send + Sync {
    /// `GET /api/logs`
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage>;

    /// `POST /api/logs/clear`
    async fn clear_logs(&self) -> Result<()>;

    /// URL of `GET /api/logs/export` for the given filters
    fn export_url(&self, format: ExportFormat, filters: &FilterState) -> Result<Url>;

    /// Fetch an export URL without inspecting the body
    async fn download(&self, url: &Url) -> Result<Download>;

    /// Human-readable server address for display
    fn server(&self) -> String;
}

/// [`LogsApi`] over HTTP
pub struct HttpLogsClient {
    base: Url,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl HttpLogsClient {
    /// Create a client; fails on an unparsable base URL
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut raw = config.base_url.trim().to_string();
        // Url::join only appends relative paths below a trailing slash
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base,
            access_token: config.access_token.filter(|t| !t.is_empty()),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    /// Map status codes and read the body as text
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            // The backend usually still answers with `{success:false, error}`
            let reason = serde_json::from_str::<ActionResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                });
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl LogsApi for HttpLogsClient {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage> {
        let mut url = self.endpoint("api/logs")?;
        url.query_pairs_mut().extend_pairs(query.pairs());

        tracing::debug!(url = %url, "fetching logs");
        let response = self.authorized(self.client.get(url)).send().await?;
        let body = Self::read_body(response).await?;
        let parsed: LogsResponse = serde_json::from_str(&body)?;

        if !parsed.success {
            return Err(ApiError::Application(
                parsed
                    .error
                    .unwrap_or_else(|| "Failed to load logs".to_string()),
            ));
        }

        let page = LogPage::from_raw(
            parsed.logs.unwrap_or_default(),
            parsed.total_pages,
            parsed.total_logs,
        );
        if page.skipped > 0 {
            tracing::warn!(skipped = page.skipped, "dropped malformed log entries");
        }
        Ok(page)
    }

    async fn clear_logs(&self) -> Result<()> {
        let url = self.endpoint("api/logs/clear")?;

        tracing::info!("clearing server logs");
        let response = self.authorized(self.client.post(url)).send().await?;
        let body = Self::read_body(response).await?;
        let parsed: ActionResponse = serde_json::from_str(&body)?;

        if parsed.success {
            Ok(())
        } else {
            Err(ApiError::Application(
                parsed
                    .error
                    .unwrap_or_else(|| "Failed to clear logs".to_string()),
            ))
        }
    }

    fn export_url(&self, format: ExportFormat, filters: &FilterState) -> Result<Url> {
        let mut url = self.endpoint("api/logs/export")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", format.as_str());
            pairs.extend_pairs(filters.query_pairs());
            // A plain navigation cannot carry headers; the backend also reads `token`
            if let Some(token) = &self.access_token {
                pairs.append_pair("token", token);
            }
        }
        Ok(url)
    }

    async fn download(&self, url: &Url) -> Result<Download> {
        tracing::debug!(path = url.path(), "downloading export");
        let response = self.authorized(self.client.get(url.clone())).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name);
        let bytes = response.bytes().await?.to_vec();

        Ok(Download { file_name, bytes })
    }

    fn server(&self) -> String {
        let mut shown = self.base.clone();
        shown.set_query(None);
        shown.as_str().trim_end_matches('/').to_string()
    }
}

/// Extract a safe file name from a `Content-Disposition` value
fn attachment_file_name(value: &str) -> Option<String> {
    let raw = value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let name = raw.trim_matches('"');
    // Never let the server pick a directory
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use botlogs_types::LogLevel;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request head
    async fn serve_once(
        status: &'static str,
        headers: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn client(base_url: String, token: Option<&str>) -> HttpLogsClient {
        HttpLogsClient::new(ClientConfig {
            base_url,
            access_token: token.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_logs_sends_query_and_token() {
        let body = r#"{"success":true,"totalPages":2,"totalLogs":30,"logs":[
            {"id":"a1","timestamp":"2024-05-01T08:00:00Z","level":"WARNING","source":"API","message":"slow"}
        ]}"#;
        let (base, server) = serve_once("200 OK", "", body).await;
        let api = client(base, Some("secret"));

        let mut filters = FilterState::default();
        filters.level = Some(LogLevel::Warning);
        filters.search = "slow request".to_string();
        let page = api
            .fetch_logs(&LogQuery {
                page: 2,
                limit: 25,
                filters,
            })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_logs, 30);
        assert_eq!(page.logs[0].id, "a1");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with(
            "get /api/logs?page=2&limit=25&level=warning&search=slow+request http/1.1"
        ));
        assert!(request.contains("x-access-token: secret"));
    }

    #[tokio::test]
    async fn test_fetch_logs_application_error() {
        let (base, _server) = serve_once("200 OK", "", r#"{"success":false,"error":"db down"}"#).await;
        let err = client(base, None)
            .fetch_logs(&LogQuery {
                page: 1,
                limit: 25,
                filters: FilterState::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Application(ref m) if m == "db down"));
    }

    #[tokio::test]
    async fn test_status_errors() {
        let (base, _server) = serve_once(
            "500 Internal Server Error",
            "",
            r#"{"success":false,"error":"Gagal mengambil logs"}"#,
        )
        .await;
        let err = client(base, None).clear_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, ref reason } if reason == "Gagal mengambil logs"));
        assert!(err.is_network());

        let (base, _server) = serve_once("401 Unauthorized", "", "{}").await;
        let err = client(base, None).clear_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (base, _server) = serve_once("200 OK", "", "<html>login</html>").await;
        let err = client(base, None)
            .fetch_logs(&LogQuery {
                page: 1,
                limit: 25,
                filters: FilterState::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_download_uses_attachment_name() {
        let (base, _server) = serve_once(
            "200 OK",
            "Content-Disposition: attachment; filename=logs_export_20240501_080000.csv\r\n",
            "Timestamp,Level\n",
        )
        .await;
        let api = client(base, None);
        let url = api
            .export_url(ExportFormat::Csv, &FilterState::default())
            .unwrap();
        let download = api.download(&url).await.unwrap();
        assert_eq!(
            download.file_name.as_deref(),
            Some("logs_export_20240501_080000.csv")
        );
        assert_eq!(download.bytes, b"Timestamp,Level\n");
    }

    #[test]
    fn test_export_url_carries_filters_not_page() {
        let api = client("http://bot.local:8080/admin".to_string(), Some("t0k"));
        let mut filters = FilterState::default();
        filters.source = Some("WHATSAPP".to_string());
        filters.date_to = chrono::NaiveDate::from_ymd_opt(2024, 2, 29);

        let url = api.export_url(ExportFormat::Json, &filters).unwrap();
        assert_eq!(
            url.as_str(),
            "http://bot.local:8080/admin/api/logs/export?format=json&source=WHATSAPP&to=2024-02-29&token=t0k"
        );
        assert_eq!(api.server(), "http://bot.local:8080/admin");
    }

    #[test]
    fn test_attachment_file_name() {
        assert_eq!(
            attachment_file_name("attachment; filename=\"a.json\"").as_deref(),
            Some("a.json")
        );
        assert_eq!(
            attachment_file_name("attachment; filename=../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(attachment_file_name("inline"), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpLogsClient::new(ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(err, Err(ApiError::InvalidUrl(_))));
    }
}
