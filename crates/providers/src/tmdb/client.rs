use crate::tmdb::config::TmdbConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Instant;
use suggest_core::{SearchClient, SearchError, Suggestion};
use tokio::time::Duration;
use tracing::{debug, error, info};

// Fixed locale/pagination sent with every search.
const LANGUAGE: &str = "en-US";
const PAGE: &str = "1";
const INCLUDE_ADULT: &str = "false";

#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    cfg: TmdbConfig,
}

impl TmdbClient {
    pub fn new(cfg: TmdbConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        builder = match &cfg.proxy {
            Some(p) => builder.proxy(reqwest::Proxy::all(p)?),
            None => builder.no_proxy(),
        };
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!("{}/search/movie", self.cfg.base_url.trim_end_matches('/'))
    }

    fn query_params<'a>(&'a self, query: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("api_key", self.cfg.api_key.as_str()),
            ("query", query),
            ("language", LANGUAGE),
            ("page", PAGE),
            ("include_adult", INCLUDE_ADULT),
        ]
    }
}

impl SearchClient for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let url = self.endpoint();
        info!(target: "providers::tmdb", "search query={:?} url={}", query, url);
        let started = Instant::now();
        let resp = self
            .http
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            error!(target: "providers::tmdb", "search non-2xx status={} body={:?}", status, body);
            return Err(map_status_err(status, body));
        }
        let body = resp.text().await.map_err(map_reqwest_err)?;
        let suggestions = parse_results(&body)?;
        debug!(target: "providers::tmdb", "search query={:?} results={} in {:?}", query, suggestions.len(), started.elapsed());
        Ok(suggestions)
    }
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Option<Vec<MovieItem>>,
}

#[derive(Deserialize)]
struct MovieItem {
    #[serde(default)]
    title: Option<String>,
}

/// Missing or null `results` means no suggestions; items without a title
/// are skipped.
pub fn parse_results(body: &str) -> Result<Vec<Suggestion>, SearchError> {
    let page: SearchPage =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    Ok(page
        .results
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| m.title)
        .map(Suggestion::new)
        .collect())
}

// The request url carries the api key in its query; never let it reach a message.
fn map_reqwest_err(e: reqwest::Error) -> SearchError {
    let e = e.without_url();
    if e.is_timeout() {
        SearchError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        SearchError::Network(e.to_string())
    } else if e.is_decode() || e.is_body() {
        SearchError::Decode(e.to_string())
    } else {
        SearchError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> SearchError {
    let s = format!("{} {}", status.as_u16(), body.unwrap_or_default());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SearchError::Auth(s),
        StatusCode::TOO_MANY_REQUESTS => SearchError::RateLimit(s),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => SearchError::Network(s),
        _ => SearchError::Status(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::config::TmdbFileConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client_for(base_url: &str) -> TmdbClient {
        let cfg = TmdbConfig::from_parts(
            Some("secret".into()),
            Some(base_url.into()),
            None,
            TmdbFileConfig::default(),
        )
        .unwrap();
        TmdbClient::new(cfg).unwrap()
    }

    // Serves one canned HTTP response and hands back the request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{}/3", addr), task)
    }

    #[test]
    fn parses_titles_in_order() {
        let body = r#"{"page":1,"results":[{"title":"Batman","id":268},{"title":"Batman Returns"}]}"#;
        let titles: Vec<_> = parse_results(body).unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Batman", "Batman Returns"]);
    }

    #[test]
    fn missing_results_mean_no_suggestions() {
        assert!(parse_results(r#"{"page":1}"#).unwrap().is_empty());
        assert!(parse_results(r#"{"results":null}"#).unwrap().is_empty());
        assert!(parse_results(r#"{"results":[{"name":"no title"}]}"#).unwrap().is_empty());
    }

    #[test]
    fn garbage_body_is_decode_error() {
        assert!(matches!(parse_results("<html>"), Err(SearchError::Decode(_))));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(map_status_err(StatusCode::UNAUTHORIZED, None), SearchError::Auth(_)));
        assert!(matches!(map_status_err(StatusCode::TOO_MANY_REQUESTS, None), SearchError::RateLimit(_)));
        assert!(matches!(map_status_err(StatusCode::BAD_GATEWAY, None), SearchError::Network(_)));
        match map_status_err(StatusCode::NOT_FOUND, Some("gone".into())) {
            SearchError::Status(s) => assert_eq!(s, "404 gone"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let c = client_for("https://api.themoviedb.org/3/");
        assert_eq!(c.endpoint(), "https://api.themoviedb.org/3/search/movie");
    }

    #[tokio::test]
    async fn search_sends_fixed_parameters() {
        let (base, server) = serve_once("200 OK", r#"{"results":[{"title":"Batman"}]}"#).await;
        let c = client_for(&base);
        let got = c.search("bat man").await.unwrap();
        assert_eq!(got, vec![Suggestion::new("Batman")]);

        let head = server.await.unwrap();
        let line = head.lines().next().unwrap();
        assert!(line.starts_with("GET /3/search/movie?"), "{}", line);
        for part in [
            "api_key=secret",
            "query=bat+man",
            "language=en-US",
            "page=1",
            "include_adult=false",
        ] {
            assert!(line.contains(part), "missing {} in {}", part, line);
        }
    }

    #[tokio::test]
    async fn search_reports_http_failures() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"status_message":"Invalid API key"}"#).await;
        let err = client_for(&base).search("bat").await.unwrap_err();
        assert!(matches!(err, SearchError::Auth(ref s) if s.contains("Invalid API key")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_errors_do_not_leak_the_key() {
        // grab a free port, then close it so the connect is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}/3", addr))
            .search("bat")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Network(_)), "{:?}", err);
        let shown = err.to_string();
        assert!(!shown.contains("secret"), "{}", shown);
        assert!(!shown.contains("api_key"), "{}", shown);
    }
}
