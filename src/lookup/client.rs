//! LRCLIB HTTP client
//!
//! Exact lookup by track fields and free-text search.
//! No API key required. Successful responses are cached per URL.
//!
//! API: https://lrclib.net/docs

use serde::de::DeserializeOwned;

use super::cache::ResponseCache;
use super::{LookupError, adapter, dto};
use crate::lyrics::{LookupOutcome, LyricsCandidate, TrackQuery};

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://lrclib.net";

/// LRCLIB asks clients to identify themselves
const USER_AGENT: &str = concat!("lyrics-minder/", env!("CARGO_PKG_VERSION"));

/// LRCLIB API client
pub struct LrclibClient {
    http_client: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

impl LrclibClient {
    /// Create a client for `base_url` with the given cache.
    pub fn new(base_url: impl Into<String>, cache: ResponseCache) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        })
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Look up lyrics by exact track fields.
    pub async fn lookup_exact(&self, query: &TrackQuery) -> Result<LookupOutcome, LookupError> {
        let url = self.get_url(query)?;

        match self.get_json::<dto::LyricsRecord>(&url).await? {
            Some(record) => Ok(adapter::to_outcome(record)),
            None => Ok(LookupOutcome::NotFound),
        }
    }

    /// Search by free text. Results keep the server's ranking.
    pub async fn search(&self, text: &str) -> Result<Vec<LyricsCandidate>, LookupError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LookupError::InvalidQuery("search text is empty".to_string()));
        }
        let url = self.build_url("/api/search", &[("q", text)]);

        let records = self
            .get_json::<Vec<dto::LyricsRecord>>(&url)
            .await?
            .unwrap_or_default();
        Ok(adapter::to_candidates(records))
    }

    /// URL of the exact lookup for `query`.
    fn get_url(&self, query: &TrackQuery) -> Result<String, LookupError> {
        let duration = match query.duration_secs {
            Some(d) if query.is_complete() => d.to_string(),
            _ => {
                return Err(LookupError::InvalidQuery(
                    "artist, title, album, and duration are required".to_string(),
                ));
            }
        };

        Ok(self.build_url(
            "/api/get",
            &[
                ("track_name", query.title.as_str()),
                ("artist_name", query.artist.as_str()),
                ("album_name", query.album.as_str()),
                ("duration", duration.as_str()),
            ],
        ))
    }

    /// Parameters are encoded in the order given, so equal queries give equal
    /// URLs and share a cache entry.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{}", self.base_url, path, query)
    }

    /// GET `url` as JSON, via the cache. `Ok(None)` on 404.
    ///
    /// Only bodies that decode are cached.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, LookupError> {
        if let Some(body) = self.cache.get(url) {
            tracing::debug!("Cache hit: {}", url);
            return decode(&body).map(Some);
        }

        let Some(body) = self.fetch(url).await? else {
            return Ok(None);
        };
        let value = decode(&body)?;
        self.cache.put(url, &body);
        Ok(Some(value))
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>, LookupError> {
        tracing::debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Some(body))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port; returns the base URL.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn served(status: &'static str, body: &'static str) -> LrclibClient {
        LrclibClient::new(serve_once(status, body), ResponseCache::in_memory()).unwrap()
    }

    /// Nothing listens on the discard port, so a real request fails fast.
    const DEAD_URL: &str = "http://127.0.0.1:9";

    fn client() -> LrclibClient {
        LrclibClient::new(DEAD_URL, ResponseCache::in_memory()).unwrap()
    }

    fn query() -> TrackQuery {
        TrackQuery {
            artist: "Borislav Slavov".to_string(),
            title: "I Want to Live".to_string(),
            album: "Baldur's Gate 3".to_string(),
            duration_secs: Some(233),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = LrclibClient::new("https://lrclib.net/", ResponseCache::in_memory()).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_get_url_encodes_fields() {
        let url = client().get_url(&query()).unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:9/api/get?track_name=I%20Want%20to%20Live\
             &artist_name=Borislav%20Slavov&album_name=Baldur%27s%20Gate%203&duration=233"
        );
    }

    #[test]
    fn test_incomplete_query_is_rejected() {
        let incomplete = TrackQuery {
            duration_secs: None,
            ..query()
        };
        assert!(matches!(
            client().get_url(&incomplete),
            Err(LookupError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_served_from_cache() {
        let client = client();
        let url = client.get_url(&query()).unwrap();
        client
            .cache()
            .put(&url, r#"{"id": 9, "syncedLyrics": "[00:01.00] hi", "plainLyrics": "hi"}"#);

        let outcome = client.lookup_exact(&query()).await.unwrap();
        assert_eq!(outcome.text(), Some("[00:01.00] hi"));
    }

    #[tokio::test]
    async fn test_cached_record_without_id_is_not_found() {
        let client = client();
        let url = client.get_url(&query()).unwrap();
        client.cache().put(&url, r#"{"syncedLyrics":"","plainLyrics":""}"#);

        let outcome = client.lookup_exact(&query()).await.unwrap();
        assert_eq!(outcome, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = client();
        let url = client.get_url(&query()).unwrap();
        client.cache().put(&url, "<html>oops</html>");

        let result = client.lookup_exact(&query()).await;
        assert!(matches!(result, Err(LookupError::Decode(_))));
    }

    #[tokio::test]
    async fn test_search_served_from_cache() {
        let client = client();
        let url = client.build_url("/api/search", &[("q", "live")]);
        client.cache().put(&url, "[]");

        let results = client.search("live").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_rejected() {
        let result = client().search("   ").await;
        assert!(matches!(result, Err(LookupError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_error_page_with_200_is_not_cached() {
        let client = served("200 OK", "<html>temporary error page</html>");
        let url = client.get_url(&query()).unwrap();

        let result = client.lookup_exact(&query()).await;
        assert!(matches!(result, Err(LookupError::Decode(_))));
        assert!(!client.cache().contains(&url));
    }

    #[tokio::test]
    async fn test_found_record_is_cached() {
        let client = served("200 OK", r#"{"id": 3, "syncedLyrics": null, "plainLyrics": "hi"}"#);
        let url = client.get_url(&query()).unwrap();

        let outcome = client.lookup_exact(&query()).await.unwrap();
        assert_eq!(outcome.text(), Some("hi"));
        assert!(client.cache().contains(&url));

        // Server is gone; the second lookup must come from the cache
        let again = client.lookup_exact(&query()).await.unwrap();
        assert_eq!(again, outcome);
    }

    #[tokio::test]
    async fn test_http_404_is_not_found_and_not_cached() {
        let client = served("404 Not Found", r#"{"code":404,"name":"TrackNotFound"}"#);
        let url = client.get_url(&query()).unwrap();

        let outcome = client.lookup_exact(&query()).await.unwrap();
        assert_eq!(outcome, LookupOutcome::NotFound);
        assert!(!client.cache().contains(&url));
    }

    #[tokio::test]
    async fn test_http_500_is_transport_error_and_not_cached() {
        let client = served("500 Internal Server Error", "boom");
        let url = client.get_url(&query()).unwrap();

        let result = client.lookup_exact(&query()).await;
        match result {
            Err(LookupError::Transport(message)) => assert!(message.contains("500")),
            other => panic!("expected transport error, got {:?}", other),
        }
        assert!(!client.cache().contains(&url));
    }

    #[tokio::test]
    async fn test_search_with_no_matches() {
        let client = served("200 OK", "[]");
        let results = client.search("nothing matches this").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let result = client().lookup_exact(&query()).await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
    }
}
