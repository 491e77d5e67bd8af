// HTTP client for the calendar proxy endpoint.
// Success: 2xx with raw ICS text. Failure: non-2xx with a JSON body
// { error, details? }; `error` is surfaced verbatim when present.

use crate::error::{CalendarError, CalendarResult};
use crate::http_config::HttpConfig;
use crate::utils::retry::{retry_with_backoff, RetryConfig};
use anyhow::anyhow;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: String,
    details: Option<String>,
}

pub struct ProxyGateway {
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

impl ProxyGateway {
    /// `endpoint` is the fixed local proxy URL, e.g.
    /// `http://localhost:3000/api/calendar-proxy`.
    pub fn new(endpoint: &str) -> CalendarResult<Self> {
        let config = HttpConfig::ics_fetch();
        let client = config
            .build_client()
            .map_err(|e| CalendarError::fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            retry: config.to_retry_config(),
        })
    }

    async fn fetch_once(client: &Client, endpoint: &str, feed_url: &str) -> anyhow::Result<String> {
        let response = client
            .get(endpoint)
            .query(&[("url", feed_url)])
            .header("Accept", "text/calendar, application/calendar, text/plain")
            .send()
            .await
            .map_err(|e| anyhow!("Request to calendar proxy failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<GatewayErrorBody>().await {
                Ok(body) if !body.error.is_empty() => {
                    if let Some(details) = body.details {
                        log::debug!("Proxy error details: {}", details);
                    }
                    body.error
                }
                _ => format!("Failed to fetch calendar feed: {}", status),
            };
            return Err(anyhow!(message));
        }

        let content = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        // Catch HTML responses from misconfigured feed URLs early
        let trimmed = content.trim_start();
        if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html") {
            return Err(anyhow!(
                "Invalid calendar feed: the proxy returned HTML instead of calendar data"
            ));
        }

        Ok(content)
    }
}

#[async_trait::async_trait]
impl super::FeedGateway for ProxyGateway {
    async fn fetch_calendar(&self, feed_url: &str) -> CalendarResult<String> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let feed_url = feed_url.to_string();

        retry_with_backoff(&self.retry, move || {
            let client = client.clone();
            let endpoint = endpoint.clone();
            let feed_url = feed_url.clone();
            Box::pin(async move { Self::fetch_once(&client, &endpoint, &feed_url).await })
        })
        .await
        .map_err(|e| CalendarError::fetch(e.to_string()))
    }
}

/// Sanity-checks a configured feed URL. Problems are reported, not fixed;
/// the engine still attempts whatever the registry holds.
pub fn validate_feed_url(feed_url: &str) -> anyhow::Result<()> {
    if feed_url.trim().is_empty() {
        return Err(anyhow!("Feed URL is empty"));
    }

    let parsed = Url::parse(feed_url).map_err(|e| anyhow!("Invalid feed URL format: {}", e))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!(
            "Feed URL must use http or https, got '{}://'",
            parsed.scheme()
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(anyhow!("Feed URL has no host"));
    }

    let path = parsed.path().to_lowercase();
    if !path.ends_with(".ics") && !path.contains("calendar") && !path.contains("feed") {
        log::warn!(
            "Feed URL does not look like a calendar feed (no .ics extension): {}",
            feed_url
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_feed_url_accepts_arr_feeds() {
        let urls = vec![
            "http://sonarr.local:8989/feed/v3/calendar/Sonarr.ics?apikey=abc",
            "https://radarr.example.com/feed/v3/calendar/Radarr.ics",
        ];
        for url in urls {
            assert!(validate_feed_url(url).is_ok(), "should accept {}", url);
        }
    }

    #[test]
    fn test_validate_feed_url_rejects_empty() {
        let result = validate_feed_url("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_feed_url_rejects_bad_scheme() {
        let result = validate_feed_url("ftp://example.com/calendar.ics");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http"));
    }

    #[test]
    fn test_validate_feed_url_rejects_garbage() {
        assert!(validate_feed_url("not-a-url").is_err());
    }

    #[test]
    fn test_gateway_error_body_decoding() {
        let body: GatewayErrorBody =
            serde_json::from_str(r#"{"error":"Failed to fetch calendar: 404 Not Found","details":"no such feed"}"#)
                .unwrap();
        assert_eq!(body.error, "Failed to fetch calendar: 404 Not Found");
        assert_eq!(body.details.as_deref(), Some("no such feed"));

        let bare: GatewayErrorBody = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert!(bare.details.is_none());
    }
}
