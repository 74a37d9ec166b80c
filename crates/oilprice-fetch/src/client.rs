//! HTTP page transport.

use std::time::Duration;

use async_trait::async_trait;
use oilprice_query::{Page, PageFetcher, PageRequest};
use oilprice_types::{FetchError, OilPriceError};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap};
use reqwest::{Client, StatusCode};
use tracing::{debug, trace};

use crate::ClientConfig;
use crate::parse::{error_message, parse_page};
use crate::url::{page_query, prices_url};

/// [`PageFetcher`] backed by the OilPriceAPI HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::Configuration`] if the API key is empty or
    /// the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, OilPriceError> {
        if config.api_key.trim().is_empty() {
            return Err(OilPriceError::Configuration("API key required".to_string()));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| OilPriceError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a transport configured from the environment.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`] and [`HttpTransport::new`].
    pub fn from_env() -> Result<Self, OilPriceError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpTransport {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        let url = prices_url(&self.config.base_url, request.endpoint);
        debug!(
            %url,
            commodity = request.commodity,
            page = request.page,
            per_page = request.page_size,
            timeout = ?request.timeout,
            "requesting page"
        );

        let response = self
            .client
            .get(&url)
            .query(&page_query(request, &self.config.price_type))
            .header(AUTHORIZATION, format!("Token {}", self.config.api_key))
            .header(ACCEPT, "application/json")
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify_transport(&e, request.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status, &headers, &body);
            debug!(status = status.as_u16(), error = %err, "page request failed");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(&e, request.timeout))?;
        trace!(bytes = body.len(), "received body");

        parse_page(&body, request.commodity).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Maps a reqwest failure to a [`FetchError`].
fn classify_transport(err: &reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(format!("request timed out after {}s", timeout.as_secs_f64()))
    } else if err.is_decode() || err.is_body() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Connection(err.to_string())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Maps a non-success response to a [`FetchError`].
fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> FetchError {
    let message = error_message(body);
    let code = status.as_u16();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Authentication(message),
        StatusCode::NOT_FOUND => FetchError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
            message,
            limit: header_value(headers, "x-ratelimit-limit"),
            remaining: header_value(headers, "x-ratelimit-remaining"),
            reset: header_value(headers, "x-ratelimit-reset"),
        },
        s if s.is_server_error() => FetchError::Server {
            status: code,
            message,
        },
        _ => FetchError::Status {
            status: code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oilprice_types::{DateRange, Endpoint, Interval};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(range: &DateRange) -> PageRequest<'_> {
        PageRequest {
            commodity: "WTI_USD",
            endpoint: Endpoint::PastWeek,
            range: *range,
            page: 2,
            page_size: 100,
            interval: Interval::Daily,
            timeout: Duration::from_secs(5),
        }
    }

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(ClientConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    fn week() -> DateRange {
        DateRange::parse("2024-06-01", "2024-06-08").unwrap()
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            HttpTransport::new(ClientConfig::default()),
            Err(OilPriceError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_expected_request() {
        let server = MockServer::start().await;
        let body = r#"{"data": {"prices": [
            {"code": "WTI_USD", "price": 78.45, "created_at": "2024-06-01T00:00:00Z"}
        ]}, "meta": {"has_next": false}}"#;

        Mock::given(method("GET"))
            .and(path("/v1/prices/past_week"))
            .and(query_param("by_code", "WTI_USD"))
            .and(query_param("interval", "daily"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "100"))
            .and(query_param("by_type", "spot_price"))
            .and(query_param("start_date", "2024-06-01"))
            .and(query_param("end_date", "2024-06-08"))
            .and(header("authorization", "Token test-key"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let range = week();
        let page = transport(&server).fetch_page(&request(&range)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.has_more, Some(false));
        assert!((page.records[0].value - 78.45).abs() < f64::EPSILON);
    }

    async fn fetch_with_status(template: ResponseTemplate) -> FetchError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/past_week"))
            .respond_with(template)
            .mount(&server)
            .await;

        let range = week();
        transport(&server)
            .fetch_page(&request(&range))
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_authentication_error() {
        let err = fetch_with_status(
            ResponseTemplate::new(401).set_body_string(r#"{"error": "Invalid API key"}"#),
        )
        .await;
        assert_eq!(err, FetchError::Authentication("Invalid API key".into()));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let err = fetch_with_status(ResponseTemplate::new(404).set_body_string("{}")).await;
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rate_limited_error_reads_headers() {
        let err = fetch_with_status(
            ResponseTemplate::new(429)
                .insert_header("X-RateLimit-Limit", "1000")
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("X-RateLimit-Reset", "1717200000")
                .set_body_string(r#"{"message": "Rate limit exceeded"}"#),
        )
        .await;

        assert_eq!(
            err,
            FetchError::RateLimited {
                message: "Rate limit exceeded".into(),
                limit: Some("1000".into()),
                remaining: Some("0".into()),
                reset: Some("1717200000".into()),
            }
        );
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_server_errors() {
        let err = fetch_with_status(ResponseTemplate::new(503).set_body_string("unavailable")).await;
        assert_eq!(err.status(), Some(503));
        assert!(err.is_transient());

        let err = fetch_with_status(ResponseTemplate::new(501).set_body_string("nope")).await;
        assert!(matches!(err, FetchError::Server { status: 501, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_other_status() {
        let err = fetch_with_status(
            ResponseTemplate::new(422).set_body_string(r#"{"error": "bad interval"}"#),
        )
        .await;
        assert_eq!(
            err,
            FetchError::Status {
                status: 422,
                message: "bad interval".into()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let err = fetch_with_status(ResponseTemplate::new(200).set_body_string("<html>")).await;
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let range = week();
        let mut req = request(&range);
        req.timeout = Duration::from_millis(100);

        let err = transport(&server).fetch_page(&req).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_historical_client_paginates_and_retries_over_http() {
        use oilprice_query::{HistoricalClient, HistoricalOptions, RetryPolicy};

        let server = MockServer::start().await;
        let page = |n: u32, has_next: bool| {
            let prices: Vec<String> = (0..2)
                .map(|i| {
                    format!(
                        r#"{{"code": "BRENT_CRUDE_USD", "price": {}.0, "created_at": "2024-06-0{}T00:00:00Z"}}"#,
                        n * 10 + i,
                        n + i
                    )
                })
                .collect();
            format!(
                r#"{{"data": {{"prices": [{}]}}, "meta": {{"has_next": {has_next}}}}}"#,
                prices.join(",")
            )
        };

        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/past_week"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(1, true)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/past_week"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(2, false)))
            .expect(1)
            .mount(&server)
            .await;

        let retry = RetryPolicy::default().with_delays(Duration::ZERO, Duration::ZERO);
        let client = HistoricalClient::new(transport(&server)).with_retry(retry);
        let range = week();
        let data = client
            .get_historical(
                "brent_crude_usd",
                range.start(),
                range.end(),
                &HistoricalOptions::new().with_page_size(2),
            )
            .await
            .unwrap();

        let values: Vec<f64> = data.prices.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 11.0, 20.0, 21.0]);
        assert_eq!(data.plan.endpoint, Endpoint::PastWeek);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let config = ClientConfig::new("key").with_base_url("http://127.0.0.1:9");
        let range = week();
        let err = HttpTransport::new(config)
            .unwrap()
            .fetch_page(&request(&range))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Connection(_) | FetchError::Timeout(_)));
    }
}
