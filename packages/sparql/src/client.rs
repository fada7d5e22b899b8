//! SPARQL protocol client.
//!
//! [`SparqlClient::fetch_results`] posts one query and returns the decoded
//! rows. The HTTP layer is hidden behind the [`Transport`] trait so tests
//! (and alternative runtimes) can supply their own.
//!
//! Each call makes exactly one request. There is no retry, no timeout, and
//! no caching; callers decide when to fetch again.

use async_trait::async_trait;
use crime_dash_sparql_models::{Binding, SparqlResults};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::FetchError;
use crate::config::EndpointConfig;

/// Content type of a SPARQL 1.1 query sent directly as the POST body.
pub const SPARQL_QUERY_CONTENT_TYPE: &str = "application/sparql-query";

/// Maximum length of the response body preview included in logs.
const BODY_PREVIEW_LEN: usize = 200;

/// A raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Sends a query body to a URL and returns whatever the server answered.
///
/// Implementations report only transport-level failures as errors
/// ([`FetchError::Network`]); every HTTP status, success or not, is
/// returned as a [`TransportResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `query` to `url` as `application/sparql-query`, asking for
    /// JSON results.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if no response was received.
    async fn post_query(&self, url: &str, query: &str) -> Result<TransportResponse, FetchError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_query(&self, url: &str, query: &str) -> Result<TransportResponse, FetchError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, SPARQL_QUERY_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(query.to_string())
            .send()
            .await
            .map_err(map_network_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_network_error)?;

        Ok(TransportResponse { status, body })
    }
}

fn map_network_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        FetchError::Network(format!("connection failed: {e}"))
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Client bound to one endpoint repository.
#[derive(Debug, Clone)]
pub struct SparqlClient<T = HttpTransport> {
    transport: T,
    query_url: String,
}

impl SparqlClient<HttpTransport> {
    /// Creates a client for `endpoint` using the `reqwest` transport.
    #[must_use]
    pub fn new(endpoint: &EndpointConfig) -> Self {
        Self::with_transport(endpoint, HttpTransport::new())
    }
}

impl<T: Transport> SparqlClient<T> {
    /// Creates a client for `endpoint` over a custom transport.
    #[must_use]
    pub fn with_transport(endpoint: &EndpointConfig, transport: T) -> Self {
        Self {
            transport,
            query_url: endpoint.query_url(),
        }
    }

    /// The URL queries are posted to.
    #[must_use]
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Runs `query` and returns the result rows in endpoint order.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Network`] if no response was received
    /// * [`FetchError::HttpStatus`] for any non-2xx status (body included)
    /// * [`FetchError::Decode`] if the body is not a SPARQL JSON result set
    pub async fn fetch_results(&self, query: &str) -> Result<Vec<Binding>, FetchError> {
        log::info!("Querying {} ({} bytes)", self.query_url, query.len());
        log::trace!("Query text:\n{query}");

        let response = self.transport.post_query(&self.query_url, query).await?;

        if !(200..300).contains(&response.status) {
            log::error!(
                "Endpoint returned status {}: {}",
                response.status,
                preview(&response.body)
            );
            return Err(FetchError::HttpStatus(response.status, response.body));
        }

        let results: SparqlResults = serde_json::from_str(&response.body).map_err(|e| {
            log::error!(
                "Failed to decode result set: {e}\n  body preview: {}",
                preview(&response.body)
            );
            FetchError::Decode(e.to_string())
        })?;

        let bindings = results.into_bindings();
        log::info!("Received {} bindings", bindings.len());
        Ok(bindings)
    }
}

fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Transport that replays a canned answer and records every request.
    pub struct FakeTransport {
        answer: Result<TransportResponse, FetchError>,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeTransport {
        pub fn respond(status: u16, body: &str) -> Self {
            Self {
                answer: Ok(TransportResponse {
                    status,
                    body: body.to_string(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn fail(message: &str) -> Self {
            Self {
                answer: Err(FetchError::Network(message.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn post_query(
            &self,
            url: &str,
            query: &str,
        ) -> Result<TransportResponse, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), query.to_string()));
            self.answer.clone()
        }
    }

    fn fake_client(transport: FakeTransport) -> SparqlClient<FakeTransport> {
        SparqlClient::with_transport(&EndpointConfig::default(), transport)
    }

    #[tokio::test]
    async fn returns_bindings_on_success() {
        let body = r#"{"head":{"vars":["city"]},"results":{"bindings":[
            {"city":{"type":"literal","value":"Chicago"}},
            {"city":{"type":"literal","value":"Los%20Angeles"}}
        ]}}"#;
        let client = fake_client(FakeTransport::respond(200, body));

        let rows = client.fetch_results("SELECT ?city WHERE {}").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].value("city"), Some("Los%20Angeles"));
    }

    #[tokio::test]
    async fn posts_query_once_to_repository_url() {
        let client = fake_client(FakeTransport::respond(200, r#"{"results":{"bindings":[]}}"#));
        client.fetch_results("ASK {}").await.unwrap();

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://localhost:7200/repositories/Vedanya");
        assert_eq!(requests[0].1, "ASK {}");
    }

    #[tokio::test]
    async fn empty_result_set_is_ok() {
        let client = fake_client(FakeTransport::respond(200, r#"{"results":{"bindings":[]}}"#));
        assert!(client.fetch_results("q").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let client = fake_client(FakeTransport::respond(500, "server error"));
        assert_eq!(
            client.fetch_results("q").await.unwrap_err(),
            FetchError::HttpStatus(500, "server error".to_string())
        );
    }

    #[tokio::test]
    async fn redirect_status_is_not_success() {
        let client = fake_client(FakeTransport::respond(304, ""));
        assert!(matches!(
            client.fetch_results("q").await,
            Err(FetchError::HttpStatus(304, _))
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let client = fake_client(FakeTransport::respond(200, "<html>oops</html>"));
        assert!(matches!(
            client.fetch_results("q").await,
            Err(FetchError::Decode(_))
        ));

        let client = fake_client(FakeTransport::respond(200, r#"{"boolean":true}"#));
        assert!(matches!(
            client.fetch_results("q").await,
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn network_failure_is_propagated() {
        let client = fake_client(FakeTransport::fail("connection refused"));
        assert_eq!(
            client.fetch_results("q").await.unwrap_err(),
            FetchError::Network("connection refused".to_string())
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(BODY_PREVIEW_LEN);
        let p = preview(&body);
        assert!(p.len() <= BODY_PREVIEW_LEN);
        assert!(body.starts_with(p));
    }
}
