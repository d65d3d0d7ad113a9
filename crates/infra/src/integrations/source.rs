//! Source application adapters: OAuth password-grant authentication and the
//! tracking-record fetch.
//!
//! Both adapters issue exactly one request per call. Transport failures are
//! remapped at this boundary: to `Auth` while authenticating and to `Fetch`
//! while fetching, so the orchestrator can tell which stage aborted the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};
use tracksync_core::sync::ports::{Authenticator, RecordFetcher};
use tracksync_domain::{AccessToken, Credentials, Result, SourceRecord, TrackSyncError};

use crate::http::HttpClient;

/// Longest body excerpt carried in an error message.
const BODY_EXCERPT_LEN: usize = 512;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// `{ "results": { "data": [...] } }`; either level may be absent or null.
#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    results: Option<FetchResults>,
}

#[derive(Debug, Deserialize)]
struct FetchResults {
    #[serde(default)]
    data: Option<Vec<SourceRecord>>,
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Exchanges [`Credentials`] for a bearer token with a password grant.
pub struct PasswordGrantAuthenticator {
    http: HttpClient,
}

impl PasswordGrantAuthenticator {
    /// Build an authenticator with its own client. `None` leaves the request
    /// without an explicit timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let http = HttpClient::builder().maybe_timeout(timeout).build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Authenticator for PasswordGrantAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken> {
        let form = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        debug!(auth_url = %credentials.auth_url, "requesting access token");
        let request = self.http.request(Method::POST, &credentials.auth_url).form(&form);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| TrackSyncError::Auth(format!("token request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TrackSyncError::Auth(format!("token response unreadable: {err}")))?;

        if !status.is_success() {
            return Err(TrackSyncError::Auth(format!(
                "token endpoint returned HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|err| {
            TrackSyncError::Auth(format!("token response is not valid JSON: {err}"))
        })?;

        match parsed.access_token.filter(|token| !token.is_empty()) {
            Some(token) => {
                info!(username = %credentials.username, "authenticated against source application");
                Ok(AccessToken::new(token))
            }
            None => Err(TrackSyncError::Auth(format!(
                "token response without access_token (HTTP {}): {}",
                status.as_u16(),
                excerpt(&body)
            ))),
        }
    }
}

/// Retrieves the batch of tracking records from the source application.
pub struct SourceRecordFetcher {
    http: HttpClient,
    app_url: String,
}

impl SourceRecordFetcher {
    pub fn new(app_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let http = HttpClient::builder().maybe_timeout(timeout).build()?;
        Ok(Self::with_client(app_url, http))
    }

    pub fn with_client(app_url: impl Into<String>, http: HttpClient) -> Self {
        Self { http, app_url: app_url.into() }
    }
}

#[async_trait]
impl RecordFetcher for SourceRecordFetcher {
    async fn fetch(&self, token: &AccessToken) -> Result<Vec<SourceRecord>> {
        let request = self.http.request(Method::GET, &self.app_url).bearer_auth(token.as_str());
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| TrackSyncError::Fetch(format!("record request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TrackSyncError::Fetch(format!("record response unreadable: {err}")))?;

        if !status.is_success() {
            return Err(TrackSyncError::Fetch(format!(
                "source application returned HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let parsed: FetchResponse = serde_json::from_str(&body).map_err(|err| {
            TrackSyncError::Fetch(format!("unexpected record payload: {err}"))
        })?;

        let records = parsed.results.and_then(|results| results.data).unwrap_or_default();
        info!(records = records.len(), "fetched {} tracking records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::json;
    use tracksync_domain::Scalar;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn credentials(auth_url: String) -> Credentials {
        Credentials {
            auth_url,
            client_id: "multpex".into(),
            client_secret: "s3cr3t".into(),
            username: "sync".into(),
            password: "p&ss word".into(),
        }
    }

    fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/token")
    }

    #[tokio::test]
    async fn password_grant_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("client_id=multpex"))
            .and(body_string_contains("client_secret=s3cr3t"))
            .and(body_string_contains("username=sync"))
            .and(body_string_contains("password=p%26ss+word"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "abc", "token_type": "bearer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = PasswordGrantAuthenticator::new(None).unwrap();
        let token = auth.authenticate(&credentials(format!("{}/token", server.uri()))).await;

        assert_eq!(token.unwrap().as_str(), "abc");
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let auth = PasswordGrantAuthenticator::new(None).unwrap();
        let err = auth
            .authenticate(&credentials(format!("{}/token", server.uri())))
            .await
            .unwrap_err();

        match err {
            TrackSyncError::Auth(msg) => {
                assert!(msg.contains("401"), "{msg}");
                assert!(msg.contains("invalid_grant"), "{msg}");
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_access_token_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let auth = PasswordGrantAuthenticator::new(None).unwrap();
        let err = auth
            .authenticate(&credentials(format!("{}/token", server.uri())))
            .await
            .unwrap_err();

        assert!(matches!(err, TrackSyncError::Auth(msg) if msg.contains("access_token")));
    }

    #[tokio::test]
    async fn transport_failure_while_authenticating_is_auth_error() {
        let auth = PasswordGrantAuthenticator::new(None).unwrap();
        let err = auth.authenticate(&credentials(refused_url())).await.unwrap_err();
        assert!(matches!(err, TrackSyncError::Auth(_)), "{err:?}");
    }

    #[tokio::test]
    async fn fetch_sends_bearer_token_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracking"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"data": [
                    {"RequisicaoNumero": 100, "ItemCodigo": "X1", "Extra": true},
                    {"RequisicaoNumero": 101, "ItemCodigo": "X2"}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher =
            SourceRecordFetcher::new(format!("{}/tracking", server.uri()), None).unwrap();
        let records = fetcher.fetch(&AccessToken::new("abc")).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].request_number, Some(Scalar::from(100)));
        assert_eq!(records[1].item_code, Some(Scalar::from("X2")));
    }

    #[tokio::test]
    async fn nested_field_values_do_not_drop_the_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"data": [
                    {"RequisicaoNumero": 100, "ItemCodigo": "X1"},
                    {"RequisicaoNumero": 101, "ItemCodigo": "X2",
                     "EntregaUnidadeNome": {"nome": "NAVIO B"}},
                    {"RequisicaoNumero": 102, "ItemCodigo": "X3", "ItemQuantidade": []}
                ]}
            })))
            .mount(&server)
            .await;

        let fetcher = SourceRecordFetcher::new(server.uri(), None).unwrap();
        let records = fetcher.fetch(&AccessToken::new("abc")).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1].delivery_unit_name,
            Some(Scalar::Structured(json!({"nome": "NAVIO B"})))
        );
        assert!(records[2].item_quantity.as_ref().is_some_and(Scalar::is_falsy));
    }

    #[tokio::test]
    async fn absent_or_null_data_yields_empty_batch() {
        for body in [json!({}), json!({"results": null}), json!({"results": {"data": null}})] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(&server)
                .await;

            let fetcher = SourceRecordFetcher::new(server.uri(), None).unwrap();
            let records = fetcher.fetch(&AccessToken::new("abc")).await.unwrap();
            assert!(records.is_empty(), "body {body} should yield no records");
        }
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let fetcher = SourceRecordFetcher::new(server.uri(), None).unwrap();
        let err = fetcher.fetch(&AccessToken::new("abc")).await.unwrap_err();
        assert!(matches!(err, TrackSyncError::Fetch(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn unparsable_body_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let fetcher = SourceRecordFetcher::new(server.uri(), None).unwrap();
        let err = fetcher.fetch(&AccessToken::new("abc")).await.unwrap_err();
        assert!(matches!(err, TrackSyncError::Fetch(_)));
    }

    #[tokio::test]
    async fn transport_failure_while_fetching_is_fetch_error() {
        let fetcher = SourceRecordFetcher::new(refused_url(), None).unwrap();
        let err = fetcher.fetch(&AccessToken::new("abc")).await.unwrap_err();
        assert!(matches!(err, TrackSyncError::Fetch(_)), "{err:?}");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(BODY_EXCERPT_LEN + 10);
        assert_eq!(excerpt(&long).chars().count(), BODY_EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }
}
