//! EAM web-service client submitting interface transactions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use tracing::debug;
use tracksync_core::sync::ports::TransactionSubmitter;
use tracksync_domain::constants::{EAM_SOAP_ACTION, TRANSID_MARKER};
use tracksync_domain::{EamConfig, Result, SyncResult, Transaction};

use super::envelope::EnvelopeBuilder;
use crate::http::HttpClient;

const SOAP_CONTENT_TYPE: &str = "text/xml;charset=UTF-8";

/// Posts one envelope per transaction and classifies the answer.
///
/// A call is only `Sent` when the EAM answers 200 *and* the body carries a
/// `<TRANSID` element; a 200 without it is reported as `HttpError(200)`.
pub struct EamSubmitter {
    http: HttpClient,
    url: String,
    envelope: EnvelopeBuilder,
}

impl EamSubmitter {
    /// Build a submitter whose requests time out after `timeout_secs`.
    pub fn new(config: &EamConfig) -> Result<Self> {
        let http =
            HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: &EamConfig, http: HttpClient) -> Self {
        Self { http, url: config.url.clone(), envelope: EnvelopeBuilder::new(config) }
    }
}

#[async_trait]
impl TransactionSubmitter for EamSubmitter {
    async fn submit(&self, transaction: &Transaction) -> SyncResult {
        let body = match self.envelope.build(transaction) {
            Ok(body) => body,
            Err(err) => {
                return SyncResult::TransportError {
                    description: format!("envelope could not be built: {err}"),
                }
            }
        };
        debug!(
            url = %self.url,
            request_number = %transaction.request_number,
            item_code = %transaction.item_code,
            "posting interface transaction"
        );

        let request = self
            .http
            .request(Method::POST, &self.url)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", EAM_SOAP_ACTION)
            .body(body);

        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(err) => return SyncResult::TransportError { description: err.to_string() },
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                return SyncResult::TransportError {
                    description: format!("response body could not be read: {err}"),
                }
            }
        };

        let result = classify(status, &text);
        debug!(status = status.as_u16(), ?result, "EAM answered");
        result
    }
}

fn classify(status: StatusCode, body: &str) -> SyncResult {
    if status == StatusCode::OK && body.contains(TRANSID_MARKER) {
        SyncResult::Sent { transaction_id: extract_transaction_id(body) }
    } else {
        SyncResult::HttpError { status: status.as_u16() }
    }
}

/// Text content of the first `<TRANSID ...>...</TRANSID>` element, if any.
fn extract_transaction_id(body: &str) -> Option<String> {
    let start = body.find(TRANSID_MARKER)?;
    let rest = &body[start..];
    let open_end = rest.find('>')?;
    let content = &rest[open_end + 1..];
    let close = content.find("</")?;
    let id = content[..close].trim();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use tracksync_domain::Scalar;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const CREATED: &str = r#"<soapenv:Envelope><soapenv:Body><MP0810_AddInterfaceTransactions_001_Result>
<ResultData><TRANSID xmlns="http://schemas.datastream.net/MP_fields">10045</TRANSID></ResultData>
</MP0810_AddInterfaceTransactions_001_Result></soapenv:Body></soapenv:Envelope>"#;

    fn config(url: String) -> EamConfig {
        EamConfig {
            url,
            user: "integ".into(),
            password: "secret".into(),
            tenant: "ACME_PRD".into(),
            organization: "ACME".into(),
            origin_marker: "PYTHO".into(),
            timeout_secs: 30,
        }
    }

    fn transaction() -> Transaction {
        Transaction {
            request_number: Scalar::from(100),
            item_code: "X1".into(),
            item_quantity: Scalar::from(5),
            completion_date: "2024-01-01".into(),
            delivery_unit_name: "NAVIO A".into(),
        }
    }

    async fn submit_against(template: ResponseTemplate) -> SyncResult {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ews"))
            .and(header("content-type", SOAP_CONTENT_TYPE))
            .and(header("soapaction", EAM_SOAP_ACTION))
            .and(body_string_contains("<PROMPTDATA2 xmlns=\"http://schemas.datastream.net/MP_fields\">100</PROMPTDATA2>"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;

        let submitter = EamSubmitter::new(&config(format!("{}/ews", server.uri()))).unwrap();
        submitter.submit(&transaction()).await
    }

    #[tokio::test]
    async fn ok_with_transid_is_sent() {
        let result = submit_against(ResponseTemplate::new(200).set_body_string(CREATED)).await;
        assert_eq!(result, SyncResult::Sent { transaction_id: Some("10045".into()) });
    }

    #[tokio::test]
    async fn ok_without_transid_is_http_error_200() {
        let fault = "<soapenv:Envelope><soapenv:Body><Fault/></soapenv:Body></soapenv:Envelope>";
        let result = submit_against(ResponseTemplate::new(200).set_body_string(fault)).await;
        assert_eq!(result, SyncResult::HttpError { status: 200 });
    }

    #[tokio::test]
    async fn non_200_is_http_error_even_with_marker() {
        let result = submit_against(ResponseTemplate::new(404).set_body_string(CREATED)).await;
        assert_eq!(result, SyncResult::HttpError { status: 404 });

        let result = submit_against(ResponseTemplate::new(500)).await;
        assert_eq!(result, SyncResult::HttpError { status: 500 });
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let submitter = EamSubmitter::new(&config(format!("http://{addr}/ews"))).unwrap();
        let result = submitter.submit(&transaction()).await;
        assert!(matches!(result, SyncResult::TransportError { .. }), "{result:?}");
    }

    #[tokio::test]
    async fn slow_answer_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CREATED)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let http = HttpClient::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let submitter = EamSubmitter::with_client(&config(server.uri()), http);
        match submitter.submit(&transaction()).await {
            SyncResult::TransportError { description } => {
                assert!(description.contains("timed out"), "{description}")
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn classification_requires_status_200_and_marker() {
        assert_eq!(
            classify(StatusCode::OK, "<Response><TRANSID>55</TRANSID></Response>"),
            SyncResult::Sent { transaction_id: Some("55".into()) }
        );
        assert_eq!(
            classify(StatusCode::OK, "<Response><Error/></Response>"),
            SyncResult::HttpError { status: 200 }
        );
        assert_eq!(
            classify(StatusCode::NOT_FOUND, "<TRANSID>55</TRANSID>"),
            SyncResult::HttpError { status: 404 }
        );
    }

    #[test]
    fn transaction_id_extraction() {
        assert_eq!(extract_transaction_id(CREATED).as_deref(), Some("10045"));
        assert_eq!(extract_transaction_id("<TRANSID>  77 </TRANSID>").as_deref(), Some("77"));
        assert_eq!(extract_transaction_id("<TRANSID/>"), None);
        assert_eq!(extract_transaction_id("no marker"), None);
    }
}
