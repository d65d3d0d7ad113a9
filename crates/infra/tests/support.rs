//! Shared wiremock fixtures for the end-to-end pipeline tests.

use serde_json::{json, Value};
use tracksync_domain::{Credentials, EamConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "token-abc";

pub const TRANSID_RESPONSE: &str = r#"<soapenv:Envelope><soapenv:Body>
<MP0810_AddInterfaceTransactions_001_Result><ResultData>
<TRANSID xmlns="http://schemas.datastream.net/MP_fields">20001</TRANSID>
</ResultData></MP0810_AddInterfaceTransactions_001_Result>
</soapenv:Body></soapenv:Envelope>"#;

/// Identity server, source application and EAM on one mock server, split by
/// path.
pub struct Backend {
    pub server: MockServer,
}

impl Backend {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            auth_url: format!("{}/auth/token", self.server.uri()),
            client_id: "multpex".into(),
            client_secret: "secret".into(),
            username: "sync".into(),
            password: "pw".into(),
        }
    }

    pub fn app_url(&self) -> String {
        format!("{}/app/tracking", self.server.uri())
    }

    pub fn eam_config(&self) -> EamConfig {
        EamConfig {
            url: format!("{}/eam", self.server.uri()),
            user: "integ".into(),
            password: "eam-pw".into(),
            tenant: "ACME_PRD".into(),
            organization: "ACME".into(),
            origin_marker: "PYTHO".into(),
            timeout_secs: 5,
        }
    }

    pub async fn grant_token(&self) {
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": TOKEN})))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn serve_records(&self, records: Value) {
        Mock::given(method("GET"))
            .and(path("/app/tracking"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": {"data": records}})),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Requests received on the EAM path, in arrival order.
    pub async fn eam_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/eam")
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
