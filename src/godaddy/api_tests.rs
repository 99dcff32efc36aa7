// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the GoDaddy records client.

#[cfg(test)]
mod tests {
    use crate::errors::{ErrorKind, SolverError};
    use crate::godaddy::api::RecordsClient;
    use crate::godaddy::types::{Credentials, DnsRecord};
    use secrecy::SecretString;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            api_key: SecretString::from("test-key".to_string()),
            api_secret: SecretString::from("test-secret".to_string()),
        }
    }

    fn client(base_url: &str) -> RecordsClient {
        RecordsClient::new(base_url, credentials(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_records_url() {
        let client = client("https://api.ote-godaddy.com/");
        assert_eq!(
            client.records_url("example.com", "_acme-challenge"),
            "https://api.ote-godaddy.com/v1/domains/example.com/records/TXT/_acme-challenge"
        );
    }

    #[tokio::test]
    async fn test_update_records_sends_record_set() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/domains/example.com/records/TXT/_acme-challenge"))
            .and(header("authorization", "sso-key test-key:test-secret"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!([
                { "type": "TXT", "name": "_acme-challenge", "data": "token", "ttl": 600 }
            ])))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let records = [DnsRecord::challenge("_acme-challenge", "token", Some(600))];
        client(&server.uri())
            .update_records("example.com", "_acme-challenge", &records)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header(
                "user-agent",
                concat!("godaddy-webhook/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server.uri())
            .update_records("example.com", "_acme-challenge", &[DnsRecord::cleared("_acme-challenge")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_200_includes_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let records = [DnsRecord::challenge("_acme-challenge", "token", None)];
        let err = client(&server.uri())
            .update_records("example.com", "_acme-challenge", &records)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SolverError::RegistrarApi { status: 500, .. }
        ));
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("rate limited"));
        assert!(message.contains("\"data\":\"token\""));
    }

    #[tokio::test]
    async fn test_other_2xx_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .update_records("example.com", "_acme-challenge", &[DnsRecord::cleared("_acme-challenge")])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RegistrarApi);
    }

    #[tokio::test]
    async fn test_unreachable_registrar_is_transport_error() {
        let err = client("http://127.0.0.1:1")
            .update_records("example.com", "_acme-challenge", &[DnsRecord::cleared("_acme-challenge")])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("request to http://127.0.0.1:1/v1/domains/"));
    }
}
