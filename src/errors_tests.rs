// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for solver error types.

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_secret_key_not_found_names_key_and_secret() {
        let error = SolverError::SecretKeyNotFound {
            key: "api-key".to_string(),
            namespace: "cert-manager".to_string(),
            name: "godaddy".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "key \"api-key\" not found in secret \"cert-manager/godaddy\""
        );
        assert_eq!(error.kind(), ErrorKind::Credentials);
    }

    #[test]
    fn test_secret_not_found_error() {
        let error = SolverError::SecretNotFound {
            namespace: "default".to_string(),
            name: "missing".to_string(),
        };

        assert_eq!(error.to_string(), "secret \"default/missing\" not found");
        assert_eq!(error.kind().reason(), "CredentialsUnresolved");
    }

    #[test]
    fn test_registrar_api_error_carries_status_and_body() {
        let error = SolverError::RegistrarApi {
            payload: r#"[{"type":"TXT","name":"_acme-challenge","data":"token"}]"#.to_string(),
            status: 422,
            body: "invalid record".to_string(),
        };

        let message = error.to_string();
        assert!(message.starts_with("could not create record ["));
        assert!(message.contains("Status: 422"));
        assert!(message.ends_with("Body: invalid record"));
        assert_eq!(error.kind(), ErrorKind::RegistrarApi);
    }

    #[test]
    fn test_zone_not_found_error() {
        let error = SolverError::ZoneNotFound {
            fqdn: "_acme-challenge.example.com.".to_string(),
            reason: "no SOA record in any parent domain".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "could not find the start of authority for _acme-challenge.example.com.: no SOA record in any parent domain"
        );
        assert_eq!(error.kind().reason(), "ZoneNotFound");
    }

    #[test]
    fn test_config_decode_is_configuration_error() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error = SolverError::ConfigDecode(source);

        assert!(error.to_string().starts_with("error decoding solver config: "));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_not_initialized_error() {
        let error = SolverError::NotInitialized("godaddy".to_string());

        assert_eq!(
            error.to_string(),
            "solver 'godaddy' has not been initialized"
        );
        assert_eq!(error.kind().reason(), "ConfigurationError");
    }

    #[test]
    fn test_invalid_config_error() {
        let error = SolverError::InvalidConfig("apiKeyRef.name is empty".to_string());

        assert_eq!(
            error.to_string(),
            "invalid solver config: apiKeyRef.name is empty"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_reasons_are_distinct() {
        let reasons = [
            ErrorKind::Configuration.reason(),
            ErrorKind::Credentials.reason(),
            ErrorKind::ZoneDiscovery.reason(),
            ErrorKind::RegistrarApi.reason(),
            ErrorKind::Transport.reason(),
        ];

        for (i, a) in reasons.iter().enumerate() {
            for b in &reasons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
