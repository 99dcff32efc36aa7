// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for GoDaddy configuration and record types.

#[cfg(test)]
mod tests {
    use crate::errors::SolverError;
    use crate::godaddy::types::*;
    use secrecy::SecretString;
    use serde_json::json;

    fn valid_config() -> GodaddyDnsProviderConfig {
        load_config(Some(&json!({
            "apiKeyRef": { "name": "godaddy-api-key", "key": "key" },
            "apiSecretRef": { "name": "godaddy-api-key", "key": "secret" }
        })))
        .unwrap()
    }

    #[test]
    fn test_load_config_missing_or_null_is_default() {
        assert_eq!(load_config(None).unwrap(), GodaddyDnsProviderConfig::default());
        assert_eq!(
            load_config(Some(&serde_json::Value::Null)).unwrap(),
            GodaddyDnsProviderConfig::default()
        );
    }

    #[test]
    fn test_load_config_full() {
        let config = load_config(Some(&json!({
            "apiKeyRef": { "name": "creds", "key": "key" },
            "apiSecretRef": { "name": "creds", "key": "secret" },
            "production": true,
            "ttl": 600,
            "timeout": 5,
            "propagationTimeout": 120,
            "pollingInterval": 2,
            "sequenceInterval": 60
        })))
        .unwrap();

        assert_eq!(config.api_key_ref.name, "creds");
        assert_eq!(config.api_secret_ref.key, "secret");
        assert!(config.production);
        assert_eq!(config.record_ttl(), Some(600));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.propagation_timeout, 120);
    }

    #[test]
    fn test_load_config_malformed() {
        let err = load_config(Some(&json!({ "ttl": "ten minutes" }))).unwrap_err();

        assert!(matches!(err, SolverError::ConfigDecode(_)));
        assert!(err.to_string().starts_with("error decoding solver config"));
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = valid_config();
        assert!(!config.production);
        assert_eq!(config.record_ttl(), None);
    }

    #[test]
    fn test_validate_accepts_both_refs() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_key_ref() {
        let mut config = valid_config();
        config.api_key_ref.name.clear();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfig(_)));
        assert!(err.to_string().contains("apiKeyRef"));
    }

    #[test]
    fn test_validate_rejects_missing_secret_ref() {
        let mut config = valid_config();
        config.api_secret_ref = SecretKeySelector::default();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("apiSecretRef"));
    }

    #[test]
    fn test_challenge_record_json() {
        let record = DnsRecord::challenge("_acme-challenge", "token-value", Some(600));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "type": "TXT", "name": "_acme-challenge", "data": "token-value", "ttl": 600 })
        );
    }

    #[test]
    fn test_challenge_record_without_ttl_omits_field() {
        let record = DnsRecord::challenge("_acme-challenge", "token-value", None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "type": "TXT", "name": "_acme-challenge", "data": "token-value" })
        );
    }

    #[test]
    fn test_cleared_record_json() {
        let record = DnsRecord::cleared("_acme-challenge.sub");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "type": "TXT", "name": "_acme-challenge.sub", "data": "null" })
        );
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            api_key: SecretString::from("visible-key".to_string()),
            api_secret: SecretString::from("visible-secret".to_string()),
        };

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("visible-key"));
        assert!(!debug.contains("visible-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
