// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the webhook wire types.

#[cfg(test)]
mod tests {
    use crate::challenge::*;
    use crate::errors::SolverError;
    use serde_json::json;

    #[test]
    fn test_deserialize_cleanup_request_with_config() {
        let payload: ChallengePayload = serde_json::from_value(json!({
            "apiVersion": "acme.cert-manager.io/v1alpha1",
            "kind": "ChallengePayload",
            "request": {
                "uid": "abc",
                "action": "CleanUp",
                "type": "dns-01",
                "dnsName": "example.com",
                "key": "token",
                "resourceNamespace": "cert-manager",
                "resolvedFQDN": "_acme-challenge.example.com.",
                "resolvedZone": "example.com.",
                "allowAmbientCredentials": false,
                "config": { "production": true }
            }
        }))
        .unwrap();

        let request = payload.request.unwrap();
        assert_eq!(request.uid, "abc");
        assert_eq!(request.action, ChallengeAction::CleanUp);
        assert_eq!(request.challenge_type, "dns-01");
        assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(request.resolved_zone, "example.com.");
        assert_eq!(request.config, Some(json!({ "production": true })));
    }

    #[test]
    fn test_missing_envelope_fields_default() {
        let payload: ChallengePayload =
            serde_json::from_value(json!({ "request": { "action": "Present" } })).unwrap();

        assert_eq!(payload.api_version, "acme.cert-manager.io/v1alpha1");
        assert_eq!(payload.kind, "ChallengePayload");
        assert!(payload.response.is_none());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_value::<ChallengeRequest>(json!({ "action": "Destroy" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_success_reply_serialization() {
        let reply = ChallengePayload::reply(ChallengeResponse::success("abc"));
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(
            value,
            json!({
                "apiVersion": "acme.cert-manager.io/v1alpha1",
                "kind": "ChallengePayload",
                "response": { "uid": "abc", "success": true }
            })
        );
    }

    #[test]
    fn test_failure_response_carries_message_and_reason() {
        let err = SolverError::SecretNotFound {
            namespace: "default".to_string(),
            name: "godaddy".to_string(),
        };
        let response = ChallengeResponse::failure("abc", &err);

        assert_eq!(response.uid, "abc");
        assert!(!response.success);
        let status = response.status.unwrap();
        assert_eq!(status.status.as_deref(), Some("Failure"));
        assert_eq!(
            status.message.as_deref(),
            Some("secret \"default/godaddy\" not found")
        );
        assert_eq!(status.reason.as_deref(), Some("CredentialsUnresolved"));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ChallengeAction::Present.to_string(), "Present");
        assert_eq!(ChallengeAction::CleanUp.to_string(), "CleanUp");
    }
}
