// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for secret decoding.

#[cfg(test)]
mod tests {
    use crate::credentials::*;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    #[test]
    fn test_secret_data_decodes_data() {
        let secret = Secret {
            data: Some(BTreeMap::from([
                ("key".to_string(), ByteString(b"my-key".to_vec())),
                ("secret".to_string(), ByteString(b"my-secret".to_vec())),
            ])),
            ..Secret::default()
        };

        let data = secret_data(&secret);
        assert_eq!(data.get("key").map(Vec::as_slice), Some(&b"my-key"[..]));
        assert_eq!(data.get("secret").map(Vec::as_slice), Some(&b"my-secret"[..]));
    }

    #[test]
    fn test_string_data_overrides_data() {
        let secret = Secret {
            data: Some(BTreeMap::from([(
                "key".to_string(),
                ByteString(b"old".to_vec()),
            )])),
            string_data: Some(BTreeMap::from([
                ("key".to_string(), "new".to_string()),
                ("extra".to_string(), "value".to_string()),
            ])),
            ..Secret::default()
        };

        let data = secret_data(&secret);
        assert_eq!(data.len(), 2);
        assert_eq!(data["key"], b"new".to_vec());
        assert_eq!(data["extra"], b"value".to_vec());
    }

    #[test]
    fn test_empty_secret() {
        assert!(secret_data(&Secret::default()).is_empty());
    }
}
