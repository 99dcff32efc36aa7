// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for TLS configuration loading.

#[cfg(test)]
mod tests {
    use crate::options::{GroupName, TlsFiles};
    use crate::server::tls::load_server_config;
    use crate::server::{router, serve, AppState};
    use crate::solver::SolverRegistry;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::sync::watch;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_certificate_file() {
        let dir = TempDir::new().unwrap();
        let files = TlsFiles {
            cert: dir.path().join("tls.crt"),
            key: dir.path().join("tls.key"),
        };

        let err = load_server_config(&files).unwrap_err();
        assert!(err.to_string().contains("tls.crt"));
    }

    #[test]
    fn test_certificate_file_without_pem_blocks() {
        let cert = write_temp("this is not a certificate\n");
        let key = write_temp("this is not a key\n");
        let files = TlsFiles {
            cert: cert.path().to_path_buf(),
            key: key.path().to_path_buf(),
        };

        let err = load_server_config(&files).unwrap_err();
        assert!(err.to_string().starts_with("No certificates found in"));
    }

    #[test]
    fn test_malformed_certificate_block() {
        let cert = write_temp(
            "-----BEGIN CERTIFICATE-----\n!!!not base64!!!\n-----END CERTIFICATE-----\n",
        );
        let files = TlsFiles {
            cert: cert.path().to_path_buf(),
            key: PathBuf::from("/nonexistent/tls.key"),
        };

        assert!(load_server_config(&files).is_err());
    }

    #[tokio::test]
    async fn test_serve_fails_without_tls_material() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let app = router(Arc::new(AppState::new(
            GroupName::new("acme.example.com").unwrap(),
            SolverRegistry::new(),
        )));
        let files = TlsFiles {
            cert: dir.path().join("tls.crt"),
            key: dir.path().join("tls.key"),
        };

        let result = serve("127.0.0.1:0".parse().unwrap(), app, Some(files), rx).await;
        assert!(result.is_err());
    }
}
