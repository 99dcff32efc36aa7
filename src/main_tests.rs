// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - signal handling

#[cfg(test)]
mod tests {
    use super::super::shutdown_signal;
    use std::time::Duration as StdDuration;
    use tokio::time::timeout;

    /// Without a signal the shutdown future stays pending
    #[tokio::test]
    async fn test_shutdown_signal_pending_without_signal() {
        let result = timeout(StdDuration::from_millis(100), shutdown_signal()).await;

        assert!(
            result.is_err(),
            "shutdown_signal() should not resolve when no signal is sent"
        );
    }
}
