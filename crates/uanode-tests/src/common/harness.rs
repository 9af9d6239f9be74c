// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Timeouts for async tests, threads for blocking calls, captured log
//! output and temporary settings files.

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;

/// Default timeout for one async test step.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `future`, panicking if it does not finish within `timeout`.
pub async fn with_timeout<F: Future>(timeout: Duration, future: F) -> F::Output {
    match tokio::time::timeout(timeout, future).await {
        Ok(output) => output,
        Err(_) => panic!("Test step timed out after {:?}", timeout),
    }
}

/// Runs a blocking closure on its own thread and returns its result.
///
/// Blocking accessor calls must not run on a runtime worker; async tests
/// use this to reach them.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match thread::spawn(f).join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

// =============================================================================
// Captured Logs
// =============================================================================

/// Log output collected from the current thread.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Returns everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug-level subscriber scoped to this thread and returns
/// its result together with the captured output.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let output = tracing::subscriber::with_default(subscriber, f);
    (output, logs)
}

// =============================================================================
// Settings Files
// =============================================================================

/// A temporary directory holding settings files.
pub struct SettingsDir {
    dir: TempDir,
}

impl SettingsDir {
    /// Creates an empty directory.
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("uanode_test_{}_", super::unique_test_id()))
            .tempdir()
            .expect("Failed to create temp directory");
        Self { dir }
    }

    /// Writes `content` to `name` and returns the path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("Failed to create settings file");
        file.write_all(content.as_bytes())
            .expect("Failed to write settings file");
        path
    }

    /// Returns a path in the directory without creating it.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for SettingsDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_returns_output() {
        let value = with_timeout(DEFAULT_TIMEOUT, async { 42 }).await;
        assert_eq!(value, 42);
    }

    #[tokio::test]
    #[should_panic(expected = "timed out")]
    async fn test_with_timeout_panics() {
        with_timeout(Duration::from_millis(10), futures::future::pending::<()>()).await;
    }

    #[test]
    fn test_capture_logs_collects_events() {
        let (value, logs) = capture_logs(|| {
            tracing::warn!(node_id = "ns=1;i=7", "captured");
            7
        });
        assert_eq!(value, 7);
        assert!(logs.contents().contains("captured"));
        assert!(logs.contents().contains("WARN"));
    }

    #[test]
    fn test_settings_dir_writes_files() {
        let dir = SettingsDir::new();
        let path = dir.write("client.yaml", "namespaces: []\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "namespaces: []\n");
        assert!(!dir.path("missing.yaml").exists());
    }
}
