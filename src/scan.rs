//! Scan helpers: scan-wide listing, statistics, polling and exports.

use std::path::Path;
use std::time::Duration;

use serde_json::{json, Value};

use crate::client::RipsClient;
use crate::error::{Result, RipsError};
use crate::models::{ExportFormat, ScanProgress};
use crate::resource::decode_as;

/// Default pause between two scan status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Limits for [`RipsClient::block_until_done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time budget. Zero waits indefinitely.
    pub wait: Duration,
    /// Pause between checks.
    pub sleep: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            wait: Duration::ZERO,
            sleep: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    /// Poll every `sleep`, give up after roughly `wait`.
    pub fn new(wait: Duration, sleep: Duration) -> Self {
        Self { wait, sleep }
    }

    /// Whether the check numbered `iteration` (from zero) exceeds `wait / sleep`.
    fn exhausted(&self, iteration: u64) -> bool {
        if self.wait.is_zero() {
            return false;
        }
        let sleep = self.sleep.max(Duration::from_millis(1));
        u128::from(iteration) * sleep.as_nanos() > self.wait.as_nanos()
    }
}

impl RipsClient {
    /// Scans of every application.
    pub async fn all_scans(&self, query: &Value) -> Result<Value> {
        self.applications.get_path(&[], "scans/all", query).await
    }

    /// Statistics for one scan.
    pub async fn scan_stats(&self, application_id: u64, scan_id: u64) -> Result<Value> {
        self.scans
            .get_path(
                &[application_id],
                "stats",
                &json!({ "equal": { "id": scan_id } }),
            )
            .await
    }

    /// Start a new scan.
    pub async fn start_scan(&self, application_id: u64, input: &Value) -> Result<Value> {
        self.scans
            .create(&[application_id], input, &Value::Null)
            .await
    }

    /// Current progress of a scan.
    pub async fn scan_progress(&self, application_id: u64, scan_id: u64) -> Result<ScanProgress> {
        let scan = self
            .scans
            .get_by_id(&[application_id], scan_id, &Value::Null)
            .await?;
        decode_as(scan)
    }

    /// Block until the scan reports phase 0 at 100 percent.
    ///
    /// Checks once per `options.sleep`. With a non-zero `options.wait` the
    /// call fails with [`RipsError::ScanTimeout`] once the iteration count
    /// exceeds `wait / sleep`.
    #[tracing::instrument(skip(self))]
    pub async fn block_until_done(
        &self,
        application_id: u64,
        scan_id: u64,
        options: WaitOptions,
    ) -> Result<()> {
        let mut iteration = 0u64;
        loop {
            let progress = self.scan_progress(application_id, scan_id).await?;
            if progress.is_finished() {
                tracing::debug!(iteration, "scan finished");
                return Ok(());
            }

            if options.exhausted(iteration) {
                return Err(RipsError::ScanTimeout {
                    application_id,
                    scan_id,
                    waited: options.wait,
                });
            }

            tracing::debug!(
                iteration,
                phase = progress.phase,
                percent = progress.percent,
                "scan still running"
            );
            tokio::time::sleep(options.sleep).await;
            iteration += 1;
        }
    }

    /// Download a scan export to `out_file`. Returns the bytes written.
    #[tracing::instrument(skip(self, query))]
    pub async fn export(
        &self,
        application_id: u64,
        scan_id: u64,
        format: ExportFormat,
        out_file: &Path,
        query: &Value,
    ) -> Result<u64> {
        self.exports
            .download(
                &[application_id, scan_id],
                format.path_segment(),
                query,
                out_file,
            )
            .await
    }
}
