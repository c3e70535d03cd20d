#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bounded-concurrency best-effort HTTP fetching.
//!
//! Every download flow in the toolchain has the same shape: submit one
//! independent task per identifier to a fixed-size worker pool, persist
//! whatever succeeds, and keep going past whatever fails. [`run_batch`]
//! implements that pattern once: tasks run concurrently up to the worker
//! count, a failing task is tallied and logged but never aborts the batch,
//! and the returned [`BatchReport`] makes the outcome counts observable.
//!
//! [`get_with_fallback`] implements the one retry the flows have: an image
//! URL that answers 404 is retried once under an alternate file extension.
//! It is generic over the fetch closure so the control flow is testable
//! without a network.

pub mod progress;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt as _};

use crate::progress::ProgressCallback;

/// Worker-pool size used by every flow unless overridden.
pub const DEFAULT_WORKERS: usize = 5;

/// Browser-mimicking User-Agent sent on every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header sent by the image clients.
pub const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// Errors from fetch and persist operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP transport error (connect failure, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status where a success was required.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// I/O error reading input or writing payloads to disk.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A fixed header constant failed validation.
    #[error("invalid request header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Final state of one batch task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Payload fetched and persisted.
    Saved,
    /// Required identifier missing; no network call was made.
    Skipped,
    /// Primary and fallback URL both answered not-found.
    NotFound,
    /// Non-200 status or transport error.
    Failed,
}

/// Tally of task outcomes for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Tasks that persisted their payload.
    pub saved: usize,
    /// Tasks skipped for a missing identifier.
    pub skipped: usize,
    /// Tasks whose asset does not exist under either extension.
    pub not_found: usize,
    /// Tasks that failed with a status or transport error.
    pub failed: usize,
}

impl BatchReport {
    /// Total number of completed tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.saved + self.skipped + self.not_found + self.failed
    }

    /// Records one task outcome.
    pub const fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Saved => self.saved += 1,
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::NotFound => self.not_found += 1,
            TaskOutcome::Failed => self.failed += 1,
        }
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} saved, {} skipped, {} not found, {} failed",
            self.saved, self.skipped, self.not_found, self.failed
        )
    }
}

/// Runs one task per item on a worker pool of `workers` concurrent tasks.
///
/// Each task runs independently to completion regardless of other tasks'
/// outcomes; an `Err` is caught at the task boundary, logged, and tallied
/// as failed. Completion order is unspecified. The batch is done once
/// every submitted task has completed; there is no batch-level
/// cancellation, and the only per-request control is the client timeout.
///
/// A `workers` of `0` is treated as `1`.
pub async fn run_batch<T, F, Fut>(
    items: Vec<T>,
    workers: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
    task: F,
) -> BatchReport
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<TaskOutcome, DownloadError>>,
{
    if let Some(p) = progress {
        p.set_total(items.len() as u64);
    }

    let mut report = BatchReport::default();
    let mut outcomes = stream::iter(items.into_iter().map(task)).buffer_unordered(workers.max(1));

    while let Some(result) = outcomes.next().await {
        let outcome = result.unwrap_or_else(|e| {
            log::warn!("task error: {e}");
            TaskOutcome::Failed
        });
        report.record(outcome);
        if let Some(p) = progress {
            p.inc(1);
        }
    }

    report
}

/// Builds a client with the browser User-Agent, the given Referer, and a
/// fixed per-request timeout.
///
/// # Errors
///
/// Returns [`DownloadError`] if the client cannot be constructed.
pub fn browser_client(referer: &str, timeout: Duration) -> Result<reqwest::Client, DownloadError> {
    client_with_headers(referer, timeout, None)
}

/// Like [`browser_client`], plus the image Accept header the site expects
/// on asset requests.
///
/// # Errors
///
/// Returns [`DownloadError`] if the client cannot be constructed.
pub fn image_client(referer: &str, timeout: Duration) -> Result<reqwest::Client, DownloadError> {
    client_with_headers(referer, timeout, Some(IMAGE_ACCEPT))
}

fn client_with_headers(
    referer: &str,
    timeout: Duration,
    accept: Option<&str>,
) -> Result<reqwest::Client, DownloadError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::REFERER,
        reqwest::header::HeaderValue::from_str(referer)?,
    );
    if let Some(accept) = accept {
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_str(accept)?,
        );
    }

    Ok(reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

/// Result of one best-effort GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// Status 200; the response body.
    Ok(Vec<u8>),
    /// Status 404.
    NotFound,
    /// Any other non-success status.
    Status(u16),
}

/// Issues a GET and classifies the response by status.
///
/// # Errors
///
/// Returns [`DownloadError::Http`] on transport failure or timeout; status
/// codes are data, not errors.
pub async fn get_bytes(client: &reqwest::Client, url: &str) -> Result<GetOutcome, DownloadError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(GetOutcome::Ok(response.bytes().await?.to_vec()));
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(GetOutcome::NotFound);
    }
    Ok(GetOutcome::Status(status.as_u16()))
}

/// Result of one text GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    /// Status 200; the decoded body.
    Ok(String),
    /// Any non-success status.
    Status(u16),
}

/// Issues a GET and decodes the body as text.
///
/// `default_charset` applies when the response carries no charset of its
/// own; the hero detail pages are GBK-encoded without declaring it.
///
/// # Errors
///
/// Returns [`DownloadError::Http`] on transport failure or timeout.
pub async fn get_text(
    client: &reqwest::Client,
    url: &str,
    default_charset: &str,
) -> Result<TextOutcome, DownloadError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Ok(TextOutcome::Status(status.as_u16()));
    }
    Ok(TextOutcome::Ok(response.text_with_charset(default_charset).await?))
}

/// Issues a GET and parses the body as JSON. Any non-success status is an
/// error; this is for listings the caller cannot proceed without.
///
/// # Errors
///
/// Returns [`DownloadError::Http`] on transport failure,
/// [`DownloadError::HttpStatus`] on a non-success status.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, DownloadError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }
    Ok(response.json().await?)
}

/// Result of a primary-then-fallback GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// One of the two URLs answered 200; `url` is whichever served the
    /// bytes, so the caller persists under the matching extension.
    Fetched {
        /// The URL that served the payload.
        url: String,
        /// The payload.
        bytes: Vec<u8>,
    },
    /// The primary answered 404 and the fallback did not answer 200.
    NotFound,
    /// The primary answered a non-404, non-success status. No retry.
    Status {
        /// The primary URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}

/// Fetches `primary`, retrying once against `fallback` on a 404.
///
/// Only a 404 triggers the fallback; any other non-success primary status
/// is final. A fallback response other than 200 is a final not-found:
/// the asset simply does not exist under either extension.
///
/// Generic over the `fetch` closure (normally a [`get_bytes`] wrapper) so
/// the control flow is unit-testable.
///
/// # Errors
///
/// Propagates [`DownloadError`] from either fetch; transport errors are
/// handled at the batch boundary, not here.
pub async fn get_with_fallback<F, Fut>(
    primary: String,
    fallback: String,
    fetch: F,
) -> Result<FallbackOutcome, DownloadError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<GetOutcome, DownloadError>>,
{
    match fetch(primary.clone()).await? {
        GetOutcome::Ok(bytes) => Ok(FallbackOutcome::Fetched {
            url: primary,
            bytes,
        }),
        GetOutcome::Status(status) => Ok(FallbackOutcome::Status {
            url: primary,
            status,
        }),
        GetOutcome::NotFound => match fetch(fallback.clone()).await? {
            GetOutcome::Ok(bytes) => Ok(FallbackOutcome::Fetched {
                url: fallback,
                bytes,
            }),
            GetOutcome::NotFound | GetOutcome::Status(_) => Ok(FallbackOutcome::NotFound),
        },
    }
}

/// Rewrites a `.png` URL to its `.jpg` fallback variant.
#[must_use]
pub fn jpg_fallback(url: &str) -> String {
    url.replace(".png", ".jpg")
}

/// File extension matching the URL a payload was served from.
#[must_use]
pub fn url_extension(url: &str) -> &'static str {
    if url.ends_with(".jpg") { "jpg" } else { "png" }
}

/// Writes a payload to `path`, unconditionally replacing any previous
/// content.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the write fails.
pub async fn save_bytes(path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| DownloadError::Io {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn io_error() -> DownloadError {
        DownloadError::Io {
            path: "x".to_owned(),
            source: std::io::Error::other("boom"),
        }
    }

    #[test]
    fn jpg_fallback_rewrites_extension() {
        assert_eq!(
            jpg_fallback("https://game.gtimg.cn/images/yxzj/img201606/itemimg/1111.png"),
            "https://game.gtimg.cn/images/yxzj/img201606/itemimg/1111.jpg"
        );
    }

    #[test]
    fn url_extension_matches_serving_url() {
        assert_eq!(url_extension("https://host/a/105.png"), "png");
        assert_eq!(url_extension("https://host/a/105.jpg"), "jpg");
    }

    #[test]
    fn report_tallies_and_displays() {
        let mut report = BatchReport::default();
        report.record(TaskOutcome::Saved);
        report.record(TaskOutcome::Saved);
        report.record(TaskOutcome::Skipped);
        report.record(TaskOutcome::NotFound);
        report.record(TaskOutcome::Failed);
        assert_eq!(report.total(), 5);
        assert_eq!(report.to_string(), "2 saved, 1 skipped, 1 not found, 1 failed");
    }

    #[tokio::test]
    async fn batch_completes_all_tasks_and_counts_failures() {
        let items: Vec<usize> = (0..6).collect();
        let report = run_batch(items, 3, None, |i| async move {
            if i == 2 || i == 4 {
                Err(io_error())
            } else {
                Ok(TaskOutcome::Saved)
            }
        })
        .await;

        assert_eq!(report.total(), 6);
        assert_eq!(report.failed, 2);
        assert_eq!(report.saved, 4);
    }

    #[tokio::test]
    async fn batch_never_exceeds_worker_count() {
        let in_flight = &AtomicUsize::new(0);
        let peak = &AtomicUsize::new(0);

        let report = run_batch((0..20).collect(), 3, None, |_| async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(TaskOutcome::Saved)
        })
        .await;

        assert_eq!(report.saved, 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn zero_workers_is_clamped_to_one() {
        let report = run_batch(vec![1, 2, 3], 0, None, |_| async { Ok(TaskOutcome::Saved) }).await;
        assert_eq!(report.saved, 3);
    }

    #[tokio::test]
    async fn empty_batch_reports_nothing() {
        let report = run_batch(Vec::<u32>::new(), 5, None, |_: u32| async {
            Ok(TaskOutcome::Saved)
        })
        .await;
        assert_eq!(report, BatchReport::default());
    }

    #[tokio::test]
    async fn fallback_untouched_when_primary_succeeds() {
        let calls = &AtomicUsize::new(0);
        let outcome = get_with_fallback("a.png".to_owned(), "a.jpg".to_owned(), |_| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(GetOutcome::Ok(vec![1, 2]))
        })
        .await
        .unwrap();

        assert_eq!(
            outcome,
            FallbackOutcome::Fetched {
                url: "a.png".to_owned(),
                bytes: vec![1, 2],
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn primary_404_falls_back_to_jpg() {
        let outcome = get_with_fallback("a.png".to_owned(), "a.jpg".to_owned(), |url| async move {
            if url.ends_with(".png") {
                Ok(GetOutcome::NotFound)
            } else {
                Ok(GetOutcome::Ok(vec![7]))
            }
        })
        .await
        .unwrap();

        assert_eq!(
            outcome,
            FallbackOutcome::Fetched {
                url: "a.jpg".to_owned(),
                bytes: vec![7],
            }
        );
    }

    #[tokio::test]
    async fn both_extensions_missing_is_not_found() {
        let outcome = get_with_fallback("a.png".to_owned(), "a.jpg".to_owned(), |_| async {
            Ok(GetOutcome::NotFound)
        })
        .await
        .unwrap();
        assert_eq!(outcome, FallbackOutcome::NotFound);
    }

    #[tokio::test]
    async fn fallback_error_status_is_final_not_found() {
        let outcome = get_with_fallback("a.png".to_owned(), "a.jpg".to_owned(), |url| async move {
            if url.ends_with(".png") {
                Ok(GetOutcome::NotFound)
            } else {
                Ok(GetOutcome::Status(500))
            }
        })
        .await
        .unwrap();
        assert_eq!(outcome, FallbackOutcome::NotFound);
    }

    #[tokio::test]
    async fn non_404_status_is_final_and_skips_fallback() {
        let calls = &AtomicUsize::new(0);
        let outcome = get_with_fallback("a.png".to_owned(), "a.jpg".to_owned(), |_| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(GetOutcome::Status(403))
        })
        .await
        .unwrap();

        assert_eq!(
            outcome,
            FallbackOutcome::Status {
                url: "a.png".to_owned(),
                status: 403,
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn save_bytes_overwrites_previous_content() {
        let dir = std::env::temp_dir().join(format!("hok_assets_fetch_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("105.png");

        save_bytes(&path, b"first version, much longer").await.unwrap();
        save_bytes(&path, b"second").await.unwrap();

        let content = tokio::fs::read(&path).await.unwrap();
        assert_eq!(content, b"second");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
