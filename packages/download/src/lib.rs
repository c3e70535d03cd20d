#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Download flows for Honor of Kings assets.
//!
//! Four independent flows, each a bounded one-shot batch of HTTP GETs:
//!
//! - [`hero_details`]: scrape hero detail pages into per-hero JSON
//! - [`hero_portraits`]: hero portrait images
//! - [`item_icons`]: item icon images
//! - [`summoner_skills`]: summoner skill icons (listing fetched remotely)
//!
//! The flows share no state; each loads its identifier records, runs its
//! tasks on a worker pool via [`hok_assets_fetch::run_batch`], and logs a
//! per-item status line plus a final tally. A missing or malformed input
//! file is fatal before any task is scheduled; everything after that is
//! best-effort.

pub mod hero_details;
pub mod hero_portraits;
pub mod interactive;
pub mod item_icons;
pub mod summoner_skills;

use std::path::Path;

use serde::de::DeserializeOwned;

use hok_assets_cli_utils::{IndicatifProgress, MultiProgress};
use hok_assets_fetch::{
    BatchReport, DownloadError, FallbackOutcome, TaskOutcome, get_bytes, get_with_fallback,
    jpg_fallback, save_bytes, url_extension,
};

/// Placeholder display name for records that carry none.
pub(crate) const UNKNOWN_NAME: &str = "未知";

/// Reads an identifier listing from a local JSON file.
///
/// # Errors
///
/// Returns [`DownloadError`] if the file cannot be read or parsed; fatal
/// for the calling flow.
pub(crate) fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DownloadError> {
    let raw = std::fs::read_to_string(path).map_err(|e| DownloadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Creates the output directory (and parents) if it does not exist.
pub(crate) async fn ensure_dir(dir: &Path) -> Result<(), DownloadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DownloadError::Io {
            path: dir.display().to_string(),
            source: e,
        })
}

/// Fetches one image with the `.png` to `.jpg` fallback and persists it as
/// `<stem>.<ext>` under whichever extension served the bytes.
pub(crate) async fn download_image(
    client: &reqwest::Client,
    output_dir: &Path,
    stem: &str,
    primary_url: String,
    label: &str,
) -> Result<TaskOutcome, DownloadError> {
    let fallback_url = jpg_fallback(&primary_url);
    let fetch_client = client.clone();

    let outcome = get_with_fallback(primary_url, fallback_url, move |url| {
        let client = fetch_client.clone();
        async move { get_bytes(&client, &url).await }
    })
    .await?;

    match outcome {
        FallbackOutcome::Fetched { url, bytes } => {
            let path = output_dir.join(format!("{stem}.{}", url_extension(&url)));
            save_bytes(&path, &bytes).await?;
            log::info!("saved {label} -> {}", path.display());
            Ok(TaskOutcome::Saved)
        }
        FallbackOutcome::NotFound => {
            log::warn!("not found under either extension: {label}");
            Ok(TaskOutcome::NotFound)
        }
        FallbackOutcome::Status { url, status } => {
            log::warn!("HTTP {status} for {url}");
            Ok(TaskOutcome::Failed)
        }
    }
}

/// Runs the hero detail flow with an attached progress bar.
///
/// # Errors
///
/// Returns [`DownloadError`] if the input file cannot be loaded or the
/// output directory cannot be created.
pub async fn run_hero_details(
    multi: &MultiProgress,
    input: &Path,
    output: &Path,
    workers: usize,
) -> Result<BatchReport, DownloadError> {
    let progress = IndicatifProgress::batch_bar(multi, "Hero details");
    let report = hero_details::run(input, output, workers, Some(&progress)).await;
    finish_bar(&progress, "Hero details", &report);
    report
}

/// Runs the hero portrait flow with an attached progress bar.
///
/// # Errors
///
/// Returns [`DownloadError`] if the input file cannot be loaded or the
/// output directory cannot be created.
pub async fn run_hero_portraits(
    multi: &MultiProgress,
    input: &Path,
    output: &Path,
    workers: usize,
) -> Result<BatchReport, DownloadError> {
    let progress = IndicatifProgress::batch_bar(multi, "Hero portraits");
    let report = hero_portraits::run(input, output, workers, Some(&progress)).await;
    finish_bar(&progress, "Hero portraits", &report);
    report
}

/// Runs the item icon flow with an attached progress bar.
///
/// # Errors
///
/// Returns [`DownloadError`] if the input file cannot be loaded or the
/// output directory cannot be created.
pub async fn run_item_icons(
    multi: &MultiProgress,
    input: &Path,
    output: &Path,
    workers: usize,
) -> Result<BatchReport, DownloadError> {
    let progress = IndicatifProgress::batch_bar(multi, "Item icons");
    let report = item_icons::run(input, output, workers, Some(&progress)).await;
    finish_bar(&progress, "Item icons", &report);
    report
}

/// Runs the summoner skill flow with an attached progress bar.
///
/// # Errors
///
/// Returns [`DownloadError`] if the remote listing cannot be fetched or
/// the output directory cannot be created.
pub async fn run_summoner_skills(
    multi: &MultiProgress,
    output: &Path,
    workers: usize,
) -> Result<BatchReport, DownloadError> {
    let progress = IndicatifProgress::batch_bar(multi, "Summoner skills");
    let report = summoner_skills::run(output, workers, Some(&progress)).await;
    finish_bar(&progress, "Summoner skills", &report);
    report
}

/// Runs every flow in sequence with its default paths.
///
/// The flows are independent; one failing to start does not stop the
/// rest. Per-flow errors are logged and swallowed.
pub async fn run_all(multi: &MultiProgress, workers: usize) {
    if let Err(e) = run_hero_details(
        multi,
        Path::new(hero_details::DEFAULT_INPUT),
        Path::new(hero_details::DEFAULT_OUTPUT),
        workers,
    )
    .await
    {
        log::error!("hero details flow failed: {e}");
    }

    if let Err(e) = run_hero_portraits(
        multi,
        Path::new(hero_portraits::DEFAULT_INPUT),
        Path::new(hero_portraits::DEFAULT_OUTPUT),
        workers,
    )
    .await
    {
        log::error!("hero portrait flow failed: {e}");
    }

    if let Err(e) = run_item_icons(
        multi,
        Path::new(item_icons::DEFAULT_INPUT),
        Path::new(item_icons::DEFAULT_OUTPUT),
        workers,
    )
    .await
    {
        log::error!("item icon flow failed: {e}");
    }

    if let Err(e) = run_summoner_skills(
        multi,
        Path::new(summoner_skills::DEFAULT_OUTPUT),
        workers,
    )
    .await
    {
        log::error!("summoner skill flow failed: {e}");
    }
}

fn finish_bar(
    progress: &std::sync::Arc<dyn hok_assets_fetch::progress::ProgressCallback>,
    label: &str,
    report: &Result<BatchReport, DownloadError>,
) {
    match report {
        Ok(report) => progress.finish(format!("{label} — {report}")),
        Err(_) => progress.finish_and_clear(),
    }
}
