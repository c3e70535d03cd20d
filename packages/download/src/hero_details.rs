//! Hero detail flow: scrape each hero's mobile detail page into a
//! structured JSON record named `<id_name>.json`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hok_assets_fetch::progress::ProgressCallback;
use hok_assets_fetch::{
    BatchReport, DownloadError, TaskOutcome, TextOutcome, browser_client, get_text, run_batch,
    save_bytes,
};
use hok_assets_models::HeroRecord;

/// Base URL of the mobile hero detail pages.
pub const DETAIL_URL_BASE: &str = "https://pvp.qq.com/web201605/herodetail/m";

/// Default hero list file.
pub const DEFAULT_INPUT: &str = "herolist.json";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "hero_details";

const REFERER: &str = "https://pvp.qq.com/";

const TIMEOUT: Duration = Duration::from_secs(10);

/// The mobile pages are GBK-encoded without declaring a charset.
const PAGE_CHARSET: &str = "gbk";

/// Scrapes detail pages for every hero in `input` that carries an
/// `id_name`, writing one JSON record per hero into `output_dir`.
///
/// # Errors
///
/// Returns [`DownloadError`] if the input file cannot be loaded or the
/// output directory cannot be created; per-hero failures are tallied in
/// the returned [`BatchReport`] instead.
pub async fn run(
    input: &Path,
    output_dir: &Path,
    workers: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
) -> Result<BatchReport, DownloadError> {
    let heroes: Vec<HeroRecord> = crate::load_records(input)?;
    crate::ensure_dir(output_dir).await?;
    let client = browser_client(REFERER, TIMEOUT)?;

    log::info!("Scraping {} hero detail pages...", heroes.len());

    let report = run_batch(heroes, workers, progress, |hero| {
        let client = client.clone();
        let output_dir = output_dir.to_path_buf();
        async move { fetch_one(&client, &output_dir, hero).await }
    })
    .await;

    log::info!("Hero details complete — {report}");
    Ok(report)
}

async fn fetch_one(
    client: &reqwest::Client,
    output_dir: &Path,
    hero: HeroRecord,
) -> Result<TaskOutcome, DownloadError> {
    let Some(id_name) = hero.id_name.filter(|id| !id.is_empty()) else {
        return Ok(TaskOutcome::Skipped);
    };

    let url = format!("{DETAIL_URL_BASE}/{id_name}.html");
    match get_text(client, &url, PAGE_CHARSET).await? {
        TextOutcome::Ok(html) => {
            let detail = hok_assets_extract::extract(&html);
            let path = output_dir.join(format!("{id_name}.json"));
            save_bytes(&path, serde_json::to_string_pretty(&detail)?.as_bytes()).await?;
            log::info!("saved {id_name} ({})", detail.name);
            Ok(TaskOutcome::Saved)
        }
        TextOutcome::Status(status) => {
            log::warn!("HTTP {status} for {id_name}");
            Ok(TaskOutcome::Failed)
        }
    }
}
