//! Item icon flow: download each item's icon from the static-asset host,
//! named `<item_id>.<ext>`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hok_assets_fetch::progress::ProgressCallback;
use hok_assets_fetch::{BatchReport, DownloadError, TaskOutcome, image_client, run_batch};
use hok_assets_models::ItemRecord;

/// Base URL of the item icon images.
pub const ITEM_URL_BASE: &str = "https://game.gtimg.cn/images/yxzj/img201606/itemimg";

/// Default item list file.
pub const DEFAULT_INPUT: &str = "item.json";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "images";

const REFERER: &str = "https://pvp.qq.com/";

// The asset host is slower for item icons; give them a little more room.
const TIMEOUT: Duration = Duration::from_secs(15);

/// Downloads the icon for every item in `input` that carries an
/// `item_id`.
///
/// # Errors
///
/// Returns [`DownloadError`] if the input file cannot be loaded or the
/// output directory cannot be created; per-item failures are tallied in
/// the returned [`BatchReport`] instead.
pub async fn run(
    input: &Path,
    output_dir: &Path,
    workers: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
) -> Result<BatchReport, DownloadError> {
    let items: Vec<ItemRecord> = crate::load_records(input)?;
    crate::ensure_dir(output_dir).await?;
    let client = image_client(REFERER, TIMEOUT)?;

    log::info!("Downloading {} item icons...", items.len());

    let report = run_batch(items, workers, progress, |item| {
        let client = client.clone();
        let output_dir = output_dir.to_path_buf();
        async move {
            let Some(item_id) = item.item_id else {
                return Ok(TaskOutcome::Skipped);
            };
            let name = item.item_name.as_deref().unwrap_or(crate::UNKNOWN_NAME);
            let url = format!("{ITEM_URL_BASE}/{item_id}.png");
            let label = format!("{item_id} ({name})");
            crate::download_image(&client, &output_dir, &item_id.to_string(), url, &label).await
        }
    })
    .await;

    log::info!("Item icons complete — {report}");
    Ok(report)
}
