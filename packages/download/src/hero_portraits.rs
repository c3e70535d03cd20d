//! Hero portrait flow: download each hero's portrait from the static-asset
//! host, named `<ename>_<cname>.<ext>`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hok_assets_fetch::progress::ProgressCallback;
use hok_assets_fetch::{BatchReport, DownloadError, TaskOutcome, browser_client, run_batch};
use hok_assets_models::HeroRecord;

/// Base URL of the hero portrait images.
pub const PORTRAIT_URL_BASE: &str = "https://game.gtimg.cn/images/yxzj/img201606/heroimg";

/// Default hero list file.
pub const DEFAULT_INPUT: &str = "data.json";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "hero_heads";

const REFERER: &str = "https://pvp.qq.com/";

const TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads the portrait for every hero in `input` that carries an
/// `ename`.
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

    log::info!("Downloading {} hero portraits...", heroes.len());

    let report = run_batch(heroes, workers, progress, |hero| {
        let client = client.clone();
        let output_dir = output_dir.to_path_buf();
        async move {
            let Some(ename) = hero.ename else {
                return Ok(TaskOutcome::Skipped);
            };
            let cname = hero.cname.unwrap_or_else(|| crate::UNKNOWN_NAME.to_owned());
            let url = format!("{PORTRAIT_URL_BASE}/{ename}/{ename}.png");
            let label = format!("{cname} ({ename})");
            crate::download_image(&client, &output_dir, &file_stem(ename, &cname), url, &label)
                .await
        }
    })
    .await;

    log::info!("Hero portraits complete — {report}");
    Ok(report)
}

/// Output filename stem: `<ename>_<cname>`.
fn file_stem(ename: u32, cname: &str) -> String {
    format!("{ename}_{cname}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_joins_id_and_name() {
        assert_eq!(file_stem(105, "廉颇"), "105_廉颇");
    }
}
