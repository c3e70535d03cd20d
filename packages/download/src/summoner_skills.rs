//! Summoner skill flow: fetch the remote skill listing, keep a local copy,
//! then download each skill's icon named `<summoner_id>_<summoner_name>.<ext>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hok_assets_fetch::progress::ProgressCallback;
use hok_assets_fetch::{
    BatchReport, DownloadError, TaskOutcome, browser_client, get_json, run_batch, save_bytes,
};
use hok_assets_models::SummonerSkill;

/// URL of the remote skill listing.
pub const LISTING_URL: &str = "https://pvp.qq.com/web201605/js/summoner.json";

/// Base URL of the skill icon images.
pub const ICON_URL_BASE: &str = "https://game.gtimg.cn/images/yxzj/img201606/summonero";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "summoner_skills";

const REFERER: &str = "https://pvp.qq.com/web201605/summoner.shtml";

const TIMEOUT: Duration = Duration::from_secs(10);

/// Filename of the local copy of the listing, written next to the output
/// directory.
const LISTING_COPY: &str = "summoners_data.json";

/// Fetches the skill listing and downloads every icon.
///
/// Unlike the other flows the identifier listing is remote; failing to
/// fetch it is fatal, since it is this flow's input.
///
/// # Errors
///
/// Returns [`DownloadError`] if the listing cannot be fetched or parsed,
/// or the output directory cannot be created; per-skill failures are
/// tallied in the returned [`BatchReport`] instead.
pub async fn run(
    output_dir: &Path,
    workers: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
) -> Result<BatchReport, DownloadError> {
    let client = browser_client(REFERER, TIMEOUT)?;

    log::info!("Fetching summoner skill listing...");
    let listing = get_json(&client, LISTING_URL).await?;
    let skills: Vec<SummonerSkill> = serde_json::from_value(listing.clone())?;

    crate::ensure_dir(output_dir).await?;

    // Keep a local copy of the listing alongside the icons.
    let listing_path = listing_copy_path(output_dir);
    save_bytes(
        &listing_path,
        serde_json::to_string_pretty(&listing)?.as_bytes(),
    )
    .await?;

    log::info!("Found {} summoner skills, downloading icons...", skills.len());

    let report = run_batch(skills, workers, progress, |skill| {
        let client = client.clone();
        let output_dir = output_dir.to_path_buf();
        async move {
            let Some(summoner_id) = skill.summoner_id else {
                return Ok(TaskOutcome::Skipped);
            };
            let name = skill
                .summoner_name
                .unwrap_or_else(|| crate::UNKNOWN_NAME.to_owned());
            let url = format!("{ICON_URL_BASE}/{summoner_id}.png");
            crate::download_image(
                &client,
                &output_dir,
                &format!("{summoner_id}_{name}"),
                url,
                &name,
            )
            .await
        }
    })
    .await;

    log::info!("Summoner skills complete — {report}");
    Ok(report)
}

/// The listing copy lands next to the output directory, not inside it.
fn listing_copy_path(output_dir: &Path) -> PathBuf {
    output_dir
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(LISTING_COPY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_copy_sits_next_to_relative_output_dir() {
        assert_eq!(
            listing_copy_path(Path::new("summoner_skills")),
            PathBuf::from("summoners_data.json")
        );
    }

    #[test]
    fn listing_copy_sits_next_to_nested_output_dir() {
        assert_eq!(
            listing_copy_path(Path::new("/data/assets/summoner_skills")),
            PathBuf::from("/data/assets/summoners_data.json")
        );
    }
}
