#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the Honor of Kings asset download tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hok_assets_download::{hero_details, hero_portraits, item_icons, summoner_skills};
use hok_assets_fetch::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "hok_assets_download", about = "Honor of Kings asset download tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape hero detail pages into per-hero JSON records
    HeroDetails {
        /// Hero list file (array of records with `id_name`)
        #[arg(long, default_value = hero_details::DEFAULT_INPUT)]
        input: PathBuf,
        /// Output directory for the per-hero JSON files
        #[arg(long, default_value = hero_details::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Number of concurrent download tasks
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Download hero portrait images
    HeroPortraits {
        /// Hero list file (array of records with `ename`/`cname`)
        #[arg(long, default_value = hero_portraits::DEFAULT_INPUT)]
        input: PathBuf,
        /// Output directory for the portrait images
        #[arg(long, default_value = hero_portraits::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Number of concurrent download tasks
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Download item icon images
    ItemIcons {
        /// Item list file (array of records with `item_id`)
        #[arg(long, default_value = item_icons::DEFAULT_INPUT)]
        input: PathBuf,
        /// Output directory for the item icons
        #[arg(long, default_value = item_icons::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Number of concurrent download tasks
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Download summoner skill icons (listing fetched remotely)
    SummonerSkills {
        /// Output directory for the skill icons
        #[arg(long, default_value = summoner_skills::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Number of concurrent download tasks
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Run every download flow in sequence with its default paths
    All {
        /// Number of concurrent download tasks per flow
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = hok_assets_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return hok_assets_download::interactive::run(&multi).await;
    };

    match command {
        Commands::HeroDetails {
            input,
            output,
            workers,
        } => {
            hok_assets_download::run_hero_details(&multi, &input, &output, workers).await?;
        }
        Commands::HeroPortraits {
            input,
            output,
            workers,
        } => {
            hok_assets_download::run_hero_portraits(&multi, &input, &output, workers).await?;
        }
        Commands::ItemIcons {
            input,
            output,
            workers,
        } => {
            hok_assets_download::run_item_icons(&multi, &input, &output, workers).await?;
        }
        Commands::SummonerSkills { output, workers } => {
            hok_assets_download::run_summoner_skills(&multi, &output, workers).await?;
        }
        Commands::All { workers } => {
            hok_assets_download::run_all(&multi, workers).await;
        }
    }

    Ok(())
}
