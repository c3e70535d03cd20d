//! Interactive flow picker shown when the binary is invoked bare.

use dialoguer::Select;

use hok_assets_cli_utils::MultiProgress;
use hok_assets_fetch::DEFAULT_WORKERS;

use crate::{hero_details, hero_portraits, item_icons, summoner_skills};

/// Selectable download flows.
enum Flow {
    All,
    HeroDetails,
    HeroPortraits,
    ItemIcons,
    SummonerSkills,
}

impl Flow {
    const ALL: &[Self] = &[
        Self::All,
        Self::HeroDetails,
        Self::HeroPortraits,
        Self::ItemIcons,
        Self::SummonerSkills,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::All => "Download everything",
            Self::HeroDetails => "Scrape hero details",
            Self::HeroPortraits => "Download hero portraits",
            Self::ItemIcons => "Download item icons",
            Self::SummonerSkills => "Download summoner skills",
        }
    }
}

/// Prompts for a flow and runs it with the default paths and worker count.
///
/// # Errors
///
/// Returns an error if the prompt or the selected flow fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("HoK Assets Toolchain");
    println!();

    let labels: Vec<&str> = Flow::ALL.iter().map(Flow::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to download?")
        .items(&labels)
        .default(0)
        .interact()?;

    let workers = DEFAULT_WORKERS;

    match Flow::ALL[idx] {
        Flow::All => crate::run_all(multi, workers).await,
        Flow::HeroDetails => {
            crate::run_hero_details(
                multi,
                std::path::Path::new(hero_details::DEFAULT_INPUT),
                std::path::Path::new(hero_details::DEFAULT_OUTPUT),
                workers,
            )
            .await?;
        }
        Flow::HeroPortraits => {
            crate::run_hero_portraits(
                multi,
                std::path::Path::new(hero_portraits::DEFAULT_INPUT),
                std::path::Path::new(hero_portraits::DEFAULT_OUTPUT),
                workers,
            )
            .await?;
        }
        Flow::ItemIcons => {
            crate::run_item_icons(
                multi,
                std::path::Path::new(item_icons::DEFAULT_INPUT),
                std::path::Path::new(item_icons::DEFAULT_OUTPUT),
                workers,
            )
            .await?;
        }
        Flow::SummonerSkills => {
            crate::run_summoner_skills(
                multi,
                std::path::Path::new(summoner_skills::DEFAULT_OUTPUT),
                workers,
            )
            .await?;
        }
    }

    Ok(())
}
