#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Record types shared across the hok-assets toolchain.
//!
//! The input types ([`HeroRecord`], [`ItemRecord`], [`SummonerSkill`])
//! mirror the identifier listings published by the game site. Every field
//! is optional; a record missing the identifier a flow needs is skipped,
//! never an error.
//!
//! [`HeroDetail`] is the structured output of the hero detail extractor.
//! All of its fields default to empty values; the extractor fills in
//! whatever the source markup provides.

use serde::{Deserialize, Serialize};

/// One entry of the hero list (`herolist.json`).
///
/// `id_name` keys the detail-page URL; `ename`/`cname` key the portrait
/// image URL and filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    /// URL slug of the hero's detail page (e.g. `"lianpo"`).
    #[serde(default)]
    pub id_name: Option<String>,
    /// Numeric hero id used by the static-asset host (e.g. `105`).
    #[serde(default)]
    pub ename: Option<u32>,
    /// Display name (e.g. `"廉颇"`).
    #[serde(default)]
    pub cname: Option<String>,
}

/// One entry of the item list (`item.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Numeric item id used by the static-asset host.
    #[serde(default)]
    pub item_id: Option<u32>,
    /// Display name.
    #[serde(default)]
    pub item_name: Option<String>,
}

/// One entry of the remote summoner-skill listing (`summoner.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonerSkill {
    /// Numeric skill id used by the static-asset host.
    #[serde(default)]
    pub summoner_id: Option<u32>,
    /// Display name.
    #[serde(default)]
    pub summoner_name: Option<String>,
}

/// Structured data extracted from one hero detail page.
///
/// Serialized one-per-hero as `<id_name>.json`. Every field degrades to
/// its [`Default`] when the source markup lacks the corresponding element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroDetail {
    /// Hero tagline from the page header.
    pub title: String,
    /// Hero display name from the page header.
    pub name: String,
    /// The four rated attribute slots.
    pub attributes: HeroAttributes,
    /// Skills in document order, aligned across the page's parallel lists.
    pub skills: Vec<Skill>,
    /// Recommended winning/losing item builds.
    pub recommended_builds: RecommendedBuilds,
    /// Recommended inscription ids.
    pub inscriptions: Vec<String>,
    /// Hero relationship categories.
    pub relations: HeroRelations,
}

/// The four rated attribute slots of a hero.
///
/// Values are string-encoded integers recovered from the site's
/// `hero-attr<slot>-<value>` class convention; an absent slot reads `"0"`.
/// The serialized keys are the site's original labels so the output JSON
/// stays compatible with consumers of the upstream data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroAttributes {
    /// Slot 1: survivability.
    #[serde(rename = "生存")]
    pub survivability: String,
    /// Slot 2: attack.
    #[serde(rename = "攻击")]
    pub attack: String,
    /// Slot 3: skill dependence.
    #[serde(rename = "技能")]
    pub skill_dependence: String,
    /// Slot 4: difficulty.
    #[serde(rename = "难度")]
    pub difficulty: String,
}

impl Default for HeroAttributes {
    fn default() -> Self {
        Self {
            survivability: "0".to_owned(),
            attack: "0".to_owned(),
            skill_dependence: "0".to_owned(),
            difficulty: "0".to_owned(),
        }
    }
}

/// One skill, reassembled from the page's four parallel element lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name. Never empty; nameless positions are dropped.
    pub name: String,
    /// Short stat line (cooldown/cost).
    pub info: String,
    /// Long description.
    pub description: String,
    /// Usage tips.
    pub tips: String,
}

/// Recommended item builds, in document order: winning first, losing second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedBuilds {
    /// Item ids of the build recommended when ahead.
    pub winning_build: Vec<String>,
    /// Item ids of the build recommended when behind.
    pub losing_build: Vec<String>,
}

/// The three hero relationship categories, positional in the source markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRelations {
    /// Heroes this hero pairs well with.
    pub best_partners: Vec<RelationEntry>,
    /// Heroes this hero is countered by.
    pub restrained_by: Vec<RelationEntry>,
    /// Heroes this hero counters.
    pub restrains_who: Vec<RelationEntry>,
}

/// One related hero and the site's free-text reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEntry {
    /// Image reference of the related hero, treated as its identifier.
    pub hero_id: String,
    /// Free-text explanation.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_record_tolerates_missing_and_extra_fields() {
        let record: HeroRecord =
            serde_json::from_str(r#"{"cname": "廉颇", "hero_type": 3}"#).unwrap();
        assert_eq!(record.cname.as_deref(), Some("廉颇"));
        assert!(record.id_name.is_none());
        assert!(record.ename.is_none());
    }

    #[test]
    fn attributes_serialize_under_site_keys() {
        let attrs = HeroAttributes {
            survivability: "7".to_owned(),
            attack: "5".to_owned(),
            skill_dependence: "3".to_owned(),
            difficulty: "4".to_owned(),
        };
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["生存"], "7");
        assert_eq!(json["攻击"], "5");
        assert_eq!(json["技能"], "3");
        assert_eq!(json["难度"], "4");
    }

    #[test]
    fn default_attributes_read_zero() {
        let attrs = HeroAttributes::default();
        assert_eq!(attrs.survivability, "0");
        assert_eq!(attrs.difficulty, "0");
    }

    #[test]
    fn default_detail_is_all_empty() {
        let detail = HeroDetail::default();
        assert!(detail.title.is_empty());
        assert!(detail.skills.is_empty());
        assert!(detail.recommended_builds.winning_build.is_empty());
        assert!(detail.relations.best_partners.is_empty());
    }

    #[test]
    fn summoner_skill_parses_listing_entry() {
        let skill: SummonerSkill =
            serde_json::from_str(r#"{"summoner_id": 80104, "summoner_name": "终结"}"#).unwrap();
        assert_eq!(skill.summoner_id, Some(80104));
        assert_eq!(skill.summoner_name.as_deref(), Some("终结"));
    }
}
