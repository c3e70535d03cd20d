#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Extracts structured [`HeroDetail`] records from hero detail pages.
//!
//! The mobile detail pages carry their data in a handful of fixed class
//! names, `data-*` attributes, and one numeric-encoding convention: a rated
//! attribute's value is the trailing numeral of a `hero-attr<slot>-<value>`
//! class on the slot's element.
//!
//! [`extract`] is a total function: any element or attribute the page
//! lacks degrades to that field's empty default, never an error. Pages
//! change without notice; a partial record beats no record.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use hok_assets_models::{
    HeroAttributes, HeroDetail, HeroRelations, RecommendedBuilds, RelationEntry, Skill,
};

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".hero-title").expect("valid selector"));
static NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".hero-name").expect("valid selector"));

// The four parallel skill lists. Position i of each belongs to skill i.
static SKILL_NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".plus-name").expect("valid selector"));
static SKILL_INFO_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".plus-value").expect("valid selector"));
static SKILL_DESC_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".plus-int").expect("valid selector"));
static SKILL_TIPS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".prompt").expect("valid selector"));

static EQUIP_LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".equip-list").expect("valid selector"));
static RUNE_LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".rune-list").expect("valid selector"));
static RELA_LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".rela-list").expect("valid selector"));
static RELA_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));
static RELA_IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static RELA_TEXT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".rela-text").expect("valid selector"));

/// Extracts a [`HeroDetail`] from one hero detail page.
///
/// Pure function of the document; never fails. Missing elements yield the
/// documented per-field defaults (empty string/list, `"0"` attributes).
#[must_use]
pub fn extract(html: &str) -> HeroDetail {
    let document = Html::parse_document(html);

    HeroDetail {
        title: first_text(&document, &TITLE_SEL),
        name: first_text(&document, &NAME_SEL),
        attributes: extract_attributes(&document),
        skills: extract_skills(&document),
        recommended_builds: extract_builds(&document),
        inscriptions: extract_inscriptions(&document),
        relations: extract_relations(&document),
    }
}

/// Trimmed text of the first element matching `selector`, or `""`.
fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Concatenated, trimmed text content of an element.
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// The four rated attribute slots.
fn extract_attributes(document: &Html) -> HeroAttributes {
    HeroAttributes {
        survivability: attribute_value(document, 1),
        attack: attribute_value(document, 2),
        skill_dependence: attribute_value(document, 3),
        difficulty: attribute_value(document, 4),
    }
}

/// Recovers the value of attribute slot `slot` from the class list of the
/// `.hero-attr<slot>` element.
///
/// The site encodes the value as a second class of the form
/// `hero-attr<slot>-<value>`; the trailing numeral after the last hyphen is
/// the value. Absent element or class reads `"0"`.
fn attribute_value(document: &Html, slot: u8) -> String {
    let Ok(slot_sel) = Selector::parse(&format!(".hero-attr{slot}")) else {
        return "0".to_owned();
    };
    let Some(el) = document.select(&slot_sel).next() else {
        return "0".to_owned();
    };

    let marker = format!("hero-attr{slot}-");
    el.value()
        .classes()
        .find(|class| class.contains(&marker))
        .and_then(|class| class.rsplit('-').next())
        .map_or_else(|| "0".to_owned(), str::to_owned)
}

/// Reassembles the page's four parallel skill lists into aligned records.
///
/// The name list determines the output length. Positions with an empty
/// name are dropped; the other lists are read with bounds-checked access
/// so a shorter list yields `""` rather than a panic.
fn extract_skills(document: &Html) -> Vec<Skill> {
    let names = all_texts(document, &SKILL_NAME_SEL);
    let infos = all_texts(document, &SKILL_INFO_SEL);
    let descriptions = all_texts(document, &SKILL_DESC_SEL);
    let tips = all_texts(document, &SKILL_TIPS_SEL);

    names
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, name)| Skill {
            name: name.clone(),
            info: infos.get(i).cloned().unwrap_or_default(),
            description: descriptions.get(i).cloned().unwrap_or_default(),
            tips: tips.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Trimmed text of every element matching `selector`, in document order.
fn all_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document.select(selector).map(element_text).collect()
}

/// Recommended builds: first `.equip-list` is the winning build, second the
/// losing build. Fewer than two lists leaves both empty.
fn extract_builds(document: &Html) -> RecommendedBuilds {
    let lists: Vec<ElementRef<'_>> = document.select(&EQUIP_LIST_SEL).collect();
    if lists.len() < 2 {
        return RecommendedBuilds::default();
    }

    RecommendedBuilds {
        winning_build: split_ids(lists[0].value().attr("data-item")),
        losing_build: split_ids(lists[1].value().attr("data-item")),
    }
}

/// Inscription ids from the first `.rune-list` element's `data-ming`.
fn extract_inscriptions(document: &Html) -> Vec<String> {
    document
        .select(&RUNE_LIST_SEL)
        .next()
        .map(|el| split_ids(el.value().attr("data-ming")))
        .unwrap_or_default()
}

/// Splits a `|`-delimited id attribute. Missing or empty reads as no ids.
fn split_ids(attr: Option<&str>) -> Vec<String> {
    match attr {
        None | Some("") => Vec::new(),
        Some(raw) => raw.split('|').map(str::to_owned).collect(),
    }
}

/// The three relationship categories map positionally to the first three
/// `.rela-list` elements, in document order.
fn extract_relations(document: &Html) -> HeroRelations {
    let lists: Vec<ElementRef<'_>> = document.select(&RELA_LIST_SEL).collect();

    HeroRelations {
        best_partners: relation_entries(lists.first()),
        restrained_by: relation_entries(lists.get(1)),
        restrains_who: relation_entries(lists.get(2)),
    }
}

/// All entries of one relationship list. Each `li` yields the related
/// hero's image reference and the free-text reason; a missing sub-element
/// degrades to `""` but never skips the entry.
fn relation_entries(list: Option<&ElementRef<'_>>) -> Vec<RelationEntry> {
    let Some(list) = list else {
        return Vec::new();
    };

    list.select(&RELA_ITEM_SEL)
        .map(|item| RelationEntry {
            hero_id: item
                .select(&RELA_IMG_SEL)
                .next()
                .and_then(|img| img.value().attr("data-src"))
                .unwrap_or_default()
                .to_owned(),
            reason: item
                .select(&RELA_TEXT_SEL)
                .next()
                .map(element_text)
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
          <div class="hero-title">北境守护</div>
          <div class="hero-name">亚瑟</div>
          <span class="hero-attr1 hero-attr1-8"></span>
          <span class="hero-attr2 hero-attr2-6"></span>
          <span class="hero-attr3 hero-attr3-4"></span>
          <span class="hero-attr4 hero-attr4-3"></span>
          <p class="plus-name">圣骑之力</p>
          <p class="plus-name">誓约之盾</p>
          <p class="plus-value">冷却值：10 消耗：0</p>
          <p class="plus-value">冷却值：8 消耗：0</p>
          <p class="plus-int">亚瑟挥舞大剑造成伤害。</p>
          <p class="plus-int">亚瑟举盾冲锋。</p>
          <p class="prompt">贴近敌方射手释放。</p>
          <p class="prompt">用于开团或逃生。</p>
          <ul class="equip-list" data-item="1111|1112|1113"></ul>
          <ul class="equip-list" data-item="2221|2222"></ul>
          <div class="rune-list" data-ming="1514|1514|3515"></div>
          <ul class="rela-list">
            <li><img data-src="506.jpg"><p class="rela-text">前排开团，后排收割。</p></li>
            <li><img data-src="157.jpg"><p class="rela-text">双边路压制。</p></li>
          </ul>
          <ul class="rela-list">
            <li><img data-src="106.jpg"><p class="rela-text">被消耗打法克制。</p></li>
          </ul>
          <ul class="rela-list">
            <li><img data-src="193.jpg"><p class="rela-text">近身后优势明显。</p></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn extracts_full_page() {
        let detail = extract(FULL_PAGE);

        assert_eq!(detail.title, "北境守护");
        assert_eq!(detail.name, "亚瑟");
        assert_eq!(detail.attributes.survivability, "8");
        assert_eq!(detail.attributes.attack, "6");
        assert_eq!(detail.attributes.skill_dependence, "4");
        assert_eq!(detail.attributes.difficulty, "3");

        assert_eq!(detail.skills.len(), 2);
        assert_eq!(detail.skills[0].name, "圣骑之力");
        assert_eq!(detail.skills[0].info, "冷却值：10 消耗：0");
        assert_eq!(detail.skills[1].description, "亚瑟举盾冲锋。");
        assert_eq!(detail.skills[1].tips, "用于开团或逃生。");

        assert_eq!(
            detail.recommended_builds.winning_build,
            vec!["1111", "1112", "1113"]
        );
        assert_eq!(detail.recommended_builds.losing_build, vec!["2221", "2222"]);

        assert_eq!(detail.inscriptions, vec!["1514", "1514", "3515"]);

        assert_eq!(detail.relations.best_partners.len(), 2);
        assert_eq!(detail.relations.best_partners[0].hero_id, "506.jpg");
        assert_eq!(detail.relations.restrained_by[0].reason, "被消耗打法克制。");
        assert_eq!(detail.relations.restrains_who[0].hero_id, "193.jpg");
    }

    #[test]
    fn empty_document_yields_all_defaults() {
        let detail = extract("<html><body></body></html>");
        assert_eq!(detail, HeroDetail::default());
    }

    #[test]
    fn arbitrary_text_never_panics() {
        let detail = extract("<<<<not really html >> & garbage \u{0}");
        assert_eq!(detail.name, "");
        assert!(detail.skills.is_empty());
    }

    #[test]
    fn attribute_without_value_class_reads_zero() {
        // Slot element present but no hero-attr1-<n> class on it.
        let detail = extract(r#"<span class="hero-attr1"></span>"#);
        assert_eq!(detail.attributes.survivability, "0");
        // Slot element entirely absent.
        assert_eq!(detail.attributes.attack, "0");
    }

    #[test]
    fn attribute_value_is_trailing_numeral_after_last_hyphen() {
        let detail = extract(r#"<span class="hero-attr2 hero-attr2-10 other"></span>"#);
        assert_eq!(detail.attributes.attack, "10");
    }

    #[test]
    fn short_parallel_lists_degrade_to_empty_strings() {
        let html = r#"
            <p class="plus-name">一技能</p>
            <p class="plus-name">二技能</p>
            <p class="plus-name">三技能</p>
            <p class="plus-value">冷却值：5</p>
            <p class="plus-int">描述一</p>
        "#;
        let detail = extract(html);

        assert_eq!(detail.skills.len(), 3);
        assert_eq!(detail.skills[0].info, "冷却值：5");
        assert_eq!(detail.skills[1].info, "");
        assert_eq!(detail.skills[2].description, "");
        assert_eq!(detail.skills[2].tips, "");
    }

    #[test]
    fn nameless_skill_positions_are_dropped() {
        let html = r#"
            <p class="plus-name">一技能</p>
            <p class="plus-name"></p>
            <p class="plus-name">三技能</p>
            <p class="plus-int">描述一</p>
            <p class="plus-int">描述二</p>
            <p class="plus-int">描述三</p>
        "#;
        let detail = extract(html);

        assert_eq!(detail.skills.len(), 2);
        assert_eq!(detail.skills[0].name, "一技能");
        // Alignment is positional against the name list, not compacted.
        assert_eq!(detail.skills[1].name, "三技能");
        assert_eq!(detail.skills[1].description, "描述三");
    }

    #[test]
    fn single_build_list_yields_empty_builds() {
        let detail = extract(r#"<ul class="equip-list" data-item="1|2|3"></ul>"#);
        assert!(detail.recommended_builds.winning_build.is_empty());
        assert!(detail.recommended_builds.losing_build.is_empty());
    }

    #[test]
    fn build_lists_follow_document_order() {
        let html = r#"
            <ul class="equip-list" data-item="10|11"></ul>
            <ul class="equip-list" data-item="20"></ul>
            <ul class="equip-list" data-item="30"></ul>
        "#;
        let detail = extract(html);
        assert_eq!(detail.recommended_builds.winning_build, vec!["10", "11"]);
        assert_eq!(detail.recommended_builds.losing_build, vec!["20"]);
    }

    #[test]
    fn empty_build_attribute_yields_no_ids() {
        let html = r#"
            <ul class="equip-list" data-item=""></ul>
            <ul class="equip-list"></ul>
        "#;
        let detail = extract(html);
        assert!(detail.recommended_builds.winning_build.is_empty());
        assert!(detail.recommended_builds.losing_build.is_empty());
    }

    #[test]
    fn missing_rune_list_yields_empty_inscriptions() {
        assert!(extract("<div></div>").inscriptions.is_empty());
    }

    #[test]
    fn relation_entry_with_missing_parts_is_kept_empty() {
        let html = r#"
            <ul class="rela-list">
              <li><p class="rela-text">有理由没头像。</p></li>
              <li><img data-src="112.jpg"></li>
            </ul>
        "#;
        let detail = extract(html);

        let partners = &detail.relations.best_partners;
        assert_eq!(partners.len(), 2);
        assert_eq!(partners[0].hero_id, "");
        assert_eq!(partners[0].reason, "有理由没头像。");
        assert_eq!(partners[1].hero_id, "112.jpg");
        assert_eq!(partners[1].reason, "");
    }

    #[test]
    fn extra_relation_lists_beyond_three_are_ignored() {
        let html = r#"
            <ul class="rela-list"><li><img data-src="1.jpg"></li></ul>
            <ul class="rela-list"><li><img data-src="2.jpg"></li></ul>
            <ul class="rela-list"><li><img data-src="3.jpg"></li></ul>
            <ul class="rela-list"><li><img data-src="4.jpg"></li></ul>
        "#;
        let detail = extract(html);
        assert_eq!(detail.relations.restrains_who[0].hero_id, "3.jpg");
    }
}
