//! Weighted-sum scoring of catalog items against a profile.

use crate::model::{CatalogItem, DietaryMode, UserPreferenceProfile};
use crate::recommendation::index::CatalogIndex;

/// Score of one item for one profile. Always finite and non-negative.
///
/// Saturated items (item weight above the threshold) score exactly zero.
pub fn score_item(item: &CatalogItem, profile: &UserPreferenceProfile, index: &CatalogIndex) -> f64 {
    let config = index.config();
    if profile.item_weight(&item.id) > config.saturation_threshold {
        return 0.0;
    }

    let total: f64 = profile.category_weights.values().sum();
    let total = if total > 0.0 { total } else { 1.0 };
    let mut score = profile.category_weight(&item.category) / total * config.category_weight;

    if profile.viewed.contains(&item.id) {
        score += config.view_weight;
    }

    let diet_match = match profile.dietary_mode {
        DietaryMode::VegetarianOnly => item.is_veg,
        DietaryMode::NonVegetarianOnly => !item.is_veg,
        DietaryMode::Any => false,
    };
    if diet_match {
        score += config.dietary_weight;
    }

    if !profile.tags.is_empty() {
        let item_tags = index.tags(&item.id);
        let matching = profile
            .tags
            .iter()
            .filter(|tag| item_tags.iter().any(|t| *t == tag.as_str()))
            .count();
        score += config.tag_weight * matching as f64 / profile.tags.len() as f64;
    }

    score
}

/// Every catalog item with its score, best first. Ties keep catalog order.
pub fn rank<'a>(profile: &UserPreferenceProfile, index: &'a CatalogIndex) -> Vec<(&'a CatalogItem, f64)> {
    let mut scored: Vec<(&CatalogItem, f64)> = index
        .catalog()
        .items()
        .iter()
        .map(|item| (item, score_item(item, profile, index)))
        .collect();
    // `sort_by` is stable.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}
