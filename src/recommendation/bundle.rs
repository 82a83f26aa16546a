//! Assembling ranked recommendation bundles.

use crate::model::{CatalogItem, Category, ItemId, UserPreferenceProfile};
use crate::recommendation::index::CatalogIndex;
use crate::recommendation::scoring::rank;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecommendation {
    pub category: Category,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBundle {
    pub personalized: Vec<CatalogItem>,
    pub trending: Vec<CatalogItem>,
    pub similar_to_last_ordered: Vec<CatalogItem>,
    pub by_category: Vec<CategoryRecommendation>,
}

/// Bundle for users without a usable profile.
///
/// Personalized picks fall back to the trending shelf, and every category
/// shows its first items in catalog order.
pub fn default_bundle(index: &CatalogIndex) -> RecommendationBundle {
    let cap = index.config().per_category_cap;
    let catalog = index.catalog();
    let by_category = catalog
        .categories()
        .iter()
        .map(|category| CategoryRecommendation {
            category: category.clone(),
            items: catalog.items_in(&category.id).take(cap).cloned().collect(),
        })
        .collect();

    RecommendationBundle {
        personalized: index.trending().to_vec(),
        trending: index.trending().to_vec(),
        similar_to_last_ordered: Vec::new(),
        by_category,
    }
}

/// Bundle for `profile`, or the default bundle when it has no order history.
pub fn recommend(profile: Option<&UserPreferenceProfile>, index: &CatalogIndex, limit: usize) -> RecommendationBundle {
    match profile {
        Some(profile) if !profile.is_cold() => personalized_bundle(profile, index, limit),
        _ => default_bundle(index),
    }
}

pub fn personalized_bundle(
    profile: &UserPreferenceProfile,
    index: &CatalogIndex,
    limit: usize,
) -> RecommendationBundle {
    let personalized = rank(profile, index)
        .into_iter()
        .filter(|(item, _)| profile.dietary_mode.admits(item.is_veg))
        .take(limit)
        .map(|(item, _)| item.clone())
        .collect();

    RecommendationBundle {
        personalized,
        trending: index.trending().to_vec(),
        similar_to_last_ordered: similar_to_last_ordered(profile, index, limit),
        by_category: by_category(profile, index),
    }
}

fn similar_to_last_ordered(
    profile: &UserPreferenceProfile,
    index: &CatalogIndex,
    limit: usize,
) -> Vec<CatalogItem> {
    let window = index.config().recent_window;
    let mut ids: Vec<&ItemId> = Vec::new();
    for recent in profile.recent(window) {
        for neighbor in index.neighbors(recent) {
            if !ids.contains(&neighbor) {
                ids.push(neighbor);
            }
        }
    }

    ids.into_iter()
        .filter(|id| !profile.last_ordered.contains(*id))
        .filter_map(|id| index.catalog().item(id).cloned())
        .take(limit)
        .collect()
}

fn by_category(profile: &UserPreferenceProfile, index: &CatalogIndex) -> Vec<CategoryRecommendation> {
    let config = index.config();
    let catalog = index.catalog();
    let recent = profile.recent(config.recent_window);

    let mut categories: Vec<&Category> = catalog.categories().iter().collect();
    categories.sort_by(|a, b| {
        profile
            .category_weight(&b.id)
            .total_cmp(&profile.category_weight(&a.id))
    });

    categories
        .into_iter()
        .map(|category| {
            let mut items: Vec<&CatalogItem> = catalog.items_in(&category.id).collect();
            items.sort_by(|a, b| profile.item_weight(&b.id).total_cmp(&profile.item_weight(&a.id)));
            CategoryRecommendation {
                category: category.clone(),
                items: items
                    .into_iter()
                    .filter(|item| !recent.contains(&item.id))
                    .take(config.per_category_cap)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
