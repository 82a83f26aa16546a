//! Per-catalog data computed once: flavor tags, neighbor lists and the
//! trending shelf.

use crate::config::RecommendationConfig;
use crate::model::{Catalog, CatalogItem, ItemId};
use std::collections::HashMap;
use std::sync::Arc;

/// Flavor tag and the lower-case substrings that imply it.
const FLAVOR_VOCABULARY: [(&str, &[&str]); 8] = [
    ("spicy", &["spicy", "spiced"]),
    ("sweet", &["sweet"]),
    ("crispy", &["crispy"]),
    ("creamy", &["creamy"]),
    ("chocolate", &["chocolate"]),
    ("cheese", &["cheese"]),
    ("paneer", &["paneer"]),
    ("chicken", &["chicken"]),
];

/// Tags found in the item's lower-cased name and description.
pub fn flavor_tags(item: &CatalogItem) -> Vec<&'static str> {
    let text = format!("{} {}", item.name, item.description).to_lowercase();
    FLAVOR_VOCABULARY
        .iter()
        .filter(|(_, needles)| needles.iter().any(|needle| text.contains(needle)))
        .map(|(tag, _)| *tag)
        .collect()
}

/// Read-only lookup tables shared by every profile.
#[derive(Debug)]
pub struct CatalogIndex {
    catalog: Arc<Catalog>,
    config: RecommendationConfig,
    tags: HashMap<ItemId, Vec<&'static str>>,
    neighbors: HashMap<ItemId, Vec<ItemId>>,
    trending: Vec<CatalogItem>,
}

impl CatalogIndex {
    pub fn new(catalog: Arc<Catalog>, config: RecommendationConfig) -> Self {
        let tags = catalog
            .items()
            .iter()
            .map(|item| (item.id.clone(), flavor_tags(item)))
            .collect();

        let neighbors = catalog
            .items()
            .iter()
            .map(|item| (item.id.clone(), neighbors_of(&catalog, item, config.neighbor_cap)))
            .collect();

        // Unknown ids in the configured list are skipped.
        let trending = config
            .trending
            .iter()
            .filter_map(|id| catalog.item(id).cloned())
            .collect();

        Self {
            catalog,
            config,
            tags,
            neighbors,
            trending,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn tags(&self, id: &ItemId) -> &[&'static str] {
        self.tags.get(id).map_or(&[], Vec::as_slice)
    }

    /// Similar items: same category first, then same veg flag.
    pub fn neighbors(&self, id: &ItemId) -> &[ItemId] {
        self.neighbors.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn trending(&self) -> &[CatalogItem] {
        &self.trending
    }
}

fn neighbors_of(catalog: &Catalog, item: &CatalogItem, cap: usize) -> Vec<ItemId> {
    let items = catalog.items();
    let same_category = items
        .iter()
        .filter(|other| other.id != item.id && other.category == item.category);
    let same_diet = items
        .iter()
        .filter(|other| other.id != item.id && other.is_veg == item.is_veg);

    let mut ids: Vec<ItemId> = Vec::with_capacity(cap);
    for other in same_category.chain(same_diet) {
        if ids.len() == cap {
            break;
        }
        if !ids.contains(&other.id) {
            ids.push(other.id.clone());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CatalogIndex {
        CatalogIndex::new(Arc::new(Catalog::canteen()), RecommendationConfig::default())
    }

    fn ids(list: &[ItemId]) -> Vec<&str> {
        list.iter().map(ItemId::as_str).collect()
    }

    #[test]
    fn test_flavor_tags() {
        let index = index();
        assert_eq!(index.tags(&ItemId::from("samosa")), ["spicy", "crispy"]);
        assert_eq!(index.tags(&ItemId::from("chicken-biryani")), ["spicy", "chicken"]);
        assert_eq!(index.tags(&ItemId::from("paneer-tikka")), ["cheese", "paneer"]);
        assert_eq!(index.tags(&ItemId::from("chocolate-brownie")), ["chocolate"]);
        assert!(index.tags(&ItemId::from("cold-coffee")).is_empty());
    }

    #[test]
    fn test_neighbors_prefer_same_category() {
        let index = index();
        assert_eq!(
            ids(index.neighbors(&ItemId::from("samosa"))),
            vec!["vada-pav", "maggi", "paneer-tikka", "chole-bhature", "masala-dosa"]
        );
        // The only non-veg item fills up with its own category.
        assert_eq!(
            ids(index.neighbors(&ItemId::from("chicken-biryani"))),
            vec!["paneer-tikka", "chole-bhature", "masala-dosa"]
        );
    }

    #[test]
    fn test_trending_skips_unknown_ids() {
        let mut config = RecommendationConfig::default();
        config.trending.insert(1, ItemId::from("pizza"));
        let index = CatalogIndex::new(Arc::new(Catalog::canteen()), config);
        let trending: Vec<&str> = index.trending().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            trending,
            vec!["chicken-biryani", "masala-dosa", "cold-coffee", "chocolate-brownie"]
        );
    }
}
