//! Building and adjusting preference profiles.

use crate::config::RecommendationConfig;
use crate::model::{DietaryMode, ItemId, ProfileSeed, UserId, UserPreferenceProfile};
use std::collections::HashMap;

/// Recomputes a profile from the user's full order history.
///
/// Weight maps, dietary mode, order history and tags are rebuilt from the
/// seed; hint tags are copied as given. Viewed items are the only carry-over from `previous`: the seed's
/// views go first, then the earlier ones, without duplicates.
pub fn derive_profile(
    user_id: UserId,
    seed: ProfileSeed,
    previous: Option<&UserPreferenceProfile>,
    config: &RecommendationConfig,
) -> UserPreferenceProfile {
    let mut orders = seed.orders;
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut category_weights = HashMap::new();
    let mut item_weights = HashMap::new();
    let mut last_ordered: Vec<ItemId> = Vec::new();
    let (mut veg_units, mut non_veg_units) = (0u64, 0u64);

    let mut recency_weight = 1.0;
    for order in &orders {
        for line in &order.items {
            let units = f64::from(line.quantity) * recency_weight;
            *category_weights.entry(line.item.category.clone()).or_insert(0.0) += units;
            *item_weights.entry(line.item.id.clone()).or_insert(0.0) += units;

            if line.item.is_veg {
                veg_units += u64::from(line.quantity);
            } else {
                non_veg_units += u64::from(line.quantity);
            }

            if !last_ordered.contains(&line.item.id) {
                last_ordered.push(line.item.id.clone());
            }
        }
        recency_weight *= config.recency_factor;
    }
    last_ordered.truncate(config.history_cap);

    let dietary_mode = if veg_units > 0 && non_veg_units == 0 {
        DietaryMode::VegetarianOnly
    } else if non_veg_units > veg_units * 2 {
        DietaryMode::NonVegetarianOnly
    } else {
        DietaryMode::Any
    };

    let earlier = previous.map_or(&[][..], |p| p.viewed.as_slice());
    let viewed = dedup_capped(seed.viewed.iter().chain(earlier), config.viewed_cap);

    let tags = seed.hint.map(|hint| hint.tags).unwrap_or_default();

    UserPreferenceProfile {
        user_id,
        category_weights,
        item_weights,
        dietary_mode,
        last_ordered,
        viewed,
        tags,
    }
}

/// Puts `item_id` at the front of the viewed list. Returns false if it was
/// already there.
pub fn record_view(profile: &mut UserPreferenceProfile, item_id: ItemId, cap: usize) -> bool {
    if profile.viewed.contains(&item_id) {
        return false;
    }
    profile.viewed.insert(0, item_id);
    profile.viewed.truncate(cap);
    true
}

/// Appends tags not yet present, keeping the existing order.
pub fn merge_tags(profile: &mut UserPreferenceProfile, tags: Vec<String>) {
    for tag in tags {
        if !profile.tags.contains(&tag) {
            profile.tags.push(tag);
        }
    }
}

fn dedup_capped<'a, T>(values: impl Iterator<Item = &'a T>, cap: usize) -> Vec<T>
where
    T: PartialEq + Clone + 'a,
{
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if out.len() == cap {
            break;
        }
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Catalog, CategoryId, LineItem, OrderDraft, OrderId, OrderRecord, ProfileHint, Timestamp,
    };

    fn order(id: &str, timestamp: Timestamp, lines: &[(&str, u32)]) -> OrderRecord {
        let catalog = Catalog::canteen();
        let items = lines
            .iter()
            .map(|(item, qty)| LineItem::new(catalog.item(&ItemId::from(*item)).unwrap().clone(), *qty))
            .collect();
        OrderRecord::place(OrderId::from(id), OrderDraft::new(UserId::from("u1"), items, timestamp))
    }

    fn derive(seed: ProfileSeed) -> UserPreferenceProfile {
        derive_profile(UserId::from("u1"), seed, None, &RecommendationConfig::default())
    }

    #[test]
    fn test_recency_weighting() {
        let profile = derive(ProfileSeed {
            orders: vec![
                order("order_1", 100, &[("samosa", 2)]),
                order("order_2", 200, &[("samosa", 1), ("cold-coffee", 1)]),
            ],
            ..ProfileSeed::default()
        });

        // Newest order weighs 1, the one before it 0.7.
        assert!((profile.item_weight(&ItemId::from("samosa")) - 2.4).abs() < 1e-9);
        assert!((profile.item_weight(&ItemId::from("cold-coffee")) - 1.0).abs() < 1e-9);
        assert!((profile.category_weight(&CategoryId::from("snacks")) - 2.4).abs() < 1e-9);
        assert_eq!(profile.last_ordered, vec![ItemId::from("samosa"), ItemId::from("cold-coffee")]);
        assert_eq!(profile.dietary_mode, DietaryMode::VegetarianOnly);
    }

    #[test]
    fn test_dietary_mode_inference() {
        let non_veg = derive(ProfileSeed {
            orders: vec![order("order_1", 1, &[("chicken-biryani", 3), ("masala-chai", 1)])],
            ..ProfileSeed::default()
        });
        assert_eq!(non_veg.dietary_mode, DietaryMode::NonVegetarianOnly);

        let mixed = derive(ProfileSeed {
            orders: vec![order("order_1", 1, &[("chicken-biryani", 2), ("masala-chai", 1)])],
            ..ProfileSeed::default()
        });
        assert_eq!(mixed.dietary_mode, DietaryMode::Any);

        let empty = derive(ProfileSeed::default());
        assert_eq!(empty.dietary_mode, DietaryMode::Any);
        assert!(empty.item_weights.is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let catalog = Catalog::canteen();
        let everything = catalog.items().iter().map(|i| LineItem::new(i.clone(), 1)).collect();
        let profile = derive(ProfileSeed {
            orders: vec![OrderRecord::place(
                OrderId::from("order_1"),
                OrderDraft::new(UserId::from("u1"), everything, 1),
            )],
            ..ProfileSeed::default()
        });
        assert_eq!(profile.last_ordered.len(), 10);
        assert_eq!(profile.last_ordered[0], ItemId::from("samosa"));
    }

    #[test]
    fn test_viewed_merge_puts_new_ids_first() {
        let config = RecommendationConfig::default();
        let mut previous = UserPreferenceProfile::empty(UserId::from("u1"));
        previous.viewed = vec![ItemId::from("maggi"), ItemId::from("samosa")];

        let profile = derive_profile(
            UserId::from("u1"),
            ProfileSeed {
                viewed: vec![ItemId::from("samosa"), ItemId::from("mango-lassi")],
                ..ProfileSeed::default()
            },
            Some(&previous),
            &config,
        );
        assert_eq!(
            profile.viewed,
            vec![ItemId::from("samosa"), ItemId::from("mango-lassi"), ItemId::from("maggi")]
        );
    }

    #[test]
    fn test_hint_tags_replace_and_merge_appends() {
        let mut profile = derive(ProfileSeed {
            hint: Some(ProfileHint {
                tags: vec!["spicy".into(), "spicy".into(), "sweet".into()],
            }),
            ..ProfileSeed::default()
        });
        assert_eq!(profile.tags, vec!["spicy", "spicy", "sweet"]);

        merge_tags(&mut profile, vec!["crispy".into(), "sweet".into()]);
        assert_eq!(profile.tags, vec!["spicy", "spicy", "sweet", "crispy"]);
    }

    #[test]
    fn test_viewed_merge_keeps_twenty_newest() {
        let config = RecommendationConfig::default();
        let mut previous = UserPreferenceProfile::empty(UserId::from("u1"));
        previous.viewed = (0..15).map(|n| ItemId::from(format!("earlier-{n}"))).collect();

        let profile = derive_profile(
            UserId::from("u1"),
            ProfileSeed {
                viewed: (0..8).map(|n| ItemId::from(format!("new-{n}"))).collect(),
                ..ProfileSeed::default()
            },
            Some(&previous),
            &config,
        );
        assert_eq!(profile.viewed.len(), 20);
        assert_eq!(profile.viewed[0], ItemId::from("new-0"));
        assert_eq!(profile.viewed[7], ItemId::from("new-7"));
        assert_eq!(profile.viewed[8], ItemId::from("earlier-0"));
        assert_eq!(profile.viewed[19], ItemId::from("earlier-11"));
    }

    #[test]
    fn test_record_view_prepends_once() {
        let mut profile = UserPreferenceProfile::empty(UserId::from("u1"));
        assert!(record_view(&mut profile, ItemId::from("samosa"), 2));
        assert!(record_view(&mut profile, ItemId::from("maggi"), 2));
        assert!(!record_view(&mut profile, ItemId::from("samosa"), 2));
        assert!(record_view(&mut profile, ItemId::from("vada-pav"), 2));
        assert_eq!(profile.viewed, vec![ItemId::from("vada-pav"), ItemId::from("maggi")]);
    }
}
