//! Per-user preference profile used only for ranking.
//!
//! Distinct from whatever account preferences the storefront keeps: a
//! profile is derived state, rebuilt from order history on every refresh.

use crate::model::catalog::{CategoryId, ItemId};
use crate::model::order::{OrderRecord, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dietary leaning inferred from what the user has ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DietaryMode {
    #[default]
    #[serde(rename = "all")]
    Any,
    #[serde(rename = "veg")]
    VegetarianOnly,
    #[serde(rename = "non-veg")]
    NonVegetarianOnly,
}

impl DietaryMode {
    /// Whether an item with the given veg flag passes this mode's filter.
    pub fn admits(self, is_veg: bool) -> bool {
        match self {
            Self::Any => true,
            Self::VegetarianOnly => is_veg,
            Self::NonVegetarianOnly => !is_veg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceProfile {
    pub user_id: UserId,
    pub category_weights: HashMap<CategoryId, f64>,
    pub item_weights: HashMap<ItemId, f64>,
    pub dietary_mode: DietaryMode,
    /// Most recent first, de-duplicated.
    pub last_ordered: Vec<ItemId>,
    /// Most recent first, de-duplicated.
    pub viewed: Vec<ItemId>,
    /// Insertion ordered, de-duplicated.
    pub tags: Vec<String>,
}

impl UserPreferenceProfile {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn category_weight(&self, id: &CategoryId) -> f64 {
        self.category_weights.get(id).copied().unwrap_or(0.0)
    }

    pub fn item_weight(&self, id: &ItemId) -> f64 {
        self.item_weights.get(id).copied().unwrap_or(0.0)
    }

    /// The `n` most recently ordered item ids.
    pub fn recent(&self, n: usize) -> &[ItemId] {
        &self.last_ordered[..self.last_ordered.len().min(n)]
    }

    /// A profile with no item weights is treated like a missing one.
    pub fn is_cold(&self) -> bool {
        self.item_weights.is_empty()
    }
}

/// Externally stored account preferences handed in on refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileHint {
    pub tags: Vec<String>,
}

/// Everything a preference recompute needs.
///
/// `orders` is the user's full history, not a delta.
#[derive(Debug, Clone, Default)]
pub struct ProfileSeed {
    pub orders: Vec<OrderRecord>,
    pub viewed: Vec<ItemId>,
    pub hint: Option<ProfileHint>,
}
