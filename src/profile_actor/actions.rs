//! Custom actions for the Profile actor.
//!
//! Handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! on [`UserPreferenceProfile`](crate::model::UserPreferenceProfile).

use crate::model::ItemId;
use crate::recommendation::RecommendationBundle;

#[derive(Debug, Clone)]
pub enum ProfileAction {
    /// Moves an item to the front of the viewed list if it is not there yet.
    RecordView(ItemId),
    /// Unions tags into the profile, keeping existing ones first.
    AddTags(Vec<String>),
    /// Ranks the catalog for this profile.
    Recommend { limit: usize },
}

/// Results from ProfileActions - variants match 1:1 with ProfileAction
#[derive(Debug, Clone)]
pub enum ProfileActionResult {
    /// Whether the view was new.
    RecordView(bool),
    /// The tag set after merging.
    AddTags(Vec<String>),
    Recommend(Box<RecommendationBundle>),
}
