//! Recommendation engine.
//!
//! Profiles are derived from order history ([`derive_profile`]), items are
//! scored against them ([`score_item`]) and the results are grouped into a
//! [`RecommendationBundle`]. Users with no history get [`default_bundle`].
//!
//! All functions here are pure. State lives in the
//! [`profile_actor`](crate::profile_actor).

pub mod bundle;
pub mod index;
pub mod preferences;
pub mod scoring;

pub use bundle::{
    default_bundle, personalized_bundle, recommend, CategoryRecommendation, RecommendationBundle,
};
pub use index::{flavor_tags, CatalogIndex};
pub use preferences::{derive_profile, merge_tags, record_view};
pub use scoring::{rank, score_item};
