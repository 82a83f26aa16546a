//! # Canteen Core
//!
//! Backend logic for a college canteen storefront: a recommendation engine
//! that learns from a user's orders, and a simulator that walks each placed
//! order through `Placed → Preparing → Ready for Pickup → Completed`.
//!
//! State lives in actors. Each actor runs in its own Tokio task, owns its
//! data outright and is reached through a typed client, so no locks guard
//! domain state.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`ResourceActor`](framework::ResourceActor) and the
//! [`ActorEntity`](framework::ActorEntity) trait. Orders and preference
//! profiles are both plain entities driven by the same message loop.
//!
//! ### 2. The Domain ([`model`], [`recommendation`], [`tracking`])
//! - [`model`]: the menu, orders and preference profiles.
//! - [`recommendation`]: pure scoring over a precomputed [`CatalogIndex`](recommendation::CatalogIndex).
//! - [`tracking`]: the order state machine and the actor that schedules it.
//!
//! ### 3. The Actors ([`order_actor`], [`profile_actor`])
//! `ActorEntity` implementations for [`OrderRecord`](model::OrderRecord)
//! and [`UserPreferenceProfile`](model::UserPreferenceProfile).
//!
//! ### 4. The Interface ([`clients`], [`notification`])
//! Domain clients hide the message passing. [`notification`] turns status
//! updates into user-facing notifications.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`CanteenSystem`](lifecycle::CanteenSystem) starts and stops everything;
//! [`CanteenConfig`](config::CanteenConfig) holds the timetable and weights.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run --bin canteen-demo
//! cargo test
//! ```
//!
//! ## 🧪 Testing
//!
//! See [`framework::mock`] for testing clients without spawning actors, and
//! [`tracking::ManualClock`] for pinning timestamps.

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod order_actor;
pub mod profile_actor;
pub mod recommendation;
pub mod tracking;
