//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter driven
//! by `RUST_LOG`.
//!
//! Log lines carry structured fields rather than module paths:
//! `entity_type` for the generic resource actors, `order_id`, `user_id` and
//! `status` for domain events.
//!
//! ```bash
//! RUST_LOG=info cargo run --bin canteen-demo    # lifecycle and status changes
//! RUST_LOG=debug cargo run --bin canteen-demo   # plus request payloads
//! RUST_LOG=canteen_core::tracking=debug cargo run --bin canteen-demo
//! ```
//!
//! With `RUST_LOG=info` an order's journey reads like:
//!
//! ```text
//! INFO Created entity_type="OrderRecord" id=order_1 size=1
//! INFO place_order: Tracking started order_id=order_1
//! INFO Status advanced order_id=order_1 from=Placed to=Preparing
//! INFO Status update published order_id=order_1 status=Preparing delivered=2
//! ```

/// Installs the global subscriber. Call once, early in `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
