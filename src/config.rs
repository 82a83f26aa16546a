//! Runtime configuration.
//!
//! Defaults reproduce the canteen's reference timetable and scoring weights.
//! [`CanteenConfig::from_env`] overlays `CANTEEN_*` environment variables and
//! logs every value it falls back on.

use crate::model::{ItemId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Display) -> Self {
        Self::Invalid {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Dwell times of the order simulator, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub placed_dwell_ms: u64,
    pub preparing_dwell_ms: u64,
    pub ready_dwell_ms: u64,
    /// Completion estimate for orders whose status is not recognized.
    pub fallback_window_ms: u64,
    /// Updates buffered per subscriber. Further updates to a full
    /// subscription are dropped.
    pub subscriber_buffer: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            placed_dwell_ms: 3_000,
            preparing_dwell_ms: 8_000,
            ready_dwell_ms: 15_000,
            fallback_window_ms: 15 * 60 * 1_000,
            subscriber_buffer: 64,
        }
    }
}

impl TrackingConfig {
    /// How long an order stays in `status` before advancing.
    pub fn dwell_ms(&self, status: OrderStatus) -> Option<u64> {
        match status {
            OrderStatus::Placed => Some(self.placed_dwell_ms),
            OrderStatus::Preparing => Some(self.preparing_dwell_ms),
            OrderStatus::ReadyForPickup => Some(self.ready_dwell_ms),
            OrderStatus::Completed | OrderStatus::Unrecognized => None,
        }
    }
}

/// Weights and caps of the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Geometric decay per order, newest order has weight 1.
    pub recency_factor: f64,
    pub category_weight: f64,
    pub view_weight: f64,
    pub dietary_weight: f64,
    pub tag_weight: f64,
    /// Item weight above which an item scores zero.
    pub saturation_threshold: f64,
    pub history_cap: usize,
    pub viewed_cap: usize,
    pub neighbor_cap: usize,
    /// How many of the most recent orders feed "similar" and per-category exclusion.
    pub recent_window: usize,
    pub per_category_cap: usize,
    pub trending: Vec<ItemId>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            recency_factor: 0.7,
            category_weight: 0.3,
            view_weight: 0.2,
            dietary_weight: 0.2,
            tag_weight: 0.3,
            saturation_threshold: 5.0,
            history_cap: 10,
            viewed_cap: 20,
            neighbor_cap: 5,
            recent_window: 3,
            per_category_cap: 3,
            trending: ["chicken-biryani", "masala-dosa", "cold-coffee", "chocolate-brownie"]
                .into_iter()
                .map(ItemId::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanteenConfig {
    pub tracking: TrackingConfig,
    pub recommendation: RecommendationConfig,
    /// Inbox size of every actor.
    pub channel_capacity: usize,
}

impl Default for CanteenConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            recommendation: RecommendationConfig::default(),
            channel_capacity: 32,
        }
    }
}

impl CanteenConfig {
    /// Loads configuration from `CANTEEN_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let tracking = TrackingConfig {
            placed_dwell_ms: try_load(&lookup, "CANTEEN_PLACED_DWELL_MS", defaults.tracking.placed_dwell_ms)?,
            preparing_dwell_ms: try_load(
                &lookup,
                "CANTEEN_PREPARING_DWELL_MS",
                defaults.tracking.preparing_dwell_ms,
            )?,
            ready_dwell_ms: try_load(&lookup, "CANTEEN_READY_DWELL_MS", defaults.tracking.ready_dwell_ms)?,
            fallback_window_ms: try_load(
                &lookup,
                "CANTEEN_FALLBACK_WINDOW_MS",
                defaults.tracking.fallback_window_ms,
            )?,
            subscriber_buffer: try_load(
                &lookup,
                "CANTEEN_SUBSCRIBER_BUFFER",
                defaults.tracking.subscriber_buffer,
            )?,
        };

        let mut recommendation = defaults.recommendation;
        recommendation.recency_factor =
            try_load(&lookup, "CANTEEN_RECENCY_FACTOR", recommendation.recency_factor)?;
        if let Some(raw) = lookup("CANTEEN_TRENDING_ITEMS") {
            recommendation.trending = raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ItemId::from)
                .collect();
        }

        let config = Self {
            tracking,
            recommendation,
            channel_capacity: try_load(&lookup, "CANTEEN_CHANNEL_CAPACITY", defaults.channel_capacity)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that serde and parsing cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.recommendation.recency_factor;
        if !(factor > 0.0 && factor < 1.0) {
            return Err(ConfigError::invalid(
                "CANTEEN_RECENCY_FACTOR",
                format!("{factor} is not in (0, 1)"),
            ));
        }
        for (key, dwell) in [
            ("CANTEEN_PLACED_DWELL_MS", self.tracking.placed_dwell_ms),
            ("CANTEEN_PREPARING_DWELL_MS", self.tracking.preparing_dwell_ms),
            ("CANTEEN_READY_DWELL_MS", self.tracking.ready_dwell_ms),
        ] {
            if dwell == 0 {
                return Err(ConfigError::invalid(key, "dwell must be positive"));
            }
        }
        if self.tracking.subscriber_buffer == 0 {
            return Err(ConfigError::invalid("CANTEEN_SUBSCRIBER_BUFFER", "buffer must be positive"));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::invalid("CANTEEN_CHANNEL_CAPACITY", "capacity must be positive"));
        }
        Ok(())
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ConfigError::invalid(key, e)
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
