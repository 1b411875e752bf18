pub mod json_file;

pub use json_file::JsonFileStore;

use crate::config::FavorConfig;
use crate::error::FavorResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user favorability storage.
///
/// Reads of unknown users yield `init_value` without persisting anything.
/// `set` stores the value as given; only `adjust` enforces bounds.
#[async_trait::async_trait]
pub trait FavorStore: Send + Sync {
    /// Bounds the store was built with
    fn config(&self) -> &FavorConfig;

    /// Current score for a user, or `init_value` if they have none
    async fn get(&self, user_id: &str) -> FavorResult<i64>;

    /// Store a score verbatim, without clamping
    async fn set(&self, user_id: &str, value: i64) -> FavorResult<()>;

    /// Apply a bounded change and report both sides of it
    async fn adjust_detailed(&self, user_id: &str, delta: i64) -> FavorResult<Adjustment>;

    /// All stored scores
    async fn snapshot(&self) -> FavorResult<BTreeMap<String, i64>>;

    /// Apply a bounded change and return the new score
    async fn adjust(&self, user_id: &str, delta: i64) -> FavorResult<i64> {
        Ok(self.adjust_detailed(user_id, delta).await?.current)
    }
}

/// Outcome of a single adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub user_id: String,
    pub previous: i64,
    /// Delta as asked for, before any clamping
    pub requested: i64,
    /// Delta after limiting to `max_change`
    pub step: i64,
    pub current: i64,
}

impl Adjustment {
    /// Limit `requested` to `[-max_change, max_change]`, add it to `previous`
    /// and clamp the sum to `[min_value, max_value]`.
    pub fn compute(config: &FavorConfig, user_id: &str, previous: i64, requested: i64) -> Self {
        let step = requested.clamp(-config.max_change, config.max_change);
        let current = previous
            .saturating_add(step)
            .clamp(config.min_value, config.max_value);
        Self {
            user_id: user_id.to_string(),
            previous,
            requested,
            step,
            current,
        }
    }

    /// Net change actually stored
    pub fn change(&self) -> i64 {
        self.current.saturating_sub(self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FavorConfig {
        FavorConfig {
            max_value: 100,
            min_value: 0,
            init_value: 50,
            max_change: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_is_limited() {
        let adj = Adjustment::compute(&config(), "u1", 50, 30);
        assert_eq!(adj.step, 10);
        assert_eq!(adj.current, 60);

        let adj = Adjustment::compute(&config(), "u1", 60, -100);
        assert_eq!(adj.step, -10);
        assert_eq!(adj.current, 50);
    }

    #[test]
    fn test_result_is_clamped_to_bounds() {
        let adj = Adjustment::compute(&config(), "u1", 95, 10);
        assert_eq!(adj.current, 100);
        assert_eq!(adj.change(), 5);

        let adj = Adjustment::compute(&config(), "u1", 3, -10);
        assert_eq!(adj.current, 0);
    }

    #[test]
    fn test_out_of_range_previous_is_pulled_back() {
        // An admin set may leave a score outside the bounds
        let adj = Adjustment::compute(&config(), "u1", 500, 0);
        assert_eq!(adj.current, 100);

        let adj = Adjustment::compute(&config(), "u1", -500, 10);
        assert_eq!(adj.current, 0);
    }

    #[test]
    fn test_zero_delta_is_identity_in_range() {
        for previous in [0, 1, 50, 99, 100] {
            let adj = Adjustment::compute(&config(), "u1", previous, 0);
            assert_eq!(adj.current, previous);
        }
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let config = FavorConfig {
            max_value: i64::MAX,
            min_value: i64::MIN,
            init_value: 0,
            max_change: i64::MAX,
            ..Default::default()
        };
        let adj = Adjustment::compute(&config, "u1", i64::MAX, i64::MAX);
        assert_eq!(adj.current, i64::MAX);

        let adj = Adjustment::compute(&config, "u1", i64::MIN + 1, i64::MIN);
        assert_eq!(adj.step, -i64::MAX);
        assert_eq!(adj.current, i64::MIN);
    }
}
