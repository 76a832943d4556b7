use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::NormalizedGame;
use crate::registry::SportConfig;

/// Trait that every scoreboard source must implement.
#[async_trait]
pub trait ScoreboardProvider: Send + Sync {
    /// Return every game for the sport on the given calendar date.
    async fn fetch_games(&self, sport: &SportConfig, date: NaiveDate) -> Result<Vec<NormalizedGame>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
