//! Static per-sport configuration.
//!
//! The registry is built once at startup and handed to the router by `Arc`.
//! Thresholds and score units here are only *defaults* offered to the UI;
//! the evaluator receives them explicitly with each request.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown sport: {0}")]
    NotFound(String),
}

/// Configuration for a single sport / league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportConfig {
    /// Registry key used in query strings (e.g. "nba", "epl")
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub favorite_team: String,
    /// Largest losing margin still considered worth watching
    pub default_threshold: u32,
    /// "points" | "runs" | "goals"
    pub score_unit: String,
    /// ESPN sport/league path, e.g. "basketball/nba"
    #[serde(skip)]
    pub endpoint_path: String,
}

impl SportConfig {
    fn new(
        id: &str,
        display_name: &str,
        endpoint_path: &str,
        favorite_team: &str,
        default_threshold: u32,
        score_unit: &str,
    ) -> Self {
        SportConfig {
            id: id.to_string(),
            display_name: display_name.to_string(),
            favorite_team: favorite_team.to_string(),
            default_threshold,
            score_unit: score_unit.to_string(),
            endpoint_path: endpoint_path.to_string(),
        }
    }

    /// Full scoreboard URL for this sport under the given API base.
    pub fn scoreboard_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/scoreboard",
            base_url.trim_end_matches('/'),
            self.endpoint_path.trim_matches('/')
        )
    }
}

/// Immutable, ordered set of sport configurations.
#[derive(Debug, Clone)]
pub struct SportRegistry {
    sports: Vec<SportConfig>,
}

impl SportRegistry {
    /// Build a registry from configs in registration order.
    /// Later duplicates of an id are ignored.
    pub fn new(configs: Vec<SportConfig>) -> Self {
        let mut sports: Vec<SportConfig> = Vec::with_capacity(configs.len());
        for cfg in configs {
            if !sports.iter().any(|s| s.id == cfg.id) {
                sports.push(cfg);
            }
        }
        SportRegistry { sports }
    }

    /// The leagues the service ships with.
    pub fn builtin() -> Self {
        SportRegistry::new(vec![
            SportConfig::new("nba", "NBA", "basketball/nba", "New York Knicks", 10, "points"),
            SportConfig::new("nfl", "NFL", "football/nfl", "New York Jets", 7, "points"),
            SportConfig::new("mlb", "MLB", "baseball/mlb", "New York Mets", 2, "runs"),
            SportConfig::new("nhl", "NHL", "hockey/nhl", "New York Rangers", 2, "goals"),
            SportConfig::new("epl", "Premier League", "soccer/eng.1", "Arsenal", 1, "goals"),
            SportConfig::new(
                "ncaab",
                "NCAAB",
                "basketball/mens-college-basketball",
                "Stanford Cardinal",
                10,
                "points",
            ),
            SportConfig::new(
                "ncaaf",
                "NCAAF",
                "football/college-football",
                "Stanford Cardinal",
                7,
                "points",
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Result<&SportConfig, RegistryError> {
        self.sports
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    /// All sports in registration order.
    pub fn list(&self) -> &[SportConfig] {
        &self.sports
    }
}
