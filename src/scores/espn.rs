//! ESPN public scoreboard client and normalization layer.
//!
//! Endpoint: `<base>/<sport>/<league>/scoreboard?dates=YYYYMMDD`, no key
//! required. The raw structs below mirror only the fields we read and
//! tolerate any of them being absent; `normalize_event` is the single place
//! where ESPN's vocabulary is turned into a `NormalizedGame`.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::ScoreboardProvider;
use crate::models::{GameStatus, NormalizedGame, TeamScore};
use crate::registry::SportConfig;

// ── ESPN JSON deserialization structs ────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RawScoreboard {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: RawStatus,
    #[serde(default)]
    pub competitions: Vec<RawCompetition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStatus {
    #[serde(rename = "type", default)]
    pub status_type: RawStatusType,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStatusType {
    /// e.g. "STATUS_FINAL", "STATUS_IN_PROGRESS", "STATUS_SCHEDULED"
    #[serde(default)]
    pub name: String,
    /// "pre" | "in" | "post"
    #[serde(default)]
    pub state: String,
    /// e.g. "Final", "Q3 2:15", "1/15 - 7:30 PM EST"
    #[serde(rename = "shortDetail", default)]
    pub short_detail: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCompetition {
    #[serde(default)]
    pub competitors: Vec<RawCompetitor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCompetitor {
    #[serde(rename = "homeAway", default)]
    pub home_away: String,
    /// Usually a numeric string, occasionally a number or missing
    #[serde(default)]
    pub score: Option<serde_json::Value>,
    #[serde(default)]
    pub team: RawTeam,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTeam {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
}

// ── Normalization ────────────────────────────────────────────────

/// Normalize every usable event on a scoreboard, preserving feed order.
pub fn normalize_scoreboard(board: &RawScoreboard) -> Vec<NormalizedGame> {
    board
        .events
        .iter()
        .filter_map(|ev| {
            let game = normalize_event(ev);
            if game.is_none() {
                debug!("Skipping ESPN event '{}' without competitors", ev.id);
            }
            game
        })
        .collect()
}

/// Convert one ESPN event. Returns `None` when the event has no competitors.
pub fn normalize_event(event: &RawEvent) -> Option<NormalizedGame> {
    let competitors = &event.competitions.first()?.competitors;
    let first = competitors.first()?;

    let home = competitors
        .iter()
        .find(|c| c.home_away == "home")
        .unwrap_or(first);
    let away = competitors
        .iter()
        .find(|c| c.home_away == "away")
        .or_else(|| competitors.get(1))
        .unwrap_or(first);

    Some(NormalizedGame {
        id: event.id.clone(),
        date: event.date.clone(),
        status: normalize_status(&event.status.status_type),
        home: team_score(home, "Home"),
        away: team_score(away, "Away"),
    })
}

fn normalize_status(status: &RawStatusType) -> GameStatus {
    let detail = status.short_detail.trim();
    if status.name == "STATUS_FINAL" || detail == "FT" || detail == "Final" {
        GameStatus::Final
    } else if status.name == "STATUS_IN_PROGRESS" || status.state == "in" {
        GameStatus::InProgress(non_empty(detail).unwrap_or("In Progress").to_string())
    } else {
        GameStatus::Scheduled(non_empty(detail).unwrap_or("Scheduled").to_string())
    }
}

fn team_score(competitor: &RawCompetitor, fallback_name: &str) -> TeamScore {
    let team = &competitor.team;
    let name = team
        .display_name
        .as_deref()
        .and_then(non_empty)
        .or_else(|| team.name.as_deref().and_then(non_empty))
        .unwrap_or(fallback_name);

    TeamScore {
        name: name.to_string(),
        abbreviation: team.abbreviation.clone().unwrap_or_default(),
        score: parse_score(competitor.score.as_ref()),
        logo: team.logo.clone().unwrap_or_default(),
    }
}

/// Missing, empty, negative or non-numeric scores all become 0.
fn parse_score(raw: Option<&serde_json::Value>) -> u32 {
    match raw {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => {
            n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
        }
        _ => 0,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ── Client ──────────────────────────────────────────────────────

/// Scoreboard provider backed by ESPN's public site API.
#[derive(Clone)]
pub struct EspnScoreboard {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
    /// Extra attempts after a transient failure
    retries: u32,
}

enum Attempt {
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

impl EspnScoreboard {
    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnScoreboard {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retries,
        })
    }

    async fn fetch_once(&self, url: &str, dates: &str) -> Result<RawScoreboard, Attempt> {
        let resp = self
            .http
            .get(url)
            .query(&[("dates", dates)])
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                let err = anyhow!(e).context("ESPN scoreboard request failed");
                if transient {
                    Attempt::Retryable(err)
                } else {
                    Attempt::Fatal(err)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let err = anyhow!("ESPN scoreboard error: {}", status);
            return Err(if status.is_server_error() {
                Attempt::Retryable(err)
            } else {
                Attempt::Fatal(err)
            });
        }

        resp.json::<RawScoreboard>()
            .await
            .context("Failed to parse ESPN scoreboard response")
            .map_err(Attempt::Fatal)
    }
}

/// Exponential backoff (250ms, 500ms, 1s, ...) plus up to 100ms of jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let base = 250u64.saturating_mul(1u64 << attempt.min(6));
    let jitter = rand::thread_rng().gen_range(0..100);
    Duration::from_millis(base + jitter)
}

#[async_trait]
impl ScoreboardProvider for EspnScoreboard {
    fn name(&self) -> &str {
        "ESPN"
    }

    async fn fetch_games(&self, sport: &SportConfig, date: NaiveDate) -> Result<Vec<NormalizedGame>> {
        let url = sport.scoreboard_url(&self.base_url);
        let dates = date.format("%Y%m%d").to_string();
        debug!("Fetching {} scoreboard for {} from {}", sport.id, dates, url);

        let mut attempt = 0u32;
        let board = loop {
            match self.fetch_once(&url, &dates).await {
                Ok(board) => break board,
                Err(Attempt::Retryable(e)) if attempt < self.retries => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "{} scoreboard fetch failed ({:#}), retrying in {:?}",
                        sport.id, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(Attempt::Retryable(e)) | Err(Attempt::Fatal(e)) => return Err(e),
            }
        };

        let games = normalize_scoreboard(&board);
        debug!("ESPN: fetched {} {} games for {}", games.len(), sport.id, dates);
        Ok(games)
    }
}
