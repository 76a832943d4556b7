use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

pub mod check;
pub mod error;

use crate::evaluator::{evaluate, EvaluationResult};
use crate::models::{NormalizedGame, Side, TeamScore};
use crate::registry::{SportConfig, SportRegistry};
use crate::scores::ScoreboardProvider;
use check::{CheckParams, CheckRequest};
use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SportRegistry>,
    pub provider: Arc<dyn ScoreboardProvider>,
    /// Sport served when `/api/games` names none
    pub default_sport: String,
}

/// Build the Axum router for the page and its JSON API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/sports", get(sports_handler))
        .route("/api/games", get(games_handler))
        .route("/api/check", get(check_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SportsResponse {
    pub sports: Vec<SportConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GamesParams {
    pub sport: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

/// Per-sport defaults the page pre-fills its inputs with.
#[derive(Debug, Serialize)]
pub struct SportDefaults {
    pub favorite_team: String,
    pub default_threshold: u32,
    pub score_unit: String,
}

#[derive(Debug, Serialize)]
pub struct GameSummary {
    pub id: String,
    pub date: String,
    /// "Final" or the live / scheduled detail text
    pub status: String,
    pub state: &'static str,
    pub home_team: TeamScore,
    pub away_team: TeamScore,
    /// Side the configured favorite plays on, if any
    pub favorite_side: Option<Side>,
}

impl GameSummary {
    fn new(game: NormalizedGame, favorite_team: &str) -> Self {
        GameSummary {
            favorite_side: game.favorite_side(favorite_team),
            status: game.status.label().to_string(),
            state: game.status.state(),
            id: game.id,
            date: game.date,
            home_team: game.home,
            away_team: game.away,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameSummary>,
    pub date: String,
    pub sport: String,
    pub config: SportDefaults,
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// Serve the single-page UI.
async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// GET /api/sports
async fn sports_handler(State(state): State<Arc<AppState>>) -> Json<SportsResponse> {
    Json(SportsResponse {
        sports: state.registry.list().to_vec(),
    })
}

/// GET /api/games?sport=nba&date=2024-01-15
async fn games_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GamesParams>,
) -> Result<Json<GamesResponse>, ApiError> {
    let sport_id = params
        .sport
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.default_sport.clone());
    let sport = state.registry.get(sport_id.trim())?;

    let date = match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::InvalidDate(raw.to_string()))?,
        None => chrono::Local::now().date_naive(),
    };

    let games = state.provider.fetch_games(sport, date).await.map_err(|e| {
        error!(
            "{} fetch for {} on {} failed: {:#}",
            state.provider.name(),
            sport.id,
            date,
            e
        );
        ApiError::Upstream(e)
    })?;

    let mut games: Vec<GameSummary> = games
        .into_iter()
        .map(|g| GameSummary::new(g, &sport.favorite_team))
        .collect();
    // Favorite team first, feed order otherwise (stable sort)
    games.sort_by_key(|g| g.favorite_side.is_none());

    debug!("Serving {} {} games for {}", games.len(), sport.id, date);

    Ok(Json(GamesResponse {
        games,
        date: date.format("%Y-%m-%d").to_string(),
        sport: sport.id.clone(),
        config: SportDefaults {
            favorite_team: sport.favorite_team.clone(),
            default_threshold: sport.default_threshold,
            score_unit: sport.score_unit.clone(),
        },
    }))
}

/// GET /api/check?my_team=home&threshold=10&home_score=95&away_score=100&...
async fn check_handler(Query(params): Query<CheckParams>) -> Json<EvaluationResult> {
    let request = CheckRequest::from_params(params);
    for issue in &request.issues {
        debug!("check: {}", issue);
    }

    let result = evaluate(&request.input);
    debug!(
        "check: final={} worth_watching={}",
        request.input.status.is_final(),
        result.worth_watching
    );
    Json(result)
}

/// Embedded single-file page (HTML + CSS + JS)
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Worth Watching?</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); flex-wrap: wrap; }
  header h1 { font-size: 1.4rem; font-weight: 700; margin-right: auto; }
  select, input { background: var(--card); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .35rem .6rem; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1rem; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); }
  .game { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; display: grid; gap: .8rem; }
  .game.favorite { border-color: var(--accent); }
  .teams { display: flex; align-items: center; justify-content: space-between; gap: .5rem; }
  .team { display: flex; align-items: center; gap: .5rem; font-weight: 600; }
  .team img { width: 28px; height: 28px; }
  .status { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; }
  .status.in_progress { color: var(--green); }
  .controls { display: flex; gap: .6rem; align-items: end; }
  .controls label { display: grid; gap: .2rem; font-size: .75rem; color: var(--muted); }
  .controls input { width: 4.5rem; }
  button { background: var(--accent); color: #fff; border: none; border-radius: 6px; padding: .45rem .9rem; cursor: pointer; font-weight: 600; }
  button:disabled { opacity: .5; cursor: default; }
  .notice { color: var(--muted); text-align: center; padding: 2rem; grid-column: 1 / -1; }
  .notice.error { color: var(--red); }
  .overlay { position: fixed; inset: 0; background: rgba(0,0,0,.6); display: flex; align-items: center; justify-content: center; }
  .overlay.hidden, .hidden { display: none; }
  .modal { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 1.5rem; width: min(420px, 90vw); display: grid; gap: 1rem; text-align: center; }
  .modal h2.yes { color: var(--green); }
  .modal h2.no { color: var(--red); }
  .reveal { border-top: 1px solid var(--border); padding-top: 1rem; display: grid; gap: .4rem; }
  .score-line { display: flex; justify-content: space-between; }
  .score-line.winner { font-weight: 700; }
  .secondary { background: none; border: 1px solid var(--border); color: var(--muted); }
</style>
</head>
<body>
<header>
  <h1>Worth Watching?</h1>
  <select id="sport"></select>
  <input type="date" id="date">
</header>

<main id="games"><div class="notice">Loading…</div></main>

<div class="overlay hidden" id="overlay">
  <div class="modal">
    <h2 id="verdict"></h2>
    <p id="reason"></p>
    <button id="reveal-btn"></button>
    <div class="reveal hidden" id="reveal"></div>
    <button class="secondary" id="close-btn">Close</button>
  </div>
</div>

<script>
const sportEl = document.getElementById('sport');
const dateEl = document.getElementById('date');
const gamesEl = document.getElementById('games');
const overlay = document.getElementById('overlay');
const revealBtn = document.getElementById('reveal-btn');
const revealEl = document.getElementById('reveal');

let defaults = { favorite_team: '', default_threshold: 10, score_unit: 'points' };
let games = {};
let lastResult = null;

const esc = s => String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
const shortName = name => name.split(' ').pop();

async function loadSports() {
  const r = await fetch('/api/sports');
  const data = await r.json();
  sportEl.innerHTML = data.sports.map(s => `<option value="${esc(s.id)}">${esc(s.name)}</option>`).join('');
}

async function loadGames() {
  gamesEl.innerHTML = '<div class="notice">Loading…</div>';
  games = {};
  try {
    const r = await fetch(`/api/games?sport=${encodeURIComponent(sportEl.value)}&date=${dateEl.value}`);
    const data = await r.json();
    if (data.error) {
      gamesEl.innerHTML = `<div class="notice error">Error: ${esc(data.error)}</div>`;
      return;
    }
    defaults = data.config;
    if (!data.games.length) {
      gamesEl.innerHTML = '<div class="notice">No games on this date</div>';
      return;
    }
    data.games.forEach(g => { games[g.id] = g; });
    gamesEl.innerHTML = data.games.map(renderGame).join('');
  } catch (err) {
    gamesEl.innerHTML = `<div class="notice error">Failed to load games: ${esc(err.message)}</div>`;
  }
}

function renderGame(g) {
  const side = g.favorite_side || 'away';
  const logo = t => t.logo ? `<img src="${esc(t.logo)}" alt="" onerror="this.remove()">` : '';
  return `<div class="game ${g.favorite_side ? 'favorite' : ''}" data-id="${esc(g.id)}">
    <div class="teams">
      <span class="team">${logo(g.away_team)}${esc(g.away_team.name)}</span>
      <span class="status">@</span>
      <span class="team">${esc(g.home_team.name)}${logo(g.home_team)}</span>
    </div>
    <div class="status ${g.state}">${esc(g.status)}</div>
    <div class="controls">
      <label>My team
        <select class="side">
          <option value="away" ${side === 'away' ? 'selected' : ''}>${esc(shortName(g.away_team.name))}</option>
          <option value="home" ${side === 'home' ? 'selected' : ''}>${esc(shortName(g.home_team.name))}</option>
        </select>
      </label>
      <label>Threshold <input type="number" class="threshold" min="0" max="99" value="${defaults.default_threshold}"></label>
      <button class="check">Check</button>
    </div>
  </div>`;
}

async function checkGame(card, button) {
  const g = games[card.dataset.id];
  if (!g) return;
  const params = new URLSearchParams({
    my_team: card.querySelector('.side').value,
    threshold: card.querySelector('.threshold').value,
    score_unit: defaults.score_unit,
    home_score: g.home_team.score,
    away_score: g.away_team.score,
    home_team: g.home_team.name,
    away_team: g.away_team.name,
    status: g.status,
  });
  button.disabled = true;
  button.textContent = 'Checking…';
  try {
    const r = await fetch(`/api/check?${params}`);
    showResult(await r.json());
  } catch (err) {
    alert(`Failed to check game: ${err.message}`);
  } finally {
    button.disabled = false;
    button.textContent = 'Check';
  }
}

function showResult(data) {
  lastResult = data;
  const verdict = document.getElementById('verdict');
  verdict.textContent = data.worth_watching ? 'Yes, watch it!' : 'Not worth watching';
  verdict.className = data.worth_watching ? 'yes' : 'no';
  document.getElementById('reason').textContent = data.reason;
  revealBtn.textContent = data.game_in_progress ? 'Show current differential' : 'Show final score';
  revealBtn.classList.remove('hidden');
  revealEl.classList.add('hidden');
  revealEl.innerHTML = '';
  overlay.classList.remove('hidden');
}

function reveal() {
  if (!lastResult) return;
  const info = lastResult.differential_info;
  if (info) {
    const note = info.within_threshold
      ? `Currently within your ${info.threshold}-${info.score_unit} threshold!`
      : `Currently outside your ${info.threshold}-${info.score_unit} threshold.`;
    revealEl.innerHTML = `<p>${esc(info.diff_msg)}</p><p>${esc(note)}</p>`;
  } else if (lastResult.score) {
    const s = lastResult.score;
    revealEl.innerHTML = `
      <div class="score-line ${s.away_score > s.home_score ? 'winner' : ''}"><span>${esc(s.away_team)}</span><span>${s.away_score}</span></div>
      <div class="score-line ${s.home_score > s.away_score ? 'winner' : ''}"><span>${esc(s.home_team)}</span><span>${s.home_score}</span></div>`;
  }
  revealBtn.classList.add('hidden');
  revealEl.classList.remove('hidden');
}

function closeModal() {
  overlay.classList.add('hidden');
  lastResult = null;
}

gamesEl.addEventListener('click', e => {
  if (e.target.classList.contains('check')) checkGame(e.target.closest('.game'), e.target);
});
revealBtn.addEventListener('click', reveal);
document.getElementById('close-btn').addEventListener('click', closeModal);
overlay.addEventListener('click', e => { if (e.target === overlay) closeModal(); });
sportEl.addEventListener('change', loadGames);
dateEl.addEventListener('change', loadGames);

document.addEventListener('DOMContentLoaded', async () => {
  const now = new Date();
  dateEl.value = new Date(now.getTime() - now.getTimezoneOffset() * 60000).toISOString().slice(0, 10);
  await loadSports();
  await loadGames();
});
</script>
</body>
</html>"#;
