//! Typed request schema for `GET /api/check`.
//!
//! Every parameter arrives as an optional string. Missing values fall back
//! to defaults and malformed numerics coerce to 0, so a sloppy client still
//! gets a verdict. Each fallback is recorded as a `ParamIssue` for logging.

use serde::Deserialize;
use thiserror::Error;

use crate::evaluator::{EvalStatus, EvaluationInput};
use crate::models::Side;

pub const DEFAULT_THRESHOLD: u32 = 10;
pub const DEFAULT_SCORE_UNIT: &str = "points";
pub const DEFAULT_HOME_TEAM: &str = "Home Team";
pub const DEFAULT_AWAY_TEAM: &str = "Away Team";
pub const FINAL_STATUS: &str = "Final";

/// Raw query string, exactly as sent by the page.
#[derive(Debug, Default, Deserialize)]
pub struct CheckParams {
    pub my_team: Option<String>,
    pub threshold: Option<String>,
    pub score_unit: Option<String>,
    pub home_score: Option<String>,
    pub away_score: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamIssue {
    #[error("missing '{field}', using default")]
    Missing { field: &'static str },
    #[error("malformed '{field}' ({value:?}), coerced")]
    Malformed { field: &'static str, value: String },
}

/// Validated evaluation request plus whatever had to be coerced to build it.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub input: EvaluationInput,
    pub issues: Vec<ParamIssue>,
}

impl CheckRequest {
    pub fn from_params(params: CheckParams) -> Self {
        let mut issues = Vec::new();

        let my_side = match present(params.my_team) {
            Some(v) if v == "home" => Side::Home,
            Some(v) if v == "away" => Side::Away,
            Some(v) => {
                issues.push(ParamIssue::Malformed { field: "my_team", value: v });
                Side::Away
            }
            None => {
                issues.push(ParamIssue::Missing { field: "my_team" });
                Side::Away
            }
        };

        let threshold = number("threshold", params.threshold, DEFAULT_THRESHOLD, &mut issues);
        let home_score = number("home_score", params.home_score, 0, &mut issues);
        let away_score = number("away_score", params.away_score, 0, &mut issues);
        let score_unit = text("score_unit", params.score_unit, DEFAULT_SCORE_UNIT, &mut issues);
        let home_name = text("home_team", params.home_team, DEFAULT_HOME_TEAM, &mut issues);
        let away_name = text("away_team", params.away_team, DEFAULT_AWAY_TEAM, &mut issues);

        let status = match text("status", params.status, FINAL_STATUS, &mut issues) {
            s if s == FINAL_STATUS => EvalStatus::Final,
            s => EvalStatus::NotFinal(s),
        };

        CheckRequest {
            input: EvaluationInput {
                my_side,
                threshold,
                score_unit,
                home_score,
                away_score,
                home_name,
                away_name,
                status,
            },
            issues,
        }
    }
}

/// Blank values count as absent.
fn present(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn number(field: &'static str, raw: Option<String>, default: u32, issues: &mut Vec<ParamIssue>) -> u32 {
    match present(raw) {
        None => {
            issues.push(ParamIssue::Missing { field });
            default
        }
        Some(value) => match value.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                issues.push(ParamIssue::Malformed { field, value });
                0
            }
        },
    }
}

fn text(field: &'static str, raw: Option<String>, default: &str, issues: &mut Vec<ParamIssue>) -> String {
    present(raw).unwrap_or_else(|| {
        issues.push(ParamIssue::Missing { field });
        default.to_string()
    })
}
