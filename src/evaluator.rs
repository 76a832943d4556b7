//! Spoiler-safe "worth watching" evaluation.
//!
//! Given both scores, which side the user follows and a tolerated losing
//! margin, decide whether the game is worth watching without putting the
//! outcome in the user-facing `reason`.
//!
//! Verdict (same rule for finished and unfinished games):
//!   diff = my_score − opp_score
//!   diff ≥ 0              → worth watching (ahead, or level)
//!   diff < 0, |diff| ≤ t  → worth watching (close loss)
//!   otherwise             → not worth watching
//!
//! Anything that reveals the margin or the leader lives only in
//! `differential_info` (in-progress) or `score` (final), which the caller
//! shows on explicit request.

use serde::Serialize;

use crate::models::{GameStatus, NormalizedGame, Side};

/// Finished-or-not, as far as the evaluator cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalStatus {
    Final,
    /// Status text interpolated into the reason, e.g. "Q3 2:15"
    NotFinal(String),
}

impl EvalStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, EvalStatus::Final)
    }
}

impl From<&GameStatus> for EvalStatus {
    fn from(status: &GameStatus) -> Self {
        match status {
            GameStatus::Final => EvalStatus::Final,
            other => EvalStatus::NotFinal(other.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationInput {
    pub my_side: Side,
    pub threshold: u32,
    pub score_unit: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_name: String,
    pub away_name: String,
    pub status: EvalStatus,
}

impl EvaluationInput {
    /// Build an input from a scoreboard game and the user's choices.
    #[allow(dead_code)]
    pub fn from_game(game: &NormalizedGame, my_side: Side, threshold: u32, score_unit: &str) -> Self {
        EvaluationInput {
            my_side,
            threshold,
            score_unit: score_unit.to_string(),
            home_score: game.home.score,
            away_score: game.away.score,
            home_name: game.home.name.clone(),
            away_name: game.away.name.clone(),
            status: EvalStatus::from(&game.status),
        }
    }
}

/// Strict sign of the current differential. A tie is its own state here,
/// unlike the verdict rule which folds it into "ahead".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Winning,
    Losing,
    Tied,
}

/// Reveal-gated differential for an unfinished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferentialInfo {
    /// Absolute margin
    pub differential: u32,
    pub diff_status: DiffStatus,
    pub diff_msg: String,
    pub within_threshold: bool,
    pub threshold: u32,
    pub score_unit: String,
}

/// Literal result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub home_team: String,
    pub home_score: u32,
    pub away_team: String,
    pub away_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub worth_watching: bool,
    /// Safe to display before the user opts into a reveal
    pub reason: String,
    pub game_finished: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub game_in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<FinalScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential_info: Option<DifferentialInfo>,
}

/// Evaluate a game. Pure: identical inputs give identical results.
pub fn evaluate(input: &EvaluationInput) -> EvaluationResult {
    let (my_score, opp_score, my_team_name) = match input.my_side {
        Side::Home => (input.home_score, input.away_score, input.home_name.as_str()),
        Side::Away => (input.away_score, input.home_score, input.away_name.as_str()),
    };
    let diff = i64::from(my_score) - i64::from(opp_score);
    let worth_watching = is_worth_watching(diff, input.threshold);
    let reason = reason_text(worth_watching, my_team_name, input);

    match &input.status {
        EvalStatus::Final => EvaluationResult {
            worth_watching,
            reason,
            game_finished: true,
            game_in_progress: false,
            my_team_name: None,
            score: Some(FinalScore {
                home_team: input.home_name.clone(),
                home_score: input.home_score,
                away_team: input.away_name.clone(),
                away_score: input.away_score,
            }),
            differential_info: None,
        },
        EvalStatus::NotFinal(_) => EvaluationResult {
            worth_watching,
            reason,
            game_finished: false,
            game_in_progress: true,
            my_team_name: Some(my_team_name.to_string()),
            score: None,
            differential_info: Some(differential_info(
                diff,
                my_score,
                opp_score,
                my_team_name,
                input,
            )),
        },
    }
}

fn is_worth_watching(diff: i64, threshold: u32) -> bool {
    diff >= 0 || diff.unsigned_abs() <= u64::from(threshold)
}

/// Never reads the scores or the differential.
fn reason_text(worth_watching: bool, my_team_name: &str, input: &EvaluationInput) -> String {
    let threshold = input.threshold;
    let unit = &input.score_unit;
    match (&input.status, worth_watching) {
        (EvalStatus::Final, true) => {
            format!("This game meets your {threshold}-{unit} threshold for {my_team_name}!")
        }
        (EvalStatus::Final, false) => {
            format!("This game doesn't meet your {threshold}-{unit} threshold for {my_team_name}.")
        }
        (EvalStatus::NotFinal(status), true) => format!("Game still in progress ({status})"),
        (EvalStatus::NotFinal(status), false) => {
            format!("Currently outside your {threshold}-{unit} threshold ({status})")
        }
    }
}

fn differential_info(
    diff: i64,
    my_score: u32,
    opp_score: u32,
    my_team_name: &str,
    input: &EvaluationInput,
) -> DifferentialInfo {
    let margin = my_score.abs_diff(opp_score);
    let unit = &input.score_unit;
    let (diff_status, diff_msg) = match diff {
        d if d > 0 => (
            DiffStatus::Winning,
            format!("{my_team_name} is winning by {margin} {unit}."),
        ),
        d if d < 0 => (
            DiffStatus::Losing,
            format!("{my_team_name} is losing by {margin} {unit}."),
        ),
        _ => (DiffStatus::Tied, "The game is tied!".to_string()),
    };

    // Same boolean as the verdict, computed independently; both are exposed.
    let within_threshold = margin <= input.threshold || my_score >= opp_score;

    DifferentialInfo {
        differential: margin,
        diff_status,
        diff_msg,
        within_threshold,
        threshold: input.threshold,
        score_unit: unit.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(side: Side, threshold: u32, home: u32, away: u32, status: EvalStatus) -> EvaluationInput {
        EvaluationInput {
            my_side: side,
            threshold,
            score_unit: "points".into(),
            home_score: home,
            away_score: away,
            home_name: "New York Knicks".into(),
            away_name: "Boston Celtics".into(),
            status,
        }
    }

    fn live(detail: &str) -> EvalStatus {
        EvalStatus::NotFinal(detail.into())
    }

    #[test]
    fn test_close_home_loss_is_worth_watching() {
        let r = evaluate(&input(Side::Home, 10, 95, 100, EvalStatus::Final));
        assert!(r.worth_watching);
        assert!(r.game_finished);
        assert!(r.reason.contains("meets your 10-points threshold"));
        assert!(r.reason.contains("New York Knicks"));
        let score = r.score.unwrap();
        assert_eq!(score.home_score, 95);
        assert_eq!(score.away_score, 100);
        assert!(r.differential_info.is_none());
    }

    #[test]
    fn test_blowout_away_loss_in_progress() {
        let r = evaluate(&input(Side::Away, 7, 100, 85, live("Q4 2:00")));
        assert!(!r.worth_watching);
        assert!(!r.game_finished);
        assert!(r.game_in_progress);
        assert_eq!(r.reason, "Currently outside your 7-points threshold (Q4 2:00)");
        assert_eq!(r.my_team_name.as_deref(), Some("Boston Celtics"));
        let info = r.differential_info.unwrap();
        assert_eq!(info.diff_status, DiffStatus::Losing);
        assert_eq!(info.differential, 15);
        assert!(!info.within_threshold);
        assert_eq!(info.diff_msg, "Boston Celtics is losing by 15 points.");
        assert!(r.score.is_none());
    }

    #[test]
    fn test_final_tie_always_worth_watching() {
        for threshold in [0, 1, 5] {
            for side in [Side::Home, Side::Away] {
                let r = evaluate(&input(side, threshold, 2, 2, EvalStatus::Final));
                assert!(r.worth_watching, "tie should count as a non-loss");
            }
        }
    }

    #[test]
    fn test_non_loss_ignores_threshold() {
        for my in 0..12u32 {
            for opp in 0..=my {
                let r = evaluate(&input(Side::Home, 0, my, opp, EvalStatus::Final));
                assert!(r.worth_watching, "{my}-{opp} should be worth watching");
                let r = evaluate(&input(Side::Away, 0, opp, my, live("Q2 5:00")));
                assert!(r.worth_watching, "{my}-{opp} live should be worth watching");
            }
        }
    }

    #[test]
    fn test_loss_verdict_follows_threshold() {
        for threshold in 0..6u32 {
            for deficit in 1..10u32 {
                let r = evaluate(&input(Side::Home, threshold, 20, 20 + deficit, EvalStatus::Final));
                assert_eq!(r.worth_watching, deficit <= threshold);
            }
        }
    }

    #[test]
    fn test_loss_at_exact_threshold() {
        let r = evaluate(&input(Side::Away, 3, 5, 2, EvalStatus::Final));
        assert!(r.worth_watching);
        let r = evaluate(&input(Side::Away, 2, 5, 2, EvalStatus::Final));
        assert!(!r.worth_watching);
        assert_eq!(
            r.reason,
            "This game doesn't meet your 2-points threshold for Boston Celtics."
        );
    }

    #[test]
    fn test_diff_status_is_strict() {
        let tied = evaluate(&input(Side::Home, 0, 3, 3, live("P2 10:00")));
        let info = tied.differential_info.unwrap();
        assert_eq!(info.diff_status, DiffStatus::Tied);
        assert_eq!(info.diff_msg, "The game is tied!");
        assert_eq!(info.differential, 0);
        assert!(tied.worth_watching);

        let ahead = evaluate(&input(Side::Home, 0, 4, 3, live("P2 10:00")));
        let info = ahead.differential_info.unwrap();
        assert_eq!(info.diff_status, DiffStatus::Winning);
        assert_eq!(info.diff_msg, "New York Knicks is winning by 1 points.");

        let behind = evaluate(&input(Side::Home, 5, 3, 4, live("P2 10:00")));
        assert_eq!(behind.differential_info.unwrap().diff_status, DiffStatus::Losing);
    }

    #[test]
    fn test_within_threshold_matches_verdict() {
        for threshold in 0..5u32 {
            for home in 0..8u32 {
                for away in 0..8u32 {
                    let r = evaluate(&input(Side::Home, threshold, home, away, live("Q1")));
                    let info = r.differential_info.as_ref().unwrap();
                    assert_eq!(info.within_threshold, r.worth_watching);
                    assert_eq!(info.threshold, threshold);
                    assert_eq!(info.score_unit, "points");
                }
            }
        }
    }

    #[test]
    fn test_unfinished_reason_has_no_scores() {
        let cases = [(Side::Home, 87u32, 64u32), (Side::Away, 87, 64), (Side::Home, 13, 58)];
        for (side, home, away) in cases {
            let r = evaluate(&input(side, 9, home, away, live("Halftime")));
            for digit in home.to_string().chars().chain(away.to_string().chars()) {
                assert!(!r.reason.contains(digit), "reason leaked {digit}: {}", r.reason);
            }
            assert!(!r.reason.contains("winning"));
            assert!(!r.reason.contains("losing"));
        }
    }

    #[test]
    fn test_final_loss_reason_hides_margin() {
        let r = evaluate(&input(Side::Home, 1, 48, 93, EvalStatus::Final));
        assert!(!r.worth_watching);
        assert!(!r.reason.contains("48"));
        assert!(!r.reason.contains("93"));
        assert!(!r.reason.contains("45"));
    }

    #[test]
    fn test_final_score_echoes_input() {
        let mut i = input(Side::Away, 3, 7, 4, EvalStatus::Final);
        i.home_name = "Arsenal".into();
        i.away_name = "Chelsea".into();
        let score = evaluate(&i).score.unwrap();
        assert_eq!(
            score,
            FinalScore {
                home_team: "Arsenal".into(),
                home_score: 7,
                away_team: "Chelsea".into(),
                away_score: 4,
            }
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let i = input(Side::Away, 4, 101, 99, live("OT 1:12"));
        assert_eq!(evaluate(&i), evaluate(&i));
    }

    #[test]
    fn test_from_game_maps_status() {
        use crate::models::TeamScore;
        let team = |name: &str, score| TeamScore {
            name: name.to_string(),
            abbreviation: String::new(),
            score,
            logo: String::new(),
        };
        let game = NormalizedGame {
            id: "401".into(),
            date: "2024-01-15T00:30Z".into(),
            status: GameStatus::InProgress("Q3 2:15".into()),
            home: team("Arsenal", 1),
            away: team("Chelsea", 0),
        };
        let i = EvaluationInput::from_game(&game, Side::Home, 1, "goals");
        assert_eq!(i.status, EvalStatus::NotFinal("Q3 2:15".into()));
        assert_eq!(i.home_score, 1);
        assert_eq!(i.away_name, "Chelsea");
        assert_eq!(evaluate(&i).reason, "Game still in progress (Q3 2:15)");
    }

    #[test]
    fn test_json_shape() {
        let finished = serde_json::to_value(evaluate(&input(Side::Home, 10, 95, 100, EvalStatus::Final))).unwrap();
        assert_eq!(finished["game_finished"], true);
        assert_eq!(finished["score"]["home_team"], "New York Knicks");
        assert!(finished.get("differential_info").is_none());
        assert!(finished.get("game_in_progress").is_none());

        let running = serde_json::to_value(evaluate(&input(Side::Home, 10, 95, 100, live("Q3")))).unwrap();
        assert_eq!(running["game_in_progress"], true);
        assert_eq!(running["differential_info"]["diff_status"], "losing");
        assert_eq!(running["differential_info"]["differential"], 5);
        assert!(running.get("score").is_none());
    }
}
