use serde::{Deserialize, Serialize};

/// Which side of the matchup the user is following.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Normalized game state, independent of the upstream feed's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Final,
    /// Detail is the feed's short clock text, e.g. "Q3 2:15" or "Halftime"
    InProgress(String),
    /// Detail is the start time or a postponement note
    Scheduled(String),
}

impl GameStatus {
    /// Text shown to the user and echoed back on `/api/check`.
    pub fn label(&self) -> &str {
        match self {
            GameStatus::Final => "Final",
            GameStatus::InProgress(detail) | GameStatus::Scheduled(detail) => detail,
        }
    }

    /// Machine-readable state: "final" | "in_progress" | "scheduled"
    pub fn state(&self) -> &'static str {
        match self {
            GameStatus::Final => "final",
            GameStatus::InProgress(_) => "in_progress",
            GameStatus::Scheduled(_) => "scheduled",
        }
    }
}

/// One side of a game as reported by the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamScore {
    pub name: String,
    pub abbreviation: String,
    pub score: u32,
    /// Logo URL, empty when the feed has none
    pub logo: String,
}

/// A single game for one sport and date, rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGame {
    pub id: String,
    /// Start time as reported upstream (ISO-8601, minute precision)
    pub date: String,
    pub status: GameStatus,
    pub home: TeamScore,
    pub away: TeamScore,
}

impl NormalizedGame {
    /// Which side the favorite team plays on, if it is in this game.
    ///
    /// Matching is a case-insensitive substring test in both directions so
    /// that "Knicks" and "New York Knicks" both match. Away is checked first.
    pub fn favorite_side(&self, favorite_team: &str) -> Option<Side> {
        let favorite = favorite_team.trim().to_lowercase();
        if favorite.is_empty() {
            return None;
        }
        let matches = |name: &str| {
            let name = name.trim().to_lowercase();
            !name.is_empty() && (name.contains(&favorite) || favorite.contains(&name))
        };

        if matches(&self.away.name) {
            Some(Side::Away)
        } else if matches(&self.home.name) {
            Some(Side::Home)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, score: u32) -> TeamScore {
        TeamScore {
            name: name.into(),
            abbreviation: String::new(),
            score,
            logo: String::new(),
        }
    }

    fn game(home: &str, away: &str) -> NormalizedGame {
        NormalizedGame {
            id: "1".into(),
            date: "2024-01-15T00:30Z".into(),
            status: GameStatus::Scheduled("7:30 PM".into()),
            home: team(home, 0),
            away: team(away, 0),
        }
    }

    #[test]
    fn test_status_label() {
        assert_eq!(GameStatus::Final.label(), "Final");
        assert_eq!(GameStatus::InProgress("Q3 2:15".into()).label(), "Q3 2:15");
        assert_eq!(GameStatus::Scheduled("Postponed".into()).label(), "Postponed");
    }

    #[test]
    fn test_status_state() {
        assert_eq!(GameStatus::Final.state(), "final");
        assert_eq!(GameStatus::InProgress("Half".into()).state(), "in_progress");
        assert_eq!(GameStatus::Scheduled("TBD".into()).state(), "scheduled");
    }

    #[test]
    fn test_favorite_side_full_name() {
        let g = game("Boston Celtics", "New York Knicks");
        assert_eq!(g.favorite_side("New York Knicks"), Some(Side::Away));
    }

    #[test]
    fn test_favorite_side_partial_name() {
        // Feed shows a short name, favorite is configured with the full one
        let g = game("Arsenal", "Chelsea");
        assert_eq!(g.favorite_side("Arsenal FC"), Some(Side::Home));
        assert_eq!(g.favorite_side("arsenal"), Some(Side::Home));
    }

    #[test]
    fn test_favorite_side_absent() {
        let g = game("Boston Celtics", "Los Angeles Lakers");
        assert_eq!(g.favorite_side("New York Knicks"), None);
        assert_eq!(g.favorite_side(""), None);
    }

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Home).unwrap(), "\"home\"");
        let side: Side = serde_json::from_str("\"away\"").unwrap();
        assert_eq!(side, Side::Away);
    }
}
