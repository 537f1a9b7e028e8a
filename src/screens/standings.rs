//! Division standings screen: title plus up to four teams.

use super::{Layout, LayoutError, ScreenRenderer, Snapshot};
use crate::canvas::Rgb;

/// Rows on the panel, one team each.
const ROWS: [i32; 4] = [6, 12, 18, 24];

const TITLE_COLOR: Rgb = Rgb::new(255, 100, 100);
const LEADER_COLOR: Rgb = Rgb::new(100, 255, 100);
const TEAM_COLOR: Rgb = Rgb::new(180, 180, 200);
const WINS_COLOR: Rgb = Rgb::new(100, 200, 255);
const LOSSES_COLOR: Rgb = Rgb::new(255, 150, 100);
const GAMES_BACK_COLOR: Rgb = Rgb::new(200, 200, 100);
const ERROR_COLOR: Rgb = Rgb::new(255, 50, 50);

const ABBREVIATIONS: [(&str, &str); 5] = [
    ("Atlanta Braves", "ATL"),
    ("New York Mets", "NYM"),
    ("Philadelphia Phillies", "PHI"),
    ("Miami Marlins", "MIA"),
    ("Washington Nationals", "WSH"),
];

/// One team's line in the standings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamRecord {
    pub abbreviation: String,
    pub wins: u32,
    pub losses: u32,
    /// Games behind the leader as published ("-" for the leader, "2.5", ...)
    pub games_back: String,
}

/// Three-letter code for a full team name; unknown names use their first
/// three characters.
pub fn abbreviate_team(name: &str) -> String {
    ABBREVIATIONS
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, short)| short.to_string())
        .unwrap_or_else(|| name.chars().take(3).collect::<String>().to_uppercase())
}

/// Games-back figure to draw, if any.
///
/// Leader placeholders ("-", "0.0") and non-positive values draw nothing.
fn games_back(team: &TeamRecord) -> Result<Option<&str>, LayoutError> {
    let value = team.games_back.trim();
    if value.is_empty() || value == "-" || value == "0.0" {
        return Ok(None);
    }
    let behind: f32 = value.parse().map_err(|_| LayoutError::GamesBack {
        team: team.abbreviation.clone(),
        value: team.games_back.clone(),
    })?;
    Ok((behind > 0.0).then_some(value))
}

pub struct StandingsScreen {
    title: String,
}

impl StandingsScreen {
    /// `title` names the division, e.g. "NL EAST".
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl ScreenRenderer for StandingsScreen {
    type Data = Vec<TeamRecord>;

    fn name(&self) -> &'static str {
        "standings"
    }

    fn layout(&self, snapshot: &Snapshot<Vec<TeamRecord>>) -> Result<Layout, LayoutError> {
        let teams = match snapshot {
            Snapshot::Ready(teams) if !teams.is_empty() => teams,
            Snapshot::Ready(_) | Snapshot::Loading => return Ok(Layout::loading()),
            Snapshot::Failed => {
                let mut layout = Layout::new();
                layout
                    .text(self.title.as_str(), 22, 0, TITLE_COLOR)
                    .text("ERROR", 8, 12, ERROR_COLOR);
                return Ok(layout);
            }
        };

        let mut layout = Layout::new();
        layout.text(self.title.as_str(), 22, 0, TITLE_COLOR);

        for (idx, (team, &y)) in teams.iter().zip(ROWS.iter()).enumerate() {
            let color = if idx == 0 { LEADER_COLOR } else { TEAM_COLOR };
            layout
                .text(team.abbreviation.as_str(), 1, y, color)
                .text(team.wins.to_string(), 18, y, WINS_COLOR)
                .text(team.losses.to_string(), 32, y, LOSSES_COLOR);

            if idx > 0 {
                if let Some(behind) = games_back(team)? {
                    layout.text(behind, 46, y, GAMES_BACK_COLOR);
                }
            }
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(abbreviation: &str, wins: u32, losses: u32, games_back: &str) -> TeamRecord {
        TeamRecord {
            abbreviation: abbreviation.to_string(),
            wins,
            losses,
            games_back: games_back.to_string(),
        }
    }

    fn division() -> Vec<TeamRecord> {
        vec![
            team("PHI", 95, 67, "-"),
            team("ATL", 89, 73, "0.0"),
            team("NYM", 89, 73, "2.5"),
            team("WSH", 71, 91, "24.0"),
        ]
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(abbreviate_team("Philadelphia Phillies"), "PHI");
        assert_eq!(abbreviate_team("Washington Nationals"), "WSH");
        assert_eq!(abbreviate_team("Pittsburgh Pirates"), "PIT");
        assert_eq!(abbreviate_team("Ny"), "NY");
    }

    #[test]
    fn test_games_back_rendering() {
        let screen = StandingsScreen::new("NL EAST");
        let layout = screen.layout(&Snapshot::Ready(division())).unwrap();

        // Team 2 at 0.0 shows nothing in the games-back column
        assert!(!layout.items().iter().any(|i| i.y == 12 && i.x == 46));
        let third = layout.find("2.5").unwrap();
        assert_eq!((third.x, third.y), (46, 18));
        assert_eq!(layout.find("24.0").unwrap().y, 24);
        // Leader never shows a games-back figure
        assert!(!layout.items().iter().any(|i| i.y == 6 && i.x == 46));
    }

    #[test]
    fn test_leader_highlight() {
        let screen = StandingsScreen::new("NL EAST");
        let layout = screen.layout(&Snapshot::Ready(division())).unwrap();

        assert_eq!(layout.find("PHI").unwrap().color, LEADER_COLOR);
        for abbr in ["ATL", "NYM", "WSH"] {
            assert_eq!(layout.find(abbr).unwrap().color, TEAM_COLOR);
        }
        let title = layout.find("NL EAST").unwrap();
        assert_eq!((title.x, title.y), (22, 0));
    }

    #[test]
    fn test_only_four_rows() {
        let mut teams = division();
        teams.push(team("MIA", 62, 100, "33.0"));
        let screen = StandingsScreen::new("NL EAST");
        let layout = screen.layout(&Snapshot::Ready(teams)).unwrap();
        assert!(layout.find("MIA").is_none());
    }

    #[test]
    fn test_loading_when_no_data() {
        let screen = StandingsScreen::new("NL EAST");
        assert_eq!(screen.layout(&Snapshot::Loading).unwrap(), Layout::loading());
        assert_eq!(screen.layout(&Snapshot::Ready(vec![])).unwrap(), Layout::loading());
    }

    #[test]
    fn test_malformed_games_back_fails_layout() {
        let mut teams = division();
        teams[2].games_back = "two".to_string();
        let screen = StandingsScreen::new("NL EAST");
        let err = screen.layout(&Snapshot::Ready(teams)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::GamesBack {
                team: "NYM".to_string(),
                value: "two".to_string()
            }
        );
    }

    #[test]
    fn test_failed_snapshot_shows_error() {
        let screen = StandingsScreen::new("NL EAST");
        let layout = screen.layout(&Snapshot::Failed).unwrap();
        assert!(layout.find("ERROR").is_some());
    }
}
