//! Regular-season division standings from the MLB stats API.

use super::{DataSource, FetchError};
use crate::screens::standings::abbreviate_team;
use crate::screens::TeamRecord;
use reqwest::Client;
use serde::Deserialize;

const STANDINGS_URL: &str = "https://statsapi.mlb.com/api/v1/standings";

/// Teams kept from the selected division.
const MAX_TEAMS: usize = 4;

#[derive(Deserialize)]
struct StandingsResponse {
    records: Vec<DivisionRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DivisionRecord {
    division: Division,
    team_records: Vec<ApiTeamRecord>,
}

#[derive(Deserialize)]
struct Division {
    id: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeamRecord {
    team: Team,
    wins: u32,
    losses: u32,
    games_back: String,
}

#[derive(Deserialize)]
struct Team {
    name: String,
}

/// Pick `division_id` out of a standings body and keep its first four teams.
pub fn parse_standings(body: &str, division_id: u32) -> Result<Vec<TeamRecord>, FetchError> {
    let response: StandingsResponse = serde_json::from_str(body)?;
    let division = response
        .records
        .into_iter()
        .find(|record| record.division.id == division_id)
        .ok_or(FetchError::DivisionNotFound(division_id))?;

    Ok(division
        .team_records
        .into_iter()
        .take(MAX_TEAMS)
        .map(|record| TeamRecord {
            abbreviation: abbreviate_team(&record.team.name),
            wins: record.wins,
            losses: record.losses,
            games_back: record.games_back,
        })
        .collect())
}

pub struct StandingsSource {
    client: Client,
    league_id: u32,
    division_id: u32,
    season: i32,
}

impl StandingsSource {
    pub fn new(client: Client, league_id: u32, division_id: u32, season: i32) -> Self {
        Self {
            client,
            league_id,
            division_id,
            season,
        }
    }
}

impl DataSource for StandingsSource {
    type Output = Vec<TeamRecord>;

    fn name(&self) -> &'static str {
        "standings"
    }

    async fn fetch(&self) -> Result<Vec<TeamRecord>, FetchError> {
        let body = self
            .client
            .get(STANDINGS_URL)
            .query(&[
                ("leagueId", self.league_id.to_string()),
                ("season", self.season.to_string()),
                ("standingsTypes", "regularSeason".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_standings(&body, self.division_id)
    }
}
