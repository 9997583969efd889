//! API-Football client: budgeted, rate-limited fetchers for the two squad
//! phases plus the national-team id search used by the mapping builder.

use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use log::{info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::time::sleep;
use url::form_urlencoded;

use crate::{normalize::normalize_position, schema::Position};

pub const BASE_URL: &str = "https://v3.football.api-sports.io";
/// Free tier allows 10 requests per minute.
pub const REQUEST_DELAY: Duration = Duration::from_secs(7);
/// Daily ceiling is 100; leave a buffer.
pub const MAX_REQUESTS_PER_RUN: u32 = 90;
/// Most recent full international season.
pub const SEASON: u32 = 2024;

pub const API_KEY_ENV: &str = "API_FOOTBALL_KEY";

/// Per-run request allowance.  Exhaustion is a planned stop, not an error:
/// fetchers report "no data" and the run ends early with completed work kept.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RequestBudget {
    used: u32,
    limit: u32,
}

impl RequestBudget {
    pub fn new(limit: u32) -> Self {
        Self { used: 0, limit }
    }
    pub fn exhausted(&self) -> bool {
        self.used >= self.limit
    }
    pub fn record(&mut self) {
        self.used += 1;
    }
    pub fn used(&self) -> u32 {
        self.used
    }
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default)]
    pub results: u32,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub response: Vec<T>,
}

impl<T> Envelope<T> {
    /// The upstream throttle manifests as an empty result set carrying an
    /// error description rather than an HTTP error status.
    pub fn throttled(&self) -> bool {
        self.results == 0 && has_errors(&self.errors)
    }
}

fn has_errors(errors: &serde_json::Value) -> bool {
    match errors {
        serde_json::Value::Null => false,
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

pub struct ApiFootballClient {
    client: reqwest::Client,
    key: String,
    budget: RequestBudget,
}

impl ApiFootballClient {
    pub fn from_env() -> anyhow::Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{API_KEY_ENV} is not set"))?;
        Self::new(key)
    }

    pub fn new(key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            key,
            budget: RequestBudget::new(MAX_REQUESTS_PER_RUN),
        })
    }

    pub fn budget(&self) -> RequestBudget {
        self.budget
    }

    /// One authenticated GET.  Every failure mode (budget, transport,
    /// malformed body, throttle shape) is logged and collapsed to `None`;
    /// no single request may abort the run.
    async fn get<T: DeserializeOwned>(&mut self, path_and_query: &str) -> Option<Envelope<T>> {
        if self.budget.exhausted() {
            warn!(
                "Reached {} requests this run; resume tomorrow",
                self.budget.limit()
            );
            return None;
        }
        sleep(REQUEST_DELAY).await;

        let url = format!("{BASE_URL}/{path_and_query}");
        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.key)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Request failed: {e}");
                return None;
            }
        };
        self.budget.record();

        let envelope = match response.json::<Envelope<T>>().await {
            Ok(e) => e,
            Err(e) => {
                warn!("Malformed response body: {e}");
                return None;
            }
        };
        if envelope.throttled() {
            warn!("API error: {}", envelope.errors);
            return None;
        }
        Some(envelope)
    }

    /// Phase 1: basic roster (~30 players) from the squads endpoint.
    pub async fn fetch_squad_roster(&mut self, api_team_id: u32) -> Vec<RosterPlayer> {
        let Some(envelope) = self
            .get::<SquadTeam>(&format!("players/squads?team={api_team_id}"))
            .await
        else {
            return vec![];
        };
        let Some(squad) = envelope.response.into_iter().next() else {
            return vec![];
        };
        squad
            .players
            .into_iter()
            .map(|p| RosterPlayer {
                api_id: p.id,
                name: p.name,
                age: p.age,
                number: p.number,
                position: normalize_position(p.position.as_deref().unwrap_or_default()),
                photo: p.photo,
            })
            .collect()
    }

    /// Phase 2: every player who appeared for the team in the season, with
    /// appearance and goal totals, following `paging.total`.
    pub async fn fetch_player_stats(
        &mut self,
        api_team_id: u32,
        season: u32,
    ) -> Vec<StatsPlayer> {
        let mut all = vec![];
        let mut page = 1;
        let mut total_pages = 1;
        while page <= total_pages {
            let Some(envelope) = self
                .get::<PlayerEntry>(&format!(
                    "players?team={api_team_id}&season={season}&page={page}"
                ))
                .await
            else {
                break;
            };
            if envelope.response.is_empty() {
                break;
            }
            if let Some(paging) = envelope.paging {
                total_pages = paging.total;
            }
            all.extend(envelope.response.into_iter().map(flatten_stats));
            page += 1;
        }
        info!("Fetched {} players over {} page(s)", all.len(), page - 1);
        all
    }

    /// Resolves a search term to the senior men's national team, skipping
    /// women's (" W") and youth ("U1x"/"U2x") sides.
    pub async fn search_national_team(&mut self, search: &str) -> Option<TeamHit> {
        let query: String = form_urlencoded::byte_serialize(search.as_bytes()).collect();
        let envelope = self
            .get::<TeamEntry>(&format!("teams?search={query}"))
            .await?;
        envelope
            .response
            .into_iter()
            .map(|e| e.team)
            .find(|t| {
                t.national
                    && !t.name.contains(" W")
                    && !t.name.contains("U2")
                    && !t.name.contains("U1")
            })
            .map(|t| TeamHit {
                id: t.id,
                name: t.name,
                code: t.code,
            })
    }
}

/// Phase 1 payload, also the cache format for the roster phase.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub api_id: u64,
    pub name: String,
    pub age: Option<u32>,
    pub number: Option<u32>,
    pub position: Position,
    pub photo: Option<String>,
}

/// Phase 2 payload, also the cache format for the stats phase.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPlayer {
    pub api_id: u64,
    pub name: String,
    pub short_name: Option<String>,
    pub age: Option<u32>,
    pub dob: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub position: Position,
    pub caps: u32,
    pub goals: u32,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamHit {
    pub id: u32,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquadTeam {
    #[serde(default)]
    players: Vec<SquadApiPlayer>,
}

#[derive(Debug, Deserialize)]
struct SquadApiPlayer {
    id: u64,
    name: String,
    age: Option<u32>,
    number: Option<u32>,
    position: Option<String>,
    photo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    player: ApiPlayer,
    #[serde(default)]
    statistics: Vec<StatBlock>,
}

#[derive(Debug, Deserialize)]
struct ApiPlayer {
    id: u64,
    name: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
    age: Option<u32>,
    #[serde(default)]
    birth: Birth,
    nationality: Option<String>,
    photo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Birth {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct StatBlock {
    #[serde(default)]
    games: Games,
    #[serde(default)]
    goals: Goals,
}

// "appearences" is the upstream field spelling.
#[derive(Debug, Default, Deserialize)]
struct Games {
    appearences: Option<u32>,
    position: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Goals {
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
    code: Option<String>,
    #[serde(default)]
    national: bool,
}

/// Sums appearances and goals across all national-team competition blocks;
/// the first block naming a position wins.
fn flatten_stats(entry: PlayerEntry) -> StatsPlayer {
    let p = entry.player;
    let mut caps = 0;
    let mut goals = 0;
    let mut position = None;
    for block in &entry.statistics {
        caps += block.games.appearences.unwrap_or(0);
        goals += block.goals.total.unwrap_or(0);
        if position.is_none() {
            position.clone_from(&block.games.position);
        }
    }

    let full_name = format!(
        "{} {}",
        p.firstname.as_deref().unwrap_or_default(),
        p.lastname.as_deref().unwrap_or_default()
    )
    .trim()
    .to_owned();
    let short_name = p.name;
    let name = if full_name.is_empty() {
        short_name.clone().unwrap_or_default()
    } else {
        full_name
    };

    StatsPlayer {
        api_id: p.id,
        name,
        short_name,
        age: p.age,
        dob: p.birth.date,
        nationality: p.nationality,
        position: normalize_position(position.as_deref().unwrap_or_default()),
        caps,
        goals,
        photo: p.photo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_shape_is_detected() {
        let throttled: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"errors":{"rateLimit":"Too many requests"},"results":0,"response":[]}"#,
        )
        .unwrap();
        assert!(throttled.throttled());

        let ok: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"errors":[],"results":1,"response":[{"x":1}]}"#).unwrap();
        assert!(!ok.throttled());

        // Empty responses without errors are just empty, not throttled
        let empty: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"errors":[],"results":0,"response":[]}"#).unwrap();
        assert!(!empty.throttled());
    }

    #[test]
    fn budget_is_a_clean_stop() {
        let mut budget = RequestBudget::new(2);
        assert!(!budget.exhausted());
        budget.record();
        budget.record();
        assert!(budget.exhausted());
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn stats_are_summed_across_competitions() {
        let entry: PlayerEntry = serde_json::from_str(
            r#"{
                "player": {
                    "id": 7, "name": "J. Doe", "firstname": "Jane", "lastname": "Doe",
                    "age": 27, "birth": {"date": "1998-04-02"}, "nationality": "England"
                },
                "statistics": [
                    {"games": {"appearences": 5, "position": "Goalkeeper"}, "goals": {"total": 0}},
                    {"games": {"appearences": 3, "position": null}, "goals": {"total": 1}}
                ]
            }"#,
        )
        .unwrap();
        let stats = flatten_stats(entry);
        assert_eq!(stats.name, "Jane Doe");
        assert_eq!(stats.short_name.as_deref(), Some("J. Doe"));
        assert_eq!(stats.position, Position::Gk);
        assert_eq!(stats.caps, 8);
        assert_eq!(stats.goals, 1);
        assert_eq!(
            stats.dob,
            Some(chrono::NaiveDate::from_ymd_opt(1998, 4, 2).unwrap())
        );
    }
}
