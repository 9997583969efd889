use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Field position, ordered the way a squad list is printed.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, EnumIter, Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Position {
    Gk,
    Def,
    Mid,
    Fwd,
}

/// Squad status classification.  Ordering doubles as sort priority:
/// core entries always precede extended, which precede potential.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, EnumIter, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Core,
    Extended,
    Potential,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub position: Position,
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub caps: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    pub tier: Tier,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadEntry {
    pub last_updated: NaiveDate,
    pub status: String,
    pub manager: Option<String>,
    pub players: Vec<Player>,
}

/// The squad document, keyed by internal team code.
pub type SquadFile = BTreeMap<String, SquadEntry>;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMapping {
    pub api_id: u32,
    pub name: String,
    pub code: Option<String>,
    /// Wikipedia article title; maintained by hand alongside the mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_page: Option<String>,
}

pub type MappingFile = BTreeMap<String, TeamMapping>;

/// Per-team list of player names to suppress during merge.
pub type ExclusionsFile = BTreeMap<String, Vec<String>>;
