//! Squad-document bookkeeping around the team loop: loading the previous
//! document, overwriting entries wholesale on success, preserving them on
//! failure, and guaranteeing a placeholder for every configured team.

use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::{
    config::manager_for,
    fs_json_util::read_json,
    schema::{MappingFile, Player, SquadEntry, SquadFile},
};

pub const STATUS_PRELIMINARY: &str = "preliminary";

pub fn load_or_create_squads(path: &Path) -> anyhow::Result<SquadFile> {
    if !path.exists() {
        info!("{path:?} not found; starting a fresh squad document");
        return Ok(SquadFile::new());
    }
    let squads: SquadFile = read_json(path)?;
    info!("Loaded {} squad entries from {path:?}", squads.len());
    Ok(squads)
}

/// Overwrites a team's entry wholesale.  An empty merge result means the
/// fetch failed or produced nothing; the previous entry (if any) must
/// survive untouched.
pub fn store_team_entry(
    squads: &mut SquadFile,
    team: &str,
    players: Vec<Player>,
    today: NaiveDate,
) -> bool {
    if players.is_empty() {
        return false;
    }
    let manager = manager_for(team)
        .map(str::to_owned)
        .or_else(|| squads.get(team).and_then(|prev| prev.manager.clone()));
    squads.insert(
        team.to_owned(),
        SquadEntry {
            last_updated: today,
            status: STATUS_PRELIMINARY.to_owned(),
            manager,
            players,
        },
    );
    true
}

/// Every mapped team gets a document entry, empty placeholder included, so
/// downstream consumers never have to special-case a missing key.
pub fn ensure_all_teams(squads: &mut SquadFile, mapping: &MappingFile, today: NaiveDate) {
    for team in mapping.keys() {
        squads.entry(team.clone()).or_insert_with(|| SquadEntry {
            last_updated: today,
            status: STATUS_PRELIMINARY.to_owned(),
            manager: manager_for(team).map(str::to_owned),
            players: vec![],
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::schema::{Position, TeamMapping, Tier};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn player(name: &str) -> Player {
        Player {
            name: name.to_owned(),
            short_name: None,
            position: Position::Mid,
            age: None,
            dob: None,
            number: None,
            caps: 0,
            goals: 0,
            club: None,
            tier: Tier::Core,
        }
    }

    #[test]
    fn empty_merge_preserves_previous_entry() {
        let mut squads = SquadFile::new();
        assert!(store_team_entry(
            &mut squads,
            "eng",
            vec![player("Jane Doe")],
            date(2026, 1, 1),
        ));
        let before = squads["eng"].clone();

        assert!(!store_team_entry(&mut squads, "eng", vec![], date(2026, 2, 2)));
        assert_eq!(squads["eng"], before);
    }

    #[test]
    fn successful_merge_overwrites_wholesale() {
        let mut squads = SquadFile::new();
        store_team_entry(&mut squads, "eng", vec![player("Jane Doe")], date(2026, 1, 1));
        store_team_entry(&mut squads, "eng", vec![player("Ann Smith")], date(2026, 2, 2));
        let entry = &squads["eng"];
        assert_eq!(entry.last_updated, date(2026, 2, 2));
        assert_eq!(entry.players.len(), 1);
        assert_eq!(entry.players[0].name, "Ann Smith");
    }

    #[test]
    fn every_mapped_team_gets_a_placeholder() {
        let mut squads = SquadFile::new();
        let mut mapping = MappingFile::new();
        for code in ["eng", "bra"] {
            mapping.insert(
                code.to_owned(),
                TeamMapping {
                    api_id: 1,
                    name: code.to_owned(),
                    code: None,
                    wiki_page: None,
                },
            );
        }
        store_team_entry(&mut squads, "eng", vec![player("Jane Doe")], date(2026, 1, 1));
        ensure_all_teams(&mut squads, &mapping, date(2026, 1, 1));
        assert_eq!(squads.len(), 2);
        assert!(squads["bra"].players.is_empty());
        assert_eq!(squads["eng"].players.len(), 1);
    }
}
