//! Tiering & merge engine.
//!
//! Two named strategies share one finish (exclusion, sort, cap), because
//! the two fetch paths carry materially different tier policies:
//!
//! * [`merge_roster_with_call_ups`] (encyclopedia path) — identity is the
//!   lowercase name, duplicates are dropped whole, and the extended/potential
//!   split is decided by call-up recency.
//! * [`merge_roster_with_stats`] (API path) — identity is the upstream
//!   player id, fields are combined across the two phases, and the split is
//!   decided by recorded appearances.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::{
    api::{RosterPlayer, StatsPlayer},
    normalize::{age_on, is_stale_call_up},
    schema::{Player, Position, Tier},
    wiki::table::SquadRow,
};

/// Hard ceiling on a merged squad list.  Core entries are always retained,
/// even when they alone exceed it.
pub const SQUAD_CAP: usize = 55;

/// Call-ups older than this many (30-day) months are "stale".
pub const STALE_MONTHS: u32 = 12;

/// Encyclopedia policy.  `current` rows become core; `recent` rows become
/// extended, or potential when the call-up is stale.  First occurrence of a
/// name wins; later duplicates are dropped entirely.
pub fn merge_roster_with_call_ups(
    current: &[SquadRow],
    recent: &[SquadRow],
    excluded: &[String],
    today: NaiveDate,
) -> Vec<Player> {
    let mut seen = HashSet::new();
    let mut players = vec![];
    let tiers = current
        .iter()
        .map(|row| (row, Tier::Core))
        .chain(recent.iter().map(|row| {
            let stale = row
                .call_up
                .as_deref()
                .is_some_and(|text| is_stale_call_up(text, today, STALE_MONTHS));
            (row, if stale { Tier::Potential } else { Tier::Extended })
        }));
    for (row, tier) in tiers {
        let key = row.name.to_lowercase();
        if is_excluded(&row.name, excluded) || !seen.insert(key) {
            continue;
        }
        players.push(Player {
            name: row.name.clone(),
            short_name: None,
            position: row.position,
            age: row.dob.map(|dob| age_on(dob, today)),
            dob: row.dob,
            number: row.number,
            caps: row.caps,
            goals: row.goals,
            club: row.club.clone(),
            tier,
        });
    }
    sort_and_cap(players)
}

/// API policy.  Keyed by upstream id; fields combine across the two phases,
/// preferring the richer stats source for name, position and age.  In the
/// roster: core; otherwise extended when any appearance is recorded, else
/// potential.
pub fn merge_roster_with_stats(
    roster: &[RosterPlayer],
    stats: &[StatsPlayer],
    excluded: &[String],
    today: NaiveDate,
) -> Vec<Player> {
    let roster_by_id: BTreeMap<u64, &RosterPlayer> =
        roster.iter().map(|p| (p.api_id, p)).collect();
    let stats_by_id: BTreeMap<u64, &StatsPlayer> = stats.iter().map(|p| (p.api_id, p)).collect();
    let all_ids: BTreeSet<u64> = roster_by_id.keys().chain(stats_by_id.keys()).copied().collect();

    let mut players = vec![];
    for id in all_ids {
        let r = roster_by_id.get(&id);
        let s = stats_by_id.get(&id);

        let name = s
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| s.and_then(|s| s.short_name.clone()))
            .or_else(|| r.map(|r| r.name.clone()))
            .unwrap_or_default();
        if name.is_empty() || is_excluded(&name, excluded) {
            continue;
        }

        let dob = s.and_then(|s| s.dob);
        let caps = s.map_or(0, |s| s.caps);
        let tier = if r.is_some() {
            Tier::Core
        } else if caps > 0 {
            Tier::Extended
        } else {
            Tier::Potential
        };
        players.push(Player {
            name,
            short_name: s.and_then(|s| s.short_name.clone()),
            position: s
                .map(|s| s.position)
                .or_else(|| r.map(|r| r.position))
                .unwrap_or(Position::Mid),
            age: s
                .and_then(|s| s.age)
                .or_else(|| r.and_then(|r| r.age))
                .or_else(|| dob.map(|dob| age_on(dob, today))),
            dob,
            number: r.and_then(|r| r.number),
            caps,
            goals: s.map_or(0, |s| s.goals),
            club: None,
            tier,
        });
    }
    sort_and_cap(players)
}

fn is_excluded(name: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|e| e.eq_ignore_ascii_case(name))
}

/// Total order: tier, then position, then caps descending, then name, so
/// identical inputs in any row order merge to an identical list.  Truncation
/// after the sort keeps every core entry plus the best of the rest.
fn sort_and_cap(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(|a, b| {
        (a.tier, a.position, Reverse(a.caps), a.name.to_lowercase()).cmp(&(
            b.tier,
            b.position,
            Reverse(b.caps),
            b.name.to_lowercase(),
        ))
    });
    let core = players.iter().filter(|p| p.tier == Tier::Core).count();
    players.truncate(SQUAD_CAP.max(core));
    players
}
