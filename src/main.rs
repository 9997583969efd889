use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use tokio::time::sleep;

use squad_scraping::{
    api::{ApiFootballClient, RosterPlayer, StatsPlayer, SEASON},
    cache::SquadCache,
    chrono_util::today_utc,
    collector::{ensure_all_teams, load_or_create_squads, store_team_entry},
    config,
    fs_json_util::{read_json, write_json},
    merge::{merge_roster_with_call_ups, merge_roster_with_stats},
    schema::{ExclusionsFile, MappingFile, Player, SquadFile, TeamMapping},
    wiki::{self, parse_squad_page, WikiClient},
};

/// Builds the World Cup squad document, team by team.  Resumable: progress
/// is written after every updated team, and fetch results are cached for a
/// day, so a daily run gradually fills and refreshes all squads.
#[derive(Parser)]
struct Opts {
    /// Quick-roster phase only
    #[arg(long)]
    phase1: bool,
    /// Season-statistics phase only
    #[arg(long)]
    phase2: bool,
    /// Restrict the run to one team code (e.g. "eng")
    #[arg(long)]
    team: Option<String>,
    /// Ignore cached fetch results (entries are kept, just not read)
    #[arg(long)]
    force: bool,
    /// Where the rosters come from
    #[arg(long, value_enum, default_value = "api")]
    source: Source,
    #[arg(long)]
    mapping_path: Option<PathBuf>,
    #[arg(long)]
    squads_path: Option<PathBuf>,
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    #[arg(long)]
    exclusions_path: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Api,
    Wiki,
}

impl Opts {
    fn mapping_path(&self) -> PathBuf {
        self.mapping_path
            .clone()
            .unwrap_or_else(config::default_mapping_path)
    }
    fn squads_path(&self) -> PathBuf {
        self.squads_path
            .clone()
            .unwrap_or_else(config::default_squads_path)
    }
    fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(config::default_cache_dir)
    }
    fn exclusions_path(&self) -> PathBuf {
        self.exclusions_path
            .clone()
            .unwrap_or_else(config::default_exclusions_path)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let mapping: MappingFile = read_json(opts.mapping_path())?;
    let exclusions = load_exclusions(&opts)?;
    let mut squads = load_or_create_squads(&opts.squads_path())?;
    if let Some(parent) = opts.squads_path().parent() {
        fs_err::create_dir_all(parent)?;
    }
    let cache = SquadCache::new(opts.cache_dir());
    let today = today_utc();

    let teams: Vec<String> = match &opts.team {
        Some(team) => vec![team.clone()],
        None => mapping.keys().cloned().collect(),
    };
    info!("Squad scraper: {} team(s), season {SEASON}", teams.len());
    info!(
        "{}",
        if opts.force {
            "Force mode"
        } else {
            "Resumable mode (24h cache)"
        }
    );

    let mut updated = 0;
    match opts.source {
        Source::Api => {
            let mut client = ApiFootballClient::from_env()?;
            for team in &teams {
                let Some(m) = mapping.get(team) else {
                    warn!("{team}: no id mapping, skipping");
                    continue;
                };
                let (roster, stats) =
                    collect_api_phases(&opts, &cache, &mut client, team, m.api_id).await?;
                let players =
                    merge_roster_with_stats(&roster, &stats, excluded(&exclusions, team), today);
                record_outcome(&opts, &mut squads, team, players, today, &mut updated)?;
                if client.budget().exhausted() {
                    warn!(
                        "Hit request limit ({}/{}); resume tomorrow",
                        client.budget().used(),
                        client.budget().limit()
                    );
                    break;
                }
            }
            info!("Total requests: {}", client.budget().used());
        }
        Source::Wiki => {
            let client = WikiClient::new()?;
            for team in &teams {
                let Some(m) = mapping.get(team) else {
                    warn!("{team}: no id mapping, skipping");
                    continue;
                };
                let Some(html) = collect_page(&opts, &cache, &client, team, m).await? else {
                    warn!("{team}: page fetch failed; previous entry kept");
                    continue;
                };
                let page = parse_squad_page(&html);
                let players = merge_roster_with_call_ups(
                    &page.current,
                    &page.recent,
                    excluded(&exclusions, team),
                    today,
                );
                record_outcome(&opts, &mut squads, team, players, today, &mut updated)?;
            }
        }
    }

    ensure_all_teams(&mut squads, &mapping, today);
    write_json(opts.squads_path(), &squads)?;
    info!(
        "Done; updated {updated} team(s); saved to {:?}",
        opts.squads_path()
    );
    Ok(())
}

fn load_exclusions(opts: &Opts) -> anyhow::Result<ExclusionsFile> {
    let path = opts.exclusions_path();
    if path.exists() {
        read_json(path)
    } else {
        Ok(ExclusionsFile::new())
    }
}

fn excluded<'a>(exclusions: &'a ExclusionsFile, team: &str) -> &'a [String] {
    exclusions.get(team).map_or(&[], Vec::as_slice)
}

/// Stores the merged list (or preserves the previous entry when it is
/// empty) and rewrites the document so that a crash mid-run only loses the
/// in-flight team.
fn record_outcome(
    opts: &Opts,
    squads: &mut SquadFile,
    team: &str,
    players: Vec<Player>,
    today: NaiveDate,
    updated: &mut u32,
) -> anyhow::Result<()> {
    if store_team_entry(squads, team, players, today) {
        *updated += 1;
        write_json(opts.squads_path(), squads)?;
        info!("{team}: squad entry updated");
    } else {
        warn!("{team}: no players merged; previous entry kept");
    }
    Ok(())
}

/// Runs the enabled API phases for one team, each phase served from cache
/// when fresh.  Giving both `--phase1` and `--phase2` simply composes to
/// both phases, same as giving neither.
async fn collect_api_phases(
    opts: &Opts,
    cache: &SquadCache,
    client: &mut ApiFootballClient,
    team: &str,
    api_id: u32,
) -> anyhow::Result<(Vec<RosterPlayer>, Vec<StatsPlayer>)> {
    let do_roster = !opts.phase2 || opts.phase1;
    let do_stats = !opts.phase1 || opts.phase2;

    let mut roster: Vec<RosterPlayer> = vec![];
    if do_roster {
        roster = match cached::<Vec<RosterPlayer>>(opts, cache, team, "roster") {
            Some(cached) => {
                info!("{team}: roster {} players (cached)", cached.len());
                cached
            }
            None => {
                let fetched = client.fetch_squad_roster(api_id).await;
                if fetched.is_empty() {
                    warn!("{team}: roster FAILED");
                } else {
                    cache.store(team, "roster", &fetched)?;
                    info!("{team}: roster {} players (fetched)", fetched.len());
                }
                fetched
            }
        };
    }

    let mut stats: Vec<StatsPlayer> = vec![];
    if do_stats && !client.budget().exhausted() {
        stats = match cached::<Vec<StatsPlayer>>(opts, cache, team, "stats") {
            Some(cached) => {
                info!("{team}: stats {} players (cached)", cached.len());
                cached
            }
            None => {
                let fetched = client.fetch_player_stats(api_id, SEASON).await;
                if fetched.is_empty() {
                    warn!("{team}: stats FAILED or empty");
                } else {
                    cache.store(team, "stats", &fetched)?;
                    info!(
                        "{team}: stats {} players (fetched, {} reqs used)",
                        fetched.len(),
                        client.budget().used()
                    );
                }
                fetched
            }
        };
    }

    Ok((roster, stats))
}

fn cached<T: serde::de::DeserializeOwned>(
    opts: &Opts,
    cache: &SquadCache,
    team: &str,
    phase: &str,
) -> Option<T> {
    if opts.force {
        None
    } else {
        cache.load(team, phase)
    }
}

/// Fetches (or reads back) one team's encyclopedia page.  `None` means the
/// fetch failed; the caller keeps the previous squad entry.
async fn collect_page(
    opts: &Opts,
    cache: &SquadCache,
    client: &WikiClient,
    team: &str,
    mapping: &TeamMapping,
) -> anyhow::Result<Option<String>> {
    if let Some(html) = cached::<String>(opts, cache, team, "page") {
        info!("{team}: page (cached)");
        return Ok(Some(html));
    }
    let title = mapping
        .wiki_page
        .clone()
        .unwrap_or_else(|| format!("{} national football team", mapping.name).replace(' ', "_"));
    sleep(wiki::REQUEST_DELAY).await;
    match client.fetch_page(&title).await {
        Ok(html) => {
            cache.store(team, "page", &html)?;
            info!("{team}: page fetched ({title})");
            Ok(Some(html))
        }
        Err(e) => {
            warn!("{team}: {e:#}");
            Ok(None)
        }
    }
}
