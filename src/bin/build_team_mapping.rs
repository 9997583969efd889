//! Resolves the 42 configured team codes against the upstream team-search
//! endpoint and writes the id mapping document.  Resumable: already-mapped
//! teams are skipped and progress is saved after every lookup.

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use squad_scraping::{
    api::ApiFootballClient,
    config,
    fs_json_util::{read_json, write_json},
    schema::{MappingFile, TeamMapping},
};

#[derive(Parser)]
struct Opts {
    #[arg(long)]
    out_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let out_path = opts.out_path.unwrap_or_else(config::default_mapping_path);

    let mut mapping: MappingFile = if out_path.exists() {
        read_json(&out_path)?
    } else {
        MappingFile::new()
    };

    let missing: Vec<_> = config::TEAMS
        .iter()
        .filter(|(code, _)| !mapping.contains_key(*code))
        .collect();
    info!(
        "Already mapped: {}, missing: {}",
        mapping.len(),
        missing.len()
    );

    let mut client = ApiFootballClient::from_env()?;
    for &&(code, search) in &missing {
        match client.search_national_team(search).await {
            Some(team) => {
                info!("{code} -> {}: {}", team.id, team.name);
                mapping.insert(
                    code.to_owned(),
                    TeamMapping {
                        api_id: team.id,
                        name: team.name,
                        code: team.code,
                        wiki_page: None,
                    },
                );
            }
            None => warn!("{code}: NOT FOUND for {search:?}"),
        }
        if let Some(parent) = out_path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        write_json(&out_path, &mapping)?;
        if client.budget().exhausted() {
            warn!("Request budget exhausted; rerun to finish the remainder");
            break;
        }
    }

    info!("Total mapped: {}/{}", mapping.len(), config::TEAMS.len());
    Ok(())
}
