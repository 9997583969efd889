//! Parses a saved national-team page (or table fragment) and dumps the
//! resulting rows, for eyeballing parser behavior against real pages.

use std::path::PathBuf;

use clap::Parser;
use squad_scraping::wiki::{self, table};

#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
    /// Extract this section id instead of running the full-page split
    #[arg(long)]
    section: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let html = fs_err::read_to_string(opts.input_file)?;

    match opts.section {
        Some(section) => {
            let fragment = table::extract_section_table(&html, &section)
                .ok_or_else(|| anyhow::anyhow!("No table after section {section:?}"))?;
            let rows = table::parse_squad_table(fragment);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        None => {
            let page = wiki::parse_squad_page(&html);
            dbg!(page.current.len(), page.recent.len());
            println!("{}", serde_json::to_string_pretty(&page.current)?);
            println!("{}", serde_json::to_string_pretty(&page.recent)?);
        }
    }
    Ok(())
}
