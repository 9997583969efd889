//! Wikipedia fetch path: page retrieval plus the current-squad /
//! recent-call-ups split.

pub mod table;

use anyhow::Context;
use log::{debug, warn};

use self::table::SquadRow;

/// Descriptive client identifier, as required for automated access.
const USER_AGENT: &str = "squad-scraping/0.1 (world cup squad dataset builder)";

/// Pause between page fetches; one request in flight at a time.
pub const REQUEST_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

/// Section ids tried in priority order; the first with a following table wins.
const CURRENT_SQUAD_SECTIONS: [&str; 3] = ["Current_squad", "Squad", "Players"];
const CALL_UP_SECTIONS: [&str; 3] = ["Recent_call-ups", "Recent_call_ups", "Recent_callups"];

pub struct WikiClient {
    client: reqwest::Client,
}

impl WikiClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
        })
    }

    pub async fn fetch_page(&self, title: &str) -> anyhow::Result<String> {
        let url = format!("https://en.wikipedia.org/wiki/{title}");
        Ok(self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("While fetching {url}"))?
            .text()
            .await?)
    }
}

#[derive(Debug, Default)]
pub struct SquadPage {
    pub current: Vec<SquadRow>,
    pub recent: Vec<SquadRow>,
}

/// Parses a whole page into the two row sets.  Either section missing is a
/// soft miss yielding an empty list; the caller decides whether the result
/// is worth keeping.
pub fn parse_squad_page(html: &str) -> SquadPage {
    SquadPage {
        current: section_rows(html, &CURRENT_SQUAD_SECTIONS, "current squad"),
        recent: section_rows(html, &CALL_UP_SECTIONS, "recent call-ups"),
    }
}

fn section_rows(html: &str, section_ids: &[&str], what: &str) -> Vec<SquadRow> {
    let Some(fragment) = section_ids
        .iter()
        .find_map(|id| table::extract_section_table(html, id))
    else {
        warn!("No {what} table found");
        return vec![];
    };
    let rows = table::parse_squad_table(fragment);
    debug!("Parsed {} {what} rows", rows.len());
    rows
}
