//! Squad-table extraction and parsing.
//!
//! National-team pages lay out the current squad and the recent call-ups as
//! sortable tables whose headers vary across pages (synonyms, abbreviations,
//! footnote markers).  Column meaning is therefore inferred from header text
//! rather than position.

use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::{
    normalize::{extract_dob, normalize_position, parse_int},
    schema::Position,
};

/// One parsed line of a squad table, before tiering.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SquadRow {
    pub name: String,
    pub position: Position,
    pub dob: Option<NaiveDate>,
    pub number: Option<u32>,
    pub caps: u32,
    pub goals: u32,
    pub club: Option<String>,
    /// Raw "latest call-up" cell text, kept verbatim for staleness checks.
    pub call_up: Option<String>,
}

/// Returns the span of the first `<table>` element following the first
/// occurrence of the section anchor, or `None` when either is absent.
/// A miss is soft: callers try alternate section ids and finally accept
/// an empty table.
pub fn extract_section_table<'a>(html: &'a str, section_id: &str) -> Option<&'a str> {
    let anchor = format!("id=\"{section_id}\"");
    let section = html.find(&anchor)?;
    let rest = &html[section..];
    let start = rest.find("<table")?;
    let body = &rest[start..];

    // Infoboxes nest tables, so the closing tag must be depth-matched.
    let mut depth = 0usize;
    let mut at = 0usize;
    loop {
        let open = body[at..].find("<table").map(|i| at + i);
        let close = body[at..].find("</table>").map(|i| at + i);
        match (open, close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                at = o + "<table".len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..c + "</table>".len()]);
                }
                at = c + "</table>".len();
            }
            _ => return None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Column {
    Number,
    Position,
    Name,
    DateOfBirth,
    Caps,
    Goals,
    Club,
    CallUp,
}

/// Ordered keyword rules; the first substring hit decides the role, so a
/// header cell maps to at most one column.  "no" must come last: it is a
/// substring of nothing above it, but short headers like "No." only reach
/// it after the longer keywords fail.
const HEADER_RULES: [(&str, Column); 10] = [
    ("pos", Column::Position),
    ("player", Column::Name),
    ("name", Column::Name),
    ("birth", Column::DateOfBirth),
    ("age", Column::DateOfBirth),
    ("caps", Column::Caps),
    ("goal", Column::Goals),
    ("club", Column::Club),
    ("call", Column::CallUp),
    ("no", Column::Number),
];

fn header_role(text: &str) -> Option<Column> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }
    HEADER_RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, column)| column)
}

/// Cell text with visually hidden content removed.  Sort keys and footnote
/// bodies are wrapped in `display:none` spans and must not leak into names
/// or club fields.
fn visible_text(cell: ElementRef) -> String {
    fn walk(el: ElementRef, out: &mut String) {
        for node in el.children() {
            if let Some(text) = node.value().as_text() {
                out.push_str(text);
            } else if let Some(child) = ElementRef::wrap(node) {
                let hidden = child
                    .value()
                    .attr("style")
                    .is_some_and(|s| s.replace(' ', "").contains("display:none"));
                if !hidden {
                    walk(child, out);
                }
            }
        }
    }
    let mut out = String::new();
    walk(cell, &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full cell text including hidden annotations.  Only used for the
/// date-of-birth column, whose ISO date lives in a hidden sortkey.
fn full_text(cell: ElementRef) -> String {
    cell.text().collect::<String>()
}

/// Parses a table fragment into squad rows.  The first row is the header;
/// rows with fewer than 3 cells or with no visible text are separators and
/// are dropped, as is any row without a player name.  Malformed rows never
/// abort the parse.
pub fn parse_squad_table(table_html: &str) -> Vec<SquadRow> {
    let fragment = Html::parse_fragment(table_html);
    let mut rows = fragment.select(selector!("tr"));
    let Some(header) = rows.next() else {
        return vec![];
    };
    let columns: HashMap<Column, usize> = header
        .select(selector!("th, td"))
        .enumerate()
        .filter_map(|(idx, cell)| header_role(&visible_text(cell)).map(|role| (role, idx)))
        .fold(HashMap::new(), |mut map, (role, idx)| {
            map.entry(role).or_insert(idx);
            map
        });

    rows.filter_map(|row| parse_row(row, &columns)).collect()
}

fn parse_row(row: ElementRef, columns: &HashMap<Column, usize>) -> Option<SquadRow> {
    let cells = row.select(selector!("th, td")).collect_vec();
    if cells.len() < 3 {
        return None;
    }
    let texts = cells.iter().map(|&c| visible_text(c)).collect_vec();
    if texts.iter().all(String::is_empty) {
        return None;
    }

    let cell = |column| columns.get(&column).and_then(|&i| texts.get(i));
    let name = cell(Column::Name)?.clone();
    if name.is_empty() {
        return None;
    }

    let dob = columns
        .get(&Column::DateOfBirth)
        .and_then(|&i| cells.get(i))
        .and_then(|&c| extract_dob(&full_text(c)));

    Some(SquadRow {
        name,
        position: cell(Column::Position).map_or(Position::Mid, |t| normalize_position(t)),
        dob,
        number: cell(Column::Number)
            .filter(|t| !t.is_empty())
            .map(|t| parse_int(t)),
        caps: cell(Column::Caps).map_or(0, |t| parse_int(t)),
        goals: cell(Column::Goals).map_or(0, |t| parse_int(t)),
        club: cell(Column::Club).filter(|t| !t.is_empty()).cloned(),
        call_up: cell(Column::CallUp).filter(|t| !t.is_empty()).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_then_first_table() {
        let html = r#"
            <h2><span id="History">History</span></h2>
            <table><tr><td>wrong</td></tr></table>
            <h2><span id="Current_squad">Current squad</span></h2>
            <p>Caps correct as of today.</p>
            <table class="wikitable"><tr><th>Player</th></tr></table>
        "#;
        let table = extract_section_table(html, "Current_squad").unwrap();
        assert!(table.starts_with("<table class=\"wikitable\""));
        assert!(table.ends_with("</table>"));
        assert!(!table.contains("wrong"));
    }

    #[test]
    fn nested_table_is_spanned_whole() {
        let html = r#"<span id="Squad"></span>
            <table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>"#;
        let table = extract_section_table(html, "Squad").unwrap();
        assert_eq!(table.matches("<table").count(), 2);
        assert_eq!(table.matches("</table>").count(), 2);
    }

    #[test]
    fn missing_section_or_table_is_soft() {
        assert_eq!(extract_section_table("<p>no tables here</p>", "Squad"), None);
        let html = r#"<span id="Squad"></span><p>prose only</p>"#;
        assert_eq!(extract_section_table(html, "Squad"), None);
    }

    fn row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    #[test]
    fn synthetic_roster_table() {
        let header = "<tr><th>No.</th><th>Pos.</th><th>Player</th>\
            <th>Date of birth</th><th>Caps</th><th>Goals</th><th>Club</th></tr>";
        let table = format!(
            "<table>{header}{}{}</table>",
            row(&["1", "GK", "Jane Doe", "1998-04-02", "45", "0", "FC X"]),
            row(&["", "DF", "", "", "", ""]),
        );
        let rows = parse_squad_table(&table);
        assert_eq!(rows.len(), 1);
        let jane = &rows[0];
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.position, Position::Gk);
        assert_eq!(jane.number, Some(1));
        assert_eq!(jane.caps, 45);
        assert_eq!(jane.goals, 0);
        assert_eq!(jane.club.as_deref(), Some("FC X"));
        assert_eq!(
            jane.dob,
            Some(chrono::NaiveDate::from_ymd_opt(1998, 4, 2).unwrap())
        );
    }

    #[test]
    fn hidden_sortkeys_stay_out_of_names_but_feed_dob() {
        let table = r#"<table>
            <tr><th>Pos.</th><th>Player</th><th>Date of birth (age)</th></tr>
            <tr><td>MF</td>
                <td><span style="display:none">Doe, Jane</span><a>Jane Doe</a></td>
                <td><span style="display:none">(1998-04-02)</span>2 April 1998</td></tr>
        </table>"#;
        let rows = parse_squad_table(table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(
            rows[0].dob,
            Some(chrono::NaiveDate::from_ymd_opt(1998, 4, 2).unwrap())
        );
    }

    #[test]
    fn header_synonyms_map_order_independently() {
        let table = format!(
            "<table><tr><th>Latest call-up</th><th>Squad No.</th><th>Name</th>\
             <th>Position</th></tr>{}</table>",
            row(&["v. Italy, 10 June 2025", "7", "John Roe", "Striker"]),
        );
        let rows = parse_squad_table(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number, Some(7));
        assert_eq!(rows[0].position, Position::Fwd);
        assert_eq!(rows[0].call_up.as_deref(), Some("v. Italy, 10 June 2025"));
    }

    #[test]
    fn short_and_nameless_rows_are_skipped() {
        let table = format!(
            "<table><tr><th>No.</th><th>Pos.</th><th>Player</th><th>Caps</th></tr>\
             <tr><td colspan=\"4\">Goalkeepers</td></tr>{}{}</table>",
            row(&["", "DF", "", "12"]),
            row(&["4", "DF", "Ann Smith", "12"]),
        );
        let rows = parse_squad_table(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ann Smith");
    }

    #[test]
    fn unmatched_header_columns_are_ignored() {
        let table = format!(
            "<table><tr><th>Pos.</th><th>Player</th><th>Ref.</th></tr>{}</table>",
            row(&["FW", "Kim Lee", "[3]"]),
        );
        let rows = parse_squad_table(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].caps, 0);
        assert_eq!(rows[0].club, None);
    }
}
