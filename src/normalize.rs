use chrono::{Datelike, NaiveDate};

use crate::schema::Position;

/// Maps free-text or abbreviated position descriptions to one of the four
/// positions.  Total: anything unrecognized (including empty input) is MID.
pub fn normalize_position(raw: &str) -> Position {
    match raw.trim().to_ascii_uppercase().as_str() {
        "GK" => return Position::Gk,
        "DF" | "DEF" | "CB" | "LB" | "RB" => return Position::Def,
        "MF" | "MID" | "CM" | "DM" | "AM" => return Position::Mid,
        "FW" | "FWD" | "CF" | "ST" => return Position::Fwd,
        _ => {}
    }
    let lower = raw.trim().to_ascii_lowercase();
    if lower.contains("goal") {
        Position::Gk
    } else if lower.contains("defend") || lower.contains("back") {
        Position::Def
    } else if lower.contains("mid") {
        Position::Mid
    } else if ["attack", "forward", "offen", "strik", "wing"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Position::Fwd
    } else {
        Position::Mid
    }
}

/// First `YYYY-MM-DD` substring, if any.  Squad tables carry the
/// machine-readable date in a hidden sortkey, so the input may be arbitrary
/// surrounding text.
pub fn extract_dob(text: &str) -> Option<NaiveDate> {
    let m = regex!(r"\d{4}-\d{2}-\d{2}").find(text)?;
    NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok()
}

pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Strips every non-digit character and parses the remainder; an empty
/// remainder (or an overflowing one) is 0.
pub fn parse_int(text: &str) -> u32 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Extracts a "day Month year" date (English month names) from free text,
/// e.g. "v. Serbia, 1 January 2020".
pub fn parse_call_up_date(text: &str) -> Option<NaiveDate> {
    let caps = regex!(
        r"(\d{1,2}) (January|February|March|April|May|June|July|August|September|October|November|December) (\d{4})"
    )
    .captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == &caps[2])? as u32 + 1;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A call-up is stale when its date is more than `months` (of 30 days) before
/// `today`.  An unparseable date counts as not stale.
pub fn is_stale_call_up(text: &str, today: NaiveDate, months: u32) -> bool {
    match parse_call_up_date(text) {
        Some(date) => (today - date).num_days() > i64::from(months) * 30,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use strum::IntoEnumIterator;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn position_is_total() {
        assert_eq!(normalize_position("Goalkeeper"), Position::Gk);
        assert_eq!(normalize_position("GK"), Position::Gk);
        assert_eq!(normalize_position("Centre-Back"), Position::Def);
        assert_eq!(normalize_position("DF"), Position::Def);
        assert_eq!(normalize_position("Defender"), Position::Def);
        assert_eq!(normalize_position("Midfielder"), Position::Mid);
        assert_eq!(normalize_position("mf"), Position::Mid);
        assert_eq!(normalize_position("Striker"), Position::Fwd);
        assert_eq!(normalize_position("Forward"), Position::Fwd);
        assert_eq!(normalize_position("Offensive"), Position::Fwd);
        // Unrecognized and empty both fall back to MID
        assert_eq!(normalize_position(""), Position::Mid);
        assert_eq!(normalize_position("???"), Position::Mid);
        // The fallback is one of the four variants for any input
        for p in Position::iter() {
            assert!(matches!(
                p,
                Position::Gk | Position::Def | Position::Mid | Position::Fwd
            ));
        }
    }

    #[test]
    fn dob_from_hidden_sortkey() {
        assert_eq!(
            extract_dob("(1998-04-02) 2 April 1998 (age 27)"),
            Some(date(1998, 4, 2))
        );
        assert_eq!(extract_dob("2 April 1998"), None);
        assert_eq!(extract_dob(""), None);
    }

    #[test]
    fn age_boundary_around_birthday() {
        let dob = date(1998, 4, 2);
        assert_eq!(age_on(dob, date(2026, 4, 1)), 27);
        assert_eq!(age_on(dob, date(2026, 4, 2)), 28);
        assert_eq!(age_on(dob, date(2026, 4, 3)), 28);
    }

    #[test]
    fn int_parse_strips_non_digits() {
        assert_eq!(parse_int("1,234 apps"), 1234);
        assert_eq!(parse_int("45"), 45);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("-"), 0);
    }

    #[test]
    fn call_up_date_from_free_text() {
        assert_eq!(
            parse_call_up_date("v. Serbia, 1 January 2020"),
            Some(date(2020, 1, 1))
        );
        assert_eq!(
            parse_call_up_date("v. Brazil, 14 November 2025"),
            Some(date(2025, 11, 14))
        );
        assert_eq!(parse_call_up_date("Retired"), None);
    }

    #[test]
    fn staleness_window() {
        let text = "v. Serbia, 1 January 2020";
        assert!(is_stale_call_up(text, date(2021, 6, 1), 12));
        assert!(!is_stale_call_up(text, date(2020, 2, 1), 12));
        // Unparseable dates are conservatively fresh
        assert!(!is_stale_call_up("unknown", date(2030, 1, 1), 12));
    }
}
