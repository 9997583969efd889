use chrono::{NaiveDate, NaiveDateTime, Utc};

pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn today_utc() -> NaiveDate {
    now_utc().date()
}
