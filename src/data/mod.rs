pub mod catalog;

pub use catalog::Catalog;

use chrono::NaiveDate;

/// The event every stay in this widget is anchored to.
pub const EVENT_NAME: &str = "DSEI UK 2027";
pub const VENUE_NAME: &str = "ExCeL London";
/// (latitude, longitude) of the venue entrance.
pub const VENUE_POSITION: (f64, f64) = (51.5085, 0.0295);

pub fn event_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2027, 9, 7).unwrap()
}

pub fn event_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2027, 9, 10).unwrap()
}

/// "DSEI UK 2027 · Sep 7–10, 2027 · ExCeL London"
pub fn event_line() -> String {
    format!(
        "{} · Sep 7–10, 2027 · {}",
        EVENT_NAME, VENUE_NAME
    )
}
