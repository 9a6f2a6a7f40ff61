use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// One line of the quote: a single room configuration priced out.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRow {
    pub room_type: String,
    pub board: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub quantity: u32,
    pub guests: String,
    pub rate_per_night: u32,
    pub cancellation: String,
    pub subtotal: u32,
}

/// All rows for one hotel plus the section footer counts.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSection {
    pub hotel_name: String,
    pub stars: u8,
    pub address: String,
    pub rows: Vec<QuoteRow>,
    pub total_rooms: u32,
    pub total_guests: u32,
    pub room_nights: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub hotels: u32,
    pub rooms: u32,
    pub guests: u32,
    pub room_nights: u32,
    pub total: u32,
}

/// The full export artifact. Visual layout is up to the presentation layer;
/// this is the content contract.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteDocument {
    pub reference: Uuid,
    pub title: String,
    pub event_line: String,
    pub first_check_in: NaiveDate,
    pub last_check_out: NaiveDate,
    pub sections: Vec<QuoteSection>,
    pub summary: QuoteSummary,
    pub generated_on: NaiveDate,
}

/// GBP amount with thousands separators, e.g. `1044` -> `"1,044"`.
pub fn format_gbp(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "7 Sep" style short date.
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// "7 Sep 2027" style date.
pub fn format_date_medium(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// "7 September 2027" style date.
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}
