//! Quote export.
//!
//! Pure formatting over the comparison engine's current totals: a
//! structured document grouped by hotel, a printable text rendering of it,
//! and a JSON form for machine consumers. Saving to disk is the only real
//! I/O in the crate; a failure there is reported to the caller and changes
//! nothing in memory.

use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::data;
use crate::models::quote::{
    format_date_long, format_date_short, format_gbp, QuoteDocument, QuoteRow, QuoteSection,
    QuoteSummary,
};
use crate::services::compare_service::CompareService;

pub struct ExportService;

impl ExportService {
    /// Snapshot the current comparison into a quote document.
    pub fn build_quote(
        compare: &CompareService,
        generated_on: NaiveDate,
    ) -> Result<QuoteDocument, Box<dyn std::error::Error>> {
        if compare.is_empty() {
            return Err("Nothing to export: the comparison is empty".into());
        }
        let range = compare
            .date_range()
            .ok_or("Nothing to export: no room configurations")?;

        let per_hotel = compare.hotel_totals();
        let mut sections = Vec::with_capacity(per_hotel.len());
        for (entry, totals) in compare.entries().iter().zip(per_hotel.iter()) {
            let mut rows = Vec::with_capacity(entry.configs.len());
            for config in &entry.configs {
                let room = match entry.detail.room(config.room_type_index) {
                    Some(r) => r,
                    None => continue,
                };
                let breakdown = compare
                    .config_totals(entry.hotel.id, config.id)
                    .ok_or("Configuration disappeared while exporting")?;
                rows.push(QuoteRow {
                    room_type: room.name.clone(),
                    board: config.board.label().to_string(),
                    check_in: config.check_in,
                    check_out: config.check_out,
                    nights: breakdown.nights,
                    quantity: config.quantity,
                    guests: config.guests_label(),
                    rate_per_night: breakdown.rate_per_night,
                    cancellation: config.cancellation.label().to_string(),
                    subtotal: breakdown.total,
                });
            }
            sections.push(QuoteSection {
                hotel_name: totals.name.clone(),
                stars: totals.stars,
                address: entry.hotel.address.clone(),
                rows,
                total_rooms: totals.total_rooms,
                total_guests: totals.total_guests,
                room_nights: totals.room_nights,
                subtotal: totals.subtotal,
            });
        }

        let grand = compare.grand_totals();
        Ok(QuoteDocument {
            reference: Uuid::new_v4(),
            title: format!("{} - Hotel Booking Quote", data::EVENT_NAME),
            event_line: data::event_line(),
            first_check_in: range.check_in,
            last_check_out: range.check_out,
            sections,
            summary: QuoteSummary {
                hotels: grand.hotels,
                rooms: grand.rooms,
                guests: grand.guests,
                room_nights: grand.room_nights,
                total: grand.total,
            },
            generated_on,
        })
    }

    /// Print-friendly rendering, one section per hotel with a header and
    /// grand-total footer.
    pub fn render_text(doc: &QuoteDocument) -> String {
        let mut out = String::new();
        out.push_str(&doc.title);
        out.push('\n');
        out.push_str(&doc.event_line);
        out.push('\n');
        out.push_str(&format!(
            "{} - {}  |  {} {}  |  {} {}  |  {} {}  |  {} Room-{}\n\n",
            format_date_long(doc.first_check_in),
            format_date_long(doc.last_check_out),
            doc.summary.hotels,
            plural(doc.summary.hotels, "Hotel", "Hotels"),
            doc.summary.rooms,
            plural(doc.summary.rooms, "Room", "Rooms"),
            doc.summary.guests,
            plural(doc.summary.guests, "Guest", "Guests"),
            doc.summary.room_nights,
            plural(doc.summary.room_nights, "night", "nights"),
        ));

        for section in &doc.sections {
            out.push_str(&format!(
                "{}  ({} star)\n{}\n",
                section.hotel_name, section.stars, section.address
            ));
            for row in &section.rows {
                out.push_str(&format!(
                    "  {} | {} | {} - {} | {} {} | {} {} | {} | GBP {}/night | {} | GBP {}\n",
                    row.room_type,
                    row.board,
                    format_date_short(row.check_in),
                    format_date_short(row.check_out),
                    row.nights,
                    plural(row.nights, "night", "nights"),
                    row.quantity,
                    plural(row.quantity, "room", "rooms"),
                    row.guests,
                    row.rate_per_night,
                    row.cancellation,
                    format_gbp(row.subtotal),
                ));
            }
            out.push_str(&format!(
                "  {} {} | {} {} | {} room-{}    Hotel Subtotal: GBP {}\n\n",
                section.total_rooms,
                plural(section.total_rooms, "room", "rooms"),
                section.total_guests,
                plural(section.total_guests, "guest", "guests"),
                section.room_nights,
                plural(section.room_nights, "night", "nights"),
                format_gbp(section.subtotal),
            ));
        }

        out.push_str(&format!(
            "Grand Total ({} {} | {} {} | {} room-{}): GBP {}\n",
            doc.summary.hotels,
            plural(doc.summary.hotels, "hotel", "hotels"),
            doc.summary.rooms,
            plural(doc.summary.rooms, "room", "rooms"),
            doc.summary.room_nights,
            plural(doc.summary.room_nights, "night", "nights"),
            format_gbp(doc.summary.total),
        ));
        out.push_str(&format!(
            "Generated on {} - {} Hotel Booking Widget\n",
            format_date_long(doc.generated_on),
            data::EVENT_NAME,
        ));
        out
    }

    pub fn to_json(doc: &QuoteDocument) -> Result<String, Box<dyn std::error::Error>> {
        Ok(serde_json::to_string_pretty(doc)?)
    }

    /// Write the printable rendering to a local file.
    pub fn save_to_file(
        doc: &QuoteDocument,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, Self::render_text(doc))
            .map_err(|e| format!("Failed to save quote to {}: {}", path.display(), e))?;
        log::info!("Quote {} saved to {}", doc.reference, path.display());
        Ok(())
    }
}

fn plural(count: u32, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
