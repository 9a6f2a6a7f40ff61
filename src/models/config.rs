use chrono::NaiveDate;
use serde::Serialize;

use crate::models::room::{BoardOption, CancellationPolicy};

pub const MIN_ROOM_QUANTITY: u32 = 1;
pub const MAX_ROOM_QUANTITY: u32 = 50;
/// Age filled in when the child count grows past the known ages.
pub const DEFAULT_CHILD_AGE: u8 = 5;

/// One user-editable booking line: a room type at one hotel plus stay dates,
/// occupancy and the chosen board/cancellation terms.
///
/// Invariants (enforced by the comparison engine, not by construction):
/// check-out strictly after check-in, quantity within 1..=50, and
/// `child_ages.len() == children`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomConfiguration {
    pub id: u64,
    pub room_type_index: usize,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
    pub children: u8,
    pub child_ages: Vec<u8>,
    pub board: BoardOption,
    pub cancellation: CancellationPolicy,
    pub quantity: u32,
    /// Transient UI flag; never serialized.
    #[serde(skip)]
    pub editing: bool,
}

impl RoomConfiguration {
    /// Whole nights between check-in and check-out, never less than one.
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days().max(1) as u32
    }

    pub fn guests_label(&self) -> String {
        let adults = format!(
            "{} {}",
            self.adults,
            if self.adults == 1 { "Adult" } else { "Adults" }
        );
        if self.children == 0 {
            return adults;
        }
        format!(
            "{} + {} {}",
            adults,
            self.children,
            if self.children == 1 { "Child" } else { "Children" }
        )
    }
}

/// Partial update applied by `update_configuration`. Unset fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub room_type_index: Option<usize>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u8>,
    pub children: Option<u8>,
    pub child_ages: Option<Vec<u8>>,
    pub board: Option<BoardOption>,
    pub cancellation: Option<CancellationPolicy>,
    pub quantity: Option<u32>,
    pub editing: Option<bool>,
}

impl ConfigPatch {
    pub fn room_type(index: usize) -> Self {
        Self {
            room_type_index: Some(index),
            ..Self::default()
        }
    }

    pub fn board(board: BoardOption) -> Self {
        Self {
            board: Some(board),
            ..Self::default()
        }
    }

    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn dates(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
            ..Self::default()
        }
    }
}
