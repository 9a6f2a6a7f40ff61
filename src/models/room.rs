use serde::{Deserialize, Serialize};

/// Meal plans a room can be booked with. Surcharges are flat GBP amounts
/// per night per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardOption {
    #[serde(rename = "Room Only")]
    RoomOnly,
    #[serde(rename = "Bed & Breakfast")]
    BedAndBreakfast,
    #[serde(rename = "Half Board")]
    HalfBoard,
    #[serde(rename = "Full Board")]
    FullBoard,
}

impl BoardOption {
    pub fn label(&self) -> &'static str {
        match self {
            BoardOption::RoomOnly => "Room Only",
            BoardOption::BedAndBreakfast => "Bed & Breakfast",
            BoardOption::HalfBoard => "Half Board",
            BoardOption::FullBoard => "Full Board",
        }
    }

    /// Flat surcharge in GBP per night per room.
    pub fn surcharge(&self) -> u32 {
        match self {
            BoardOption::RoomOnly => 0,
            BoardOption::BedAndBreakfast => 8,
            BoardOption::HalfBoard => 18,
            BoardOption::FullBoard => 30,
        }
    }
}

/// Cancellation tiers. The fee is a percentage of the nightly room price,
/// rounded to whole pounds and charged per night per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancellationPolicy {
    NonRefundable,
    Flexible,
    Free,
}

impl CancellationPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            CancellationPolicy::NonRefundable => "Non-refundable",
            CancellationPolicy::Flexible => "Flexible",
            CancellationPolicy::Free => "Free Cancellation",
        }
    }

    pub fn fee_pct(&self) -> f64 {
        match self {
            CancellationPolicy::NonRefundable => 0.0,
            CancellationPolicy::Flexible => 0.04,
            CancellationPolicy::Free => 0.09,
        }
    }

    /// Fee in GBP for one night of one room at the given nightly price.
    pub fn fee_per_night(&self, room_price: u32) -> u32 {
        (room_price as f64 * self.fee_pct()).round() as u32
    }
}

/// A cancellation tier as offered by one room type, with the room-specific
/// small print ("Free cancel until 48h before check-in").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOption {
    pub policy: CancellationPolicy,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomType {
    pub name: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub board_options: Vec<BoardOption>,
    pub cancellation_options: Vec<CancellationOption>,
    /// Nightly price in GBP, already scaled from the hotel base price.
    pub price: u32,
    pub max_guests: u8,
    pub image: String,
}

impl RoomType {
    pub fn offers_board(&self, board: BoardOption) -> bool {
        self.board_options.contains(&board)
    }

    pub fn offers_cancellation(&self, policy: CancellationPolicy) -> bool {
        self.cancellation_options.iter().any(|o| o.policy == policy)
    }

    /// First board option the room is sold with.
    pub fn default_board(&self) -> BoardOption {
        self.board_options
            .first()
            .copied()
            .unwrap_or(BoardOption::RoomOnly)
    }

    pub fn default_cancellation(&self) -> CancellationPolicy {
        self.cancellation_options
            .first()
            .map(|o| o.policy)
            .unwrap_or(CancellationPolicy::NonRefundable)
    }
}
