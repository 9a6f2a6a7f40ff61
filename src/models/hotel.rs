use serde::{Deserialize, Serialize};

use crate::models::room::RoomType;

/// One catalog record. Immutable once loaded; everything richer (gallery,
/// amenities, rooms) is derived on demand from the id and base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: u32,
    pub name: String,
    pub stars: u8,
    pub rating: f32,
    pub reviews: u32,
    /// Base nightly price in GBP.
    pub price: u32,
    /// (latitude, longitude)
    pub position: (f64, f64),
    pub address: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

/// Expanded view of a hotel: the base record plus gallery, amenity set and
/// the bookable room types.
#[derive(Debug, Clone, Serialize)]
pub struct HotelDetail {
    pub hotel: Hotel,
    pub gallery: Vec<String>,
    pub amenities: Vec<String>,
    pub rooms: Vec<RoomType>,
}

impl HotelDetail {
    pub fn room(&self, index: usize) -> Option<&RoomType> {
        self.rooms.get(index)
    }

    /// Index of the cheapest room type. Room prices grow with the template
    /// order, but scan anyway so the result stays correct if that changes.
    pub fn cheapest_room_index(&self) -> usize {
        self.rooms
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.price)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    pub fn cheapest_room_price(&self) -> u32 {
        self.rooms
            .iter()
            .map(|r| r.price)
            .min()
            .unwrap_or(self.hotel.price)
    }
}
