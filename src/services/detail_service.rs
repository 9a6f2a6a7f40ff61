//! Deterministic detail expansion for catalog hotels.
//!
//! Everything here is index arithmetic over fixed pools, keyed by the hotel
//! id: the same hotel always expands to the same gallery slice, amenity set
//! and room-type list. Safe to call repeatedly and for hotels that are not
//! selected anywhere (the alternative finders rely on this).

use crate::models::hotel::{Hotel, HotelDetail};
use crate::models::room::{BoardOption, CancellationOption, CancellationPolicy, RoomType};

const GALLERY_POOL: [&str; 20] = [
    "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1564501049412-61c2a3083791?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1520250497591-112f2f40a3f4?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1542314831-068cd1dbfeeb?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1444201983204-c43cbd584d93?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1578683010236-d716f9a3f461?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1568084680786-a84f91d1153c?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1596394516093-501ba68a0ba6?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1618773928121-c32242e63f39?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1522798514-97ceb8c4f1c8?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1529290130-4ca3753253ae?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1584132967334-10e028bd69f7?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1560200353-ce0a76b1d438?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1535827841776-24afc1e255ac?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1562778612-e1e0cda9915c?w=800&h=500&fit=crop",
    "https://images.unsplash.com/photo-1445019980597-93fa8acb246c?w=800&h=500&fit=crop",
];

const GALLERY_SIZE: usize = 5;

const AMENITY_POOL: [&str; 15] = [
    "Free Wi-Fi",
    "Gym",
    "Spa",
    "Pool",
    "Restaurant",
    "Bar",
    "Parking",
    "Room Service",
    "Business Centre",
    "Concierge",
    "Airport Shuttle",
    "Laundry",
    "Pet Friendly",
    "Air Conditioning",
    "EV Charging",
];

const ROOM_IMAGE_POOL: [&str; 8] = [
    "https://images.unsplash.com/photo-1631049307264-da0ec9d70304?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1611892440504-42a792e24d32?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1578683010236-d716f9a3f461?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1591088398332-8a7791972843?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1566665797739-1674de7a421a?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1595576508898-0ad5c879a061?w=600&h=400&fit=crop",
];

struct RoomTemplate {
    name: &'static str,
    description: &'static str,
    amenities: &'static [&'static str],
    boards: &'static [BoardOption],
    cancellations: &'static [(CancellationPolicy, &'static str)],
    multiplier: f64,
    max_guests: u8,
    image_index: usize,
}

/// Ordered cheapest-first; star rating decides how many of these a hotel
/// actually offers.
const ROOM_TEMPLATES: [RoomTemplate; 4] = [
    RoomTemplate {
        name: "Standard Room",
        description: "Comfortable room with all essential amenities for a pleasant stay.",
        amenities: &[
            "Free Wi-Fi",
            "Air Conditioning",
            "TV",
            "Desk",
            "Safe",
            "En-suite Bathroom",
            "Hairdryer",
            "Iron & Board",
        ],
        boards: &[BoardOption::RoomOnly, BoardOption::BedAndBreakfast],
        cancellations: &[
            (
                CancellationPolicy::Free,
                "Free cancel until 48h before check-in",
            ),
            (CancellationPolicy::Flexible, "Cancel until 24h before, small fee"),
            (
                CancellationPolicy::NonRefundable,
                "Best price, no changes allowed",
            ),
        ],
        multiplier: 1.0,
        max_guests: 2,
        image_index: 0,
    },
    RoomTemplate {
        name: "Superior Room",
        description: "Spacious room with upgraded furnishings and city views.",
        amenities: &[
            "Free Wi-Fi",
            "Air Conditioning",
            "TV",
            "Minibar",
            "Safe",
            "Coffee Machine",
            "Blackout Curtains",
            "Luxury Toiletries",
            "Hairdryer",
        ],
        boards: &[
            BoardOption::RoomOnly,
            BoardOption::BedAndBreakfast,
            BoardOption::HalfBoard,
        ],
        cancellations: &[
            (
                CancellationPolicy::Free,
                "Free cancel until 24h before check-in",
            ),
            (CancellationPolicy::Flexible, "Cancel until 12h before, small fee"),
            (
                CancellationPolicy::NonRefundable,
                "Best price, no changes allowed",
            ),
        ],
        multiplier: 1.35,
        max_guests: 2,
        image_index: 1,
    },
    RoomTemplate {
        name: "Deluxe Room",
        description: "Premium room with panoramic views, luxury bedding and exclusive amenities.",
        amenities: &[
            "Free Wi-Fi",
            "Air Conditioning",
            "Smart TV",
            "Minibar",
            "Safe",
            "Coffee Machine",
            "Bathrobe & Slippers",
            "Nespresso",
            "Rain Shower",
            "Pillow Menu",
            "USB Charging",
        ],
        boards: &[
            BoardOption::BedAndBreakfast,
            BoardOption::HalfBoard,
            BoardOption::FullBoard,
        ],
        cancellations: &[
            (CancellationPolicy::Flexible, "Cancel until 24h before, small fee"),
            (CancellationPolicy::NonRefundable, "Best price guarantee"),
        ],
        multiplier: 1.75,
        max_guests: 2,
        image_index: 2,
    },
    RoomTemplate {
        name: "Family Suite",
        description: "Generous suite with separate living area, perfect for families.",
        amenities: &[
            "Free Wi-Fi",
            "Air Conditioning",
            "Smart TV",
            "Minibar",
            "Safe",
            "Kitchenette",
            "Sofa Bed",
            "Baby Cot Available",
            "Washing Machine",
            "Highchair",
            "Extra Towels",
        ],
        boards: &[
            BoardOption::RoomOnly,
            BoardOption::BedAndBreakfast,
            BoardOption::HalfBoard,
        ],
        cancellations: &[
            (
                CancellationPolicy::Free,
                "Free cancel until 72h before check-in",
            ),
            (CancellationPolicy::Flexible, "Cancel until 48h before, small fee"),
            (
                CancellationPolicy::NonRefundable,
                "Best price, no changes allowed",
            ),
        ],
        multiplier: 2.1,
        max_guests: 4,
        image_index: 3,
    },
];

pub struct DetailService;

impl DetailService {
    /// Expand a hotel into its full detail view. Pure and deterministic.
    pub fn detail_of(hotel: &Hotel) -> HotelDetail {
        HotelDetail {
            hotel: hotel.clone(),
            gallery: Self::gallery(hotel.id),
            amenities: Self::amenities(hotel.id, hotel.stars),
            rooms: Self::room_types(hotel.id, hotel.price, hotel.stars),
        }
    }

    /// Five gallery images cycled out of the shared pool.
    fn gallery(hotel_id: u32) -> Vec<String> {
        let start = ((hotel_id as usize).saturating_sub(1) * 3) % GALLERY_POOL.len();
        (0..GALLERY_SIZE)
            .map(|i| GALLERY_POOL[(start + i) % GALLERY_POOL.len()].to_string())
            .collect()
    }

    /// 8 amenities for 4★+, 6 for 3★, 4 otherwise.
    fn amenities(hotel_id: u32, stars: u8) -> Vec<String> {
        let count = if stars >= 4 {
            8
        } else if stars >= 3 {
            6
        } else {
            4
        };
        let start = (hotel_id as usize * 2) % AMENITY_POOL.len();
        (0..count)
            .map(|i| AMENITY_POOL[(start + i) % AMENITY_POOL.len()].to_string())
            .collect()
    }

    /// 4 room types for 4★+, 3 for 3★, 2 otherwise, in template order.
    fn room_types(hotel_id: u32, base_price: u32, stars: u8) -> Vec<RoomType> {
        let count = if stars >= 4 {
            4
        } else if stars >= 3 {
            3
        } else {
            2
        };
        ROOM_TEMPLATES[..count]
            .iter()
            .map(|t| RoomType {
                name: t.name.to_string(),
                description: t.description.to_string(),
                amenities: t.amenities.iter().map(|a| a.to_string()).collect(),
                board_options: t.boards.to_vec(),
                cancellation_options: t
                    .cancellations
                    .iter()
                    .map(|(policy, detail)| CancellationOption {
                        policy: *policy,
                        detail: detail.to_string(),
                    })
                    .collect(),
                price: (base_price as f64 * t.multiplier).round() as u32,
                max_guests: t.max_guests,
                image: ROOM_IMAGE_POOL
                    [(t.image_index + hotel_id as usize) % ROOM_IMAGE_POOL.len()]
                .to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: u32, price: u32, stars: u8) -> Hotel {
        Hotel {
            id,
            name: format!("Hotel {}", id),
            stars,
            rating: 4.2,
            reviews: 100,
            price,
            position: (51.5, 0.0),
            address: "1 Test Street".into(),
            image: String::new(),
            promotion: None,
        }
    }

    #[test]
    fn detail_is_deterministic() {
        let h = hotel(7, 200, 4);
        let a = DetailService::detail_of(&h);
        let b = DetailService::detail_of(&h);
        assert_eq!(a.gallery, b.gallery);
        assert_eq!(a.amenities, b.amenities);
        assert_eq!(a.rooms.len(), b.rooms.len());
        for (x, y) in a.rooms.iter().zip(b.rooms.iter()) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.price, y.price);
            assert_eq!(x.image, y.image);
        }
    }

    #[test]
    fn room_count_follows_star_rating() {
        assert_eq!(DetailService::detail_of(&hotel(1, 100, 5)).rooms.len(), 4);
        assert_eq!(DetailService::detail_of(&hotel(1, 100, 4)).rooms.len(), 4);
        assert_eq!(DetailService::detail_of(&hotel(1, 100, 3)).rooms.len(), 3);
        assert_eq!(DetailService::detail_of(&hotel(1, 100, 2)).rooms.len(), 2);
    }

    #[test]
    fn room_prices_scale_from_base() {
        let detail = DetailService::detail_of(&hotel(3, 200, 4));
        let prices: Vec<u32> = detail.rooms.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![200, 270, 350, 420]);
        assert_eq!(detail.cheapest_room_index(), 0);
        assert_eq!(detail.cheapest_room_price(), 200);
    }

    #[test]
    fn gallery_and_amenity_sizes() {
        let detail = DetailService::detail_of(&hotel(12, 150, 4));
        assert_eq!(detail.gallery.len(), 5);
        assert_eq!(detail.amenities.len(), 8);
        let low = DetailService::detail_of(&hotel(12, 150, 2));
        assert_eq!(low.amenities.len(), 4);
    }

    #[test]
    fn every_room_offers_its_default_board() {
        let detail = DetailService::detail_of(&hotel(5, 180, 5));
        for room in &detail.rooms {
            assert!(room.offers_board(room.default_board()));
        }
    }
}
