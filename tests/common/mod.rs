#![allow(dead_code)]

use std::sync::Once;

use eventstay::data::VENUE_POSITION;
use eventstay::models::hotel::Hotel;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// One degree of latitude is ~111.2 km, so this places a hotel `km` north
/// of the venue.
pub fn position_at_km(km: f64) -> (f64, f64) {
    (VENUE_POSITION.0 + km / 111.195, VENUE_POSITION.1)
}

pub fn hotel(id: u32, price: u32, stars: u8, rating: f32, distance_km: f64) -> Hotel {
    Hotel {
        id,
        name: format!("Hotel {}", id),
        stars,
        rating,
        reviews: 1000 + id * 37,
        price,
        position: position_at_km(distance_km),
        address: format!("{} Dock Road, London", id),
        image: String::new(),
        promotion: None,
    }
}

/// The four-hotel scenario used by the finder tests: A is compared, B/C/D
/// are the cheaper alternatives at varying distances.
pub fn abcd_catalog() -> Vec<Hotel> {
    vec![
        hotel(1, 100, 5, 4.8, 1.0), // A
        hotel(2, 80, 4, 4.2, 2.0),  // B
        hotel(3, 90, 4, 4.3, 3.0),  // C
        hotel(4, 95, 3, 4.0, 0.5),  // D
    ]
}
