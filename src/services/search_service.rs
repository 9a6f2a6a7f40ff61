//! Filter, sort and ranking logic behind the map/list view.
//!
//! The view itself only renders; everything that decides *which* hotels are
//! visible, in what order, and which three the assistant's group flow picks
//! lives here.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::data::Catalog;
use crate::models::hotel::Hotel;
use crate::services::distance_service::DistanceService;

/// Cancellation filter classes offered by the search bar. The mock catalog
/// carries no per-hotel cancellation data, so the classes approximate via
/// rating floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancellationClass {
    #[default]
    All,
    Free,
    Flexible,
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub query: String,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub min_stars: u8,
    pub cancellation: CancellationClass,
}

impl SearchFilters {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if !self.query.is_empty()
            && !hotel.name.to_lowercase().contains(&self.query.to_lowercase())
        {
            return false;
        }
        if let Some(min) = self.price_min {
            if hotel.price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if hotel.price > max {
                return false;
            }
        }
        if self.min_stars > 0 && hotel.stars < self.min_stars {
            return false;
        }
        match self.cancellation {
            CancellationClass::All => true,
            CancellationClass::Free => hotel.rating >= 4.0,
            CancellationClass::Flexible => hotel.rating >= 3.5,
        }
    }

    /// Number of non-default filters, for the "Filters (n)" badge.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.price_min.is_some() {
            count += 1;
        }
        if self.price_max.is_some() {
            count += 1;
        }
        if self.min_stars > 0 {
            count += 1;
        }
        if self.cancellation != CancellationClass::All {
            count += 1;
        }
        count
    }

    pub fn clear(&mut self) {
        *self = SearchFilters::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    PriceLowToHigh,
    PriceHighToLow,
    #[default]
    Distance,
}

/// What the user said matters most in the assistant's group flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPreference {
    FlexibleCancellation,
    ClosestToVenue,
    BudgetOption,
    GoodPriceToValue,
    RecommendSomething,
}

impl GroupPreference {
    pub const ALL: [GroupPreference; 5] = [
        GroupPreference::FlexibleCancellation,
        GroupPreference::ClosestToVenue,
        GroupPreference::BudgetOption,
        GroupPreference::GoodPriceToValue,
        GroupPreference::RecommendSomething,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GroupPreference::FlexibleCancellation => "Flexible cancellation",
            GroupPreference::ClosestToVenue => "Closest to the Venue",
            GroupPreference::BudgetOption => "Budget option",
            GroupPreference::GoodPriceToValue => "Good price to value",
            GroupPreference::RecommendSomething => "Recommend me something",
        }
    }
}

pub struct SearchService {
    catalog: Arc<Catalog>,
    pub filters: SearchFilters,
    pub sort: SortOrder,
    active_hotel: Option<u32>,
}

impl SearchService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            filters: SearchFilters::default(),
            sort: SortOrder::default(),
            active_hotel: None,
        }
    }

    /// Hotels passing the current filters, in catalog order.
    pub fn visible(&self) -> Vec<Hotel> {
        self.catalog
            .hotels()
            .iter()
            .filter(|h| self.filters.matches(h))
            .cloned()
            .collect()
    }

    /// Ids of visible hotels, for marker fade checks.
    pub fn visible_ids(&self) -> HashSet<u32> {
        self.visible().iter().map(|h| h.id).collect()
    }

    /// Every hotel with its venue distance, in the current sort order. The
    /// full list is sorted (not just the visible one) so hidden cards keep
    /// their slots during filter transitions.
    pub fn sorted_all(&self) -> Vec<(Hotel, f64)> {
        let mut with_distance: Vec<(Hotel, f64)> = self
            .catalog
            .hotels()
            .iter()
            .map(|h| (h.clone(), DistanceService::distance_to_venue(h.position)))
            .collect();
        match self.sort {
            SortOrder::PriceLowToHigh => {
                with_distance.sort_by(|a, b| a.0.price.cmp(&b.0.price));
            }
            SortOrder::PriceHighToLow => {
                with_distance.sort_by(|a, b| b.0.price.cmp(&a.0.price));
            }
            SortOrder::Distance => {
                with_distance
                    .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
            }
        }
        with_distance
    }

    /// Marker/card selection shared between the map and the carousel.
    pub fn select_hotel(&mut self, hotel_id: Option<u32>) {
        self.active_hotel = hotel_id;
    }

    pub fn active_hotel(&self) -> Option<u32> {
        self.active_hotel
    }

    /// Budget ceiling coming from the assistant.
    pub fn apply_budget_ceiling(&mut self, max_price: u32) {
        self.filters.price_max = Some(max_price);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Rating per £100 of nightly price.
    pub fn value_score(hotel: &Hotel) -> f64 {
        hotel.rating as f64 / (hotel.price as f64 / 100.0)
    }

    /// The three best hotels for a stated group preference.
    pub fn rank_for_preference(&self, preference: GroupPreference) -> Vec<Hotel> {
        let mut ranked: Vec<(Hotel, f64)> = self
            .catalog
            .hotels()
            .iter()
            .map(|h| (h.clone(), DistanceService::distance_to_venue(h.position)))
            .collect();
        match preference {
            // Better-rated hotels tend to carry friendlier cancellation terms.
            GroupPreference::FlexibleCancellation => ranked.sort_by(|a, b| {
                b.0.rating.partial_cmp(&a.0.rating).unwrap_or(Ordering::Equal)
            }),
            GroupPreference::ClosestToVenue => {
                ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            }
            GroupPreference::BudgetOption => {
                ranked.sort_by(|a, b| a.0.price.cmp(&b.0.price))
            }
            GroupPreference::GoodPriceToValue => ranked.sort_by(|a, b| {
                Self::value_score(&b.0)
                    .partial_cmp(&Self::value_score(&a.0))
                    .unwrap_or(Ordering::Equal)
            }),
            GroupPreference::RecommendSomething => ranked.sort_by(|a, b| {
                b.0.rating
                    .partial_cmp(&a.0.rating)
                    .unwrap_or(Ordering::Equal)
                    .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            }),
        }
        ranked.into_iter().take(3).map(|(h, _)| h).collect()
    }
}
