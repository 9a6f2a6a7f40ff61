//! Comparison & quote engine.
//!
//! Owns the compared-hotel set (at most three), every room configuration in
//! it, and the derived pricing. Hotels and their configurations live in one
//! entry so insertion and removal stay atomic: a hotel is never in the set
//! without at least one configuration, and no configuration survives its
//! hotel. Totals are never stored, always recomputed.
//!
//! The engine also implements the "smart" replacement heuristics the
//! assistant chips trigger, and the small state machine used when the user
//! is asked to click the hotel column they want to swap out.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{self, Catalog};
use crate::models::config::{
    ConfigPatch, RoomConfiguration, DEFAULT_CHILD_AGE, MAX_ROOM_QUANTITY, MIN_ROOM_QUANTITY,
};
use crate::models::hotel::{Hotel, HotelDetail};
use crate::models::quote::format_date_medium;
use crate::models::room::{BoardOption, CancellationPolicy};
use crate::services::detail_service::DetailService;
use crate::services::distance_service::DistanceService;

pub const MAX_COMPARE_HOTELS: usize = 3;
const MAX_STAR_RATING: u8 = 5;
const MAX_ADULTS_PER_ROOM: u8 = 4;
const MAX_CHILDREN_PER_ROOM: u8 = 3;

/// Shown while the engine waits for the user to pick a replacement target.
pub const REPLACE_PROMPT: &str = "Click on the hotel you would like to replace.";

/// Stay parameters applied to newly created configurations.
#[derive(Debug, Clone)]
pub struct CompareDefaults {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub quantity: u32,
    pub adults_per_room: u8,
}

impl Default for CompareDefaults {
    fn default() -> Self {
        Self {
            check_in: data::event_start(),
            check_out: data::event_end(),
            quantity: 1,
            adults_per_room: 1,
        }
    }
}

/// One compared hotel with its expanded detail, cached venue distance and
/// the user's room configurations.
#[derive(Debug, Clone)]
pub struct CompareEntry {
    pub hotel: Hotel,
    pub detail: HotelDetail,
    pub distance_km: f64,
    pub configs: Vec<RoomConfiguration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    Idle,
    AwaitingTarget,
}

/// Result of toggling a hotel in or out of the compare tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The set already holds the maximum number of hotels; nothing changed.
    Full,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigTotals {
    pub nights: u32,
    pub room_base: u32,
    pub board_surcharge: u32,
    pub cancel_fee: u32,
    pub total: u32,
    /// Room price + board surcharge + per-night cancellation fee.
    pub rate_per_night: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotelTotals {
    pub hotel_id: u32,
    pub name: String,
    pub stars: u8,
    pub total_rooms: u32,
    pub total_adults: u32,
    pub total_children: u32,
    pub total_guests: u32,
    pub room_base: u32,
    pub board_surcharge: u32,
    pub cancel_surcharge: u32,
    pub subtotal: u32,
    pub room_nights: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrandTotals {
    pub hotels: u32,
    pub rooms: u32,
    pub room_types: u32,
    pub adults: u32,
    pub children: u32,
    pub guests: u32,
    pub room_nights: u32,
    pub total: u32,
}

/// Earliest check-in and latest check-out across every configuration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn label(&self) -> String {
        format!(
            "{} → {}",
            self.check_in.format("%-d %b"),
            format_date_medium(self.check_out)
        )
    }
}

pub struct CompareService {
    catalog: Arc<Catalog>,
    defaults: CompareDefaults,
    entries: Vec<CompareEntry>,
    next_config_id: u64,
    replace_mode: ReplaceMode,
    exit_handler: Option<Box<dyn FnMut()>>,
}

impl CompareService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            defaults: CompareDefaults::default(),
            entries: Vec::new(),
            next_config_id: 1,
            replace_mode: ReplaceMode::Idle,
            exit_handler: None,
        }
    }

    /// Called when removing the last hotel empties the set; the presentation
    /// layer uses it to navigate away from the comparison view.
    pub fn set_exit_handler<F: FnMut() + 'static>(&mut self, handler: F) {
        self.exit_handler = Some(Box::new(handler));
    }

    pub fn defaults(&self) -> &CompareDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: CompareDefaults) {
        self.defaults = defaults;
    }

    /// Reset the set to the given hotels (capped at three) and re-create
    /// one default configuration per hotel.
    pub fn open(&mut self, hotels: Vec<Hotel>, defaults: CompareDefaults) {
        self.defaults = defaults;
        self.entries.clear();
        let adults = self.defaults.adults_per_room;
        let quantity = self.defaults.quantity;
        for hotel in hotels.into_iter().take(MAX_COMPARE_HOTELS) {
            if self.contains(hotel.id) {
                continue;
            }
            let entry = self.make_entry(&hotel, adults, quantity);
            self.entries.push(entry);
        }
        self.sort_entries();
        self.replace_mode = ReplaceMode::Idle;
        log::info!("Comparison opened with {} hotels", self.entries.len());
    }

    pub fn entries(&self) -> &[CompareEntry] {
        &self.entries
    }

    pub fn hotels(&self) -> Vec<&Hotel> {
        self.entries.iter().map(|e| &e.hotel).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, hotel_id: u32) -> bool {
        self.entries.iter().any(|e| e.hotel.id == hotel_id)
    }

    pub fn entry(&self, hotel_id: u32) -> Option<&CompareEntry> {
        self.entries.iter().find(|e| e.hotel.id == hotel_id)
    }

    pub fn config(&self, hotel_id: u32, config_id: u64) -> Option<&RoomConfiguration> {
        self.entry(hotel_id)?.configs.iter().find(|c| c.id == config_id)
    }

    /* ── Tray operations ── */

    /// Add the hotel, or remove it when already compared. Adding past the
    /// cap is rejected without touching the set.
    pub fn toggle_hotel(&mut self, hotel: &Hotel) -> ToggleOutcome {
        if self.contains(hotel.id) {
            self.remove_hotel(hotel.id);
            return ToggleOutcome::Removed;
        }
        if self.add_hotel(hotel) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Full
        }
    }

    pub fn add_hotel(&mut self, hotel: &Hotel) -> bool {
        if self.contains(hotel.id) || self.entries.len() >= MAX_COMPARE_HOTELS {
            return false;
        }
        let adults = self.defaults.adults_per_room;
        let quantity = self.defaults.quantity;
        let entry = self.make_entry(hotel, adults, quantity);
        self.entries.push(entry);
        self.sort_entries();
        true
    }

    /// Evict a hotel and all of its configurations. Emptying the set fires
    /// the exit handler exactly once.
    pub fn remove_hotel(&mut self, hotel_id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.hotel.id != hotel_id);
        if self.entries.len() == before {
            return false;
        }
        log::info!("Hotel {} removed from comparison", hotel_id);
        if self.entries.is_empty() {
            self.fire_exit();
        }
        true
    }

    /* ── Configuration CRUD ── */

    /// Append a configuration for the cheapest room type the hotel does not
    /// already have a configuration for (first type when all are used).
    /// Returns the new configuration id.
    pub fn add_configuration(&mut self, hotel_id: u32) -> Option<u64> {
        self.entries.iter().position(|e| e.hotel.id == hotel_id)?;
        let id = self.take_config_id();
        let entry = self.entries.iter_mut().find(|e| e.hotel.id == hotel_id)?;
        let used: Vec<usize> = entry.configs.iter().map(|c| c.room_type_index).collect();
        let room_index = entry
            .detail
            .rooms
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .min_by_key(|(_, r)| r.price)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let room = entry.detail.room(room_index)?;
        let config = RoomConfiguration {
            id,
            room_type_index: room_index,
            check_in: self.defaults.check_in,
            check_out: self.defaults.check_out,
            adults: 1,
            children: 0,
            child_ages: Vec::new(),
            board: room.default_board(),
            cancellation: CancellationPolicy::Flexible,
            quantity: MIN_ROOM_QUANTITY,
            editing: true,
        };
        entry.configs.push(config);
        Some(id)
    }

    /// Merge a patch into one configuration. The whole patch is rejected if
    /// the resulting dates would not satisfy check-in < check-out or the
    /// room index is unknown. A room-type change drops board/cancellation
    /// choices the new type does not offer back to its first option.
    pub fn update_configuration(
        &mut self,
        hotel_id: u32,
        config_id: u64,
        patch: ConfigPatch,
    ) -> bool {
        let entry = match self.entries.iter_mut().find(|e| e.hotel.id == hotel_id) {
            Some(e) => e,
            None => return false,
        };
        let rooms = entry.detail.rooms.clone();
        let config = match entry.configs.iter_mut().find(|c| c.id == config_id) {
            Some(c) => c,
            None => return false,
        };

        let check_in = patch.check_in.unwrap_or(config.check_in);
        let check_out = patch.check_out.unwrap_or(config.check_out);
        if check_out <= check_in {
            return false;
        }
        let room_index = patch.room_type_index.unwrap_or(config.room_type_index);
        let room = match rooms.get(room_index) {
            Some(r) => r,
            None => return false,
        };

        let room_changed = room_index != config.room_type_index;
        config.room_type_index = room_index;
        config.check_in = check_in;
        config.check_out = check_out;

        if let Some(adults) = patch.adults {
            config.adults = adults.clamp(1, MAX_ADULTS_PER_ROOM);
        }
        if let Some(ages) = patch.child_ages {
            config.child_ages = ages;
        }
        if let Some(children) = patch.children {
            config.children = children.min(MAX_CHILDREN_PER_ROOM);
        }
        // Keep the age list in lockstep with the child count.
        config
            .child_ages
            .resize(config.children as usize, DEFAULT_CHILD_AGE);

        if let Some(board) = patch.board {
            config.board = board;
        }
        if let Some(cancellation) = patch.cancellation {
            config.cancellation = cancellation;
        }
        if let Some(quantity) = patch.quantity {
            config.quantity = quantity.clamp(MIN_ROOM_QUANTITY, MAX_ROOM_QUANTITY);
        }
        if let Some(editing) = patch.editing {
            config.editing = editing;
        }

        if room_changed {
            if !room.offers_board(config.board) {
                config.board = room.default_board();
            }
            if !room.offers_cancellation(config.cancellation) {
                config.cancellation = room.default_cancellation();
            }
        }
        true
    }

    /// Remove one configuration. Dropping a hotel's last configuration
    /// evicts the hotel itself so no compared hotel persists without one.
    pub fn remove_configuration(&mut self, hotel_id: u32, config_id: u64) -> bool {
        let entry = match self.entries.iter_mut().find(|e| e.hotel.id == hotel_id) {
            Some(e) => e,
            None => return false,
        };
        let before = entry.configs.len();
        entry.configs.retain(|c| c.id != config_id);
        if entry.configs.len() == before {
            return false;
        }
        if entry.configs.is_empty() {
            self.remove_hotel(hotel_id);
        }
        true
    }

    /// Copy a configuration under a fresh id with the editing flag cleared.
    pub fn duplicate_configuration(&mut self, hotel_id: u32, config_id: u64) -> Option<u64> {
        self.config(hotel_id, config_id)?;
        let id = self.take_config_id();
        let entry = self.entries.iter_mut().find(|e| e.hotel.id == hotel_id)?;
        let source = entry.configs.iter().find(|c| c.id == config_id)?;
        let mut copy = source.clone();
        copy.id = id;
        copy.editing = false;
        entry.configs.push(copy);
        Some(id)
    }

    pub fn toggle_editing(&mut self, hotel_id: u32, config_id: u64) -> bool {
        self.entries
            .iter_mut()
            .find(|e| e.hotel.id == hotel_id)
            .and_then(|e| e.configs.iter_mut().find(|c| c.id == config_id))
            .map(|c| {
                c.editing = !c.editing;
            })
            .is_some()
    }

    /* ── Hotel replacement ── */

    pub fn replace_mode(&self) -> ReplaceMode {
        self.replace_mode
    }

    /// Arm the "change one hotel" interaction; the next column click goes
    /// through `replace_hotel`.
    pub fn begin_replace(&mut self) {
        self.replace_mode = ReplaceMode::AwaitingTarget;
    }

    pub fn cancel_replace(&mut self) {
        self.replace_mode = ReplaceMode::Idle;
    }

    /// Swap the target for the best-value hotel outside the set, scored by
    /// rating × stars over the cheapest room price (first maximum wins).
    /// Returns the replacement.
    pub fn replace_hotel(&mut self, target_id: u32) -> Option<Hotel> {
        self.replace_mode = ReplaceMode::Idle;
        if !self.contains(target_id) {
            return None;
        }
        let mut best: Option<(f64, &Hotel)> = None;
        for hotel in self.catalog.hotels() {
            if self.contains(hotel.id) {
                continue;
            }
            let cheapest = DetailService::detail_of(hotel).cheapest_room_price();
            let score = (hotel.rating as f64 * hotel.stars as f64) / cheapest as f64;
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, hotel));
            }
        }
        let replacement = best.map(|(_, h)| h.clone())?;
        let quantity = self.defaults.quantity;
        let entry = self.make_entry(&replacement, 1, quantity);
        if let Some(slot) = self.entries.iter_mut().find(|e| e.hotel.id == target_id) {
            *slot = entry;
        }
        self.sort_entries();
        log::info!(
            "Replaced hotel {} with {} ({})",
            target_id,
            replacement.name,
            replacement.id
        );
        Some(replacement)
    }

    /// Swap the whole set for exactly three supplied hotels and rebuild all
    /// configurations from defaults.
    pub fn replace_all(&mut self, hotels: Vec<Hotel>) -> bool {
        if hotels.len() != MAX_COMPARE_HOTELS {
            return false;
        }
        let quantity = self.defaults.quantity;
        self.entries.clear();
        for hotel in &hotels {
            let entry = self.make_entry(hotel, 1, quantity);
            self.entries.push(entry);
        }
        self.sort_entries();
        true
    }

    /* ── Alternative finders ── */

    /// Replace the set with the three cheapest hotels strictly below the
    /// current maximum price. No-op when fewer than three qualify.
    pub fn find_less_expensive(&mut self) -> bool {
        let candidates = self.less_expensive_candidates();
        if candidates.len() < MAX_COMPARE_HOTELS {
            return false;
        }
        self.replace_all(candidates)
    }

    pub fn has_less_expensive(&self) -> bool {
        self.less_expensive_candidates().len() >= MAX_COMPARE_HOTELS
    }

    fn less_expensive_candidates(&self) -> Vec<Hotel> {
        let max_price = match self.entries.iter().map(|e| e.hotel.price).max() {
            Some(p) => p,
            None => return Vec::new(),
        };
        let mut candidates: Vec<Hotel> = self
            .catalog
            .hotels()
            .iter()
            .filter(|h| !self.contains(h.id) && h.price < max_price)
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.price.cmp(&b.price));
        candidates.truncate(MAX_COMPARE_HOTELS);
        candidates
    }

    /// Replace the set with the three best-rated hotels not currently shown.
    pub fn find_something_else(&mut self) -> bool {
        let mut candidates: Vec<Hotel> = self
            .catalog
            .hotels()
            .iter()
            .filter(|h| !self.contains(h.id))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
        });
        candidates.truncate(MAX_COMPARE_HOTELS);
        if candidates.len() < MAX_COMPARE_HOTELS {
            return false;
        }
        self.replace_all(candidates)
    }

    /// Three hotels strictly farther out than the current farthest, nearest
    /// of those first. Falls back to the three globally farthest hotels
    /// outside the set when fewer than three qualify.
    pub fn increase_distance(&mut self) -> bool {
        let max_dist = match self.max_distance() {
            Some(d) => d,
            None => return false,
        };
        let mut candidates = self.hotels_by_distance(|d| d > max_dist, false);
        candidates.truncate(MAX_COMPARE_HOTELS);
        if candidates.len() < MAX_COMPARE_HOTELS {
            let mut fallback = self.hotels_by_distance(|_| true, true);
            fallback.truncate(MAX_COMPARE_HOTELS);
            if fallback.len() < MAX_COMPARE_HOTELS {
                return false;
            }
            return self.replace_all(fallback);
        }
        self.replace_all(candidates)
    }

    /// Three hotels strictly closer than the current closest. No fallback.
    pub fn decrease_distance(&mut self) -> bool {
        let min_dist = match self.min_distance() {
            Some(d) => d,
            None => return false,
        };
        let mut candidates = self.hotels_by_distance(|d| d < min_dist, false);
        candidates.truncate(MAX_COMPARE_HOTELS);
        if candidates.len() < MAX_COMPARE_HOTELS {
            return false;
        }
        self.replace_all(candidates)
    }

    pub fn has_decrease_distance(&self) -> bool {
        match self.min_distance() {
            Some(min_dist) => {
                self.hotels_by_distance(|d| d < min_dist, false).len() >= MAX_COMPARE_HOTELS
            }
            None => false,
        }
    }

    /// Three hotels with more stars than the current minimum, best stars
    /// first, rating as tie-break. No-op when fewer than three qualify.
    pub fn higher_rating(&mut self) -> bool {
        let min_stars = match self.entries.iter().map(|e| e.hotel.stars).min() {
            Some(s) => s,
            None => return false,
        };
        let mut candidates: Vec<Hotel> = self
            .catalog
            .hotels()
            .iter()
            .filter(|h| !self.contains(h.id) && h.stars > min_stars)
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.stars
                .cmp(&a.stars)
                .then(b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
        });
        candidates.truncate(MAX_COMPARE_HOTELS);
        if candidates.len() < MAX_COMPARE_HOTELS {
            return false;
        }
        self.replace_all(candidates)
    }

    /// False when every compared hotel already has the maximum star rating
    /// (the action is not offered at all in that case).
    pub fn has_higher_rating(&self) -> bool {
        if self.entries.is_empty()
            || self.entries.iter().all(|e| e.hotel.stars == MAX_STAR_RATING)
        {
            return false;
        }
        let min_stars = self
            .entries
            .iter()
            .map(|e| e.hotel.stars)
            .min()
            .unwrap_or(MAX_STAR_RATING);
        self.catalog
            .hotels()
            .iter()
            .filter(|h| !self.contains(h.id) && h.stars > min_stars)
            .count()
            >= MAX_COMPARE_HOTELS
    }

    /// Switch every configuration whose room type offers Bed & Breakfast to
    /// that board; the rest are left untouched. Returns how many changed.
    pub fn add_breakfast(&mut self) -> usize {
        let mut updated = 0;
        for entry in &mut self.entries {
            for config in &mut entry.configs {
                let offers = entry
                    .detail
                    .room(config.room_type_index)
                    .map(|r| r.offers_board(BoardOption::BedAndBreakfast))
                    .unwrap_or(false);
                if offers && config.board != BoardOption::BedAndBreakfast {
                    config.board = BoardOption::BedAndBreakfast;
                    updated += 1;
                }
            }
        }
        updated
    }

    /* ── Derived totals ── */

    pub fn config_totals(&self, hotel_id: u32, config_id: u64) -> Option<ConfigTotals> {
        let entry = self.entry(hotel_id)?;
        let config = entry.configs.iter().find(|c| c.id == config_id)?;
        Some(Self::breakdown(entry, config))
    }

    fn breakdown(entry: &CompareEntry, config: &RoomConfiguration) -> ConfigTotals {
        let room_price = entry
            .detail
            .room(config.room_type_index)
            .map(|r| r.price)
            .unwrap_or(0);
        let nights = config.nights();
        let per_unit = nights * config.quantity;
        let board = config.board.surcharge();
        let cancel = config.cancellation.fee_per_night(room_price);
        ConfigTotals {
            nights,
            room_base: room_price * per_unit,
            board_surcharge: board * per_unit,
            cancel_fee: cancel * per_unit,
            total: (room_price + board + cancel) * per_unit,
            rate_per_night: room_price + board + cancel,
        }
    }

    pub fn hotel_totals(&self) -> Vec<HotelTotals> {
        self.entries
            .iter()
            .map(|entry| {
                let mut totals = HotelTotals {
                    hotel_id: entry.hotel.id,
                    name: entry.hotel.name.clone(),
                    stars: entry.hotel.stars,
                    total_rooms: 0,
                    total_adults: 0,
                    total_children: 0,
                    total_guests: 0,
                    room_base: 0,
                    board_surcharge: 0,
                    cancel_surcharge: 0,
                    subtotal: 0,
                    room_nights: 0,
                };
                for config in &entry.configs {
                    let b = Self::breakdown(entry, config);
                    totals.total_rooms += config.quantity;
                    totals.total_adults += config.adults as u32 * config.quantity;
                    totals.total_children += config.children as u32 * config.quantity;
                    totals.room_base += b.room_base;
                    totals.board_surcharge += b.board_surcharge;
                    totals.cancel_surcharge += b.cancel_fee;
                    totals.subtotal += b.total;
                    totals.room_nights += config.quantity * b.nights;
                }
                totals.total_guests = totals.total_adults + totals.total_children;
                totals
            })
            .collect()
    }

    pub fn grand_totals(&self) -> GrandTotals {
        let per_hotel = self.hotel_totals();
        let mut grand = GrandTotals {
            hotels: self.entries.len() as u32,
            rooms: 0,
            room_types: self.entries.iter().map(|e| e.configs.len() as u32).sum(),
            adults: 0,
            children: 0,
            guests: 0,
            room_nights: 0,
            total: 0,
        };
        for t in &per_hotel {
            grand.rooms += t.total_rooms;
            grand.adults += t.total_adults;
            grand.children += t.total_children;
            grand.room_nights += t.room_nights;
            grand.total += t.subtotal;
        }
        grand.guests = grand.adults + grand.children;
        grand
    }

    pub fn date_range(&self) -> Option<DateRange> {
        let mut range: Option<DateRange> = None;
        for config in self.entries.iter().flat_map(|e| e.configs.iter()) {
            range = Some(match range {
                None => DateRange {
                    check_in: config.check_in,
                    check_out: config.check_out,
                },
                Some(r) => DateRange {
                    check_in: r.check_in.min(config.check_in),
                    check_out: r.check_out.max(config.check_out),
                },
            });
        }
        range
    }

    /* ── Internals ── */

    fn take_config_id(&mut self) -> u64 {
        let id = self.next_config_id;
        self.next_config_id += 1;
        id
    }

    fn make_entry(&mut self, hotel: &Hotel, adults: u8, quantity: u32) -> CompareEntry {
        let id = self.take_config_id();
        Self::build_entry(&self.defaults, hotel, adults, quantity, id)
    }

    fn build_entry(
        defaults: &CompareDefaults,
        hotel: &Hotel,
        adults: u8,
        quantity: u32,
        config_id: u64,
    ) -> CompareEntry {
        let detail = DetailService::detail_of(hotel);
        let room_index = detail.cheapest_room_index();
        let board = detail
            .room(room_index)
            .map(|r| r.default_board())
            .unwrap_or(BoardOption::RoomOnly);
        let config = RoomConfiguration {
            id: config_id,
            room_type_index: room_index,
            check_in: defaults.check_in,
            check_out: defaults.check_out,
            adults: adults.max(1),
            children: 0,
            child_ages: Vec::new(),
            board,
            cancellation: CancellationPolicy::Flexible,
            quantity: quantity.clamp(MIN_ROOM_QUANTITY, MAX_ROOM_QUANTITY),
            editing: false,
        };
        CompareEntry {
            distance_km: DistanceService::distance_to_venue(hotel.position),
            detail,
            hotel: hotel.clone(),
            configs: vec![config],
        }
    }

    /// Columns are shown cheapest first.
    fn sort_entries(&mut self) {
        self.entries.sort_by(|a, b| {
            a.detail
                .cheapest_room_price()
                .cmp(&b.detail.cheapest_room_price())
        });
    }

    fn max_distance(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.distance_km)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    fn min_distance(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.distance_km)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Hotels outside the set matching a distance predicate, sorted by
    /// distance (descending when `farthest_first`).
    fn hotels_by_distance<P: Fn(f64) -> bool>(
        &self,
        predicate: P,
        farthest_first: bool,
    ) -> Vec<Hotel> {
        let mut with_distance: Vec<(f64, &Hotel)> = self
            .catalog
            .hotels()
            .iter()
            .filter(|h| !self.contains(h.id))
            .map(|h| (DistanceService::distance_to_venue(h.position), h))
            .filter(|(d, _)| predicate(*d))
            .collect();
        with_distance.sort_by(|a, b| {
            let ord = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
            if farthest_first {
                ord.reverse()
            } else {
                ord
            }
        });
        with_distance.into_iter().map(|(_, h)| h.clone()).collect()
    }

    fn fire_exit(&mut self) {
        if let Some(handler) = self.exit_handler.as_mut() {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn hotel(id: u32, price: u32, stars: u8, rating: f32, position: (f64, f64)) -> Hotel {
        Hotel {
            id,
            name: format!("Hotel {}", id),
            stars,
            rating,
            reviews: 500,
            price,
            position,
            address: "1 Dock Road".into(),
            image: String::new(),
            promotion: None,
        }
    }

    fn service_with(hotels: Vec<Hotel>) -> CompareService {
        CompareService::new(Arc::new(Catalog::from_hotels(hotels)))
    }

    #[test]
    fn worked_example_totals() {
        // Base 111 puts the Superior room at exactly 150/night.
        let h = hotel(1, 111, 3, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let config_id = service.entries()[0].configs[0].id;

        let ok = service.update_configuration(
            1,
            config_id,
            ConfigPatch {
                room_type_index: Some(1),
                board: Some(BoardOption::HalfBoard),
                cancellation: Some(CancellationPolicy::Flexible),
                quantity: Some(2),
                ..ConfigPatch::default()
            },
        );
        assert!(ok);

        let totals = service.config_totals(1, config_id).unwrap();
        assert_eq!(totals.nights, 3);
        assert_eq!(totals.room_base, 150 * 3 * 2);
        assert_eq!(totals.board_surcharge, 18 * 3 * 2);
        assert_eq!(totals.cancel_fee, 6 * 3 * 2);
        assert_eq!(totals.total, 1044);
        assert_eq!(totals.rate_per_night, 150 + 18 + 6);
    }

    #[test]
    fn nights_floor_at_one() {
        let h = hotel(1, 100, 3, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let config = &service.entries()[0].configs[0];
        assert_eq!(config.nights(), 3);
        // Same-day in/out cannot be stored, but the floor still guards the
        // arithmetic if dates ever collapse.
        let mut same_day = config.clone();
        same_day.check_out = same_day.check_in;
        assert_eq!(same_day.nights(), 1);
    }

    #[test]
    fn compare_set_is_capped_at_three() {
        let hotels: Vec<Hotel> = (1..=4)
            .map(|i| hotel(i, 100 + i, 4, 4.0, data::VENUE_POSITION))
            .collect();
        let mut service = service_with(hotels.clone());
        for h in &hotels[..3] {
            assert!(service.add_hotel(h));
        }
        let before: Vec<u32> = service.hotels().iter().map(|h| h.id).collect();
        assert!(!service.add_hotel(&hotels[3]));
        assert_eq!(service.toggle_hotel(&hotels[3]), ToggleOutcome::Full);
        let after: Vec<u32> = service.hotels().iter().map(|h| h.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn duplicate_hotel_is_rejected() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        assert!(service.add_hotel(&h));
        assert!(!service.add_hotel(&h));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn removing_last_hotel_fires_exit_once() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        service.set_exit_handler(move || counter.set(counter.get() + 1));

        service.open(vec![h], CompareDefaults::default());
        assert!(service.remove_hotel(1));
        assert!(service.is_empty());
        assert_eq!(fired.get(), 1);

        // Removing from an already-empty set must not fire again.
        assert!(!service.remove_hotel(1));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn add_configuration_picks_cheapest_unused_room() {
        let h = hotel(1, 100, 5, 4.5, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());

        // Initial config took index 0 (cheapest).
        assert_eq!(service.entries()[0].configs[0].room_type_index, 0);
        service.add_configuration(1).unwrap();
        assert_eq!(service.entries()[0].configs[1].room_type_index, 1);
        service.add_configuration(1).unwrap();
        service.add_configuration(1).unwrap();
        assert_eq!(service.entries()[0].configs[3].room_type_index, 3);

        // All four types used: fall back to index 0.
        let id = service.add_configuration(1).unwrap();
        let config = service.config(1, id).unwrap();
        assert_eq!(config.room_type_index, 0);
        assert!(config.editing);
    }

    #[test]
    fn room_change_resets_board_only_when_not_offered() {
        let h = hotel(1, 100, 5, 4.5, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.entries()[0].configs[0].id;

        // Standard -> Room Only by default; Deluxe has no Room Only.
        assert_eq!(service.config(1, id).unwrap().board, BoardOption::RoomOnly);
        assert!(service.update_configuration(1, id, ConfigPatch::room_type(2)));
        assert_eq!(
            service.config(1, id).unwrap().board,
            BoardOption::BedAndBreakfast
        );

        // B&B is offered by every type, so switching back keeps it.
        assert!(service.update_configuration(1, id, ConfigPatch::room_type(0)));
        assert_eq!(
            service.config(1, id).unwrap().board,
            BoardOption::BedAndBreakfast
        );
    }

    #[test]
    fn invalid_dates_reject_whole_patch() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.entries()[0].configs[0].id;
        let before = service.config(1, id).unwrap().clone();

        let bad = ConfigPatch {
            check_out: Some(before.check_in),
            quantity: Some(5),
            ..ConfigPatch::default()
        };
        assert!(!service.update_configuration(1, id, bad));
        let after = service.config(1, id).unwrap();
        assert_eq!(after.quantity, before.quantity);
        assert_eq!(after.check_out, before.check_out);
    }

    #[test]
    fn quantity_clamps_to_bounds() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.entries()[0].configs[0].id;

        assert!(service.update_configuration(1, id, ConfigPatch::quantity(500)));
        assert_eq!(service.config(1, id).unwrap().quantity, 50);
        assert!(service.update_configuration(1, id, ConfigPatch::quantity(0)));
        assert_eq!(service.config(1, id).unwrap().quantity, 1);
    }

    #[test]
    fn child_ages_track_child_count() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.entries()[0].configs[0].id;

        let grow = ConfigPatch {
            children: Some(2),
            ..ConfigPatch::default()
        };
        assert!(service.update_configuration(1, id, grow));
        assert_eq!(service.config(1, id).unwrap().child_ages, vec![5, 5]);

        let with_ages = ConfigPatch {
            child_ages: Some(vec![3, 9]),
            ..ConfigPatch::default()
        };
        assert!(service.update_configuration(1, id, with_ages));
        assert_eq!(service.config(1, id).unwrap().child_ages, vec![3, 9]);

        let shrink = ConfigPatch {
            children: Some(1),
            ..ConfigPatch::default()
        };
        assert!(service.update_configuration(1, id, shrink));
        assert_eq!(service.config(1, id).unwrap().child_ages, vec![3]);
    }

    #[test]
    fn duplicate_clears_editing_and_gets_fresh_id() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.entries()[0].configs[0].id;
        service.toggle_editing(1, id);

        let copy_id = service.duplicate_configuration(1, id).unwrap();
        assert_ne!(copy_id, id);
        let copy = service.config(1, copy_id).unwrap();
        assert!(!copy.editing);
        assert_eq!(copy.room_type_index, service.config(1, id).unwrap().room_type_index);
    }

    #[test]
    fn removing_last_config_evicts_hotel() {
        let hotels = vec![
            hotel(1, 100, 4, 4.0, data::VENUE_POSITION),
            hotel(2, 120, 4, 4.1, data::VENUE_POSITION),
        ];
        let mut service = service_with(hotels.clone());
        service.open(hotels, CompareDefaults::default());
        let id = service.entry(1).unwrap().configs[0].id;
        assert!(service.remove_configuration(1, id));
        assert!(!service.contains(1));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn grand_total_matches_sum_of_subtotals() {
        let hotels = vec![
            hotel(1, 100, 5, 4.5, data::VENUE_POSITION),
            hotel(2, 140, 4, 4.2, (51.52, 0.05)),
            hotel(3, 90, 3, 3.9, (51.49, 0.01)),
        ];
        let mut service = service_with(hotels.clone());
        service.open(hotels, CompareDefaults::default());
        service.add_configuration(1);
        service.add_configuration(2);

        let per_hotel = service.hotel_totals();
        let grand = service.grand_totals();
        let sum: u32 = per_hotel.iter().map(|t| t.subtotal).sum();
        assert_eq!(grand.total, sum);
        assert_eq!(grand.hotels, 3);
        assert_eq!(grand.room_types, 5);
    }

    #[test]
    fn replace_hotel_picks_best_value_candidate() {
        // Candidate 4: 4.0 * 4 / 100 = 0.16; candidate 5: 4.5 * 5 / 300 = 0.075.
        let hotels = vec![
            hotel(1, 100, 4, 4.0, data::VENUE_POSITION),
            hotel(4, 100, 4, 4.0, (51.51, 0.02)),
            hotel(5, 300, 5, 4.5, (51.52, 0.03)),
        ];
        let mut service = service_with(hotels.clone());
        service.open(vec![hotels[0].clone()], CompareDefaults::default());

        service.begin_replace();
        assert_eq!(service.replace_mode(), ReplaceMode::AwaitingTarget);
        let replacement = service.replace_hotel(1).unwrap();
        assert_eq!(replacement.id, 4);
        assert_eq!(service.replace_mode(), ReplaceMode::Idle);
        assert!(service.contains(4));
        assert!(!service.contains(1));
        assert_eq!(service.entry(4).unwrap().configs.len(), 1);
    }

    #[test]
    fn add_breakfast_skips_rooms_without_the_option() {
        let h = hotel(1, 100, 5, 4.5, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let updated = service.add_breakfast();
        assert_eq!(updated, 1);
        assert_eq!(
            service.entries()[0].configs[0].board,
            BoardOption::BedAndBreakfast
        );
        // Second run is a no-op.
        assert_eq!(service.add_breakfast(), 0);
    }

    #[test]
    fn date_range_spans_all_configs() {
        let h = hotel(1, 100, 4, 4.0, data::VENUE_POSITION);
        let mut service = service_with(vec![h.clone()]);
        service.open(vec![h], CompareDefaults::default());
        let id = service.add_configuration(1).unwrap();
        let later = ConfigPatch::dates(
            NaiveDate::from_ymd_opt(2027, 9, 9).unwrap(),
            NaiveDate::from_ymd_opt(2027, 9, 14).unwrap(),
        );
        assert!(service.update_configuration(1, id, later));

        let range = service.date_range().unwrap();
        assert_eq!(range.check_in, data::event_start());
        assert_eq!(range.check_out, NaiveDate::from_ymd_opt(2027, 9, 14).unwrap());
    }
}
