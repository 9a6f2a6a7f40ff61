//! Widget shell.
//!
//! Holds the page state and wires the components together: search filters
//! feed the map/list, assistant effects are scheduled on the virtual-time
//! queue, and the comparison engine is opened with whatever defaults the
//! current flow asks for. A presentation layer drives this through the
//! public methods and renders from the getters; the shell itself never
//! draws anything and never navigates on its own except when the compared
//! set empties under the user.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::data::{self, Catalog};
use crate::models::hotel::Hotel;
use crate::models::quote::QuoteDocument;
use crate::services::assistant_service::{AssistantEffect, AssistantService, StayOption};
use crate::services::compare_service::{
    CompareDefaults, CompareService, ReplaceMode, ToggleOutcome,
};
use crate::services::export_service::ExportService;
use crate::services::scheduler::TimerQueue;
use crate::services::search_service::{GroupPreference, SearchService};
use crate::services::share_service::{ShareReceipt, ShareService};
use crate::services::urgency_service::UrgencyService;

/// Loading shim shown while the group flow "searches" for hotels.
pub const GROUP_LOADING_MS: u64 = 2000;
/// Room quantity preset by the detail page's group-booking shortcut.
const GROUP_BOOKING_QUANTITY: u32 = 10;
/// Above this many rooms the checkout becomes a quote request.
const DIRECT_BOOKING_MAX_ROOMS: u32 = 10;

const TIER_LABELS: [&str; 3] = ["Budget option", "Mid-range option", "Premium option"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Map,
    Detail,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
}

/// A transient toast for the presentation layer to show and auto-dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    BookRooms,
    RequestQuote,
}

/// Guest and payment details collected before the (no-op) payment step.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub vat: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl BookingForm {
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.card_number.trim().is_empty()
            && !self.expiry.trim().is_empty()
            && !self.cvv.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
enum WidgetTask {
    BeginGroupCompare {
        preference: GroupPreference,
        rooms: u32,
        adults_per_room: u8,
    },
    FinishGroupCompare {
        preference: GroupPreference,
        rooms: u32,
        adults_per_room: u8,
    },
}

pub struct BookingWidget {
    catalog: Arc<Catalog>,
    pub search: SearchService,
    pub assistant: AssistantService,
    pub compare: CompareService,
    timers: TimerQueue<WidgetTask>,
    page: Page,
    previous_page: Option<Page>,
    selected_hotel: Option<u32>,
    group_loading: bool,
    notices: Vec<Notice>,
    stay_check_in: NaiveDate,
    stay_check_out: NaiveDate,
}

impl BookingWidget {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_catalog(Arc::new(Catalog::load()?)))
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            search: SearchService::new(catalog.clone()),
            assistant: AssistantService::new(),
            compare: CompareService::new(catalog.clone()),
            catalog,
            timers: TimerQueue::new(),
            page: Page::Map,
            previous_page: None,
            selected_hotel: None,
            group_loading: false,
            notices: Vec::new(),
            stay_check_in: data::event_start(),
            stay_check_out: data::event_end(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_hotel(&self) -> Option<&Hotel> {
        self.selected_hotel.and_then(|id| self.catalog.by_id(id))
    }

    pub fn is_group_loading(&self) -> bool {
        self.group_loading
    }

    /// Stay dates from the search bar; rejected when out of order.
    pub fn set_stay_dates(&mut self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        if check_out <= check_in {
            return false;
        }
        self.stay_check_in = check_in;
        self.stay_check_out = check_out;
        true
    }

    /* ── Navigation ── */

    pub fn open_detail(&mut self, hotel_id: u32) -> bool {
        if self.catalog.by_id(hotel_id).is_none() {
            return false;
        }
        if self.page != Page::Detail {
            self.previous_page = Some(self.page);
        }
        self.selected_hotel = Some(hotel_id);
        self.page = Page::Detail;
        true
    }

    /// Back to the comparison when it is still populated and we came from
    /// there, otherwise to the map.
    pub fn go_back(&mut self) {
        if self.previous_page == Some(Page::Compare) && !self.compare.is_empty() {
            self.page = Page::Compare;
        } else {
            self.page = Page::Map;
        }
        self.selected_hotel = None;
        self.previous_page = None;
    }

    /// Open the comparison over the hotels currently in the tray, with
    /// fresh single-room configurations on the search-bar dates.
    pub fn open_compare(&mut self) -> bool {
        if self.compare.is_empty() {
            return false;
        }
        let hotels: Vec<Hotel> = self.compare.hotels().into_iter().cloned().collect();
        self.open_compare_with(hotels, 1, 1);
        true
    }

    /// Open the comparison with an explicit hotel set and room preset.
    pub fn open_compare_with(&mut self, hotels: Vec<Hotel>, quantity: u32, adults_per_room: u8) {
        self.compare.open(
            hotels,
            CompareDefaults {
                check_in: self.stay_check_in,
                check_out: self.stay_check_out,
                quantity,
                adults_per_room,
            },
        );
        self.page = Page::Compare;
    }

    /// Detail-page shortcut: compare just this hotel with ten rooms.
    pub fn group_booking(&mut self, hotel_id: u32) -> bool {
        let hotel = match self.catalog.by_id(hotel_id) {
            Some(h) => h.clone(),
            None => return false,
        };
        self.open_compare_with(vec![hotel], GROUP_BOOKING_QUANTITY, 1);
        true
    }

    /* ── Compare tray ── */

    /// Add/remove a hotel from the tray, with the matching toast.
    pub fn toggle_compare(&mut self, hotel_id: u32) -> Option<ToggleOutcome> {
        let hotel = self.catalog.by_id(hotel_id)?.clone();
        let outcome = self.compare.toggle_hotel(&hotel);
        let notice = match outcome {
            ToggleOutcome::Added => Notice {
                text: format!("{} added to compare", hotel.name),
                kind: NoticeKind::Success,
            },
            ToggleOutcome::Removed => Notice {
                text: format!("{} removed from compare", hotel.name),
                kind: NoticeKind::Info,
            },
            ToggleOutcome::Full => Notice {
                text: "Compare list is full (max 3 hotels)".into(),
                kind: NoticeKind::Warning,
            },
        };
        self.notices.push(notice);
        Some(outcome)
    }

    /// Remove a hotel from the open comparison; navigates back to the map
    /// when the last one goes.
    pub fn remove_compare_hotel(&mut self, hotel_id: u32) -> bool {
        let removed = self.compare.remove_hotel(hotel_id);
        if removed && self.compare.is_empty() && self.page == Page::Compare {
            self.page = Page::Map;
        }
        removed
    }

    /// A column click while the replace interaction is armed swaps that
    /// hotel; otherwise it is ignored here (plain selection is the
    /// presentation layer's business).
    pub fn click_compare_column(&mut self, hotel_id: u32) -> Option<Hotel> {
        if self.compare.replace_mode() != ReplaceMode::AwaitingTarget {
            return None;
        }
        self.compare.replace_hotel(hotel_id)
    }

    /// Column badge for the n-th compared column.
    pub fn tier_label(column: usize) -> &'static str {
        TIER_LABELS[column.min(TIER_LABELS.len() - 1)]
    }

    /* ── Assistant plumbing ── */

    pub fn assistant_select(&mut self, option: StayOption) {
        self.assistant.select_option(option);
    }

    pub fn assistant_submit_budget(&mut self, input: &str) {
        let effects = self.assistant.submit_budget(input);
        self.process_effects(effects);
    }

    pub fn assistant_submit_group_size(&mut self, input: &str) {
        let effects = self.assistant.submit_group_size(input);
        self.process_effects(effects);
    }

    pub fn assistant_follow_up(&mut self, preference: GroupPreference) {
        let effects = self.assistant.select_follow_up(preference);
        self.process_effects(effects);
    }

    pub fn assistant_increase_budget(&mut self) {
        let effects = self.assistant.increase_budget();
        self.process_effects(effects);
    }

    pub fn assistant_clear(&mut self) {
        let effects = self.assistant.clear();
        self.process_effects(effects);
    }

    /// External "Group booking" entry point from the search bar.
    pub fn trigger_group_flow(&mut self) {
        self.assistant.trigger_group();
    }

    fn process_effects(&mut self, effects: Vec<AssistantEffect>) {
        for effect in effects {
            match effect {
                AssistantEffect::ApplyBudgetFilter { max_price } => {
                    self.search.apply_budget_ceiling(max_price);
                }
                AssistantEffect::ClearFilters => {
                    self.search.clear_filters();
                }
                AssistantEffect::OpenGroupCompare {
                    preference,
                    rooms,
                    adults_per_room,
                    after_ms,
                } => {
                    self.timers.schedule(
                        after_ms,
                        WidgetTask::BeginGroupCompare {
                            preference,
                            rooms,
                            adults_per_room,
                        },
                    );
                }
            }
        }
    }

    /// Advance the widget clock. The presentation layer calls this from its
    /// frame loop; tests call it directly with virtual time.
    pub fn tick(&mut self, delta_ms: u64) {
        for task in self.timers.advance(delta_ms) {
            match task {
                WidgetTask::BeginGroupCompare {
                    preference,
                    rooms,
                    adults_per_room,
                } => {
                    self.group_loading = true;
                    self.timers.schedule(
                        GROUP_LOADING_MS,
                        WidgetTask::FinishGroupCompare {
                            preference,
                            rooms,
                            adults_per_room,
                        },
                    );
                }
                WidgetTask::FinishGroupCompare {
                    preference,
                    rooms,
                    adults_per_room,
                } => {
                    // The trigger may have gone stale (filters cleared and
                    // flow reset) while the timer was pending.
                    if !self.group_loading {
                        continue;
                    }
                    self.group_loading = false;
                    let picks = self.search.rank_for_preference(preference);
                    if picks.len() < 3 {
                        continue;
                    }
                    self.open_compare_with(picks, rooms, adults_per_room);
                }
            }
        }
    }

    /* ── Checkout, export & share ── */

    pub fn checkout_mode(&self) -> CheckoutMode {
        if self.compare.grand_totals().rooms <= DIRECT_BOOKING_MAX_ROOMS {
            CheckoutMode::BookRooms
        } else {
            CheckoutMode::RequestQuote
        }
    }

    /// "Pay now" / "Pay later" both end the flow without charging anything.
    pub fn complete_checkout(&mut self, form: &BookingForm) -> bool {
        if !form.is_complete() {
            return false;
        }
        self.page = Page::Map;
        true
    }

    pub fn build_quote(&self) -> Result<QuoteDocument, Box<dyn std::error::Error>> {
        ExportService::build_quote(&self.compare, Utc::now().date_naive())
    }

    /// Export the current quote to a file, surfacing success or failure as
    /// a notice either way.
    pub fn export_quote(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let result = self
            .build_quote()
            .and_then(|doc| ExportService::save_to_file(&doc, path));
        match &result {
            Ok(()) => self.notices.push(Notice {
                text: "Quote saved".into(),
                kind: NoticeKind::Success,
            }),
            Err(e) => self.notices.push(Notice {
                text: format!("Failed to generate quote: {}", e),
                kind: NoticeKind::Warning,
            }),
        }
        result
    }

    pub fn share_link(&self) -> String {
        ShareService::quote_link(&self.compare.hotels(), Utc::now().timestamp_millis())
    }

    pub fn share_quote(&mut self, recipient: &str) -> Option<ShareReceipt> {
        let link = self.share_link();
        let receipt = ShareService::send_quote(recipient, &link);
        if let Some(r) = &receipt {
            self.notices.push(Notice {
                text: format!("Quote sent to {}", r.recipient),
                kind: NoticeKind::Success,
            });
        }
        receipt
    }

    /// Drain pending toasts for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Trend banner under the comparison: average expected increase across
    /// the compared hotels plus the event countdown.
    pub fn price_trend_notice(&self, today: NaiveDate) -> Option<String> {
        if self.compare.is_empty() {
            return None;
        }
        let hotels: Vec<Hotel> = self.compare.hotels().into_iter().cloned().collect();
        let pct = UrgencyService::average_price_increase(&hotels);
        let days = UrgencyService::days_until_event(today);
        Some(format!(
            "Based on demand trends, prices for these hotels are expected to increase by {}% \
             in the next 48 hours. {} is in {} days — book now to lock in current rates.",
            pct,
            data::EVENT_NAME,
            days
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> BookingWidget {
        BookingWidget::new().expect("embedded catalog loads")
    }

    #[test]
    fn starts_on_the_map_with_defaults() {
        let w = widget();
        assert_eq!(w.page(), Page::Map);
        assert!(w.compare.is_empty());
        assert_eq!(w.search.filters.active_count(), 0);
    }

    #[test]
    fn detail_navigation_round_trip() {
        let mut w = widget();
        assert!(w.open_detail(3));
        assert_eq!(w.page(), Page::Detail);
        assert_eq!(w.selected_hotel().unwrap().id, 3);
        w.go_back();
        assert_eq!(w.page(), Page::Map);
        assert!(w.selected_hotel().is_none());
    }

    #[test]
    fn back_returns_to_populated_compare() {
        let mut w = widget();
        w.toggle_compare(1);
        assert!(w.open_compare());
        assert!(w.open_detail(5));
        w.go_back();
        assert_eq!(w.page(), Page::Compare);
    }

    #[test]
    fn tray_toggle_produces_notices() {
        let mut w = widget();
        w.toggle_compare(1);
        w.toggle_compare(2);
        w.toggle_compare(3);
        assert_eq!(w.toggle_compare(4), Some(ToggleOutcome::Full));
        let notices = w.take_notices();
        assert_eq!(notices.len(), 4);
        assert_eq!(notices[3].kind, NoticeKind::Warning);
        assert!(w.take_notices().is_empty());
    }

    #[test]
    fn removing_last_compared_hotel_leaves_the_view() {
        let mut w = widget();
        w.toggle_compare(1);
        w.open_compare();
        assert_eq!(w.page(), Page::Compare);
        assert!(w.remove_compare_hotel(1));
        assert_eq!(w.page(), Page::Map);
    }

    #[test]
    fn group_booking_presets_ten_rooms() {
        let mut w = widget();
        assert!(w.group_booking(2));
        assert_eq!(w.page(), Page::Compare);
        let entry = &w.compare.entries()[0];
        assert_eq!(entry.hotel.id, 2);
        assert_eq!(entry.configs[0].quantity, 10);
    }

    #[test]
    fn stale_group_timer_is_dropped() {
        let mut w = widget();
        w.assistant_select(StayOption::FamilyFriends);
        w.assistant_submit_group_size("4");
        // Fire the hand-off, then pretend the loading state was reset
        // before the reveal timer lands.
        w.tick(1500);
        assert!(w.is_group_loading());
        w.group_loading = false;
        w.tick(GROUP_LOADING_MS);
        assert_eq!(w.page(), Page::Map);
    }

    #[test]
    fn checkout_mode_switches_on_room_count() {
        let mut w = widget();
        w.toggle_compare(1);
        w.open_compare();
        assert_eq!(w.checkout_mode(), CheckoutMode::BookRooms);
        let id = w.compare.entries()[0].configs[0].id;
        w.compare.update_configuration(
            1,
            id,
            crate::models::config::ConfigPatch::quantity(11),
        );
        assert_eq!(w.checkout_mode(), CheckoutMode::RequestQuote);
    }

    #[test]
    fn incomplete_booking_form_is_rejected() {
        let mut w = widget();
        w.toggle_compare(1);
        w.open_compare();
        let mut form = BookingForm::default();
        assert!(!w.complete_checkout(&form));
        assert_eq!(w.page(), Page::Compare);

        form.first_name = "Ada".into();
        form.last_name = "Smith".into();
        form.email = "ada@example.com".into();
        form.card_number = "4242 4242 4242 4242".into();
        form.expiry = "09/27".into();
        form.cvv = "123".into();
        assert!(w.complete_checkout(&form));
        assert_eq!(w.page(), Page::Map);
    }

    #[test]
    fn stay_dates_must_be_ordered() {
        let mut w = widget();
        let d1 = NaiveDate::from_ymd_opt(2027, 9, 8).unwrap();
        assert!(!w.set_stay_dates(d1, d1));
        let d2 = NaiveDate::from_ymd_opt(2027, 9, 11).unwrap();
        assert!(w.set_stay_dates(d1, d2));
        w.toggle_compare(1);
        w.open_compare();
        assert_eq!(w.compare.entries()[0].configs[0].check_in, d1);
    }

    #[test]
    fn price_trend_notice_needs_a_comparison() {
        let mut w = widget();
        let today = NaiveDate::from_ymd_opt(2027, 8, 8).unwrap();
        assert!(w.price_trend_notice(today).is_none());

        w.toggle_compare(1);
        let text = w.price_trend_notice(today).unwrap();
        assert!(text.contains("DSEI UK 2027 is in 30 days"));
        assert!(text.contains("expected to increase"));
    }

    #[test]
    fn tier_labels_clamp_to_premium() {
        assert_eq!(BookingWidget::tier_label(0), "Budget option");
        assert_eq!(BookingWidget::tier_label(2), "Premium option");
        assert_eq!(BookingWidget::tier_label(9), "Premium option");
    }
}
