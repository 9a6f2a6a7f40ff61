mod common;

use eventstay::services::assistant_service::{AssistantState, StayOption};
use eventstay::services::search_service::GroupPreference;
use eventstay::widget::{BookingWidget, Page, GROUP_LOADING_MS};

use common::init_logging;

fn widget() -> BookingWidget {
    init_logging();
    BookingWidget::new().expect("embedded catalog loads")
}

#[test]
fn budget_flow_applies_a_price_ceiling() {
    let mut w = widget();
    w.assistant_select(StayOption::SingleRoom);
    assert_eq!(w.assistant.state(), AssistantState::AskBudget);

    w.assistant_submit_budget("£120");
    assert_eq!(w.search.filters.price_max, Some(120));
    assert!(w.search.visible().iter().all(|h| h.price <= 120));
    assert_eq!(w.search.visible().len(), 5);

    w.assistant_increase_budget();
    assert_eq!(w.search.filters.price_max, Some(132));
    assert_eq!(w.search.visible().len(), 6);
}

#[test]
fn group_flow_opens_compare_with_three_budget_picks() {
    let mut w = widget();
    w.assistant_select(StayOption::Group);
    w.assistant_submit_group_size("5");
    assert_eq!(w.assistant.state(), AssistantState::GroupFollowUp);

    w.assistant_follow_up(GroupPreference::BudgetOption);
    assert_eq!(w.assistant.state(), AssistantState::Done);
    assert_eq!(w.page(), Page::Map, "hand-off waits for the reveal timers");

    // Farewell delay, then the loading shim.
    w.tick(1499);
    assert!(!w.is_group_loading());
    w.tick(1);
    assert!(w.is_group_loading());
    w.tick(GROUP_LOADING_MS);

    assert_eq!(w.page(), Page::Compare);
    assert!(!w.is_group_loading());

    let prices: Vec<u32> = w.compare.hotels().iter().map(|h| h.price).collect();
    assert_eq!(prices, vec![69, 89, 105], "three cheapest, ascending");
    for entry in w.compare.entries() {
        assert_eq!(entry.configs.len(), 1);
        assert_eq!(entry.configs[0].quantity, 5);
        assert_eq!(entry.configs[0].adults, 1);
    }
}

#[test]
fn family_flow_allocates_rooms_and_ranks_by_recommendation() {
    let mut w = widget();
    w.assistant_select(StayOption::FamilyFriends);
    w.assistant_submit_group_size("5 people");

    w.tick(1500);
    w.tick(GROUP_LOADING_MS);

    assert_eq!(w.page(), Page::Compare);
    let mut ids: Vec<u32> = w.compare.hotels().iter().map(|h| h.id).collect();
    ids.sort_unstable();
    // Rating descending, venue distance breaking the 4.6 tie.
    assert_eq!(ids, vec![14, 16, 19]);
    for entry in w.compare.entries() {
        assert_eq!(entry.configs[0].quantity, 3, "ceil(5 people / 2)");
        assert_eq!(entry.configs[0].adults, 2);
    }
}

#[test]
fn invalid_size_input_stalls_the_dialogue() {
    let mut w = widget();
    w.assistant_select(StayOption::Group);
    w.assistant_submit_group_size("a few");
    assert_eq!(w.assistant.state(), AssistantState::AskGroupSize);
    w.tick(10_000);
    assert_eq!(w.page(), Page::Map);
}

#[test]
fn clear_filters_resets_assistant_and_search() {
    let mut w = widget();
    w.assistant_select(StayOption::DoubleRoom);
    w.assistant_submit_budget("200");
    assert_eq!(w.search.filters.active_count(), 1);

    w.assistant_clear();
    assert_eq!(w.assistant.state(), AssistantState::Initial);
    assert_eq!(w.search.filters.active_count(), 0);
}

#[test]
fn external_group_trigger_skips_the_opening_question() {
    let mut w = widget();
    w.trigger_group_flow();
    assert_eq!(w.assistant.state(), AssistantState::AskGroupSize);
    assert_eq!(w.assistant.selected(), Some(StayOption::Group));
}
