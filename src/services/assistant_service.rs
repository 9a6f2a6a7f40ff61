//! Scripted booking assistant.
//!
//! A small dialogue state machine: the user picks what they are looking
//! for, answers one follow-up (budget or group size), and the assistant
//! emits effects for the surrounding widget to act on. Timers are never
//! started here; effects carry their delay so the caller can schedule them
//! on a virtual-time queue and tests never wait.

use regex::Regex;

use crate::services::search_service::GroupPreference;

/// Pause before the group flow hands over to the comparison view, so the
/// farewell message is readable.
pub const FOLLOW_UP_DELAY_MS: u64 = 1500;

const COLLAPSED_PHRASES: [&str; 4] = [
    "OK, I'm here if you need me.",
    "I'm here to help you.",
    "Need a hand?",
    "Unsure where to begin?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantState {
    Initial,
    AskBudget,
    AskGroupSize,
    GroupFollowUp,
    Done,
}

/// First-question answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayOption {
    SingleRoom,
    DoubleRoom,
    FamilyFriends,
    Group,
}

impl StayOption {
    pub const ALL: [StayOption; 4] = [
        StayOption::SingleRoom,
        StayOption::DoubleRoom,
        StayOption::FamilyFriends,
        StayOption::Group,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StayOption::SingleRoom => "Single room",
            StayOption::DoubleRoom => "Double room",
            StayOption::FamilyFriends => "Family/Friends",
            StayOption::Group => "Group",
        }
    }
}

/// What the widget should do in response to a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEffect {
    ApplyBudgetFilter {
        max_price: u32,
    },
    ClearFilters,
    OpenGroupCompare {
        preference: GroupPreference,
        rooms: u32,
        adults_per_room: u8,
        after_ms: u64,
    },
}

pub struct AssistantService {
    state: AssistantState,
    selected: Option<StayOption>,
    submitted_budget: Option<u32>,
    /// Rooms for the Group path, people for Family/Friends.
    submitted_size: Option<u32>,
    follow_up: Option<GroupPreference>,
    custom_chips: Vec<String>,
}

impl Default for AssistantService {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantService {
    pub fn new() -> Self {
        Self {
            state: AssistantState::Initial,
            selected: None,
            submitted_budget: None,
            submitted_size: None,
            follow_up: None,
            custom_chips: Vec::new(),
        }
    }

    pub fn state(&self) -> AssistantState {
        self.state
    }

    pub fn selected(&self) -> Option<StayOption> {
        self.selected
    }

    pub fn submitted_budget(&self) -> Option<u32> {
        self.submitted_budget
    }

    /// The assistant's current bubble text.
    pub fn message(&self) -> String {
        match self.state {
            AssistantState::Initial => "Hi there! What are you looking for?".into(),
            AssistantState::AskBudget => {
                "OK, let me find the best options for you. What's your budget?".into()
            }
            AssistantState::AskGroupSize => {
                if self.selected == Some(StayOption::Group) {
                    "Great choice! How many rooms will your group need?".into()
                } else {
                    "Great choice! How many people will be in your party?".into()
                }
            }
            AssistantState::GroupFollowUp => format!(
                "Got it, {} rooms! What matters most to you?",
                self.submitted_size.unwrap_or(1)
            ),
            AssistantState::Done => match (self.selected, self.follow_up) {
                (Some(StayOption::Group), Some(preference)) => format!(
                    "Perfect! I'll find the best {} options for {} rooms. 🔍",
                    preference.label().to_lowercase(),
                    self.submitted_size.unwrap_or(1)
                ),
                (Some(StayOption::FamilyFriends), _) => format!(
                    "Lovely! I'll find the best options for your party of {}. 🔍",
                    self.submitted_size.unwrap_or(1)
                ),
                (Some(StayOption::SingleRoom), _) | (Some(StayOption::DoubleRoom), _) => {
                    format!(
                        "Here are the best {} options within your budget. 🔍",
                        self.selected
                            .map(|o| o.label().to_lowercase())
                            .unwrap_or_default()
                    )
                }
                _ => "Great choice! Let me find the best options for you. 🔍".into(),
            },
        }
    }

    /// Quick-chip labels for the current step.
    pub fn current_options(&self) -> Vec<&'static str> {
        match self.state {
            AssistantState::Initial => StayOption::ALL.iter().map(|o| o.label()).collect(),
            AssistantState::GroupFollowUp => {
                GroupPreference::ALL.iter().map(|p| p.label()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn input_placeholder(&self) -> Option<&'static str> {
        match self.state {
            AssistantState::AskBudget => Some("e.g. £200"),
            AssistantState::AskGroupSize if self.selected == Some(StayOption::Group) => {
                Some("e.g. 10 rooms")
            }
            AssistantState::AskGroupSize => Some("e.g. 6 people"),
            _ => None,
        }
    }

    /// Answer the opening question. Single/Double ask for a budget, the
    /// group-ish options ask for a size.
    pub fn select_option(&mut self, option: StayOption) {
        if self.state != AssistantState::Initial {
            return;
        }
        self.selected = Some(option);
        self.state = match option {
            StayOption::SingleRoom | StayOption::DoubleRoom => AssistantState::AskBudget,
            StayOption::FamilyFriends | StayOption::Group => AssistantState::AskGroupSize,
        };
    }

    /// Submit the budget field. Input without any digit is ignored and the
    /// dialogue stays where it is.
    pub fn submit_budget(&mut self, input: &str) -> Vec<AssistantEffect> {
        if self.state != AssistantState::AskBudget {
            return Vec::new();
        }
        let budget = match parse_number(input) {
            Some(b) => b,
            None => return Vec::new(),
        };
        self.submitted_budget = Some(budget);
        self.state = AssistantState::Done;
        vec![AssistantEffect::ApplyBudgetFilter { max_price: budget }]
    }

    /// Bump the submitted budget by 10% and re-apply the filter.
    pub fn increase_budget(&mut self) -> Vec<AssistantEffect> {
        let budget = match self.submitted_budget {
            Some(b) => b,
            None => return Vec::new(),
        };
        let raised = (budget as f64 * 1.10).round() as u32;
        self.submitted_budget = Some(raised);
        vec![AssistantEffect::ApplyBudgetFilter { max_price: raised }]
    }

    /// Submit the size field. For Group the dialogue continues with the
    /// preference question; for Family/Friends the comparison opens with
    /// two people per room.
    pub fn submit_group_size(&mut self, input: &str) -> Vec<AssistantEffect> {
        if self.state != AssistantState::AskGroupSize {
            return Vec::new();
        }
        let size = match parse_number(input) {
            Some(s) => s.max(1),
            None => return Vec::new(),
        };
        self.submitted_size = Some(size);
        match self.selected {
            Some(StayOption::Group) => {
                self.state = AssistantState::GroupFollowUp;
                Vec::new()
            }
            Some(StayOption::FamilyFriends) => {
                self.state = AssistantState::Done;
                let rooms = size.div_ceil(2);
                vec![AssistantEffect::OpenGroupCompare {
                    preference: GroupPreference::RecommendSomething,
                    rooms,
                    adults_per_room: 2,
                    after_ms: FOLLOW_UP_DELAY_MS,
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Answer the "what matters most" question.
    pub fn select_follow_up(&mut self, preference: GroupPreference) -> Vec<AssistantEffect> {
        if self.state != AssistantState::GroupFollowUp {
            return Vec::new();
        }
        self.follow_up = Some(preference);
        self.state = AssistantState::Done;
        vec![AssistantEffect::OpenGroupCompare {
            preference,
            rooms: self.submitted_size.unwrap_or(1),
            adults_per_room: 1,
            after_ms: FOLLOW_UP_DELAY_MS,
        }]
    }

    /// Reset the dialogue and ask the widget to drop every filter.
    pub fn clear(&mut self) -> Vec<AssistantEffect> {
        *self = Self::new();
        vec![AssistantEffect::ClearFilters]
    }

    /// External jump used by the "Group booking" button elsewhere in the
    /// widget: straight to the size question with Group preselected.
    pub fn trigger_group(&mut self) {
        self.selected = Some(StayOption::Group);
        self.state = AssistantState::AskGroupSize;
    }

    /// Free-text search chips, only collectable on the opening step.
    pub fn add_custom_chip(&mut self, text: &str) -> bool {
        if self.state != AssistantState::Initial {
            return false;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() || self.custom_chips.iter().any(|c| c == trimmed) {
            return false;
        }
        self.custom_chips.push(trimmed.to_string());
        true
    }

    pub fn remove_custom_chip(&mut self, text: &str) {
        self.custom_chips.retain(|c| c != text);
    }

    pub fn custom_chips(&self) -> &[String] {
        &self.custom_chips
    }

    /// Greeting shown on the collapsed pill; the pick is the one place the
    /// widget uses real randomness.
    pub fn collapsed_phrase() -> &'static str {
        let index = rand::random::<usize>() % COLLAPSED_PHRASES.len();
        COLLAPSED_PHRASES[index]
    }
}

/// Strip everything but digits and parse. "£1,200" -> 1200.
fn parse_number(input: &str) -> Option<u32> {
    let re = Regex::new(r"[^0-9]").unwrap();
    let digits = re.replace_all(input.trim(), "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_room_asks_for_budget_then_filters() {
        let mut a = AssistantService::new();
        a.select_option(StayOption::SingleRoom);
        assert_eq!(a.state(), AssistantState::AskBudget);

        // Empty and digit-free input is a no-op.
        assert!(a.submit_budget("").is_empty());
        assert!(a.submit_budget("about that much").is_empty());
        assert_eq!(a.state(), AssistantState::AskBudget);

        let effects = a.submit_budget("£200");
        assert_eq!(
            effects,
            vec![AssistantEffect::ApplyBudgetFilter { max_price: 200 }]
        );
        assert_eq!(a.state(), AssistantState::Done);
    }

    #[test]
    fn increase_budget_adds_ten_percent() {
        let mut a = AssistantService::new();
        a.select_option(StayOption::DoubleRoom);
        a.submit_budget("150");
        let effects = a.increase_budget();
        assert_eq!(
            effects,
            vec![AssistantEffect::ApplyBudgetFilter { max_price: 165 }]
        );
        assert_eq!(a.submitted_budget(), Some(165));
    }

    #[test]
    fn group_flow_reaches_follow_up() {
        let mut a = AssistantService::new();
        a.select_option(StayOption::Group);
        assert_eq!(a.state(), AssistantState::AskGroupSize);
        assert!(a.submit_group_size("5").is_empty());
        assert_eq!(a.state(), AssistantState::GroupFollowUp);

        let effects = a.select_follow_up(GroupPreference::BudgetOption);
        assert_eq!(
            effects,
            vec![AssistantEffect::OpenGroupCompare {
                preference: GroupPreference::BudgetOption,
                rooms: 5,
                adults_per_room: 1,
                after_ms: FOLLOW_UP_DELAY_MS,
            }]
        );
        assert_eq!(a.state(), AssistantState::Done);
    }

    #[test]
    fn family_flow_allocates_two_people_per_room() {
        let mut a = AssistantService::new();
        a.select_option(StayOption::FamilyFriends);
        let effects = a.submit_group_size("5 people");
        assert_eq!(
            effects,
            vec![AssistantEffect::OpenGroupCompare {
                preference: GroupPreference::RecommendSomething,
                rooms: 3,
                adults_per_room: 2,
                after_ms: FOLLOW_UP_DELAY_MS,
            }]
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut a = AssistantService::new();
        a.select_option(StayOption::Group);
        a.submit_group_size("4");
        let effects = a.clear();
        assert_eq!(effects, vec![AssistantEffect::ClearFilters]);
        assert_eq!(a.state(), AssistantState::Initial);
        assert_eq!(a.selected(), None);
        assert!(a.custom_chips().is_empty());
    }

    #[test]
    fn external_trigger_jumps_to_group_size() {
        let mut a = AssistantService::new();
        a.trigger_group();
        assert_eq!(a.state(), AssistantState::AskGroupSize);
        assert_eq!(a.selected(), Some(StayOption::Group));
        assert_eq!(a.input_placeholder(), Some("e.g. 10 rooms"));
    }

    #[test]
    fn custom_chips_only_from_initial() {
        let mut a = AssistantService::new();
        assert!(a.add_custom_chip("  near the river "));
        assert!(!a.add_custom_chip("near the river"));
        assert!(!a.add_custom_chip("   "));
        assert_eq!(a.custom_chips(), &["near the river".to_string()]);

        a.select_option(StayOption::Group);
        assert!(!a.add_custom_chip("late checkout"));

        a.remove_custom_chip("near the river");
        assert!(a.custom_chips().is_empty());
    }

    #[test]
    fn options_follow_the_step() {
        let mut a = AssistantService::new();
        assert_eq!(a.current_options().len(), 4);
        a.select_option(StayOption::Group);
        assert!(a.current_options().is_empty());
        a.submit_group_size("2");
        assert_eq!(a.current_options().len(), 5);
    }
}
