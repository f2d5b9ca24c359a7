/// One step of the product tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourStep {
    pub id: &'static str,
    /// Selector of the element the step highlights, if any
    pub target: Option<&'static str>,
}

pub const MENTOR_TOUR_STEPS: [TourStep; 5] = [
    TourStep {
        id: "welcome",
        target: None,
    },
    TourStep {
        id: "create-journey",
        target: Some("[data-tour=create-journey]"),
    },
    TourStep {
        id: "journey-days",
        target: Some("[data-tour=journey-days]"),
    },
    TourStep {
        id: "participants",
        target: Some("[data-tour=participants]"),
    },
    TourStep {
        id: "earnings",
        target: Some("[data-tour=earnings]"),
    },
];

/// One single-choice question asked before a participant's first chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceStep {
    pub id: &'static str,
    pub options: &'static [&'static str],
}

impl PreferenceStep {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.contains(&option)
    }
}

pub const PARTICIPANT_PREFERENCE_STEPS: [PreferenceStep; 2] = [
    PreferenceStep {
        id: "tone",
        options: &["gentle", "direct", "playful"],
    },
    PreferenceStep {
        id: "pace",
        options: &["short", "balanced", "deep"],
    },
];
