use std::sync::Arc;

use flow83_types::OnboardingState;
use tracing::{debug, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::KeyValueStore,
        wizard::{Advance, StepCursor},
    },
    domain::entities::steps::TourStep,
};

/// Storage key holding the serialized [`OnboardingState`].
pub const ONBOARDING_STORAGE_KEY: &str = "flow83_onboarding";

/// Product tour with durable progress.
///
/// Every transition is written to the store before returning, so a reload
/// mid-tour resumes on the same step. A failed write is returned as an error;
/// the in-memory transition has already happened.
pub struct OnboardingTour {
    store: Arc<dyn KeyValueStore>,
    steps: Vec<TourStep>,
    cursor: StepCursor,
    state: OnboardingState,
}

impl OnboardingTour {
    /// Load the tour, falling back to a pristine state when nothing usable is stored.
    pub fn load(store: Arc<dyn KeyValueStore>, steps: Vec<TourStep>) -> AppResult<Self> {
        let Some(cursor) = StepCursor::new(steps.len()) else {
            return Err(AppError::InvalidInput("tour needs at least one step".into()));
        };

        let state = read_state(store.as_ref());
        let cursor = StepCursor::at(cursor.len(), state.current_step).unwrap_or(cursor);

        Ok(Self {
            store,
            steps,
            cursor,
            state: OnboardingState {
                current_step: cursor.index(),
                ..state
            },
        })
    }

    pub fn state(&self) -> OnboardingState {
        self.state
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step on screen while the tour is active.
    pub fn current_step(&self) -> Option<&TourStep> {
        self.state
            .is_active
            .then(|| &self.steps[self.cursor.index()])
    }

    /// First-run users who have neither finished nor skipped the tour.
    pub fn should_auto_start(&self) -> bool {
        !self.state.has_seen_onboarding && !self.state.is_completed
    }

    pub fn start(&mut self) -> AppResult<()> {
        self.cursor.rewind();
        self.state = OnboardingState {
            is_active: true,
            current_step: 0,
            is_completed: self.state.is_completed,
            has_seen_onboarding: true,
        };
        self.persist()
    }

    /// Advance one step; on the last step this completes the tour.
    pub fn next(&mut self) -> AppResult<()> {
        if !self.state.is_active {
            return Ok(());
        }
        match self.cursor.advance() {
            Advance::Moved(index) => self.state.current_step = index,
            Advance::Finished => self.finish(),
        }
        self.persist()
    }

    pub fn previous(&mut self) -> AppResult<()> {
        if !self.state.is_active {
            return Ok(());
        }
        let before = self.state.current_step;
        self.state.current_step = self.cursor.retreat();
        if before == self.state.current_step {
            return Ok(());
        }
        self.persist()
    }

    /// Leave the tour early. Stored exactly like a finished tour.
    pub fn skip(&mut self) -> AppResult<()> {
        self.finish();
        self.persist()
    }

    /// Back to a first-run state, including "has seen".
    pub fn reset(&mut self) -> AppResult<()> {
        self.cursor.rewind();
        self.state = OnboardingState::default();
        self.persist()
    }

    fn finish(&mut self) {
        self.state.is_active = false;
        self.state.is_completed = true;
        self.state.has_seen_onboarding = true;
    }

    fn persist(&self) -> AppResult<()> {
        let json = serde_json::to_string(&self.state)?;
        self.store.set(ONBOARDING_STORAGE_KEY, &json)?;
        debug!(state = ?self.state, "onboarding state saved");
        Ok(())
    }
}

fn read_state(store: &dyn KeyValueStore) -> OnboardingState {
    let raw = match store.get(ONBOARDING_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return OnboardingState::default(),
        Err(err) => {
            warn!(error = %err, "could not read onboarding state, starting fresh");
            return OnboardingState::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "discarding corrupted onboarding state");
        OnboardingState::default()
    })
}
