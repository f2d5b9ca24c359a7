use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    app_error::{AppError, AppResult},
    application::wizard::{Advance, StepCursor},
    domain::entities::steps::PreferenceStep,
};

/// Answers keyed by step id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceAnswers(pub BTreeMap<String, String>);

impl PreferenceAnswers {
    pub fn get(&self, step_id: &str) -> Option<&str> {
        self.0.get(step_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureProgress {
    /// Current step has no selection yet
    Blocked,
    Moved(usize),
    Completed,
}

type CompletionCallback = Box<dyn FnOnce(PreferenceAnswers) + Send>;

/// Pre-chat questions for a participant.
///
/// Lives only for the current session; answers go to the completion callback
/// and nowhere else.
pub struct PreferenceCapture {
    steps: Vec<PreferenceStep>,
    cursor: StepCursor,
    answers: PreferenceAnswers,
    on_complete: Option<CompletionCallback>,
}

impl PreferenceCapture {
    pub fn new(
        steps: Vec<PreferenceStep>,
        on_complete: impl FnOnce(PreferenceAnswers) + Send + 'static,
    ) -> AppResult<Self> {
        let cursor = StepCursor::new(steps.len())
            .ok_or_else(|| AppError::InvalidInput("preference capture needs a step".into()))?;

        Ok(Self {
            steps,
            cursor,
            answers: PreferenceAnswers::default(),
            on_complete: Some(Box::new(on_complete)),
        })
    }

    pub fn current_step(&self) -> &PreferenceStep {
        &self.steps[self.cursor.index()]
    }

    pub fn step_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn selection(&self) -> Option<&str> {
        self.answers.get(self.current_step().id)
    }

    pub fn is_completed(&self) -> bool {
        self.on_complete.is_none()
    }

    /// Choose an option on the current step, replacing any earlier choice.
    pub fn select(&mut self, option: &str) -> AppResult<()> {
        if self.is_completed() {
            return Err(AppError::InvalidInput("preferences already submitted".into()));
        }
        let step = *self.current_step();
        if !step.has_option(option) {
            return Err(AppError::InvalidInput(format!(
                "{} is not an option for {}",
                option, step.id
            )));
        }
        self.answers.0.insert(step.id.to_string(), option.to_string());
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        !self.is_completed() && self.selection().is_some()
    }

    /// Move on; from the last step this hands all answers to the callback.
    pub fn next(&mut self) -> CaptureProgress {
        if self.is_completed() {
            return CaptureProgress::Completed;
        }
        if !self.can_advance() {
            return CaptureProgress::Blocked;
        }
        match self.cursor.advance() {
            Advance::Moved(index) => CaptureProgress::Moved(index),
            Advance::Finished => {
                if let Some(callback) = self.on_complete.take() {
                    debug!(answers = ?self.answers, "preferences captured");
                    callback(self.answers.clone());
                }
                CaptureProgress::Completed
            }
        }
    }

    pub fn previous(&mut self) -> usize {
        if self.is_completed() {
            return self.cursor.index();
        }
        self.cursor.retreat()
    }
}
