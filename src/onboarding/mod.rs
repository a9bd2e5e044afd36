// src/onboarding/mod.rs
// The 4-step onboarding wizard. Steps advance linearly; the only backward
// path is the global back button handled by the state machine.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::llm::ContentAdapter;
use crate::types::UserProfile;

pub const MIN_WEEKS: u8 = 1;
pub const MAX_WEEKS: u8 = 24;
pub const DEFAULT_WEEKS: u8 = 4;

/// Display name used when the teen leaves the name field blank.
const DEFAULT_NAME: &str = "小太阳";

/// Fixed sunshine target that unlocks the charity action.
const SUNSHINE_TARGET: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    /// Collect the display name (required to advance).
    Name,
    /// Optional free-text narrative of what happened.
    Story,
    /// Target weeks plus the optional offline-event code.
    Goal,
    /// Display the generated healing letter.
    Letter,
}

/// Outcome of submitting the goal step.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalOutcome {
    /// A letter was generated; the wizard moved to the letter step.
    LetterReady,
    /// No code (or letter generation failed): the wizard finished directly.
    Finished(UserProfile),
}

pub struct OnboardingFlow {
    step: OnboardingStep,
    name: String,
    experience: String,
    weeks: u8,
    offline_code: String,
    healing_letter: Option<String>,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::Name,
            name: String::new(),
            experience: String::new(),
            weeks: DEFAULT_WEEKS,
            offline_code: String::new(),
            healing_letter: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn healing_letter(&self) -> Option<&str> {
        self.healing_letter.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_experience(&mut self, experience: &str) {
        self.experience = experience.to_string();
    }

    /// Slider value, clamped to the 1–24 week range.
    pub fn set_weeks(&mut self, weeks: u8) {
        self.weeks = weeks.clamp(MIN_WEEKS, MAX_WEEKS);
    }

    pub fn set_offline_code(&mut self, code: &str) {
        self.offline_code = code.to_string();
    }

    /// The name gate on step 1.
    pub fn can_advance(&self) -> bool {
        match self.step {
            OnboardingStep::Name => !self.name.trim().is_empty(),
            OnboardingStep::Story => true,
            // Goal and Letter advance through submit_goal/finish instead.
            OnboardingStep::Goal | OnboardingStep::Letter => false,
        }
    }

    /// Advance one step (steps 1 and 2 only). Returns false when gated.
    pub fn advance(&mut self) -> bool {
        match self.step {
            OnboardingStep::Name if self.can_advance() => {
                self.step = OnboardingStep::Story;
                true
            }
            OnboardingStep::Story => {
                self.step = OnboardingStep::Goal;
                true
            }
            _ => false,
        }
    }

    /// Submit the goal step. A non-empty offline code requests a healing
    /// letter; if generation fails the wizard finishes as if no code were
    /// given rather than blocking the journey. Returns `None` (and leaves the
    /// wizard untouched) when called on any other step.
    pub async fn submit_goal(&mut self, adapter: &ContentAdapter) -> Option<GoalOutcome> {
        if self.step != OnboardingStep::Goal {
            warn!("submit_goal refused outside the goal step");
            return None;
        }

        if self.offline_code.trim().is_empty() {
            return Some(GoalOutcome::Finished(self.finish(Utc::now())));
        }

        match adapter
            .try_healing_letter(self.display_name(), &self.experience)
            .await
        {
            Ok(letter) => {
                self.healing_letter = Some(letter);
                self.step = OnboardingStep::Letter;
                Some(GoalOutcome::LetterReady)
            }
            Err(e) => {
                warn!("Healing letter unavailable, finishing without one: {}", e);
                Some(GoalOutcome::Finished(self.finish(Utc::now())))
            }
        }
    }

    /// Commit from the letter step.
    pub fn confirm_letter(&self) -> UserProfile {
        self.finish(Utc::now())
    }

    /// Build the final profile. Deterministic for a given `now`.
    pub fn finish(&self, now: DateTime<Utc>) -> UserProfile {
        info!("Onboarding finished for {}", self.display_name());
        UserProfile {
            name: self.display_name().to_string(),
            age: 15,
            bullying_experience: self.experience.clone(),
            target_return_date: now + Duration::days(i64::from(self.weeks) * 7),
            sunshine_points: 0,
            sunshine_target: SUNSHINE_TARGET,
            supporter_count: 0,
            received_messages: Vec::new(),
            offline_code: Some(self.offline_code.clone()).filter(|c| !c.trim().is_empty()),
            healing_letter: self.healing_letter.clone(),
        }
    }

    fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_NAME
        } else {
            trimmed
        }
    }
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new()
    }
}
