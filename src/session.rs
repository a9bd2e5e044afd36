// src/session.rs
// Top-level session orchestration: wires the profile store, content adapter,
// state machine and in-flow wizards together. This is the surface the
// presentation layer drives; every mutation routes through a named operation
// here.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::gamification::{FerryOutcome, FundraiserFlow};
use crate::llm::{ContentAdapter, GeminiClient};
use crate::onboarding::{GoalOutcome, OnboardingFlow};
use crate::profile::{add_diary_entry, ProfileStore};
use crate::state::{Action, SessionState};
use crate::types::{
    AdaptationResult, AppView, DailyLog, DiaryEntry, FairyTale, Mood, ReframeResult, UserProfile,
    UserRole,
};
use std::sync::Arc;

pub struct Session {
    store: ProfileStore,
    adapter: ContentAdapter,
    state: SessionState,
    onboarding: OnboardingFlow,
    fundraiser: FundraiserFlow,
}

impl Session {
    pub fn new(store: ProfileStore, adapter: ContentAdapter) -> Self {
        Self {
            store,
            adapter,
            state: SessionState::new(),
            onboarding: OnboardingFlow::new(),
            fundraiser: FundraiserFlow::new(),
        }
    }

    /// Session against the configured provider and profile slot.
    pub fn from_config() -> Result<Self> {
        let client = Arc::new(GeminiClient::new()?);
        Ok(Self::new(
            ProfileStore::from_config(),
            ContentAdapter::new(client),
        ))
    }

    /// Restore a saved profile, if any. A restored profile lands the session
    /// straight on the teen dashboard.
    pub fn startup(&mut self) {
        if let Some(profile) = self.store.load() {
            self.state.profile = Some(profile);
            self.state.role = Some(UserRole::Teen);
            self.state.view = AppView::Dashboard;
        }
    }

    // ── State machine surface ───────────────────────────────────────────

    pub fn role(&self) -> Option<UserRole> {
        self.state.role
    }

    pub fn view(&self) -> AppView {
        self.state.view
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.state.profile.as_ref()
    }

    pub fn diary(&self) -> &[DiaryEntry] {
        &self.state.diary
    }

    pub fn today_log(&self) -> Option<&DailyLog> {
        self.state.today_log.as_ref()
    }

    pub fn onboarding(&self) -> &OnboardingFlow {
        &self.onboarding
    }

    pub fn onboarding_mut(&mut self) -> &mut OnboardingFlow {
        &mut self.onboarding
    }

    pub fn fundraiser(&self) -> &FundraiserFlow {
        &self.fundraiser
    }

    pub fn select_role(&mut self, role: UserRole) {
        self.state.apply(Action::SelectRole(role), Utc::now());
    }

    pub fn navigate(&mut self, view: AppView) {
        self.state.apply(Action::Navigate(view), Utc::now());
    }

    pub fn start_ferry_flow(&mut self) {
        self.state.apply(Action::StartFerry, Utc::now());
    }

    /// Global back button. Logout keeps the persisted slot intact.
    pub fn back(&mut self) {
        self.state.apply(Action::Back, Utc::now());
    }

    /// Full demo reset: persisted slot erased, session state reinitialized.
    /// Available from every view.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.state.apply(Action::Reset, Utc::now());
        self.onboarding = OnboardingFlow::new();
        self.fundraiser = FundraiserFlow::new();
        info!("Session reset");
        Ok(())
    }

    // ── Onboarding ──────────────────────────────────────────────────────

    /// Submit the goal step; when the wizard finishes directly, the profile
    /// is committed and the session moves to the dashboard. Errors if the
    /// wizard is not on the goal step; nothing is committed in that case.
    pub async fn submit_onboarding_goal(&mut self) -> Result<GoalOutcome> {
        let Some(outcome) = self.onboarding.submit_goal(&self.adapter).await else {
            anyhow::bail!("goal submitted outside the goal step");
        };
        if let GoalOutcome::Finished(profile) = &outcome {
            self.complete_onboarding(profile.clone())?;
        }
        Ok(outcome)
    }

    /// Commit from the letter step.
    pub async fn confirm_onboarding_letter(&mut self) -> Result<UserProfile> {
        let profile = self.onboarding.confirm_letter();
        self.complete_onboarding(profile.clone())?;
        Ok(profile)
    }

    fn complete_onboarding(&mut self, profile: UserProfile) -> Result<()> {
        self.store.save(&profile)?;
        self.state.profile = Some(profile);
        self.state.apply(Action::FinishOnboarding, Utc::now());
        self.onboarding = OnboardingFlow::new();
        Ok(())
    }

    // ── Content operations ──────────────────────────────────────────────

    /// Reframe a hurtful sentence. Returns `None` for blank input; the
    /// result itself is always renderable.
    pub async fn reframe(&mut self, input: &str) -> Option<ReframeResult> {
        if input.trim().is_empty() {
            return None;
        }
        Some(self.adapter.reframe_language(input).await)
    }

    /// Advice for a feared scenario; same blank-input guard as `reframe`.
    pub async fn adaptation(&mut self, scenario: &str) -> Option<AdaptationResult> {
        if scenario.trim().is_empty() {
            return None;
        }
        Some(self.adapter.adaptation_advice(scenario).await)
    }

    /// Weave the selected diary entries into a story. `None` when nothing is
    /// selected.
    pub async fn weave_selected(&mut self, selected_ids: &[String]) -> Option<FairyTale> {
        let contents: Vec<String> = self
            .state
            .diary
            .iter()
            .filter(|e| selected_ids.contains(&e.id))
            .map(|e| e.content.clone())
            .collect();

        if contents.is_empty() {
            warn!("Story weaving requested with no entries selected");
            return None;
        }
        Some(self.adapter.weave_story(&contents).await)
    }

    // ── Diary ───────────────────────────────────────────────────────────

    pub fn write_diary_entry(&mut self, content: &str) -> bool {
        if content.trim().is_empty() {
            return false;
        }
        self.state.diary = add_diary_entry(&self.state.diary, content, None, Utc::now());
        true
    }

    pub fn save_reframe_to_diary(&mut self, result: &ReframeResult) {
        let content = format!(
            "[语言重构]\n原话：{}\n解读：{}\n行动：{}",
            result.original_text, result.warm_explanation, result.solution
        );
        self.state.diary = add_diary_entry(
            &self.state.diary,
            &content,
            result.image_url.as_deref(),
            Utc::now(),
        );
    }

    pub fn save_adaptation_to_diary(&mut self, result: &AdaptationResult) {
        let content = format!(
            "[重返向导]\n我的担心：{}\n向导建议：{}\n小小一步：{}",
            result.scenario, result.warm_advice, result.action_step
        );
        self.state.diary = add_diary_entry(&self.state.diary, &content, None, Utc::now());
    }

    /// Daily mood check-in on the dashboard; once per session day.
    pub fn check_in(&mut self, mood: Mood) -> bool {
        if self.state.today_log.is_some() {
            return false;
        }
        self.state.today_log = Some(DailyLog {
            date: Utc::now(),
            mood,
            action: "今天也很棒！".to_string(),
        });
        true
    }

    // ── Fundraiser ──────────────────────────────────────────────────────

    /// One ferry action from the fundraiser dashboard. The updated profile is
    /// adopted and persisted; the outcome says which overlay is showing.
    pub async fn ferry(&mut self, message: Option<&str>) -> Result<FerryOutcome> {
        if self.state.role != Some(UserRole::Fundraiser)
            || self.state.view != AppView::FundraiserDashboard
        {
            anyhow::bail!("ferry action outside the fundraiser dashboard");
        }
        let Some(profile) = self.state.profile.as_ref() else {
            anyhow::bail!("no profile to ferry for");
        };

        let message = message.map(str::trim).filter(|m| !m.is_empty());
        let (updated, outcome) = self
            .fundraiser
            .ferry(profile, message, &self.adapter, &self.store)
            .await?;
        self.state.profile = Some(updated);
        Ok(outcome)
    }

    pub fn revisit_celebration(&mut self) {
        self.fundraiser.revisit_celebration();
    }

    pub async fn completion_poster(&mut self) {
        self.fundraiser.completion_poster(&self.adapter).await;
    }

    pub fn dismiss_overlay(&mut self) {
        self.fundraiser.dismiss_overlay();
    }
}
