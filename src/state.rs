// src/state.rs
// The view/role state machine. Transitions are a pure function of
// (role, view, action) so the navigation rules are testable without any
// rendering or I/O; SessionState applies the in-memory side of each effect.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::profile::demo_profile;
use crate::types::{AppView, DailyLog, DiaryEntry, UserProfile, UserRole};

/// Discrete user actions the machine responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectRole(UserRole),
    FinishOnboarding,
    Navigate(AppView),
    StartFerry,
    Back,
    Reset,
}

/// Side effect a transition asks its caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Seed the demo profile (fundraiser entry with no teen profile saved).
    SeedDemoProfile,
    /// Drop the in-memory profile; the persisted slot stays intact.
    DropProfile,
    /// Full reset: in-memory state and the persisted slot.
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub role: Option<UserRole>,
    pub view: AppView,
    pub effect: Effect,
}

impl Transition {
    fn to(role: Option<UserRole>, view: AppView) -> Self {
        Self {
            role,
            view,
            effect: Effect::None,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }
}

/// The transition table. Unknown (state, action) pairs are no-ops; the
/// machine never reaches an unrenderable state.
pub fn transition(
    role: Option<UserRole>,
    view: AppView,
    has_profile: bool,
    action: Action,
) -> Transition {
    use AppView::*;
    use UserRole::*;

    match (role, view, action) {
        // ── Role selection, only from the none-state
        (None, _, Action::SelectRole(Teen)) => {
            let target = if has_profile { Dashboard } else { Onboarding };
            Transition::to(Some(Teen), target)
        }
        (None, _, Action::SelectRole(Fundraiser)) => {
            let t = Transition::to(Some(Fundraiser), FundraiserIntro);
            if has_profile {
                t
            } else {
                t.with_effect(Effect::SeedDemoProfile)
            }
        }

        // ── Onboarding completion promotes to the teen dashboard
        (None | Some(Teen), Onboarding, Action::FinishOnboarding) => {
            Transition::to(Some(Teen), Dashboard)
        }

        // ── Free navigation among the teen views
        (Some(Teen), v, Action::Navigate(target))
            if v.is_teen_view() && target.is_teen_view() =>
        {
            Transition::to(Some(Teen), target)
        }

        // ── Fundraiser: explicit ferry-start enters the dashboard
        (Some(Fundraiser), FundraiserIntro, Action::StartFerry) => {
            Transition::to(Some(Fundraiser), FundraiserDashboard)
        }

        // ── Context-sensitive back
        (Some(Fundraiser), FundraiserDashboard, Action::Back) => {
            Transition::to(Some(Fundraiser), FundraiserIntro)
        }
        (Some(Fundraiser), FundraiserIntro, Action::Back) => {
            Transition::to(None, Onboarding).with_effect(Effect::DropProfile)
        }
        (Some(Fundraiser), _, Action::Back) => {
            Transition::to(Some(Fundraiser), FundraiserDashboard)
        }
        (Some(Teen), Dashboard, Action::Back) => Transition::to(None, Onboarding),
        (Some(Teen), v, Action::Back) if v.is_teen_view() => {
            Transition::to(Some(Teen), Dashboard)
        }

        // ── Reset is available everywhere
        (_, _, Action::Reset) => Transition::to(None, Onboarding).with_effect(Effect::ClearAll),

        (role, view, _) => Transition::to(role, view),
    }
}

/// Top-level mutable session state, threaded through the session operations.
/// Mutations go through `apply`; no direct field writes from callers.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub role: Option<UserRole>,
    pub view: AppView,
    pub profile: Option<UserProfile>,
    pub diary: Vec<DiaryEntry>,
    pub today_log: Option<DailyLog>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            role: None,
            view: AppView::Onboarding,
            profile: None,
            diary: Vec::new(),
            today_log: None,
        }
    }

    /// Run one action through the transition table and apply the in-memory
    /// side of its effect. Returns the effect so the caller can handle the
    /// persistence side (slot clearing).
    pub fn apply(&mut self, action: Action, now: DateTime<Utc>) -> Effect {
        let t = transition(self.role, self.view, self.profile.is_some(), action);

        if t.role == self.role && t.view == self.view && t.effect == Effect::None {
            warn!(
                "Ignored action {:?} in state ({:?}, {:?})",
                action, self.role, self.view
            );
        }

        self.role = t.role;
        self.view = t.view;

        match t.effect {
            Effect::SeedDemoProfile => {
                self.profile = Some(demo_profile(now));
            }
            Effect::DropProfile => {
                self.profile = None;
            }
            Effect::ClearAll => {
                self.profile = None;
                self.diary.clear();
                self.today_log = None;
            }
            Effect::None => {}
        }

        t.effect
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
