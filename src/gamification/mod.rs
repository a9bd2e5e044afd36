// src/gamification/mod.rs
// Progress math, milestone feedback and the fundraiser ferry/celebration
// lifecycle.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::info;

use crate::llm::ContentAdapter;
use crate::profile::{add_sunshine, ProfileStore};
use crate::types::{PosterTheme, UserProfile};

/// Delay before the celebration overlay, so the points-increment feedback
/// renders first.
pub const CELEBRATION_DELAY_MS: u64 = 500;

const MILESTONE_75: &str = "尝试参加一次社区的兴趣小组活动，并在日记里记录下来。";
const MILESTONE_50: &str = "试着和公益机构的志愿者通一次电话，聊聊最近的心情。";
const MILESTONE_25: &str = "去附近的公园走走，拍一张你觉得好看的照片。";

/// Percent of the sunshine target reached, capped at 100.
pub fn progress_percent(points: u32, target: u32) -> f64 {
    if target == 0 {
        return 100.0;
    }
    (points as f64 / target as f64 * 100.0).min(100.0)
}

/// Suggested real-world action for the current progress band; below 25%
/// there is none, only the numeric reminder of points remaining.
pub fn milestone_action(percent: f64) -> Option<&'static str> {
    if percent >= 75.0 {
        Some(MILESTONE_75)
    } else if percent >= 50.0 {
        Some(MILESTONE_50)
    } else if percent >= 25.0 {
        Some(MILESTONE_25)
    } else {
        None
    }
}

pub fn remaining_points(profile: &UserProfile) -> u32 {
    profile.sunshine_target.saturating_sub(profile.sunshine_points)
}

/// Whether a points total at or past the target should celebrate.
pub fn crosses_target(new_points: u32, target: u32) -> bool {
    new_points >= target
}

/// Display-only supporter rank shown on the daily poster. Uniform, never
/// persisted, nothing depends on its distribution.
pub fn ferryman_rank() -> u32 {
    rand::rng().random_range(1000..9000)
}

/// Whole days until the target return date, floored at zero.
pub fn days_left(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (target - now).num_seconds().max(0);
    (secs + 86_399) / 86_400
}

/// Whole weeks until the target return date, floored at zero.
pub fn weeks_left(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let days = days_left(target, now);
    (days + 6) / 7
}

/// What a ferry action led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FerryOutcome {
    /// Target crossed; the celebration overlay is showing.
    Celebration,
    /// Normal day; the daily share poster is showing.
    DailyPoster,
}

/// Overlay state on the fundraiser dashboard. Page-level, not an AppView.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Celebration,
    Poster {
        theme: PosterTheme,
        url: String,
    },
}

/// In-flow state of the fundraiser dashboard: the current overlay and the
/// display rank.
pub struct FundraiserFlow {
    overlay: Overlay,
    rank: Option<u32>,
}

impl FundraiserFlow {
    pub fn new() -> Self {
        Self {
            overlay: Overlay::None,
            rank: None,
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// One ferry action: apply the sunshine increment, persist, then either
    /// schedule the celebration (threshold crossed) or show the daily poster.
    /// Returns the updated profile for the caller to adopt.
    pub async fn ferry(
        &mut self,
        profile: &UserProfile,
        message: Option<&str>,
        adapter: &ContentAdapter,
        store: &ProfileStore,
    ) -> Result<(UserProfile, FerryOutcome)> {
        let updated = add_sunshine(profile, message, Utc::now());
        let save_result = store.save(&updated);
        self.rank = Some(ferryman_rank());

        let outcome = if crosses_target(updated.sunshine_points, updated.sunshine_target) {
            info!(
                "Sunshine target reached: {}/{}",
                updated.sunshine_points, updated.sunshine_target
            );
            sleep(TokioDuration::from_millis(CELEBRATION_DELAY_MS)).await;
            self.overlay = Overlay::Celebration;
            FerryOutcome::Celebration
        } else {
            let url = adapter.share_poster(PosterTheme::Daily).await;
            self.overlay = Overlay::Poster {
                theme: PosterTheme::Daily,
                url,
            };
            FerryOutcome::DailyPoster
        };

        save_result?;
        Ok((updated, outcome))
    }

    /// Re-enter the celebration after first completion. Idempotent.
    pub fn revisit_celebration(&mut self) {
        self.overlay = Overlay::Celebration;
    }

    /// From the celebration, generate the completion poster overlay.
    pub async fn completion_poster(&mut self, adapter: &ContentAdapter) {
        let url = adapter.share_poster(PosterTheme::Completion).await;
        self.overlay = Overlay::Poster {
            theme: PosterTheme::Completion,
            url,
        };
    }

    pub fn dismiss_overlay(&mut self) {
        self.overlay = Overlay::None;
    }
}

impl Default for FundraiserFlow {
    fn default() -> Self {
        Self::new()
    }
}
