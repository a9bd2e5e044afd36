// src/types.rs
// Domain types shared across the profile store, state machine and content adapter.
// Persisted and transient value objects serialize with camelCase field names so
// an existing saved slot reads back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is driving the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Teen,
    Fundraiser,
}

/// The finite set of screens the session can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppView {
    Onboarding,
    Dashboard,
    Reframer,
    Adaptation,
    Diary,
    FundraiserIntro,
    FundraiserDashboard,
}

impl AppView {
    /// Views reachable through the teen bottom navigation.
    pub fn is_teen_view(self) -> bool {
        matches!(
            self,
            AppView::Dashboard | AppView::Reframer | AppView::Adaptation | AppView::Diary
        )
    }
}

/// An encouragement message left by a supporter during a ferry action.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub from: String,
}

/// The single user profile. Owned by the profile store for the lifetime of
/// the session; every mutation goes through a named operation and is followed
/// by a full-object save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u8,
    pub bullying_experience: String,
    pub target_return_date: DateTime<Utc>,
    pub sunshine_points: u32,
    pub sunshine_target: u32,
    pub supporter_count: u32,
    pub received_messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healing_letter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Anxious,
    Angry,
}

/// Session-scoped journal entry, newest first. Not written to the durable slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One daily mood check-in on the teen dashboard. Session-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: DateTime<Utc>,
    pub mood: Mood,
    pub action: String,
}

/// Result of reframing a hurtful sentence. Transient; consumed by the page
/// that requested it or folded into a diary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReframeResult {
    pub original_text: String,
    pub warm_explanation: String,
    pub psych_analysis: String,
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Epoch milliseconds at generation time.
    pub timestamp: i64,
}

/// Advice for a feared reintegration scenario. Transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationResult {
    pub scenario: String,
    pub warm_advice: String,
    pub action_step: String,
    pub timestamp: i64,
}

/// A short story woven from selected diary entries. Transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairyTale {
    pub title: String,
    pub content: String,
    pub generated_date: DateTime<Utc>,
}

/// Which fixed prompt template a share poster uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterTheme {
    Daily,
    Completion,
}

impl PosterTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterTheme::Daily => "daily",
            PosterTheme::Completion => "completion",
        }
    }
}

/// Entity ids are the creation instant in epoch milliseconds rendered as a
/// string, matching the id layout already present in saved slots.
pub fn millis_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}
