// src/profile/mod.rs
// The profile store: one persisted JSON slot plus the pure mutation
// operations on UserProfile and the session diary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::CONFIG;
use crate::types::{millis_id, DiaryEntry, Message, Mood, UserProfile};

/// Points added by a single ferry action.
pub const SUNSHINE_INCREMENT: u32 = 5;

/// Sender label stamped on messages left during a ferry action.
pub const SUPPORTER_LABEL: &str = "新守护人";

/// Persists the single user profile as one JSON document. Absence or a
/// malformed slot reads as "no profile"; it is never an error.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_config() -> Self {
        Self::new(CONFIG.profile_path())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Restore the saved profile, if any. Corrupt data is treated as a cold
    /// start, not a failure.
    pub fn load(&self) -> Option<UserProfile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No saved profile at {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                info!("Restored profile for {}", profile.name);
                Some(profile)
            }
            Err(e) => {
                warn!("Saved profile is malformed, starting fresh: {}", e);
                None
            }
        }
    }

    /// Serialize and persist the full profile, overwriting any prior value.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating data dir {:?}", parent))?;
        }
        let raw = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing profile slot {:?}", self.path))?;
        debug!(
            "Saved profile: {} points, {} supporters",
            profile.sunshine_points, profile.supporter_count
        );
        Ok(())
    }

    /// Erase the persisted slot. Missing slot is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared profile slot {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("clearing profile slot {:?}", self.path)),
        }
    }
}

/// Apply one ferry action: +5 sunshine points, +1 supporter, and an optional
/// message prepended to the received list. Pure; the caller persists the
/// returned profile.
pub fn add_sunshine(
    profile: &UserProfile,
    message: Option<&str>,
    now: DateTime<Utc>,
) -> UserProfile {
    let mut updated = profile.clone();
    updated.sunshine_points += SUNSHINE_INCREMENT;
    updated.supporter_count += 1;

    if let Some(content) = message {
        updated.received_messages.insert(
            0,
            Message {
                id: millis_id(now),
                content: content.to_string(),
                date: now,
                from: SUPPORTER_LABEL.to_string(),
            },
        );
    }

    updated
}

/// Prepend a new diary entry. The diary is session-scoped; nothing here
/// touches the persisted slot.
pub fn add_diary_entry(
    entries: &[DiaryEntry],
    content: &str,
    image_url: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<DiaryEntry> {
    let entry = DiaryEntry {
        id: millis_id(now),
        content: content.to_string(),
        date: now,
        mood: Mood::Neutral,
        is_favorite: false,
        image_url: image_url.map(str::to_string),
    };

    let mut updated = Vec::with_capacity(entries.len() + 1);
    updated.push(entry);
    updated.extend_from_slice(entries);
    updated
}

/// Demo profile seeded when a supporter enters with no teen profile saved.
/// Points sit just under the target so the celebration path is easy to reach.
pub fn demo_profile(now: DateTime<Utc>) -> UserProfile {
    UserProfile {
        name: "安安".to_string(),
        age: 14,
        bullying_experience: "因为戴牙套和喜欢画画，被班上的同学排挤，还在课桌上乱涂乱画。他们总是嘲笑我的发音，把我的作业本扔到垃圾桶里。".to_string(),
        target_return_date: now + Duration::days(30),
        sunshine_points: 95,
        sunshine_target: 100,
        supporter_count: 12,
        received_messages: vec![
            Message {
                id: "1".to_string(),
                content: "你的画很美，不要放弃！".to_string(),
                date: now - Duration::days(1),
                from: "守护人223".to_string(),
            },
            Message {
                id: "2".to_string(),
                content: "世界因为你的独特而精彩。".to_string(),
                date: now - Duration::days(2),
                from: "守护人889".to_string(),
            },
        ],
        offline_code: None,
        healing_letter: None,
    }
}
