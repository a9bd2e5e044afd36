// tests/session_flow.rs
// End-to-end journeys through the session layer: the fundraiser ferry path
// to celebration and the teen onboarding path to a persisted profile.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use sunnypath::gamification::{FerryOutcome, Overlay};
use sunnypath::llm::{ContentAdapter, GenerativeProvider, ProviderError};
use sunnypath::onboarding::{GoalOutcome, OnboardingStep};
use sunnypath::profile::ProfileStore;
use sunnypath::types::{AppView, PosterTheme, UserRole};
use sunnypath::Session;

/// Provider with fixed, well-formed responses on every channel.
struct CannedProvider;

#[async_trait]
impl GenerativeProvider for CannedProvider {
    async fn generate_text(
        &self,
        _model: &str,
        _prompt: &str,
        json_mode: bool,
    ) -> Result<String, ProviderError> {
        if json_mode {
            Ok(
                "{\"warmExplanation\":\"他们说的不是事实\",\"psychAnalysis\":\"那是他们的问题\",\
                 \"warmAdvice\":\"慢慢来\",\"actionStep\":\"先打个招呼\",\
                 \"solution\":\"写下一件今天的小事\",\
                 \"title\":\"小灯塔\",\"content\":\"从前有一座小灯塔…\"}"
                    .to_string(),
            )
        } else {
            Ok("亲爱的孩子，见信好。".to_string())
        }
    }

    async fn generate_image(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
        Ok("data:image/png;base64,QUJD".to_string())
    }
}

/// Provider whose every channel fails.
struct DownProvider;

#[async_trait]
impl GenerativeProvider for DownProvider {
    async fn generate_text(
        &self,
        _model: &str,
        _prompt: &str,
        _json_mode: bool,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            body: "down".to_string(),
        })
    }

    async fn generate_image(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            body: "down".to_string(),
        })
    }
}

fn session_with(dir: &TempDir, provider: Arc<dyn GenerativeProvider>) -> Session {
    let store = ProfileStore::new(dir.path().join("profile.json"));
    let adapter = ContentAdapter::with_models(provider, "text-model", "story-model", "image-model");
    Session::new(store, adapter)
}

#[tokio::test]
async fn fundraiser_journey_reaches_celebration() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));
    session.startup();

    // Entering as a supporter with nothing saved seeds the demo profile,
    // parked just under the target.
    session.select_role(UserRole::Fundraiser);
    assert_eq!(session.view(), AppView::FundraiserIntro);
    let profile = session.profile().expect("demo profile seeded");
    assert_eq!(profile.sunshine_points, 95);
    assert_eq!(profile.sunshine_target, 100);

    session.start_ferry_flow();
    assert_eq!(session.view(), AppView::FundraiserDashboard);

    // One ferry crosses the threshold and celebrates.
    let outcome = session.ferry(Some("你的画很美！")).await.unwrap();
    assert_eq!(outcome, FerryOutcome::Celebration);
    assert_eq!(*session.fundraiser().overlay(), Overlay::Celebration);

    let profile = session.profile().unwrap();
    assert_eq!(profile.sunshine_points, 100);
    assert_eq!(profile.supporter_count, 13);
    assert_eq!(profile.received_messages[0].content, "你的画很美！");

    // The ferry persisted the updated profile.
    let store = ProfileStore::new(dir.path().join("profile.json"));
    assert_eq!(store.load().unwrap().sunshine_points, 100);

    // From the celebration, the completion poster overlay.
    session.completion_poster().await;
    match session.fundraiser().overlay() {
        Overlay::Poster { theme, url } => {
            assert_eq!(*theme, PosterTheme::Completion);
            assert_eq!(url, "data:image/png;base64,QUJD");
        }
        other => panic!("expected poster overlay, got {:?}", other),
    }

    session.dismiss_overlay();
    assert_eq!(*session.fundraiser().overlay(), Overlay::None);
}

#[tokio::test]
async fn ferry_below_target_shows_daily_poster() {
    let dir = TempDir::new().unwrap();

    // Save a profile far from the target, then enter as a supporter.
    {
        let mut session = session_with(&dir, Arc::new(CannedProvider));
        session.onboarding_mut().set_name("小鱼");
        session.onboarding_mut().advance();
        session.onboarding_mut().advance();
        session.submit_onboarding_goal().await.unwrap();
    }

    let mut session = session_with(&dir, Arc::new(CannedProvider));
    session.startup();
    session.back(); // logout back to role selection
    session.select_role(UserRole::Fundraiser);
    session.start_ferry_flow();

    let outcome = session.ferry(None).await.unwrap();
    assert_eq!(outcome, FerryOutcome::DailyPoster);
    match session.fundraiser().overlay() {
        Overlay::Poster { theme, .. } => assert_eq!(*theme, PosterTheme::Daily),
        other => panic!("expected poster overlay, got {:?}", other),
    }

    let profile = session.profile().unwrap();
    assert_eq!(profile.sunshine_points, 5);
    // Blank ferry leaves no message.
    assert!(profile.received_messages.is_empty());
}

#[tokio::test]
async fn sequential_ferries_accumulate() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    // Seed a fresh teen profile at 0 points, then enter as a supporter.
    session.onboarding_mut().set_name("小鱼");
    session.onboarding_mut().advance();
    session.onboarding_mut().advance();
    session.submit_onboarding_goal().await.unwrap();
    session.back();
    session.select_role(UserRole::Fundraiser);
    session.start_ferry_flow();

    session.ferry(None).await.unwrap();
    session.ferry(Some("加油")).await.unwrap();

    let profile = session.profile().unwrap();
    assert_eq!(profile.sunshine_points, 10);
    assert_eq!(profile.supporter_count, 2);
    assert_eq!(profile.received_messages.len(), 1);
}

#[tokio::test]
async fn ferry_outside_fundraiser_dashboard_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    session.select_role(UserRole::Fundraiser);
    // Still on the intro view.
    assert!(session.ferry(None).await.is_err());
}

#[tokio::test]
async fn onboarding_with_code_persists_letter_and_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));
    session.startup();

    session.select_role(UserRole::Teen);
    assert_eq!(session.view(), AppView::Onboarding);

    let flow = session.onboarding_mut();
    flow.set_name("小鱼");
    flow.set_experience("在学校被孤立");
    assert!(flow.advance());
    assert!(flow.advance());
    flow.set_weeks(4);
    flow.set_offline_code("SUNNY-2024");

    let outcome = session.submit_onboarding_goal().await.unwrap();
    assert_eq!(outcome, GoalOutcome::LetterReady);
    assert_eq!(session.onboarding().step(), OnboardingStep::Letter);
    assert_eq!(
        session.onboarding().healing_letter(),
        Some("亲爱的孩子，见信好。")
    );

    let profile = session.confirm_onboarding_letter().await.unwrap();
    assert_eq!(session.view(), AppView::Dashboard);
    assert_eq!(session.role(), Some(UserRole::Teen));
    assert_eq!(profile.name, "小鱼");
    assert_eq!(profile.healing_letter.as_deref(), Some("亲爱的孩子，见信好。"));

    // Logout keeps the slot; a fresh session restores straight to the
    // dashboard.
    session.back();
    assert_eq!(session.role(), None);

    let mut restarted = session_with(&dir, Arc::new(CannedProvider));
    restarted.startup();
    assert_eq!(restarted.role(), Some(UserRole::Teen));
    assert_eq!(restarted.view(), AppView::Dashboard);
    assert_eq!(restarted.profile().unwrap().name, "小鱼");
}

#[tokio::test]
async fn onboarding_letter_failure_still_finishes() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(DownProvider));

    session.select_role(UserRole::Teen);
    let flow = session.onboarding_mut();
    flow.set_name("小鱼");
    flow.advance();
    flow.advance();
    flow.set_offline_code("SUNNY-2024");

    match session.submit_onboarding_goal().await.unwrap() {
        GoalOutcome::Finished(profile) => {
            assert!(profile.healing_letter.is_none());
            assert_eq!(profile.offline_code.as_deref(), Some("SUNNY-2024"));
        }
        other => panic!("expected Finished, got {:?}", other),
    }
    assert_eq!(session.view(), AppView::Dashboard);

    // Committed despite the degraded letter.
    let store = ProfileStore::new(dir.path().join("profile.json"));
    assert!(store.load().is_some());
}

#[tokio::test]
async fn early_goal_submission_commits_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    session.select_role(UserRole::Teen);
    // Still on the name step.
    assert!(session.submit_onboarding_goal().await.is_err());
    assert_eq!(session.view(), AppView::Onboarding);
    assert!(session.profile().is_none());

    let store = ProfileStore::new(dir.path().join("profile.json"));
    assert!(store.load().is_none());
}

#[tokio::test]
async fn teen_content_operations_land_in_the_diary() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    session.select_role(UserRole::Teen);
    session.onboarding_mut().set_name("小鱼");
    session.onboarding_mut().advance();
    session.onboarding_mut().advance();
    session.submit_onboarding_goal().await.unwrap();

    // Blank input is rejected before any provider call.
    assert!(session.reframe("   ").await.is_none());

    session.navigate(AppView::Reframer);
    let result = session.reframe("你真没用").await.unwrap();
    assert_eq!(result.warm_explanation, "他们说的不是事实");
    session.save_reframe_to_diary(&result);

    session.navigate(AppView::Adaptation);
    let advice = session.adaptation("怕回学校没人理我").await.unwrap();
    assert_eq!(advice.action_step, "先打个招呼");
    session.save_adaptation_to_diary(&advice);

    assert!(session.write_diary_entry("今天试着出门了"));
    assert!(!session.write_diary_entry("  "));

    let diary = session.diary();
    assert_eq!(diary.len(), 3);
    assert_eq!(diary[0].content, "今天试着出门了");
    assert!(diary[2].content.starts_with("[语言重构]"));
    assert!(diary[1].content.starts_with("[重返向导]"));

    // Weave the hand-written entry into a story.
    let ids = vec![diary[0].id.clone()];
    let tale = session.weave_selected(&ids).await.unwrap();
    assert_eq!(tale.title, "小灯塔");

    // Nothing selected, nothing woven.
    assert!(session.weave_selected(&[]).await.is_none());
}

#[tokio::test]
async fn check_in_is_once_per_day() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    assert!(session.check_in(sunnypath::types::Mood::Happy));
    assert!(!session.check_in(sunnypath::types::Mood::Sad));
    assert_eq!(session.today_log().unwrap().action, "今天也很棒！");
}

#[tokio::test]
async fn reset_erases_slot_and_session() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, Arc::new(CannedProvider));

    session.select_role(UserRole::Fundraiser);
    session.start_ferry_flow();
    session.ferry(None).await.unwrap();

    session.reset().unwrap();
    assert_eq!(session.role(), None);
    assert_eq!(session.view(), AppView::Onboarding);
    assert!(session.profile().is_none());

    let store = ProfileStore::new(dir.path().join("profile.json"));
    assert!(store.load().is_none());
}
