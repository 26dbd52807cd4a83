//! Integration tests for XP, levels and badges.

use std::sync::Arc;

use magic8::effects::{NullPlatform, RecordingPlatform};
use magic8::remote::SimulatedAnswerService;
use magic8::storage::{MemoryStore, StateStore, PROFILE_KEY};
use magic8::{
    Celebration, Config, Magic8Ball, Magic8Error, Profile, ValidationError, DEDICATED_SEEKER,
};

fn ball_on(store: MemoryStore) -> Magic8Ball {
    Magic8Ball::with_parts(
        Box::new(store),
        Box::new(SimulatedAnswerService::instant()),
        Arc::new(NullPlatform),
        Config::instant(),
    )
    .unwrap()
}

async fn ask_times(ball: &Magic8Ball, n: usize) {
    for i in 0..n {
        assert!(ball.ask(&format!("q{}", i)).await.unwrap().report().is_some());
    }
}

#[test]
fn test_fresh_profile() {
    let ball = ball_on(MemoryStore::new());
    assert_eq!(ball.profile(), Profile::default());
    assert_eq!(ball.profile().name, "Curious User");
    assert_eq!(
        ball.profile().badges,
        vec!["Novice Seeker".to_string(), "First Question".to_string()]
    );
}

#[tokio::test]
async fn test_ten_asks_reach_level_two() {
    let ball = ball_on(MemoryStore::new());
    ask_times(&ball, 10).await;

    let profile = ball.profile();
    assert_eq!(profile.xp, 100);
    assert_eq!(profile.level, 2);
    assert!(profile.has_badge("Level 2 Seeker"));
    assert!(profile.has_badge(DEDICATED_SEEKER));
    assert_eq!(
        profile.badges,
        vec![
            "Novice Seeker".to_string(),
            "First Question".to_string(),
            "Level 2 Seeker".to_string(),
            "Dedicated Seeker".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_level_tracks_xp_after_every_ask() {
    let ball = ball_on(MemoryStore::new());
    for n in 1..=35i64 {
        ball.ask("q").await.unwrap();
        let profile = ball.profile();
        assert_eq!(profile.xp, 10 * n);
        assert_eq!(i64::from(profile.level), (10 * n) / 100 + 1);
    }
    let dedicated = ball
        .profile()
        .badges
        .iter()
        .filter(|b| *b == DEDICATED_SEEKER)
        .count();
    assert_eq!(dedicated, 1);
}

#[tokio::test]
async fn test_level_up_report() {
    let ball = ball_on(MemoryStore::new());
    ask_times(&ball, 9).await;

    let outcome = ball.ask("tenth").await.unwrap();
    let update = &outcome.report().unwrap().profile;
    assert_eq!(update.new_level, Some(2));
    assert_eq!(
        update.badges_awarded,
        vec!["Level 2 Seeker".to_string(), "Dedicated Seeker".to_string()]
    );
}

#[test]
fn test_manual_level_up_locked() {
    let ball = ball_on(MemoryStore::new());
    let err = ball.level_up().unwrap_err();
    assert!(matches!(
        err,
        Magic8Error::Validation(ValidationError::LevelUpLocked {
            xp: 0,
            required: 100
        })
    ));
    assert_eq!(ball.profile(), Profile::default());
}

#[tokio::test]
async fn test_asks_alone_never_unlock_level_up() {
    let ball = ball_on(MemoryStore::new());
    ask_times(&ball, 25).await;
    assert!(!ball.profile().can_level_up());
    assert!(ball.level_up().unwrap_err().is_validation());
}

#[tokio::test]
async fn test_manual_level_up_then_ask_diverges() {
    let store = MemoryStore::new();
    store
        .put_raw(PROFILE_KEY, br#"{"level":1,"xp":150}"#)
        .unwrap();
    let platform = Arc::new(RecordingPlatform::new());
    let ball = ball_on(store).with_platform(platform.clone());

    assert_eq!(ball.level_up().unwrap(), 2);
    let profile = ball.profile();
    assert_eq!((profile.level, profile.xp), (2, 50));
    assert!(profile.has_badge("Level 2 Seeker"));
    assert_eq!(platform.bursts(Celebration::Major), 1);

    // The next ask recomputes the level from XP: 60 XP is level 1.
    ball.ask("q").await.unwrap();
    let profile = ball.profile();
    assert_eq!((profile.level, profile.xp), (1, 60));
}

#[tokio::test]
async fn test_repeated_manual_level_ups_overdraw() {
    let store = MemoryStore::new();
    store
        .put_raw(PROFILE_KEY, br#"{"level":1,"xp":100}"#)
        .unwrap();
    let ball = ball_on(store);

    assert_eq!(ball.level_up().unwrap(), 2);
    assert_eq!(ball.profile().xp, 0);
    assert!(ball.level_up().is_err());

    // Level badges repeat when a level is reached twice.
    ask_times(&ball, 10).await;
    let profile = ball.profile();
    assert_eq!(profile.level, 2);
    let level_two = profile
        .badges
        .iter()
        .filter(|b| *b == "Level 2 Seeker")
        .count();
    assert_eq!(level_two, 2);

    ask_times(&ball, 1).await;
    assert_eq!(ball.profile().xp, 110);
}

#[test]
fn test_rename() {
    let ball = ball_on(MemoryStore::new());
    ball.set_profile_name("Ada").unwrap();
    assert_eq!(ball.profile().name, "Ada");
}

#[test]
fn test_progress_bar() {
    let mut profile = Profile::default();
    assert_eq!(profile.progress(), 0.0);
    profile.xp = 50;
    assert!((profile.progress() - 0.5).abs() < f64::EPSILON);
    profile.xp = -20;
    assert_eq!(profile.progress(), 0.0);
    profile.xp = 500;
    assert_eq!(profile.progress(), 1.0);
}
