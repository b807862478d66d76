use chrono::Duration;
use portal_core::model::{Group, GroupId, ReviewItem, StudySession};
use portal_core::time::fixed_now;
use portal_core::{Page, StudyHistory};
use serde_json::json;
use services::{AppServices, Clock, ErrorKind, WordDraft};
use storage::repository::{StatsRepository, Storage};

fn draft(malay: &str, jawi: &str, english: &str) -> WordDraft {
    WordDraft {
        malay: malay.into(),
        jawi: jawi.into(),
        english: english.into(),
        parts: json!({ "type": "noun" }),
    }
}

#[tokio::test]
async fn single_correct_review_yields_perfect_stats() {
    let storage = Storage::sqlite("sqlite:file:memdb_portal_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));

    let group = services
        .groups()
        .create_group("Basic Greetings".into())
        .await
        .expect("create group");
    let activity = services
        .study_activities()
        .create_activity("Flashcards".into(), "http://localhost:8081".into())
        .await
        .expect("create activity");
    let session = services
        .study_sessions()
        .create_session(group.id(), activity.id())
        .await
        .expect("create session");
    let word = services
        .words()
        .create_word(draft("selamat pagi", "سلامت ڤاݢي", "good morning"))
        .await
        .expect("create word");
    services
        .study_sessions()
        .record_review(session.id(), word.id(), true)
        .await
        .expect("record review");

    let stats = services.dashboard().quick_stats().await.expect("stats");
    assert_eq!(stats.success_rate, 100.0);
    assert_eq!(stats.total_study_sessions, 1);
    assert_eq!(stats.total_active_groups, 1);
    assert_eq!(stats.study_streak_days, 1);

    let last = services
        .dashboard()
        .last_study_session()
        .await
        .expect("last session")
        .expect("a session exists");
    assert_eq!(last.session.id(), session.id());
    assert_eq!(last.group_name, "Basic Greetings");

    let progress = services.dashboard().study_progress().await.expect("progress");
    assert_eq!(progress.total_words_studied, 1);
    assert_eq!(progress.total_available_words, 1);
}

#[tokio::test]
async fn streak_counts_back_from_latest_session_and_stops_at_gaps() {
    let storage = Storage::in_memory();
    let base = fixed_now();
    let setup = AppServices::from_storage(&storage, Clock::fixed(base));
    let group = setup.groups().create_group("Numbers".into()).await.unwrap();
    let idle = setup.groups().create_group("Idle".into()).await.unwrap();
    let activity = setup
        .study_activities()
        .create_activity("Quiz".into(), "http://localhost:8082".into())
        .await
        .unwrap();

    // Sessions today, yesterday, two days ago and (after a gap) five days ago.
    for days_ago in [5, 2, 1, 0, 0] {
        let at_day = AppServices::from_storage(&storage, Clock::fixed(base - Duration::days(days_ago)));
        at_day
            .study_sessions()
            .create_session(group.id(), activity.id())
            .await
            .unwrap();
    }

    let stats = setup.dashboard().quick_stats().await.unwrap();
    assert_eq!(stats.study_streak_days, 3);
    assert_eq!(stats.total_study_sessions, 5);
    assert_eq!(stats.total_active_groups, 1);
    assert_eq!(stats.success_rate, 0.0);

    let idle_sessions = setup
        .groups()
        .list_group_study_sessions(idle.id(), Page::default())
        .await
        .unwrap();
    assert!(idle_sessions.is_empty());
}

#[tokio::test]
async fn deleting_a_group_leaves_no_sessions_behind() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()));
    let group = services.groups().create_group("Travel".into()).await.unwrap();
    let activity = services
        .study_activities()
        .create_activity("Match".into(), "http://localhost:8083".into())
        .await
        .unwrap();
    let word = services
        .words()
        .create_word(draft("jalan", "جالن", "road"))
        .await
        .unwrap();
    services.groups().add_word(group.id(), word.id()).await.unwrap();
    let session = services
        .study_sessions()
        .create_session(group.id(), activity.id())
        .await
        .unwrap();
    services
        .study_sessions()
        .record_review(session.id(), word.id(), false)
        .await
        .unwrap();

    services.groups().delete_group(group.id()).await.unwrap();

    let sessions = services
        .study_sessions()
        .list_sessions(Page::default())
        .await
        .unwrap();
    assert!(sessions.is_empty());
    let err = services.groups().get_group(group.id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(services.words().get_word(word.id()).await.is_ok());

    let stats = services.dashboard().quick_stats().await.unwrap();
    assert_eq!(stats.total_study_sessions, 0);
    assert_eq!(stats.success_rate, 0.0);
}

/// Row-level view of everything a group delete could touch.
#[derive(Debug, PartialEq)]
struct Snapshot {
    history: StudyHistory,
    groups: Vec<Group>,
    members: Vec<Vec<u64>>,
    sessions: Vec<StudySession>,
    reviews: Vec<Vec<ReviewItem>>,
    words: usize,
}

async fn snapshot(storage: &Storage, services: &AppServices) -> Snapshot {
    let everything = Page::new(100, 0);
    let groups = services.groups().list_groups(everything).await.unwrap();
    let mut members = Vec::new();
    for group in &groups {
        let words = services
            .groups()
            .list_group_words(group.id(), everything)
            .await
            .unwrap();
        members.push(words.iter().map(|w| w.id().value()).collect());
    }
    let sessions = services.study_sessions().list_sessions(everything).await.unwrap();
    let mut reviews = Vec::new();
    for session in &sessions {
        reviews.push(
            services
                .study_sessions()
                .list_reviews(session.id(), everything)
                .await
                .unwrap(),
        );
    }
    Snapshot {
        history: storage.stats.study_history().await.unwrap(),
        words: services.words().list_words(None, everything).await.unwrap().len(),
        groups,
        members,
        sessions,
        reviews,
    }
}

async fn missing_group_delete_mutates_nothing(storage: Storage) {
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    let activity = services
        .study_activities()
        .create_activity("Flashcards".into(), "http://localhost:8081".into())
        .await
        .unwrap();
    let seeded = [
        ("Animals", [("kucing", "cat"), ("ikan", "fish")]),
        ("Home", [("rumah", "house"), ("pintu", "door")]),
    ];
    for (name, words) in seeded {
        let group = services.groups().create_group(name.into()).await.unwrap();
        let session = services
            .study_sessions()
            .create_session(group.id(), activity.id())
            .await
            .unwrap();
        for (index, (malay, english)) in words.into_iter().enumerate() {
            let word = services
                .words()
                .create_word(draft(malay, "جاوي", english))
                .await
                .unwrap();
            services.groups().add_word(group.id(), word.id()).await.unwrap();
            services
                .study_sessions()
                .record_review(session.id(), word.id(), index == 0)
                .await
                .unwrap();
        }
    }

    let before = snapshot(&storage, &services).await;
    assert_eq!(before.groups.len(), 2);
    assert!(before.groups.iter().all(|g| g.words_count() == 2));
    assert_eq!(before.history.total_reviews, 4);

    let err = services
        .groups()
        .delete_group(GroupId::new(9_999))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(snapshot(&storage, &services).await, before);
}

#[tokio::test]
async fn deleting_an_unknown_group_changes_nothing_in_memory() {
    missing_group_delete_mutates_nothing(Storage::in_memory()).await;
}

#[tokio::test]
async fn deleting_an_unknown_group_changes_nothing_on_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_portal_missing_group?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    missing_group_delete_mutates_nothing(storage).await;
}

#[tokio::test]
async fn malformed_paging_behaves_like_defaults() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()));
    for n in 0..12 {
        services
            .words()
            .create_word(draft(&format!("kata {n}"), "کات", &format!("word {n}")))
            .await
            .unwrap();
    }

    let defaults = services.words().list_words(None, Page::default()).await.unwrap();
    let malformed = services
        .words()
        .list_words(None, Page::from_raw(Some("abc"), Some("-3")))
        .await
        .unwrap();

    assert_eq!(defaults.len(), 10);
    assert_eq!(
        defaults.iter().map(|w| w.id()).collect::<Vec<_>>(),
        malformed.iter().map(|w| w.id()).collect::<Vec<_>>()
    );
}
