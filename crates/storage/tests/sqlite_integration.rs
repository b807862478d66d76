use chrono::Duration;
use portal_core::Page;
use portal_core::model::{GroupName, StudyActivityFields, WordFields, WordParts};
use portal_core::time::fixed_now;
use serde_json::json;
use storage::repository::{
    GroupRepository, NewReviewItemRecord, NewStudySessionRecord, ReviewItemRepository,
    StatsRepository, StorageError, StudyActivityRepository, StudySessionRepository,
    WordRepository,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn fields(malay: &str, english: &str) -> WordFields {
    WordFields::new(malay, "جاوي", english, WordParts::default()).unwrap()
}

#[tokio::test]
async fn words_persist_parts_and_filter_by_search() {
    let repo = connect("memdb_words").await;
    let parts = WordParts::from_value(json!({ "type": "noun", "root": "makan" })).unwrap();
    let makan = repo
        .insert_word(&WordFields::new("makanan", "ماکنن", "food", parts).unwrap())
        .await
        .unwrap();
    repo.insert_word(&fields("air", "water")).await.unwrap();
    repo.insert_word(&fields("rumah", "house")).await.unwrap();

    let fetched = repo.get_word(makan.id()).await.unwrap().unwrap();
    assert_eq!(fetched.parts().get("type"), Some(&json!("noun")));

    let found = repo.list_words(Some("WAT"), Page::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].malay(), "air");

    let second_page = repo.list_words(None, Page::new(2, 2)).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].malay(), "rumah");
}

#[tokio::test]
async fn search_folds_ascii_case_like_the_memory_backend() {
    let repo = connect("memdb_search_case").await;
    let word = repo.insert_word(&fields("Kafé", "Café")).await.unwrap();

    for needle in ["kaf", "CAF", "é", "É"] {
        let found = repo.list_words(Some(needle), Page::default()).await.unwrap();
        assert_eq!(
            found.len() == 1,
            word.fields().matches(needle),
            "backends disagree on {needle:?}"
        );
    }
    assert!(repo.list_words(Some("É"), Page::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_of_missing_word_is_not_found() {
    let repo = connect("memdb_update_missing").await;
    let mut word = repo.insert_word(&fields("buku", "book")).await.unwrap();
    repo.delete_word(word.id()).await.unwrap();

    word.replace_fields(fields("buku", "books"));
    let err = repo.update_word(&word).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn membership_changes_maintain_words_count() {
    let repo = connect("memdb_membership").await;
    let now = fixed_now();
    let group = repo
        .insert_group(&GroupName::new("Food").unwrap(), now)
        .await
        .unwrap();
    let nasi = repo.insert_word(&fields("nasi", "rice")).await.unwrap();
    let roti = repo.insert_word(&fields("roti", "bread")).await.unwrap();

    let later = now + Duration::minutes(5);
    repo.add_word_to_group(group.id(), nasi.id(), later).await.unwrap();
    let updated = repo.add_word_to_group(group.id(), roti.id(), later).await.unwrap();
    assert_eq!(updated.words_count(), 2);
    assert_eq!(updated.updated_at(), later);

    let again = repo.add_word_to_group(group.id(), roti.id(), later).await.unwrap();
    assert_eq!(again.words_count(), 2);

    let words = repo.list_group_words(group.id(), Page::default()).await.unwrap();
    assert_eq!(words.len(), 2);

    repo.delete_word(nasi.id()).await.unwrap();
    let after_delete = repo.get_group(group.id()).await.unwrap().unwrap();
    assert_eq!(after_delete.words_count(), 1);

    let removed = repo
        .remove_word_from_group(group.id(), roti.id(), later)
        .await
        .unwrap();
    assert_eq!(removed.words_count(), 0);

    let err = repo
        .remove_word_from_group(group.id(), roti.id(), later)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sessions_and_reviews_require_existing_references() {
    let repo = connect("memdb_references").await;
    let now = fixed_now();
    let group = repo
        .insert_group(&GroupName::new("Basics").unwrap(), now)
        .await
        .unwrap();
    let activity = repo
        .insert_study_activity(&StudyActivityFields::new("Flashcards", "http://localhost:8081").unwrap())
        .await
        .unwrap();

    let err = repo
        .insert_study_session(NewStudySessionRecord {
            group_id: portal_core::model::GroupId::new(999),
            study_activity_id: activity.id(),
            created_at: now,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::MissingReference { entity: "group", id: 999 }));

    let session = repo
        .insert_study_session(NewStudySessionRecord {
            group_id: group.id(),
            study_activity_id: activity.id(),
            created_at: now,
        })
        .await
        .unwrap();

    let err = repo
        .insert_review_item(NewReviewItemRecord {
            word_id: portal_core::model::WordId::new(4242),
            study_session_id: session.id(),
            correct: true,
            created_at: now,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::MissingReference { entity: "word", .. }));
}

#[tokio::test]
async fn deleting_a_group_removes_its_sessions_and_reviews() {
    let repo = connect("memdb_group_cascade").await;
    let now = fixed_now();
    let group = repo
        .insert_group(&GroupName::new("Travel").unwrap(), now)
        .await
        .unwrap();
    let word = repo.insert_word(&fields("jalan", "road")).await.unwrap();
    repo.add_word_to_group(group.id(), word.id(), now).await.unwrap();
    let activity = repo
        .insert_study_activity(&StudyActivityFields::new("Quiz", "http://localhost:8082").unwrap())
        .await
        .unwrap();
    let session = repo
        .insert_study_session(NewStudySessionRecord {
            group_id: group.id(),
            study_activity_id: activity.id(),
            created_at: now,
        })
        .await
        .unwrap();
    repo.insert_review_item(NewReviewItemRecord {
        word_id: word.id(),
        study_session_id: session.id(),
        correct: false,
        created_at: now,
    })
    .await
    .unwrap();

    repo.delete_group(group.id()).await.unwrap();

    assert!(repo.get_group(group.id()).await.unwrap().is_none());
    assert!(repo.get_study_session(session.id()).await.unwrap().is_none());
    assert!(
        repo.list_session_review_items(session.id(), Page::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(repo.get_word(word.id()).await.unwrap().is_some());

    let err = repo.delete_group(group.id()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn history_and_last_session_reflect_stored_rows() {
    let repo = connect("memdb_history").await;
    let now = fixed_now();
    let empty = repo.study_history().await.unwrap();
    assert_eq!(empty.total_sessions, 0);
    assert!(empty.session_days.is_empty());
    assert!(repo.last_study_session().await.unwrap().is_none());

    let group = repo
        .insert_group(&GroupName::new("Numbers").unwrap(), now)
        .await
        .unwrap();
    let word = repo.insert_word(&fields("satu", "one")).await.unwrap();
    repo.insert_word(&fields("dua", "two")).await.unwrap();
    let activity = repo
        .insert_study_activity(&StudyActivityFields::new("Typing", "http://localhost:8083").unwrap())
        .await
        .unwrap();

    let mut last = None;
    for days_ago in [2, 1, 0] {
        let session = repo
            .insert_study_session(NewStudySessionRecord {
                group_id: group.id(),
                study_activity_id: activity.id(),
                created_at: now - Duration::days(days_ago),
            })
            .await
            .unwrap();
        repo.insert_review_item(NewReviewItemRecord {
            word_id: word.id(),
            study_session_id: session.id(),
            correct: days_ago != 1,
            created_at: now,
        })
        .await
        .unwrap();
        last = Some(session);
    }

    // A second session earlier on the latest day adds no new day.
    repo.insert_study_session(NewStudySessionRecord {
        group_id: group.id(),
        study_activity_id: activity.id(),
        created_at: now - Duration::hours(1),
    })
    .await
    .unwrap();

    let history = repo.study_history().await.unwrap();
    assert_eq!(history.total_reviews, 3);
    assert_eq!(history.correct_reviews, 2);
    assert_eq!(history.total_sessions, 4);
    assert_eq!(history.active_groups, 1);
    let today = now.date_naive();
    assert_eq!(
        history.session_days,
        vec![today - Duration::days(2), today - Duration::days(1), today]
    );

    let progress = repo.study_progress().await.unwrap();
    assert_eq!(progress.total_words_studied, 1);
    assert_eq!(progress.total_available_words, 2);

    let latest = repo.last_study_session().await.unwrap().unwrap();
    assert_eq!(Some(latest.session.id()), last.map(|s| s.id()));
    assert_eq!(latest.group_name, "Numbers");
}

#[tokio::test]
async fn deleting_an_activity_cascades_its_sessions() {
    let repo = connect("memdb_activity_delete").await;
    let now = fixed_now();
    let group = repo
        .insert_group(&GroupName::new("Colours").unwrap(), now)
        .await
        .unwrap();
    let activity = repo
        .insert_study_activity(&StudyActivityFields::new("Match", "http://localhost:8084").unwrap())
        .await
        .unwrap();
    let session = repo
        .insert_study_session(NewStudySessionRecord {
            group_id: group.id(),
            study_activity_id: activity.id(),
            created_at: now,
        })
        .await
        .unwrap();

    repo.delete_study_activity(activity.id()).await.unwrap();

    assert!(repo.get_study_session(session.id()).await.unwrap().is_none());
    let err = repo.delete_study_activity(activity.id()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}
