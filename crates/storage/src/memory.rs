//! In-memory backend for tests and prototyping.
//!
//! All tables live behind one mutex so multi-row operations (cascading
//! deletes, reference-checked inserts) are atomic, mirroring the SQLite
//! transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::model::{
    Group, GroupId, GroupName, LastStudySession, ReviewItem, ReviewItemId, StudyActivity,
    StudyActivityFields, StudyActivityId, StudySession, StudySessionId, Word, WordFields, WordId,
};
use portal_core::stats::StudyProgress;
use portal_core::{Page, StudyHistory};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::repository::{
    GroupRepository, NewReviewItemRecord, NewStudySessionRecord, ReviewItemRepository,
    StatsRepository, StorageError, StudyActivityRepository, StudySessionRepository,
    WordRepository,
};

#[derive(Default)]
struct Tables {
    last_id: u64,
    words: BTreeMap<WordId, Word>,
    groups: BTreeMap<GroupId, Group>,
    word_groups: BTreeSet<(GroupId, WordId)>,
    study_activities: BTreeMap<StudyActivityId, StudyActivity>,
    study_sessions: BTreeMap<StudySessionId, StudySession>,
    review_items: BTreeMap<ReviewItemId, ReviewItem>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn group_words_count(&self, group_id: GroupId) -> Result<u32, StorageError> {
        let count = self
            .word_groups
            .range((group_id, WordId::new(0))..=(group_id, WordId::new(u64::MAX)))
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("words_count overflow".into()))
    }

    fn refresh_words_count(
        &mut self,
        group_id: GroupId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let count = self.group_words_count(group_id)?;
        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or(StorageError::NotFound)?;
        group.set_words_count(count);
        group.touch(at);
        Ok(group.clone())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl WordRepository for InMemoryRepository {
    async fn insert_word(&self, fields: &WordFields) -> Result<Word, StorageError> {
        let mut tables = self.lock()?;
        let id = WordId::new(tables.next_id());
        let word = Word::new(id, fields.clone());
        tables.words.insert(id, word.clone());
        Ok(word)
    }

    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError> {
        Ok(self.lock()?.words.get(&id).cloned())
    }

    async fn list_words(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<Word>, StorageError> {
        let tables = self.lock()?;
        let matching = tables
            .words
            .values()
            .filter(|word| search.is_none_or(|needle| word.fields().matches(needle)))
            .cloned();
        Ok(page.slice(matching))
    }

    async fn update_word(&self, word: &Word) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        let stored = tables
            .words
            .get_mut(&word.id())
            .ok_or(StorageError::NotFound)?;
        stored.replace_fields(word.fields().clone());
        Ok(())
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        if tables.words.remove(&id).is_none() {
            return Err(StorageError::NotFound);
        }

        let affected: Vec<GroupId> = tables
            .word_groups
            .iter()
            .filter(|(_, word_id)| *word_id == id)
            .map(|(group_id, _)| *group_id)
            .collect();
        tables.word_groups.retain(|(_, word_id)| *word_id != id);
        for group_id in affected {
            let count = tables.group_words_count(group_id)?;
            if let Some(group) = tables.groups.get_mut(&group_id) {
                group.set_words_count(count);
            }
        }
        tables.review_items.retain(|_, review| review.word_id() != id);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn insert_group(
        &self,
        name: &GroupName,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let mut tables = self.lock()?;
        let id = GroupId::new(tables.next_id());
        let group = Group::new(id, name.clone(), 0, created_at, created_at);
        tables.groups.insert(id, group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, StorageError> {
        Ok(self.lock()?.groups.get(&id).cloned())
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<Group>, StorageError> {
        let tables = self.lock()?;
        Ok(page.slice(tables.groups.values().cloned()))
    }

    async fn update_group(&self, group: &Group) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        let stored = tables
            .groups
            .get_mut(&group.id())
            .ok_or(StorageError::NotFound)?;
        stored.rename(group.name().clone(), group.updated_at());
        Ok(())
    }

    async fn delete_group(&self, id: GroupId) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        if tables.groups.remove(&id).is_none() {
            return Err(StorageError::NotFound);
        }

        let sessions: HashSet<StudySessionId> = tables
            .study_sessions
            .values()
            .filter(|session| session.group_id() == id)
            .map(StudySession::id)
            .collect();
        tables
            .review_items
            .retain(|_, review| !sessions.contains(&review.study_session_id()));
        tables
            .study_sessions
            .retain(|session_id, _| !sessions.contains(session_id));
        tables.word_groups.retain(|(group_id, _)| *group_id != id);
        Ok(())
    }

    async fn list_group_words(&self, id: GroupId, page: Page) -> Result<Vec<Word>, StorageError> {
        let tables = self.lock()?;
        let words = tables
            .word_groups
            .range((id, WordId::new(0))..=(id, WordId::new(u64::MAX)))
            .filter_map(|(_, word_id)| tables.words.get(word_id).cloned());
        Ok(page.slice(words))
    }

    async fn add_word_to_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let mut tables = self.lock()?;
        let group = tables
            .groups
            .get(&group_id)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        if !tables.words.contains_key(&word_id) {
            return Err(StorageError::MissingReference {
                entity: "word",
                id: word_id.value(),
            });
        }
        if !tables.word_groups.insert((group_id, word_id)) {
            return Ok(group);
        }
        tables.refresh_words_count(group_id, at)
    }

    async fn remove_word_from_group(
        &self,
        group_id: GroupId,
        word_id: WordId,
        at: DateTime<Utc>,
    ) -> Result<Group, StorageError> {
        let mut tables = self.lock()?;
        if !tables.groups.contains_key(&group_id) {
            return Err(StorageError::NotFound);
        }
        if !tables.word_groups.remove(&(group_id, word_id)) {
            return Err(StorageError::NotFound);
        }
        tables.refresh_words_count(group_id, at)
    }
}

#[async_trait]
impl StudyActivityRepository for InMemoryRepository {
    async fn insert_study_activity(
        &self,
        fields: &StudyActivityFields,
    ) -> Result<StudyActivity, StorageError> {
        let mut tables = self.lock()?;
        let id = StudyActivityId::new(tables.next_id());
        let activity = StudyActivity::new(id, fields.clone());
        tables.study_activities.insert(id, activity.clone());
        Ok(activity)
    }

    async fn get_study_activity(
        &self,
        id: StudyActivityId,
    ) -> Result<Option<StudyActivity>, StorageError> {
        Ok(self.lock()?.study_activities.get(&id).cloned())
    }

    async fn list_study_activities(&self, page: Page) -> Result<Vec<StudyActivity>, StorageError> {
        let tables = self.lock()?;
        Ok(page.slice(tables.study_activities.values().cloned()))
    }

    async fn update_study_activity(&self, activity: &StudyActivity) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        let stored = tables
            .study_activities
            .get_mut(&activity.id())
            .ok_or(StorageError::NotFound)?;
        stored.replace_fields(activity.fields().clone());
        Ok(())
    }

    async fn delete_study_activity(&self, id: StudyActivityId) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        if tables.study_activities.remove(&id).is_none() {
            return Err(StorageError::NotFound);
        }
        let sessions: HashSet<StudySessionId> = tables
            .study_sessions
            .values()
            .filter(|session| session.study_activity_id() == id)
            .map(StudySession::id)
            .collect();
        tables
            .review_items
            .retain(|_, review| !sessions.contains(&review.study_session_id()));
        tables
            .study_sessions
            .retain(|session_id, _| !sessions.contains(session_id));
        Ok(())
    }
}

#[async_trait]
impl StudySessionRepository for InMemoryRepository {
    async fn insert_study_session(
        &self,
        session: NewStudySessionRecord,
    ) -> Result<StudySession, StorageError> {
        let mut tables = self.lock()?;
        if !tables.groups.contains_key(&session.group_id) {
            return Err(StorageError::MissingReference {
                entity: "group",
                id: session.group_id.value(),
            });
        }
        if !tables
            .study_activities
            .contains_key(&session.study_activity_id)
        {
            return Err(StorageError::MissingReference {
                entity: "study activity",
                id: session.study_activity_id.value(),
            });
        }
        let id = StudySessionId::new(tables.next_id());
        let stored = StudySession::new(
            id,
            session.group_id,
            session.study_activity_id,
            session.created_at,
        );
        tables.study_sessions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_study_session(
        &self,
        id: StudySessionId,
    ) -> Result<Option<StudySession>, StorageError> {
        Ok(self.lock()?.study_sessions.get(&id).cloned())
    }

    async fn list_study_sessions(&self, page: Page) -> Result<Vec<StudySession>, StorageError> {
        let tables = self.lock()?;
        Ok(page.slice(tables.study_sessions.values().cloned()))
    }

    async fn list_group_study_sessions(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError> {
        let tables = self.lock()?;
        let sessions = tables
            .study_sessions
            .values()
            .filter(|session| session.group_id() == group_id)
            .cloned();
        Ok(page.slice(sessions))
    }

    async fn list_activity_study_sessions(
        &self,
        study_activity_id: StudyActivityId,
        page: Page,
    ) -> Result<Vec<StudySession>, StorageError> {
        let tables = self.lock()?;
        let sessions = tables
            .study_sessions
            .values()
            .filter(|session| session.study_activity_id() == study_activity_id)
            .cloned();
        Ok(page.slice(sessions))
    }
}

#[async_trait]
impl ReviewItemRepository for InMemoryRepository {
    async fn insert_review_item(
        &self,
        review: NewReviewItemRecord,
    ) -> Result<ReviewItem, StorageError> {
        let mut tables = self.lock()?;
        if !tables.words.contains_key(&review.word_id) {
            return Err(StorageError::MissingReference {
                entity: "word",
                id: review.word_id.value(),
            });
        }
        if !tables
            .study_sessions
            .contains_key(&review.study_session_id)
        {
            return Err(StorageError::MissingReference {
                entity: "study session",
                id: review.study_session_id.value(),
            });
        }
        let id = ReviewItemId::new(tables.next_id());
        let stored = ReviewItem::new(
            id,
            review.word_id,
            review.study_session_id,
            review.correct,
            review.created_at,
        );
        tables.review_items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_session_review_items(
        &self,
        study_session_id: StudySessionId,
        page: Page,
    ) -> Result<Vec<ReviewItem>, StorageError> {
        let tables = self.lock()?;
        let reviews = tables
            .review_items
            .values()
            .filter(|review| review.study_session_id() == study_session_id)
            .cloned();
        Ok(page.slice(reviews))
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn study_history(&self) -> Result<StudyHistory, StorageError> {
        let tables = self.lock()?;
        let total_reviews = tables.review_items.len() as u64;
        let correct_reviews = tables
            .review_items
            .values()
            .filter(|review| review.correct())
            .count() as u64;
        let active_groups: HashSet<GroupId> = tables
            .study_sessions
            .values()
            .map(StudySession::group_id)
            .collect();
        let session_days: BTreeSet<_> = tables
            .study_sessions
            .values()
            .map(|session| session.created_at().date_naive())
            .collect();

        Ok(StudyHistory {
            total_reviews,
            correct_reviews,
            total_sessions: tables.study_sessions.len() as u64,
            active_groups: active_groups.len() as u64,
            session_days: session_days.into_iter().collect(),
        })
    }

    async fn study_progress(&self) -> Result<StudyProgress, StorageError> {
        let tables = self.lock()?;
        let studied: HashSet<WordId> = tables
            .review_items
            .values()
            .map(ReviewItem::word_id)
            .collect();
        Ok(StudyProgress {
            total_words_studied: studied.len() as u64,
            total_available_words: tables.words.len() as u64,
        })
    }

    async fn last_study_session(&self) -> Result<Option<LastStudySession>, StorageError> {
        let tables = self.lock()?;
        let Some(session) = tables
            .study_sessions
            .values()
            .max_by_key(|session| (session.created_at(), session.id()))
        else {
            return Ok(None);
        };
        let group_name = tables
            .groups
            .get(&session.group_id())
            .map(|group| group.name().to_string())
            .ok_or_else(|| {
                StorageError::Serialization(format!(
                    "session {} references missing group {}",
                    session.id(),
                    session.group_id()
                ))
            })?;
        Ok(Some(LastStudySession {
            session: session.clone(),
            group_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::WordParts;
    use portal_core::time::fixed_now;

    fn word_fields(malay: &str, english: &str) -> WordFields {
        WordFields::new(malay, "جاوي", english, WordParts::default()).unwrap()
    }

    async fn seed_session(repo: &InMemoryRepository) -> (Group, StudySession) {
        let group = repo
            .insert_group(&GroupName::new("Basic Greetings").unwrap(), fixed_now())
            .await
            .unwrap();
        let activity = repo
            .insert_study_activity(&StudyActivityFields::new("Flashcards", "http://x").unwrap())
            .await
            .unwrap();
        let session = repo
            .insert_study_session(NewStudySessionRecord {
                group_id: group.id(),
                study_activity_id: activity.id(),
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        (group, session)
    }

    #[tokio::test]
    async fn lists_words_by_id_with_search() {
        let repo = InMemoryRepository::new();
        repo.insert_word(&word_fields("rumah", "house")).await.unwrap();
        repo.insert_word(&word_fields("kereta", "car")).await.unwrap();
        repo.insert_word(&word_fields("Rumput", "grass")).await.unwrap();

        let hits = repo.list_words(Some("RUM"), Page::default()).await.unwrap();
        let malay: Vec<_> = hits.iter().map(Word::malay).collect();
        assert_eq!(malay, vec!["rumah", "Rumput"]);

        let second = repo.list_words(None, Page::new(1, 1)).await.unwrap();
        assert_eq!(second[0].malay(), "kereta");
    }

    #[tokio::test]
    async fn membership_maintains_words_count() {
        let repo = InMemoryRepository::new();
        let group = repo
            .insert_group(&GroupName::new("Home").unwrap(), fixed_now())
            .await
            .unwrap();
        let word = repo.insert_word(&word_fields("rumah", "house")).await.unwrap();

        let updated = repo
            .add_word_to_group(group.id(), word.id(), fixed_now())
            .await
            .unwrap();
        assert_eq!(updated.words_count(), 1);
        let again = repo
            .add_word_to_group(group.id(), word.id(), fixed_now())
            .await
            .unwrap();
        assert_eq!(again.words_count(), 1);

        repo.delete_word(word.id()).await.unwrap();
        let refreshed = repo.get_group(group.id()).await.unwrap().unwrap();
        assert_eq!(refreshed.words_count(), 0);
    }

    #[tokio::test]
    async fn session_insert_requires_existing_references() {
        let repo = InMemoryRepository::new();
        let err = repo
            .insert_study_session(NewStudySessionRecord {
                group_id: GroupId::new(99),
                study_activity_id: StudyActivityId::new(1),
                created_at: fixed_now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::MissingReference { entity: "group", id: 99 }
        ));
        assert!(repo.list_study_sessions(Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_group_cascades_sessions_and_reviews() {
        let repo = InMemoryRepository::new();
        let (group, session) = seed_session(&repo).await;
        let word = repo.insert_word(&word_fields("rumah", "house")).await.unwrap();
        repo.insert_review_item(NewReviewItemRecord {
            word_id: word.id(),
            study_session_id: session.id(),
            correct: true,
            created_at: fixed_now(),
        })
        .await
        .unwrap();

        repo.delete_group(group.id()).await.unwrap();

        assert!(repo.get_study_session(session.id()).await.unwrap().is_none());
        let history = repo.study_history().await.unwrap();
        assert_eq!(history.total_sessions, 0);
        assert_eq!(history.total_reviews, 0);
        assert!(matches!(
            repo.delete_group(group.id()).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn last_session_carries_group_name() {
        let repo = InMemoryRepository::new();
        assert!(repo.last_study_session().await.unwrap().is_none());
        let (_, session) = seed_session(&repo).await;

        let last = repo.last_study_session().await.unwrap().unwrap();
        assert_eq!(last.session, session);
        assert_eq!(last.group_name, "Basic Greetings");
    }
}
