use portal_core::Page;
use portal_core::model::{Word, WordFields, WordId};

use super::SqliteRepository;
use super::mapping::{commit_failed, db, id_i64, map_rows, map_word_row, page_bounds};
use crate::repository::{StorageError, WordRepository};

#[async_trait::async_trait]
impl WordRepository for SqliteRepository {
    async fn insert_word(&self, fields: &WordFields) -> Result<Word, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO words (malay, jawi, english, parts)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(fields.malay())
        .bind(fields.jawi())
        .bind(fields.english())
        .bind(fields.parts().to_json_string())
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("word id sign overflow".into()))?;
        Ok(Word::new(WordId::new(id), fields.clone()))
    }

    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, malay, jawi, english, parts
            FROM words
            WHERE id = ?1
            ",
        )
        .bind(id_i64("word id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        row.as_ref().map(map_word_row).transpose()
    }

    async fn list_words(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<Word>, StorageError> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query(
            r"
            SELECT id, malay, jawi, english, parts
            FROM words
            WHERE ?1 IS NULL
               OR instr(lower(malay), lower(?1)) > 0
               OR instr(lower(jawi), lower(?1)) > 0
               OR instr(lower(english), lower(?1)) > 0
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        map_rows(&rows, map_word_row)
    }

    async fn update_word(&self, word: &Word) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE words
            SET malay = ?2, jawi = ?3, english = ?4, parts = ?5
            WHERE id = ?1
            ",
        )
        .bind(id_i64("word id", word.id().value())?)
        .bind(word.malay())
        .bind(word.jawi())
        .bind(word.english())
        .bind(word.parts().to_json_string())
        .execute(&self.pool)
        .await
        .map_err(db)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        let word_id = id_i64("word id", id.value())?;
        let mut tx = self.pool.begin().await.map_err(db)?;

        let exists = sqlx::query("SELECT 1 FROM words WHERE id = ?1")
            .bind(word_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        sqlx::query("DELETE FROM word_review_items WHERE word_id = ?1")
            .bind(word_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        sqlx::query(
            r"
            UPDATE groups
            SET words_count = words_count - 1
            WHERE id IN (SELECT group_id FROM word_groups WHERE word_id = ?1)
              AND words_count > 0
            ",
        )
        .bind(word_id)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        sqlx::query("DELETE FROM word_groups WHERE word_id = ?1")
            .bind(word_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        sqlx::query("DELETE FROM words WHERE id = ?1")
            .bind(word_id)
            .execute(&mut *tx)
            .await
            .map_err(db)?;

        tx.commit().await.map_err(commit_failed)?;
        tracing::debug!(word_id = %id, "deleted word");
        Ok(())
    }
}
