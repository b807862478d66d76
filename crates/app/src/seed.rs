use anyhow::Context;
use portal_core::Page;
use serde_json::json;
use services::{AppServices, WordDraft};

const WORDS: &[(&str, &str, &str, &str)] = &[
    ("selamat pagi", "سلامت ڤاݢي", "good morning", "phrase"),
    ("terima kasih", "تريما کاسيه", "thank you", "phrase"),
    ("makan", "ماکن", "eat", "verb"),
    ("minum", "مينوم", "drink", "verb"),
    ("rumah", "رومه", "house", "noun"),
    ("buku", "بوکو", "book", "noun"),
];

/// Insert a small demo data set. A database that already holds words is left alone.
///
/// # Errors
///
/// Fails on the first service error.
pub async fn run(services: &AppServices) -> anyhow::Result<()> {
    let words = services.words();
    if !words.list_words(None, Page::new(1, 0)).await?.is_empty() {
        tracing::info!("database already has words, skipping seed");
        return Ok(());
    }

    let groups = services.groups();
    let greetings = groups.create_group("Basic Greetings".into()).await?;
    let everyday = groups.create_group("Everyday Words".into()).await?;

    let mut created = Vec::with_capacity(WORDS.len());
    for (malay, jawi, english, kind) in WORDS {
        let word = words
            .create_word(WordDraft {
                malay: (*malay).into(),
                jawi: (*jawi).into(),
                english: (*english).into(),
                parts: json!({ "type": kind }),
            })
            .await
            .with_context(|| format!("seeding word {malay}"))?;
        let group = if *kind == "phrase" { &greetings } else { &everyday };
        groups.add_word(group.id(), word.id()).await?;
        created.push(word);
    }

    let activities = services.study_activities();
    let flashcards = activities
        .create_activity("Flashcards".into(), "http://localhost:8081".into())
        .await?;
    activities
        .create_activity("Typing Tutor".into(), "http://localhost:8082".into())
        .await?;

    let sessions = services.study_sessions();
    let session = sessions.create_session(greetings.id(), flashcards.id()).await?;
    for (index, word) in created.iter().take(2).enumerate() {
        sessions.record_review(session.id(), word.id(), index == 0).await?;
    }

    tracing::info!(
        words = created.len(),
        groups = 2,
        study_session_id = %session.id(),
        "seeded demo data"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use portal_core::time::fixed_now;
    use services::Clock;

    #[tokio::test]
    async fn seeding_twice_is_a_no_op() {
        let services = AppServices::in_memory(Clock::fixed(fixed_now()));
        run(&services).await.unwrap();
        run(&services).await.unwrap();

        let groups = services.groups().list_groups(Page::default()).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].words_count(), 2);
        assert_eq!(groups[1].words_count(), 4);

        let stats = services.dashboard().quick_stats().await.unwrap();
        assert_eq!(stats.total_study_sessions, 1);
        assert_eq!(stats.success_rate, 50.0);
    }
}
