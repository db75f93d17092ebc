use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tarot_reader::adapters::completion::PLACEHOLDER_INTERPRETATION;
use tarot_reader::adapters::PlaceholderInterpreter;
use tarot_reader::core::{Card, DeckSource, InterpretationStatus, Interpreter};
use tarot_reader::{DrawOrchestrator, ResultStore, Result, TarotError};
use tokio::sync::Semaphore;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

struct StaticDeck(Vec<Card>);

#[async_trait]
impl DeckSource for StaticDeck {
    async fn fetch_deck(&self) -> Result<Vec<Card>> {
        Ok(self.0.clone())
    }
}

struct UnreachableDeck;

#[async_trait]
impl DeckSource for UnreachableDeck {
    async fn fetch_deck(&self) -> Result<Vec<Card>> {
        Err(TarotError::UpstreamStatusError {
            service: "deck source".to_string(),
            status: 502,
        })
    }
}

/// Wraps the prompt in brackets so the stored text shows which prompt it
/// came from and that cleaning ran.
struct EchoInterpreter;

#[async_trait]
impl Interpreter for EchoInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        tokio::task::yield_now().await;
        Ok(format!("\n[{}]", prompt))
    }
}

/// Holds every call until a permit is released.
struct GatedInterpreter {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl Interpreter for GatedInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String> {
        let _permit = self.gate.acquire().await.expect("gate closed");
        Ok("[The Fool] invites a [leap] of faith".to_string())
    }
}

struct FailingInterpreter;

#[async_trait]
impl Interpreter for FailingInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String> {
        Err(TarotError::EmptyCompletionError)
    }
}

fn card(name: &str, short: &str) -> Card {
    Card {
        name: name.to_string(),
        arcana: "major".to_string(),
        meaning_up: format!("{} upright", name),
        meaning_rev: format!("{} reversed", name),
        desc: format!("Description of {}", name),
        name_short: short.to_string(),
    }
}

fn full_deck() -> Vec<Card> {
    (0..78)
        .map(|i| card(&format!("Card {}", i), &format!("c{:02}", i)))
        .collect()
}

fn orchestrator(deck: impl DeckSource + 'static, interpreter: impl Interpreter + 'static) -> DrawOrchestrator {
    DrawOrchestrator::new(
        Arc::new(deck),
        Arc::new(interpreter),
        Arc::new(ResultStore::new()),
    )
}

#[tokio::test]
async fn test_every_draw_has_three_distinct_cards() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), PlaceholderInterpreter);

    for _ in 0..50 {
        let pending = assert_ok!(orchestrator.begin_draw("", "").await);
        assert_eq!(pending.draw.cards.len(), 3);

        let names: HashSet<_> = pending.draw.cards.iter().map(|c| c.card.name.clone()).collect();
        assert_eq!(names.len(), 3);

        pending.job.spawn().await.unwrap();
    }
}

#[tokio::test]
async fn test_three_card_deck_draws_all_cards() {
    let deck = vec![
        card("The Sun", "ar19"),
        card("The Moon", "ar18"),
        card("The Star", "ar17"),
    ];
    let orchestrator = orchestrator(StaticDeck(deck), PlaceholderInterpreter);

    let pending = assert_ok!(orchestrator.begin_draw("", "").await);

    let mut names: Vec<_> = pending.draw.cards.iter().map(|c| c.card.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["The Moon", "The Star", "The Sun"]);
}

#[tokio::test]
async fn test_interpretation_not_visible_until_complete() {
    let gate = Arc::new(Semaphore::new(0));
    let orchestrator = orchestrator(
        StaticDeck(full_deck()),
        GatedInterpreter {
            gate: Arc::clone(&gate),
        },
    );

    let pending = assert_ok!(orchestrator.begin_draw("Will I move house?", "Ada").await);
    let id = pending.draw.request_id;
    let task = pending.job.spawn();

    assert_eq!(orchestrator.fetch_interpretation(&id), None);
    assert_eq!(
        orchestrator.interpretation_status(&id),
        InterpretationStatus::Pending
    );

    gate.add_permits(1);
    task.await.unwrap();

    assert_eq!(
        orchestrator.fetch_interpretation(&id).as_deref(),
        Some("The Fool invites a leap of faith")
    );
    assert_eq!(
        orchestrator.interpretation_status(&id),
        InterpretationStatus::Ready
    );
}

#[tokio::test]
async fn test_draw_starts_no_work_until_job_is_spawned() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), PlaceholderInterpreter);

    let pending = assert_ok!(orchestrator.begin_draw("A story", "Ada").await);
    let id = pending.draw.request_id;
    assert_eq!(pending.job.request_id(), id);

    tokio::task::yield_now().await;
    assert!(orchestrator.store().is_empty());
    assert_eq!(
        orchestrator.interpretation_status(&id),
        InterpretationStatus::Unknown
    );

    pending.job.spawn().await.unwrap();

    assert_eq!(
        orchestrator.fetch_interpretation(&id).as_deref(),
        Some(PLACEHOLDER_INTERPRETATION)
    );
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), PlaceholderInterpreter);
    let id = Uuid::new_v4();

    assert_eq!(orchestrator.fetch_interpretation(&id), None);
    assert_eq!(
        orchestrator.interpretation_status(&id),
        InterpretationStatus::Unknown
    );
}

#[tokio::test]
async fn test_testing_mode_stores_placeholder() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), PlaceholderInterpreter);

    for _ in 0..5 {
        let pending = assert_ok!(orchestrator.begin_draw("A story", "Ada").await);
        let id = pending.draw.request_id;
        pending.job.spawn().await.unwrap();

        assert_eq!(
            orchestrator.fetch_interpretation(&id).as_deref(),
            Some(PLACEHOLDER_INTERPRETATION)
        );
    }
}

#[tokio::test]
async fn test_failed_interpretation_stays_absent() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), FailingInterpreter);

    let pending = assert_ok!(orchestrator.begin_draw("A story", "Ada").await);
    let id = pending.draw.request_id;
    pending.job.spawn().await.unwrap();

    assert_eq!(orchestrator.fetch_interpretation(&id), None);
    assert_eq!(
        orchestrator.interpretation_status(&id),
        InterpretationStatus::Failed
    );
    assert_eq!(
        orchestrator.failure_reason(&id).as_deref(),
        Some("Completion response contained no choices")
    );
}

#[tokio::test]
async fn test_deck_failure_fails_draw_without_touching_store() {
    let orchestrator = orchestrator(UnreachableDeck, PlaceholderInterpreter);

    let err = assert_err!(orchestrator.begin_draw("A story", "Ada").await);

    assert!(matches!(err, TarotError::UpstreamStatusError { status: 502, .. }));
    assert!(orchestrator.store().is_empty());
}

#[tokio::test]
async fn test_small_deck_fails_fast() {
    let deck = vec![card("The Sun", "ar19"), card("The Moon", "ar18")];
    let orchestrator = orchestrator(StaticDeck(deck), PlaceholderInterpreter);

    let err = assert_err!(orchestrator.begin_draw("", "").await);

    assert!(matches!(err, TarotError::InsufficientDeckError { .. }));
    assert!(orchestrator.store().is_empty());
}

#[tokio::test]
async fn test_stored_text_has_no_brackets() {
    let orchestrator = orchestrator(StaticDeck(full_deck()), EchoInterpreter);

    let pending = assert_ok!(orchestrator.begin_draw("[weird] story", "Ada").await);
    let id = pending.draw.request_id;
    pending.job.spawn().await.unwrap();

    let text = orchestrator.fetch_interpretation(&id).unwrap();
    assert!(!text.contains('['));
    assert!(!text.contains(']'));
    assert!(text.contains("'weird story'"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_draws_do_not_cross_contaminate() {
    let orchestrator = Arc::new(orchestrator(StaticDeck(full_deck()), EchoInterpreter));

    let mut draws = Vec::new();
    for i in 0..25 {
        let orchestrator = Arc::clone(&orchestrator);
        draws.push(tokio::spawn(async move {
            let story = format!("story-{}", i);
            let name = format!("querent-{}", i);
            let pending = orchestrator.begin_draw(&story, &name).await.unwrap();
            let names = pending.draw.display_names();
            let id = pending.draw.request_id;
            pending.job.spawn().await.unwrap();
            (i, id, names)
        }));
    }

    let mut ids = HashSet::new();
    for draw in draws {
        let (i, id, names) = draw.await.unwrap();
        assert!(ids.insert(id), "request id reused");

        let text = orchestrator.fetch_interpretation(&id).unwrap();
        assert!(text.contains(&format!("'story-{}'", i)));
        assert!(text.contains(&format!("reading for querent-{},", i)));
        for name in names {
            assert!(text.contains(&name), "missing {} in {}", name, text);
        }
    }
}
