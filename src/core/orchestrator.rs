use crate::core::prompt;
use crate::core::selector;
use crate::core::store::ResultStore;
use crate::domain::model::{DrawResult, InterpretationStatus, RequestId, CARDS_PER_DRAW};
use crate::domain::ports::{DeckSource, Interpreter};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A finished draw plus the interpretation work that still has to run.
///
/// Nothing happens in the background until `job.spawn()` is called, so the
/// caller can hand the cards out first.
#[derive(Debug)]
pub struct PendingDraw {
    pub draw: DrawResult,
    pub job: InterpretationJob,
}

/// Everything the background task needs, owned so it can outlive the request.
#[derive(Debug, Clone)]
struct ReadingJob {
    request_id: RequestId,
    user_story: String,
    user_name: String,
    card_names: Vec<String>,
}

/// Interpretation of one draw, not yet started.
pub struct InterpretationJob {
    interpreter: Arc<dyn Interpreter>,
    store: Arc<ResultStore>,
    reading: ReadingJob,
}

impl std::fmt::Debug for InterpretationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpretationJob")
            .field("request_id", &self.reading.request_id)
            .field("card_names", &self.reading.card_names)
            .finish()
    }
}

impl InterpretationJob {
    pub fn request_id(&self) -> RequestId {
        self.reading.request_id
    }

    /// Marks the entry pending and starts the task.
    ///
    /// Dropping the returned handle detaches the task: it runs to completion
    /// or failure, and its only output is what it writes into the store.
    pub fn spawn(self) -> JoinHandle<()> {
        self.store.mark_pending(self.reading.request_id);
        tokio::spawn(interpret_reading(self.interpreter, self.store, self.reading))
    }
}

pub struct DrawOrchestrator {
    deck: Arc<dyn DeckSource>,
    interpreter: Arc<dyn Interpreter>,
    store: Arc<ResultStore>,
}

impl DrawOrchestrator {
    pub fn new(
        deck: Arc<dyn DeckSource>,
        interpreter: Arc<dyn Interpreter>,
        store: Arc<ResultStore>,
    ) -> Self {
        Self {
            deck,
            interpreter,
            store,
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Draws three cards and prepares their interpretation.
    ///
    /// The only awaited I/O is the deck fetch; a failed fetch or a deck
    /// without enough distinct cards fails the whole draw before any request
    /// id is issued. The store is untouched until the returned job is spawned.
    pub async fn begin_draw(&self, user_story: &str, user_name: &str) -> Result<PendingDraw> {
        let deck = self.deck.fetch_deck().await?;

        let cards = {
            let mut rng = rand::thread_rng();
            selector::draw_cards(&deck, CARDS_PER_DRAW, &mut rng)?
        };

        let draw = DrawResult {
            request_id: Uuid::new_v4(),
            cards,
        };

        tracing::info!(
            request_id = %draw.request_id,
            cards = ?draw.display_names(),
            "Cards drawn"
        );

        let job = InterpretationJob {
            interpreter: Arc::clone(&self.interpreter),
            store: Arc::clone(&self.store),
            reading: ReadingJob {
                request_id: draw.request_id,
                user_story: user_story.to_string(),
                user_name: user_name.to_string(),
                card_names: draw.display_names(),
            },
        };

        Ok(PendingDraw { draw, job })
    }

    /// Interpretation text for `id`. `None` covers unknown ids, readings
    /// still being computed and readings that failed.
    pub fn fetch_interpretation(&self, id: &RequestId) -> Option<String> {
        self.store.get(id)
    }

    pub fn interpretation_status(&self, id: &RequestId) -> InterpretationStatus {
        self.store.status(id)
    }

    pub fn failure_reason(&self, id: &RequestId) -> Option<String> {
        self.store.failure_reason(id)
    }
}

async fn interpret_reading(
    interpreter: Arc<dyn Interpreter>,
    store: Arc<ResultStore>,
    job: ReadingJob,
) {
    let prompt = prompt::build_reading_prompt(&job.user_name, &job.card_names, &job.user_story);

    match interpreter.interpret(&prompt).await {
        Ok(raw) => {
            let text = prompt::clean_interpretation(&raw);
            tracing::info!(
                request_id = %job.request_id,
                chars = text.len(),
                "Interpretation stored"
            );
            store.set(job.request_id, text);
        }
        Err(e) => {
            tracing::warn!(
                request_id = %job.request_id,
                error = %e,
                "Interpretation failed, no reading will be stored"
            );
            store.mark_failed(job.request_id, e.to_string());
        }
    }
}
