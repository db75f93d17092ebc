// Application layer: assembles adapters and core components from configuration.

use crate::adapters::{build_http_client, OpenAiCompletions, PlaceholderInterpreter, TarotApiDeck};
use crate::core::{ConfigProvider, DrawOrchestrator, Interpreter, ResultStore};
use crate::utils::error::{Result, TarotError};
use std::sync::Arc;

/// Picks the interpreter for this process. The placeholder is only used
/// when testing mode is switched on explicitly.
pub fn build_interpreter<C: ConfigProvider + ?Sized>(
    config: &C,
    client: reqwest::Client,
) -> Result<Arc<dyn Interpreter>> {
    if config.testing_mode() {
        tracing::warn!("Testing mode enabled: interpretations are placeholders and the completion source is never called");
        return Ok(Arc::new(PlaceholderInterpreter));
    }

    let api_key = config.api_key().ok_or_else(|| TarotError::MissingConfigError {
        field: "API_KEY".to_string(),
    })?;

    Ok(Arc::new(
        OpenAiCompletions::new(client, config.completion_endpoint(), api_key)
            .with_model(config.completion_model())
            .with_max_tokens(config.max_tokens()),
    ))
}

pub fn build_orchestrator<C: ConfigProvider + ?Sized>(config: &C) -> Result<DrawOrchestrator> {
    let client = build_http_client(config.request_timeout())?;
    let deck = Arc::new(TarotApiDeck::new(client.clone(), config.deck_endpoint()));
    let interpreter = build_interpreter(config, client)?;

    Ok(DrawOrchestrator::new(
        deck,
        interpreter,
        Arc::new(ResultStore::new()),
    ))
}
