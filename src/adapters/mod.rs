// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod completion;
pub mod deck;

use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub use completion::{OpenAiCompletions, PlaceholderInterpreter};
pub use deck::TarotApiDeck;

/// Shared outbound client. The timeout bounds every deck fetch and every
/// background completion call.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("tarot-reader/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
