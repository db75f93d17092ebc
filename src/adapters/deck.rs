use crate::domain::model::Card;
use crate::domain::ports::DeckSource;
use crate::utils::error::{Result, TarotError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_DECK_ENDPOINT: &str = "https://tarotapi.dev/api/v1/cards";

#[derive(Debug, Deserialize)]
struct DeckResponse {
    cards: Vec<Card>,
}

/// Deck source backed by the public tarot card API.
pub struct TarotApiDeck {
    client: Client,
    endpoint: String,
}

impl TarotApiDeck {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DeckSource for TarotApiDeck {
    async fn fetch_deck(&self) -> Result<Vec<Card>> {
        tracing::debug!("Fetching deck from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        tracing::debug!("Deck response status: {}", status);

        if !status.is_success() {
            return Err(TarotError::UpstreamStatusError {
                service: "deck source".to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let deck: DeckResponse = serde_json::from_str(&body)?;

        tracing::debug!("Fetched {} cards", deck.cards.len());
        Ok(deck.cards)
    }
}
