use crate::domain::model::Card;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait DeckSource: Send + Sync {
    async fn fetch_deck(&self) -> Result<Vec<Card>>;
}

/// Turns a reading prompt into model-generated text.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, prompt: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn api_key(&self) -> Option<&str>;
    fn testing_mode(&self) -> bool;
    fn deck_endpoint(&self) -> &str;
    fn completion_endpoint(&self) -> &str;
    fn completion_model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn request_timeout(&self) -> Duration;
    /// `None` keeps interpretations for the life of the process.
    fn interpretation_ttl(&self) -> Option<Duration>;
}
