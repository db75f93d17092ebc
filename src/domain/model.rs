use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of cards in one reading.
pub const CARDS_PER_DRAW: usize = 3;

pub const REVERSED_SUFFIX: &str = " (Reversed)";

/// Correlates a draw response with its later interpretation.
pub type RequestId = Uuid;

/// A card record as served by the deck source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(rename = "type", default)]
    pub arcana: String,
    #[serde(default)]
    pub meaning_up: String,
    #[serde(default)]
    pub meaning_rev: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub name_short: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnCard {
    pub card: Card,
    pub reversed: bool,
}

impl DrawnCard {
    pub fn new(card: Card, reversed: bool) -> Self {
        Self { card, reversed }
    }

    /// Card name with the reversal marker appended when reversed.
    pub fn display_name(&self) -> String {
        if self.reversed {
            format!("{}{}", self.card.name, REVERSED_SUFFIX)
        } else {
            self.card.name.clone()
        }
    }

    pub fn image_file_name(&self) -> String {
        format!("{}.jpg", self.card.name_short)
    }
}

/// Cards handed back to the caller together with the identifier under which
/// the interpretation will appear.
#[derive(Debug, Clone)]
pub struct DrawResult {
    pub request_id: RequestId,
    pub cards: Vec<DrawnCard>,
}

impl DrawResult {
    pub fn display_names(&self) -> Vec<String> {
        self.cards.iter().map(DrawnCard::display_name).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpretationStatus {
    Pending,
    Ready,
    Failed,
    Unknown,
}
