//! Wire types for the HTTP API.

use crate::domain::model::{DrawResult, DrawnCard, InterpretationStatus, RequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string of `GET /cards`. Both parameters may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct DrawQuery {
    #[serde(default)]
    pub userstory: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnCardResponse {
    pub name: String,
    #[serde(rename = "type")]
    pub arcana: String,
    pub meaning_up: String,
    pub meaning_rev: String,
    pub desc: String,
    pub image_file_name: String,
    pub reversed: bool,
}

impl From<&DrawnCard> for DrawnCardResponse {
    fn from(drawn: &DrawnCard) -> Self {
        Self {
            name: drawn.display_name(),
            arcana: drawn.card.arcana.clone(),
            meaning_up: drawn.card.meaning_up.clone(),
            meaning_rev: drawn.card.meaning_rev.clone(),
            desc: drawn.card.desc.clone(),
            image_file_name: drawn.image_file_name(),
            reversed: drawn.reversed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    pub cards: Vec<DrawnCardResponse>,
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
}

impl From<&DrawResult> for DrawResponse {
    fn from(draw: &DrawResult) -> Self {
        Self {
            cards: draw.cards.iter().map(DrawnCardResponse::from).collect(),
            request_id: draw.request_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationResponse {
    pub interpretation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationStatusResponse {
    #[serde(rename = "requestID")]
    pub request_id: String,
    pub status: InterpretationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Why the interpretation failed; only set for `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}
