pub mod orchestrator;
pub mod prompt;
pub mod selector;
pub mod store;

pub use crate::domain::model::{Card, DrawResult, DrawnCard, InterpretationStatus, RequestId};
pub use crate::domain::ports::{ConfigProvider, DeckSource, Interpreter};
pub use crate::utils::error::Result;
pub use orchestrator::{DrawOrchestrator, InterpretationJob, PendingDraw};
pub use store::ResultStore;
