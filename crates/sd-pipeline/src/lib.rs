//! Retrieval and decision pipeline for the service-desk deflection core.
//!
//! Pure scoring and decision logic lives in the leaf modules (`text`,
//! `intent`, `retrieve`, `merge`, `judge`, `compose`); dataset I/O in
//! `store`; the [`pipeline::AskPipeline`] ties them together and is shared
//! by the local fallback path and the tool provider.

pub mod compose;
pub mod enhance;
pub mod error;
pub mod intent;
pub mod judge;
pub mod merge;
pub mod metrics;
pub mod pipeline;
pub mod retrieve;
pub mod store;
pub mod text;

pub use compose::AnswerEnhancer;
pub use enhance::{EnhancerConfig, GenerativeEnhancer};
pub use error::{StoreError, StoreResult};
pub use pipeline::{AskOrigin, AskPipeline};
pub use store::{InteractionLog, KnowledgeStore};
