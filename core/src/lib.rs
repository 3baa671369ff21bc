//! Raildesk core — the complaint intake-and-classification pipeline.
//!
//! Free-text passenger complaints come in; an urgency verdict, an empathetic
//! reply (model-generated, or a deterministic fallback when the model is
//! down), and append-only JSON log records come out. The HTTP layer and the
//! terminal client live in sibling crates and only touch the types exported
//! here.

pub mod classify;
pub mod error;
pub mod escalation;
pub mod handler;
pub mod llm;
pub mod records;
pub mod stats;
pub mod store;
