//! Section collection module.
//!
//! - `model`: Section, VoiceSettings, GlobalSettings and the persisted ProjectState
//! - `store`: SectionStore, the in-memory collection the editor mutates
//! - `document`: ProjectDocument, Automerge persistence and sync for a store
//! - `payload`: RenderPayload handed to the render service
//! - `wasm`: WASM bindings for browser usage (JsSectionStore)

pub mod document;
pub mod model;
pub mod payload;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::ProjectDocument;
pub use model::*;
pub use payload::{ImageAttachment, RenderPayload, RenderSegment, RenderSettings};
pub use store::SectionStore;

#[cfg(feature = "wasm")]
pub use wasm::JsSectionStore;
