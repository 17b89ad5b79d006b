//! scriptcut - Script segmentation and section state for short-form video projects.
//!
//! A script is split once, at project creation, into short sections. The
//! sections then live in a [`SectionStore`] that the editor mutates
//! (attach images, tune voice settings, reorder, merge) and that feeds the
//! render service:
//!
//! - **Segmenter**: pure function from script text to ordered chunks, split at
//!   sentence, comma and word boundaries down to a soft 30-character limit
//!   (a single longer word is kept whole)
//! - **SectionStore**: ordered sections, the current selection and global settings
//! - **ProjectDocument**: Automerge persistence and sync for a store
//! - **RenderPayload**: the ordered, validated request for the render service
//!
//! # Example
//!
//! ```rust
//! use scriptcut::{segment, SectionPatch, SectionStore};
//!
//! assert_eq!(
//!     segment("Hello world. This is a test!"),
//!     vec!["Hello world", "This is a test"]
//! );
//!
//! let script = "Welcome to the demo. Today we look at the dashboard. \
//!               Then we create a project.";
//! let mut store = SectionStore::from_script(script).unwrap();
//! assert_eq!(store.len(), 3);
//! assert_eq!(store.selected_section_id(), "1");
//!
//! store.update_section("2", SectionPatch::new().image("https://example.com/dash.png"));
//! store.set_selected_section_id("2");
//! store.merge_sections("2");
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.sections()[0].text, "Welcome to the demo Today we look at the dashboard");
//! assert_eq!(store.selected_section_id(), "1");
//! ```

pub mod error;
pub mod segmenter;

// Sections module
pub mod sections;

// Re-exports for convenience
pub use error::{CutError, CutResult};
pub use segmenter::{
    sections_from_script, segment, segment_with, ScriptStats, SegmentConfig, DEFAULT_MAX_CHARS,
    MIN_SCRIPT_CHARS,
};
pub use sections::{
    GlobalSetting, GlobalSettings, ProjectDocument, ProjectState, RenderPayload, Section,
    SectionPatch, SectionStore, VoiceSettings,
};

#[cfg(feature = "wasm")]
pub use sections::JsSectionStore;
