//! In-memory section collection backing the editing session.
//!
//! `SectionStore` owns the ordered sections, the current selection and the
//! global settings. Every operation is total: missing ids and out-of-range
//! indices are absorbed as no-ops rather than reported as errors.
//!
//! Whenever the collection is non-empty the selection names a live section.
//! Operations that insert, remove, merge or reset repair the selection
//! themselves. `set_selected_section_id` is an unchecked setter; keeping it
//! pointed at a live id is up to the caller.

use tracing::{debug, trace};

use super::model::{GlobalSetting, GlobalSettings, ProjectState, Section, SectionPatch, VoiceSettings};
use crate::error::{CutError, CutResult};
use crate::segmenter::{self, ScriptStats, SegmentConfig};

/// Ordered collection of sections plus selection and global settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionStore {
    sections: Vec<Section>,
    selected_section_id: String,
    global_settings: GlobalSettings,
}

impl SectionStore {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates an empty store with default global settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a project from a script.
    ///
    /// Rejects scripts shorter than [`segmenter::MIN_SCRIPT_CHARS`] and scripts
    /// that segment into nothing.
    pub fn from_script(script: &str) -> CutResult<Self> {
        Self::from_script_with(script, &SegmentConfig::default())
    }

    /// Like [`SectionStore::from_script`], with an explicit segmentation config.
    pub fn from_script_with(script: &str, config: &SegmentConfig) -> CutResult<Self> {
        let stats = ScriptStats::of(script);
        if !stats.is_valid() {
            return Err(CutError::script_too_short(
                stats.trimmed_char_count,
                segmenter::MIN_SCRIPT_CHARS,
            ));
        }

        let sections = segmenter::sections_from_script_with(script, config);
        if sections.is_empty() {
            return Err(CutError::empty_script());
        }

        let mut store = Self::new();
        store.set_sections(sections);
        Ok(store)
    }

    /// Restores a store from a persisted snapshot.
    ///
    /// The saved selection is kept when it names a live section.
    pub fn from_state(state: ProjectState) -> Self {
        let mut store = Self::new();
        store.set_global_settings(state.global_settings);
        if store_has(&state.sections, &state.selected_section_id) {
            store.selected_section_id = state.selected_section_id;
        }
        store.set_sections(state.sections);
        store
    }

    /// Snapshot of the full state, for persistence.
    pub fn to_state(&self) -> ProjectState {
        ProjectState {
            sections: self.sections.clone(),
            selected_section_id: self.selected_section_id.clone(),
            global_settings: self.global_settings.clone(),
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    /// Sections in playback order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Gets a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Position of a section in playback order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Selected section id, empty when nothing is selected.
    pub fn selected_section_id(&self) -> &str {
        &self.selected_section_id
    }

    /// The selected section, if the selection names a live one.
    pub fn selected_section(&self) -> Option<&Section> {
        self.section(&self.selected_section_id)
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.global_settings
    }

    /// Sum of per-section duration estimates, in seconds.
    pub fn estimated_total_duration_secs(&self) -> u64 {
        self.sections
            .iter()
            .map(Section::estimated_duration_secs)
            .sum()
    }

    // =========================================================================
    // SECTION OPERATIONS
    // =========================================================================

    /// Replaces the whole collection, keeping the given order.
    ///
    /// Selects the first section when nothing live is selected. Global
    /// settings are untouched.
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        debug!(count = sections.len(), "replacing sections");
        self.sections = sections;
        self.repair_selection();
    }

    /// Merges `patch` into the section with the given id. Missing id is a no-op.
    pub fn update_section(&mut self, id: &str, patch: SectionPatch) {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => patch.apply(section),
            None => trace!(section_id = id, "update skipped: no such section"),
        }
    }

    /// Applies `f` to the section's effective voice settings and stores the
    /// result. Missing id is a no-op.
    pub fn update_voice_settings<F>(&mut self, id: &str, f: F)
    where
        F: FnOnce(&mut VoiceSettings),
    {
        if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
            let mut voice = section.effective_voice_settings();
            f(&mut voice);
            section.voice_settings = Some(voice.with_speed(voice.speed));
        } else {
            trace!(section_id = id, "voice update skipped: no such section");
        }
    }

    /// Appends a section. Id uniqueness is the caller's responsibility.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
        self.repair_selection();
    }

    /// Appends a section with a generated id and a positional title.
    /// Returns the new id.
    pub fn add_new_section(&mut self, text: impl Into<String>) -> String {
        let title = format!("Section {}", self.sections.len() + 1);
        let section = Section::with_generated_id(text).with_title(title);
        let id = section.id.clone();
        self.add_section(section);
        id
    }

    /// Removes a section. If it was selected, the first remaining section
    /// becomes selected (or nothing, when the collection is now empty).
    pub fn remove_section(&mut self, id: &str) {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        if self.sections.len() == before {
            trace!(section_id = id, "remove skipped: no such section");
            return;
        }

        debug!(section_id = id, remaining = self.sections.len(), "removed section");
        if self.selected_section_id == id {
            self.selected_section_id = self
                .sections
                .first()
                .map(|s| s.id.clone())
                .unwrap_or_default();
        }
    }

    /// Merges a section into its predecessor.
    ///
    /// The result keeps the predecessor's id, title, image and voice settings;
    /// its text is both texts joined by one space. No-op for the first section
    /// or an unknown id. Returns whether a merge happened.
    pub fn merge_sections(&mut self, id: &str) -> bool {
        let index = match self.position(id) {
            Some(index) if index > 0 => index,
            _ => {
                trace!(section_id = id, "merge skipped: no predecessor");
                return false;
            }
        };

        let target = self.sections.remove(index);
        let previous = &mut self.sections[index - 1];
        previous.text = format!("{} {}", previous.text.trim(), target.text.trim())
            .trim()
            .to_string();
        debug!(section_id = id, into = %previous.id, "merged section");

        if self.selected_section_id == target.id {
            self.selected_section_id = previous.id.clone();
        }
        true
    }

    /// Moves the section at `from` so it ends up at index `to`.
    /// Out-of-range or equal indices are a no-op.
    pub fn move_section(&mut self, from: usize, to: usize) {
        let len = self.sections.len();
        if from >= len || to >= len || from == to {
            trace!(from, to, len, "move skipped");
            return;
        }
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Sets the selection without checking it.
    pub fn set_selected_section_id(&mut self, id: impl Into<String>) {
        self.selected_section_id = id.into();
    }

    /// Selects the next section in order. Returns whether the selection moved.
    pub fn select_next(&mut self) -> bool {
        match self.position(&self.selected_section_id) {
            Some(index) if index + 1 < self.sections.len() => {
                self.selected_section_id = self.sections[index + 1].id.clone();
                true
            }
            _ => false,
        }
    }

    /// Selects the previous section in order. Returns whether the selection moved.
    pub fn select_previous(&mut self) -> bool {
        match self.position(&self.selected_section_id) {
            Some(index) if index > 0 => {
                self.selected_section_id = self.sections[index - 1].id.clone();
                true
            }
            _ => false,
        }
    }

    /// Points the selection at the first section when it is empty or stale,
    /// and clears it when there are no sections.
    fn repair_selection(&mut self) {
        if store_has(&self.sections, &self.selected_section_id) {
            return;
        }
        let repaired = self
            .sections
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_default();
        if repaired != self.selected_section_id {
            debug!(from = %self.selected_section_id, to = %repaired, "repaired selection");
            self.selected_section_id = repaired;
        }
    }

    // =========================================================================
    // GLOBAL SETTINGS
    // =========================================================================

    /// Replaces the global settings wholesale.
    pub fn set_global_settings(&mut self, settings: GlobalSettings) {
        self.global_settings = settings;
    }

    /// Updates one global setting.
    pub fn update_global_setting(&mut self, setting: GlobalSetting) {
        self.global_settings.apply(setting);
    }

    /// Clears sections and selection and restores default global settings.
    pub fn reset(&mut self) {
        debug!("resetting store");
        *self = Self::default();
    }
}

fn store_has(sections: &[Section], id: &str) -> bool {
    !id.is_empty() && sections.iter().any(|s| s.id == id)
}

// =============================================================================
// TESTS
// =============================================================================
