//! WASM bindings for the section store.
//!
//! JavaScript-friendly wrapper around `SectionStore`, with document
//! persistence through `ProjectDocument` for saving into browser storage.

use js_sys::{Array, Uint8Array};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use super::document::ProjectDocument;
use super::model::{GlobalSetting, GlobalSettings, Section, SectionPatch};
use super::payload::RenderPayload;
use super::store::SectionStore;
use crate::error::CutError;
use crate::segmenter;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<CutError> for JsValue {
    fn from(err: CutError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: CutError| JsValue::from(e))
    };
}

/// Segments a script without creating a store.
///
/// # Example (JavaScript)
/// ```js
/// segment("Hello world. This is a test!"); // ["Hello world", "This is a test"]
/// ```
#[wasm_bindgen]
pub fn segment(script: &str) -> Array {
    segmenter::segment(script)
        .iter()
        .map(|s| JsValue::from_str(s))
        .collect()
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around SectionStore.
#[wasm_bindgen]
pub struct JsSectionStore {
    inner: SectionStore,
}

#[wasm_bindgen]
impl JsSectionStore {
    /// Creates a new empty store.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsSectionStore {
        JsSectionStore {
            inner: SectionStore::new(),
        }
    }

    /// Starts a project from a script. Throws when the script is too short or
    /// yields no sections.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const store = JsSectionStore.fromScript(scriptText);
    /// ```
    #[wasm_bindgen(js_name = fromScript)]
    pub fn from_script(script: &str) -> Result<JsSectionStore, JsValue> {
        let inner = js_result!(SectionStore::from_script(script))?;
        Ok(JsSectionStore { inner })
    }

    /// Loads from saved document bytes (Uint8Array).
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: &[u8]) -> Result<JsSectionStore, JsValue> {
        let mut doc = js_result!(ProjectDocument::from_bytes(bytes))?;
        let inner = js_result!(doc.to_store())?;
        Ok(JsSectionStore { inner })
    }

    /// Saves to document bytes (returns Uint8Array).
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&self) -> Result<Uint8Array, JsValue> {
        let mut doc = js_result!(ProjectDocument::from_store(&self.inner))?;
        let bytes = doc.save();
        Ok(Uint8Array::from(&bytes[..]))
    }

    /// Gets the full state as `{ sections, selectedSectionId, globalSettings }`.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.to_state())?)
    }

    /// Total estimated duration in seconds.
    #[wasm_bindgen(js_name = estimatedDuration)]
    pub fn estimated_duration(&self) -> f64 {
        self.inner.estimated_total_duration_secs() as f64
    }
}

// =============================================================================
// SECTION METHODS
// =============================================================================

#[wasm_bindgen]
impl JsSectionStore {
    /// Replaces all sections.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.setSections([{ id: '1', title: 'Section 1', text: 'Hi' }]);
    /// ```
    #[wasm_bindgen(js_name = setSections)]
    pub fn set_sections(&mut self, sections: JsValue) -> Result<(), JsValue> {
        let sections: Vec<Section> = from_value(sections)?;
        self.inner.set_sections(sections);
        Ok(())
    }

    /// Patches a section. `null` for `image` or `voiceSettings` clears it.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.updateSection('2', { image: dataUrl });
    /// store.updateSection('2', { image: null });
    /// ```
    #[wasm_bindgen(js_name = updateSection)]
    pub fn update_section(&mut self, id: &str, patch: JsValue) -> Result<(), JsValue> {
        let patch: SectionPatch = from_value(patch)?;
        self.inner.update_section(id, patch);
        Ok(())
    }

    /// Appends a section object.
    #[wasm_bindgen(js_name = addSection)]
    pub fn add_section(&mut self, section: JsValue) -> Result<(), JsValue> {
        let section: Section = from_value(section)?;
        self.inner.add_section(section);
        Ok(())
    }

    /// Appends a section with a generated id; returns the id.
    #[wasm_bindgen(js_name = addNewSection)]
    pub fn add_new_section(&mut self, text: &str) -> String {
        self.inner.add_new_section(text)
    }

    #[wasm_bindgen(js_name = removeSection)]
    pub fn remove_section(&mut self, id: &str) {
        self.inner.remove_section(id);
    }

    /// Merges a section into its predecessor; returns whether anything changed.
    #[wasm_bindgen(js_name = mergeSections)]
    pub fn merge_sections(&mut self, id: &str) -> bool {
        self.inner.merge_sections(id)
    }

    #[wasm_bindgen(js_name = moveSection)]
    pub fn move_section(&mut self, from: usize, to: usize) {
        self.inner.move_section(from, to);
    }

    /// Gets the section ids in order.
    #[wasm_bindgen(js_name = getOrder)]
    pub fn get_order(&self) -> Array {
        self.inner
            .sections()
            .iter()
            .map(|s| JsValue::from_str(&s.id))
            .collect()
    }
}

// =============================================================================
// SELECTION AND SETTINGS METHODS
// =============================================================================

#[wasm_bindgen]
impl JsSectionStore {
    #[wasm_bindgen(js_name = selectedSectionId)]
    pub fn selected_section_id(&self) -> String {
        self.inner.selected_section_id().to_string()
    }

    #[wasm_bindgen(js_name = setSelectedSectionId)]
    pub fn set_selected_section_id(&mut self, id: &str) {
        self.inner.set_selected_section_id(id);
    }

    #[wasm_bindgen(js_name = selectNext)]
    pub fn select_next(&mut self) -> bool {
        self.inner.select_next()
    }

    #[wasm_bindgen(js_name = selectPrevious)]
    pub fn select_previous(&mut self) -> bool {
        self.inner.select_previous()
    }

    /// Updates one global setting.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.updateGlobalSetting({ key: 'aspectRatio', value: '16:9' });
    /// ```
    #[wasm_bindgen(js_name = updateGlobalSetting)]
    pub fn update_global_setting(&mut self, setting: JsValue) -> Result<(), JsValue> {
        let setting: GlobalSetting = from_value(setting)?;
        self.inner.update_global_setting(setting);
        Ok(())
    }

    #[wasm_bindgen(js_name = setGlobalSettings)]
    pub fn set_global_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: GlobalSettings = from_value(settings)?;
        self.inner.set_global_settings(settings);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Builds the render request payload.
    #[wasm_bindgen(js_name = renderPayload)]
    pub fn render_payload(&self, project_id: &str) -> Result<JsValue, JsValue> {
        let payload = js_result!(RenderPayload::from_store(&self.inner, project_id))?;
        Ok(to_js_value(&payload)?)
    }
}

impl Default for JsSectionStore {
    fn default() -> Self {
        Self::new()
    }
}
