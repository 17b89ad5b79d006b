//! Automerge-backed persistence for a project.
//!
//! `ProjectDocument` wraps an Automerge document holding one `ProjectState`
//! and provides:
//! - Bulk save/load of a `SectionStore` via autosurgeon (hydrate/reconcile)
//! - Targeted O(1) writes for high-frequency root fields
//! - Change-based sync between replicas

use automerge::{
    transaction::Transactable, AutoCommit, ChangeHash, ObjId, ReadDoc, ScalarValue, Value, ROOT,
};
use autosurgeon::{hydrate, reconcile};
use tracing::debug;

use super::model::ProjectState;
use super::store::SectionStore;
use crate::error::{CutError, CutResult};

/// Persisted form of an editing session.
///
/// - `commit_store()` / `to_store()` for the save and load paths
/// - `update_state()` for bulk struct operations (uses hydrate/reconcile)
/// - `set_*()` for targeted root-level updates (direct put, O(1))
///
/// The hydrated state is cached and invalidated after any direct mutation.
pub struct ProjectDocument {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated after direct document mutations.
    cached_state: Option<ProjectState>,
}

impl ProjectDocument {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a document holding an empty project with default settings.
    pub fn new() -> CutResult<Self> {
        Self::from_state(ProjectState::default())
    }

    /// Creates a document holding the given state.
    pub fn from_state(state: ProjectState) -> CutResult<Self> {
        let mut doc = AutoCommit::new();
        reconcile(&mut doc, &state)?;
        Ok(Self {
            doc,
            cached_state: Some(state),
        })
    }

    /// Creates a document from a store snapshot.
    pub fn from_store(store: &SectionStore) -> CutResult<Self> {
        Self::from_state(store.to_state())
    }

    /// Loads a document from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> CutResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
        })
    }

    /// Saves the document to binary format.
    pub fn save(&mut self) -> Vec<u8> {
        self.doc.save()
    }

    /// Returns the current heads (for sync protocol).
    pub fn get_heads(&mut self) -> Vec<ChangeHash> {
        self.doc.get_heads()
    }

    /// Gets the actor ID for this document instance.
    pub fn actor_id(&self) -> String {
        self.doc.get_actor().to_hex_string()
    }

    // =========================================================================
    // HIGH-LEVEL OPERATIONS (via Hydrate/Reconcile)
    // =========================================================================

    /// Hydrates the document state to Rust structs.
    pub fn get_state(&mut self) -> CutResult<ProjectState> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: ProjectState = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies a function to mutate the state, then reconciles back to the document.
    pub fn update_state<F>(&mut self, f: F) -> CutResult<()>
    where
        F: FnOnce(&mut ProjectState),
    {
        let mut state = self.get_state()?;
        f(&mut state);
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        Ok(())
    }

    /// Writes the store's full state into the document.
    pub fn commit_store(&mut self, store: &SectionStore) -> CutResult<()> {
        debug!(sections = store.len(), "committing store");
        let snapshot = store.to_state();
        self.update_state(|state| *state = snapshot)
    }

    /// Loads the document into a fresh store.
    pub fn to_store(&mut self) -> CutResult<SectionStore> {
        Ok(SectionStore::from_state(self.get_state()?))
    }

    // =========================================================================
    // TARGETED ROOT UPDATES (Direct put, O(1))
    // =========================================================================

    /// Sets the selected section id directly (O(1)). Unchecked, like
    /// [`SectionStore::set_selected_section_id`].
    pub fn set_selected_section_id(&mut self, id: &str) -> CutResult<()> {
        self.cached_state = None;
        self.doc
            .put(&ROOT, "selected_section_id", ScalarValue::Str(id.into()))?;
        Ok(())
    }

    /// Sets the video title directly (O(1)).
    pub fn set_video_title(&mut self, title: &str) -> CutResult<()> {
        self.set_global_str("video_title", title)
    }

    /// Sets the watermark text directly (O(1)).
    pub fn set_watermark(&mut self, watermark: &str) -> CutResult<()> {
        self.set_global_str("watermark", watermark)
    }

    /// Sets or clears a section's image directly, without re-reconciling the
    /// whole section list.
    pub fn set_section_image(&mut self, id: &str, image: Option<&str>) -> CutResult<()> {
        let section_obj = self.get_section_obj(id)?;
        self.cached_state = None;
        let value = match image {
            Some(v) => ScalarValue::Str(v.into()),
            None => ScalarValue::Null,
        };
        self.doc.put(&section_obj, "image", value)?;
        Ok(())
    }

    fn set_global_str(&mut self, key: &str, value: &str) -> CutResult<()> {
        self.cached_state = None;
        let settings_obj = self.get_obj_at_key(&ROOT, "global_settings")?;
        self.doc
            .put(&settings_obj, key, ScalarValue::Str(value.into()))?;
        Ok(())
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Serializes the state as browser-session JSON.
    pub fn to_json(&mut self) -> CutResult<String> {
        let state = self.get_state()?;
        Ok(serde_json::to_string(&state)?)
    }

    /// Builds a document from browser-session JSON.
    pub fn from_json(json: &str) -> CutResult<Self> {
        let state: ProjectState = serde_json::from_str(json)?;
        Self::from_state(state)
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Folds edits from another replica of the same project into this one.
    /// The next `get_state()` re-hydrates the combined `ProjectState`.
    pub fn merge(&mut self, other: &mut Self) -> CutResult<()> {
        self.cached_state = None;
        self.doc.merge(&mut other.doc)?;
        debug!(heads = self.doc.get_heads().len(), "merged project replica");
        Ok(())
    }

    /// Encodes the project edits a peer at `their_heads` has not seen yet,
    /// or `None` when the peer is already up to date.
    pub fn generate_sync_message(&mut self, their_heads: &[ChangeHash]) -> Option<Vec<u8>> {
        let changes = self.doc.get_changes(their_heads);
        if changes.is_empty() {
            return None;
        }
        Some(
            changes
                .iter()
                .flat_map(|change| change.raw_bytes().iter().copied())
                .collect(),
        )
    }

    /// Applies project edits produced by a peer's `generate_sync_message`.
    pub fn apply_sync_message(&mut self, changes: &[u8]) -> CutResult<()> {
        self.cached_state = None;
        let applied = self.doc.load_incremental(changes)?;
        debug!(applied, "applied project edits from peer");
        Ok(())
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Finds a section's ObjId by scanning the list for its id.
    fn get_section_obj(&self, id: &str) -> CutResult<ObjId> {
        let list = self.get_obj_at_key(&ROOT, "sections")?;
        for index in 0..self.doc.length(&list) {
            let Some((Value::Object(_), obj)) = self.doc.get(&list, index)? else {
                return Err(CutError::schema_violation("section entry is not an object"));
            };
            if let Some((Value::Scalar(s), _)) = self.doc.get(&obj, "id")? {
                if let ScalarValue::Str(found) = s.as_ref() {
                    if found.as_str() == id {
                        return Ok(obj);
                    }
                }
            }
        }
        Err(CutError::section_not_found(id))
    }

    /// Gets an object ID at a map key.
    fn get_obj_at_key(&self, parent: &ObjId, key: &str) -> CutResult<ObjId> {
        match self.doc.get(parent, key) {
            Ok(Some((Value::Object(_), obj_id))) => Ok(obj_id),
            Ok(Some(_)) => Err(CutError::schema_violation(format!(
                "'{}' is not an object",
                key
            ))),
            Ok(None) => Err(CutError::field_not_found(key)),
            Err(e) => Err(CutError::Automerge(e)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::model::{
        Background, GlobalSetting, Section, VoiceAccent, VoiceGender, VoiceSettings,
    };

    fn sample_store() -> SectionStore {
        let mut store = SectionStore::new();
        store.set_sections(vec![
            Section::new("1", "Hello world").with_title("Section 1"),
            Section::new("2", "This is a test")
                .with_title("Section 2")
                .with_image("data:image/png;base64,AAAA")
                .with_voice_settings(VoiceSettings::new(
                    1.25,
                    VoiceGender::Male,
                    VoiceAccent::Australian,
                )),
        ]);
        store.set_selected_section_id("2");
        store.update_global_setting(GlobalSetting::Background(Background::Custom));
        store.update_global_setting(GlobalSetting::CustomBackgroundImage(Some("bg".into())));
        store
    }

    #[test]
    fn test_new_document() {
        let mut doc = ProjectDocument::new().unwrap();
        let state = doc.get_state().unwrap();
        assert!(state.is_empty());
        assert_eq!(state.global_settings.video_title, "My YouTube Short");
    }

    #[test]
    fn test_save_and_load_store() {
        let store = sample_store();
        let mut doc = ProjectDocument::from_store(&store).unwrap();

        let bytes = doc.save();
        let mut loaded = ProjectDocument::from_bytes(&bytes).unwrap();
        let restored = loaded.to_store().unwrap();

        assert_eq!(restored, store);
        assert_eq!(restored.selected_section_id(), "2");
        let voice = restored.section("2").unwrap().voice_settings.unwrap();
        assert_eq!(voice.accent, VoiceAccent::Australian);
        assert!(restored.section("1").unwrap().voice_settings.is_none());
    }

    #[test]
    fn test_commit_store_overwrites() {
        let mut doc = ProjectDocument::from_store(&sample_store()).unwrap();

        let mut store = doc.to_store().unwrap();
        store.merge_sections("2");
        doc.commit_store(&store).unwrap();

        let bytes = doc.save();
        let mut loaded = ProjectDocument::from_bytes(&bytes).unwrap();
        let state = loaded.get_state().unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.sections[0].text, "Hello world This is a test");
        assert_eq!(state.selected_section_id, "1");
    }

    #[test]
    fn test_targeted_updates() {
        let mut doc = ProjectDocument::from_store(&sample_store()).unwrap();
        doc.set_video_title("Launch video").unwrap();
        doc.set_watermark("@studio").unwrap();
        doc.set_selected_section_id("1").unwrap();

        let state = doc.get_state().unwrap();
        assert_eq!(state.global_settings.video_title, "Launch video");
        assert_eq!(state.global_settings.watermark, "@studio");
        assert_eq!(state.selected_section_id, "1");
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_set_section_image() {
        let mut doc = ProjectDocument::from_store(&sample_store()).unwrap();
        doc.set_section_image("1", Some("one.png")).unwrap();
        doc.set_section_image("2", None).unwrap();

        let store = doc.to_store().unwrap();
        assert_eq!(store.section("1").unwrap().image.as_deref(), Some("one.png"));
        assert!(store.section("2").unwrap().image.is_none());
        assert_eq!(store.section("2").unwrap().text, "This is a test");

        assert!(matches!(
            doc.set_section_image("missing", Some("x")),
            Err(CutError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = ProjectDocument::from_store(&sample_store()).unwrap();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"selectedSectionId\":\"2\""));
        assert!(json.contains("\"aspectRatio\":\"9:16\""));

        let mut restored = ProjectDocument::from_json(&json).unwrap();
        assert_eq!(restored.get_state().unwrap(), doc.get_state().unwrap());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ProjectDocument::from_json("{not json"),
            Err(CutError::Serialization(_))
        ));
    }

    #[test]
    fn test_merge_documents() {
        let mut base = ProjectDocument::from_store(&sample_store()).unwrap();
        let bytes = base.save();
        let mut client_a = ProjectDocument::from_bytes(&bytes).unwrap();
        let mut client_b = ProjectDocument::from_bytes(&bytes).unwrap();

        client_a.set_video_title("From A").unwrap();
        client_b.set_watermark("From B").unwrap();

        client_a.merge(&mut client_b).unwrap();
        client_b.merge(&mut client_a).unwrap();

        let state_a = client_a.get_state().unwrap();
        let state_b = client_b.get_state().unwrap();
        assert_eq!(state_a, state_b);
        assert_eq!(state_a.global_settings.video_title, "From A");
        assert_eq!(state_a.global_settings.watermark, "From B");
    }

    #[test]
    fn test_sync_messages() {
        let mut source = ProjectDocument::from_store(&sample_store()).unwrap();
        let bytes = source.save();
        let mut replica = ProjectDocument::from_bytes(&bytes).unwrap();

        let heads = replica.get_heads();
        assert!(source.generate_sync_message(&heads).is_none());

        source.set_video_title("Synced").unwrap();
        let msg = source.generate_sync_message(&heads).unwrap();
        replica.apply_sync_message(&msg).unwrap();

        assert_eq!(
            replica.get_state().unwrap().global_settings.video_title,
            "Synced"
        );
    }
}
