//! Render request payload.
//!
//! Flattens a `SectionStore` into the shape the external generation service
//! consumes: ordered segments, the output settings and the list of image
//! attachments with their upload file names.

use serde::{Deserialize, Serialize};

use super::model::{AspectRatio, Background, OutputQuality, VoiceSettings};
use super::store::SectionStore;
use crate::error::{CutError, CutResult};

/// File name used for a custom background upload.
pub const BACKGROUND_FILE_NAME: &str = "global-background.jpg";

/// One narrated segment, in playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSegment {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
}

/// Output settings sent alongside the segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    pub video_title: String,
    pub aspect_ratio: AspectRatio,
    pub output_quality: OutputQuality,
    pub background: Background,
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub music_volume: i32,
    pub voice_volume: i32,
    pub watermark: String,
}

/// An image to upload with the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    /// Upload file name: `global-background.jpg` or `section-{n}.jpg`.
    pub file_name: String,
    /// Owning section, `None` for the background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    /// The stored image reference, passed through unchanged.
    pub source: String,
}

/// Everything the render collaborator needs for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    /// Project working directory on the render side.
    pub temp_dir_name: String,
    pub segments: Vec<RenderSegment>,
    pub global_settings: RenderSettings,
    pub images: Vec<ImageAttachment>,
}

impl RenderPayload {
    /// Builds the payload for a project.
    ///
    /// Segments follow store order and carry trimmed text. Fails when the
    /// store is empty or any section has no text.
    pub fn from_store(store: &SectionStore, project_id: impl Into<String>) -> CutResult<Self> {
        if store.is_empty() {
            return Err(CutError::NoSections);
        }

        let mut segments = Vec::with_capacity(store.len());
        for section in store.sections() {
            let text = section.text.trim();
            if text.is_empty() {
                return Err(CutError::empty_section(&section.id));
            }
            segments.push(RenderSegment {
                id: section.id.clone(),
                text: text.to_string(),
                voice_settings: section.voice_settings,
            });
        }

        let settings = store.global_settings();
        let mut images = Vec::new();
        if settings.background == Background::Custom {
            if let Some(ref image) = settings.custom_background_image {
                images.push(ImageAttachment {
                    file_name: BACKGROUND_FILE_NAME.to_string(),
                    section_id: None,
                    source: image.clone(),
                });
            }
        }
        for (index, section) in store.sections().iter().enumerate() {
            if let Some(ref image) = section.image {
                images.push(ImageAttachment {
                    file_name: format!("section-{}.jpg", index + 1),
                    section_id: Some(section.id.clone()),
                    source: image.clone(),
                });
            }
        }

        Ok(Self {
            temp_dir_name: project_id.into(),
            segments,
            global_settings: RenderSettings {
                video_title: settings.video_title.clone(),
                aspect_ratio: settings.aspect_ratio,
                output_quality: settings.output_quality,
                background: settings.background,
                brightness: settings.brightness,
                contrast: settings.contrast,
                saturation: settings.saturation,
                music_volume: settings.music_volume,
                voice_volume: settings.voice_volume,
                watermark: settings.watermark.clone(),
            },
            images,
        })
    }

    /// The `segments` form field: a JSON array string.
    pub fn segments_json(&self) -> CutResult<String> {
        Ok(serde_json::to_string(&self.segments)?)
    }

    /// The `globalSettings` form field: a JSON object string.
    pub fn settings_json(&self) -> CutResult<String> {
        Ok(serde_json::to_string(&self.global_settings)?)
    }

    /// The whole payload as one JSON document.
    pub fn to_json(&self) -> CutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
