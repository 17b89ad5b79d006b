//! Data models for script sections and project-wide settings.
//!
//! These structs derive autosurgeon traits for Automerge persistence and serde
//! traits (camelCase) for the browser-session JSON layout.

use autosurgeon::reconcile::NoKey;
use autosurgeon::{Hydrate, HydrateError, Reconcile, Reconciler};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CutError;

// =============================================================================
// CLOSED STRING ENUMS
// =============================================================================

/// Declares a closed enum stored as a plain string, both in JSON and in the
/// Automerge document.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $expected:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CutError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err(CutError::serialization(format!(
                        "unknown {}: '{}'",
                        $expected, other
                    ))),
                }
            }
        }

        impl Reconcile for $name {
            type Key<'a> = NoKey;

            fn reconcile<R: Reconciler>(&self, mut reconciler: R) -> Result<(), R::Error> {
                reconciler.str(self.as_str())
            }
        }

        impl Hydrate for $name {
            fn hydrate_string(s: &'_ str) -> Result<Self, HydrateError> {
                s.parse()
                    .map_err(|_| HydrateError::unexpected($expected, s.to_string()))
            }
        }
    };
}

string_enum! {
    /// Narrator voice gender.
    VoiceGender, "voice gender" {
        Male => "male",
        #[default]
        Female => "female",
    }
}

string_enum! {
    /// Narrator voice accent.
    VoiceAccent, "voice accent" {
        #[default]
        American => "american",
        British => "british",
        Australian => "australian",
        Canadian => "canadian",
    }
}

string_enum! {
    /// Output frame aspect ratio.
    AspectRatio, "aspect ratio" {
        Landscape => "16:9",
        #[default]
        Portrait => "9:16",
        Square => "1:1",
    }
}

string_enum! {
    /// Output resolution preset.
    OutputQuality, "output quality" {
        Hd => "HD",
        #[default]
        FullHd => "FHD",
        Uhd4k => "4K",
    }
}

string_enum! {
    /// Frame background behind section images.
    Background, "background" {
        #[default]
        Black => "black",
        White => "white",
        Custom => "custom",
    }
}

// =============================================================================
// VOICE SETTINGS
// =============================================================================

/// Per-section narration settings.
#[derive(Debug, Clone, Copy, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    /// Playback speed multiplier, 0.5 to 2.0.
    pub speed: f64,
    pub gender: VoiceGender,
    pub accent: VoiceAccent,
}

impl VoiceSettings {
    pub const MIN_SPEED: f64 = 0.5;
    pub const MAX_SPEED: f64 = 2.0;
    pub const DEFAULT_SPEED: f64 = 1.0;

    /// Creates voice settings, clamping speed into range.
    pub fn new(speed: f64, gender: VoiceGender, accent: VoiceAccent) -> Self {
        Self {
            speed: Self::clamp_speed(speed),
            gender,
            accent,
        }
    }

    /// Builder: Set speed (clamped).
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Self::clamp_speed(speed);
        self
    }

    /// Builder: Set gender.
    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = gender;
        self
    }

    /// Builder: Set accent.
    pub fn with_accent(mut self, accent: VoiceAccent) -> Self {
        self.accent = accent;
        self
    }

    /// Clamps a speed into `MIN_SPEED..=MAX_SPEED`. NaN falls back to the default.
    pub fn clamp_speed(speed: f64) -> f64 {
        if speed.is_nan() {
            Self::DEFAULT_SPEED
        } else {
            speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED)
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            gender: VoiceGender::default(),
            accent: VoiceAccent::default(),
        }
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// One script-derived chunk of text plus its presentation metadata.
///
/// `image` and `voice_settings` stay `None` until the user sets them, so the
/// "has this been configured yet" state remains visible. Defaults are resolved
/// at the read site via [`Section::effective_voice_settings`].
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier.
    #[key]
    pub id: String,

    /// Display label, independent of position once edited.
    pub title: String,

    /// Script text for this beat.
    pub text: String,

    /// Opaque reference to an attached image (URL or data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
}

impl Section {
    /// Characters of narration per second of video, used for duration estimates.
    pub const CHARS_PER_SECOND: usize = 20;

    /// Creates a new Section with the given id and text. The title is empty.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Creates a new Section with a freshly generated UUID id.
    pub fn with_generated_id(text: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), text)
    }

    /// Builder: Set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: Set image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder: Set voice settings.
    pub fn with_voice_settings(mut self, voice_settings: VoiceSettings) -> Self {
        self.voice_settings = Some(voice_settings);
        self
    }

    /// Voice settings to use for narration: the stored value, or the default.
    pub fn effective_voice_settings(&self) -> VoiceSettings {
        self.voice_settings.unwrap_or_default()
    }

    /// Estimated narration length in whole seconds (at least 2; 3 for empty text).
    pub fn estimated_duration_secs(&self) -> u64 {
        let chars = self.text.chars().count();
        if chars == 0 {
            return 3;
        }
        let secs = chars.div_ceil(Self::CHARS_PER_SECOND);
        secs.max(2) as u64
    }
}

// =============================================================================
// SECTION PATCH
// =============================================================================

/// Partial update for a [`Section`]. Unset fields are left untouched.
///
/// `image` and `voice_settings` are doubly optional: `Some(None)` clears the
/// field, `None` leaves it alone. In JSON an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_settings: Option<Option<VoiceSettings>>,
}

/// Maps a present JSON key to `Some`, keeping `null` as `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SectionPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: Set text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: Attach an image.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(Some(image.into()));
        self
    }

    /// Builder: Remove the attached image.
    pub fn clear_image(mut self) -> Self {
        self.image = Some(None);
        self
    }

    /// Builder: Set voice settings.
    pub fn voice_settings(mut self, voice_settings: VoiceSettings) -> Self {
        self.voice_settings = Some(Some(voice_settings));
        self
    }

    /// Builder: Drop back to default voice settings.
    pub fn clear_voice_settings(mut self) -> Self {
        self.voice_settings = Some(None);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.image.is_none()
            && self.voice_settings.is_none()
    }

    /// Merges the set fields into `section`.
    pub fn apply(self, section: &mut Section) {
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(text) = self.text {
            section.text = text;
        }
        if let Some(image) = self.image {
            section.image = image;
        }
        if let Some(voice_settings) = self.voice_settings {
            section.voice_settings = voice_settings.map(|v| v.with_speed(v.speed));
        }
    }
}

// =============================================================================
// GLOBAL SETTINGS
// =============================================================================

/// Project-wide output settings.
#[derive(Debug, Clone, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub video_title: String,
    /// Percent, 0 to 200.
    pub brightness: i32,
    /// Percent, 0 to 200.
    pub contrast: i32,
    /// Percent, 0 to 200.
    pub saturation: i32,
    /// Percent, 0 to 100.
    pub music_volume: i32,
    /// Percent, 0 to 100.
    pub voice_volume: i32,
    pub watermark: String,
    pub aspect_ratio: AspectRatio,
    pub output_quality: OutputQuality,
    pub background: Background,
    /// Only used when `background` is `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_background_image: Option<String>,
}

impl GlobalSettings {
    pub const DEFAULT_VIDEO_TITLE: &'static str = "My YouTube Short";
    pub const MAX_LEVEL: i32 = 200;
    pub const MAX_VOLUME: i32 = 100;

    /// Creates settings with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single-field update. Numeric values are clamped into range;
    /// no other fields are touched.
    pub fn apply(&mut self, setting: GlobalSetting) {
        match setting {
            GlobalSetting::VideoTitle(v) => self.video_title = v,
            GlobalSetting::Brightness(v) => self.brightness = v.clamp(0, Self::MAX_LEVEL),
            GlobalSetting::Contrast(v) => self.contrast = v.clamp(0, Self::MAX_LEVEL),
            GlobalSetting::Saturation(v) => self.saturation = v.clamp(0, Self::MAX_LEVEL),
            GlobalSetting::MusicVolume(v) => self.music_volume = v.clamp(0, Self::MAX_VOLUME),
            GlobalSetting::VoiceVolume(v) => self.voice_volume = v.clamp(0, Self::MAX_VOLUME),
            GlobalSetting::Watermark(v) => self.watermark = v,
            GlobalSetting::AspectRatio(v) => self.aspect_ratio = v,
            GlobalSetting::OutputQuality(v) => self.output_quality = v,
            GlobalSetting::Background(v) => self.background = v,
            GlobalSetting::CustomBackgroundImage(v) => self.custom_background_image = v,
        }
    }

    /// Builder: apply a setting.
    pub fn with(mut self, setting: GlobalSetting) -> Self {
        self.apply(setting);
        self
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            video_title: Self::DEFAULT_VIDEO_TITLE.to_string(),
            brightness: 100,
            contrast: 100,
            saturation: 100,
            music_volume: 50,
            voice_volume: 80,
            watermark: String::new(),
            aspect_ratio: AspectRatio::default(),
            output_quality: OutputQuality::default(),
            background: Background::default(),
            custom_background_image: None,
        }
    }
}

/// A single `GlobalSettings` field together with its new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum GlobalSetting {
    VideoTitle(String),
    Brightness(i32),
    Contrast(i32),
    Saturation(i32),
    MusicVolume(i32),
    VoiceVolume(i32),
    Watermark(String),
    AspectRatio(AspectRatio),
    OutputQuality(OutputQuality),
    Background(Background),
    CustomBackgroundImage(Option<String>),
}

// =============================================================================
// PROJECT STATE
// =============================================================================

/// Full persisted state of one editing session.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    /// Sections in playback order.
    pub sections: Vec<Section>,

    /// Selected section id, empty when nothing is selected.
    #[serde(default)]
    pub selected_section_id: String,

    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl ProjectState {
    /// Creates a new empty project state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
