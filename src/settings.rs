// WHY: hosts hand over a flat map of boolean options; unknown ids must never be an error
// so newer hosts can pass options this engine does not know about yet

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::SettingsError;

/// Describes one user-facing option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default_value: bool,
}

pub const NORMALIZE_CHARACTERS: &str = "normalizeCharacters";
pub const BOLD_AI_DETECTED_TEXT: &str = "boldAiDetectedText";
pub const VERBOSE_MODE: &str = "verboseMode";

/// Every option the engine recognizes, in display order
pub const SETTING_DESCRIPTORS: &[SettingDescriptor] = &[
    SettingDescriptor {
        id: NORMALIZE_CHARACTERS,
        name: "Normalize Characters",
        description: "Removes invisible characters and converts typographic Unicode to ASCII",
        default_value: true,
    },
    SettingDescriptor {
        id: BOLD_AI_DETECTED_TEXT,
        name: "Bold AI Detected Text",
        description: "Reserved; detection is not implemented and this option has no effect",
        default_value: false,
    },
    SettingDescriptor {
        id: VERBOSE_MODE,
        name: "Verbose Mode",
        description: "Records every change and produces an annotated view of the edits",
        default_value: false,
    },
];

/// Resolved option values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Run the normalization engine at all
    pub normalize_characters: bool,
    /// Placeholder, accepted and carried but never acted on
    pub bold_ai_detected_text: bool,
    /// Track changes and hand them to the reconstructor
    pub verbose_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            normalize_characters: true,
            bold_ai_detected_text: false,
            verbose_mode: false,
        }
    }
}

impl Settings {
    /// Resolve settings from an id -> bool map, ignoring ids that are not recognized
    pub fn from_map(map: &HashMap<String, bool>) -> Self {
        let mut settings = Self::default();
        for (id, value) in map {
            match id.as_str() {
                NORMALIZE_CHARACTERS => settings.normalize_characters = *value,
                BOLD_AI_DETECTED_TEXT => settings.bold_ai_detected_text = *value,
                VERBOSE_MODE => settings.verbose_mode = *value,
                _ => {}
            }
        }
        settings
    }

    /// Parse a JSON object of option ids; missing ids keep their defaults
    pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }
}
