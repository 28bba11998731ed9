// WHY: single left-to-right scan so every edit carries its offset in the original text
// Offsets are code point indices, never byte or UTF-16 offsets

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::characters::{codepoint_label, CharAction, CharacterTables};
use crate::settings::Settings;

/// What kind of change an edit records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Invisible,
    Replacement,
}

/// One single-character change, positioned against the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    kind: EditKind,
    position: usize,
    original_char: char,
    replacement: String,
    codepoint_label: String,
}

impl Edit {
    pub fn invisible(position: usize, original_char: char) -> Self {
        Self {
            kind: EditKind::Invisible,
            position,
            original_char,
            replacement: String::new(),
            codepoint_label: codepoint_label(original_char),
        }
    }

    pub fn replacement(position: usize, original_char: char, replacement: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Replacement,
            position,
            original_char,
            replacement: replacement.into(),
            codepoint_label: codepoint_label(original_char),
        }
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// Zero-based code point index into the original text
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn original_char(&self) -> char {
        self.original_char
    }

    /// Empty for invisible edits
    pub fn replacement_text(&self) -> &str {
        &self.replacement
    }

    pub fn codepoint_label(&self) -> &str {
        &self.codepoint_label
    }

    /// Change in character count this edit causes (removal is -1, "--" for one char is +1)
    pub fn length_delta(&self) -> isize {
        self.replacement.chars().count() as isize - 1
    }
}

/// Ordered record of every edit from one normalization pass
///
/// Invisible edits come first, then replacement edits, each group in ascending position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditLog {
    edits: Vec<Edit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    pub fn as_slice(&self) -> &[Edit] {
        &self.edits
    }

    /// Invisible-character removals only
    pub fn invisible(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter().filter(|e| e.kind == EditKind::Invisible)
    }

    /// ASCII substitutions only
    pub fn replacements(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter().filter(|e| e.kind == EditKind::Replacement)
    }
}

impl From<Vec<Edit>> for EditLog {
    fn from(edits: Vec<Edit>) -> Self {
        Self { edits }
    }
}

impl IntoIterator for EditLog {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditLog {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Cleaned text plus the edit log when tracking was requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned_text: String,
    pub log: Option<EditLog>,
}

impl CleaningResult {
    fn unchanged(text: &str, track_changes: bool) -> Self {
        Self {
            cleaned_text: text.to_string(),
            log: track_changes.then(EditLog::new),
        }
    }

    /// Whether any edit was made; without a log this compares against `original`
    pub fn changed(&self, original: &str) -> bool {
        match &self.log {
            Some(log) => !log.is_empty(),
            None => self.cleaned_text != original,
        }
    }
}

/// Remove invisible characters and rewrite mapped characters to ASCII
///
/// Total over any `&str`. With `track_changes` the result carries an [`EditLog`];
/// without it no log is allocated.
pub fn normalize(text: &str, tables: &CharacterTables, track_changes: bool) -> CleaningResult {
    if text.is_empty() || tables.is_empty() {
        return CleaningResult::unchanged(text, track_changes);
    }

    let mut cleaned = String::with_capacity(text.len());
    let mut invisible_edits = Vec::new();
    let mut replacement_edits = Vec::new();

    for (position, ch) in text.chars().enumerate() {
        match tables.action_for(ch) {
            None => cleaned.push(ch),
            Some(CharAction::Remove) => {
                if track_changes {
                    invisible_edits.push(Edit::invisible(position, ch));
                }
            }
            Some(CharAction::Replace(replacement)) => {
                cleaned.push_str(replacement);
                if track_changes {
                    replacement_edits.push(Edit::replacement(position, ch, replacement));
                }
            }
        }
    }

    let log = track_changes.then(|| {
        debug!(
            invisible = invisible_edits.len(),
            replaced = replacement_edits.len(),
            "Normalization pass recorded edits"
        );
        invisible_edits.append(&mut replacement_edits);
        EditLog::from(invisible_edits)
    });

    CleaningResult { cleaned_text: cleaned, log }
}

/// Clean text according to the host's settings map
///
/// `normalize_characters` gates the engine; `verbose_mode` turns on change tracking.
pub fn clean_text(text: &str, settings: &Settings, tables: &CharacterTables) -> CleaningResult {
    let track_changes = settings.verbose_mode;
    if !settings.normalize_characters {
        debug!("Character normalization disabled, returning input unchanged");
        return CleaningResult::unchanged(text, track_changes);
    }
    normalize(text, tables, track_changes)
}
