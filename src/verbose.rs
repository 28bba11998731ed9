// WHY: rebuild a highlighted view from the edit log alone, without rescanning the text
// Edits are replayed highest position first: a splice at a high offset never moves
// the offsets of edits still waiting below it, even when a replacement changes length

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::ReconstructError;
use crate::scrubber::{CleaningResult, Edit, EditKind, EditLog};

/// Which text the edits are replayed onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseView {
    /// Start from the original text and swap each edited character for a marker
    #[default]
    Original,
    /// Start from the cleaned text and wrap each replacement, re-inserting removal markers
    Cleaned,
}

/// One run of display data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Untouched text
    Text { text: String },
    /// Zero-width marker where an invisible character was deleted
    Removed { original_char: char, codepoint_label: String },
    /// Replacement text, annotated with the character it stands in for
    Replaced {
        original_char: char,
        replacement: String,
        codepoint_label: String,
    },
}

/// Text with every edit marked in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedText {
    segments: Vec<Segment>,
}

impl AnnotatedText {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of characters outside any marker
    pub fn unmarked_len(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text { text } => text.chars().count(),
                _ => 0,
            })
            .sum()
    }

    pub fn marker_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| !matches!(segment, Segment::Text { .. }))
            .count()
    }
}

impl fmt::Display for AnnotatedText {
    /// Terminal rendering: `{U+200B}` for removals, `[é→e]` for replacements
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text { text } => f.write_str(text)?,
                Segment::Removed { codepoint_label, .. } => write!(f, "{{{codepoint_label}}}")?,
                Segment::Replaced { original_char, replacement, .. } => {
                    write!(f, "[{original_char}\u{2192}{replacement}]")?
                }
            }
        }
        Ok(())
    }
}

/// Working buffer cell; marker cells remember which edit produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Plain(char),
    Marker(usize),
    Replaced(char, usize),
}

impl Cell {
    fn edit_index(self) -> Option<usize> {
        match self {
            Cell::Plain(_) => None,
            Cell::Marker(i) | Cell::Replaced(_, i) => Some(i),
        }
    }
}

/// Annotate the original text with the edits that cleaning made
pub fn annotate(original: &str, cleaned: &str, log: &EditLog) -> Result<AnnotatedText, ReconstructError> {
    annotate_view(BaseView::Original, original, cleaned, log)
}

/// Annotate either base text; both views yield the same segments for a consistent log
pub fn annotate_view(
    view: BaseView,
    original: &str,
    cleaned: &str,
    log: &EditLog,
) -> Result<AnnotatedText, ReconstructError> {
    let edits = log.as_slice();
    let placements = match view {
        BaseView::Original => original_placements(edits),
        BaseView::Cleaned => cleaned_placements(edits),
    };
    let base = match view {
        BaseView::Original => original,
        BaseView::Cleaned => cleaned,
    };

    let cells = replay(base, edits, &placements, view)?;
    debug!(?view, edits = edits.len(), "Reconstructed annotated text");
    Ok(AnnotatedText { segments: coalesce(&cells, edits) })
}

/// (edit index, offset in the base text), highest offset first
type Placement = (usize, usize);

fn original_placements(edits: &[Edit]) -> Vec<Placement> {
    let mut placements: Vec<Placement> = edits.iter().enumerate().map(|(i, e)| (i, e.position())).collect();
    placements.sort_by(|a, b| b.1.cmp(&a.1));
    placements
}

/// Map each original position into the cleaned text by adding the length change of
/// every edit below it; a replacement of n characters shifts later offsets by n - 1
fn cleaned_placements(edits: &[Edit]) -> Vec<Placement> {
    let mut ascending: Vec<usize> = (0..edits.len()).collect();
    ascending.sort_by_key(|&i| edits[i].position());

    let mut shift: isize = 0;
    let mut placements = Vec::with_capacity(edits.len());
    for i in ascending {
        let offset = edits[i].position() as isize + shift;
        // A negative offset can only come from a log that does not match; park it out of range
        placements.push((i, usize::try_from(offset).unwrap_or(usize::MAX)));
        shift += edits[i].length_delta();
    }
    placements.reverse();
    placements
}

fn replay(
    base: &str,
    edits: &[Edit],
    placements: &[Placement],
    view: BaseView,
) -> Result<Vec<Cell>, ReconstructError> {
    let mut cells: Vec<Cell> = base.chars().map(Cell::Plain).collect();

    for &(i, at) in placements {
        let edit = &edits[i];
        let expected: Vec<char> = match view {
            BaseView::Original => vec![edit.original_char()],
            BaseView::Cleaned => edit.replacement_text().chars().collect(),
        };

        let mismatch = ReconstructError::RangeMismatch {
            position: edit.position(),
            len: cells.len(),
        };
        let end = at.checked_add(expected.len()).ok_or(mismatch.clone())?;
        if end > cells.len() || at > cells.len() {
            return Err(mismatch);
        }
        let fits = cells[at..end]
            .iter()
            .zip(&expected)
            .all(|(cell, ch)| *cell == Cell::Plain(*ch));
        if !fits {
            return Err(mismatch);
        }

        let inserted: Vec<Cell> = match edit.kind() {
            EditKind::Replacement if !edit.replacement_text().is_empty() => {
                edit.replacement_text().chars().map(|ch| Cell::Replaced(ch, i)).collect()
            }
            _ => vec![Cell::Marker(i)],
        };
        cells.splice(at..end, inserted);
    }

    Ok(cells)
}

fn coalesce(cells: &[Cell], edits: &[Edit]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut idx = 0;

    while idx < cells.len() {
        let Some(i) = cells[idx].edit_index() else {
            if let Cell::Plain(ch) = cells[idx] {
                text.push(ch);
            }
            idx += 1;
            continue;
        };

        if !text.is_empty() {
            segments.push(Segment::Text { text: std::mem::take(&mut text) });
        }
        while idx < cells.len() && cells[idx].edit_index() == Some(i) {
            idx += 1;
        }

        let edit = &edits[i];
        segments.push(match edit.kind() {
            EditKind::Invisible => Segment::Removed {
                original_char: edit.original_char(),
                codepoint_label: edit.codepoint_label().to_string(),
            },
            EditKind::Replacement => Segment::Replaced {
                original_char: edit.original_char(),
                replacement: edit.replacement_text().to_string(),
                codepoint_label: edit.codepoint_label().to_string(),
            },
        });
    }

    if !text.is_empty() {
        segments.push(Segment::Text { text });
    }
    segments
}

/// Everything a details view needs to show one cleaning run
#[derive(Debug, Clone, Serialize)]
pub struct VerboseReport {
    /// Seconds since the Unix epoch
    pub timestamp: u64,
    pub original_text: String,
    pub cleaned_text: String,
    pub invisible_count: usize,
    pub replaced_count: usize,
    pub changes: EditLog,
    pub annotated: AnnotatedText,
}

impl VerboseReport {
    /// Build a report from a cleaning result; an untracked result yields an empty change list
    pub fn build(original: &str, result: &CleaningResult) -> Result<Self, ReconstructError> {
        let changes = result.log.clone().unwrap_or_default();
        let annotated = annotate(original, &result.cleaned_text, &changes)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Ok(Self {
            timestamp,
            original_text: original.to_string(),
            cleaned_text: result.cleaned_text.clone(),
            invisible_count: changes.invisible().count(),
            replaced_count: changes.replacements().count(),
            changes,
            annotated,
        })
    }
}
