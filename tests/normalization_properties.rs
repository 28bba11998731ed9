// Property tests for the normalization engine over a shared sample corpus
// WHY: idempotence, completeness and position fidelity must hold for every input, not just examples

use textscrub::{normalize, CharacterTables, EditKind, ASCII_REPLACEMENTS, INVISIBLE_CHARACTERS};

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::SAMPLE_TEXTS;

fn tables() -> &'static CharacterTables {
    CharacterTables::builtin()
}

/// Every table key once, joined by ordinary text, so each entry is exercised
fn every_table_entry() -> String {
    let mut text = String::new();
    for ch in INVISIBLE_CHARACTERS {
        text.push('<');
        text.push(*ch);
        text.push('>');
    }
    for (ch, _) in ASCII_REPLACEMENTS {
        text.push('<');
        text.push(*ch);
        text.push('>');
    }
    text
}

fn corpus() -> Vec<String> {
    let mut corpus: Vec<String> = SAMPLE_TEXTS.iter().map(|s| s.to_string()).collect();
    corpus.push(every_table_entry());
    corpus
}

#[test]
fn test_idempotence() {
    for text in corpus() {
        let once = normalize(&text, tables(), false).cleaned_text;
        let twice = normalize(&once, tables(), false).cleaned_text;
        assert_eq!(once, twice, "second pass changed output for {text:?}");
    }
}

#[test]
fn test_second_pass_records_nothing() {
    for text in corpus() {
        let once = normalize(&text, tables(), false).cleaned_text;
        let log = normalize(&once, tables(), true).log.expect("tracking requested");
        assert!(log.is_empty(), "cleaned text {once:?} still produced edits");
    }
}

#[test]
fn test_no_invisible_survivors() {
    for text in corpus() {
        let cleaned = normalize(&text, tables(), true).cleaned_text;
        for ch in INVISIBLE_CHARACTERS {
            assert!(!cleaned.contains(*ch), "{ch:?} survived in {cleaned:?}");
        }
    }
}

#[test]
fn test_no_mapped_survivors() {
    for text in corpus() {
        let cleaned = normalize(&text, tables(), true).cleaned_text;
        for (ch, _) in ASCII_REPLACEMENTS {
            assert!(!cleaned.contains(*ch), "{ch:?} survived in {cleaned:?}");
        }
    }
}

#[test]
fn test_log_completeness() {
    for text in corpus() {
        let log = normalize(&text, tables(), true).log.expect("tracking requested");

        let invisible_in_text = text.chars().filter(|c| INVISIBLE_CHARACTERS.contains(c)).count();
        let mapped_in_text = text
            .chars()
            .filter(|c| ASCII_REPLACEMENTS.iter().any(|(k, _)| k == c))
            .count();

        assert_eq!(log.invisible().count(), invisible_in_text, "invisible edits for {text:?}");
        assert_eq!(log.replacements().count(), mapped_in_text, "replacement edits for {text:?}");
    }
}

#[test]
fn test_position_fidelity() {
    for text in corpus() {
        let chars: Vec<char> = text.chars().collect();
        let log = normalize(&text, tables(), true).log.expect("tracking requested");

        for edit in &log {
            assert_eq!(
                chars.get(edit.position()),
                Some(&edit.original_char()),
                "edit {edit:?} does not point at its character in {text:?}"
            );
            assert_eq!(edit.codepoint_label(), format!("U+{:04X}", edit.original_char() as u32));
            match edit.kind() {
                EditKind::Invisible => assert!(edit.replacement_text().is_empty()),
                EditKind::Replacement => {
                    assert_eq!(tables().replacement_for(edit.original_char()), Some(edit.replacement_text()))
                }
            }
        }
    }
}

#[test]
fn test_log_order_invisible_then_replacements_ascending() {
    for text in corpus() {
        let log = normalize(&text, tables(), true).log.expect("tracking requested");
        let edits = log.as_slice();

        let first_replacement = edits
            .iter()
            .position(|e| e.kind() == EditKind::Replacement)
            .unwrap_or(edits.len());
        assert!(edits[first_replacement..].iter().all(|e| e.kind() == EditKind::Replacement));

        for group in [&edits[..first_replacement], &edits[first_replacement..]] {
            assert!(group.windows(2).all(|w| w[0].position() < w[1].position()));
        }
    }
}

#[test]
fn test_tracking_does_not_change_text() {
    for text in corpus() {
        let untracked = normalize(&text, tables(), false);
        let tracked = normalize(&text, tables(), true);
        assert!(untracked.log.is_none());
        assert_eq!(untracked.cleaned_text, tracked.cleaned_text);
    }
}

#[test]
fn test_cleaned_length_matches_log() {
    for text in corpus() {
        let result = normalize(&text, tables(), true);
        let log = result.log.as_ref().expect("tracking requested");
        let delta: isize = log.iter().map(|e| e.length_delta()).sum();
        assert_eq!(
            result.cleaned_text.chars().count() as isize,
            text.chars().count() as isize + delta,
            "length bookkeeping for {text:?}"
        );
    }
}

#[test]
fn test_line_separator_is_not_in_tables() {
    // U+2028 is neither invisible nor mapped and passes through untouched
    let result = normalize("a\u{2028}b", tables(), true);
    assert_eq!(result.cleaned_text, "a\u{2028}b");
    assert!(result.log.expect("tracking requested").is_empty());
}

#[test]
fn test_tables_shared_across_threads() {
    let handles: Vec<_> = SAMPLE_TEXTS
        .iter()
        .map(|text| {
            std::thread::spawn(move || {
                let tables = CharacterTables::builtin();
                (normalize(text, tables, false).cleaned_text, normalize(text, tables, true).cleaned_text)
            })
        })
        .collect();

    for handle in handles {
        let (untracked, tracked) = handle.join().expect("worker thread panicked");
        assert_eq!(untracked, tracked);
    }
}
