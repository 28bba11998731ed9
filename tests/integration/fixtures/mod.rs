// Shared sample texts for integration tests
// WHY: one corpus exercised by every property so new edge cases land everywhere at once

#![allow(dead_code)]

/// Inputs covering removals, growing and shrinking replacements, adjacency and non-Latin text
pub const SAMPLE_TEXTS: &[&str] = &[
    "",
    "plain ascii text",
    "caf\u{00E9}",
    "a\u{200B}b",
    "x\u{2014}y",
    "\u{FEFF}\u{FEFF}\u{FEFF}",
    "\u{2014}\u{2014}\u{2014}",
    "\u{200B}\u{2014}\u{200B}\u{2014}\u{200B}",
    "\u{201C}Smart quotes\u{201D} and \u{2018}apostrophes\u{2019}\u{2026}",
    "Price: \u{00A3}5 \u{00B1} \u{00BD}p \u{2014} \u{00A9} 2024 Acme\u{2122}",
    "Stra\u{00DF}e, \u{00C6}sir, \u{00DE}orn, na\u{00EF}ve r\u{00E9}sum\u{00E9}",
    "rtl \u{202E}txet\u{202C} mark\u{200F}s\u{200E}",
    "emoji \u{1F980} stays, \u{4E16}\u{754C} stays, \u{00E9} goes",
    "line one\u{2028}line two\r\n\u{00A0}\u{00A0}indented\u{2003}text",
    "\u{2800}\u{2060}\u{2061}\u{2062}\u{2063}\u{2064}",
    "mixed\u{200D}\u{00E9}\u{200C}\u{2026}\u{202F}end",
];

/// Document written by the pipeline tests, and its cleaned form
pub const SMART_DOCUMENT: &str = "\u{201C}Hello\u{201D} \u{2014} it\u{2019}s a caf\u{00E9}\u{200B}.\n";
pub const SMART_DOCUMENT_CLEANED: &str = "\"Hello\" -- it's a cafe.\n";
