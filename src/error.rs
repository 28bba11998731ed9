// WHY: typed errors at the library boundary so hosts can match on the failure kind
// The CLI wraps these with anyhow context; the library itself never panics on bad input

use thiserror::Error;

/// Problems with a character table definition
#[derive(Debug, Error)]
pub enum TableError {
    #[error("{label} listed more than once in the invisible set")]
    DuplicateInvisible { label: String },

    #[error("{label} mapped more than once in the ASCII map")]
    DuplicateReplacement { label: String },

    #[error("{label} appears in both the invisible set and the ASCII map")]
    Overlap { label: String },

    #[error("replacement for {key} contains {offending}, which the tables would rewrite again")]
    UnstableReplacement { key: String, offending: String },

    #[error("table entry {0:?} must be exactly one character")]
    NotSingleChar(String),

    #[error("table file parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while replaying an edit log onto a base text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconstructError {
    /// The edit log was not derived from the base text it is being applied to
    #[error("edit at position {position} does not fit a base text of {len} characters")]
    RangeMismatch { position: usize, len: usize },
}

/// Problems loading a settings map
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
