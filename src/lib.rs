pub mod characters;
pub mod discovery;
pub mod error;
pub mod parallel_processing;
pub mod reader;
pub mod scrubber;
pub mod settings;
pub mod verbose;

// Re-export the engine surface for convenient access
pub use characters::{codepoint_label, CharacterTables, ASCII_REPLACEMENTS, INVISIBLE_CHARACTERS};
pub use error::{ReconstructError, SettingsError, TableError};
pub use scrubber::{clean_text, normalize, CleaningResult, Edit, EditKind, EditLog};
pub use settings::{Settings, SETTING_DESCRIPTORS};
pub use verbose::{annotate, annotate_view, AnnotatedText, BaseView, Segment, VerboseReport};

// Re-export batch processing types for the CLI, tests and benchmarks
pub use parallel_processing::{
    generate_output_path, generate_report_path, process_files_parallel, FileStats, FileStatus,
    ProcessingConfig,
};
