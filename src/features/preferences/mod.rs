//! Study preferences.
//!
//! - [`model`]: the record, its defaults and validation
//! - [`merge`]: schema-checked partial updates
//! - [`edit`]: website and technique list editing
//! - [`io`]: backend load/save and file import/export

pub mod edit;
pub mod io;
pub mod merge;
pub mod model;

pub use edit::ListChange;
pub use io::{export_to, fetch, fetch_or_default, import_from, save, Source};
pub use merge::PreferencesPatch;
pub use model::{is_valid_time, Preferences, DEFAULT_STUDY_TIMES, DEFAULT_TECHNIQUES, DEFAULT_WEBSITES};
