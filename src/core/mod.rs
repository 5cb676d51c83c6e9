// Core exports
pub mod filters;
pub mod overlay;
pub mod sanitize;
pub mod seed;

pub use filters::{ProfileFilter, SortOrder};
pub use overlay::{apply_seen_filter, LocalStorage, MemoryStorage, SavedProfiles, SeenFilter, SeenProfiles};
pub use sanitize::{sanitize_bio, visible_text_len};
