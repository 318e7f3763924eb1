/// Top-down directory listing used by every crawler.
pub mod walk;

pub use walk::{DirListing, normalize_path, walk_directories};
