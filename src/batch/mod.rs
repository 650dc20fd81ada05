// Batch module - stamps every photo in one directory
mod core;
mod error;
mod types;

pub use self::core::{auto_font_size, is_supported_image, process_directory, process_file};
pub use error::{BatchError, ProcessError};
pub use types::*;
