mod format;
mod path;

pub use format::{format_size, short_hash, SHORT_HASH_LEN};
pub use path::artifact_stem;
