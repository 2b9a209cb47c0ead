use std::borrow::Cow;
use std::path::Path;

/// File name of an artifact with its last extension removed.
///
/// Unlike [`Path::file_stem`], a leading-dot name such as `.bundle` is treated
/// as all extension and yields an empty stem.
pub fn artifact_stem(path: &Path) -> Cow<'_, str> {
    let Some(name) = path.file_name() else {
        return Cow::Borrowed("");
    };
    match name.to_string_lossy() {
        Cow::Borrowed(name) => Cow::Borrowed(strip_extension(name)),
        Cow::Owned(name) => Cow::Owned(strip_extension(&name).to_string()),
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}
