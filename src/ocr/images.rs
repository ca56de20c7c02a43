//! Finding recognizable image files on disk.

use std::ffi::OsStr;

use walkdir::WalkDir;

use crate::prelude::*;

/// Extensions we hand to the recognition backends.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Recursively find supported image files under `dir`.
///
/// Entries are visited in file-name order per directory level, so rasterized
/// `page-NNNN.png` names come back in page order. An existing but empty
/// directory is an empty `Ok`; only a directory we can't start walking is an
/// error.
pub fn find_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("{:?} is not a directory", dir));
    }
    let mut images = vec![];
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // A file that vanished mid-walk isn't worth failing over.
                warn!("skipping unreadable directory entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}
