//! The public posters directory: listing for `/api/posters` and optional
//! archiving of freshly generated posters.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use catposter_core::image::{extension_for_mime, InlineImage};
use catposter_core::picker::Picker;

/// URL prefix under which the posters directory is served.
pub const PUBLIC_PREFIX: &str = "/cat-posters";

/// Extensions listed by [`list_posters`] (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "avif"];

fn is_listed_image(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// List image files in `dir` as public paths, newest modification first.
/// Files with equal modification times are ordered by name.
pub async fn list_posters(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut found: Vec<(String, SystemTime)> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !is_listed_image(&name) {
            continue;
        }
        let modified = entry.metadata().await?.modified()?;
        found.push((name, modified));
    }

    found.sort_by(|(a_name, a_time), (b_name, b_time)| {
        b_time.cmp(a_time).then_with(|| a_name.cmp(b_name))
    });

    Ok(found
        .into_iter()
        .map(|(name, _)| format!("{PUBLIC_PREFIX}/{name}"))
        .collect())
}

/// Write `poster` into `dir` as `poster-<millis>-<suffix>.<ext>`, creating
/// the directory if needed. Returns the written path.
pub async fn archive_poster(
    dir: &Path,
    poster: &InlineImage,
    picker: &dyn Picker,
) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let filename = format!(
        "poster-{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        picker.suffix().to_ascii_lowercase(),
        extension_for_mime(&poster.mime_type),
    );
    let path = dir.join(filename);
    tokio::fs::write(&path, &poster.data).await?;
    Ok(path)
}
