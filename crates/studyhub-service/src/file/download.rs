//! Writing file payloads to a local directory.

use std::path::{Path, PathBuf};

use tracing::info;

use studyhub_core::result::AppResult;

use super::handle::ContentHandle;

/// Pick a path inside `dir` for `name` that does not exist yet.
///
/// `rules.pdf` becomes `rules (1).pdf`, `rules (2).pdf`, ... on collision.
pub async fn unique_destination(dir: &Path, name: &str) -> AppResult<PathBuf> {
    let candidate = dir.join(name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 1u32;
    loop {
        let numbered = match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        let candidate = dir.join(numbered);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// Write the handle's bytes into `dest_dir`, creating it if needed.
pub async fn export_handle(handle: &ContentHandle, dest_dir: &Path) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dest_dir).await?;
    let file_name = Path::new(&handle.file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");
    let path = unique_destination(dest_dir, file_name).await?;
    tokio::fs::write(&path, &handle.data).await?;

    info!(
        file_id = %handle.file_id,
        path = %path.display(),
        size = handle.data.len(),
        "File exported"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::handle::{ContentHandleRegistry, HandlePurpose};
    use bytes::Bytes;
    use chrono::Utc;
    use studyhub_core::types::{FileId, HandleId, LessonId};
    use studyhub_entity::file::File;

    #[tokio::test]
    async fn test_export_avoids_overwrite() {
        let dir = std::env::temp_dir().join(format!("studyhub-export-{}", HandleId::new()));
        let registry = ContentHandleRegistry::new();
        let file = File {
            id: FileId(1),
            lesson_id: LessonId(1),
            name: "rules.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 4,
            uploaded_at: Utc::now(),
        };
        let handle = registry.acquire(&file, Bytes::from_static(b"%PDF"), HandlePurpose::Download);

        let first = export_handle(&handle, &dir).await.unwrap();
        let second = export_handle(&handle, &dir).await.unwrap();
        assert_eq!(first.file_name().unwrap(), "rules.pdf");
        assert_eq!(second.file_name().unwrap(), "rules (1).pdf");
        assert_eq!(std::fs::read(&second).unwrap(), b"%PDF");

        std::fs::remove_dir_all(dir).unwrap();
    }
}
