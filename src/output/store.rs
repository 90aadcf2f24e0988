//! Resource storage under the output root
//!
//! Each stored resource lands at its base-origin-relative path, with URL
//! path separators mapped to native ones. Parent directories are created
//! on demand and overwrites are unconditional.

use std::path::{Path, PathBuf};

/// The native location for a base-origin-relative URL path.
pub fn local_path(output_root: &Path, relative: &str) -> PathBuf {
    let mut path = output_root.to_path_buf();
    for segment in relative.split('/') {
        path.push(segment);
    }
    path
}

/// Writes `bytes` at `relative` under `output_root`, creating parent
/// directories as needed.
pub async fn write_resource(
    output_root: &Path,
    relative: &str,
    bytes: &[u8],
) -> std::io::Result<()> {
    let local = local_path(output_root, relative);
    if let Some(parent) = local.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&local, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_maps_url_separators() {
        let root = Path::new("out");
        assert_eq!(
            local_path(root, "img/deep/x.png"),
            Path::new("out").join("img").join("deep").join("x.png")
        );
        assert_eq!(local_path(root, "index.html"), Path::new("out").join("index.html"));
    }

    #[tokio::test]
    async fn writes_create_parents_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        write_resource(dir.path(), "a/b/c.txt", b"first").await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("a/b/c.txt")).unwrap(), b"first");

        write_resource(dir.path(), "a/b/c.txt", b"second").await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("a/b/c.txt")).unwrap(), b"second");
    }
}
