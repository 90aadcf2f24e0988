//! Run manifest
//!
//! A write-only log of every relative path stored during the run. It plays
//! no part in crawl decisions; it is sorted and persisted once at the end.

use std::path::Path;

#[derive(Debug, Default)]
pub struct Manifest {
    paths: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: String) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// The manifest as newline-terminated lines, lexicographically sorted.
    pub fn sorted_lines(&self) -> String {
        let mut sorted = self.paths.clone();
        sorted.sort();
        let mut out = String::new();
        for path in sorted {
            out.push_str(&path);
            out.push('\n');
        }
        out
    }

    pub async fn write(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.sorted_lines()).await
    }
}
