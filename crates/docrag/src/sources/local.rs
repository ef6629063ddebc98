//! Local filesystem source

use async_trait::async_trait;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::SourceKind;

use super::{DocumentSource, SourceFile};

/// Recursive walk of a local directory
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for LocalSource {
    async fn list(&self) -> Result<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(Error::source(format!(
                "directory does not exist: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| Error::source(e.to_string()))?;
            if entry.file_type().is_file() {
                files.push(SourceFile {
                    path: entry.path().display().to_string(),
                    name: entry.file_name().to_string_lossy().into_owned(),
                });
            }
        }

        Ok(files)
    }

    async fn fetch(&self, file: &SourceFile) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&file.path).await?)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_and_fetches_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("b.txt"), b"beta").unwrap();

        let source = LocalSource::new(dir.path());
        let mut files = source.list().await.unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[1].name, "b.txt");

        let bytes = source.fetch(&files[1]).await.unwrap();
        assert_eq!(bytes, b"beta");
    }

    #[tokio::test]
    async fn missing_directory_is_a_source_error() {
        let source = LocalSource::new("/definitely/not/here");
        assert!(matches!(
            source.list().await,
            Err(Error::Source(_))
        ));
    }
}
