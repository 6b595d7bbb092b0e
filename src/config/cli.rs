use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Filesystem-backed storage. Paths are resolved against `base_path`, so an
/// absolute path passes through unchanged.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> std::path::PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Writing {} bytes to {}", data.len(), full_path.display());
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("nested/dir/out.csv", b"a,b\n1,2\n")
            .await
            .unwrap();

        let read_back = storage.read_file("nested/dir/out.csv").await.unwrap();
        assert_eq!(read_back, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        assert!(storage.read_file("missing.csv").await.is_err());
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file_path = temp_dir.path().join("abs.csv");
        std::fs::write(&file_path, b"x").unwrap();

        let storage = LocalStorage::new("some/other/base".to_string());
        let data = storage
            .read_file(file_path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(data, b"x");
    }
}
