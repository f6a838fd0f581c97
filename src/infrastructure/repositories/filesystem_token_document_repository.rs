//! Filesystem-backed `TokenDocumentRepository`
//!
//! The single `log_dir/token_usage.toml` array-of-tables document (spec §3,
//! §4.5). Unlike info files and markers, this lives directly under
//! `log_dir`, not a dated subdirectory — token holders persist across the
//! day boundary until reconciled.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::entities::TokenHolder;
use crate::domain::repositories::TokenDocumentRepository;
use crate::infrastructure::dirs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenDocument {
    #[serde(default)]
    token: Vec<TokenHolder>,
}

pub struct FilesystemTokenDocumentRepository<'a> {
    log_dir: &'a str,
}

impl<'a> FilesystemTokenDocumentRepository<'a> {
    pub fn new(log_dir: &'a str) -> Self {
        Self { log_dir }
    }

    fn path(&self) -> PathBuf {
        Path::new(self.log_dir).join("token_usage.toml")
    }
}

impl TokenDocumentRepository for FilesystemTokenDocumentRepository<'_> {
    fn load(&self) -> Result<Vec<TokenHolder>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading token document {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let doc: TokenDocument = toml::from_str(&text)
            .with_context(|| format!("parsing token document {}", path.display()))?;
        Ok(doc.token)
    }

    fn save(&self, holders: Option<&[TokenHolder]>) -> Result<()> {
        let path = self.path();
        match holders {
            None => {
                if path.exists() {
                    std::fs::remove_file(&path)
                        .with_context(|| format!("removing token document {}", path.display()))?;
                }
                Ok(())
            }
            Some(list) if list.is_empty() => {
                if path.exists() {
                    std::fs::remove_file(&path)
                        .with_context(|| format!("removing token document {}", path.display()))?;
                }
                Ok(())
            }
            Some(list) => {
                let doc = TokenDocument { token: list.to_vec() };
                let text = toml::to_string(&doc).context("serializing token document")?;
                dirs::atomic_write(&path, &text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_an_empty_document() {
        let log_dir = tempdir().unwrap();
        let repo = FilesystemTokenDocumentRepository::new(log_dir.path().to_str().unwrap());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let log_dir = tempdir().unwrap();
        let repo = FilesystemTokenDocumentRepository::new(log_dir.path().to_str().unwrap());
        let holders = vec![TokenHolder::new("db", "F1", "J1")];
        repo.save(Some(&holders)).unwrap();
        assert_eq!(repo.load().unwrap(), holders);
    }

    #[test]
    fn saving_none_deletes_the_file() {
        let log_dir = tempdir().unwrap();
        let repo = FilesystemTokenDocumentRepository::new(log_dir.path().to_str().unwrap());
        repo.save(Some(&[TokenHolder::new("db", "F1", "J1")])).unwrap();
        repo.save(None).unwrap();
        assert!(!repo.path().exists());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn saving_empty_slice_deletes_the_file() {
        let log_dir = tempdir().unwrap();
        let repo = FilesystemTokenDocumentRepository::new(log_dir.path().to_str().unwrap());
        repo.save(Some(&[TokenHolder::new("db", "F1", "J1")])).unwrap();
        repo.save(Some(&[])).unwrap();
        assert!(!repo.path().exists());
    }
}
