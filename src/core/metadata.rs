use crate::domain::model::MetadataRecord;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Accumulates [`MetadataRecord`]s in a single JSON array file.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records currently stored. A missing, empty, or unparsable file reads
    /// as an empty list.
    pub fn load(&self) -> Result<Vec<MetadataRecord>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Metadata file {} is not a valid record list ({}); starting a new one",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn append(&self, records: &[MetadataRecord]) -> Result<usize> {
        let mut all = self.load()?;
        all.extend_from_slice(records);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, json)?;
        tracing::debug!(
            "Metadata file {} now holds {} records",
            self.path.display(),
            all.len()
        );
        Ok(all.len())
    }
}
