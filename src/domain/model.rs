use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// CBM DOS file type stored in the low bits of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Del,
    Seq,
    Prg,
    Usr,
    Rel,
    Unknown(u8),
}

impl FileType {
    pub fn from_type_byte(byte: u8) -> Self {
        match byte & 0x07 {
            0 => FileType::Del,
            1 => FileType::Seq,
            2 => FileType::Prg,
            3 => FileType::Usr,
            4 => FileType::Rel,
            other => FileType::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileType::Del => "DEL",
            FileType::Seq => "SEQ",
            FileType::Prg => "PRG",
            FileType::Usr => "USR",
            FileType::Rel => "REL",
            FileType::Unknown(_) => "???",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One file entry of a disk image together with its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramFile {
    pub name: String,
    pub raw_name: Vec<u8>,
    pub file_type: FileType,
    pub blocks: u16,
    /// `None` when the sector chain could not be followed.
    pub content: Option<Vec<u8>>,
}

impl ProgramFile {
    pub fn is_deleted(&self) -> bool {
        self.file_type == FileType::Del
    }
}

/// A disk image after reading, before classification.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub path: PathBuf,
    /// Path relative to the corpus root.
    pub relative_path: PathBuf,
    pub filename: String,
    pub diskmag: String,
    pub issue: String,
    pub size_bytes: u64,
    /// Entry lines only; header and blocks-free lines are dropped.
    pub directory: Vec<String>,
    pub files: Vec<ProgramFile>,
    /// Output file name chosen for this image, relative to its directory.
    pub output_name: String,
}

/// Summary record appended to the metadata file for every converted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub file: String,
    pub diskmag: String,
    pub issue: String,
    #[serde(rename = "location of converted diskmag")]
    pub converted_location: String,
    pub location: String,
    #[serde(rename = "size in kb")]
    pub size_kb: f64,
    #[serde(rename = "amount of files")]
    pub file_count: usize,
    #[serde(rename = "available extensions")]
    pub extensions: String,
    #[serde(rename = "text files", default)]
    pub text_files: usize,
    #[serde(rename = "code files", default)]
    pub code_files: usize,
    #[serde(rename = "compressed files", default)]
    pub compressed_files: usize,
    #[serde(rename = "processed at", default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// Output path relative to the output root.
    pub relative_path: PathBuf,
    pub text: String,
    pub metadata: MetadataRecord,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub documents: Vec<ConvertedDocument>,
}
