use crate::utils::error::{DiskmagError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A directory tree of diskmag archives and disk images.
#[derive(Debug, Clone)]
pub struct Corpus {
    name: String,
    root: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackReport {
    pub extracted: usize,
    pub failed: usize,
    pub removed: usize,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

impl Corpus {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DiskmagError::ConfigError {
                message: format!(
                    "The path to the corpus seems to be invalid: {}",
                    root.display()
                ),
            });
        }
        Ok(Self {
            name: name.into(),
            root,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of every file below the root, sorted.
    fn walk_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Paths of every file below the root, relative to it.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .walk_files()?
            .into_iter()
            .filter_map(|path| path.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect())
    }

    /// Relative paths of files whose extension is one of `extensions`.
    pub fn disk_images(&self, extensions: &[String]) -> Result<Vec<PathBuf>> {
        Ok(self
            .files()?
            .into_iter()
            .filter(|path| extensions.iter().any(|ext| has_extension(path, ext)))
            .collect())
    }

    /// Extract every zip archive into the directory that contains it.
    ///
    /// Archives that cannot be read are logged and left in place.
    pub fn unpack(&self, remove_zip: bool) -> Result<UnpackReport> {
        let archives: Vec<PathBuf> = self
            .walk_files()?
            .into_iter()
            .filter(|path| has_extension(path, "zip"))
            .collect();

        let mut report = UnpackReport::default();
        if archives.is_empty() {
            tracing::info!("📦 There are no .zip files in the directory");
            return Ok(report);
        }

        let pb = ProgressBar::new(archives.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Unpacking .zip files");

        for path in &archives {
            let target_dir = path.parent().unwrap_or(&self.root);
            match extract_archive(path, target_dir) {
                Ok(count) => {
                    tracing::debug!("Extracted {} entries from {}", count, path.display());
                    report.extracted += 1;
                    if remove_zip {
                        fs::remove_file(path)?;
                        report.removed += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Unable to open the archive \"{}\": {}",
                        path.file_name().unwrap_or_default().to_string_lossy(),
                        e
                    );
                    report.failed += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        tracing::info!(
            "📦 Unpacked {} archives ({} failed, {} removed)",
            report.extracted,
            report.failed,
            report.removed
        );
        Ok(report)
    }

    pub fn file_list_name(&self) -> String {
        format!("{}_filelist.txt", self.name)
    }

    pub fn file_list_report(&self) -> Result<String> {
        let mut report = format!("List of all files in the corpus {}\n\n", self.name);
        for file in self.files()? {
            report.push_str(&file.to_string_lossy());
            report.push('\n');
        }
        Ok(report)
    }
}

fn extract_archive(path: &Path, target_dir: &Path) -> Result<usize> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let count = archive.len();
    archive.extract(target_dir)?;
    Ok(count)
}

/// Name of the converted file in the `issue-index` scheme:
/// `{parent folder, lowercased, spaces as _}_{n}.txt`, where `n` is the
/// 1-based position of the image among the sorted disk images (files with
/// one of `extensions`) in the same folder.
pub fn title_name(image: &Path, extensions: &[String]) -> Result<String> {
    let folder = image.parent().ok_or_else(|| DiskmagError::ProcessingError {
        message: format!("{} has no parent directory", image.display()),
    })?;
    let file_name = image.file_name().ok_or_else(|| DiskmagError::ProcessingError {
        message: format!("{} has no file name", image.display()),
    })?;

    let mut siblings: Vec<_> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|e| e.file_name()))
        .filter(|name| {
            let name = Path::new(name);
            extensions.iter().any(|ext| has_extension(name, ext))
        })
        .collect();
    siblings.sort();

    let index = siblings
        .iter()
        .position(|name| name.as_os_str() == file_name)
        .ok_or_else(|| DiskmagError::ProcessingError {
            message: format!("{} is not in its directory listing", image.display()),
        })?;

    let folder_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase().replace(' ', "_"))
        .unwrap_or_default();

    Ok(format!("{}_{}.txt", folder_name, index + 1))
}
