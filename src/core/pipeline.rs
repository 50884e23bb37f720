use crate::core::classifier::{classify, ClassificationSummary};
use crate::core::corpus::{title_name, Corpus};
use crate::core::metadata::MetadataStore;
use crate::core::text::{replace_alt_umlauts, wrap};
use crate::core::{ConfigProvider, DiskImage, DiskImageReader, OutputNaming, Pipeline, Storage};
use crate::domain::model::{
    ConvertedDocument, ExtractedImage, MetadataRecord, ProgramFile, TransformResult,
};
use crate::utils::error::Result;
use chrono::Utc;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DIRECTORY_HEADING: &str = "\t\tVerzeichnis:\n\n";
pub const CONTENTS_HEADING: &str = "\n\n\t\tInhalte:\n";
pub const DELETED_MARKER: &str = "Deleted file";
pub const CORRUPTED_MARKER: &str = "Corrupted file";

/// Converts every disk image of a corpus into a wrapped text file.
pub struct DiskmagPipeline<S: Storage, C: ConfigProvider, R: DiskImageReader> {
    storage: S,
    config: C,
    reader: R,
}

impl<S: Storage, C: ConfigProvider, R: DiskImageReader> DiskmagPipeline<S, C, R> {
    pub fn new(storage: S, config: C, reader: R) -> Self {
        Self {
            storage,
            config,
            reader,
        }
    }

    fn corpus(&self) -> Result<Corpus> {
        Corpus::new(self.config.corpus_name(), self.config.corpus_path())
    }

    fn output_root(&self) -> PathBuf {
        PathBuf::from(
            self.config
                .output_path()
                .unwrap_or_else(|| self.config.corpus_path()),
        )
    }

    fn read_image(&self, corpus: &Corpus, relative_path: &Path) -> Result<ExtractedImage> {
        let path = corpus.root().join(relative_path);
        let image = self.reader.open(&path)?;

        let listing = image.directory()?;
        // drop the disk header and the blocks-free line
        let directory = match listing.len() {
            0..=2 => Vec::new(),
            n => listing[1..n - 1].to_vec(),
        };
        let files = image.glob(b"*")?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path.parent();
        let issue = parent
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let diskmag = parent
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let output_name = match self.config.output_naming() {
            OutputNaming::BesideImage => format!("{}.txt", filename),
            OutputNaming::IssueIndex => title_name(&path, self.config.image_extensions())?,
        };

        Ok(ExtractedImage {
            size_bytes: fs::metadata(&path)?.len(),
            path,
            relative_path: relative_path.to_path_buf(),
            filename,
            diskmag,
            issue,
            directory,
            files,
            output_name,
        })
    }

    fn render_file(&self, file: &ProgramFile, summary: &mut ClassificationSummary) -> String {
        if file.is_deleted() {
            return DELETED_MARKER.to_string();
        }
        let Some(content) = &file.content else {
            return CORRUPTED_MARKER.to_string();
        };

        let result = classify(content, self.config.char_threshold());
        summary.record(&result);
        tracing::debug!(
            "\"{}\": {:?}",
            file.name,
            result.encoding().map(|e| e.name())
        );

        let mut body = result.render();
        if self.config.fix_umlauts() && result.is_text() {
            body = replace_alt_umlauts(&body);
        }
        wrap(&body, self.config.line_length())
    }

    fn convert(&self, image: &ExtractedImage) -> ConvertedDocument {
        let mut summary = ClassificationSummary::default();

        let mut text = String::from(DIRECTORY_HEADING);
        text.push_str(&image.directory.join("\n"));
        text.push_str(CONTENTS_HEADING);
        for file in &image.files {
            let body = self.render_file(file, &mut summary);
            text.push_str(&format!("\n\t{}\n\n{}\n", file.name, body));
        }

        let relative_path = image
            .relative_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&image.output_name);

        let extensions: BTreeSet<&str> = image.files.iter().map(|f| f.file_type.label()).collect();

        let metadata = MetadataRecord {
            file: image.filename.clone(),
            diskmag: image.diskmag.clone(),
            issue: image.issue.clone(),
            converted_location: self.output_root().join(&relative_path).display().to_string(),
            location: image.path.display().to_string(),
            size_kb: image.size_bytes as f64 / 1024.0,
            file_count: image.files.len(),
            extensions: extensions.into_iter().collect::<Vec<_>>().join(", "),
            text_files: summary.text,
            code_files: summary.code,
            compressed_files: summary.compressed,
            processed_at: Some(Utc::now()),
        };

        ConvertedDocument {
            relative_path,
            text,
            metadata,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: DiskImageReader> Pipeline for DiskmagPipeline<S, C, R> {
    async fn extract(&self) -> Result<Vec<ExtractedImage>> {
        let corpus = self.corpus()?;
        tracing::info!(
            "🚀 Reading corpus \"{}\" from: {}",
            corpus.name(),
            corpus.root().display()
        );

        if self.config.unpack() {
            corpus.unpack(self.config.remove_zip())?;
        }

        let paths = corpus.disk_images(self.config.image_extensions())?;
        tracing::debug!("Found {} disk images", paths.len());

        let mut images = Vec::with_capacity(paths.len());
        for relative_path in paths {
            match self.read_image(&corpus, &relative_path) {
                Ok(image) => images.push(image),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping {}: {}", relative_path.display(), e);
                }
            }
        }

        tracing::info!("📊 Extracted {} disk images", images.len());
        Ok(images)
    }

    async fn transform(&self, images: Vec<ExtractedImage>) -> Result<TransformResult> {
        tracing::info!("🔧 Classifying files of {} disk images", images.len());

        let documents: Vec<ConvertedDocument> =
            images.iter().map(|image| self.convert(image)).collect();

        let text_files: usize = documents.iter().map(|d| d.metadata.text_files).sum();
        tracing::info!(
            "✅ Transform complete: {} documents, {} text files",
            documents.len(),
            text_files
        );
        Ok(TransformResult { documents })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::info!("💾 Writing {} documents", result.documents.len());

        for document in &result.documents {
            let path = document.relative_path.to_string_lossy();
            self.storage
                .write_file(&path, document.text.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", path);
        }

        let records: Vec<MetadataRecord> = result
            .documents
            .into_iter()
            .map(|document| document.metadata)
            .collect();
        let store = MetadataStore::new(self.config.metadata_path());
        let total = store.append(&records)?;
        tracing::info!(
            "📦 Metadata saved to {} ({} records)",
            store.path().display(),
            total
        );

        if self.config.save_file_list() {
            let corpus = self.corpus()?;
            let list_path = corpus.root().join(corpus.file_list_name());
            fs::write(&list_path, corpus.file_list_report()?)?;
            tracing::info!("📝 File list saved to {}", list_path.display());
        }

        Ok(store.path().display().to_string())
    }
}
