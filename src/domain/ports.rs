use crate::domain::model::{ExtractedImage, ProgramFile, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// How converted text files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputNaming {
    /// `{image file name}.txt` next to the image.
    #[default]
    BesideImage,
    /// `{issue folder}_{n}.txt`, numbered by position in the folder.
    IssueIndex,
}

pub trait ConfigProvider: Send + Sync {
    fn corpus_name(&self) -> &str;
    fn corpus_path(&self) -> &str;
    /// Root for converted files; `None` writes next to the images.
    fn output_path(&self) -> Option<&str>;
    fn metadata_path(&self) -> &str;
    fn char_threshold(&self) -> f64;
    fn line_length(&self) -> usize;
    fn image_extensions(&self) -> &[String];
    fn unpack(&self) -> bool;
    fn remove_zip(&self) -> bool;
    fn save_file_list(&self) -> bool;
    fn fix_umlauts(&self) -> bool;
    fn output_naming(&self) -> OutputNaming;
}

/// An opened disk image.
pub trait DiskImage {
    /// Listing lines: header, one line per entry, blocks free.
    fn directory(&self) -> Result<Vec<String>>;
    /// Entries whose raw name matches `pattern`, in directory order.
    fn glob(&self, pattern: &[u8]) -> Result<Vec<ProgramFile>>;
}

pub trait DiskImageReader: Send + Sync {
    type Image: DiskImage;

    fn open(&self, path: &Path) -> Result<Self::Image>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ExtractedImage>>;
    async fn transform(&self, images: Vec<ExtractedImage>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
