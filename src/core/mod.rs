pub mod charset;
pub mod classifier;
pub mod corpus;
pub mod engine;
pub mod metadata;
pub mod pipeline;
pub mod text;

pub use crate::domain::model::{ExtractedImage, ProgramFile, TransformResult};
pub use crate::domain::ports::{
    ConfigProvider, DiskImage, DiskImageReader, OutputNaming, Pipeline, Storage,
};
pub use crate::utils::error::Result;
