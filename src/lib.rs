pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::d64::D64Reader;
pub use core::charset::Encoding;
pub use core::classifier::{classify, shannon_entropy, ClassificationResult};
pub use core::{engine::ConversionEngine, pipeline::DiskmagPipeline};
pub use utils::error::{DiskmagError, Result};
