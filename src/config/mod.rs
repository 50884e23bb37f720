pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;

pub const DEFAULT_CHAR_THRESHOLD: f64 = 0.5;
pub const DEFAULT_LINE_LENGTH: usize = 80;
pub const DEFAULT_METADATA_PATH: &str = "metadata.json";
pub const DEFAULT_IMAGE_EXTENSION: &str = "d64";

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_non_empty_string("corpus_name", config.corpus_name())?;
    validation::validate_existing_dir("corpus_path", config.corpus_path())?;
    if let Some(output_path) = config.output_path() {
        validation::validate_path("output_path", output_path)?;
    }
    validation::validate_path("metadata_path", config.metadata_path())?;
    validation::validate_range("char_threshold", config.char_threshold(), 0.0, 1.0)?;
    validation::validate_positive_number("line_length", config.line_length(), 1)?;
    validation::validate_extensions("image_extensions", config.image_extensions())?;
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::*;
    use crate::core::OutputNaming;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "diskmag-text")]
    #[command(about = "Extract readable text from C64 diskmag disk images")]
    pub struct CliConfig {
        /// Root directory of the corpus
        #[arg(long)]
        pub corpus_path: String,

        #[arg(long, default_value = "corpus")]
        pub corpus_name: String,

        /// Root for converted text files (defaults to the corpus root)
        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(long, default_value = DEFAULT_METADATA_PATH)]
        pub metadata_path: String,

        /// Minimum share of letters for a file to count as text
        #[arg(long, default_value_t = DEFAULT_CHAR_THRESHOLD)]
        pub char_threshold: f64,

        #[arg(long, default_value_t = DEFAULT_LINE_LENGTH)]
        pub line_length: usize,

        #[arg(long, value_delimiter = ',', default_value = DEFAULT_IMAGE_EXTENSION)]
        pub image_extensions: Vec<String>,

        #[arg(long, help = "Extract zip archives before converting")]
        pub unpack: bool,

        #[arg(long, help = "Delete zip archives after extracting them")]
        pub remove_zip: bool,

        #[arg(long, help = "Write {corpus_name}_filelist.txt into the corpus root")]
        pub save_file_list: bool,

        #[arg(long, help = "Replace ae/oe/ue/ss spellings with umlauts")]
        pub fix_umlauts: bool,

        #[arg(long, value_enum, default_value_t = OutputNaming::BesideImage)]
        pub output_naming: OutputNaming,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log process CPU and memory per stage")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn corpus_name(&self) -> &str {
            &self.corpus_name
        }

        fn corpus_path(&self) -> &str {
            &self.corpus_path
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn metadata_path(&self) -> &str {
            &self.metadata_path
        }

        fn char_threshold(&self) -> f64 {
            self.char_threshold
        }

        fn line_length(&self) -> usize {
            self.line_length
        }

        fn image_extensions(&self) -> &[String] {
            &self.image_extensions
        }

        fn unpack(&self) -> bool {
            self.unpack
        }

        fn remove_zip(&self) -> bool {
            self.remove_zip
        }

        fn save_file_list(&self) -> bool {
            self.save_file_list
        }

        fn fix_umlauts(&self) -> bool {
            self.fix_umlauts
        }

        fn output_naming(&self) -> OutputNaming {
            self.output_naming
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_provider(self)
        }
    }

}
