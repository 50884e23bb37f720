use crate::config::{
    validate_provider, DEFAULT_CHAR_THRESHOLD, DEFAULT_IMAGE_EXTENSION, DEFAULT_LINE_LENGTH,
    DEFAULT_METADATA_PATH,
};
use crate::core::{ConfigProvider, OutputNaming};
use crate::utils::error::{DiskmagError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub name: Option<String>,
    pub path: Option<String>,
    pub unpack: Option<bool>,
    pub remove_zip: Option<bool>,
    pub save_file_list: Option<bool>,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    vec![DEFAULT_IMAGE_EXTENSION.to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub char_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub metadata_path: Option<String>,
    pub line_length: Option<usize>,
    pub naming: Option<OutputNaming>,
    pub fix_umlauts: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| panic!("invalid env pattern: {e}"))
    })
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DiskmagError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DiskmagError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${NAME}` with the environment variable; unknown names stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .is_some_and(|level| level.eq_ignore_ascii_case("debug"))
    }
}

impl ConfigProvider for TomlConfig {
    fn corpus_name(&self) -> &str {
        self.corpus.name.as_deref().unwrap_or("corpus")
    }

    fn corpus_path(&self) -> &str {
        self.corpus.path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn metadata_path(&self) -> &str {
        self.output
            .metadata_path
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_PATH)
    }

    fn char_threshold(&self) -> f64 {
        self.classifier
            .char_threshold
            .unwrap_or(DEFAULT_CHAR_THRESHOLD)
    }

    fn line_length(&self) -> usize {
        self.output.line_length.unwrap_or(DEFAULT_LINE_LENGTH)
    }

    fn image_extensions(&self) -> &[String] {
        &self.corpus.image_extensions
    }

    fn unpack(&self) -> bool {
        self.corpus.unpack.unwrap_or(false)
    }

    fn remove_zip(&self) -> bool {
        self.corpus.remove_zip.unwrap_or(false)
    }

    fn save_file_list(&self) -> bool {
        self.corpus.save_file_list.unwrap_or(false)
    }

    fn fix_umlauts(&self) -> bool {
        self.output.fix_umlauts.unwrap_or(false)
    }

    fn output_naming(&self) -> OutputNaming {
        self.output.naming.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_required_field("corpus.path", &self.corpus.path)?;
        validate_provider(self)
    }
}
