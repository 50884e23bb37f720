use anyhow::Context;
use clap::Parser;
use diskmag_text::core::corpus::Corpus;
use diskmag_text::core::ConfigProvider;
use diskmag_text::utils::error::ErrorSeverity;
use diskmag_text::utils::{logger, validation::Validate};
use diskmag_text::{ConversionEngine, D64Reader, DiskmagPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Convert a diskmag corpus described by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "diskmag.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the classifier threshold from config
    #[arg(long)]
    char_threshold: Option<f64>,

    /// List what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("🚀 Starting TOML-based diskmag conversion");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(threshold) = args.char_threshold {
        config.classifier.char_threshold = Some(threshold);
        tracing::info!("🔧 Character threshold overridden to: {}", threshold);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        return perform_dry_run(&config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let output_root = config
        .output_path()
        .unwrap_or_else(|| config.corpus_path())
        .to_string();
    let storage = LocalStorage::new(output_root);
    let pipeline = DiskmagPipeline::new(storage, config, D64Reader);
    let engine = ConversionEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(metadata_path) => {
            tracing::info!("✅ Conversion completed successfully!");
            println!("✅ Conversion completed successfully!");
            println!("📁 Metadata saved to: {}", metadata_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => return Ok(()),
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Corpus: {} ({})", config.corpus_name(), config.corpus_path());
    println!("  Output: {}", config.output_path().unwrap_or("next to the disk images"));
    println!("  Metadata: {}", config.metadata_path());
    println!("  Character threshold: {}", config.char_threshold());
    println!("  Line length: {}", config.line_length());
    println!("  Image extensions: {}", config.image_extensions().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let corpus = Corpus::new(config.corpus_name(), config.corpus_path())?;

    println!("🔍 Dry Run Analysis:");
    println!();

    let files = corpus.files()?;
    let archives = files
        .iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        })
        .count();
    println!("📦 Corpus contents:");
    println!("  Files: {}", files.len());
    println!("  Zip archives: {}", archives);
    if archives > 0 && !config.unpack() {
        println!("  ⚠️ unpack is disabled; images inside archives will be skipped");
    }

    let images = corpus.disk_images(config.image_extensions())?;
    println!();
    println!("💾 Disk images to convert: {}", images.len());
    for image in &images {
        println!("  {}", image.display());
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
