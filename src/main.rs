// Command-line front end for ID card validation

use clap::{Parser, Subcommand, ValueEnum};
use idcheck::{
    models::{OcrReading, RecognitionTarget, ValidationMode, ValidationResult},
    processing::{tessdata, TesseractEngine},
    IdCardValidator, ValidatorConfig,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "idcheck")]
#[command(about = "Validate national ID card photos against an expected name")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding *.traineddata files
    #[arg(long, global = true)]
    tessdata: Option<PathBuf>,

    /// OCR languages, e.g. chi_tra+eng
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an ID card photo against an expected name
    Validate {
        image: PathBuf,
        #[arg(short, long)]
        name: String,
        #[arg(long, value_enum, default_value = "full")]
        mode: ModeArg,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read text from an image without validating it
    Read {
        image: PathBuf,
        #[arg(long, value_enum, default_value = "general")]
        target: TargetArg,
        #[arg(long)]
        json: bool,
    },
    /// List installed Tesseract languages
    Languages,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    NameRegion,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => ValidationMode::FullDocument,
            ModeArg::NameRegion => ValidationMode::NameRegion,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    General,
    IdNumber,
}

impl From<TargetArg> for RecognitionTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::General => RecognitionTarget::General,
            TargetArg::IdNumber => RecognitionTarget::IdNumber,
        }
    }
}

fn passed(ok: bool) -> &'static str {
    if ok {
        "PASSED"
    } else {
        "FAILED"
    }
}

fn print_validation_report(image: &Path, name: &str, result: &ValidationResult) {
    println!("\n===============================================");
    println!("        ID CARD VALIDATION REPORT");
    println!("===============================================\n");

    println!("  Image: {}", image.display());
    println!("  Expected Name: {}", name);
    println!("  Extracted Text: {}", result.extracted_text);

    println!("\nVALIDATION STEPS:");
    println!("  1. Image Format: {}", passed(result.image_format_valid));
    println!("  2. Name Match: {}", passed(result.name_matches));
    println!("  3. Document Format: {}", passed(result.document_format_detected));

    println!("\n{}", result.message);
    println!(
        "\nID card validation result: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn print_reading(reading: &OcrReading) {
    println!("Text: {}", reading.text);
    println!("Confidence: {:.2}", reading.confidence);
    println!("{}", reading.message);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ValidatorConfig::from_file(path)?,
        None => ValidatorConfig::default(),
    };
    if let Some(dir) = cli.tessdata {
        config.engine.tessdata_dir = Some(dir);
    }
    if let Some(lang) = cli.lang {
        config.engine.language = lang;
    }

    match cli.command {
        Command::Languages => {
            let dir = config
                .engine
                .tessdata_dir
                .clone()
                .or_else(|| std::env::var_os("TESSDATA_PREFIX").map(PathBuf::from))
                .ok_or("no tessdata directory: pass --tessdata or set TESSDATA_PREFIX")?;
            println!("Languages in {}:", dir.display());
            for lang in tessdata::available_languages(&dir)? {
                println!("  - {}", lang);
            }
            let missing = tessdata::missing_languages(&dir, &config.engine.language)?;
            if !missing.is_empty() {
                println!("Missing for '{}': {}", config.engine.language, missing.join(", "));
            }
        }
        Command::Validate {
            image,
            name,
            mode,
            json,
        } => {
            let engine = TesseractEngine::new(&config.engine);
            let validator = IdCardValidator::with_config(Box::new(engine), config)?;
            info!("Validating {:?}", image);
            let result = validator.validate_file(&image, &name, mode.into())?;

            if json {
                let mut value = serde_json::to_value(&result)?;
                value["isValid"] = serde_json::Value::Bool(result.is_valid());
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_validation_report(&image, &name, &result);
            }
        }
        Command::Read { image, target, json } => {
            let engine = TesseractEngine::new(&config.engine);
            let validator = IdCardValidator::with_config(Box::new(engine), config)?;
            let bytes = std::fs::read(&image)?;
            let reading = validator.read_text(&bytes, target.into());

            if json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                print_reading(&reading);
            }
        }
    }

    Ok(())
}
