//! Extract structured compositions from an anthology.
//!
//! Reads a Document (pages of positioned text spans) as JSON and writes a JSON
//! array of canonical composition records. With `--page-texts` the input is a
//! JSON object mapping 0-based page indices to OCR text instead.
//!
//! Usage:
//!   extract_compositions anthology.json
//!   extract_compositions anthology.json --output records.json --source-id guruguha
//!   extract_compositions ocr_pages.json --page-texts --config extraction.json

use kriti_oxide::extractors::TextQuality;
use kriti_oxide::{Document, ExtractionConfig, ExtractionPipeline, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

struct CliConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    source_id: Option<String>,
    composer: Option<String>,
    page_texts: bool,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = CliConfig {
            input: None,
            output: None,
            config: None,
            source_id: None,
            composer: None,
            page_texts: false,
            verbose: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        cli.output = Some(PathBuf::from(&args[i]));
                    }
                },
                "--config" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        cli.config = Some(PathBuf::from(&args[i]));
                    }
                },
                "--source-id" => {
                    i += 1;
                    if i < args.len() {
                        cli.source_id = Some(args[i].clone());
                    }
                },
                "--composer" => {
                    i += 1;
                    if i < args.len() {
                        cli.composer = Some(args[i].clone());
                    }
                },
                "--page-texts" => {
                    cli.page_texts = true;
                },
                "--verbose" | "-v" => {
                    cli.verbose = true;
                },
                other if !other.starts_with('-') && cli.input.is_none() => {
                    cli.input = Some(PathBuf::from(other));
                },
                other => {
                    eprintln!("Ignoring unknown argument: {}", other);
                },
            }
            i += 1;
        }

        cli
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: &CliConfig, input: &Path) -> Result<usize> {
    let config = match &cli.config {
        Some(path) => ExtractionConfig::from_json_file(path)?,
        None => ExtractionConfig::default(),
    };

    let mut pipeline = ExtractionPipeline::new(config);
    if let Some(source_id) = &cli.source_id {
        pipeline = pipeline.with_source_id(source_id.clone());
    }
    if let Some(composer) = &cli.composer {
        pipeline = pipeline.with_composer_hint(composer.clone());
    }

    let raw = fs::read_to_string(input)?;
    let records = if cli.page_texts {
        let pages: BTreeMap<usize, String> = serde_json::from_str(&raw)?;
        pipeline.process_page_texts(&pages)
    } else {
        let document = Document::from_json_str(&raw)?;
        document.validate()?;

        let quality = TextQuality::measure(&document);
        if let Some(reason) = quality.ocr_reason() {
            log::warn!(
                "{}: text layer looks unusable ({:?}, {} of {} pages with text); OCR recommended",
                input.display(),
                reason,
                quality.text_pages,
                quality.total_pages
            );
        }

        pipeline.process_document(&document)
    };

    let json = serde_json::to_string_pretty(&records)?;
    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
        },
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.write_all(b"\n")?;
        },
    }

    Ok(records.len())
}

fn main() {
    let cli = CliConfig::from_args();
    init_logging(cli.verbose);

    let Some(input) = cli.input.clone() else {
        eprintln!("Usage: extract_compositions <input.json> [--output FILE] [--config FILE]");
        eprintln!("                            [--source-id ID] [--composer NAME] [--page-texts] [--verbose]");
        std::process::exit(2);
    };

    match run(&cli, &input) {
        Ok(count) => {
            log::info!("Extracted {} composition(s) from {}", count, input.display());
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
