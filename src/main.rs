//! readout - Reconstruct text from braille or character detections
//!
//! Operational front-end for the reconstruction library: feeds detection
//! dumps (JSON produced by the upstream detector for one image) through the
//! engine, or renders annotated images from them.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use readout::annotate::{annotations, draw_annotations, encode_jpeg};
use readout::config::{default_config_dir, load_config, AppConfig};
use readout::decode::braille::cell_glyph;
use readout::detection::normalize;
use readout::transliterate::Transliterator;
use readout::{
    AlphanumericDecoder, BrailleDecoder, RawDetection, ReconstructionConfig, ReconstructionEngine,
};

/// Reconstruct text from braille or character detections
#[derive(Parser, Debug)]
#[command(name = "readout")]
#[command(about = "Reconstruct ordered text from unordered symbol detections")]
struct Args {
    /// Path to a TOML config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct the text of one image from its detection dump
    Reconstruct {
        /// JSON file with the raw detections for one image
        #[arg(short, long)]
        detections: PathBuf,

        /// Detector family the dump came from
        #[arg(short = 'k', long, value_enum, default_value = "braille")]
        decoder: DecoderArg,

        /// Override the line-clustering threshold (px)
        #[arg(long)]
        y_threshold: Option<f32>,

        /// Override the word-spacing factor
        #[arg(long)]
        space_factor: Option<f32>,

        /// Capitalize the first letter after each period
        #[arg(long)]
        sentence_case: bool,

        /// Also print the BRF translation (requires lou_translate)
        #[arg(long)]
        brf: bool,

        /// Also print the Unicode braille translation (requires lou_translate)
        #[arg(long)]
        braille: bool,
    },
    /// Draw detection boxes onto the source image
    Annotate {
        /// Source image the detections were computed on
        #[arg(short, long)]
        image: PathBuf,

        /// JSON file with the raw detections for the image
        #[arg(short, long)]
        detections: PathBuf,

        /// Output JPEG path
        #[arg(short, long)]
        output: PathBuf,

        /// Detector family the dump came from
        #[arg(short = 'k', long, value_enum, default_value = "braille")]
        decoder: DecoderArg,
    },
    /// Decode a single braille cell code
    Decode {
        /// 6-character binary cell code, dot order 1..6
        code: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DecoderArg {
    /// 6-dot braille cell detector
    Braille,
    /// Alphanumeric character detector
    Chars,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_or_default_config(args.config.as_deref());

    match args.command {
        Command::Reconstruct {
            detections,
            decoder,
            y_threshold,
            space_factor,
            sentence_case,
            brf,
            braille,
        } => {
            let raw = read_detections(&detections)?;

            let mut engine_config = ReconstructionConfig::from(&config.reconstruction);
            if let Some(y) = y_threshold {
                engine_config.y_threshold = y;
            }
            if let Some(f) = space_factor {
                engine_config.space_factor = f;
            }
            engine_config.sentence_case |= sentence_case;

            let text = match decoder {
                DecoderArg::Braille => {
                    ReconstructionEngine::with_config(BrailleDecoder::new()?, engine_config)
                        .reconstruct(&raw)
                }
                DecoderArg::Chars => {
                    ReconstructionEngine::with_config(AlphanumericDecoder::new(), engine_config)
                        .reconstruct(&raw)
                }
            };

            println!("{text}");

            if brf || braille {
                let transliterator = Transliterator::new(
                    &config.transliteration.command,
                    &config.transliteration.table,
                    &config.transliteration.display_table,
                );
                if brf {
                    let content = transliterator
                        .to_brf(&text)
                        .context("BRF translation failed")?;
                    println!("--- brf ---");
                    println!("{content}");
                }
                if braille {
                    let content = transliterator
                        .to_ascii_braille(&text)
                        .context("Braille translation failed")?;
                    println!("--- braille ---");
                    println!("{content}");
                }
            }
        }
        Command::Annotate {
            image,
            detections,
            output,
            decoder,
        } => {
            let raw = read_detections(&detections)?;

            let normalized = match decoder {
                DecoderArg::Braille => normalize(&raw, &BrailleDecoder::new()?),
                DecoderArg::Chars => normalize(&raw, &AlphanumericDecoder::new()),
            };
            let records = annotations(&normalized);

            let mut img = image::open(&image)
                .with_context(|| format!("Failed to load image {:?}", image))?
                .to_rgb8();
            draw_annotations(&mut img, &records, &(&config.annotation).into());

            let bytes = encode_jpeg(&img)?;
            fs::write(&output, bytes)
                .with_context(|| format!("Failed to write annotated image {:?}", output))?;

            info!("Annotated {} detections into {:?}", records.len(), output);

            // The record list is the machine-readable half of the output
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Decode { code } => {
            let decoder = BrailleDecoder::new()?;
            println!("{} {}", decoder.letter(&code), cell_glyph(&code));
        }
    }

    Ok(())
}

/// Load configuration from the given path, the user config dir, or defaults
fn load_or_default_config(path: Option<&std::path::Path>) -> AppConfig {
    if let Some(path) = path {
        match load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(err) => {
                tracing::warn!("Could not load {:?} ({}), using defaults", path, err);
                return AppConfig::default();
            }
        }
    }

    if let Ok(config_dir) = default_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }

    info!("Using default configuration");
    AppConfig::default()
}

/// Read a detection dump: a JSON array of raw detections
fn read_detections(path: &std::path::Path) -> Result<Vec<RawDetection>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read detection dump {:?}", path))?;
    let detections: Vec<RawDetection> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse detection dump {:?}", path))?;
    Ok(detections)
}
