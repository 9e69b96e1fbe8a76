use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use vision_digest::{
    normalize, read_image, read_response_text, write_json, HumanReport, NormalizedAnalysis,
    VisionClient, VisionConfig,
};

#[derive(Parser)]
#[command(name = "vision-digest")]
#[command(author, version, about = "Turn vision model output into structured image analyses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a saved model response
    Normalize {
        /// File containing the raw model response (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Send an image to the model server and normalize its answer
    Analyze {
        /// Image file to analyze
        #[arg(long)]
        image: PathBuf,

        /// Model server URL (overrides VISION_DIGEST_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Model name (overrides VISION_DIGEST_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// File with a custom analysis prompt
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            format,
            verbose,
        } => {
            setup_logging(verbose);
            normalize_response(input, output, format)
        }
        Commands::Analyze {
            image,
            endpoint,
            model,
            prompt_file,
            output,
            format,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_image(image, endpoint, model, prompt_file, output, format).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn normalize_response(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Format,
) -> Result<()> {
    let text = read_response_text(input.as_deref()).context("Failed to load model response")?;
    info!("Normalizing {} chars of model output", text.len());

    let analysis = normalize(&text);
    emit(&analysis, output, format)
}

async fn analyze_image(
    image: PathBuf,
    endpoint: Option<String>,
    model: Option<String>,
    prompt_file: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Format,
) -> Result<()> {
    let mut config = VisionConfig::from_env();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(path) = prompt_file {
        config = config.with_prompt_file(&path)?;
    }

    info!("Loading image from {:?}", image);
    let bytes = read_image(&image)?;

    let client = VisionClient::new(config);
    let analysis = client
        .analyze_and_normalize(&bytes)
        .await
        .context("Image analysis failed")?;

    if !analysis.has_structure() {
        warn!("No structure found in model output, showing raw response");
    }

    emit(&analysis, output, format)
}

fn emit(analysis: &NormalizedAnalysis, output: Option<PathBuf>, format: Format) -> Result<()> {
    match (output, format) {
        (Some(path), Format::Json) => {
            write_json(analysis, &path)?;
            info!("Output written to {:?}", path);
        }
        (Some(path), Format::Text) => {
            HumanReport::new(analysis).write_file(&path)?;
            info!("Output written to {:?}", path);
        }
        (None, Format::Json) => {
            println!("{}", serde_json::to_string_pretty(analysis)?);
        }
        (None, Format::Text) => {
            print!("{}", HumanReport::new(analysis).format());
        }
    }
    Ok(())
}
