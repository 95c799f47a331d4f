use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use info_to_onnx::{ConvertOptions, Converter};

/// Convert a `graph.info` / `graph.data` dump into an ONNX model
#[derive(Parser, Debug)]
#[command(name = "info-to-onnx", version, about)]
struct Cli {
    /// Directory holding graph.info and graph.data
    #[arg(short, long, default_value = "./")]
    input: PathBuf,

    /// Output model path (defaults to <input>/model_refactor.onnx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with conversion options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print graph statistics instead of writing a model
    #[arg(long)]
    summary: bool,

    /// Print the summary as JSON
    #[arg(long, requires = "summary")]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => ConvertOptions::from_json_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    let converter = Converter::new(options);

    if cli.summary {
        let summary = converter
            .summarize_dir(&cli.input)
            .with_context(|| format!("Failed to read graph from {}", cli.input.display()))?;
        if cli.json {
            println!("{}", summary.to_json()?);
        } else {
            println!("{}", summary);
        }
        return Ok(());
    }

    let path = converter
        .convert_dir(&cli.input, cli.output.as_deref())
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
