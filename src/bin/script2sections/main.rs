//! CLI tool to turn a video script into a sectioned project document.
//!
//! Usage:
//!   script2sections --input script.txt [--output project.automerge] [--json project.json]
//!                   [--payload payload.json] [--max-chars 30] [--stats] [-v]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scriptcut::{
    ProjectDocument, RenderPayload, ScriptStats, SectionStore, SegmentConfig, DEFAULT_MAX_CHARS,
};

#[derive(Parser, Debug)]
#[command(
    name = "script2sections",
    about = "Split a video script into sections and save them as an Automerge project",
    version
)]
struct Args {
    /// Input script file (plain text)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (defaults to input path with .automerge extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the project state as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also write the render request payload as JSON
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Project id placed in the render payload
    #[arg(long, default_value = "local")]
    project_id: String,

    /// Soft maximum section length in characters
    #[arg(long, env = "SCRIPTCUT_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Print statistics about the conversion
    #[arg(long, default_value = "false")]
    stats: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // 1. Validate input exists
    let input_path = &args.input;
    if !input_path.exists() {
        anyhow::bail!("Input file does not exist: {}", input_path.display());
    }

    // 2. Read script
    let script = std::fs::read_to_string(input_path).context("Failed to read input file")?;
    let stats = ScriptStats::of(&script);
    debug!(
        words = stats.word_count,
        chars = stats.char_count,
        "read script"
    );

    // 3. Segment and seed the store
    let config = SegmentConfig::new(args.max_chars);
    let store = SectionStore::from_script_with(&script, &config)
        .with_context(|| format!("Cannot create sections from {}", input_path.display()))?;
    info!(sections = store.len(), "segmented script");

    // 4. Save as Automerge document
    let mut doc = ProjectDocument::from_store(&store).context("Failed to build document")?;
    let binary = doc.save();

    let output_path = args.output.clone().unwrap_or_else(|| {
        let mut path = input_path.clone();
        path.set_extension("automerge");
        path
    });
    std::fs::write(&output_path, &binary).context("Failed to write output file")?;

    // 5. Optional JSON exports
    if let Some(ref json_path) = args.json {
        let json = doc.to_json().context("Failed to serialize project")?;
        std::fs::write(json_path, json).context("Failed to write JSON file")?;
    }

    if let Some(ref payload_path) = args.payload {
        let payload = RenderPayload::from_store(&store, args.project_id.as_str())
            .context("Failed to build render payload")?;
        let json = payload.to_json().context("Failed to serialize payload")?;
        std::fs::write(payload_path, json).context("Failed to write payload file")?;
    }

    // 6. Optional stats
    if args.stats {
        println!();
        println!("Segmentation statistics:");
        println!("  Words:       {:>10}", stats.word_count);
        println!("  Characters:  {:>10}", stats.char_count);
        println!("  Max chars:   {:>10}", config.max_chars);
        println!("  Sections:    {:>10}", store.len());
        println!(
            "  Duration:    {:>9}s",
            store.estimated_total_duration_secs()
        );
        println!("  Binary size: {:>10} bytes", binary.len());
        println!();
        for section in store.sections() {
            println!(
                "  {:>4}  {:>3}s  {}",
                section.id,
                section.estimated_duration_secs(),
                section.text
            );
        }
    }

    println!();
    println!(
        "Successfully segmented {} → {} ({} sections)",
        input_path.display(),
        output_path.display(),
        store.len()
    );

    Ok(())
}
