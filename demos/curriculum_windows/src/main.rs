// =============================================================================
// Curriculum Windows: phase-switched text window streams (ladder)
// =============================================================================
//
// Slices a text corpus into overlapping fixed-length windows, builds one
// shuffled, repeated, batched stream per window length ("phase"), and feeds a
// single consumer from whichever phase the schedule is on by handing it that
// phase's opaque handle.
//
// With no --corpus and no corpus in the config file, the corpus is this
// program's own source text.
//
// Usage:
//   cargo run -p curriculum-windows-demo
//   cargo run -p curriculum-windows-demo -- --lengths 4,8,16 --steps 2
//   cargo run -p curriculum-windows-demo -- --config curriculum.toml -v
//   cargo run -p curriculum-windows-demo -- --print-config

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use ladder::prelude::*;

const OWN_SOURCE: &str = include_str!("main.rs");

#[derive(Debug, Parser)]
#[command(
    name = "curriculum-windows",
    version,
    about = "Feed phase-specific text window streams through one handle-switched consumer"
)]
struct Args {
    /// Curriculum TOML file (phases and pipeline settings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text file to window (overrides the config file)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Comma-separated window lengths, one phase each (replaces configured phases)
    #[arg(long, value_delimiter = ',')]
    lengths: Vec<usize>,

    /// Batches per phase when --lengths is given
    #[arg(long, default_value_t = 3)]
    steps: usize,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    shuffle_buffer: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn effective_config(args: &Args) -> ladder::Result<CurriculumConfig> {
    let mut config = match &args.config {
        Some(path) => CurriculumConfig::load(path)?,
        None => CurriculumConfig {
            pipeline: PipelineConfig::default().batch_size(4),
            ..Default::default()
        },
    };
    if !args.lengths.is_empty() {
        config = config.with_lengths(&args.lengths, args.steps);
    }
    if let Some(bs) = args.batch_size {
        config.pipeline.batch_size = bs;
    }
    if let Some(n) = args.shuffle_buffer {
        config.pipeline.shuffle_buffer = n;
    }
    if let Some(seed) = args.seed {
        config.pipeline.seed = Some(seed);
    }
    if args.corpus.is_some() {
        config.corpus = args.corpus.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Show control characters so multi-line windows print on one line.
fn escape(window: &str) -> String {
    window.escape_debug().to_string()
}

fn main() -> ladder::Result<()> {
    let args = Args::parse();
    ladder::logging::init(args.verbose)?;

    let config = effective_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let corpus = match &config.corpus {
        Some(path) => Corpus::from_path(path)?,
        None => Corpus::from_text(OWN_SOURCE),
    };
    let source = corpus
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<own source>".into());
    info!(
        source = %source,
        chars = corpus.char_len(),
        "corpus ready"
    );

    let mut curriculum = Curriculum::from_config(&config, Arc::new(corpus))?;

    println!("Phases:");
    for (phase, handle) in curriculum.phases().iter().zip(curriculum.handles()) {
        println!(
            "  {:<16} window_length={:<4} steps={:<3} handle={}",
            phase.name, phase.window_length, phase.steps, handle
        );
    }
    println!();

    let summary = curriculum.run(|phase, handle, step, batch| {
        println!(
            "step {:>3} | {} (len {}) via {}",
            step, phase.name, phase.window_length, handle
        );
        for window in &batch {
            println!("    \"{}\"", escape(window));
        }
        Ok(())
    })?;

    println!();
    println!(
        "Delivered {} batches ({} steps skipped).",
        summary.batches, summary.skipped_steps
    );
    Ok(())
}
