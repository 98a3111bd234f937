use anyhow::{Context, Result};
use clap::Parser;
use qsmith_cli::{generate_batch, load_catalog, BatchOptions};
use std::io::{stderr, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qsmith")]
#[command(about = "Generate random, well-typed SQL queries from a catalog", long_about = None)]
struct Args {
    /// YAML catalog with tables, operators and literal spellings
    #[arg(long)]
    catalog: PathBuf,

    /// Root random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of statements to print
    #[arg(long, short = 'n', default_value_t = 10)]
    count: usize,

    /// Worker threads, each with its own derived seed
    #[arg(long, short = 'j', default_value_t = 1)]
    jobs: usize,

    /// Redraw ceiling for any single production
    #[arg(long, default_value_t = 1000)]
    max_retries: usize,

    /// Print node counts per production kind to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let mut subscriber = tracing_subscriber::fmt()
        .with_writer(stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );

    if !stderr().is_terminal() {
        subscriber = subscriber.with_ansi(false)
    }
    subscriber.init();

    let args = Args::parse();
    tracing::info!("Starting qsmith with {:?}", args);

    let schema = load_catalog(&args.catalog)
        .with_context(|| format!("Failed to prepare catalog {:?}", args.catalog))?;

    let options = BatchOptions {
        seed: args.seed,
        count: args.count,
        jobs: args.jobs,
        max_retries: args.max_retries,
    };
    let batch = generate_batch(schema, &options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for statement in &batch.statements {
        writeln!(out, "{};", statement)?;
    }
    out.flush()?;

    tracing::info!(
        statements = batch.statements.len(),
        nodes = batch.stats.nodes(),
        "Done"
    );

    if args.stats {
        eprint!("{}", batch.stats);
    }

    Ok(())
}
