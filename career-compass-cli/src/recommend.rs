mod common;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use career_compass::decision::{Answer, Answers, DIMENSIONS};
use clap::Parser;

use common::WeightArgs;

#[derive(Parser, Debug)]
#[clap(
    name = "career-compass-recommend",
    about = "A program to find job postings matching your preferences."
)]
struct Args {
    /// File path to a CSV file of job postings.
    #[clap(short = 'i', long)]
    jobs_path: PathBuf,

    /// Seven comma-separated answers (yes, no, or don't care) to:
    /// in the United States? remote? frontend? rated above 3?
    /// Python? Java? C/C++?
    #[clap(short = 'a', long, value_delimiter = ',')]
    answers: Vec<Answer>,

    /// Maximum number of postings to print.
    #[clap(short = 'n', long, default_value = "10")]
    num_printed: usize,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Disables parallel construction.
    #[clap(short = 'p', long)]
    disable_parallel: bool,

    #[clap(flatten)]
    weights: WeightArgs,
}

fn main() -> Result<()> {
    common::init_logging();
    let args = Args::parse();

    let answers: Answers = args
        .answers
        .try_into()
        .map_err(|a: Vec<Answer>| anyhow!("Expected {DIMENSIONS} answers, got {}.", a.len()))?;
    let scorer = args.weights.scorer()?;
    let mut rng = common::seeded_rng(args.seed);

    let (graph, index) =
        common::load_and_build(&args.jobs_path, scorer, args.disable_parallel, &mut rng)?;
    if index.is_empty() {
        bail!("No postings were loaded from {}.", args.jobs_path.display());
    }

    let result = index.search(&answers);
    if result.relaxed != 0 {
        tracing::info!(
            relaxed = result.relaxed,
            "Too few postings matched; ignored the first answers"
        );
    }

    println!("Found {} postings", result.jobs.len());
    println!(
        "Estimated average salary: ${:.0}",
        graph.average_annual_pay()?.trunc()
    );
    println!();
    for (i, job) in result.jobs.iter().take(args.num_printed).enumerate() {
        common::print_job(i + 1, job);
    }

    Ok(())
}
