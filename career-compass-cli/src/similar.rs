mod common;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use common::WeightArgs;

#[derive(Parser, Debug)]
#[clap(
    name = "career-compass-similar",
    about = "A program to find job postings similar to a given one."
)]
struct Args {
    /// File path to a CSV file of job postings.
    #[clap(short = 'i', long)]
    jobs_path: PathBuf,

    /// Id of the posting to find similar ones for.
    #[clap(short = 'j', long)]
    job_id: String,

    /// Number of postings to print.
    #[clap(short = 'l', long, default_value = "5")]
    limit: usize,

    /// Number of extra top candidates to sample from. The larger this value,
    /// the more varied but the less similar the printed postings.
    #[clap(short = 'o', long, default_value = "10")]
    offset: usize,

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

    let scorer = args.weights.scorer()?;
    let mut rng = common::seeded_rng(args.seed);

    let (graph, _) =
        common::load_and_build(&args.jobs_path, scorer, args.disable_parallel, &mut rng)?;

    let similar = graph
        .neighbors(&args.job_id, args.limit, args.offset, &mut rng)
        .with_context(|| format!("failed to find postings similar to {}", args.job_id))?;

    for (i, job) in similar.iter().enumerate() {
        let similarity = graph.similarity(&args.job_id, job.id())?;
        println!("similarity={similarity:.4}");
        common::print_job(i + 1, job);
    }

    Ok(())
}
