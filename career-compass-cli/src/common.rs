use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use career_compass::job::JobRecord;
use career_compass::loader::JobLoader;
use career_compass::{PreferenceIndex, SimilarityGraph, SimilarityScorer, SimilarityWeights};
use clap::Args;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing_subscriber::EnvFilter;

const MAX_DESCRIPTION_CHARS: usize = 100;

/// Weights of the similarity sub-scores (must sum to 1).
#[derive(Args, Debug)]
pub struct WeightArgs {
    /// Weight of the distance between postings.
    #[clap(long, default_value = "0.2")]
    pub distance_weight: f64,

    /// Weight of being in the same country.
    #[clap(long, default_value = "0.3")]
    pub country_weight: f64,

    /// Weight of the employer rating difference.
    #[clap(long, default_value = "0.1")]
    pub rating_weight: f64,

    /// Weight of the number of shared skills.
    #[clap(long, default_value = "0.3")]
    pub skills_weight: f64,

    /// Weight of the annual pay difference.
    #[clap(long, default_value = "0.1")]
    pub pay_weight: f64,
}

impl WeightArgs {
    pub fn scorer(&self) -> Result<SimilarityScorer> {
        let weights = SimilarityWeights::new(
            self.distance_weight,
            self.country_weight,
            self.rating_weight,
            self.skills_weight,
            self.pay_weight,
        )?;
        Ok(SimilarityScorer::new(weights))
    }
}

/// Writes logs to stderr, filtered by `RUST_LOG` (default: `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn seeded_rng(seed: Option<u64>) -> Xoshiro256PlusPlus {
    let seed = seed.unwrap_or_else(rand::random::<u64>);
    tracing::debug!(seed, "Seeded the random number generator");
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

pub fn load_and_build<P>(
    path: P,
    scorer: SimilarityScorer,
    disable_parallel: bool,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<(SimilarityGraph, PreferenceIndex)>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let loaded = JobLoader::new()
        .load_path(path, rng)
        .with_context(|| format!("failed to load postings from {}", path.display()))?;

    let start = Instant::now();
    let structs = if disable_parallel {
        career_compass::build_sequential(loaded.records, scorer)
    } else {
        career_compass::build(loaded.records, scorer)
    };
    tracing::info!(
        "Built the graph and the index in {} sec",
        start.elapsed().as_secs_f64()
    );
    Ok(structs)
}

pub fn print_job(rank: usize, job: &JobRecord) {
    let l = job.listing();
    println!("{rank}. {} @ {} ({}, {})", l.title, l.employer, l.city, l.country);
    println!(
        "   id={} rating={:.1} pay=${:.0}/yr skills=[{}]",
        l.id,
        l.rating,
        job.annual_pay(),
        l.skills.join(", ")
    );
    if !l.short_description.is_empty() {
        println!("   {}", truncate(&l.short_description, MAX_DESCRIPTION_CHARS));
    }
    println!("   {}", l.url);
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
