//! Recommendation engine matching job postings to preferences.
//!
//! Postings are indexed two ways:
//!
//! - a [`PreferenceIndex`], a decision tree filtering postings by yes/no/don't-care
//!   answers to seven questions, relaxing the answers when too few postings match;
//! - a [`SimilarityGraph`], a complete graph whose edges weigh how similar two
//!   postings are, used to suggest postings close to a chosen one.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//!
//! use career_compass::decision::Answer;
//! use career_compass::job::JobRecord;
//! use career_compass::loader::JobLoader;
//! use career_compass::SimilarityScorer;
//!
//! let csv = "\
//! title,employer,rating,url,desc,skills,lat,lng,city,country,period,pay,id,full
//! Backend Dev,Acme,4.5,u,Python APIs,Python,43.65,-79.38,Toronto,Canada,ANNUAL,80000,1,Remote ok
//! Web Dev,Beta,3.5,u,Frontend work,JavaScript,43.59,-79.64,Mississauga,Canada,HOURLY,40,2,React
//! Data Eng,Gamma,2.0,u,Pipelines,Python,40.71,-74.01,New York,United States,MONTHLY,9000,3,Spark
//! ";
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42);
//! let loaded = JobLoader::new().load(csv.as_bytes(), &mut rng)?;
//!
//! let (graph, index) = career_compass::build(loaded.records, SimilarityScorer::default());
//!
//! let answers = Answer::from_codes([0, 2, 2, 2, 1, 2, 2]).unwrap();
//! let result = index.search(&answers);
//! assert_eq!(result.jobs.len(), 3);
//!
//! let similar = graph.neighbors("1", 1, 0, &mut rng)?;
//! assert_eq!(similar[0].id(), "2");
//! # Ok::<(), career_compass::errors::CompassError>(())
//! ```
#![deny(missing_docs)]

pub mod decision;
pub mod errors;
pub mod graph;
pub mod index;
pub mod job;
pub mod loader;
pub mod scoring;

use std::sync::Arc;

pub use errors::{CompassError, Result};
pub use graph::SimilarityGraph;
pub use index::{PreferenceIndex, PreferenceIndexBuilder};
pub use job::JobRecord;
pub use scoring::{SimilarityScorer, SimilarityWeights};

/// Builds the similarity graph and the preference index over `records`.
///
/// The graph's pairs are scored in parallel while the index is built on
/// another thread.
pub fn build<I>(records: I, scorer: SimilarityScorer) -> (SimilarityGraph, PreferenceIndex)
where
    I: IntoIterator<Item = JobRecord>,
{
    let records: Vec<_> = records.into_iter().map(Arc::new).collect();
    rayon::join(
        || SimilarityGraph::new(scorer).build_in_parallel(records.iter().cloned()),
        || build_index(records.iter().cloned()),
    )
}

/// Does the same as [`build`] on the current thread.
pub fn build_sequential<I>(records: I, scorer: SimilarityScorer) -> (SimilarityGraph, PreferenceIndex)
where
    I: IntoIterator<Item = JobRecord>,
{
    let records: Vec<_> = records.into_iter().map(Arc::new).collect();
    (
        SimilarityGraph::new(scorer).build(records.iter().cloned()),
        build_index(records.iter().cloned()),
    )
}

fn build_index<I>(records: I) -> PreferenceIndex
where
    I: IntoIterator<Item = Arc<JobRecord>>,
{
    let mut builder = PreferenceIndexBuilder::new();
    builder.extend(records);
    builder.finish()
}
