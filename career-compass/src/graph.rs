//! Complete weighted graph of postings.
//!
//! Vertices live in an arena indexed by insertion order; edges are stored once
//! per unordered pair under the key `(min, max)` of the two vertex indices.
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::errors::{CompassError, Result};
use crate::job::JobRecord;
use crate::scoring::SimilarityScorer;

const PROGRESS_INTERVAL: usize = 1000;

#[inline(always)]
const fn edge_key(i: usize, j: usize) -> (usize, usize) {
    if i < j {
        (i, j)
    } else {
        (j, i)
    }
}

/// Undirected graph whose edge weights are pairwise similarities.
#[derive(Clone, Debug, Default)]
pub struct SimilarityGraph {
    scorer: SimilarityScorer,
    vertices: Vec<Arc<JobRecord>>,
    ids: HashMap<String, usize>,
    edges: HashMap<(usize, usize), f64>,
}

impl SimilarityGraph {
    /// Creates an empty graph weighted by `scorer`.
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self {
            scorer,
            ..Self::default()
        }
    }

    /// Adds every record as a vertex and connects every pair of vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use career_compass::decision::DecisionVector;
    /// use career_compass::job::{JobRecord, Listing, PayPeriod};
    /// use career_compass::{SimilarityGraph, SimilarityScorer};
    ///
    /// let record = |id: &str, city: &str, lat: f64, lng: f64| {
    ///     let listing = Listing {
    ///         title: "Backend Developer".into(),
    ///         employer: "Acme".into(),
    ///         rating: 3.5,
    ///         url: String::new(),
    ///         short_description: String::new(),
    ///         full_description: String::new(),
    ///         skills: vec!["Python".into()],
    ///         latitude: lat,
    ///         longitude: lng,
    ///         city: city.into(),
    ///         country: "Canada".into(),
    ///         pay: 60000.,
    ///         pay_period: PayPeriod::Annual,
    ///         id: id.into(),
    ///     };
    ///     Arc::new(JobRecord::with_decisions(listing, DecisionVector::default()))
    /// };
    ///
    /// let graph = SimilarityGraph::new(SimilarityScorer::default()).build([
    ///     record("tor", "Toronto", 43.65, -79.38),
    ///     record("mis", "Mississauga", 43.59, -79.64),
    ///     record("van", "Vancouver", 49.28, -123.12),
    /// ]);
    /// assert_eq!(graph.num_edges(), 3);
    /// assert!(graph.similarity("tor", "mis")? > graph.similarity("tor", "van")?);
    /// # Ok::<(), career_compass::errors::CompassError>(())
    /// ```
    pub fn build<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = Arc<JobRecord>>,
    {
        for record in records {
            self.add_vertex(record);
        }
        let n = self.len();
        for i in 0..n {
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                tracing::debug!("Connected {}/{n} vertices", i + 1);
            }
            for j in i + 1..n {
                let weight = self.score_pair(i, j);
                self.edges.insert((i, j), weight);
            }
        }
        tracing::info!(vertices = n, edges = self.num_edges(), "Built similarity graph");
        self
    }

    /// Does the same as [`Self::build`] but scores pairs in parallel.
    pub fn build_in_parallel<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = Arc<JobRecord>>,
    {
        for record in records {
            self.add_vertex(record);
        }
        let n = self.len();
        #[allow(clippy::mutex_atomic)]
        let processed = Mutex::new(0usize);
        let edges = Mutex::new(std::mem::take(&mut self.edges));
        {
            let graph = &self;
            (0..n).into_par_iter().for_each(|i| {
                // Each worker owns the whole row i, so no pair is scored twice.
                let row: Vec<_> = (i + 1..n)
                    .map(|j| ((i, j), graph.score_pair(i, j)))
                    .collect();
                edges.lock().unwrap().extend(row);

                let mut cnt = processed.lock().unwrap();
                *cnt += 1;
                if *cnt % PROGRESS_INTERVAL == 0 {
                    tracing::debug!("Connected {}/{n} vertices", *cnt);
                }
            });
        }
        self.edges = edges.into_inner().unwrap();
        tracing::info!(vertices = n, edges = self.num_edges(), "Built similarity graph in parallel");
        self
    }

    /// Adds a vertex, returning `false` if a vertex with the same id already exists.
    pub fn add_vertex(&mut self, record: Arc<JobRecord>) -> bool {
        if self.ids.contains_key(record.id()) {
            return false;
        }
        self.ids.insert(record.id().to_string(), self.vertices.len());
        self.vertices.push(record);
        true
    }

    /// Connects two existing vertices with their similarity.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<()> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        if i == j {
            return Err(CompassError::input("A vertex cannot be adjacent to itself."));
        }
        let weight = self.score_pair(i, j);
        self.edges.insert(edge_key(i, j), weight);
        Ok(())
    }

    /// Gets the weight of the edge between `a` and `b`, or 0 if they are not adjacent.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.edges.get(&edge_key(i, j)).copied().unwrap_or(0.))
    }

    /// Gets the neighbors of `id` with their weights, most similar first.
    /// Ties are ordered by ascending id.
    pub fn ranked_neighbors(&self, id: &str) -> Result<Vec<(Arc<JobRecord>, f64)>> {
        let i = self.index_of(id)?;
        Ok(self
            .ranked(i)
            .into_iter()
            .map(|(j, w)| (Arc::clone(&self.vertices[j]), w))
            .collect())
    }

    /// Samples `limit` postings uniformly at random from the `limit + offset`
    /// neighbors most similar to `id`.
    ///
    /// A larger `offset` trades precision for variety across repeated calls.
    /// The order of the returned postings is unspecified.
    pub fn neighbors<R>(
        &self,
        id: &str,
        limit: usize,
        offset: usize,
        rng: &mut R,
    ) -> Result<Vec<Arc<JobRecord>>>
    where
        R: Rng + ?Sized,
    {
        let i = self.index_of(id)?;
        let ranked = self.ranked(i);
        let window = limit.saturating_add(offset);
        if window > ranked.len() {
            return Err(CompassError::out_of_range(window, ranked.len()));
        }
        Ok(ranked[..window]
            .choose_multiple(rng, limit)
            .map(|&(j, _)| Arc::clone(&self.vertices[j]))
            .collect())
    }

    /// Gets the mean annual pay over all vertices.
    pub fn average_annual_pay(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(CompassError::input("The graph has no vertices."));
        }
        let total: f64 = self.vertices.iter().map(|v| v.annual_pay()).sum();
        Ok(total / self.len() as f64)
    }

    /// Gets the vertex with the id.
    pub fn get(&self, id: &str) -> Option<&Arc<JobRecord>> {
        self.ids.get(id).map(|&i| &self.vertices[i])
    }

    /// Gets all vertices in insertion order.
    pub fn vertices(&self) -> &[Arc<JobRecord>] {
        &self.vertices
    }

    /// Gets the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Checks if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Gets the scorer weighting the edges.
    pub const fn scorer(&self) -> SimilarityScorer {
        self.scorer
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| CompassError::vertex_not_found(id))
    }

    fn score_pair(&self, i: usize, j: usize) -> f64 {
        let (a, b) = (self.vertices[i].listing(), self.vertices[j].listing());
        let weight = self.scorer.score(a, b);
        debug_assert_eq!(weight.to_bits(), self.scorer.score(b, a).to_bits());
        weight
    }

    fn ranked(&self, i: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<_> = (0..self.len())
            .filter(|&j| j != i)
            .filter_map(|j| self.edges.get(&edge_key(i, j)).map(|&w| (j, w)))
            .collect();
        ranked.sort_by(|&(x, wx), &(y, wy)| {
            wy.total_cmp(&wx)
                .then_with(|| self.vertices[x].id().cmp(self.vertices[y].id()))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionVector;
    use crate::job::tests::listing;
    use crate::job::PayPeriod;

    use hashbrown::HashSet;
    use rand::SeedableRng;

    fn record(id: &str, lat: f64, lng: f64, pay: f64) -> Arc<JobRecord> {
        let mut l = listing(id);
        l.latitude = lat;
        l.longitude = lng;
        l.pay = pay;
        l.pay_period = PayPeriod::Annual;
        Arc::new(JobRecord::with_decisions(l, DecisionVector::default()))
    }

    fn example_records() -> Vec<Arc<JobRecord>> {
        vec![
            record("tor", 43.6532, -79.3832, 60000.),
            record("mis", 43.5890, -79.6441, 61000.),
            record("ham", 43.2557, -79.8711, 58000.),
            record("ott", 45.4215, -75.6972, 70000.),
            record("van", 49.2827, -123.1207, 90000.),
            record("cal", 51.0447, -114.0719, 85000.),
        ]
    }

    fn rng() -> rand_xoshiro::Xoshiro256PlusPlus {
        rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42)
    }

    #[test]
    fn test_build_is_complete() {
        let records = example_records();
        let n = records.len();
        let scorer = SimilarityScorer::default();
        let graph = SimilarityGraph::new(scorer).build(records.clone());
        assert_eq!(graph.len(), n);
        assert_eq!(graph.num_edges(), n * (n - 1) / 2);
        for a in &records {
            for b in &records {
                let s = graph.similarity(a.id(), b.id()).unwrap();
                if a == b {
                    assert_eq!(s, 0.);
                } else {
                    assert_eq!(s, scorer.score(a.listing(), b.listing()));
                    assert_eq!(s, graph.similarity(b.id(), a.id()).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_build_in_parallel() {
        let records = example_records();
        let expected = SimilarityGraph::default().build(records.clone());
        let graph = SimilarityGraph::default().build_in_parallel(records.clone());
        assert_eq!(graph.num_edges(), expected.num_edges());
        for a in &records {
            for b in &records {
                assert_eq!(
                    graph.similarity(a.id(), b.id()).unwrap(),
                    expected.similarity(a.id(), b.id()).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut graph = SimilarityGraph::default();
        assert!(graph.add_vertex(record("a", 0., 0., 1.)));
        assert!(!graph.add_vertex(record("a", 10., 10., 2.)));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get("a").unwrap().listing().pay, 1.);
    }

    #[test]
    fn test_add_edge() {
        let mut graph = SimilarityGraph::default();
        graph.add_vertex(record("a", 0., 0., 1.));
        graph.add_vertex(record("b", 1., 1., 1.));
        assert_eq!(graph.similarity("a", "b").unwrap(), 0.);

        graph.add_edge("a", "b").unwrap();
        assert_eq!(graph.num_edges(), 1);
        assert!(graph.similarity("b", "a").unwrap() > 0.);

        assert!(matches!(
            graph.add_edge("a", "zzz"),
            Err(CompassError::VertexNotFound(e)) if e.id() == "zzz"
        ));
        assert!(matches!(
            graph.add_edge("a", "a"),
            Err(CompassError::Input(_))
        ));
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_unknown_vertex() {
        let graph = SimilarityGraph::default().build(example_records());
        assert!(matches!(
            graph.similarity("tor", "nyc"),
            Err(CompassError::VertexNotFound(_))
        ));
        assert!(matches!(
            graph.neighbors("nyc", 1, 0, &mut rng()),
            Err(CompassError::VertexNotFound(_))
        ));
    }

    #[test]
    fn test_ranked_neighbors() {
        let graph = SimilarityGraph::default().build(example_records());
        let ranked = graph.ranked_neighbors("tor").unwrap();
        let ids: Vec<_> = ranked.iter().map(|(r, _)| r.id()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], "mis");
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_ranked_neighbors_ties_by_id() {
        let records = vec![
            record("a", 0., 0., 1.),
            record("d", 5., 5., 1.),
            record("c", 5., 5., 1.),
            record("b", 5., 5., 1.),
        ];
        let graph = SimilarityGraph::default().build(records);
        let ids: Vec<_> = graph
            .ranked_neighbors("a")
            .unwrap()
            .into_iter()
            .map(|(r, _)| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_neighbors_sample_from_window() {
        let graph = SimilarityGraph::default().build(example_records());
        let window: HashSet<String> = graph
            .ranked_neighbors("tor")
            .unwrap()
            .into_iter()
            .take(4)
            .map(|(r, _)| r.id().to_string())
            .collect();

        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let sample = graph.neighbors("tor", 2, 2, &mut rng).unwrap();
            assert_eq!(sample.len(), 2);
            assert_ne!(sample[0], sample[1]);
            for r in sample {
                assert!(window.contains(r.id()));
                seen.insert(r.id().to_string());
            }
        }
        // Random sampling reaches beyond the top two.
        assert!(seen.len() > 2);
    }

    #[test]
    fn test_neighbors_without_offset() {
        let graph = SimilarityGraph::default().build(example_records());
        let mut sample: Vec<_> = graph
            .neighbors("tor", 5, 0, &mut rng())
            .unwrap()
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        sample.sort();
        assert_eq!(sample, vec!["cal", "ham", "mis", "ott", "van"]);
    }

    #[test]
    fn test_neighbors_out_of_range() {
        let graph = SimilarityGraph::default().build(example_records());
        match graph.neighbors("tor", 5, 1, &mut rng()) {
            Err(CompassError::OutOfRange(e)) => {
                assert_eq!(e.requested(), 6);
                assert_eq!(e.available(), 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(graph.neighbors("tor", usize::MAX, 1, &mut rng()).is_err());
    }

    #[test]
    fn test_average_annual_pay() {
        let graph = SimilarityGraph::default().build(example_records());
        let expected = (60000. + 61000. + 58000. + 70000. + 90000. + 85000.) / 6.;
        assert!((graph.average_annual_pay().unwrap() - expected).abs() < 1e-9);
        assert!(SimilarityGraph::default().average_annual_pay().is_err());
    }
}
