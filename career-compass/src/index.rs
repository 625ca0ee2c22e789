//! Decision tree indexing postings by their [`DecisionVector`](crate::decision::DecisionVector).
//!
//! The tree has a fixed depth of [`DIMENSIONS`]. At depth `d`, the left branch
//! holds postings whose `d`-th bit is 0 and the right branch those whose bit is 1,
//! so every root-to-leaf path spells one decision vector. Branches no posting
//! takes are never created and read as empty.
use std::sync::Arc;

use crate::decision::{Answer, Answers, DIMENSIONS};
use crate::job::JobRecord;

/// Default number of results below which [`PreferenceIndex::search`] relaxes answers.
pub const MIN_RESULTS: usize = 5;

#[derive(Clone, Debug, Default)]
struct Node {
    // Only non-empty at depth DIMENSIONS.
    jobs: Vec<Arc<JobRecord>>,
    children: [Option<Box<Node>>; 2],
}

impl Node {
    fn insert(&mut self, record: Arc<JobRecord>, depth: usize) -> bool {
        if depth == DIMENSIONS {
            if self.jobs.iter().any(|j| j.id() == record.id()) {
                return false;
            }
            self.jobs.push(record);
            return true;
        }
        let branch = usize::from(record.decisions().bit(depth));
        self.children[branch]
            .get_or_insert_with(Box::default)
            .insert(record, depth + 1)
    }

    fn collect(&self, answers: &Answers, depth: usize, out: &mut Vec<Arc<JobRecord>>) {
        if depth == DIMENSIONS {
            out.extend(self.jobs.iter().cloned());
            return;
        }
        let answer = answers[depth];
        for (branch, child) in self.children.iter().enumerate() {
            if let Some(child) = child {
                if answer.accepts(branch == 1) {
                    child.collect(answers, depth + 1, out);
                }
            }
        }
    }
}

/// Insert-only stage of a [`PreferenceIndex`].
#[derive(Clone, Debug)]
pub struct PreferenceIndexBuilder {
    root: Node,
    len: usize,
    min_results: usize,
}

impl Default for PreferenceIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceIndexBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
            min_results: MIN_RESULTS,
        }
    }

    /// Sets the number of results below which searches are relaxed
    /// (default: [`MIN_RESULTS`]).
    pub const fn min_results(mut self, min_results: usize) -> Self {
        self.min_results = min_results;
        self
    }

    /// Inserts a posting at the leaf of its decision vector, returning `false`
    /// if a posting with the same id is already there.
    pub fn insert(&mut self, record: Arc<JobRecord>) -> bool {
        let inserted = self.root.insert(record, 0);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Freezes the tree for querying.
    pub fn finish(self) -> PreferenceIndex {
        tracing::info!(postings = self.len, "Built preference index");
        PreferenceIndex {
            root: self.root,
            len: self.len,
            min_results: self.min_results,
        }
    }
}

impl Extend<Arc<JobRecord>> for PreferenceIndexBuilder {
    fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Arc<JobRecord>>,
    {
        for record in records {
            self.insert(record);
        }
    }
}

/// Result of [`PreferenceIndex::search`].
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Matched postings.
    pub jobs: Vec<Arc<JobRecord>>,
    /// Answers that produced [`Self::jobs`].
    pub answers: Answers,
    /// Number of leading answers replaced by [`Answer::DontCare`].
    pub relaxed: usize,
}

/// Read-only decision tree over postings.
#[derive(Clone, Debug)]
pub struct PreferenceIndex {
    root: Node,
    len: usize,
    min_results: usize,
}

impl PreferenceIndex {
    /// Gets the postings whose decision vectors satisfy all answers.
    ///
    /// Postings come out in the order of their paths, left (no) before right
    /// (yes), and in insertion order within a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use career_compass::decision::{Answer, DecisionVector};
    /// use career_compass::job::{JobRecord, Listing, PayPeriod};
    /// use career_compass::PreferenceIndexBuilder;
    ///
    /// let listing = Listing {
    ///     title: "Remote Python Developer".into(),
    ///     employer: "Acme".into(),
    ///     rating: 4.2,
    ///     url: String::new(),
    ///     short_description: String::new(),
    ///     full_description: String::new(),
    ///     skills: vec!["Python".into()],
    ///     latitude: 40.71,
    ///     longitude: -74.01,
    ///     city: "New York".into(),
    ///     country: "United States".into(),
    ///     pay: 45.,
    ///     pay_period: PayPeriod::Hourly,
    ///     id: "nyc-1".into(),
    /// };
    /// let bits = [true, true, false, true, true, false, false];
    /// let record = JobRecord::with_decisions(listing, DecisionVector::new(bits));
    ///
    /// let mut builder = PreferenceIndexBuilder::new();
    /// builder.insert(Arc::new(record));
    /// let index = builder.finish();
    ///
    /// let answers = Answer::from_codes([1, 1, 2, 2, 1, 2, 0]).unwrap();
    /// assert_eq!(index.query(&answers).len(), 1);
    /// let answers = Answer::from_codes([0, 2, 2, 2, 2, 2, 2]).unwrap();
    /// assert!(index.query(&answers).is_empty());
    /// ```
    pub fn query(&self, answers: &Answers) -> Vec<Arc<JobRecord>> {
        let mut jobs = vec![];
        self.root.collect(answers, 0, &mut jobs);
        jobs
    }

    /// Does the same as [`Self::query`] but, while fewer than
    /// [`Self::min_results`] postings match, replaces answers with
    /// [`Answer::DontCare`] one at a time from left to right, keeping earlier
    /// replacements. If no relaxation reaches the threshold, the all-wildcard
    /// result is returned.
    pub fn search(&self, answers: &Answers) -> SearchResult {
        let mut answers = *answers;
        for i in 0..DIMENSIONS {
            let jobs = self.query(&answers);
            if jobs.len() >= self.min_results {
                return SearchResult {
                    jobs,
                    answers,
                    relaxed: i,
                };
            }
            tracing::debug!(
                matched = jobs.len(),
                position = i,
                "Too few postings; relaxing an answer"
            );
            answers[i] = Answer::DontCare;
        }
        SearchResult {
            jobs: self.query(&answers),
            answers,
            relaxed: DIMENSIONS,
        }
    }

    /// Gets the number of indexed postings.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if no posting is indexed.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the relaxation threshold of [`Self::search`].
    pub const fn min_results(&self) -> usize {
        self.min_results
    }
}
