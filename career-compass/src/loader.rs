//! Loading postings from CSV.
//!
//! Rows have 14 columns in a fixed order, after a header row:
//!
//! ```text
//! title,employer_name,rating,url,short_description,skills,latitude,longitude,
//! city,country,pay_period,pay,id,full_description
//! ```
//!
//! Rows that fail to parse are skipped, as are rows repeating an earlier id.
use std::io;
use std::path::Path;

use hashbrown::HashSet;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;

use crate::errors::Result;
use crate::job::{JobRecord, Listing, PayPeriod};

/// Number of columns in a row.
pub const NUM_COLUMNS: usize = 14;

const HTML_TAG: &str = "<[^<]+?>";

#[derive(Debug, Deserialize)]
struct Row {
    title: String,
    employer_name: String,
    rating: f64,
    url: String,
    short_description: String,
    skills: String,
    latitude: f64,
    longitude: f64,
    city: String,
    country: String,
    pay_period: PayPeriod,
    pay: f64,
    id: String,
    full_description: String,
}

/// Postings read by a [`JobLoader`].
#[derive(Debug, Default)]
pub struct LoadedJobs {
    /// Ingested postings in file order.
    pub records: Vec<JobRecord>,
    /// Number of rows skipped because they could not be parsed.
    pub malformed: usize,
    /// Number of rows skipped because their id was already loaded.
    pub duplicates: usize,
}

/// Reader of posting CSVs.
pub struct JobLoader {
    tags: Regex,
    skill_delimiter: char,
}

impl Default for JobLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl JobLoader {
    /// Creates an instance splitting skills on commas.
    pub fn new() -> Self {
        Self {
            tags: Regex::new(HTML_TAG).unwrap(),
            skill_delimiter: ',',
        }
    }

    /// Sets the delimiter between skills in the skills column.
    pub fn skill_delimiter(mut self, delimiter: char) -> Self {
        self.skill_delimiter = delimiter;
        self
    }

    /// Loads postings from a CSV file.
    pub fn load_path<P, G>(&self, path: P, rng: &mut G) -> Result<LoadedJobs>
    where
        P: AsRef<Path>,
        G: Rng + ?Sized,
    {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        self.load_from(reader, rng)
    }

    /// Loads postings from CSV text.
    ///
    /// `rng` breaks the frontend/fullstack tie when deriving decision vectors.
    pub fn load<R, G>(&self, rdr: R, rng: &mut G) -> Result<LoadedJobs>
    where
        R: io::Read,
        G: Rng + ?Sized,
    {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        self.load_from(reader, rng)
    }

    fn load_from<R, G>(&self, mut reader: csv::Reader<R>, rng: &mut G) -> Result<LoadedJobs>
    where
        R: io::Read,
        G: Rng + ?Sized,
    {
        let mut loaded = LoadedJobs::default();
        let mut ids = HashSet::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping an unreadable row");
                    loaded.malformed += 1;
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());
            if record.len() != NUM_COLUMNS {
                tracing::warn!(line, columns = record.len(), "Skipping a row with a wrong number of columns");
                loaded.malformed += 1;
                continue;
            }
            let row: Row = match record.deserialize(None) {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping a malformed row");
                    loaded.malformed += 1;
                    continue;
                }
            };
            if !ids.insert(row.id.clone()) {
                tracing::debug!(line, id = %row.id, "Skipping a duplicate posting");
                loaded.duplicates += 1;
                continue;
            }
            let listing = self.listing(row);
            loaded.records.push(JobRecord::ingest(listing, rng));
        }
        tracing::info!(
            loaded = loaded.records.len(),
            malformed = loaded.malformed,
            duplicates = loaded.duplicates,
            "Loaded postings"
        );
        Ok(loaded)
    }

    fn listing(&self, row: Row) -> Listing {
        Listing {
            title: row.title,
            employer: row.employer_name,
            rating: row.rating,
            url: row.url,
            short_description: self.tags.replace_all(&row.short_description, "").into_owned(),
            full_description: row.full_description,
            skills: parse_skills(&row.skills, self.skill_delimiter),
            latitude: row.latitude,
            longitude: row.longitude,
            city: row.city,
            country: row.country,
            pay: row.pay,
            pay_period: row.pay_period,
            id: row.id,
        }
    }
}

/// Splits a skills cell such as `['Python', 'SQL']` or `Python, SQL`.
fn parse_skills(cell: &str, delimiter: char) -> Vec<String> {
    let cell = cell.trim();
    let cell = cell.strip_prefix('[').unwrap_or(cell);
    let cell = cell.strip_suffix(']').unwrap_or(cell);
    cell.split(delimiter)
        .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;

    const HEADER: &str = "job_title,employer_name,rating,link,fragmented_desc,skills,latitude,longitude,city,country,pay_period,pay,job_id,full_desc\n";

    fn load(body: &str) -> LoadedJobs {
        let text = format!("{HEADER}{body}");
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(42);
        JobLoader::new().load(text.as_bytes(), &mut rng).unwrap()
    }

    #[test]
    fn test_parse_skills() {
        assert_eq!(parse_skills("['Python', 'SQL']", ','), vec!["Python", "SQL"]);
        assert_eq!(parse_skills("Python, C++ ,Go", ','), vec!["Python", "C++", "Go"]);
        assert_eq!(parse_skills("Python|Rust", '|'), vec!["Python", "Rust"]);
        assert!(parse_skills("[]", ',').is_empty());
        assert!(parse_skills("", ',').is_empty());
    }

    #[test]
    fn test_load_rows() {
        let loaded = load(concat!(
            "Remote Python Dev,Acme,4.1,https://a.example,<b>Great</b> team,\"['Python', 'SQL']\",40.7,-74.0,New York,United States,HOURLY,50,1,Full text\n",
            "Java Intern,Maple,2.5,https://b.example,Learn a lot,Java,43.6,-79.3,Toronto,Canada,ANNUAL,45000,2,Onsite\n",
        ));
        assert_eq!(loaded.malformed, 0);
        assert_eq!(loaded.duplicates, 0);
        assert_eq!(loaded.records.len(), 2);

        let first = &loaded.records[0];
        let l = first.listing();
        assert_eq!(first.id(), "1");
        assert_eq!(l.employer, "Acme");
        assert_eq!(l.short_description, "Great team");
        assert_eq!(l.skills, vec!["Python", "SQL"]);
        assert_eq!(l.pay_period, PayPeriod::Hourly);
        assert_eq!(first.annual_pay(), 104000.);
        assert_eq!(
            first.decisions().bits(),
            [true, true, false, true, true, false, false]
        );

        let second = &loaded.records[1];
        assert_eq!(
            second.decisions().bits(),
            [false, false, false, false, false, true, false]
        );
    }

    #[test]
    fn test_skip_malformed_rows() {
        let loaded = load(concat!(
            "A,E,not-a-number,u,d,Python,1,2,C,Canada,ANNUAL,1,1,f\n",
            "B,E,3,u,d,Python,1,2,C,Canada,WEEKLY,1,2,f\n",
            "C,E,3,u,d,Python,1,2,C,Canada,ANNUAL,1\n",
            "D,E,3,u,d,Python,1,2,C,Canada,ANNUAL,1,4,f\n",
        ));
        assert_eq!(loaded.malformed, 3);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].id(), "4");
    }

    #[test]
    fn test_padded_cells() {
        let loaded = load("Dev, E , 4.5 ,u,d,Python, 1 ,2,C, Canada ,ANNUAL, 70000 , 9 ,f\n");
        assert_eq!(loaded.malformed, 0);
        assert_eq!(loaded.records.len(), 1);
        let l = loaded.records[0].listing();
        assert_eq!(l.rating, 4.5);
        assert_eq!(l.pay, 70000.);
        assert_eq!(l.country, "Canada");
        assert_eq!(l.id, "9");
    }

    #[test]
    fn test_skip_duplicate_ids() {
        let loaded = load(concat!(
            "First,E,3,u,d,Python,1,2,C,Canada,ANNUAL,1,7,f\n",
            "Second,E,3,u,d,Python,1,2,C,Canada,ANNUAL,1,7,f\n",
        ));
        assert_eq!(loaded.duplicates, 1);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].listing().title, "First");
    }
}
