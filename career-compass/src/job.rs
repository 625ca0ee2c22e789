//! Job postings and their ingestion into immutable records.
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Deserialize;

use crate::decision::DecisionVector;

const HOURS_PER_WEEK: f64 = 40.;
const WEEKS_PER_YEAR: f64 = 52.;
const MONTHS_PER_YEAR: f64 = 12.;

/// Period a posted pay amount refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayPeriod {
    /// Pay per hour, assuming 40 hours a week for 52 weeks.
    Hourly,
    /// Pay per month.
    Monthly,
    /// Pay per year.
    Annual,
}

impl PayPeriod {
    /// Converts `pay` in this period into a yearly amount.
    ///
    /// # Examples
    ///
    /// ```
    /// use career_compass::job::PayPeriod;
    ///
    /// assert_eq!(PayPeriod::Hourly.annualize(20.), 41600.);
    /// assert_eq!(PayPeriod::Monthly.annualize(5000.), 60000.);
    /// assert_eq!(PayPeriod::Annual.annualize(75000.), 75000.);
    /// ```
    pub fn annualize(self, pay: f64) -> f64 {
        match self {
            Self::Hourly => pay * HOURS_PER_WEEK * WEEKS_PER_YEAR,
            Self::Monthly => pay * MONTHS_PER_YEAR,
            Self::Annual => pay,
        }
    }
}

impl FromStr for PayPeriod {
    type Err = &'static str;
    fn from_str(period: &str) -> Result<Self, Self::Err> {
        match period {
            "HOURLY" => Ok(Self::Hourly),
            "MONTHLY" => Ok(Self::Monthly),
            "ANNUAL" => Ok(Self::Annual),
            _ => Err("Could not parse a pay period"),
        }
    }
}

/// Raw attributes of one posting, as supplied by a loader.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    /// Job title.
    pub title: String,
    /// Name of the employer.
    pub employer: String,
    /// Employer rating in `[0, 5]`.
    pub rating: f64,
    /// Link to the posting.
    pub url: String,
    /// Short description without HTML tags.
    pub short_description: String,
    /// Full description.
    pub full_description: String,
    /// Skills requested by the posting.
    pub skills: Vec<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// City name.
    pub city: String,
    /// Country name, e.g., `"Canada"` or `"United States"`.
    pub country: String,
    /// Pay amount in [`Self::pay_period`] units.
    pub pay: f64,
    /// Period of [`Self::pay`].
    pub pay_period: PayPeriod,
    /// Unique id of the posting.
    pub id: String,
}

impl Listing {
    /// Gets the pay converted into a yearly amount.
    pub fn annual_pay(&self) -> f64 {
        self.pay_period.annualize(self.pay)
    }

    /// Checks if `keyword` appears in the title or either description, ignoring case.
    /// `keyword` must be lowercase.
    pub(crate) fn mentions(&self, keyword: &str) -> bool {
        [&self.title, &self.short_description, &self.full_description]
            .iter()
            .any(|text| text.to_lowercase().contains(keyword))
    }

    /// Checks if one of the skills equals `skill`, ignoring case.
    pub(crate) fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

/// Immutable job posting with its cached [`DecisionVector`].
///
/// Two records with the same id denote the same posting.
#[derive(Clone, Debug)]
pub struct JobRecord {
    listing: Listing,
    decisions: DecisionVector,
}

impl JobRecord {
    /// Ingests a listing, deriving its decision vector.
    ///
    /// `rng` is only consulted for postings that look both frontend and fullstack.
    pub fn ingest<R>(listing: Listing, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let decisions = DecisionVector::derive(&listing, rng);
        Self {
            listing,
            decisions,
        }
    }

    /// Creates a record with a given decision vector.
    pub const fn with_decisions(listing: Listing, decisions: DecisionVector) -> Self {
        Self {
            listing,
            decisions,
        }
    }

    /// Gets the attributes of the posting.
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Gets the decision vector cached at ingestion.
    pub const fn decisions(&self) -> DecisionVector {
        self.decisions
    }

    /// Gets the unique id.
    pub fn id(&self) -> &str {
        &self.listing.id
    }

    /// Gets the pay converted into a yearly amount.
    pub fn annual_pay(&self) -> f64 {
        self.listing.annual_pay()
    }
}

impl PartialEq for JobRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for JobRecord {}

impl std::hash::Hash for JobRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}
