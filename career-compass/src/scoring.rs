//! Pairwise similarity between job postings.
//!
//! A similarity is a convex combination of five sub-scores, each squashed into
//! a bounded range by [`sigmoid`]. Every sub-score is symmetric in its two
//! arguments, so `score(a, b)` and `score(b, a)` are bit-identical.
use hashbrown::HashSet;

use crate::errors::{CompassError, Result};
use crate::job::Listing;

/// Mean radius of the earth in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
const SAME_COUNTRY_SCORE: f64 = 0.8;
const SHARED_SKILLS_PIVOT: f64 = 2.;

/// Computes `scale / (1 + e^(-x))`, or 0 if the result is not finite.
///
/// # Examples
///
/// ```
/// use career_compass::scoring::sigmoid;
///
/// assert_eq!(sigmoid(0., 2.), 1.);
/// assert_eq!(sigmoid(f64::NAN, 1.), 0.);
/// assert!(sigmoid(-1000., 2.) < 1e-300);
/// ```
#[inline(always)]
pub fn sigmoid(x: f64, scale: f64) -> f64 {
    let y = scale / (1. + (-x).exp());
    if y.is_finite() {
        y
    } else {
        0.
    }
}

/// Computes the great-circle distance in kilometers between two coordinates
/// given as `(latitude, longitude)` in degrees, using the haversine formula.
pub fn haversine_km(p: (f64, f64), q: (f64, f64)) -> f64 {
    let (lat1, lat2) = (p.0.to_radians(), q.0.to_radians());
    // The absolute difference keeps the formula symmetric bit-for-bit.
    let dlng = (q.1 - p.1).abs().to_radians();
    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlng.cos();
    cos_angle.clamp(-1., 1.).acos() * EARTH_RADIUS_KM
}

/// Weights of the five sub-scores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityWeights {
    distance: f64,
    country: f64,
    rating: f64,
    skills: f64,
    pay: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            distance: 0.2,
            country: 0.3,
            rating: 0.1,
            skills: 0.3,
            pay: 0.1,
        }
    }
}

impl SimilarityWeights {
    /// Creates an instance.
    ///
    /// Every weight must be finite and non-negative, and the weights must sum
    /// to 1 within `1e-9`.
    ///
    /// # Examples
    ///
    /// ```
    /// use career_compass::scoring::SimilarityWeights;
    ///
    /// assert!(SimilarityWeights::new(0.2, 0.2, 0.2, 0.2, 0.2).is_ok());
    /// assert!(SimilarityWeights::new(0.5, 0.5, 0.5, 0., 0.).is_err());
    /// ```
    pub fn new(distance: f64, country: f64, rating: f64, skills: f64, pay: f64) -> Result<Self> {
        let weights = [distance, country, rating, skills, pay];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.) {
            return Err(CompassError::input(
                "Similarity weights must be finite and non-negative.",
            ));
        }
        if (weights.iter().sum::<f64>() - 1.).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CompassError::input("Similarity weights must sum to 1."));
        }
        Ok(Self {
            distance,
            country,
            rating,
            skills,
            pay,
        })
    }

    /// Gets the weight of the distance sub-score.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Gets the weight of the country sub-score.
    pub const fn country(&self) -> f64 {
        self.country
    }

    /// Gets the weight of the rating sub-score.
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Gets the weight of the skills sub-score.
    pub const fn skills(&self) -> f64 {
        self.skills
    }

    /// Gets the weight of the pay sub-score.
    pub const fn pay(&self) -> f64 {
        self.pay
    }
}

/// Unweighted sub-scores of a pair of postings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubScores {
    /// `2 / (1 + e^(2d/1000))` for the distance `d` in km.
    pub distance: f64,
    /// 0.8 for the same country, otherwise 0.
    pub country: f64,
    /// `2 / (1 + e^(0.6Δ))` for the rating difference `Δ`.
    pub rating: f64,
    /// `1 / (1 + e^(2-k))` for `k` shared skills.
    pub skills: f64,
    /// `2 / (1 + e^(0.75Δ/1000))` for the annual pay difference `Δ`.
    pub pay: f64,
}

/// Scorer of pairwise similarity in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    /// Creates an instance with given weights.
    pub const fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    /// Gets the weights.
    pub const fn weights(&self) -> SimilarityWeights {
        self.weights
    }

    /// Computes the similarity of two postings.
    pub fn score(&self, a: &Listing, b: &Listing) -> f64 {
        let s = Self::sub_scores(a, b);
        let w = &self.weights;
        s.distance * w.distance
            + s.country * w.country
            + s.rating * w.rating
            + s.skills * w.skills
            + s.pay * w.pay
    }

    /// Computes the unweighted sub-scores of two postings.
    pub fn sub_scores(a: &Listing, b: &Listing) -> SubScores {
        SubScores {
            distance: distance_score(a, b),
            country: country_score(a, b),
            rating: rating_score(a, b),
            skills: skills_score(a, b),
            pay: pay_score(a, b),
        }
    }
}

fn distance_score(a: &Listing, b: &Listing) -> f64 {
    let d = haversine_km((a.latitude, a.longitude), (b.latitude, b.longitude));
    sigmoid(-2. * d / 1000., 2.)
}

fn country_score(a: &Listing, b: &Listing) -> f64 {
    if a.country == b.country {
        SAME_COUNTRY_SCORE
    } else {
        0.
    }
}

fn rating_score(a: &Listing, b: &Listing) -> f64 {
    sigmoid(-0.6 * (a.rating - b.rating).abs(), 2.)
}

fn skills_score(a: &Listing, b: &Listing) -> f64 {
    let lhs: HashSet<&str> = a.skills.iter().map(String::as_str).collect();
    let shared = b
        .skills
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&lhs)
        .count();
    sigmoid(shared as f64 - SHARED_SKILLS_PIVOT, 1.)
}

fn pay_score(a: &Listing, b: &Listing) -> f64 {
    let diff = (a.annual_pay() - b.annual_pay()).abs() / 1000.;
    sigmoid(-0.75 * diff, 2.)
}
