//! Preference dimensions of a posting and ternary answers to them.
//!
//! The seven dimensions, in tree order, are:
//!
//! 0. Is the posting in the United States?
//! 1. Is it remote?
//! 2. Is it frontend-leaning?
//! 3. Is the employer rated above 3?
//! 4. Does it want Python?
//! 5. Does it want Java?
//! 6. Does it want C/C++?
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::job::Listing;

/// Number of preference dimensions, i.e., the depth of the preference tree.
pub const DIMENSIONS: usize = 7;

const UNITED_STATES: &str = "United States";
const RATING_THRESHOLD: f64 = 3.;

const REMOTE_KEYWORDS: &[&str] = &["remote"];
const FRONTEND_KEYWORDS: &[&str] = &["frontend", "front-end"];
const FULLSTACK_KEYWORDS: &[&str] = &["fullstack", "full-stack", "full stack"];

/// Boolean fingerprint of a posting over the seven preference dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecisionVector([bool; DIMENSIONS]);

impl DecisionVector {
    /// Creates an instance from raw bits.
    pub const fn new(bits: [bool; DIMENSIONS]) -> Self {
        Self(bits)
    }

    /// Derives the vector of a listing.
    ///
    /// Every dimension is a deterministic function of the listing except the
    /// frontend one: a listing that mentions both frontend and fullstack work
    /// gets that bit from a fair coin flip drawn from `rng`.
    pub fn derive<R>(listing: &Listing, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mentions_any = |keywords: &[&str]| keywords.iter().any(|k| listing.mentions(k));
        let is_frontend = mentions_any(FRONTEND_KEYWORDS);
        let frontend = if is_frontend && mentions_any(FULLSTACK_KEYWORDS) {
            rng.gen_bool(0.5)
        } else {
            is_frontend
        };
        let wants = |skill: &str| listing.has_skill(skill) || listing.mentions(skill);
        Self([
            listing.country == UNITED_STATES,
            mentions_any(REMOTE_KEYWORDS),
            frontend,
            listing.rating > RATING_THRESHOLD,
            wants("python"),
            wants("java"),
            listing.has_skill("c") || wants("c++"),
        ])
    }

    /// Gets the bits.
    pub const fn bits(&self) -> [bool; DIMENSIONS] {
        self.0
    }

    /// Gets the bit of dimension `depth`.
    #[inline(always)]
    pub const fn bit(&self, depth: usize) -> bool {
        self.0[depth]
    }
}

impl fmt::Display for DecisionVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Ternary answer to one preference question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Answer {
    /// Only postings without the property.
    No = 0,
    /// Only postings with the property.
    Yes = 1,
    /// Either.
    DontCare = 2,
}

/// Answers to all preference questions.
pub type Answers = [Answer; DIMENSIONS];

impl Answer {
    /// Checks if the answer accepts the bit value `bit`.
    #[inline(always)]
    pub const fn accepts(self, bit: bool) -> bool {
        match self {
            Self::No => !bit,
            Self::Yes => bit,
            Self::DontCare => true,
        }
    }

    /// Converts ternary codes (0 = no, 1 = yes, 2 = don't care) into answers.
    ///
    /// # Examples
    ///
    /// ```
    /// use career_compass::decision::Answer;
    ///
    /// let answers = Answer::from_codes([1, 0, 2, 2, 1, 0, 2]).unwrap();
    /// assert_eq!(answers[0], Answer::Yes);
    /// assert_eq!(answers[2], Answer::DontCare);
    /// assert!(Answer::from_codes([3, 0, 0, 0, 0, 0, 0]).is_err());
    /// ```
    pub fn from_codes(codes: [u8; DIMENSIONS]) -> Result<Answers, &'static str> {
        let mut answers = [Self::DontCare; DIMENSIONS];
        for (a, &c) in answers.iter_mut().zip(codes.iter()) {
            *a = Self::try_from(c)?;
        }
        Ok(answers)
    }
}

impl TryFrom<u8> for Answer {
    type Error = &'static str;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::No),
            1 => Ok(Self::Yes),
            2 => Ok(Self::DontCare),
            _ => Err("An answer code must be 0, 1, or 2"),
        }
    }
}

impl FromStr for Answer {
    type Err = &'static str;
    fn from_str(answer: &str) -> Result<Self, Self::Err> {
        match answer.trim().to_lowercase().as_str() {
            "no" => Ok(Self::No),
            "yes" => Ok(Self::Yes),
            "don't care" | "dont care" => Ok(Self::DontCare),
            _ => Err("Could not parse an answer; expected yes, no, or don't care"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::tests::listing;

    use rand::SeedableRng;

    fn rng() -> rand_xoshiro::SplitMix64 {
        rand_xoshiro::SplitMix64::seed_from_u64(42)
    }

    #[test]
    fn test_plain_listing() {
        let v = DecisionVector::derive(&listing("a"), &mut rng());
        assert_eq!(
            v.bits(),
            [false, false, false, true, false, false, false]
        );
        assert_eq!(v.to_string(), "0001000");
    }

    #[test]
    fn test_every_dimension() {
        let mut l = listing("a");
        l.country = "United States".to_string();
        l.title = "Remote Front-End Engineer".to_string();
        l.skills = vec!["Python".to_string(), "JAVA".to_string(), "C".to_string()];
        let v = DecisionVector::derive(&l, &mut rng());
        assert_eq!(v.bits(), [true; DIMENSIONS]);
    }

    #[test]
    fn test_rating_threshold_is_strict() {
        let mut l = listing("a");
        l.rating = 3.;
        assert!(!DecisionVector::derive(&l, &mut rng()).bit(3));
        l.rating = 3.1;
        assert!(DecisionVector::derive(&l, &mut rng()).bit(3));
    }

    #[test]
    fn test_skills_from_descriptions() {
        let mut l = listing("a");
        l.full_description = "Our stack is Python and C++.".to_string();
        let v = DecisionVector::derive(&l, &mut rng());
        assert!(v.bit(4));
        assert!(!v.bit(5));
        assert!(v.bit(6));
    }

    #[test]
    fn test_fullstack_tie_break_uses_rng() {
        let mut l = listing("a");
        l.title = "Full Stack Developer".to_string();
        l.short_description = "Frontend and backend work.".to_string();

        // Same seed, same outcome.
        let first = DecisionVector::derive(&l, &mut rng()).bit(2);
        assert_eq!(DecisionVector::derive(&l, &mut rng()).bit(2), first);

        // Both outcomes occur over many flips.
        let mut r = rng();
        let ones = (0..200)
            .filter(|_| DecisionVector::derive(&l, &mut r).bit(2))
            .count();
        assert!(0 < ones && ones < 200);
    }

    #[test]
    fn test_fullstack_only_is_not_frontend() {
        let mut l = listing("a");
        l.title = "Full Stack Developer".to_string();
        l.short_description = "Backend and database work.".to_string();

        let mut r = rng();
        let ones = (0..200)
            .filter(|_| DecisionVector::derive(&l, &mut r).bit(2))
            .count();
        assert_eq!(ones, 0);
    }

    #[test]
    fn test_answer_from_str() {
        assert_eq!("yes".parse(), Ok(Answer::Yes));
        assert_eq!("  No ".parse(), Ok(Answer::No));
        assert_eq!("Don't Care".parse(), Ok(Answer::DontCare));
        assert_eq!("dont care\n".parse(), Ok(Answer::DontCare));
        assert!("maybe".parse::<Answer>().is_err());
    }

    #[test]
    fn test_answer_accepts() {
        assert!(Answer::Yes.accepts(true));
        assert!(!Answer::Yes.accepts(false));
        assert!(Answer::No.accepts(false));
        assert!(!Answer::No.accepts(true));
        assert!(Answer::DontCare.accepts(true) && Answer::DontCare.accepts(false));
    }
}
