use std::sync::Arc;

use career_compass::decision::{Answer, DecisionVector};
use career_compass::job::{JobRecord, Listing, PayPeriod};
use career_compass::SimilarityScorer;
use rand::SeedableRng;

fn posting(id: &str, city: &str, lat: f64, lng: f64, skills: &[&str], bits: [u8; 7]) -> JobRecord {
    let listing = Listing {
        title: format!("Software Developer ({city})"),
        employer: "Jimbocho Labs".to_string(),
        rating: 4.0,
        url: format!("https://example.com/{id}"),
        short_description: String::new(),
        full_description: String::new(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        latitude: lat,
        longitude: lng,
        city: city.to_string(),
        country: "Canada".to_string(),
        pay: 70000.,
        pay_period: PayPeriod::Annual,
        id: id.to_string(),
    };
    JobRecord::with_decisions(listing, DecisionVector::new(bits.map(|b| b == 1)))
}

fn main() {
    let postings = vec![
        posting("tor", "Toronto", 43.65, -79.38, &["Python", "SQL"], [0, 0, 0, 1, 1, 0, 0]),
        posting("mis", "Mississauga", 43.59, -79.64, &["Python", "SQL"], [0, 0, 0, 1, 1, 0, 0]),
        posting("ham", "Hamilton", 43.26, -79.87, &["Python"], [0, 1, 0, 1, 1, 0, 0]),
        posting("ott", "Ottawa", 45.42, -75.70, &["Java"], [0, 0, 0, 1, 0, 1, 0]),
        posting("van", "Vancouver", 49.28, -123.12, &["C++"], [0, 1, 1, 1, 1, 0, 1]),
        posting("cal", "Calgary", 51.04, -114.07, &["Python", "Java"], [0, 0, 1, 1, 1, 0, 0]),
    ];

    // Builds the similarity graph and the preference index at once.
    let (graph, index) = career_compass::build(postings, SimilarityScorer::default());

    // Canada, not remote, backend, rated above 3, Python, no Java, don't care about C++.
    let answers = Answer::from_codes([0, 0, 0, 1, 1, 0, 2]).unwrap();
    // Only two postings match exactly, so the search relaxes the first answers
    // until at least five postings match.
    let result = index.search(&answers);
    assert_eq!(result.relaxed, 3);
    assert_eq!(result.jobs.len(), 5);

    // Samples two of the three postings most similar to the Toronto one.
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42);
    let similar: Vec<Arc<JobRecord>> = graph.neighbors("tor", 2, 1, &mut rng).unwrap();
    assert_eq!(similar.len(), 2);
    for job in similar {
        assert!(["mis", "ham", "ott"].contains(&job.id()));
    }
}
