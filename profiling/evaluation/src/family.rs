/// Substrings identifying standardised signature schemes.
const STANDARDISED: [&str; 3] = ["falcon", "sphincs", "mldsa"];

/// Substrings identifying candidate signature schemes.
const CANDIDATE: [&str; 2] = ["cross", "mayo"];

/// Grouping of signature algorithms for the category charts.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Family {
    /// Schemes already standardised (Falcon, SPHINCS+, ML-DSA).
    Standardised,

    /// Additional-round candidates (CROSS, MAYO).
    Candidate,
}

impl Family {
    /// Both families, in plotting order.
    pub fn all() -> [Family; 2] {
        [Family::Standardised, Family::Candidate]
    }

    /// Classifies an algorithm by substring match on its lower-cased name.
    /// The standardised list is checked first.
    pub fn of(algorithm: &str) -> Option<Family> {
        let lower = algorithm.to_lowercase();
        if STANDARDISED.iter().any(|p| lower.contains(p)) {
            Some(Family::Standardised)
        } else if CANDIDATE.iter().any(|p| lower.contains(p)) {
            Some(Family::Candidate)
        } else {
            None
        }
    }

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match *self {
            Family::Standardised => "Standardised Signature Schemes",
            Family::Candidate => "Candidate Signature Schemes",
        }
    }

    /// Title in snake case, used in file names.
    pub fn file_stem(&self) -> String {
        self.title().replace(' ', "_").to_lowercase()
    }
}
