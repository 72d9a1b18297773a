use serde::{Deserialize, Serialize};

/// Tracks offered when no catalog is configured
pub const DEFAULT_TRACKS: [&str; 5] = [
    "AI for Social Good",
    "Sustainable Agriculture",
    "Smart Healthcare",
    "FinTech for Inclusion",
    "Open Innovation",
];

/// Fixed list of challenge names a team can pick from
///
/// The names come from outside the system (configuration); order is kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemCatalog(Vec<String>);

impl ProblemCatalog {
    /// Builds a catalog, dropping blank and duplicate names
    pub fn new<I, S>(tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for track in tracks {
            let track = track.into().trim().to_string();
            if !track.is_empty() && !names.contains(&track) {
                names.push(track);
            }
        }
        Self(names)
    }

    /// Parses a comma-separated list such as `"AI, Health"`
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn contains(&self, track: &str) -> bool {
        self.0.iter().any(|t| t == track)
    }

    pub fn tracks(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProblemCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKS)
    }
}

/// Body of `GET /api/problem-tracks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemTracksResponse {
    pub tracks: Vec<String>,
}

impl From<&ProblemCatalog> for ProblemTracksResponse {
    fn from(catalog: &ProblemCatalog) -> Self {
        Self {
            tracks: catalog.tracks().to_vec(),
        }
    }
}

impl From<ProblemTracksResponse> for ProblemCatalog {
    fn from(listing: ProblemTracksResponse) -> Self {
        ProblemCatalog::new(listing.tracks)
    }
}
