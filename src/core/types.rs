use serde::{Deserialize, Serialize};

/// Unique identifier for a species in the catalog (e.g. `esccol`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for SpeciesId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// What a publication is cited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationReason {
    SimulationEngine,
    GeneticMap,
    DemographicModel,
    MutationRate,
    RecombinationRate,
    PopulationSize,
    GenerationTime,
}

impl std::fmt::Display for CitationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimulationEngine => write!(f, "simulation engine"),
            Self::GeneticMap => write!(f, "genetic map"),
            Self::DemographicModel => write!(f, "demographic model"),
            Self::MutationRate => write!(f, "mutation rate"),
            Self::RecombinationRate => write!(f, "recombination rate"),
            Self::PopulationSize => write!(f, "population size"),
            Self::GenerationTime => write!(f, "generation time"),
        }
    }
}

/// A publication backing a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub author: String,
    pub year: u16,
    pub doi: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<CitationReason>,
}

impl Citation {
    pub fn new(author: impl Into<String>, year: u16, doi: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            year,
            doi: doi.into(),
            reasons: Vec::new(),
        }
    }

    #[must_use]
    pub fn because(mut self, reason: CitationReason) -> Self {
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
        self
    }

    /// Citation for the coalescent engine that consumes catalog output
    pub fn msprime() -> Self {
        Self::new(
            "Kelleher et al.",
            2016,
            "https://doi.org/10.1371/journal.pcbi.1004842",
        )
        .because(CitationReason::SimulationEngine)
    }
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}: {}", self.author, self.year, self.doi)
    }
}
