use serde::{Deserialize, Serialize};

use crate::core::recombination::RecombinationMap;

/// A contiguous region of genome to be simulated, with everything the engine
/// needs to know about it: the recombination map and the mutation rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contig {
    /// Chromosome the contig was derived from
    pub chromosome: String,

    pub recombination_map: RecombinationMap,

    pub mutation_rate: f64,

    /// Genetic map the recombination map came from; `None` for a flat map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetic_map: Option<String>,
}

impl Contig {
    pub fn new(
        chromosome: impl Into<String>,
        recombination_map: RecombinationMap,
        mutation_rate: f64,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            recombination_map,
            mutation_rate,
            genetic_map: None,
        }
    }

    #[must_use]
    pub fn with_genetic_map(mut self, id: impl Into<String>) -> Self {
        self.genetic_map = Some(id.into());
        self
    }

    pub fn length(&self) -> f64 {
        self.recombination_map.sequence_length()
    }

    pub fn mean_recombination_rate(&self) -> f64 {
        self.recombination_map.mean_recombination_rate()
    }
}

impl std::fmt::Display for Contig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Contig(length={:.1e}, recombination_rate={:.1e}, mutation_rate={:.1e})",
            self.length(),
            self.mean_recombination_rate(),
            self.mutation_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let contig = Contig::new(
            "chr1",
            RecombinationMap::uniform(1_000_000.0, 1e-8).unwrap(),
            2e-8,
        );
        assert_eq!(
            contig.to_string(),
            "Contig(length=1.0e6, recombination_rate=1.0e-8, mutation_rate=2.0e-8)"
        );
    }

    #[test]
    fn test_with_genetic_map() {
        let contig = Contig::new("chr1", RecombinationMap::uniform(10.0, 0.0).unwrap(), 0.0)
            .with_genetic_map("Comeron2012_dm6");
        assert_eq!(contig.genetic_map.as_deref(), Some("Comeron2012_dm6"));
        assert_eq!(contig.length(), 10.0);
    }
}
