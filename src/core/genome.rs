use serde::{Deserialize, Serialize};

use crate::core::chromosome::Chromosome;

/// The genome of a species: its chromosomes in catalog order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub chromosomes: Vec<Chromosome>,

    /// Genetic map used when a caller asks for "the default map"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_genetic_map: Option<String>,
}

impl Genome {
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        Self {
            chromosomes,
            default_genetic_map: None,
        }
    }

    #[must_use]
    pub fn with_default_genetic_map(mut self, id: impl Into<String>) -> Self {
        self.default_genetic_map = Some(id.into());
        self
    }

    /// Total length of all chromosomes in base pairs, saturating at `u64::MAX`
    pub fn length(&self) -> u64 {
        self.chromosomes
            .iter()
            .fold(0_u64, |acc, c| acc.saturating_add(c.length))
    }

    /// Total length, or `None` if it does not fit in a `u64`
    pub fn checked_length(&self) -> Option<u64> {
        self.chromosomes
            .iter()
            .try_fold(0_u64, |acc, c| acc.checked_add(c.length))
    }

    pub fn get_chromosome(&self, name: &str) -> Option<&Chromosome> {
        self.chromosomes.iter().find(|c| c.name == name)
    }

    /// The length-weighted mean recombination rate across all chromosomes.
    pub fn mean_recombination_rate(&self) -> f64 {
        self.length_weighted_mean(|c| c.recombination_rate)
    }

    /// The length-weighted mean mutation rate across all chromosomes.
    pub fn mean_mutation_rate(&self) -> f64 {
        self.length_weighted_mean(|c| c.mutation_rate)
    }

    #[allow(clippy::cast_precision_loss)]
    fn length_weighted_mean(&self, rate: impl Fn(&Chromosome) -> f64) -> f64 {
        let total = self.length();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.chromosomes
            .iter()
            .map(|c| rate(c) * (c.length as f64 / total))
            .sum()
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chromosomes:")?;
        let mut by_length: Vec<&Chromosome> = self.chromosomes.iter().collect();
        by_length.sort_by(|a, b| b.length.cmp(&a.length));
        for chrom in by_length {
            writeln!(f, "\t{chrom}")?;
        }
        Ok(())
    }
}
