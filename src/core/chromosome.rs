use serde::{Deserialize, Serialize};

use crate::utils::validation::{ensure_non_negative, ParameterError};

/// A single chromosome of a species' genome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Chromosome name as used by genetic maps (e.g. `chr2L`)
    pub name: String,

    /// Length in base pairs
    pub length: u64,

    /// Default per-base, per-generation recombination rate
    pub recombination_rate: f64,

    /// Default per-base, per-generation mutation rate
    pub mutation_rate: f64,
}

impl Chromosome {
    pub fn new(
        name: impl Into<String>,
        length: u64,
        recombination_rate: f64,
        mutation_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            recombination_rate,
            mutation_rate,
        }
    }

    /// Check that the length is positive and both rates are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.length == 0 {
            return Err(ParameterError::NotPositive {
                name: format!("length of chromosome '{}'", self.name),
                value: 0.0,
            });
        }
        ensure_non_negative(
            &format!("recombination_rate of chromosome '{}'", self.name),
            self.recombination_rate,
        )?;
        ensure_non_negative(
            &format!("mutation_rate of chromosome '{}'", self.name),
            self.mutation_rate,
        )?;
        Ok(())
    }
}

impl std::fmt::Display for Chromosome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{'name': {}, 'length': {}, 'recombination_rate': {}, 'mutation_rate': {}}}",
            self.name, self.length, self.recombination_rate, self.mutation_rate
        )
    }
}
