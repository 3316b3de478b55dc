use serde::{Deserialize, Serialize};

use crate::utils::validation::{ensure_finite, ensure_positive, ParameterError};

fn default_sampling_allowed() -> bool {
    true
}

/// A population in a demographic model, with its state at time zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub name: String,

    pub description: String,

    /// Population size at the present
    pub initial_size: f64,

    /// Exponential growth rate at the present (positive means the population
    /// was smaller in the past)
    #[serde(default)]
    pub growth_rate: f64,

    /// Whether samples may be drawn from this population
    #[serde(default = "default_sampling_allowed")]
    pub sampling_allowed: bool,
}

impl Population {
    pub fn new(name: impl Into<String>, description: impl Into<String>, initial_size: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            initial_size,
            growth_rate: 0.0,
            sampling_allowed: true,
        }
    }

    #[must_use]
    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    #[must_use]
    pub fn without_sampling(mut self) -> Self {
        self.sampling_allowed = false;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the size is not positive or the growth rate is not finite.
    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_positive(&format!("initial_size of population '{}'", self.name), self.initial_size)?;
        ensure_finite(&format!("growth_rate of population '{}'", self.name), self.growth_rate)?;
        Ok(())
    }
}

/// A single sampled haploid genome, taken from `population` at `time`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub population: usize,
    pub time: f64,
}

impl Sample {
    pub fn new(population: usize) -> Self {
        Self {
            population,
            time: 0.0,
        }
    }
}
