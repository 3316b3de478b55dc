use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecombinationMapError {
    #[error("positions and rates must have the same length ({positions} != {rates})")]
    LengthMismatch { positions: usize, rates: usize },

    #[error("a recombination map needs at least two positions")]
    TooShort,

    #[error("first position must be 0, got {0}")]
    FirstPositionNotZero(f64),

    #[error("positions must be strictly increasing (position {index}: {value})")]
    NotIncreasing { index: usize, value: f64 },

    #[error("rate at position {index} must be finite and >= 0, got {value}")]
    InvalidRate { index: usize, value: f64 },
}

/// Piecewise-constant recombination rates along a sequence.
///
/// `rates[i]` applies to `[positions[i], positions[i + 1])`; the final rate is
/// always 0 and the final position is the sequence length. Rates are per base
/// pair per generation, so genetic distances are in Morgans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecombinationMap {
    positions: Vec<f64>,
    rates: Vec<f64>,
}

impl RecombinationMap {
    /// Build a map from breakpoints and the rate to the right of each breakpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors differ in length, the first position is
    /// not 0, positions are not strictly increasing, or a rate is negative.
    pub fn new(positions: Vec<f64>, mut rates: Vec<f64>) -> Result<Self, RecombinationMapError> {
        if positions.len() != rates.len() {
            return Err(RecombinationMapError::LengthMismatch {
                positions: positions.len(),
                rates: rates.len(),
            });
        }
        if positions.len() < 2 {
            return Err(RecombinationMapError::TooShort);
        }
        if positions[0] != 0.0 {
            return Err(RecombinationMapError::FirstPositionNotZero(positions[0]));
        }
        for (index, pair) in positions.windows(2).enumerate() {
            if pair[1] <= pair[0] || !pair[1].is_finite() {
                return Err(RecombinationMapError::NotIncreasing {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }
        for (index, &value) in rates.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(RecombinationMapError::InvalidRate { index, value });
            }
        }
        if let Some(last) = rates.last_mut() {
            *last = 0.0;
        }
        Ok(Self { positions, rates })
    }

    /// A map with a single rate over `[0, length)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive or `rate` is negative.
    pub fn uniform(length: f64, rate: f64) -> Result<Self, RecombinationMapError> {
        Self::new(vec![0.0, length], vec![rate, 0.0])
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn sequence_length(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    fn intervals(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.positions
            .windows(2)
            .zip(&self.rates)
            .map(|(w, &rate)| (w[0], w[1], rate))
    }

    /// Total map length in Morgans
    pub fn total_genetic_length(&self) -> f64 {
        self.intervals()
            .map(|(left, right, rate)| (right - left) * rate)
            .sum()
    }

    /// Mean rate weighted by interval length
    pub fn mean_recombination_rate(&self) -> f64 {
        let length = self.sequence_length();
        if length <= 0.0 {
            return 0.0;
        }
        self.total_genetic_length() / length
    }

    /// Genetic position (Morgans) of physical coordinate `x`, clamped to the map.
    pub fn physical_to_genetic(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.sequence_length());
        let mut genetic = 0.0;
        for (left, right, rate) in self.intervals() {
            if x <= left {
                break;
            }
            genetic += (x.min(right) - left) * rate;
        }
        genetic
    }

    /// Physical coordinate at genetic position `g` (Morgans), clamped to the map.
    ///
    /// Zero-rate stretches map to a single genetic position; the leftmost
    /// physical coordinate reaching `g` is returned.
    pub fn genetic_to_physical(&self, g: f64) -> f64 {
        if g <= 0.0 {
            return 0.0;
        }
        let mut genetic = 0.0;
        for (left, right, rate) in self.intervals() {
            if rate <= 0.0 {
                continue;
            }
            let next = genetic + (right - left) * rate;
            if next >= g {
                return left + (g - genetic) / rate;
            }
            genetic = next;
        }
        self.sequence_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stepped() -> RecombinationMap {
        // 0..100 at 1e-2, 100..200 at 0, 200..400 at 5e-3
        RecombinationMap::new(vec![0.0, 100.0, 200.0, 400.0], vec![1e-2, 0.0, 5e-3, 0.0]).unwrap()
    }

    #[test]
    fn test_uniform() {
        let map = RecombinationMap::uniform(1000.0, 1e-8).unwrap();
        assert_eq!(map.sequence_length(), 1000.0);
        assert_relative_eq!(map.mean_recombination_rate(), 1e-8, max_relative = 1e-12);
        assert_relative_eq!(map.total_genetic_length(), 1e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_last_rate_forced_to_zero() {
        let map = RecombinationMap::new(vec![0.0, 10.0], vec![1.0, 7.0]).unwrap();
        assert_eq!(map.rates(), &[1.0, 0.0]);
    }

    #[test]
    fn test_invalid_maps() {
        assert_eq!(
            RecombinationMap::new(vec![0.0], vec![0.0]),
            Err(RecombinationMapError::TooShort)
        );
        assert!(matches!(
            RecombinationMap::new(vec![1.0, 2.0], vec![0.0, 0.0]),
            Err(RecombinationMapError::FirstPositionNotZero(_))
        ));
        assert!(matches!(
            RecombinationMap::new(vec![0.0, 5.0, 5.0], vec![0.0, 0.0, 0.0]),
            Err(RecombinationMapError::NotIncreasing { index: 2, .. })
        ));
        assert!(matches!(
            RecombinationMap::new(vec![0.0, 5.0], vec![-1.0, 0.0]),
            Err(RecombinationMapError::InvalidRate { index: 0, .. })
        ));
        assert!(RecombinationMap::uniform(0.0, 1e-8).is_err());
    }

    #[test]
    fn test_mean_rate_is_length_weighted() {
        let map = stepped();
        // (100 * 1e-2 + 200 * 5e-3) / 400
        assert_relative_eq!(map.total_genetic_length(), 2.0, max_relative = 1e-12);
        assert_relative_eq!(map.mean_recombination_rate(), 0.005, max_relative = 1e-12);
    }

    #[test]
    fn test_physical_to_genetic() {
        let map = stepped();
        assert_relative_eq!(map.physical_to_genetic(0.0), 0.0);
        assert_relative_eq!(map.physical_to_genetic(50.0), 0.5);
        assert_relative_eq!(map.physical_to_genetic(150.0), 1.0);
        assert_relative_eq!(map.physical_to_genetic(300.0), 1.5);
        assert_relative_eq!(map.physical_to_genetic(1e9), 2.0);
        assert_relative_eq!(map.physical_to_genetic(-5.0), 0.0);
    }

    #[test]
    fn test_genetic_to_physical() {
        let map = stepped();
        assert_relative_eq!(map.genetic_to_physical(0.5), 50.0);
        // Genetic position 1.0 spans the flat stretch; the left end is returned.
        assert_relative_eq!(map.genetic_to_physical(1.0), 100.0);
        assert_relative_eq!(map.genetic_to_physical(1.5), 300.0);
        assert_relative_eq!(map.genetic_to_physical(10.0), 400.0);
    }

    #[test]
    fn test_round_trip_on_positive_rate_stretch() {
        let map = stepped();
        for x in [10.0, 75.0, 250.0, 399.0] {
            assert_relative_eq!(
                map.genetic_to_physical(map.physical_to_genetic(x)),
                x,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_physical_to_genetic_monotone() {
        let map = stepped();
        let mut last = 0.0;
        for i in 0..=40 {
            let g = map.physical_to_genetic(f64::from(i) * 10.0);
            assert!(g >= last);
            last = g;
        }
    }
}
