//! Centralized validation and numeric helper functions.

/// Default relative tolerance used when comparing model parameters.
pub const DEFAULT_RTOL: f64 = 1e-8;

/// Default absolute tolerance used when comparing model parameters.
pub const DEFAULT_ATOL: f64 = 1e-5;

/// Maximum number of breakpoints accepted from a single genetic map file
pub const MAX_MAP_POSITIONS: usize = 10_000_000;

/// Maximum number of samples in a single simulation request
pub const MAX_SAMPLES: usize = 1_000_000;

/// Validation error for a single named numeric parameter
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: String, value: f64 },
    #[error("{name} must be > 0, got {value}")]
    NotPositive { name: String, value: f64 },
    #[error("{name} must be >= 0, got {value}")]
    Negative { name: String, value: f64 },
    #[error("{name} must be in [0, 1], got {value}")]
    NotAProportion { name: String, value: f64 },
}

/// Require `value` to be finite and strictly positive.
///
/// # Errors
///
/// Returns `ParameterError::NotFinite` or `ParameterError::NotPositive`.
///
/// # Examples
///
/// ```
/// use popsim_catalog::utils::validation::ensure_positive;
///
/// assert!(ensure_positive("N", 1000.0).is_ok());
/// assert!(ensure_positive("N", 0.0).is_err());
/// assert!(ensure_positive("N", f64::NAN).is_err());
/// ```
pub fn ensure_positive(name: &str, value: f64) -> Result<f64, ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NotFinite {
            name: name.to_string(),
            value,
        });
    }
    if value <= 0.0 {
        return Err(ParameterError::NotPositive {
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Require `value` to be finite and non-negative.
///
/// # Errors
///
/// Returns `ParameterError::NotFinite` or `ParameterError::Negative`.
pub fn ensure_non_negative(name: &str, value: f64) -> Result<f64, ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NotFinite {
            name: name.to_string(),
            value,
        });
    }
    if value < 0.0 {
        return Err(ParameterError::Negative {
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Require `value` to be finite (any sign).
///
/// # Errors
///
/// Returns `ParameterError::NotFinite`.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::NotFinite {
            name: name.to_string(),
            value,
        })
    }
}

/// Require `value` to lie in the closed unit interval.
///
/// # Errors
///
/// Returns `ParameterError::NotAProportion`.
pub fn ensure_proportion(name: &str, value: f64) -> Result<f64, ParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParameterError::NotAProportion {
            name: name.to_string(),
            value,
        })
    }
}

/// Tolerance comparison with the asymmetric rule `|a - b| <= atol + rtol * |b|`.
///
/// Two NaNs are never close; equal infinities are.
#[must_use]
pub fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= atol + rtol * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("N", 10.0), Ok(10.0));
        assert!(matches!(
            ensure_positive("N", -1.0),
            Err(ParameterError::NotPositive { .. })
        ));
        assert!(matches!(
            ensure_positive("N", f64::INFINITY),
            Err(ParameterError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_ensure_non_negative() {
        assert_eq!(ensure_non_negative("T", 0.0), Ok(0.0));
        assert!(ensure_non_negative("T", -0.5).is_err());
        assert!(ensure_non_negative("T", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_proportion() {
        assert!(ensure_proportion("p", 0.0).is_ok());
        assert!(ensure_proportion("p", 1.0).is_ok());
        assert!(ensure_proportion("p", 1.5).is_err());
        assert!(ensure_proportion("p", f64::NAN).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = ensure_positive("initial_size", 0.0).unwrap_err();
        assert_eq!(err.to_string(), "initial_size must be > 0, got 0");
    }

    #[test]
    fn test_is_close() {
        assert!(is_close(1.0, 1.0, DEFAULT_RTOL, DEFAULT_ATOL));
        assert!(is_close(1.0, 1.000_001, DEFAULT_RTOL, DEFAULT_ATOL));
        assert!(!is_close(1.0, 1.1, DEFAULT_RTOL, DEFAULT_ATOL));
        assert!(is_close(1e6, 1e6 + 0.001, 1e-8, 1e-2));
        assert!(!is_close(f64::NAN, f64::NAN, DEFAULT_RTOL, DEFAULT_ATOL));
        assert!(is_close(f64::INFINITY, f64::INFINITY, 0.0, 0.0));
    }
}
