//! Environmental covariates and per-cell covariate vectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An environmental covariate sampled at a location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Covariate {
    /// Sea-surface temperature in degrees Celsius.
    Sst,
    /// Chlorophyll-a concentration in mg/m3.
    Chlorophyll,
    /// Sea-surface salinity in PSU.
    Salinity,
}

impl Covariate {
    /// All covariates, in canonical (feature-vector) order.
    pub const ALL: [Covariate; 3] = [Covariate::Sst, Covariate::Chlorophyll, Covariate::Salinity];

    /// Stable lowercase name, used for layer file names and wire payloads.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Covariate::Sst => "sst",
            Covariate::Chlorophyll => "chlorophyll",
            Covariate::Salinity => "salinity",
        }
    }

    /// Parse a covariate name; `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sst" => Some(Covariate::Sst),
            "chlorophyll" | "chl" => Some(Covariate::Chlorophyll),
            "salinity" => Some(Covariate::Salinity),
            _ => None,
        }
    }
}

impl fmt::Display for Covariate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Covariate values resolved at one location.
///
/// Absent keys are *missing* samples (out of coverage, nodata), not zeroes.
/// A single missing layer must never abort a whole grid, so missing-ness is
/// ordinary state here; substitution policy lives in the feature assembler.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CovariateVector {
    values: BTreeMap<Covariate, f64>,
}

impl CovariateVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a sampled value. Non-finite samples are treated as missing so
    /// NaN never propagates into a prediction.
    pub fn set(&mut self, covariate: Covariate, value: f64) {
        if value.is_finite() {
            self.values.insert(covariate, value);
        }
    }

    pub fn get(&self, covariate: Covariate) -> Option<f64> {
        self.values.get(&covariate).copied()
    }

    pub fn is_missing(&self, covariate: Covariate) -> bool {
        !self.values.contains_key(&covariate)
    }

    /// Covariates from `wanted` that have no value here.
    pub fn missing_of(&self, wanted: &[Covariate]) -> Vec<Covariate> {
        wanted
            .iter()
            .copied()
            .filter(|c| self.is_missing(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate values in canonical covariate order.
    pub fn iter(&self) -> impl Iterator<Item = (Covariate, f64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }
}

impl FromIterator<(Covariate, f64)> for CovariateVector {
    fn from_iter<T: IntoIterator<Item = (Covariate, f64)>>(iter: T) -> Self {
        let mut vector = Self::new();
        for (covariate, value) in iter {
            vector.set(covariate, value);
        }
        vector
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covariate_name_round_trip() {
        for covariate in Covariate::ALL {
            assert_eq!(Covariate::parse(covariate.as_str()), Some(covariate));
        }
    }

    #[test]
    fn test_covariate_parse_aliases_and_unknown() {
        assert_eq!(Covariate::parse("CHL"), Some(Covariate::Chlorophyll));
        assert_eq!(Covariate::parse("turbidity"), None);
    }

    #[test]
    fn test_vector_set_get_missing() {
        let mut v = CovariateVector::new();
        v.set(Covariate::Sst, 26.4);
        assert_eq!(v.get(Covariate::Sst), Some(26.4));
        assert!(v.is_missing(Covariate::Salinity));
        assert_eq!(v.missing_of(&Covariate::ALL).len(), 2);
    }

    #[test]
    fn test_vector_rejects_non_finite() {
        let mut v = CovariateVector::new();
        v.set(Covariate::Chlorophyll, f64::NAN);
        v.set(Covariate::Sst, f64::INFINITY);
        assert!(v.is_empty());
    }

    #[test]
    fn test_vector_iterates_in_canonical_order() {
        let v: CovariateVector = [
            (Covariate::Salinity, 35.1),
            (Covariate::Sst, 25.0),
            (Covariate::Chlorophyll, 0.3),
        ]
        .into_iter()
        .collect();
        let order: Vec<Covariate> = v.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![Covariate::Sst, Covariate::Chlorophyll, Covariate::Salinity]
        );
    }
}
