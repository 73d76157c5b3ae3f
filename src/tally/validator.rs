//! Preference validation and the validated [`Profile`]
//!
//! Every preference list that reaches the tally engine went through
//! [`validate_preference`] twice: once when the vote was submitted and once
//! more when the ballot's votes were assembled into a [`Profile`].

use crate::errors::ValidationError;
use crate::types::{Alternative, Preference};

/// Check that `entries` is a permutation of `1..=alts`.
///
/// Used for preference lists and for tie-break orders alike. Errors are
/// reported in a fixed order: length first, then the first offending entry
/// (out of range or repeated), then the first alternative never listed.
pub fn validate_permutation(alts: usize, entries: &[Alternative]) -> Result<(), ValidationError> {
    if entries.len() != alts {
        return Err(ValidationError::WrongLength {
            expected: alts,
            actual: entries.len(),
        });
    }

    let mut seen = vec![false; alts];
    for &value in entries {
        let index = value as usize;
        if index == 0 || index > alts {
            return Err(ValidationError::OutOfRange { value, alts });
        }
        if seen[index - 1] {
            return Err(ValidationError::Duplicate { value });
        }
        seen[index - 1] = true;
    }

    if let Some(missing) = seen.iter().position(|listed| !listed) {
        return Err(ValidationError::IncompleteCoverage {
            missing: missing as Alternative + 1,
        });
    }

    Ok(())
}

/// Check a single voter's ranked preference list.
pub fn validate_preference(alts: usize, preference: &[Alternative]) -> Result<(), ValidationError> {
    validate_permutation(alts, preference)
}

/// Check an approval threshold: a voter approves between 0 and `alts` alternatives.
pub fn validate_threshold(alts: usize, threshold: usize) -> Result<(), ValidationError> {
    if threshold > alts {
        return Err(ValidationError::InvalidThreshold { threshold, alts });
    }
    Ok(())
}

/// A collection of preferences over the same `alts` alternatives.
///
/// Can only be built through [`Profile::new`], so every preference it holds is
/// a permutation of `1..=alts`. Preferences keep the order they were given in;
/// approval thresholds are matched against that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    alts: usize,
    preferences: Vec<Preference>,
}

impl Profile {
    /// Validate every preference and wrap them.
    pub fn new(alts: usize, preferences: Vec<Preference>) -> Result<Self, ValidationError> {
        if alts == 0 {
            return Err(ValidationError::TooFewAlternatives { alts });
        }
        for preference in &preferences {
            validate_preference(alts, preference)?;
        }
        Ok(Self { alts, preferences })
    }

    /// A profile with no voters yet.
    pub fn empty(alts: usize) -> Self {
        Self {
            alts,
            preferences: Vec::new(),
        }
    }

    pub fn alts(&self) -> usize {
        self.alts
    }

    pub fn voters(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    pub fn preferences(&self) -> &[Preference] {
        &self.preferences
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.preferences.iter()
    }

    /// Alternatives of this profile, `1..=alts`.
    pub fn alternatives(&self) -> impl Iterator<Item = Alternative> {
        1..=self.alts as Alternative
    }

    /// Panics if a preference does not have `alts` entries.
    ///
    /// Unreachable through [`Profile::new`]; a failure here is a bug in the engine.
    pub(crate) fn assert_consistent(&self) {
        for (voter, preference) in self.preferences.iter().enumerate() {
            assert_eq!(
                preference.len(),
                self.alts,
                "preference {voter} has {} entries in a profile over {} alternatives",
                preference.len(),
                self.alts
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_permutations() {
        assert!(validate_permutation(4, &[2, 1, 4, 3]).is_ok());
        assert!(validate_permutation(2, &[1, 2]).is_ok());
        assert!(validate_permutation(0, &[]).is_ok());
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            validate_preference(4, &[1, 2, 3]),
            Err(ValidationError::WrongLength {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            validate_preference(2, &[1, 2, 1]),
            Err(ValidationError::WrongLength {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_out_of_range_is_one_indexed() {
        assert_eq!(
            validate_preference(3, &[0, 1, 2]),
            Err(ValidationError::OutOfRange { value: 0, alts: 3 })
        );
        assert_eq!(
            validate_preference(3, &[1, 2, 4]),
            Err(ValidationError::OutOfRange { value: 4, alts: 3 })
        );
        // The upper bound itself is a valid alternative
        assert!(validate_preference(3, &[3, 2, 1]).is_ok());
    }

    #[test]
    fn test_duplicate() {
        assert_eq!(
            validate_preference(3, &[1, 3, 1]),
            Err(ValidationError::Duplicate { value: 1 })
        );
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(validate_threshold(4, 0).is_ok());
        assert!(validate_threshold(4, 1).is_ok());
        assert!(validate_threshold(4, 4).is_ok());
        assert_eq!(
            validate_threshold(4, 5),
            Err(ValidationError::InvalidThreshold {
                threshold: 5,
                alts: 4
            })
        );
    }

    #[test]
    fn test_profile_rejects_any_bad_member() {
        let ok = Profile::new(3, vec![vec![1, 2, 3], vec![3, 2, 1]]).unwrap();
        assert_eq!(ok.voters(), 2);
        assert_eq!(ok.alternatives().collect::<Vec<_>>(), vec![1, 2, 3]);

        let err = Profile::new(3, vec![vec![1, 2, 3], vec![3, 3, 1]]).unwrap_err();
        assert_eq!(err, ValidationError::Duplicate { value: 3 });
    }

    #[test]
    fn test_empty_profile_is_valid() {
        let profile = Profile::new(3, Vec::new()).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile, Profile::empty(3));
    }
}
