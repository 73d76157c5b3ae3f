//! Positional scoring rules: Majority, Borda and Approval
//!
//! Each rule gives points to an alternative depending only on where it sits in
//! each voter's ranking.

use crate::errors::TallyError;
use crate::tally::{Count, Profile, check_profile};

/// Plurality: one point to each voter's first choice.
///
/// The scores always sum to the number of voters.
pub fn majority(profile: &Profile) -> Result<Count, TallyError> {
    check_profile(profile)?;

    let mut count = Count::zeroed(profile.alts());
    for preference in profile.iter() {
        count.add(preference[0], 1);
    }
    Ok(count)
}

/// Borda: the alternative at rank `i` (0-indexed) receives `alts - i - 1` points.
///
/// The scores always sum to `voters * (alts - 1) * alts / 2`.
pub fn borda(profile: &Profile) -> Result<Count, TallyError> {
    check_profile(profile)?;

    let alts = profile.alts();
    let mut count = Count::zeroed(alts);
    for preference in profile.iter() {
        for (rank, &alternative) in preference.iter().enumerate() {
            count.add(alternative, (alts - rank - 1) as i64);
        }
    }
    Ok(count)
}

/// Approval: voter `v` approves the first `thresholds[v]` entries of their ranking.
///
/// `thresholds` must hold exactly one entry per voter, in profile order, each
/// within `0..=alts`. A threshold of zero approves nothing.
pub fn approval(profile: &Profile, thresholds: &[usize]) -> Result<Count, TallyError> {
    check_profile(profile)?;

    if thresholds.len() != profile.voters() {
        return Err(TallyError::ThresholdCountMismatch {
            voters: profile.voters(),
            thresholds: thresholds.len(),
        });
    }

    let alts = profile.alts();
    if let Some(&threshold) = thresholds.iter().find(|&&t| t > alts) {
        return Err(TallyError::ThresholdOutOfRange { threshold, alts });
    }

    let mut count = Count::zeroed(alts);
    for (preference, &threshold) in profile.iter().zip(thresholds) {
        for &alternative in preference.iter().take(threshold) {
            count.add(alternative, 1);
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(alts: usize, preferences: &[&[u32]]) -> Profile {
        Profile::new(alts, preferences.iter().map(|p| p.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_majority_counts_first_places() {
        let p = profile(4, &[&[2, 1, 4, 3], &[1, 2, 4, 3], &[2, 4, 1, 3]]);
        let count = majority(&p).unwrap();

        assert_eq!(count.get(1), 1);
        assert_eq!(count.get(2), 2);
        assert_eq!(count.get(3), 0);
        assert_eq!(count.get(4), 0);
        assert_eq!(count.total(), 3);
        assert_eq!(count.best(), vec![2]);
    }

    #[test]
    fn test_borda_points() {
        let p = profile(3, &[&[1, 2, 3], &[2, 1, 3], &[2, 3, 1]]);
        let count = borda(&p).unwrap();

        // 1: 2 + 1 + 0, 2: 1 + 2 + 2, 3: 0 + 0 + 1
        assert_eq!(count.get(1), 3);
        assert_eq!(count.get(2), 5);
        assert_eq!(count.get(3), 1);
        assert_eq!(count.total(), 3 * 2 * 3 / 2);
    }

    #[test]
    fn test_approval_respects_each_threshold() {
        let p = profile(4, &[&[1, 2, 3, 4], &[4, 3, 2, 1], &[2, 1, 4, 3]]);
        let count = approval(&p, &[2, 1, 3]).unwrap();

        assert_eq!(count.get(1), 2);
        assert_eq!(count.get(2), 2);
        assert_eq!(count.get(3), 0);
        assert_eq!(count.get(4), 2);
        assert_eq!(count.total(), 6);
    }

    #[test]
    fn test_approval_threshold_bounds() {
        let p = profile(2, &[&[1, 2], &[2, 1]]);

        // Zero approves nothing, alts approves the whole ranking
        let count = approval(&p, &[0, 2]).unwrap();
        assert_eq!(count.get(1), 1);
        assert_eq!(count.get(2), 1);
        assert_eq!(count.total(), 2);

        let none = approval(&p, &[0, 0]).unwrap();
        assert_eq!(none.total(), 0);

        assert_eq!(
            approval(&p, &[1, 3]),
            Err(TallyError::ThresholdOutOfRange {
                threshold: 3,
                alts: 2
            })
        );
    }

    #[test]
    fn test_approval_threshold_count_mismatch() {
        let p = profile(3, &[&[1, 2, 3], &[3, 2, 1]]);
        assert_eq!(
            approval(&p, &[1]),
            Err(TallyError::ThresholdCountMismatch {
                voters: 2,
                thresholds: 1
            })
        );
    }

    #[test]
    fn test_empty_profile_is_an_error() {
        let p = Profile::empty(3);
        assert_eq!(majority(&p), Err(TallyError::EmptyProfile));
        assert_eq!(borda(&p), Err(TallyError::EmptyProfile));
        assert_eq!(approval(&p, &[]), Err(TallyError::EmptyProfile));
    }
}
