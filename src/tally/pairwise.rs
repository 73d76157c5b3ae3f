//! Pairwise-majority rules: Condorcet and Copeland
//!
//! Both rules are derived from the same [`PairwiseMatrix`]: for every ordered
//! pair `(a, b)`, the number of voters ranking `a` above `b`.

use crate::errors::TallyError;
use crate::tally::{Count, Profile, check_profile};
use crate::types::Alternative;

/// Head-to-head support between every ordered pair of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseMatrix {
    alts: usize,
    voters: usize,
    // support[(a - 1) * alts + (b - 1)] = voters ranking a above b
    support: Vec<usize>,
}

impl PairwiseMatrix {
    /// Count head-to-head support over a profile.
    ///
    /// An alternative absent from a ranking is treated as that voter's least
    /// preferred: it loses to every listed alternative and beats nothing.
    pub fn from_profile(profile: &Profile) -> Self {
        let alts = profile.alts();
        let mut support = vec![0; alts * alts];

        let mut positions: Vec<Option<usize>> = vec![None; alts];
        for preference in profile.iter() {
            positions.iter_mut().for_each(|slot| *slot = None);
            for (rank, &alternative) in preference.iter().enumerate() {
                if let Some(slot) = positions.get_mut(alternative as usize - 1) {
                    *slot = Some(rank);
                }
            }

            for a in 0..alts {
                for b in 0..alts {
                    if a != b && ranks_above(positions[a], positions[b]) {
                        support[a * alts + b] += 1;
                    }
                }
            }
        }

        Self {
            alts,
            voters: profile.voters(),
            support,
        }
    }

    pub fn alts(&self) -> usize {
        self.alts
    }

    pub fn voters(&self) -> usize {
        self.voters
    }

    /// Number of voters ranking `a` above `b`.
    pub fn support(&self, a: Alternative, b: Alternative) -> usize {
        self.support[self.index(a, b)]
    }

    /// `a` pairwise-beats `b` when a strict majority of voters rank `a` above `b`.
    pub fn beats(&self, a: Alternative, b: Alternative) -> bool {
        a != b && 2 * self.support(a, b) > self.voters
    }

    /// Number of opponents `a` pairwise-beats.
    pub fn wins(&self, a: Alternative) -> usize {
        self.alternatives().filter(|&b| self.beats(a, b)).count()
    }

    pub fn alternatives(&self) -> impl Iterator<Item = Alternative> {
        1..=self.alts as Alternative
    }

    /// The alternative beating every other one, if there is one.
    pub fn condorcet_winner(&self) -> Option<Alternative> {
        self.alternatives().find(|&a| self.wins(a) == self.alts - 1)
    }

    fn index(&self, a: Alternative, b: Alternative) -> usize {
        assert!(
            (1..=self.alts).contains(&(a as usize)) && (1..=self.alts).contains(&(b as usize)),
            "pair ({a}, {b}) outside 1..={}",
            self.alts
        );
        (a as usize - 1) * self.alts + (b as usize - 1)
    }
}

fn ranks_above(a: Option<usize>, b: Option<usize>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Condorcet: each alternative scores its number of pairwise victories.
///
/// Fails with [`TallyError::NoCondorcetWinner`] unless one alternative beats
/// all `alts - 1` others. That alternative is then the unique maximum of the
/// returned count.
pub fn condorcet(profile: &Profile) -> Result<Count, TallyError> {
    check_profile(profile)?;

    let matrix = PairwiseMatrix::from_profile(profile);
    if matrix.condorcet_winner().is_none() {
        return Err(TallyError::NoCondorcetWinner);
    }

    let mut count = Count::zeroed(matrix.alts());
    for a in matrix.alternatives() {
        count.add(a, matrix.wins(a) as i64);
    }
    Ok(count)
}

/// The Condorcet winner of a profile.
pub fn condorcet_winner(profile: &Profile) -> Result<Alternative, TallyError> {
    check_profile(profile)?;

    PairwiseMatrix::from_profile(profile)
        .condorcet_winner()
        .ok_or(TallyError::NoCondorcetWinner)
}

/// Copeland: +1 per opponent beaten, -1 per opponent lost to, 0 on an exact tie.
pub fn copeland(profile: &Profile) -> Result<Count, TallyError> {
    check_profile(profile)?;

    let matrix = PairwiseMatrix::from_profile(profile);
    let mut count = Count::zeroed(matrix.alts());
    for a in matrix.alternatives() {
        for b in matrix.alternatives() {
            if matrix.beats(a, b) {
                count.add(a, 1);
            } else if matrix.beats(b, a) {
                count.add(a, -1);
            }
        }
    }
    Ok(count)
}
