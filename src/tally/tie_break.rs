//! Deterministic tie-breaking
//!
//! A ballot fixes a precedence permutation of its alternatives at creation.
//! Whenever scores tie, the alternative listed earliest in that permutation
//! wins. The same tied set and the same order always give the same result.

use crate::errors::{TallyError, ValidationError};
use crate::tally::{Count, validate_permutation};
use crate::types::Alternative;
use serde::{Deserialize, Serialize};

/// Priority permutation of `1..=alts`; earlier means higher priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieBreakOrder(Vec<Alternative>);

impl TieBreakOrder {
    /// Validate `order` as a permutation of `1..=alts`.
    pub fn new(alts: usize, order: Vec<Alternative>) -> Result<Self, ValidationError> {
        validate_permutation(alts, &order)?;
        Ok(Self(order))
    }

    /// `1, 2, ..., alts`: lower ids win ties.
    pub fn natural(alts: usize) -> Self {
        Self((1..=alts as Alternative).collect())
    }

    pub fn as_slice(&self) -> &[Alternative] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of `alternative` in the order, 0 being the highest priority.
    pub fn position(&self, alternative: Alternative) -> Option<usize> {
        self.0.iter().position(|&a| a == alternative)
    }

    /// Pick the tied alternative with the highest priority.
    ///
    /// Alternatives missing from the order rank after every listed one, lowest
    /// id first.
    pub fn break_tie(&self, tied: &[Alternative]) -> Result<Alternative, TallyError> {
        tied.iter()
            .copied()
            .min_by_key(|&alternative| self.priority(alternative))
            .ok_or(TallyError::NoCandidate)
    }

    /// The maximal alternatives of `count`, resolved to one winner.
    pub fn winner(&self, count: &Count) -> Result<Alternative, TallyError> {
        self.break_tie(&count.best())
    }

    /// Every alternative of `count`, by descending score, ties in priority order.
    ///
    /// The first element always equals [`TieBreakOrder::winner`].
    pub fn rank(&self, count: &Count) -> Vec<Alternative> {
        let mut scored: Vec<(Alternative, i64)> = count.iter().collect();
        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b
                .cmp(score_a)
                .then_with(|| self.priority(*a).cmp(&self.priority(*b)))
        });
        scored.into_iter().map(|(alternative, _)| alternative).collect()
    }

    fn priority(&self, alternative: Alternative) -> (usize, Alternative) {
        (self.position(alternative).unwrap_or(usize::MAX), alternative)
    }
}
