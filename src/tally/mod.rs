//! Social-choice tally engine
//!
//! Pure functions from a validated [`Profile`] to a [`Count`] over its
//! alternatives, one per [`Rule`]. None of them mutate their input; every
//! failure is returned as a [`TallyError`].

pub mod pairwise;
pub mod positional;
pub mod tie_break;
pub mod validator;

use crate::errors::TallyError;
use crate::types::{Alternative, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use pairwise::{PairwiseMatrix, condorcet, condorcet_winner, copeland};
pub use positional::{approval, borda, majority};
pub use tie_break::TieBreakOrder;
pub use validator::{Profile, validate_permutation, validate_preference, validate_threshold};

/// Score per alternative, as produced by a tally rule.
///
/// Rules always fill in every alternative `1..=alts`, so alternatives nobody
/// voted for appear with a score of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Count(BTreeMap<Alternative, i64>);

impl Count {
    /// Every alternative of `1..=alts` at zero.
    pub fn zeroed(alts: usize) -> Self {
        Self((1..=alts as Alternative).map(|a| (a, 0)).collect())
    }

    pub fn add(&mut self, alternative: Alternative, points: i64) {
        *self.0.entry(alternative).or_insert(0) += points;
    }

    /// Score of `alternative`; zero if it was never scored.
    pub fn get(&self, alternative: Alternative) -> i64 {
        self.0.get(&alternative).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(alternative, score)` pairs in ascending alternative order.
    pub fn iter(&self) -> impl Iterator<Item = (Alternative, i64)> + '_ {
        self.0.iter().map(|(&alternative, &score)| (alternative, score))
    }

    /// Alternatives sharing the maximum score, ascending. Empty for an empty count.
    pub fn best(&self) -> Vec<Alternative> {
        let Some(max) = self.0.values().copied().max() else {
            return Vec::new();
        };
        self.iter()
            .filter(|&(_, score)| score == max)
            .map(|(alternative, _)| alternative)
            .collect()
    }
}

/// Rule-specific inputs beyond the profile itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleParams<'a> {
    /// Approval thresholds, one per voter in profile order
    pub thresholds: Option<&'a [usize]>,
}

impl<'a> RuleParams<'a> {
    pub fn with_thresholds(thresholds: &'a [usize]) -> Self {
        Self {
            thresholds: Some(thresholds),
        }
    }
}

/// Signature shared by every entry of the rule table.
pub type TallyFn = fn(&Profile, &RuleParams<'_>) -> Result<Count, TallyError>;

impl Rule {
    /// The tally function implementing this rule.
    pub fn tally_fn(self) -> TallyFn {
        match self {
            Rule::Majority => majority_rule,
            Rule::Borda => borda_rule,
            Rule::Approval => approval_rule,
            Rule::Condorcet => condorcet_rule,
            Rule::Copeland => copeland_rule,
        }
    }
}

fn majority_rule(profile: &Profile, _: &RuleParams<'_>) -> Result<Count, TallyError> {
    majority(profile)
}

fn borda_rule(profile: &Profile, _: &RuleParams<'_>) -> Result<Count, TallyError> {
    borda(profile)
}

fn approval_rule(profile: &Profile, params: &RuleParams<'_>) -> Result<Count, TallyError> {
    approval(profile, params.thresholds.unwrap_or(&[]))
}

fn condorcet_rule(profile: &Profile, _: &RuleParams<'_>) -> Result<Count, TallyError> {
    condorcet(profile)
}

fn copeland_rule(profile: &Profile, _: &RuleParams<'_>) -> Result<Count, TallyError> {
    copeland(profile)
}

/// Score `profile` under `rule` (social welfare function).
pub fn tally(rule: Rule, profile: &Profile, params: &RuleParams<'_>) -> Result<Count, TallyError> {
    (rule.tally_fn())(profile, params)
}

/// Maximal alternatives of `profile` under `rule`, possibly tied (social choice function).
pub fn social_choice(
    rule: Rule,
    profile: &Profile,
    params: &RuleParams<'_>,
) -> Result<Vec<Alternative>, TallyError> {
    Ok(tally(rule, profile, params)?.best())
}

/// Exactly one winner of `profile` under `rule`, ties resolved by `order`.
pub fn decide(
    rule: Rule,
    profile: &Profile,
    params: &RuleParams<'_>,
    order: &TieBreakOrder,
) -> Result<Alternative, TallyError> {
    order.break_tie(&social_choice(rule, profile, params)?)
}

/// Shared precondition of every rule.
pub(crate) fn check_profile(profile: &Profile) -> Result<(), TallyError> {
    if profile.is_empty() {
        return Err(TallyError::EmptyProfile);
    }
    profile.assert_consistent();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::seq::SliceRandom;

    fn random_profile(rng: &mut impl Rng, alts: usize, voters: usize) -> Profile {
        let preferences = (0..voters)
            .map(|_| {
                let mut preference: Vec<Alternative> = (1..=alts as Alternative).collect();
                preference.shuffle(rng);
                preference
            })
            .collect();
        Profile::new(alts, preferences).unwrap()
    }

    #[test]
    fn test_count_best_and_total() {
        let mut count = Count::zeroed(3);
        assert_eq!(count.best(), vec![1, 2, 3]);

        count.add(2, 4);
        count.add(3, 4);
        count.add(1, -1);
        assert_eq!(count.best(), vec![2, 3]);
        assert_eq!(count.total(), 7);
        assert_eq!(count.get(9), 0);
        assert!(Count::default().best().is_empty());
    }

    #[test]
    fn test_count_serializes_as_map() {
        let mut count = Count::zeroed(2);
        count.add(2, 3);
        let json = serde_json::to_string(&count).unwrap();
        assert_eq!(json, r#"{"1":0,"2":3}"#);
    }

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let profile = Profile::new(3, vec![vec![1, 2, 3], vec![1, 3, 2], vec![2, 1, 3]]).unwrap();
        let thresholds = [1, 2, 1];
        let params = RuleParams::with_thresholds(&thresholds);

        assert_eq!(tally(Rule::Majority, &profile, &params), majority(&profile));
        assert_eq!(tally(Rule::Borda, &profile, &params), borda(&profile));
        assert_eq!(
            tally(Rule::Approval, &profile, &params),
            approval(&profile, &thresholds)
        );
        assert_eq!(tally(Rule::Condorcet, &profile, &params), condorcet(&profile));
        assert_eq!(tally(Rule::Copeland, &profile, &params), copeland(&profile));
    }

    #[test]
    fn test_approval_without_thresholds_mismatches() {
        let profile = Profile::new(2, vec![vec![1, 2]]).unwrap();
        assert_eq!(
            tally(Rule::Approval, &profile, &RuleParams::default()),
            Err(TallyError::ThresholdCountMismatch {
                voters: 1,
                thresholds: 0
            })
        );
    }

    #[test]
    fn test_every_rule_rejects_empty_profile() {
        let profile = Profile::empty(4);
        for rule in Rule::ALL {
            assert_eq!(
                tally(rule, &profile, &RuleParams::default()),
                Err(TallyError::EmptyProfile),
                "{rule} accepted an empty profile"
            );
        }
    }

    #[test]
    fn test_decide_uses_tie_break() {
        let profile = Profile::new(2, vec![vec![1, 2], vec![2, 1]]).unwrap();
        let params = RuleParams::default();

        assert_eq!(social_choice(Rule::Majority, &profile, &params), Ok(vec![1, 2]));
        let order = TieBreakOrder::new(2, vec![2, 1]).unwrap();
        assert_eq!(decide(Rule::Majority, &profile, &params, &order), Ok(2));
        let order = TieBreakOrder::natural(2);
        assert_eq!(decide(Rule::Majority, &profile, &params, &order), Ok(1));
    }

    #[test]
    fn test_score_sums_on_random_profiles() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let alts = rng.gen_range(2..=7);
            let voters = rng.gen_range(1..=40);
            let profile = random_profile(&mut rng, alts, voters);

            let majority = majority(&profile).unwrap();
            assert_eq!(majority.total(), voters as i64);
            assert_eq!(majority.len(), alts);

            let borda = borda(&profile).unwrap();
            assert_eq!(borda.total(), (voters * (alts - 1) * alts / 2) as i64);

            let copeland = copeland(&profile).unwrap();
            assert_eq!(copeland.total(), 0);
        }
    }

    #[test]
    fn test_condorcet_winner_is_copeland_maximal() {
        let mut rng = rand::thread_rng();
        let mut winners_seen = 0;
        for _ in 0..300 {
            let alts = rng.gen_range(2..=5);
            let voters = rng.gen_range(1..=15);
            let profile = random_profile(&mut rng, alts, voters);

            let Ok(winner) = condorcet_winner(&profile) else {
                continue;
            };
            winners_seen += 1;

            let condorcet = condorcet(&profile).unwrap();
            assert_eq!(condorcet.best(), vec![winner]);

            let copeland = copeland(&profile).unwrap();
            assert!(copeland.best().contains(&winner));
            assert_eq!(copeland.get(winner), alts as i64 - 1);
        }
        // Single-voter profiles always have a Condorcet winner
        assert!(winners_seen > 0);
    }
}
