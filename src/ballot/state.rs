//! The ballot entity and its lifecycle
//!
//! ```text
//!   Open ──(deadline passes / close)──▶ Closed
//!    │                                    │
//!    └──────(first result request)────────┴──▶ Resolved (terminal)
//! ```
//!
//! A ballot accepts votes only while Open and strictly before its deadline.
//! Resolving computes the outcome once and caches it; a Resolved ballot never
//! changes again.

use crate::errors::{ResolveError, ValidationError, VoteError};
use crate::tally::{
    Profile, RuleParams, TieBreakOrder, tally, validate_preference, validate_threshold,
};
use crate::types::{Alternative, BallotId, Outcome, Preference, Rule, VoteReceipt, VoterId};
use crate::{EngineConfig, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Parameters of a ballot to open, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBallot {
    pub rule: Rule,
    pub deadline: DateTime<Utc>,
    pub voter_ids: Vec<VoterId>,
    pub alts: usize,
    pub tie_break: Vec<Alternative>,
}

impl NewBallot {
    /// Validate against the engine limits and the current time.
    ///
    /// Returns the checked tie-break order on success.
    pub fn validate(
        &self,
        now: DateTime<Utc>,
        limits: &EngineConfig,
    ) -> std::result::Result<TieBreakOrder, ValidationError> {
        if self.deadline <= now {
            return Err(ValidationError::DeadlineInPast {
                deadline: self.deadline,
            });
        }
        if self.alts < 2 {
            return Err(ValidationError::TooFewAlternatives { alts: self.alts });
        }
        if self.alts > limits.max_alternatives {
            return Err(ValidationError::TooManyAlternatives {
                alts: self.alts,
                max: limits.max_alternatives,
            });
        }
        if self.voter_ids.is_empty() {
            return Err(ValidationError::NoEligibleVoters);
        }
        if self.voter_ids.len() > limits.max_voters {
            return Err(ValidationError::TooManyVoters {
                count: self.voter_ids.len(),
                max: limits.max_voters,
            });
        }
        TieBreakOrder::new(self.alts, self.tie_break.clone())
    }
}

/// Externally visible lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotStatus {
    Open,
    Closed,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BallotState {
    Open,
    Closed,
    Resolved(Outcome),
}

#[derive(Debug, Clone)]
struct CastVote {
    preference: Preference,
    threshold: Option<usize>,
}

/// Read-only view of a ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSummary {
    pub id: BallotId,
    pub rule: Rule,
    pub status: BallotStatus,
    pub alts: usize,
    pub deadline: DateTime<Utc>,
    pub eligible_voters: usize,
    pub votes_cast: usize,
    pub outcome: Option<Outcome>,
}

#[derive(Debug)]
pub struct Ballot {
    id: BallotId,
    rule: Rule,
    deadline: DateTime<Utc>,
    eligible: HashSet<VoterId>,
    alts: usize,
    tie_break: TieBreakOrder,
    votes: BTreeMap<VoterId, CastVote>,
    state: BallotState,
    created_at: DateTime<Utc>,
}

impl Ballot {
    /// Build an Open ballot from already validated parameters.
    pub(crate) fn new(
        id: BallotId,
        request: NewBallot,
        tie_break: TieBreakOrder,
        created_at: DateTime<Utc>,
    ) -> Self {
        assert_eq!(
            tie_break.len(),
            request.alts,
            "tie-break order does not cover the ballot's alternatives"
        );
        Self {
            id,
            rule: request.rule,
            deadline: request.deadline,
            eligible: request.voter_ids.into_iter().collect(),
            alts: request.alts,
            tie_break,
            votes: BTreeMap::new(),
            state: BallotState::Open,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn alts(&self) -> usize {
        self.alts
    }

    pub fn tie_break(&self) -> &TieBreakOrder {
        &self.tie_break
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn votes_cast(&self) -> usize {
        self.votes.len()
    }

    pub fn is_eligible(&self, voter_id: &str) -> bool {
        self.eligible.contains(voter_id)
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.votes.contains_key(voter_id)
    }

    /// Phase as observed at `now`; an Open ballot past its deadline reads as Closed.
    pub fn status(&self, now: DateTime<Utc>) -> BallotStatus {
        match self.state {
            BallotState::Resolved(_) => BallotStatus::Resolved,
            BallotState::Closed => BallotStatus::Closed,
            BallotState::Open if now >= self.deadline => BallotStatus::Closed,
            BallotState::Open => BallotStatus::Open,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            BallotState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Record one voter's preference.
    ///
    /// Checks, in order: eligibility, that the ballot still accepts votes at
    /// `now`, the preference (and approval threshold), and that the voter has
    /// not voted yet. Any failure leaves the ballot untouched.
    pub fn record_vote(
        &mut self,
        voter_id: &str,
        preference: Preference,
        threshold: Option<usize>,
        now: DateTime<Utc>,
    ) -> std::result::Result<VoteReceipt, VoteError> {
        if !self.is_eligible(voter_id) {
            return Err(VoteError::Ineligible {
                ballot_id: self.id.clone(),
                voter_id: voter_id.to_string(),
            });
        }

        // A late vote is Expired whether or not the sweeper already closed the ballot
        if now >= self.deadline {
            return Err(VoteError::Expired {
                ballot_id: self.id.clone(),
                deadline: self.deadline,
            });
        }
        if self.state != BallotState::Open {
            return Err(VoteError::Closed(self.id.clone()));
        }

        validate_preference(self.alts, &preference)?;
        let threshold = if self.rule.needs_thresholds() {
            let threshold = threshold.ok_or(ValidationError::MissingThreshold)?;
            validate_threshold(self.alts, threshold)?;
            Some(threshold)
        } else {
            None
        };

        if self.has_voted(voter_id) {
            return Err(VoteError::AlreadyVoted {
                ballot_id: self.id.clone(),
                voter_id: voter_id.to_string(),
            });
        }

        self.votes.insert(
            voter_id.to_string(),
            CastVote {
                preference,
                threshold,
            },
        );

        Ok(VoteReceipt::new(self.id.clone(), voter_id.to_string(), now))
    }

    /// Stop accepting votes. No effect on a Closed or Resolved ballot.
    pub fn close(&mut self, now: DateTime<Utc>) -> BallotStatus {
        if self.state == BallotState::Open {
            self.state = BallotState::Closed;
        }
        self.status(now)
    }

    /// Close the ballot if its deadline has passed at `now`.
    ///
    /// Returns whether this call changed the state.
    pub fn close_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == BallotState::Open && now >= self.deadline {
            self.state = BallotState::Closed;
            return true;
        }
        false
    }

    /// Every vote so far as a validated profile, in ascending voter-id order,
    /// with the matching approval thresholds.
    pub fn profile(&self) -> std::result::Result<(Profile, Vec<usize>), ValidationError> {
        let preferences = self
            .votes
            .values()
            .map(|vote| vote.preference.clone())
            .collect();
        let thresholds = self
            .votes
            .values()
            .map(|vote| vote.threshold.unwrap_or(self.alts))
            .collect();
        Ok((Profile::new(self.alts, preferences)?, thresholds))
    }

    /// Compute and cache the outcome, or return the cached one.
    ///
    /// A tally failure (no Condorcet winner) leaves the ballot unresolved.
    pub fn resolve(&mut self, now: DateTime<Utc>) -> Result<Outcome> {
        if let BallotState::Resolved(outcome) = &self.state {
            return Ok(outcome.clone());
        }
        if self.votes.is_empty() {
            return Err(ResolveError::NoVotesYet(self.id.clone()).into());
        }

        let (profile, thresholds) = self.profile()?;
        let params = if self.rule.needs_thresholds() {
            RuleParams::with_thresholds(&thresholds)
        } else {
            RuleParams::default()
        };

        let scores = tally(self.rule, &profile, &params)?;
        let winner = self.tie_break.winner(&scores)?;
        let ranking = self.tie_break.rank(&scores);
        assert_eq!(ranking.first(), Some(&winner), "ranking disagrees with winner");

        let outcome = Outcome {
            rule: self.rule,
            winner,
            ranking,
            scores,
            voters: profile.voters(),
            resolved_at: now,
        };
        self.state = BallotState::Resolved(outcome.clone());
        Ok(outcome)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> BallotSummary {
        BallotSummary {
            id: self.id.clone(),
            rule: self.rule,
            status: self.status(now),
            alts: self.alts,
            deadline: self.deadline,
            eligible_voters: self.eligible.len(),
            votes_cast: self.votes.len(),
            outcome: self.outcome().cloned(),
        }
    }
}
