//! Keyed registry of ballots
//!
//! The registry map sits behind an `RwLock` held only for lookup and insert;
//! each ballot sits behind its own `Mutex`. Votes and result requests on one
//! ballot are therefore serialized, while different ballots proceed
//! independently.

use crate::ballot::clock::{Clock, SystemClock};
use crate::ballot::state::{Ballot, BallotStatus, BallotSummary, NewBallot};
use crate::errors::{Error, ResolveError, VoteError};
use crate::types::{BallotId, Outcome, Preference, VoteReceipt};
use crate::{EngineConfig, Result, internal_error};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

type BallotHandle = Arc<Mutex<Ballot>>;

pub struct BallotStore {
    ballots: RwLock<HashMap<BallotId, BallotHandle>>,
    next_id: AtomicU64,
    limits: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl BallotStore {
    pub fn new(limits: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            ballots: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            limits,
            clock,
        }
    }

    /// Store reading wall-clock time
    pub fn with_system_clock(limits: EngineConfig) -> Self {
        Self::new(limits, Arc::new(SystemClock))
    }

    /// Create for testing with relaxed limits and wall-clock time
    pub fn for_testing() -> Self {
        Self::with_system_clock(EngineConfig::for_testing())
    }

    pub fn limits(&self) -> &EngineConfig {
        &self.limits
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Validate and open a new ballot, returning its id.
    ///
    /// Ids are `<Rule><n>` with `n` a store-wide counter, so they are never
    /// reused. A rejected request consumes no id.
    pub fn create(&self, request: NewBallot) -> Result<BallotId> {
        let now = self.clock.now();
        let tie_break = request.validate(now, &self.limits)?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let ballot_id = format!("{}{}", request.rule, n);
        let rule = request.rule;
        let alts = request.alts;
        let deadline = request.deadline;
        let ballot = Ballot::new(ballot_id.clone(), request, tie_break, now);

        self.ballots
            .write()
            .map_err(|_| internal_error!("Ballot registry write error"))?
            .insert(ballot_id.clone(), Arc::new(Mutex::new(ballot)));

        tracing::info!(
            ballot_id = %ballot_id,
            %rule,
            alts,
            %deadline,
            "ballot opened"
        );

        Ok(ballot_id)
    }

    /// Record `voter_id`'s preference on a ballot.
    ///
    /// `threshold` is the voter's approval threshold; it is required on
    /// Approval ballots and ignored otherwise.
    pub fn record_vote(
        &self,
        ballot_id: &str,
        voter_id: &str,
        preference: Preference,
        threshold: Option<usize>,
    ) -> Result<VoteReceipt> {
        let now = self.clock.now();
        let handle = self
            .handle(ballot_id)?
            .ok_or_else(|| VoteError::NotFound(ballot_id.to_string()))?;
        let mut ballot = lock(&handle)?;

        match ballot.record_vote(voter_id, preference, threshold, now) {
            Ok(receipt) => {
                tracing::debug!(
                    ballot_id,
                    voter_id,
                    votes_cast = ballot.votes_cast(),
                    "vote recorded"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(ballot_id, voter_id, error = %err, "vote rejected");
                Err(err.into())
            }
        }
    }

    /// Resolve a ballot: compute winner and ranking on the first call, return
    /// the cached outcome on every later one.
    pub fn resolve(&self, ballot_id: &str) -> Result<Outcome> {
        let now = self.clock.now();
        let handle = self
            .handle(ballot_id)?
            .ok_or_else(|| ResolveError::NotFound(ballot_id.to_string()))?;
        let mut ballot = lock(&handle)?;

        let already_resolved = ballot.outcome().is_some();
        let outcome = ballot.resolve(now)?;
        if !already_resolved {
            tracing::info!(
                ballot_id,
                rule = %outcome.rule,
                winner = outcome.winner,
                voters = outcome.voters,
                "ballot resolved"
            );
        }
        Ok(outcome)
    }

    /// Stop accepting votes on a ballot before its deadline.
    pub fn close(&self, ballot_id: &str) -> Result<BallotStatus> {
        let now = self.clock.now();
        let handle = self.handle(ballot_id)?.ok_or_else(|| Error::NotFound {
            ballot_id: ballot_id.to_string(),
        })?;
        let mut ballot = lock(&handle)?;
        let was_open = ballot.status(now) == BallotStatus::Open;
        let status = ballot.close(now);

        if was_open {
            tracing::info!(ballot_id, "ballot closed");
        }
        Ok(status)
    }

    /// Close every Open ballot whose deadline has passed. Returns how many were closed.
    pub fn close_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let handles: Vec<BallotHandle> = self
            .ballots
            .read()
            .map_err(|_| internal_error!("Ballot registry read error"))?
            .values()
            .cloned()
            .collect();

        let mut closed = 0;
        for handle in handles {
            let mut ballot = lock(&handle)?;
            if ballot.close_if_expired(now) {
                tracing::info!(ballot_id = ballot.id(), deadline = %ballot.deadline(), "ballot expired");
                closed += 1;
            }
        }
        Ok(closed)
    }

    pub fn summary(&self, ballot_id: &str) -> Result<BallotSummary> {
        let now = self.clock.now();
        let handle = self.handle(ballot_id)?.ok_or_else(|| Error::NotFound {
            ballot_id: ballot_id.to_string(),
        })?;
        let summary = lock(&handle)?.summary(now);
        Ok(summary)
    }

    /// Ids of every ballot, sorted
    pub fn ballot_ids(&self) -> Result<Vec<BallotId>> {
        let mut ids: Vec<BallotId> = self
            .ballots
            .read()
            .map_err(|_| internal_error!("Ballot registry read error"))?
            .keys()
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self
            .ballots
            .read()
            .map_err(|_| internal_error!("Ballot registry read error"))?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn handle(&self, ballot_id: &str) -> Result<Option<BallotHandle>> {
        let ballots = self
            .ballots
            .read()
            .map_err(|_| internal_error!("Ballot registry read error"))?;
        Ok(ballots.get(ballot_id).cloned())
    }
}

fn lock(handle: &BallotHandle) -> Result<MutexGuard<'_, Ballot>> {
    handle
        .lock()
        .map_err(|_| internal_error!("Ballot lock poisoned"))
}
