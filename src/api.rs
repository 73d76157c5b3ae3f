//! Request and response shapes for a transport layer
//!
//! A transport decodes these from its wire format, hands them to the
//! [`BallotStore`] methods below, and maps any [`Error`] to a [`Status`].
//! JSON keys are kebab-case (`ballot-id`, `voter-ids`, `tie-break`).

use crate::Result;
use crate::ballot::{BallotStore, NewBallot};
use crate::errors::{Error, ResolveError, TallyError, VoteError};
use crate::types::{Alternative, BallotId, Rule, VoteReceipt, VoterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewBallotRequest {
    pub rule: String,
    pub deadline: DateTime<Utc>,
    pub voter_ids: Vec<VoterId>,
    pub alts: usize,
    pub tie_break: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewBallotResponse {
    pub ballot_id: BallotId,
}

/// A vote submission. On Approval ballots `options[0]` is the voter's threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VoteRequest {
    pub agent_id: VoterId,
    pub ballot_id: BallotId,
    pub prefs: Vec<Alternative>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResultRequest {
    pub ballot_id: BallotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub winner: Alternative,
    pub ranking: Vec<Alternative>,
}

/// Caller-facing outcome category of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    Conflict,
    TooEarly,
    Internal,
    Unavailable,
}

impl Status {
    /// HTTP status code conventionally used for this category
    pub fn http_code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::Conflict => 409,
            Status::TooEarly => 425,
            Status::Internal => 500,
            Status::Unavailable => 503,
        }
    }
}

impl From<&Error> for Status {
    fn from(error: &Error) -> Self {
        match error {
            Error::Validation(_) | Error::Serialization(_) => Status::BadRequest,
            Error::Vote(vote) => match vote {
                VoteError::NotFound(_) => Status::NotFound,
                VoteError::Ineligible { .. } | VoteError::InvalidPreference(_) => {
                    Status::BadRequest
                }
                VoteError::Expired { .. } | VoteError::Closed(_) => Status::Unavailable,
                VoteError::AlreadyVoted { .. } => Status::Forbidden,
            },
            Error::Resolve(resolve) => match resolve {
                ResolveError::NotFound(_) => Status::NotFound,
                ResolveError::NoVotesYet(_) => Status::TooEarly,
            },
            Error::Tally(TallyError::NoCondorcetWinner) => Status::Conflict,
            Error::Tally(_) | Error::Config { .. } | Error::Internal { .. } => Status::Internal,
            Error::NotFound { .. } => Status::NotFound,
        }
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(error) => error.into(),
        }
    }
}

impl BallotStore {
    /// Open a ballot from a decoded creation request.
    pub fn new_ballot(&self, request: NewBallotRequest) -> Result<NewBallotResponse> {
        let rule: Rule = request.rule.parse()?;
        let ballot_id = self.create(NewBallot {
            rule,
            deadline: request.deadline,
            voter_ids: request.voter_ids,
            alts: request.alts,
            tie_break: request.tie_break,
        })?;
        Ok(NewBallotResponse { ballot_id })
    }

    /// Record a decoded vote request.
    pub fn vote(&self, request: VoteRequest) -> Result<VoteReceipt> {
        let threshold = request.options.first().copied();
        self.record_vote(&request.ballot_id, &request.agent_id, request.prefs, threshold)
    }

    /// Answer a decoded result request.
    pub fn result(&self, request: ResultRequest) -> Result<ResultResponse> {
        let outcome = self.resolve(&request.ballot_id)?;
        Ok(ResultResponse {
            winner: outcome.winner,
            ranking: outcome.ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use chrono::Duration;

    #[test]
    fn test_requests_use_kebab_case() {
        let json = r#"{
            "rule": "Majority",
            "deadline": "2099-01-01T00:00:00Z",
            "voter-ids": ["ag_id1", "ag_id2"],
            "alts": 4,
            "tie-break": [4, 2, 3, 1]
        }"#;
        let request: NewBallotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.voter_ids, vec!["ag_id1", "ag_id2"]);
        assert_eq!(request.tie_break, vec![4, 2, 3, 1]);

        let vote: VoteRequest =
            serde_json::from_str(r#"{"agent-id": "ag_id1", "ballot-id": "Majority0", "prefs": [1, 2]}"#)
                .unwrap();
        assert!(vote.options.is_empty());

        let response = serde_json::to_string(&NewBallotResponse {
            ballot_id: "Borda3".to_string(),
        })
        .unwrap();
        assert_eq!(response, r#"{"ballot-id":"Borda3"}"#);
    }

    #[test]
    fn test_status_taxonomy() {
        let cases: Vec<(Error, u16)> = vec![
            (ValidationError::UnknownRule("x".into()).into(), 400),
            (VoteError::NotFound("b".into()).into(), 404),
            (
                VoteError::Expired {
                    ballot_id: "b".into(),
                    deadline: Utc::now(),
                }
                .into(),
                503,
            ),
            (
                VoteError::AlreadyVoted {
                    ballot_id: "b".into(),
                    voter_id: "v".into(),
                }
                .into(),
                403,
            ),
            (ResolveError::NoVotesYet("b".into()).into(), 425),
            (ResolveError::NotFound("b".into()).into(), 404),
            (TallyError::NoCondorcetWinner.into(), 409),
            (Error::internal("boom"), 500),
        ];
        for (error, code) in cases {
            assert_eq!(Status::from(&error).http_code(), code, "{error}");
        }
    }

    #[test]
    fn test_request_round_trip_through_store() {
        let store = BallotStore::for_testing();
        let created = store
            .new_ballot(NewBallotRequest {
                rule: "approval".to_string(),
                deadline: Utc::now() + Duration::hours(1),
                voter_ids: vec!["ag_1".into(), "ag_2".into()],
                alts: 3,
                tie_break: vec![3, 2, 1],
            })
            .unwrap();
        assert_eq!(created.ballot_id, "Approval0");

        let receipt = store.vote(VoteRequest {
            agent_id: "ag_1".into(),
            ballot_id: created.ballot_id.clone(),
            prefs: vec![1, 2, 3],
            options: vec![2],
        });
        assert_eq!(Status::from(&receipt), Status::Ok);

        store
            .vote(VoteRequest {
                agent_id: "ag_2".into(),
                ballot_id: created.ballot_id.clone(),
                prefs: vec![2, 1, 3],
                options: vec![2],
            })
            .unwrap();

        // 1 and 2 tie on two approvals each; 2 precedes 1 in the tie-break order
        let result = store
            .result(ResultRequest {
                ballot_id: created.ballot_id,
            })
            .unwrap();
        assert_eq!(result.winner, 2);
        assert_eq!(result.ranking, vec![2, 1, 3]);
    }

    #[test]
    fn test_unknown_rule_is_bad_request() {
        let store = BallotStore::for_testing();
        let result = store.new_ballot(NewBallotRequest {
            rule: "Schulze".to_string(),
            deadline: Utc::now() + Duration::hours(1),
            voter_ids: vec!["ag_1".into()],
            alts: 2,
            tie_break: vec![1, 2],
        });
        assert_eq!(Status::from(&result), Status::BadRequest);
        assert!(store.is_empty().unwrap());
    }
}
