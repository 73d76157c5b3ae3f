//! # Core Types for the Ballot Engine
//!
//! This module defines the plain data shared by the tally engine, the ballot
//! state machine and the request facade.
//!
//! ## Conventions
//!
//! - **Alternatives are 1-indexed**: a ballot with `alts = 4` knows the
//!   alternatives `1, 2, 3, 4`. Zero is never a valid alternative.
//! - **Voters are opaque strings** supplied by the caller at ballot creation.
//! - **Ballot ids are store-assigned** and never reused.
//!
//! ## Usage Examples
//!
//! ```rust
//! use scrutin::types::Rule;
//!
//! let rule: Rule = "Copeland".parse().unwrap();
//! assert_eq!(rule, Rule::Copeland);
//! assert!(!rule.needs_thresholds());
//! assert_eq!(rule.to_string(), "Copeland");
//! ```

use crate::errors::ValidationError;
use crate::tally::Count;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// An alternative (candidate) identifier, in `1..=alts`
pub type Alternative = u32;

/// A ranked preference list, most preferred first
pub type Preference = Vec<Alternative>;

/// Caller-supplied voter identifier
pub type VoterId = String;

/// Store-assigned ballot identifier
pub type BallotId = String;

/// The closed set of voting rules a ballot can be opened with
///
/// Each rule maps to exactly one tally function; see
/// [`crate::tally::tally`] for the dispatch table.
///
/// # Rules
///
/// - [`Rule::Majority`]: plurality of first places
/// - [`Rule::Borda`]: positional scoring, `alts - rank - 1` points per rank
/// - [`Rule::Approval`]: each voter approves their first `threshold` entries
/// - [`Rule::Condorcet`]: the alternative beating every other pairwise, if any
/// - [`Rule::Copeland`]: net pairwise wins minus losses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Majority,
    Borda,
    Approval,
    Condorcet,
    Copeland,
}

impl Rule {
    /// Every supported rule, in declaration order
    pub const ALL: [Rule; 5] = [
        Rule::Majority,
        Rule::Borda,
        Rule::Approval,
        Rule::Condorcet,
        Rule::Copeland,
    ];

    /// Canonical rule name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Majority => "Majority",
            Rule::Borda => "Borda",
            Rule::Approval => "Approval",
            Rule::Condorcet => "Condorcet",
            Rule::Copeland => "Copeland",
        }
    }

    /// Whether votes under this rule carry a per-voter approval threshold
    pub fn needs_thresholds(&self) -> bool {
        matches!(self, Rule::Approval)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = ValidationError;

    /// Parse a rule name. Matching is case-insensitive so `"borda"` and
    /// `"Borda"` are the same rule; `"Plurality"` is accepted as an alias of
    /// [`Rule::Majority`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "majority" | "plurality" => Ok(Rule::Majority),
            "borda" => Ok(Rule::Borda),
            "approval" => Ok(Rule::Approval),
            "condorcet" => Ok(Rule::Condorcet),
            "copeland" => Ok(Rule::Copeland),
            _ => Err(ValidationError::UnknownRule(s.to_string())),
        }
    }
}

/// The resolved result of a ballot
///
/// Computed once, at the first result request, and cached on the ballot so
/// every later request observes the same value.
///
/// # Fields
///
/// - `winner` always equals `ranking[0]`
/// - `ranking` lists every alternative, best first; score ties are ordered by
///   the ballot's tie-break precedence
/// - `scores` is the raw rule count the ranking was derived from. For
///   [`Rule::Condorcet`] it holds each alternative's number of pairwise wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Rule the outcome was computed with
    pub rule: Rule,

    /// Winning alternative after tie-breaking
    pub winner: Alternative,

    /// Every alternative, best first
    pub ranking: Vec<Alternative>,

    /// Score per alternative
    pub scores: Count,

    /// Number of voters whose preferences were counted
    pub voters: usize,

    /// When the outcome was computed
    pub resolved_at: DateTime<Utc>,
}

/// Acknowledgement of a recorded vote
///
/// The receipt id is random and carries no information about the preference
/// itself; it lets a voter refer to their submission later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub ballot_id: BallotId,
    pub voter_id: VoterId,
    pub receipt_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}

impl VoteReceipt {
    pub fn new(ballot_id: BallotId, voter_id: VoterId, recorded_at: DateTime<Utc>) -> Self {
        Self {
            ballot_id,
            voter_id,
            receipt_id: Uuid::new_v4(),
            recorded_at,
        }
    }
}
