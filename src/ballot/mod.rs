//! Ballot lifecycle: the ballot entity, its registry and deadline handling

pub mod clock;
pub mod state;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use state::{Ballot, BallotStatus, BallotSummary, NewBallot};
pub use store::BallotStore;
pub use sweeper::{spawn_configured_sweeper, spawn_deadline_sweeper};
