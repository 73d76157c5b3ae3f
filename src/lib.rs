//! Social-choice ballot engine
//!
//! Open a ballot with a voting rule and a list of eligible voters, collect one
//! ranked preference per voter, and resolve a winner and full ranking.

pub mod api;
pub mod ballot;
pub mod config;
pub mod errors;
pub mod tally;
pub mod types;

// Re-export commonly used types
pub use ballot::{BallotStatus, BallotStore, NewBallot};
pub use config::{Config, EngineConfig, LoggingConfig};
pub use errors::{Error, ResolveError, Result, TallyError, ValidationError, VoteError};
pub use types::{Alternative, Outcome, Rule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default filter
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrutin=info".into()),
        )
        .try_init()
        .map_err(|e| internal_error!("Logging already initialized: {}", e))?;

    tracing::info!("🗳️  Ballot engine v{} initialized", VERSION);
    Ok(())
}

/// Initialize logging from a [`LoggingConfig`]
///
/// `RUST_LOG` still takes precedence over `config.level`.
pub fn init_with(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format.as_str() {
        "compact" => builder.compact().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|e| internal_error!("Logging already initialized: {}", e))?;

    tracing::info!(format = %config.format, "🗳️  Ballot engine v{} initialized", VERSION);
    Ok(())
}
