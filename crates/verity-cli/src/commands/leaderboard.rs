//! Leaderboard command implementation.

use crate::cli::LeaderboardArgs;
use crate::error::Result;
use crate::output::Formatter;
use verity_domain::DocumentStore;
use verity_store::{leaderboard, StoreError};

/// Execute the leaderboard command.
pub fn execute_leaderboard<S>(args: LeaderboardArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: DocumentStore<Error = StoreError>,
{
    let mut entries = leaderboard(store, args.sort.into())?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    if entries.is_empty() && !formatter.is_quiet() {
        eprintln!("{}", formatter.info("No influencers researched yet. Try 'verity find <name>'."));
        return Ok(());
    }

    println!("{}", formatter.format_leaderboard(&entries)?);
    Ok(())
}
