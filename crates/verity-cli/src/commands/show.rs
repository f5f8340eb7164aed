//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use verity_domain::DocumentStore;
use verity_store::{find_influencer, load_claims, StoreError};

/// Execute the show command.
pub fn execute_show<S>(args: ShowArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: DocumentStore<Error = StoreError>,
{
    let stored = find_influencer(store, &args.influencer)?
        .ok_or_else(|| CliError::NotFound(format!("No influencer matching '{}'", args.influencer)))?;
    let claims = load_claims(store, stored.id)?;

    println!("{}", formatter.format_influencer(&stored, &claims)?);
    Ok(())
}
