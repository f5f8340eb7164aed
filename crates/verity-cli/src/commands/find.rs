//! Find command implementation.

use crate::cli::FindArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use verity_domain::{DocumentStore, ResearchProvider};
use verity_research::{ResearchError, Researcher};
use verity_store::{save_report, StoreError};

/// Execute the find command.
pub async fn execute_find<P, S>(
    args: FindArgs,
    provider: P,
    config: &Config,
    store: &mut S,
    formatter: &Formatter,
) -> Result<()>
where
    P: ResearchProvider,
    P::Error: Into<ResearchError>,
    S: DocumentStore<Error = StoreError>,
{
    let query = args.query();
    let researcher = Researcher::new(provider, config.research_config(Vec::new()))?;

    if !formatter.is_quiet() {
        eprintln!(
            "{}",
            formatter.info(&format!("Researching '{}' with {}...", query, researcher.model_name()))
        );
    }

    let report = researcher.find_influencer(&query).await?;

    if args.dry_run {
        println!("{}", formatter.format_report(&report, None)?);
        return Ok(());
    }

    let saved = save_report(store, &report.influencer, &report.claims)?;
    println!("{}", formatter.format_report(&report, Some(saved.id))?);

    if !formatter.is_quiet() {
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Saved {} ({} claims on record)",
                saved.influencer.handle,
                saved.influencer.stats.total()
            ))
        );
    }

    Ok(())
}
