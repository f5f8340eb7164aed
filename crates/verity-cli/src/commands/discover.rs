//! Discover command implementation.

use crate::cli::DiscoverArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use verity_domain::{DocumentStore, ResearchProvider};
use verity_research::{KnownInfluencer, ResearchError, Researcher};
use verity_store::{known_influencers, save_report, StoreError};

/// Execute the discover command.
///
/// Influencers already in the store are passed to the provider as exclusions.
pub async fn execute_discover<P, S>(
    args: DiscoverArgs,
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
    let exclude: Vec<KnownInfluencer> = known_influencers(store)?
        .into_iter()
        .map(|(name, handle)| KnownInfluencer { name, handle })
        .collect();

    let researcher = Researcher::new(provider, config.research_config(exclude))?;

    if !formatter.is_quiet() {
        eprintln!(
            "{}",
            formatter.info(&format!(
                "Discovering influencers with {} ({} already known)...",
                researcher.model_name(),
                researcher.config().exclude.len()
            ))
        );
    }

    let discovery = researcher.discover_influencers().await?;

    for report in &discovery.reports {
        let id = if args.dry_run {
            None
        } else {
            Some(save_report(store, &report.influencer, &report.claims)?.id)
        };
        println!("{}", formatter.format_report(report, id)?);
    }

    if !formatter.is_quiet() {
        for rejected in &discovery.rejected {
            eprintln!(
                "{}",
                formatter.warning(&format!("Dropped influencer #{}: {}", rejected.index + 1, rejected.error))
            );
        }
        let verb = if args.dry_run { "Found" } else { "Saved" };
        eprintln!(
            "{}",
            formatter.success(&format!("{} {} influencer(s)", verb, discovery.reports.len()))
        );
    }

    Ok(())
}
