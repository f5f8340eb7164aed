//! Output formatting for the CLI.

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use colored::*;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verity_domain::{Claim, Influencer, RecordId};
use verity_research::InfluencerReport;
use verity_store::{StoredClaim, StoredInfluencer};

const CLAIM_WIDTH: usize = 60;
const ANALYSIS_WIDTH: usize = 50;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a freshly researched influencer; `id` is set once it was saved.
    pub fn format_report(&self, report: &InfluencerReport, id: Option<RecordId>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::to_value(report)?;
                if let Value::Object(fields) = &mut value {
                    fields.insert("id".to_string(), json!(id.map(|id| id.to_string())));
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(id.map_or_else(|| report.influencer.handle.clone(), |id| id.to_string())),
            OutputFormat::Table => {
                let mut out = self.influencer_header(&report.influencer);
                out.push('\n');
                out.push_str(&self.claims_table(report.claims.iter()));
                for rejected in &report.rejected_claims {
                    out.push('\n');
                    out.push_str(&self.warning(&format!("Dropped claim #{}: {}", rejected.index + 1, rejected.error)));
                }
                if report.truncated_claims > 0 {
                    out.push('\n');
                    out.push_str(&self.warning(&format!(
                        "{} extra claim(s) beyond the configured maximum were not kept",
                        report.truncated_claims
                    )));
                }
                Ok(out)
            }
        }
    }

    /// Format the leaderboard.
    pub fn format_leaderboard(&self, entries: &[StoredInfluencer]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Quiet => Ok(entries.iter().map(|e| e.id.to_string()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No influencers found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Name", "Handle", "Category", "Followers", "Trust", "Verified", "Debunked"]);

                for (rank, entry) in entries.iter().enumerate() {
                    let inf = &entry.influencer;
                    builder.push_record([
                        (rank + 1).to_string(),
                        inf.name.clone(),
                        inf.handle.clone(),
                        inf.main_category.clone(),
                        compact_number(inf.followers),
                        format!("{}%", inf.stats.trust_score()),
                        inf.stats.verified.to_string(),
                        inf.stats.debunked.to_string(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format a stored influencer with its claims.
    pub fn format_influencer(&self, stored: &StoredInfluencer, claims: &[StoredClaim]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "influencer": stored,
                "claims": claims,
            }))?),
            OutputFormat::Quiet => Ok(claims.iter().map(|c| c.id.to_string()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut out = format!("ID: {}\n", stored.id);
                out.push_str(&self.influencer_header(&stored.influencer));
                out.push('\n');
                out.push_str(&self.claims_table(claims.iter().map(|c| &c.claim)));
                Ok(out)
            }
        }
    }

    /// Format the configuration, with the API key masked.
    pub fn format_config(&self, config: &Config) -> Result<String> {
        let mut masked = config.clone();
        masked.api.api_key = masked.api.api_key.as_deref().map(mask_key);

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&masked)?),
            _ => toml::to_string_pretty(&masked)
                .map_err(|e| crate::error::CliError::Config(format!("Failed to serialize config: {}", e))),
        }
    }

    /// Format a trust score with its colour band.
    pub fn trust_score(&self, score: f64) -> String {
        self.colorize(&format!("{:.0}", score), trust_color(score))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Whether output is meant for machines rather than people.
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Quiet)
    }

    fn influencer_header(&self, inf: &Influencer) -> String {
        let trust = inf.stats.trust_score();
        format!(
            "{} ({})  {}\n{}\nFollowers: {}  Trust: {}%  Verified: {}  Debunked: {}\n",
            self.colorize(&inf.name, "cyan"),
            inf.handle,
            inf.main_category,
            inf.description,
            compact_number(inf.followers),
            self.trust_score(f64::from(trust)),
            inf.stats.verified,
            inf.stats.debunked,
        )
    }

    fn claims_table<'a>(&self, claims: impl Iterator<Item = &'a Claim>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Claim", "Score", "Verified", "Analysis", "Sources"]);

        let mut count = 0;
        for claim in claims {
            count += 1;
            builder.push_record([
                truncate(&claim.statement, CLAIM_WIDTH),
                format!("{:.0}", claim.trust_score.value()),
                if claim.verified() { "yes" } else { "no" }.to_string(),
                truncate(&claim.analysis, ANALYSIS_WIDTH),
                claim.sources.len().to_string(),
            ]);
        }

        if count == 0 {
            return self.colorize("No claims found.", "yellow");
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Colour band for a trust score: green from 80, yellow from 60, red below.
pub fn trust_color(score: f64) -> &'static str {
    if score >= 80.0 {
        "green"
    } else if score >= 60.0 {
        "yellow"
    } else {
        "red"
    }
}

/// Compact follower count: `950`, `12.5K`, `1.2M`, `3B`.
pub fn compact_number(n: u64) -> String {
    const UNITS: [&str; 4] = ["", "K", "M", "B"];

    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let mut rounded = (value * 10.0).round() / 10.0;
    // 999_999 rounds up into the next unit
    if rounded >= 1000.0 && unit < UNITS.len() - 1 {
        rounded = 1.0;
        unit += 1;
    }

    if unit == 0 {
        return n.to_string();
    }
    format!("{}{}", trim_fraction(rounded), UNITS[unit])
}

fn trim_fraction(value: f64) -> String {
    let text = format!("{:.1}", value);
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn mask_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}
