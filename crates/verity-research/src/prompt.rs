//! Research prompt construction
//!
//! The prompt is the only contract the provider sees, so every field the
//! validator requires is spelled out in the schema below.

use crate::config::{KnownInfluencer, ResearchConfig, TrustedSource, DISCOVERY_BATCH_SIZE};

/// Builds prompts for the research provider
///
/// A builder created with [`PromptBuilder::lookup`] asks about one named
/// influencer; one created with [`PromptBuilder::discovery`] asks the provider
/// to propose a fixed-size batch.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    query: Option<String>,
    max_claims: usize,
    trusted_sources: Vec<TrustedSource>,
    exclude: Vec<KnownInfluencer>,
}

impl PromptBuilder {
    /// Prompt for a single-influencer lookup
    pub fn lookup(query: impl Into<String>, config: &ResearchConfig) -> Self {
        Self {
            query: Some(query.into()),
            max_claims: config.max_claims,
            trusted_sources: config.trusted_sources.clone(),
            // Exclusions only matter when the provider picks the influencers
            exclude: Vec::new(),
        }
    }

    /// Prompt for a discovery batch
    pub fn discovery(config: &ResearchConfig) -> Self {
        Self {
            query: None,
            max_claims: config.max_claims,
            trusted_sources: config.trusted_sources.clone(),
            exclude: config.exclude.clone(),
        }
    }

    /// Build the complete research prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        match &self.query {
            Some(query) => {
                prompt.push_str(&format!(
                    "Research the health and wellness influencer \"{}\".\n",
                    query.trim()
                ));
                prompt.push_str(&format!(
                    "Identify up to {} recent health claims they have made publicly and verify each one.\n\n",
                    self.max_claims
                ));
            }
            None => {
                prompt.push_str(&format!(
                    "Find {} rising health and wellness influencers who are gaining popularity.\n",
                    DISCOVERY_BATCH_SIZE
                ));
                prompt.push_str(&format!(
                    "For each, identify up to {} recent health claims they have made publicly and verify each one.\n\n",
                    self.max_claims
                ));
            }
        }

        if !self.trusted_sources.is_empty() {
            let names: Vec<&str> = self.trusted_sources.iter().map(|s| s.name.as_str()).collect();
            prompt.push_str(&format!(
                "When verifying claims, prioritize these sources in order: {}.\n\n",
                names.join(", ")
            ));
        }

        if !self.exclude.is_empty() {
            prompt.push_str("Do not include any of these influencers, who are already known:\n");
            for known in &self.exclude {
                prompt.push_str(&format!("- {} ({})\n", known.name, known.handle));
            }
            prompt.push('\n');
        }

        prompt.push_str(FIELD_RULES);
        prompt.push_str("\n\n");

        match self.query {
            Some(_) => prompt.push_str(LOOKUP_SCHEMA),
            None => prompt.push_str(&DISCOVERY_SCHEMA.replace("{count}", &DISCOVERY_BATCH_SIZE.to_string())),
        }
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const FIELD_RULES: &str = r#"Rules:
- "followers" is the combined follower count across platforms as a plain integer
- "mainCategory" is a short topical tag such as "Nutrition", "Fitness" or "Mental Health"
- "trustScore" is a number from 0 to 100 reflecting how well the scientific evidence supports the claim
- "analysis" explains why the claim is supported or not
- "sources" lists the URLs or citations used for the verification; use an empty list if there are none"#;

const LOOKUP_SCHEMA: &str = r#"Return a single JSON object with this shape:
{
  "name": "string",
  "handle": "string",
  "description": "string",
  "followers": 0,
  "mainCategory": "string",
  "claims": [
    {
      "claim": "string",
      "trustScore": 0,
      "analysis": "string",
      "sources": ["string"]
    }
  ]
}"#;

const DISCOVERY_SCHEMA: &str = r#"Return a single JSON object with exactly {count} entries in this shape:
{
  "influencers": [
    {
      "name": "string",
      "handle": "string",
      "description": "string",
      "followers": 0,
      "mainCategory": "string",
      "claims": [
        {
          "claim": "string",
          "trustScore": 0,
          "analysis": "string",
          "sources": ["string"]
        }
      ]
    }
  ]
}"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED_FIELDS: [&str; 9] = [
        "\"name\"",
        "\"handle\"",
        "\"description\"",
        "\"followers\"",
        "\"mainCategory\"",
        "\"claim\"",
        "\"trustScore\"",
        "\"analysis\"",
        "\"sources\"",
    ];

    fn sources() -> Vec<TrustedSource> {
        vec![
            TrustedSource {
                id: "pubmed".to_string(),
                name: "PubMed Central".to_string(),
            },
            TrustedSource {
                id: "cochrane".to_string(),
                name: "Cochrane Library".to_string(),
            },
        ]
    }

    fn known() -> Vec<KnownInfluencer> {
        vec![KnownInfluencer {
            name: "Dr. Health".to_string(),
            handle: "@drhealth".to_string(),
        }]
    }

    #[test]
    fn test_lookup_prompt_includes_query_and_limit() {
        let config = ResearchConfig {
            max_claims: 4,
            ..ResearchConfig::default()
        };
        let prompt = PromptBuilder::lookup("  Andrew Huberman ", &config).build();

        assert!(prompt.contains("\"Andrew Huberman\""));
        assert!(prompt.contains("up to 4 recent health claims"));
    }

    #[test]
    fn test_prompts_enumerate_required_fields() {
        let config = ResearchConfig::default();
        for prompt in [
            PromptBuilder::lookup("x", &config).build(),
            PromptBuilder::discovery(&config).build(),
        ] {
            for field in REQUIRED_FIELDS {
                assert!(prompt.contains(field), "missing {field}");
            }
        }
    }

    #[test]
    fn test_source_clause_only_when_configured() {
        let plain = PromptBuilder::lookup("x", &ResearchConfig::default()).build();
        assert!(!plain.contains("prioritize these sources"));

        let config = ResearchConfig::default().with_trusted_sources(sources());
        let prompt = PromptBuilder::lookup("x", &config).build();
        assert!(prompt.contains("prioritize these sources in order: PubMed Central, Cochrane Library."));
    }

    #[test]
    fn test_exclude_clause_only_in_discovery() {
        let config = ResearchConfig::default().with_exclude(known());

        let lookup = PromptBuilder::lookup("x", &config).build();
        assert!(!lookup.contains("already known"));

        let discovery = PromptBuilder::discovery(&config).build();
        assert!(discovery.contains("already known"));
        assert!(discovery.contains("- Dr. Health (@drhealth)"));
    }

    #[test]
    fn test_discovery_without_exclusions_omits_clause() {
        let prompt = PromptBuilder::discovery(&ResearchConfig::default()).build();
        assert!(!prompt.contains("already known"));
        assert!(prompt.contains("Find 3 rising"));
        assert!(prompt.contains("exactly 3 entries"));
        assert!(prompt.contains("\"influencers\""));
    }
}
