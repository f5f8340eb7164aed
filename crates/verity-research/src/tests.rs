//! Integration tests for the Researcher

#[cfg(test)]
mod tests {
    use crate::{KnownInfluencer, ResearchConfig, ResearchError, Researcher, TrustedSource};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};
    use std::time::Duration;
    use verity_domain::ResearchProvider;
    use verity_llm::{LlmError, MockProvider};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    fn claim(text: &str, score: Value) -> Value {
        json!({
            "claim": text,
            "trustScore": score,
            "analysis": "Reviewed against published trials",
            "sources": ["https://pubmed.ncbi.nlm.nih.gov/1"]
        })
    }

    fn influencer(name: &str, handle: &str, claims: Vec<Value>) -> Value {
        json!({
            "name": name,
            "handle": handle,
            "description": "Health educator",
            "followers": 250000,
            "mainCategory": "Nutrition",
            "claims": claims
        })
    }

    fn researcher(provider: MockProvider) -> Researcher<MockProvider> {
        Researcher::new(provider, ResearchConfig::default())
            .unwrap()
            .with_clock(fixed_now)
    }

    #[tokio::test]
    async fn test_full_research_flow() {
        let answer = r#"I found the following information about this influencer:

{
  "name": "Dr. Health",
  "handle": "@drhealth",
  "description": "Physician sharing evidence-based advice",
  "followers": 1.2 million,
  "mainCategory": "Medicine",
  "claims": [
    {"claim": "Vitamin D supports immunity", "trustScore": 85, "analysis": "Meta-analyses agree", "sources": ["https://a.example"]},
    {"claim": "Detox teas cleanse the liver", "trustScore": 12, "analysis": "No evidence", "sources": []},
  ]
}

Let me know if you would like more detail."#;

        let researcher = researcher(MockProvider::new(answer));
        let report = researcher.find_influencer("Dr. Health").await.unwrap();

        assert_eq!(report.influencer.name, "Dr. Health");
        assert_eq!(report.influencer.followers, 1_200_000);
        assert_eq!(report.influencer.last_updated, fixed_now());
        assert_eq!(report.claims.len(), 2);
        assert_eq!(report.influencer.stats.verified, 1);
        assert_eq!(report.influencer.stats.debunked, 1);
        assert!(report.claims.iter().all(|c| c.date == fixed_now()));
        assert!(report.rejected_claims.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_claim_dropped_not_counted() {
        let payload = influencer(
            "Dr. Health",
            "@drhealth",
            vec![
                claim("Sleep improves recovery", json!(90)),
                claim("Fasting cures cancer", json!(150)),
                claim("Cold showers burn fat", json!(40)),
            ],
        );
        let researcher = researcher(MockProvider::new(payload.to_string()));
        let report = researcher.find_influencer("Dr. Health").await.unwrap();

        assert_eq!(report.claims.len(), 2);
        assert_eq!(report.influencer.stats.total() as usize, report.claims.len());
        assert_eq!(report.rejected_claims.len(), 1);
        assert_eq!(report.rejected_claims[0].index, 1);
        assert_eq!(report.rejected_claims[0].error.field, "trustScore");
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_call() {
        let provider = MockProvider::new("{}");
        let researcher = researcher(provider.clone());

        for query in ["", "   \n\t"] {
            let result = researcher.find_influencer(query).await;
            assert!(matches!(result, Err(ResearchError::InvalidInput(_))));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_status_propagates() {
        let researcher = researcher(MockProvider::failing(500, "upstream exploded"));

        match researcher.find_influencer("Dr. Health").await {
            Err(ResearchError::Provider { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("Expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_handle_aborts_lookup() {
        let mut payload = influencer("Dr. Health", "@drhealth", vec![claim("x", json!(80))]);
        payload.as_object_mut().unwrap().remove("handle");

        let researcher = researcher(MockProvider::new(payload.to_string()));
        match researcher.find_influencer("Dr. Health").await {
            Err(ResearchError::Validation(err)) => {
                assert_eq!(err.entity, "influencer");
                assert_eq!(err.field, "handle");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_claims_not_an_array_aborts_lookup() {
        let mut payload = influencer("Dr. Health", "@drhealth", vec![]);
        payload["claims"] = json!("none found");

        let researcher = researcher(MockProvider::new(payload.to_string()));
        let result = researcher.find_influencer("Dr. Health").await;
        assert!(matches!(result, Err(ResearchError::Validation(ref e)) if e.field == "claims"));
    }

    #[tokio::test]
    async fn test_prose_only_is_extraction_error() {
        let researcher = researcher(MockProvider::new("I'm sorry, I couldn't find that person."));
        let result = researcher.find_influencer("Nobody").await;
        assert!(matches!(result, Err(ResearchError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_broken_json_is_parse_error() {
        let researcher = researcher(MockProvider::new(r#"{"name": "Dr. Health", "handle": }"#));
        let result = researcher.find_influencer("Dr. Health").await;
        assert!(matches!(result, Err(ResearchError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_claims_capped_at_max() {
        let claims = (0..5).map(|i| claim(&format!("claim {i}"), json!(80))).collect();
        let payload = influencer("Dr. Health", "@drhealth", claims);
        let config = ResearchConfig {
            max_claims: 3,
            ..ResearchConfig::default()
        };

        let researcher = Researcher::new(MockProvider::new(payload.to_string()), config).unwrap();
        let report = researcher.find_influencer("Dr. Health").await.unwrap();
        assert_eq!(report.claims.len(), 3);
        assert_eq!(report.claims[2].statement, "claim 2");
        assert_eq!(report.influencer.stats.verified, 3);
        assert_eq!(report.truncated_claims, 2);
        assert!(report.rejected_claims.is_empty());
        assert_eq!(report.claims_attempted(), 5);
    }

    #[tokio::test]
    async fn test_claims_within_max_are_not_truncated() {
        let claims = (0..3).map(|i| claim(&format!("claim {i}"), json!(80))).collect();
        let payload = influencer("Dr. Health", "@drhealth", claims);
        let config = ResearchConfig {
            max_claims: 3,
            ..ResearchConfig::default()
        };

        let researcher = Researcher::new(MockProvider::new(payload.to_string()), config).unwrap();
        let report = researcher.find_influencer("Dr. Health").await.unwrap();
        assert_eq!(report.claims.len(), 3);
        assert_eq!(report.truncated_claims, 0);
    }

    #[tokio::test]
    async fn test_lookup_prompt_carries_query_and_sources() {
        let provider = MockProvider::new(influencer("A", "@a", vec![]).to_string());
        let config = ResearchConfig::default().with_trusted_sources(vec![TrustedSource {
            id: "pubmed".to_string(),
            name: "PubMed Central".to_string(),
        }]);
        let researcher = Researcher::new(provider.clone(), config).unwrap();

        researcher.find_influencer("Andrew Huberman").await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Andrew Huberman"));
        assert!(prompts[0].contains("PubMed Central"));
    }

    #[tokio::test]
    async fn test_discovery_isolates_bad_claims() {
        let payload = json!({
            "influencers": [
                influencer("A", "@a", vec![claim("a1", json!(90)), claim("a2", json!(20))]),
                influencer("B", "@b", vec![claim("b1", json!(150)), claim("b2", json!(75))]),
                influencer("C", "@c", vec![]),
            ]
        });
        let provider = MockProvider::new(format!("Here are three: {payload}"));
        let researcher = researcher(provider.clone());

        let discovery = researcher.discover_influencers().await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(discovery.reports.len(), 3);
        assert!(discovery.rejected.is_empty());

        let b = &discovery.reports[1];
        assert_eq!(b.influencer.handle, "@b");
        assert_eq!(b.claims.len(), 1);
        assert_eq!(b.claims[0].statement, "b2");
        assert_eq!(b.influencer.stats.verified, 1);
        assert_eq!(b.influencer.stats.debunked, 0);
        assert_eq!(b.rejected_claims.len(), 1);

        assert_eq!(discovery.reports[2].influencer.stats.total(), 0);
    }

    #[tokio::test]
    async fn test_discovery_drops_bad_influencer_only() {
        let mut bad = influencer("B", "@b", vec![]);
        bad["followers"] = json!("lots");
        let payload = json!([
            influencer("A", "@a", vec![]),
            bad,
            influencer("C", "@c", vec![claim("c1", json!(70))]),
        ]);

        let researcher = researcher(MockProvider::new(payload.to_string()));
        let discovery = researcher.discover_influencers().await.unwrap();

        let handles: Vec<_> = discovery.reports.iter().map(|r| r.influencer.handle.as_str()).collect();
        assert_eq!(handles, vec!["@a", "@c"]);
        assert_eq!(discovery.rejected.len(), 1);
        assert_eq!(discovery.rejected[0].index, 1);
        assert_eq!(discovery.rejected[0].error.field, "followers");
    }

    #[tokio::test]
    async fn test_discovery_wrong_shape_aborts() {
        let researcher = researcher(MockProvider::new(r#"{"results": []}"#));
        let result = researcher.discover_influencers().await;
        assert!(matches!(result, Err(ResearchError::Validation(ref e)) if e.field == "influencers"));
    }

    #[tokio::test]
    async fn test_discovery_prompt_excludes_known() {
        let provider = MockProvider::new("[]");
        let config = ResearchConfig::default().with_exclude(vec![KnownInfluencer {
            name: "Dr. Health".to_string(),
            handle: "@drhealth".to_string(),
        }]);
        let researcher = Researcher::new(provider.clone(), config).unwrap();

        let discovery = researcher.discover_influencers().await.unwrap();
        assert!(discovery.reports.is_empty());
        assert!(provider.prompts()[0].contains("@drhealth"));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = ResearchConfig {
            max_claims: 0,
            ..ResearchConfig::default()
        };
        let result = Researcher::new(MockProvider::default(), config);
        assert!(matches!(result, Err(ResearchError::InvalidInput(_))));
    }

    struct SlowProvider;

    impl ResearchProvider for SlowProvider {
        type Error = LlmError;

        async fn complete(&self, _prompt: &str) -> Result<String, Self::Error> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok("{}".to_string())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_provider_call_is_time_bounded() {
        let config = ResearchConfig {
            research_timeout_secs: 1,
            ..ResearchConfig::default()
        };
        let researcher = Researcher::new(SlowProvider, config).unwrap();

        let result = researcher.find_influencer("Dr. Health").await;
        assert!(matches!(result, Err(ResearchError::Transport(_))));
    }
}
