//! AI-path failure handling: every failure falls back to the heuristic
//! path and produces exactly what the heuristic path alone would.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use tether::{
    AiClassifier, AiConfig, ApiKeyStore, Classifier, ClassifierChain, ClassifyError, Contact,
    HeuristicClassifier, ParseRequest, ParsedCommand, Result,
};

/// 2024-01-10 is a Wednesday.
fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn catalog() -> Vec<Contact> {
    vec![
        Contact::with_id("c1", "Sarah Johnson").with_company("Acme Corp"),
        Contact::with_id("c2", "Mike Chen"),
    ]
}

/// Stands in for an AI classifier whose transport is down.
struct BrokenTransport;

#[async_trait]
impl Classifier for BrokenTransport {
    fn name(&self) -> &'static str {
        "broken-transport"
    }

    async fn classify(&self, _request: &ParseRequest<'_>) -> Result<ParsedCommand> {
        Err(ClassifyError::Api {
            status: 503,
            message: "upstream timeout".to_string(),
        }
        .into())
    }
}

async fn heuristic_only(text: &str, scope: Option<&str>) -> ParsedCommand {
    let catalog = catalog();
    let request = ParseRequest {
        text,
        catalog: &catalog,
        scope_id: scope,
    };
    HeuristicClassifier::with_reference(reference())
        .classify(&request)
        .await
        .unwrap()
}

async fn chained(primary: Arc<dyn Classifier>, text: &str, scope: Option<&str>) -> ParsedCommand {
    let catalog = catalog();
    let request = ParseRequest {
        text,
        catalog: &catalog,
        scope_id: scope,
    };
    ClassifierChain::new()
        .push(primary)
        .push(Arc::new(HeuristicClassifier::with_reference(reference())))
        .classify(&request)
        .await
        .unwrap()
}

#[tokio::test]
async fn transport_failure_reproduces_the_heuristic_classification() {
    for text in [
        "Follow up with Sarah next Tuesday",
        "Meeting with Sarah tomorrow at 10am",
        "Georgetown trip March 20-22",
        "Email Mike about partnership",
    ] {
        let fallback = chained(Arc::new(BrokenTransport), text, Some("work")).await;
        let direct = heuristic_only(text, Some("work")).await;
        assert_eq!(fallback, direct, "fallback diverged for {text:?}");
    }
}

#[tokio::test]
async fn missing_credential_falls_back_without_any_network_call() {
    // An AI classifier with an empty key store fails before touching the
    // transport; the chain degrades to the heuristic path transparently.
    let ai = AiClassifier::new(AiConfig::default(), Arc::new(ApiKeyStore::in_memory())).unwrap();

    let fallback = chained(Arc::new(ai), "Follow up with Sarah next Tuesday", Some("work")).await;
    let direct = heuristic_only("Follow up with Sarah next Tuesday", Some("work")).await;

    assert_eq!(fallback, direct);
}
