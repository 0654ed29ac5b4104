//! Integration tests for the request orchestrator
//!
//! Both providers are stubbed and count their calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use moodtunes::cache::CacheConfig;
use moodtunes::collaborators::{KeywordExtractor, RecommendationLookup, RetryPolicy};
use moodtunes::error::{CollaboratorError, FailureKind};
use moodtunes::models::Track;
use moodtunes::rate_limit::RateLimitConfig;
use moodtunes::seed::SeedSpec;
use moodtunes::{Orchestrator, OrchestratorConfig, Outcome, ServiceState};

// == Stub Collaborators ==

/// Returns queued answers in order, repeating the last one.
struct ScriptedExtractor {
    answers: Mutex<Vec<Result<Vec<String>, CollaboratorError>>>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    fn new(answers: Vec<Result<Vec<String>, CollaboratorError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers),
            calls: AtomicUsize::new(0),
        })
    }

    fn always(keywords: &[&str]) -> Arc<Self> {
        Self::new(vec![Ok(keywords.iter().map(|k| k.to_string()).collect())])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordExtractor for ScriptedExtractor {
    async fn extract(&self, _message: &str) -> Result<Vec<String>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut answers = self.answers.lock().unwrap();
        if answers.len() > 1 {
            answers.remove(0)
        } else {
            answers[0].clone()
        }
    }
}

struct StubLookup {
    result: Result<Vec<Track>, CollaboratorError>,
    calls: AtomicUsize,
    seeds: Mutex<Vec<SeedSpec>>,
}

impl StubLookup {
    fn new(result: Result<Vec<Track>, CollaboratorError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            seeds: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationLookup for StubLookup {
    async fn lookup(&self, seed: &SeedSpec) -> Result<Vec<Track>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seeds.lock().unwrap().push(seed.clone());
        self.result.clone()
    }
}

// == Helper Functions ==

fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| {
            Track::new(
                format!("Track {}", i),
                "Artist",
                "Album",
                format!("https://open.spotify.com/track/{}", i),
                60,
                180_000,
            )
        })
        .collect()
}

fn rate_limit(max_requests: usize) -> RateLimitConfig {
    RateLimitConfig {
        max_requests,
        window: Duration::from_secs(60),
        burst_limit: 0,
        burst_window: Duration::from_secs(10),
    }
}

fn build(
    extractor: Arc<ScriptedExtractor>,
    lookup: Arc<StubLookup>,
    limits: RateLimitConfig,
    fallback_extraction: bool,
) -> Orchestrator {
    let state = ServiceState::new(limits, &CacheConfig::default(), &CacheConfig::default());
    let config = OrchestratorConfig {
        retry: RetryPolicy::immediate(3, Duration::from_secs(1)),
        fallback_extraction,
        serialize_per_user: true,
    };
    Orchestrator::new(extractor, lookup, state, config)
}

// == Success Path ==

#[tokio::test]
async fn test_end_to_end_recommendation() {
    let extractor = ScriptedExtractor::always(&["energetic", "rock", "workout"]);
    let lookup = StubLookup::new(Ok(tracks(5)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(15), false);

    let outcome = orch
        .handle_message(1, "I'm feeling energetic and want rock for my workout")
        .await;

    match outcome {
        Outcome::Success { tracks, keywords } => {
            assert_eq!(tracks.len(), 5);
            assert_eq!(keywords, vec!["energetic", "rock", "workout"]);
        }
        other => panic!("expected success, got {:?}", other),
    }

    let seeds = lookup.seeds.lock().unwrap();
    assert_eq!(seeds[0].genres, vec!["dance", "rock"]);
    assert_eq!(seeds[0].energy.map(|e| e.target), Some(0.8));
    assert_eq!(orch.get_stats(1).total_requests, 1);
}

#[tokio::test]
async fn test_reordered_keywords_hit_lookup_cache() {
    let extractor = ScriptedExtractor::new(vec![
        Ok(vec!["rock".into(), "energetic".into()]),
        Ok(vec!["Energetic".into(), " rock ".into()]),
    ]);
    let lookup = StubLookup::new(Ok(tracks(3)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(15), false);

    let first = orch.handle_message(1, "rock, energetic").await;
    let second = orch.handle_message(2, "something energetic with rock").await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(extractor.calls(), 2);
    assert_eq!(lookup.calls(), 1);

    let stats = orch.get_cache_stats().await;
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_repeated_message_hits_extraction_cache() {
    let extractor = ScriptedExtractor::always(&["jazz"]);
    let lookup = StubLookup::new(Ok(tracks(2)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(15), false);

    orch.handle_message(1, "some jazz please").await;
    orch.handle_message(1, "  some jazz please ").await;

    assert_eq!(extractor.calls(), 1);
    assert_eq!(lookup.calls(), 1);
    assert_eq!(orch.extraction_cache_stats().await.hits, 1);
}

// == Rate Limiting ==

#[tokio::test]
async fn test_rate_limited_before_any_provider_call() {
    let extractor = ScriptedExtractor::always(&["pop"]);
    let lookup = StubLookup::new(Ok(tracks(1)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(2), false);

    assert!(orch.handle_message(1, "pop one").await.is_success());
    assert!(orch.handle_message(1, "pop two").await.is_success());
    let third = orch.handle_message(1, "pop three").await;

    assert_eq!(
        third,
        Outcome::RateLimited {
            retry_after_secs: 60
        }
    );
    assert_eq!(extractor.calls(), 2);

    // Other users are unaffected
    assert!(orch.handle_message(2, "pop four").await.is_success());

    let stats = orch.get_stats(1);
    assert!(stats.is_limited);
    assert_eq!(stats.remaining, 0);
    assert_eq!(stats.total_requests, 2);
}

#[tokio::test]
async fn test_concurrent_requests_respect_limit() {
    let extractor = ScriptedExtractor::always(&["rock"]);
    let lookup = StubLookup::new(Ok(tracks(1)));
    let orch = Arc::new(build(extractor, lookup, rate_limit(5), false));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.handle_message(7, &format!("rock {}", i)).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if !matches!(handle.await.unwrap(), Outcome::RateLimited { .. }) {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(orch.metrics().rate_limited, 15);
}

// == Empty Results ==

#[tokio::test]
async fn test_no_keywords() {
    let extractor = ScriptedExtractor::always(&[]);
    let lookup = StubLookup::new(Ok(tracks(5)));
    let orch = build(extractor, lookup.clone(), rate_limit(15), false);

    assert_eq!(orch.handle_message(1, "hmm").await, Outcome::NoKeywords);
    assert_eq!(lookup.calls(), 0);
    assert_eq!(orch.get_stats(1).total_requests, 0);
    assert_eq!(orch.get_stats(1).requests_in_window, 1);
}

#[tokio::test]
async fn test_no_results_is_not_cached() {
    let extractor = ScriptedExtractor::always(&["folk"]);
    let lookup = StubLookup::new(Ok(Vec::new()));
    let orch = build(extractor, lookup.clone(), rate_limit(15), false);

    assert_eq!(orch.handle_message(1, "folk").await, Outcome::NoResults);
    assert_eq!(orch.handle_message(1, "folk again").await, Outcome::NoResults);
    assert_eq!(lookup.calls(), 2);
    assert_eq!(orch.get_cache_stats().await.entries, 0);
}

#[tokio::test]
async fn test_not_found_maps_to_no_results() {
    let extractor = ScriptedExtractor::always(&["indie"]);
    let lookup = StubLookup::new(Err(CollaboratorError::NotFound));
    let orch = build(extractor, lookup.clone(), rate_limit(15), false);

    assert_eq!(orch.handle_message(1, "indie").await, Outcome::NoResults);
    assert_eq!(lookup.calls(), 1);
    assert!(orch.recent_errors().is_empty());
}

// == Failures ==

#[tokio::test]
async fn test_unauthorized_lookup_is_not_retried() {
    let extractor = ScriptedExtractor::always(&["metal"]);
    let lookup = StubLookup::new(Err(CollaboratorError::Unauthorized));
    let orch = build(extractor, lookup.clone(), rate_limit(15), false);

    assert_eq!(
        orch.handle_message(1, "metal").await,
        Outcome::Failed {
            kind: FailureKind::Authentication
        }
    );
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_unavailable_lookup_is_retried_then_fails() {
    let extractor = ScriptedExtractor::always(&["blues"]);
    let lookup = StubLookup::new(Err(CollaboratorError::ServiceError(503)));
    let orch = build(extractor, lookup.clone(), rate_limit(15), false);

    assert_eq!(
        orch.handle_message(1, "blues").await,
        Outcome::Failed {
            kind: FailureKind::Connectivity
        }
    );
    assert_eq!(lookup.calls(), 3);

    let errors = orch.recent_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, "lookup");
    assert_eq!(errors[0].kind, FailureKind::Connectivity);
    assert_eq!(orch.get_stats(1).total_requests, 0);
}

#[tokio::test]
async fn test_transient_extraction_failure_recovers() {
    let extractor = ScriptedExtractor::new(vec![
        Err(CollaboratorError::Timeout),
        Ok(vec!["soul".into()]),
    ]);
    let lookup = StubLookup::new(Ok(tracks(2)));
    let orch = build(extractor.clone(), lookup, rate_limit(15), false);

    assert!(orch.handle_message(1, "soul music").await.is_success());
    assert_eq!(extractor.calls(), 2);
    assert!(orch.recent_errors().is_empty());
}

#[tokio::test]
async fn test_malformed_extraction_without_fallback() {
    let extractor = ScriptedExtractor::new(vec![Err(CollaboratorError::MalformedResponse(
        "no choices".into(),
    ))]);
    let lookup = StubLookup::new(Ok(tracks(2)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(15), false);

    assert_eq!(
        orch.handle_message(1, "happy rock").await,
        Outcome::Failed {
            kind: FailureKind::Unknown
        }
    );
    assert_eq!(extractor.calls(), 1);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_fallback_keywords_when_extractor_down() {
    let extractor = ScriptedExtractor::new(vec![Err(CollaboratorError::Connectivity(
        "refused".into(),
    ))]);
    let lookup = StubLookup::new(Ok(tracks(4)));
    let orch = build(extractor.clone(), lookup.clone(), rate_limit(15), true);

    let outcome = orch
        .handle_message(1, "I'm feeling energetic and want rock for my workout")
        .await;

    match outcome {
        Outcome::Success { tracks, keywords } => {
            assert_eq!(tracks.len(), 4);
            assert_eq!(keywords, vec!["energetic", "rock", "workout"]);
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(extractor.calls(), 3);
    // Heuristic keywords are not cached
    assert_eq!(orch.extraction_cache_stats().await.entries, 0);
    assert_eq!(orch.metrics().collaborator_errors, 1);
}

#[tokio::test]
async fn test_metrics_track_outcomes() {
    let extractor = ScriptedExtractor::new(vec![Ok(vec!["rock".into()]), Ok(Vec::new())]);
    let lookup = StubLookup::new(Ok(tracks(1)));
    let orch = build(extractor, lookup, rate_limit(15), false);

    orch.handle_message(1, "rock").await;
    orch.handle_message(1, "nothing").await;

    let metrics = orch.metrics();
    assert_eq!(metrics.messages, 2);
    assert_eq!(metrics.successes, 1);
    assert_eq!(metrics.no_keywords, 1);
}
