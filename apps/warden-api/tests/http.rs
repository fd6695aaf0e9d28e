use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use warden_api::{routes, state::AppState};
use warden_domain::Candidate;
use warden_service::{NO_CONTEXT_ANSWER, Providers, WardenService};
use warden_testkit::{
	InMemoryDocuments, SpyGeneration, StaticEmbedding, StaticOracle, StaticSearch, document,
	test_config,
};

fn test_state(grants: &[&str]) -> AppState {
	let docs = Arc::new(InMemoryDocuments::new(vec![
		document(
			"d1",
			"titan_marketing",
			"Project Titan marketing emphasizes the user-friendly interface.",
		),
		document("d2", "titan_spec", "Project Titan has a budget of $2.5 million."),
	]));
	let search = Arc::new(StaticSearch::new(vec![
		Candidate { doc_id: "d1".to_string(), score: 0.9 },
		Candidate { doc_id: "d2".to_string(), score: 0.8 },
	]));
	let providers = Providers::new(
		Arc::new(StaticOracle::new(grants)),
		Arc::new(StaticEmbedding),
		Arc::new(SpyGeneration::new("Project Titan is a marketing initiative.")),
	);
	let service = WardenService::with_collaborators(test_config(), search, docs, providers);

	AppState { service: Arc::new(service) }
}

async fn post_query(state: AppState, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/query")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /v1/query.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let app = routes::router(test_state(&[]));
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn query_returns_the_grounded_outcome() {
	let payload = serde_json::json!({
		"query": "What is Project Titan?",
		"subject": "pm_kate"
	});
	let (status, json) =
		post_query(test_state(&["doc:titan_marketing", "doc:titan_spec"]), payload).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["subject"], "pm_kate");
	assert_eq!(json["authorized_count"], 2);
	assert_eq!(json["sources"][0]["source"], "titan_marketing");
	assert_eq!(json["sources"][1]["source"], "titan_spec");
	assert_eq!(json["answer"], "Project Titan is a marketing initiative.");
}

#[tokio::test]
async fn ungranted_subject_receives_the_refusal() {
	let payload = serde_json::json!({
		"query": "What is Project Titan?",
		"subject": "stranger"
	});
	let (status, json) = post_query(test_state(&[]), payload).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["authorized_count"], 0);
	assert_eq!(json["answer"], NO_CONTEXT_ANSWER);
}

#[tokio::test]
async fn blank_subject_is_rejected() {
	let payload = serde_json::json!({
		"query": "What is Project Titan?",
		"subject": ""
	});
	let (status, json) = post_query(test_state(&["doc:titan_marketing"]), payload).await;

	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(json["error_code"], "invalid_request");
}
