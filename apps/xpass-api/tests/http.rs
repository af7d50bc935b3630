use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};
use tower::util::ServiceExt;

use xpass_api::{
	routes::{self, VIEWER_HEADER},
	state::AppState,
};
use xpass_service::DiscoveryService;
use xpass_storage::GraphStore;
use xpass_testkit::{GraphFixture, ProfileSpec, Seeded};

struct Seeds {
	viewer: Seeded,
	ana: Seeded,
}

fn seeded_app() -> (Router, Seeds) {
	let now = OffsetDateTime::now_utc();
	let mut fixture = GraphFixture::new();
	let music = fixture.category("Music").expect("Seed.");
	let viewer = fixture
		.profile(ProfileSpec::named("Viewer").categories([music]).at(0.0, 0.0))
		.expect("Seed.");
	let ana = fixture
		.profile(
			ProfileSpec::named("Ana Musician")
				.nickname("ana.music")
				.categories([music])
				.at(0.01, 0.01)
				.views(1_500),
		)
		.expect("Seed.");
	let bruno = fixture.profile(ProfileSpec::named("Bruno")).expect("Seed.");

	fixture.follow(viewer, ana).expect("Follow.");
	fixture.follow(bruno, ana).expect("Follow.");
	fixture.view(ana, "10.0.0.1", Some(viewer), 3, now - Duration::hours(1)).expect("View.");

	let store: Arc<dyn GraphStore> = fixture.into_store();
	let service = DiscoveryService::new(xpass_testkit::test_config(), store);

	(routes::router(AppState::from_service(service)), Seeds { viewer, ana })
}

fn post_json(uri: &str, viewer: Option<Seeded>, payload: Value) -> Request<Body> {
	let mut builder =
		Request::builder().method("POST").uri(uri).header("content-type", "application/json");

	if let Some(viewer) = viewer {
		builder = builder.header(VIEWER_HEADER, viewer.profile_id.to_string());
	}

	builder.body(Body::from(payload.to_string())).expect("Failed to build request.")
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().method("GET").uri(uri).body(Body::empty()).expect("Failed to build request.")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Failed to parse response body.")
	};

	(status, json)
}

#[tokio::test]
async fn health_is_ok() {
	let (app, _) = seeded_app();
	let (status, _) = send(app, get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_returns_camel_case_profiles() {
	let (app, seeds) = seeded_app();
	let (status, json) =
		send(app, post_json("/v1/trends/search/0/10", None, json!({ "terms": ["musician"] }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json.as_array().map(Vec::len), Some(1));
	assert_eq!(json[0]["id"], seeds.ana.profile_id.to_string());
	assert_eq!(json[0]["card"]["viewsCount"], "1.5k");
	assert_eq!(json[0]["card"]["categories"][0]["name"], "Music");
}

#[tokio::test]
async fn non_numeric_page_is_bad_request() {
	let (app, _) = seeded_app();
	let (status, json) =
		send(app, post_json("/v1/trends/search/first/10", None, json!({ "terms": ["a"] }))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn home_categories_are_keyed_by_strategy() {
	let (app, seeds) = seeded_app();
	let payload = json!({ "coords": { "latitude": 0.0, "longitude": 0.0 } });
	let (status, json) =
		send(app, post_json("/v1/trends/home/categories", Some(seeds.viewer), payload)).await;
	let ana = seeds.ana.profile_id.to_string();

	assert_eq!(status, StatusCode::OK);

	for key in ["topWeek", "likeYou", "recent", "nearToYou"] {
		assert_eq!(json[key][0]["id"], ana, "Section {key} must surface Ana.");
	}

	assert_eq!(json["likeYourFollows"], json!([]));
}

#[tokio::test]
async fn anonymous_home_categories_degrade_to_empty_sections() {
	let (app, _) = seeded_app();
	let (status, json) = send(app, post_json("/v1/trends/home/categories", None, json!({}))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["likeYou"], json!([]));
	assert_eq!(json["recent"], json!([]));
	assert_eq!(json["nearToYou"], json!([]));
}

#[tokio::test]
async fn malformed_viewer_header_is_bad_request() {
	let (app, _) = seeded_app();
	let request = Request::builder()
		.method("POST")
		.uri("/v1/trends/home/categories")
		.header("content-type", "application/json")
		.header(VIEWER_HEADER, "not-a-uuid")
		.body(Body::from("{}"))
		.expect("Failed to build request.");
	let (status, json) = send(app, request).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn home_category_rejects_unknown_keys() {
	let (app, seeds) = seeded_app();
	let (status, json) = send(
		app.clone(),
		post_json("/v1/trends/home/category/popular/0/10", Some(seeds.viewer), json!({})),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");

	let (status, json) = send(
		app,
		post_json(
			"/v1/trends/home/category/likeYou/0/10",
			Some(seeds.viewer),
			json!({ "terms": ["ana"] }),
		),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json[0]["id"], seeds.ana.profile_id.to_string());
}

#[tokio::test]
async fn autocompletes_exclude_the_viewer() {
	let (app, seeds) = seeded_app();
	let (status, json) = send(
		app,
		post_json("/v1/trends/autocompletes", Some(seeds.viewer), json!({ "term": "v" })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, json!([]));
}

#[tokio::test]
async fn autocompletes_label_suggestion_types() {
	let (app, _) = seeded_app();
	let (status, json) =
		send(app, post_json("/v1/trends/autocompletes", None, json!({ "term": "mus" }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		json,
		json!([
			{ "label": "Ana Musician", "type": "userName" },
			{ "label": "Music", "type": "category" }
		])
	);
}

#[tokio::test]
async fn follow_routes_report_stats_and_summaries() {
	let (app, seeds) = seeded_app();
	let ana = seeds.ana.profile_id;
	let (status, json) = send(app.clone(), get(&format!("/v1/profiles/{ana}/follow-stats"))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, json!({ "followingCount": "0", "followersCount": "2" }));

	let (status, json) =
		send(app.clone(), get(&format!("/v1/profiles/{ana}/followers/0/10?term=bru"))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json.as_array().map(Vec::len), Some(1));
	assert_eq!(json[0]["name"], "Bruno");

	let missing = uuid::Uuid::new_v4();
	let (status, json) = send(app, get(&format!("/v1/profiles/{missing}/following/0/10"))).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "not_found");
}

#[tokio::test]
async fn nickname_route_returns_profile_with_follower_count() {
	let (app, seeds) = seeded_app();
	let (status, json) = send(app.clone(), get("/v1/nicknames/ana.music")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["id"], seeds.ana.profile_id.to_string());
	assert_eq!(json["followersCount"], "2");
	assert_eq!(json["card"]["viewsCount"], "1.5k");

	let (status, json) = send(app, get("/v1/nicknames/nobody")).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "not_found");
}

#[tokio::test]
async fn categories_route_lists_roots_with_children() {
	let (app, _) = seeded_app();
	let (status, json) = send(app, get("/v1/categories")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json.as_array().map(Vec::len), Some(1));
	assert_eq!(json[0]["name"], "Music");
	assert_eq!(json[0]["children"], json!([]));
	assert!(json[0]["id"].is_string());
}
