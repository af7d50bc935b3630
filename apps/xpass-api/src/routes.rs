use axum::{
	Json, Router,
	extract::{FromRequestParts, Path, Query, State},
	http::{StatusCode, request::Parts},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use xpass_domain::{geo::Coordinates, suggest::Suggestion};
use xpass_service::{
	CategoryBranch, Error, FollowStats, FollowSummary, HomeCategories, ProfileDetail, ProfileView,
	StrategyRequest,
};

use crate::state::AppState;

/// Set by the upstream authentication layer for signed-in viewers.
pub const VIEWER_HEADER: &str = "x-viewer-id";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/trends/search/{page}/{limit}", post(search))
		.route("/v1/trends/home/categories", post(home_categories))
		.route("/v1/trends/autocompletes", post(autocompletes))
		.route("/v1/trends/home/category/{category}/{page}/{limit}", post(home_category))
		.route("/v1/profiles/{id}/follow-stats", get(follow_stats))
		.route("/v1/profiles/{id}/following/{page}/{limit}", get(following))
		.route("/v1/profiles/{id}/followers/{page}/{limit}", get(followers))
		.route("/v1/nicknames/{nickname}", get(profile_by_nickname))
		.route("/v1/categories", get(categories))
		.with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
	#[serde(default)]
	terms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomeBody {
	coords: Option<Coordinates>,
	client_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteBody {
	#[serde(default)]
	term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryBody {
	#[serde(default)]
	terms: Vec<String>,
	coords: Option<Coordinates>,
	client_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TermQuery {
	term: Option<String>,
}

/// Viewer identity from [`VIEWER_HEADER`]. Absent means anonymous; malformed is rejected.
pub struct Viewer(pub Option<Uuid>);

impl<S> FromRequestParts<S> for Viewer
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let Some(raw) = parts.headers.get(VIEWER_HEADER) else {
			return Ok(Self(None));
		};
		let viewer_id = raw
			.to_str()
			.ok()
			.and_then(|value| Uuid::parse_str(value.trim()).ok())
			.ok_or_else(|| invalid_request(format!("{VIEWER_HEADER} must be a UUID.")))?;

		Ok(Self(Some(viewer_id)))
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Path((page, limit)): Path<(String, String)>,
	Json(body): Json<SearchBody>,
) -> Result<Json<Vec<ProfileView>>, ApiError> {
	let (page, limit) = (parse_number("page", &page)?, parse_number("limit", &limit)?);
	let views = state.service.search(&body.terms, page, limit).await?;

	Ok(Json(views))
}

async fn home_categories(
	State(state): State<AppState>,
	Viewer(viewer_id): Viewer,
	Json(body): Json<HomeBody>,
) -> Json<HomeCategories> {
	Json(state.service.home_categories(viewer_id, body.coords, body.client_address).await)
}

async fn autocompletes(
	State(state): State<AppState>,
	Viewer(viewer_id): Viewer,
	Json(body): Json<AutocompleteBody>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
	let suggestions = state.service.autocompletes(viewer_id, &body.term).await?;

	Ok(Json(suggestions))
}

async fn home_category(
	State(state): State<AppState>,
	Viewer(viewer_id): Viewer,
	Path((category, page, limit)): Path<(String, String, String)>,
	Json(body): Json<CategoryBody>,
) -> Result<Json<Vec<ProfileView>>, ApiError> {
	let request = StrategyRequest {
		terms: body.terms,
		viewer_id,
		coords: body.coords,
		client_address: body.client_address,
		page: parse_number("page", &page)?,
		limit: parse_number("limit", &limit)?,
	};
	let views = state.service.home_category(&category, &request).await?;

	Ok(Json(views))
}

async fn follow_stats(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<FollowStats>, ApiError> {
	let stats = state.service.follow_stats(parse_id(&id)?).await?;

	Ok(Json(stats))
}

async fn following(
	State(state): State<AppState>,
	Path((id, page, limit)): Path<(String, String, String)>,
	Query(query): Query<TermQuery>,
) -> Result<Json<Vec<FollowSummary>>, ApiError> {
	let summaries = state
		.service
		.following_cards(
			parse_id(&id)?,
			query.term.as_deref(),
			parse_number("page", &page)?,
			parse_number("limit", &limit)?,
		)
		.await?;

	Ok(Json(summaries))
}

async fn followers(
	State(state): State<AppState>,
	Path((id, page, limit)): Path<(String, String, String)>,
	Query(query): Query<TermQuery>,
) -> Result<Json<Vec<FollowSummary>>, ApiError> {
	let summaries = state
		.service
		.followers_cards(
			parse_id(&id)?,
			query.term.as_deref(),
			parse_number("page", &page)?,
			parse_number("limit", &limit)?,
		)
		.await?;

	Ok(Json(summaries))
}

async fn profile_by_nickname(
	State(state): State<AppState>,
	Path(nickname): Path<String>,
) -> Result<Json<ProfileDetail>, ApiError> {
	let detail = state.service.profile_by_nickname(&nickname).await?;

	Ok(Json(detail))
}

async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryBranch>>, ApiError> {
	let tree = state.service.category_tree().await?;

	Ok(Json(tree))
}

fn parse_number(name: &str, raw: &str) -> Result<u32, ApiError> {
	raw.parse()
		.map_err(|_| invalid_request(format!("{name} must be a non-negative integer.")))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
	Uuid::parse_str(raw).map_err(|_| invalid_request("Profile id must be a UUID."))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => invalid_request(message),
			Error::NotFound { message } => ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure while serving a request.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "Storage error.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

fn invalid_request(message: impl Into<String>) -> ApiError {
	ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message)
}
