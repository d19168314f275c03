use axum::{
	Json, Router,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};

use lore_engine::{AnswerRequest, AnswerResponse, Error, SearchRequest, SearchResponse};

use crate::state::AppState;

/// Tenant scoping header; every query route requires it.
pub const TENANT_HEADER: &str = "X-Lore-Tenant-Id";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/answer", post(answer))
		.with_state(state)
}

async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, serde::Deserialize)]
struct QueryBody {
	query: String,
	#[serde(default = "default_mode")]
	mode: String,
	k: Option<u32>,
	rerank: Option<bool>,
	rerank_topk: Option<u32>,
}

fn default_mode() -> String {
	"hybrid".to_string()
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<QueryBody>,
) -> Result<Json<SearchResponse>, ApiError> {
	let request = SearchRequest {
		tenant_id: tenant_id(&headers)?,
		query: payload.query,
		mode: payload.mode,
		k: payload.k,
		rerank: payload.rerank,
		rerank_topk: payload.rerank_topk,
	};
	let response = state.engine.search(request).await?;

	Ok(Json(response))
}

async fn answer(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<QueryBody>,
) -> Result<Json<AnswerResponse>, ApiError> {
	let request = AnswerRequest {
		tenant_id: tenant_id(&headers)?,
		query: payload.query,
		mode: payload.mode,
		k: payload.k,
		rerank: payload.rerank,
		rerank_topk: payload.rerank_topk,
	};
	let response = state.engine.answer(request).await?;

	Ok(Json(response))
}

fn tenant_id(headers: &HeaderMap) -> Result<String, ApiError> {
	let value = headers
		.get(TENANT_HEADER)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.unwrap_or_default();

	if value.is_empty() {
		return Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			"INVALID_PARAMETERS",
			format!("{TENANT_HEADER} header is required."),
		));
	}

	Ok(value.to_string())
}

#[derive(Debug, serde::Serialize)]
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
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS", message),
			Error::RetrievalUnavailable { message } =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, "RETRIEVAL_UNAVAILABLE", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
