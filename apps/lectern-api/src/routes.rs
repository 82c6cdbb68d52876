use axum::{
	Json, Router,
	extract::State,
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{auth::AuthUser, state::AppState};
use lectern_service::{
	CatalogBatch, CatalogReport, CollectionView, CreatedUser, Envelope, Error, FeedRequest,
	FeedbackRequest, FeedbackView, InterestChange, InterestsView, RebuildAllReport,
	RecordTypeView, ReindexReport, SearchRequest, SubjectView, UpdateBookmarkCollectionsRequest,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/user-profile/create", post(create_user))
		.route("/v1/user-profile/delete", post(delete_user))
		.route("/v1/expert-profile/create", post(create_expert_profile))
		.route("/v1/expert-profile/read", post(read_expert_profile))
		.route("/v1/expert-profile/delete", post(delete_expert_profile))
		.route("/v1/subjects/read", post(read_subjects))
		.route("/v1/record-types/read", post(read_record_types))
		.route("/v1/interest/create", post(create_interest))
		.route("/v1/interest/delete", post(delete_interest))
		.route("/v1/interests/read", post(read_interests))
		.route("/v1/record-feed/read", post(read_record_feed))
		.route("/v1/record-feed/search", post(search_record_feed))
		.route("/v1/record-feed/count", post(read_record_feed_count))
		.route("/v1/record-details/read", post(read_record_details))
		.route("/v1/expert-feed/read", post(read_expert_feed))
		.route("/v1/expert-feed/search", post(search_expert_feed))
		.route("/v1/expert-details/read", post(read_expert_details))
		.route("/v1/feedback-feed/read", post(read_feedback_feed))
		.route("/v1/record-bookmark/create", post(create_record_bookmark))
		.route("/v1/record-bookmark/delete", post(delete_record_bookmark))
		.route("/v1/record-bookmark/collections/update", post(update_record_bookmark_collections))
		.route("/v1/record-bookmarks/read", post(read_record_bookmarks))
		.route("/v1/expert-bookmark/create", post(create_expert_bookmark))
		.route("/v1/expert-bookmark/delete", post(delete_expert_bookmark))
		.route("/v1/expert-bookmarks/read", post(read_expert_bookmarks))
		.route("/v1/collection/create", post(create_collection))
		.route("/v1/collection/update", post(update_collection))
		.route("/v1/collection/delete", post(delete_collection))
		.route("/v1/collections/read", post(read_collections))
		.route("/v1/feedback/create", post(create_feedback))
		.route("/v1/feedback/read", post(read_feedback))
		.route("/v1/record-dislike/create", post(create_record_dislike))
		.with_state(state)
}

/// Catalog maintenance. Bound to a loopback address only.
pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/catalog", post(ingest_catalog))
		.route("/v1/admin/reindex", post(reindex))
		.route("/v1/admin/feeds/rebuild", post(rebuild_all_feeds))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SecretBody {
	pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct OrcidBody {
	pub orcid: String,
}

#[derive(Debug, Serialize)]
pub struct ExpertProfileBody {
	pub orcid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectRef {
	pub subject_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordRef {
	pub record_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExpertRef {
	pub expert_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRef {
	pub collection_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CollectionTitle {
	pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRename {
	pub collection_id: i64,
	pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CollectionCreated {
	pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct SubjectsBody {
	pub subjects: Vec<SubjectView>,
}

#[derive(Debug, Serialize)]
pub struct RecordTypesBody {
	pub record_types: Vec<RecordTypeView>,
}

#[derive(Debug, Serialize)]
pub struct CollectionsBody {
	pub collections: Vec<CollectionView>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackListBody {
	pub feedback: Vec<FeedbackView>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackCreated {
	pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordCountBody {
	pub record_count: i64,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_user(
	State(state): State<AppState>,
	Json(payload): Json<SecretBody>,
) -> Result<Json<CreatedUser>, ApiError> {
	Ok(Json(state.service.create_user(&payload.secret).await?))
}

async fn delete_user(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
	state.service.delete_user(user_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn create_expert_profile(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<OrcidBody>,
) -> Result<StatusCode, ApiError> {
	state.service.create_expert_profile(user_id, &payload.orcid).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn read_expert_profile(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Json<ExpertProfileBody>, ApiError> {
	let orcid = state.service.read_expert_profile(user_id).await?;

	Ok(Json(ExpertProfileBody { orcid }))
}

async fn delete_expert_profile(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
	state.service.delete_expert_profile(user_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn read_subjects(
	State(state): State<AppState>,
	AuthUser(_): AuthUser,
) -> Result<Json<SubjectsBody>, ApiError> {
	Ok(Json(SubjectsBody { subjects: state.service.read_subjects().await? }))
}

async fn read_record_types(
	State(state): State<AppState>,
	AuthUser(_): AuthUser,
) -> Result<Json<RecordTypesBody>, ApiError> {
	Ok(Json(RecordTypesBody { record_types: state.service.read_record_types().await? }))
}

async fn create_interest(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<SubjectRef>,
) -> Result<Json<InterestChange>, ApiError> {
	Ok(Json(state.service.create_interest(user_id, payload.subject_id).await?))
}

async fn delete_interest(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<SubjectRef>,
) -> Result<Json<InterestChange>, ApiError> {
	Ok(Json(state.service.delete_interest(user_id, payload.subject_id).await?))
}

async fn read_interests(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Json<InterestsView>, ApiError> {
	Ok(Json(state.service.read_interests(user_id).await?))
}

async fn read_record_feed(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<FeedRequest>,
) -> Result<Response, ApiError> {
	Ok(envelope(state.service.read_record_feed(user_id, payload).await?))
}

async fn search_record_feed(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<SearchRequest>,
) -> Result<Response, ApiError> {
	Ok(envelope(state.service.search_record_feed(user_id, payload).await?))
}

async fn read_record_feed_count(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Json<RecordCountBody>, ApiError> {
	let record_count = state.service.read_record_feed_count(user_id).await?;

	Ok(Json(RecordCountBody { record_count }))
}

async fn read_record_details(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<RecordRef>,
) -> Result<Response, ApiError> {
	Ok(raw_json(state.service.read_record_details(user_id, payload.record_id).await?))
}

async fn read_expert_feed(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<FeedRequest>,
) -> Result<Response, ApiError> {
	Ok(envelope(state.service.read_expert_feed(user_id, payload).await?))
}

async fn search_expert_feed(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<SearchRequest>,
) -> Result<Response, ApiError> {
	Ok(envelope(state.service.search_expert_feed(user_id, payload).await?))
}

async fn read_expert_details(
	State(state): State<AppState>,
	AuthUser(_): AuthUser,
	Json(payload): Json<ExpertRef>,
) -> Result<Response, ApiError> {
	Ok(raw_json(state.service.read_expert_details(payload.expert_id).await?))
}

async fn read_feedback_feed(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<FeedRequest>,
) -> Result<Response, ApiError> {
	Ok(envelope(state.service.read_feedback_feed(user_id, payload).await?))
}

async fn create_record_bookmark(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<RecordRef>,
) -> Result<StatusCode, ApiError> {
	state.service.create_record_bookmark(user_id, payload.record_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn delete_record_bookmark(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<RecordRef>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_record_bookmark(user_id, payload.record_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn update_record_bookmark_collections(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<UpdateBookmarkCollectionsRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.update_record_bookmark_collections(user_id, payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn read_record_bookmarks(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Response, ApiError> {
	Ok(raw_json(state.service.read_record_bookmarks(user_id).await?))
}

async fn create_expert_bookmark(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<ExpertRef>,
) -> Result<StatusCode, ApiError> {
	state.service.create_expert_bookmark(user_id, payload.expert_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn delete_expert_bookmark(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<ExpertRef>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_expert_bookmark(user_id, payload.expert_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn read_expert_bookmarks(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Response, ApiError> {
	Ok(raw_json(state.service.read_expert_bookmarks(user_id).await?))
}

async fn create_collection(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<CollectionTitle>,
) -> Result<Json<CollectionCreated>, ApiError> {
	let id = state.service.create_collection(user_id, &payload.title).await?;

	Ok(Json(CollectionCreated { id }))
}

async fn update_collection(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<CollectionRename>,
) -> Result<StatusCode, ApiError> {
	state.service.update_collection(user_id, payload.collection_id, &payload.title).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn delete_collection(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<CollectionRef>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_collection(user_id, payload.collection_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn read_collections(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
) -> Result<Json<CollectionsBody>, ApiError> {
	Ok(Json(CollectionsBody { collections: state.service.read_collections(user_id).await? }))
}

async fn create_feedback(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<FeedbackRequest>,
) -> Result<Json<FeedbackCreated>, ApiError> {
	let created = state.service.create_feedback(user_id, payload).await?;

	Ok(Json(FeedbackCreated { created }))
}

async fn read_feedback(
	State(state): State<AppState>,
	AuthUser(_): AuthUser,
	Json(payload): Json<RecordRef>,
) -> Result<Json<FeedbackListBody>, ApiError> {
	Ok(Json(FeedbackListBody { feedback: state.service.read_feedback(payload.record_id).await? }))
}

async fn create_record_dislike(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Json(payload): Json<RecordRef>,
) -> Result<StatusCode, ApiError> {
	state.service.create_record_dislike(user_id, payload.record_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn ingest_catalog(
	State(state): State<AppState>,
	Json(payload): Json<CatalogBatch>,
) -> Result<Json<CatalogReport>, ApiError> {
	Ok(Json(state.service.ingest_catalog(payload).await?))
}

async fn reindex(State(state): State<AppState>) -> Result<Json<ReindexReport>, ApiError> {
	Ok(Json(state.service.reindex().await?))
}

async fn rebuild_all_feeds(
	State(state): State<AppState>,
) -> Result<Json<RebuildAllReport>, ApiError> {
	Ok(Json(state.service.rebuild_all_feeds().await?))
}

/// Assembled bodies are already JSON text and go out without re-encoding.
fn raw_json(body: String) -> Response {
	([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn envelope(envelope: Envelope) -> Response {
	raw_json(envelope.body)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			Error::Fragment { message } => {
				tracing::error!(error = %message, "Stored fragment is malformed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage request failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
