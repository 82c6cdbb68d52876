//! HTTP Basic credentials (`guid:secret`) resolved to a trusted user id.

use axum::{
	extract::FromRequestParts,
	http::{StatusCode, header, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use uuid::Uuid;

use crate::{
	routes::{ApiError, json_error},
	state::AppState,
};

/// The authenticated caller. Handlers taking this never see unauthenticated requests.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let Some((guid, secret)) = parse_basic(parts) else {
			return Err(unauthorized());
		};

		match state.service.authenticate(guid, &secret).await? {
			Some(user_id) => Ok(Self(user_id)),
			None => Err(unauthorized()),
		}
	}
}

fn parse_basic(parts: &Parts) -> Option<(Uuid, String)> {
	let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
	let encoded = value.strip_prefix("Basic ")?;
	let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
	let (guid, secret) = decoded.split_once(':')?;

	Some((Uuid::parse_str(guid).ok()?, secret.to_string()))
}

fn unauthorized() -> ApiError {
	json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or missing credentials.", None)
}
