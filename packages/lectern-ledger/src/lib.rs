//! Client for the external feedback ledger.
//!
//! Each entry binds an expert's ORCiD to a publication's bibliographic hash together with three
//! binary quality flags. Publishing is a single attempt; callers decide what a failure means.

pub mod codec;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackEntry {
	pub orcid: String,
	pub bib_hash: String,
	pub relevance: bool,
	pub presentation: bool,
	pub methodology: bool,
}

#[derive(Debug, Serialize)]
struct FeedbackPayload {
	orcid: String,
	bib_hash: String,
	relevance: u8,
	presentation: u8,
	methodology: u8,
}

pub async fn publish(cfg: &lectern_config::Ledger, entry: &FeedbackEntry) -> Result<()> {
	if !cfg.enabled {
		return Err(Error::InvalidConfig { message: "Ledger is disabled.".to_string() });
	}

	let payload = encode_payload(entry)?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.post(url)
		.headers(auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&payload)
		.send()
		.await?;

	res.error_for_status()?;

	tracing::debug!(orcid = %entry.orcid, bib_hash = %entry.bib_hash, "Feedback published to ledger.");

	Ok(())
}

pub fn auth_headers(api_key: Option<&str>, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn encode_payload(entry: &FeedbackEntry) -> Result<FeedbackPayload> {
	let orcid = codec::orcid_to_bytes(&entry.orcid)?;
	let bib_hash = codec::bib_hash_to_bytes(&entry.bib_hash)?;

	Ok(FeedbackPayload {
		orcid: hex::encode(orcid),
		bib_hash: hex::encode(bib_hash),
		relevance: u8::from(entry.relevance),
		presentation: u8::from(entry.presentation),
		methodology: u8::from(entry.methodology),
	})
}
