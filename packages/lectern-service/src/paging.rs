//! Input checks shared by every paginated read and search.

use crate::{Error, Result};

/// Rejects negative windows and limits above the configured page size.
pub fn check_window(offset: i64, limit: i64, max_limit: i64) -> Result<()> {
	if offset < 0 {
		return Err(Error::InvalidRequest {
			message: format!("offset must be zero or greater, got {offset}."),
		});
	}
	if limit < 0 {
		return Err(Error::InvalidRequest {
			message: format!("limit must be zero or greater, got {limit}."),
		});
	}
	if limit > max_limit {
		return Err(Error::InvalidRequest {
			message: format!("limit must be at most {max_limit}, got {limit}."),
		});
	}

	Ok(())
}

/// Turns a raw search term into a single quoted phrase for the text-match engine.
///
/// Surrounding quotes are stripped and interior quotes become spaces, so the caller can neither
/// leave the phrase nor inject query operators.
pub fn phrase_query(raw: &str, min_chars: usize) -> Result<String> {
	let inner = raw.trim().trim_matches('"').replace('"', " ");
	let inner = inner.trim();

	if inner.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Search term must contain more than quotes and whitespace.".to_string(),
		});
	}
	if inner.chars().count() < min_chars {
		return Err(Error::InvalidRequest {
			message: format!("Search term must be at least {min_chars} characters."),
		});
	}

	Ok(format!("\"{inner}\""))
}
