//! Response envelopes built from stored fragments without decoding them.
//!
//! Fragments hold only immutable item data. Read-time fields (`visited`, `collection_ids`) are
//! serialized on their own and spliced in front of the fragment's closing brace.

use serde::Serialize;

use crate::{Error, Result};

pub const RECORDS_KEY: &str = "records";
pub const EXPERTS_KEY: &str = "experts";
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Keys only the assembler may write. A stored fragment carrying one of them is stale.
const DERIVED_KEYS: [&str; 2] = ["\"visited\":", "\"collection_ids\":"];

/// A paginated response: echoed window plus the assembled JSON body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
	pub offset: i64,
	pub limit: i64,
	pub body: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Visited {
	pub(crate) visited: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookmarkState<'a> {
	pub(crate) visited: bool,
	pub(crate) collection_ids: &'a [i64],
}

/// `{"offset":O,"limit":L,"<key>":[item,item,...]}`
pub fn page_envelope<I, S>(key: &str, offset: i64, limit: i64, items: I) -> Envelope
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut body = format!(r#"{{"offset":{offset},"limit":{limit},"{key}":["#);

	push_items(&mut body, items);
	body.push_str("]}");

	Envelope { offset, limit, body }
}

/// `{"<key>":[item,item,...]}`
pub fn list_envelope<I, S>(key: &str, items: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut body = format!(r#"{{"{key}":["#);

	push_items(&mut body, items);
	body.push_str("]}");

	body
}

/// Appends the serialized fields of `derived` to the stored object `fragment`.
///
/// Fails when the fragment is not a `{...}` object or already carries a derived key.
pub fn splice<T>(fragment: &str, derived: &T) -> Result<String>
where
	T: Serialize,
{
	let trimmed = fragment.trim();
	let body = trimmed.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')).ok_or_else(
		|| Error::Fragment { message: "Stored fragment is not a JSON object.".to_string() },
	)?;

	if let Some(key) = DERIVED_KEYS.iter().find(|key| body.contains(*key)) {
		return Err(Error::Fragment {
			message: format!("Stored fragment already carries derived key {key}."),
		});
	}

	let derived = serde_json::to_string(derived)?;
	let fields = derived.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')).ok_or_else(
		|| Error::Fragment { message: "Derived fields must serialize to an object.".to_string() },
	)?;
	let mut out = String::with_capacity(body.len() + fields.len() + 3);

	out.push('{');
	out.push_str(body);

	if !body.trim().is_empty() && !fields.is_empty() {
		out.push(',');
	}

	out.push_str(fields);
	out.push('}');

	Ok(out)
}

fn push_items<I, S>(body: &mut String, items: I)
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut delimiter = "";

	for item in items {
		body.push_str(delimiter);
		body.push_str(item.as_ref());

		delimiter = ",";
	}
}
