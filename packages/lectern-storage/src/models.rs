use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
	pub user_id: i64,
	pub guid: Uuid,
	pub secret_hash: String,
	pub orcid: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Subject {
	pub subject_id: i64,
	pub keyword: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct RecordType {
	pub record_type_id: i16,
	pub name: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Collection {
	pub collection_id: i64,
	pub title: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Feedback {
	pub record_id: i64,
	pub orcid: String,
	pub relevance: bool,
	pub presentation: bool,
	pub methodology: bool,
}

/// One record feed or search hit: the stored preview fragment plus the read-time `visited` flag.
#[derive(Debug, sqlx::FromRow)]
pub struct FeedFragment {
	pub item_id: i64,
	pub fragment: String,
	pub visited: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ExpertFeedFragment {
	pub item_id: i64,
	pub fragment: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RecordBookmarkFragment {
	pub record_id: i64,
	pub fragment: String,
	pub visited: bool,
	pub collection_ids: Vec<i64>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ExpertBookmarkFragment {
	pub expert_id: i64,
	pub fragment: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CreatorName {
	pub record_id: i64,
	pub position: i32,
	pub first_name: String,
	pub last_name: String,
}

/// A record attributed to an expert, as needed to render the expert's fragments.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ExpertRecord {
	pub record_id: i64,
	pub title: String,
	pub year: i32,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ExpertIdentity {
	pub expert_id: i64,
	pub first_name: String,
	pub last_name: String,
	pub orcid: Option<String>,
}
