//! Feed & search reads over the materialized feeds.
//!
//! Reads are not wrapped in one snapshot. A bookmark or visit landing between the window query
//! and the response is tolerated for a single user's session.

use serde::{Deserialize, Serialize};

use crate::{
	Envelope, LecternService, Result,
	assembler::{self, EXPERTS_KEY, RECORDS_KEY, Visited},
	paging,
};
use lectern_storage::{
	feeds::{self, RecordExclusion, Window},
	models::FeedFragment,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedRequest {
	pub offset: i64,
	pub limit: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub term: String,
	pub offset: i64,
	pub limit: i64,
}

impl LecternService {
	/// Cached records minus bookmarks, in materialized order, each tagged with `visited`.
	pub async fn read_record_feed(&self, user_id: i64, req: FeedRequest) -> Result<Envelope> {
		self.record_page(user_id, RecordExclusion::Bookmarked, None, req.offset, req.limit).await
	}

	/// Cached records the user has not rated yet. Bookmarked records stay in this feed.
	pub async fn read_feedback_feed(&self, user_id: i64, req: FeedRequest) -> Result<Envelope> {
		self.record_page(user_id, RecordExclusion::Rated, None, req.offset, req.limit).await
	}

	pub async fn read_expert_feed(&self, user_id: i64, req: FeedRequest) -> Result<Envelope> {
		self.expert_page(user_id, None, req.offset, req.limit).await
	}

	pub async fn search_record_feed(&self, user_id: i64, req: SearchRequest) -> Result<Envelope> {
		let phrase = paging::phrase_query(&req.term, self.cfg.feed.min_search_term_chars)?;

		self.record_page(user_id, RecordExclusion::Bookmarked, Some(&phrase), req.offset, req.limit)
			.await
	}

	pub async fn search_expert_feed(&self, user_id: i64, req: SearchRequest) -> Result<Envelope> {
		let phrase = paging::phrase_query(&req.term, self.cfg.feed.min_search_term_chars)?;

		self.expert_page(user_id, Some(&phrase), req.offset, req.limit).await
	}

	/// Number of cached records not currently bookmarked.
	pub async fn read_record_feed_count(&self, user_id: i64) -> Result<i64> {
		Ok(feeds::count_record_feed(&self.db.pool, user_id).await?)
	}

	async fn record_page(
		&self,
		user_id: i64,
		exclusion: RecordExclusion,
		phrase: Option<&str>,
		offset: i64,
		limit: i64,
	) -> Result<Envelope> {
		paging::check_window(offset, limit, self.cfg.feed.max_page_limit)?;

		if limit == 0 {
			return Ok(assembler::page_envelope(RECORDS_KEY, offset, limit, Vec::<String>::new()));
		}

		let rows = feeds::read_record_window(
			&self.db.pool,
			exclusion,
			Window { user_id, phrase, offset, limit },
		)
		.await?;
		let items = decorate(&rows)?;

		tracing::debug!(user_id, offset, limit, count = items.len(), "Record window read.");

		Ok(assembler::page_envelope(RECORDS_KEY, offset, limit, items))
	}

	async fn expert_page(
		&self,
		user_id: i64,
		phrase: Option<&str>,
		offset: i64,
		limit: i64,
	) -> Result<Envelope> {
		paging::check_window(offset, limit, self.cfg.feed.max_page_limit)?;

		if limit == 0 {
			return Ok(assembler::page_envelope(EXPERTS_KEY, offset, limit, Vec::<String>::new()));
		}

		let rows =
			feeds::read_expert_window(&self.db.pool, Window { user_id, phrase, offset, limit })
				.await?;

		tracing::debug!(user_id, offset, limit, count = rows.len(), "Expert window read.");

		Ok(assembler::page_envelope(EXPERTS_KEY, offset, limit, rows.iter().map(|row| &row.fragment)))
	}
}

fn decorate(rows: &[FeedFragment]) -> Result<Vec<String>> {
	rows.iter()
		.map(|row| assembler::splice(&row.fragment, &Visited { visited: row.visited }))
		.collect()
}
