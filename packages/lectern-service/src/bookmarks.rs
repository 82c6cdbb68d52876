use serde::{Deserialize, Serialize};

use crate::{
	Error, LecternService, Result,
	assembler::{self, BOOKMARKS_KEY, BookmarkState},
};
use lectern_storage::{catalog, feeds, relations};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateBookmarkCollectionsRequest {
	pub record_id: i64,
	pub collection_ids: Vec<i64>,
}

impl LecternService {
	/// Idempotent. The record leaves the record feed view while bookmarked.
	pub async fn create_record_bookmark(&self, user_id: i64, record_id: i64) -> Result<()> {
		if !catalog::record_exists(&self.db.pool, record_id).await? {
			return Err(Error::NotFound { message: format!("Record {record_id} not found.") });
		}

		relations::insert_record_bookmark(&self.db.pool, user_id, record_id).await?;

		Ok(())
	}

	/// Idempotent. Collection links of the bookmark are removed with it.
	pub async fn delete_record_bookmark(&self, user_id: i64, record_id: i64) -> Result<()> {
		relations::delete_record_bookmark(&self.db.pool, user_id, record_id).await?;

		Ok(())
	}

	pub async fn create_expert_bookmark(&self, user_id: i64, expert_id: i64) -> Result<()> {
		if !catalog::expert_exists(&self.db.pool, expert_id).await? {
			return Err(Error::NotFound { message: format!("Expert {expert_id} not found.") });
		}

		relations::insert_expert_bookmark(&self.db.pool, user_id, expert_id).await?;

		Ok(())
	}

	pub async fn delete_expert_bookmark(&self, user_id: i64, expert_id: i64) -> Result<()> {
		relations::delete_expert_bookmark(&self.db.pool, user_id, expert_id).await?;

		Ok(())
	}

	/// Replaces every collection link of the record's bookmark, bookmarking it if needed.
	///
	/// All requested collections must belong to the caller. Otherwise nothing changes and the
	/// call fails with `NotFound` naming the foreign or missing ids.
	pub async fn update_record_bookmark_collections(
		&self,
		user_id: i64,
		req: UpdateBookmarkCollectionsRequest,
	) -> Result<()> {
		let mut requested = req.collection_ids;

		requested.sort_unstable();
		requested.dedup();

		let mut tx = self.db.pool.begin().await?;

		if !catalog::record_exists(&mut *tx, req.record_id).await? {
			return Err(Error::NotFound { message: format!("Record {} not found.", req.record_id) });
		}

		let owned = relations::owned_collection_ids(&mut tx, user_id, &requested).await?;

		if owned.len() != requested.len() {
			let missing =
				requested.iter().filter(|id| !owned.contains(id)).copied().collect::<Vec<_>>();

			return Err(Error::NotFound { message: format!("Collections {missing:?} not found.") });
		}

		relations::insert_record_bookmark(&mut *tx, user_id, req.record_id).await?;
		relations::replace_bookmark_collections(&mut tx, user_id, req.record_id, &requested)
			.await?;

		tx.commit().await?;

		tracing::debug!(
			user_id,
			record_id = req.record_id,
			collections = requested.len(),
			"Bookmark collections replaced."
		);

		Ok(())
	}

	/// `{"bookmarks":[...]}`, newest first, each with `visited` and `collection_ids`.
	pub async fn read_record_bookmarks(&self, user_id: i64) -> Result<String> {
		let rows = feeds::read_record_bookmarks(&self.db.pool, user_id).await?;
		let items = rows
			.iter()
			.map(|row| {
				assembler::splice(
					&row.fragment,
					&BookmarkState { visited: row.visited, collection_ids: &row.collection_ids },
				)
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(assembler::list_envelope(BOOKMARKS_KEY, items))
	}

	pub async fn read_expert_bookmarks(&self, user_id: i64) -> Result<String> {
		let rows = feeds::read_expert_bookmarks(&self.db.pool, user_id).await?;

		Ok(assembler::list_envelope(BOOKMARKS_KEY, rows.iter().map(|row| &row.fragment)))
	}
}
