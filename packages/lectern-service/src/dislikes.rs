use crate::{Error, LecternService, Result};
use lectern_storage::{catalog, relations};

impl LecternService {
	/// Marks a record as disliked and drops it from the cached record feed in one transaction.
	///
	/// The marker is permanent: there is no operation that removes a dislike. Bookmarks,
	/// feedback, and the search projection are not touched.
	pub async fn create_record_dislike(&self, user_id: i64, record_id: i64) -> Result<()> {
		let mut tx = self.db.pool.begin().await?;

		if !catalog::record_exists(&mut *tx, record_id).await? {
			return Err(Error::NotFound { message: format!("Record {record_id} not found.") });
		}

		let created = relations::insert_record_dislike(&mut tx, user_id, record_id).await?;

		tx.commit().await?;

		tracing::debug!(user_id, record_id, created, "Record disliked.");

		Ok(())
	}
}
