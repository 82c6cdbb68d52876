use crate::{Error, LecternService, Result};
use lectern_storage::{catalog, relations};

impl LecternService {
	/// Returns the stored detail fragment and marks the record visited for this user.
	///
	/// Unknown records fail before any visit is recorded.
	pub async fn read_record_details(&self, user_id: i64, record_id: i64) -> Result<String> {
		let fragment = catalog::read_record_detail_fragment(&self.db.pool, record_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Record {record_id} not found.") })?;

		if relations::insert_visit(&self.db.pool, user_id, record_id).await? {
			tracing::debug!(user_id, record_id, "Record visited for the first time.");
		}

		Ok(fragment)
	}

	pub async fn read_expert_details(&self, expert_id: i64) -> Result<String> {
		catalog::read_expert_detail_fragment(&self.db.pool, expert_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Expert {expert_id} not found.") })
	}
}
