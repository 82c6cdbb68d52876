use serde::{Deserialize, Serialize};

use crate::{Error, LecternService, Result};
use lectern_ledger::FeedbackEntry;
use lectern_storage::{
	catalog,
	models::Feedback,
	relations::{self, FeedbackRow},
	users,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackRequest {
	pub record_id: i64,
	pub relevance: bool,
	pub presentation: bool,
	pub methodology: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackView {
	pub record_id: i64,
	pub orcid: String,
	pub relevance: bool,
	pub presentation: bool,
	pub methodology: bool,
}
impl From<Feedback> for FeedbackView {
	fn from(row: Feedback) -> Self {
		Self {
			record_id: row.record_id,
			orcid: row.orcid,
			relevance: row.relevance,
			presentation: row.presentation,
			methodology: row.methodology,
		}
	}
}

impl LecternService {
	/// Stores an expert's rating of a record, then hands it to the ledger.
	///
	/// The local write is the only guarantee. Ledger failures are logged and never retried.
	/// A repeated rating of the same record keeps the first one and publishes nothing.
	pub async fn create_feedback(&self, user_id: i64, req: FeedbackRequest) -> Result<bool> {
		let orcid = users::read_orcid(&self.db.pool, user_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("User {user_id} not found.") })?
			.ok_or_else(|| Error::InvalidRequest {
				message: "Feedback requires an expert profile.".to_string(),
			})?;

		if !catalog::record_exists(&self.db.pool, req.record_id).await? {
			return Err(Error::NotFound { message: format!("Record {} not found.", req.record_id) });
		}

		let created = relations::insert_feedback(
			&self.db.pool,
			&FeedbackRow {
				user_id,
				record_id: req.record_id,
				orcid: &orcid,
				relevance: req.relevance,
				presentation: req.presentation,
				methodology: req.methodology,
			},
		)
		.await?;

		if created {
			self.publish_feedback(orcid, &req).await;
		}

		Ok(created)
	}

	pub async fn read_feedback(&self, record_id: i64) -> Result<Vec<FeedbackView>> {
		let rows = relations::list_feedback(&self.db.pool, record_id).await?;

		Ok(rows.into_iter().map(FeedbackView::from).collect())
	}

	async fn publish_feedback(&self, orcid: String, req: &FeedbackRequest) {
		if !self.cfg.ledger.enabled {
			tracing::debug!(record_id = req.record_id, "Ledger disabled. Feedback kept local.");

			return;
		}

		let bib_hash = match catalog::read_bib_hash(&self.db.pool, req.record_id).await {
			Ok(Some(Some(bib_hash))) => bib_hash,
			Ok(_) => {
				tracing::warn!(
					record_id = req.record_id,
					"Record has no bibliographic hash. Feedback not published."
				);

				return;
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					record_id = req.record_id,
					"Failed to read bibliographic hash. Feedback not published."
				);

				return;
			},
		};
		let entry = FeedbackEntry {
			orcid,
			bib_hash,
			relevance: req.relevance,
			presentation: req.presentation,
			methodology: req.methodology,
		};

		if let Err(err) = self.ledger.add_feedback(&self.cfg.ledger, &entry).await {
			tracing::warn!(
				error = %err,
				record_id = req.record_id,
				"Failed to publish feedback to ledger."
			);
		}
	}
}
