//! Interest mutations and the feed rebuild they trigger.

use serde::{Deserialize, Serialize};

use crate::{Error, LecternService, Result, SubjectView};
use lectern_storage::{
	catalog,
	feeds::{self, RebuildCounts},
	relations,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterestChange {
	pub subject_id: i64,
	/// False when the interest already existed (create) or was already absent (delete).
	pub changed: bool,
	pub record_count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterestsView {
	pub subjects: Vec<SubjectView>,
	pub record_count: i64,
}

#[derive(Clone, Copy)]
enum InterestOp {
	Create,
	Delete,
}

impl LecternService {
	pub async fn create_interest(&self, user_id: i64, subject_id: i64) -> Result<InterestChange> {
		self.change_interest(user_id, subject_id, InterestOp::Create).await
	}

	pub async fn delete_interest(&self, user_id: i64, subject_id: i64) -> Result<InterestChange> {
		self.change_interest(user_id, subject_id, InterestOp::Delete).await
	}

	pub async fn read_interests(&self, user_id: i64) -> Result<InterestsView> {
		let subjects = relations::list_interests(&self.db.pool, user_id).await?;
		let record_count = feeds::count_record_feed(&self.db.pool, user_id).await?;

		Ok(InterestsView {
			subjects: subjects.into_iter().map(SubjectView::from).collect(),
			record_count,
		})
	}

	/// Recomputes both feeds of one user from scratch in its own transaction.
	pub async fn rebuild_feeds(&self, user_id: i64) -> Result<RebuildCounts> {
		let mut tx = self.db.pool.begin().await?;
		let counts = feeds::rebuild_feeds(&mut tx, user_id).await?;

		tx.commit().await?;

		tracing::info!(
			user_id,
			records = counts.records,
			experts = counts.experts,
			"Feeds rebuilt."
		);

		Ok(counts)
	}

	async fn change_interest(
		&self,
		user_id: i64,
		subject_id: i64,
		op: InterestOp,
	) -> Result<InterestChange> {
		let mut tx = self.db.pool.begin().await?;

		if !catalog::subject_exists(&mut *tx, subject_id).await? {
			return Err(Error::NotFound { message: format!("Subject {subject_id} not found.") });
		}

		let changed = match op {
			InterestOp::Create => relations::insert_interest(&mut tx, user_id, subject_id).await?,
			InterestOp::Delete => relations::delete_interest(&mut tx, user_id, subject_id).await?,
		};
		let counts = feeds::rebuild_feeds(&mut tx, user_id).await?;
		let record_count = feeds::count_record_feed(&mut *tx, user_id).await?;

		tx.commit().await?;

		tracing::info!(
			user_id,
			subject_id,
			changed,
			records = counts.records,
			experts = counts.experts,
			"Feeds rebuilt after interest change."
		);

		Ok(InterestChange { subject_id, changed, record_count })
	}
}
