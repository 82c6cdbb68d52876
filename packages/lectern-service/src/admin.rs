//! Administrative maintenance: search reindexing and bulk feed rebuilds.

use serde::{Deserialize, Serialize};

use crate::{LecternService, Result};
use lectern_storage::{feeds, relations, search_index};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReindexReport {
	pub records: u64,
	pub experts: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebuildAllReport {
	pub users: usize,
	pub records: u64,
	pub experts: u64,
}

impl LecternService {
	/// Regenerates both search indexes from the current catalog in one transaction.
	pub async fn reindex(&self) -> Result<ReindexReport> {
		let mut tx = self.db.pool.begin().await?;
		let records = search_index::rebuild_record_search(&mut tx).await?;
		let experts = search_index::rebuild_expert_search(&mut tx).await?;

		tx.commit().await?;

		tracing::info!(records, experts, "Search indexes rebuilt.");

		Ok(ReindexReport { records, experts })
	}

	/// Rebuilds the feeds of every user holding at least one interest.
	///
	/// Each user is rebuilt in a separate transaction; a failure stops the run and leaves earlier
	/// users rebuilt.
	pub async fn rebuild_all_feeds(&self) -> Result<RebuildAllReport> {
		let user_ids = relations::list_users_with_interests(&self.db.pool).await?;
		let mut report = RebuildAllReport { users: 0, records: 0, experts: 0 };

		for user_id in user_ids {
			let mut tx = self.db.pool.begin().await?;
			let counts = feeds::rebuild_feeds(&mut tx, user_id).await?;

			tx.commit().await?;

			report.users += 1;
			report.records += counts.records;
			report.experts += counts.experts;
		}

		tracing::info!(
			users = report.users,
			records = report.records,
			experts = report.experts,
			"All feeds rebuilt."
		);

		Ok(report)
	}
}
