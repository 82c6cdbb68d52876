pub mod admin;
pub mod assembler;
pub mod bookmarks;
pub mod catalog;
pub mod collections;
pub mod details;
pub mod dislikes;
pub mod feed;
pub mod feedback;
pub mod fragment;
pub mod interests;
pub mod paging;
pub mod users;

mod error;

pub use admin::{RebuildAllReport, ReindexReport};
pub use assembler::Envelope;
pub use bookmarks::UpdateBookmarkCollectionsRequest;
pub use catalog::{
	CatalogBatch, CatalogReport, CreatorInput, ExpertInput, RecordInput, RecordTypeView,
	SubjectInput, SubjectView,
};
pub use collections::CollectionView;
pub use error::{Error, Result};
pub use feed::{FeedRequest, SearchRequest};
pub use feedback::{FeedbackRequest, FeedbackView};
pub use interests::{InterestChange, InterestsView};
pub use users::CreatedUser;

use std::{future::Future, pin::Pin, sync::Arc};

use lectern_config::Config;
use lectern_ledger::FeedbackEntry;
use lectern_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Downstream consumer of committed feedback.
pub trait FeedbackLedger
where
	Self: Send + Sync,
{
	fn add_feedback<'a>(
		&'a self,
		cfg: &'a lectern_config::Ledger,
		entry: &'a FeedbackEntry,
	) -> BoxFuture<'a, lectern_ledger::Result<()>>;
}

pub struct LecternService {
	pub cfg: Config,
	pub db: Db,
	pub ledger: Arc<dyn FeedbackLedger>,
}
impl LecternService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, ledger: Arc::new(HttpLedger) }
	}

	pub fn with_ledger(cfg: Config, db: Db, ledger: Arc<dyn FeedbackLedger>) -> Self {
		Self { cfg, db, ledger }
	}
}

struct HttpLedger;

impl FeedbackLedger for HttpLedger {
	fn add_feedback<'a>(
		&'a self,
		cfg: &'a lectern_config::Ledger,
		entry: &'a FeedbackEntry,
	) -> BoxFuture<'a, lectern_ledger::Result<()>> {
		Box::pin(lectern_ledger::publish(cfg, entry))
	}
}
