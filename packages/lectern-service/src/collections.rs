use serde::{Deserialize, Serialize};

use crate::{Error, LecternService, Result};
use lectern_storage::{models::Collection, relations};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionView {
	pub id: i64,
	pub name: String,
}
impl From<Collection> for CollectionView {
	fn from(collection: Collection) -> Self {
		Self { id: collection.collection_id, name: collection.title }
	}
}

impl LecternService {
	pub async fn create_collection(&self, user_id: i64, title: &str) -> Result<i64> {
		let title = collection_title(title)?;
		let collection_id = relations::insert_collection(&self.db.pool, user_id, title).await?;

		Ok(collection_id)
	}

	pub async fn read_collections(&self, user_id: i64) -> Result<Vec<CollectionView>> {
		let rows = relations::list_collections(&self.db.pool, user_id).await?;

		Ok(rows.into_iter().map(CollectionView::from).collect())
	}

	pub async fn update_collection(
		&self,
		user_id: i64,
		collection_id: i64,
		title: &str,
	) -> Result<()> {
		let title = collection_title(title)?;

		if !relations::update_collection(&self.db.pool, user_id, collection_id, title).await? {
			return Err(Error::NotFound {
				message: format!("Collection {collection_id} not found."),
			});
		}

		Ok(())
	}

	/// Removes the collection and its bookmark links. The bookmarks stay.
	pub async fn delete_collection(&self, user_id: i64, collection_id: i64) -> Result<()> {
		if !relations::delete_collection(&self.db.pool, user_id, collection_id).await? {
			return Err(Error::NotFound {
				message: format!("Collection {collection_id} not found."),
			});
		}

		Ok(())
	}
}

fn collection_title(raw: &str) -> Result<&str> {
	let title = raw.trim();

	if title.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Collection title must be non-empty.".to_string(),
		});
	}

	Ok(title)
}
