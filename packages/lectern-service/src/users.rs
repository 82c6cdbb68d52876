//! Identity seam: users, secrets, and expert profiles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, LecternService, Result};
use lectern_ledger::codec;
use lectern_storage::users;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedUser {
	pub user_id: i64,
	pub guid: Uuid,
}

impl LecternService {
	pub async fn create_user(&self, secret: &str) -> Result<CreatedUser> {
		let min_chars = self.cfg.security.min_secret_chars;

		if secret.chars().count() < min_chars {
			return Err(Error::InvalidRequest {
				message: format!("Secret must be at least {min_chars} characters."),
			});
		}

		let guid = Uuid::new_v4();
		let user_id = users::insert_user(&self.db.pool, guid, &secret_digest(guid, secret)).await?;

		tracing::info!(user_id, "User created.");

		Ok(CreatedUser { user_id, guid })
	}

	/// Resolves credentials to a user id. Unknown GUIDs and wrong secrets both yield `None`.
	pub async fn authenticate(&self, guid: Uuid, secret: &str) -> Result<Option<i64>> {
		let Some(user) = users::find_user_by_guid(&self.db.pool, guid).await? else {
			return Ok(None);
		};
		let stored = match blake3::Hash::from_hex(user.secret_hash.as_str()) {
			Ok(hash) => hash,
			Err(err) => {
				tracing::warn!(user_id = user.user_id, error = %err, "Stored secret hash is malformed.");

				return Ok(None);
			},
		};

		// `blake3::Hash` equality is constant-time.
		if stored == secret_hash(guid, secret) { Ok(Some(user.user_id)) } else { Ok(None) }
	}

	/// Deletes the user and all per-user state in one transaction. Published ledger entries remain.
	pub async fn delete_user(&self, user_id: i64) -> Result<()> {
		let mut tx = self.db.pool.begin().await?;

		if !users::delete_user(&mut tx, user_id).await? {
			return Err(Error::NotFound { message: format!("User {user_id} not found.") });
		}

		tx.commit().await?;

		tracing::info!(user_id, "User deleted.");

		Ok(())
	}

	pub async fn create_expert_profile(&self, user_id: i64, orcid: &str) -> Result<()> {
		let orcid = orcid.trim();

		if !codec::is_valid_orcid(orcid) {
			return Err(Error::InvalidRequest {
				message: "ORCiD must follow the 0000-0000-0000-000X form.".to_string(),
			});
		}
		if !users::set_orcid(&self.db.pool, user_id, Some(orcid)).await? {
			return Err(Error::NotFound { message: format!("User {user_id} not found.") });
		}

		Ok(())
	}

	pub async fn read_expert_profile(&self, user_id: i64) -> Result<Option<String>> {
		users::read_orcid(&self.db.pool, user_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("User {user_id} not found.") })
	}

	pub async fn delete_expert_profile(&self, user_id: i64) -> Result<()> {
		if !users::set_orcid(&self.db.pool, user_id, None).await? {
			return Err(Error::NotFound { message: format!("User {user_id} not found.") });
		}

		Ok(())
	}
}

fn secret_hash(guid: Uuid, secret: &str) -> blake3::Hash {
	let mut hasher = blake3::Hasher::new();

	hasher.update(guid.as_bytes());
	hasher.update(secret.as_bytes());

	hasher.finalize()
}

fn secret_digest(guid: Uuid, secret: &str) -> String {
	secret_hash(guid, secret).to_hex().to_string()
}
