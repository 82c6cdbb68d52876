mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Feed, Ledger, Postgres, Security, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let admin_addr: SocketAddr = cfg.service.admin_bind.parse().map_err(|_| Error::Validation {
		message: "service.admin_bind must be a socket address.".to_string(),
	})?;

	if !admin_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.admin_bind must be a loopback address.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.max_page_limit <= 0 {
		return Err(Error::Validation {
			message: "feed.max_page_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.min_search_term_chars == 0 {
		return Err(Error::Validation {
			message: "feed.min_search_term_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.ledger.enabled {
		if cfg.ledger.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "ledger.api_base must be non-empty when the ledger is enabled."
					.to_string(),
			});
		}
		if cfg.ledger.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "ledger.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	for (key, value) in &cfg.ledger.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("ledger.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.security.min_secret_chars < 8 {
		return Err(Error::Validation {
			message: "security.min_secret_chars must be at least 8.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.ledger.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.ledger.api_key = None;
	}

	let trimmed = cfg.ledger.api_base.trim_end_matches('/').len();

	cfg.ledger.api_base.truncate(trimmed);
}
