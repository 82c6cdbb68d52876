use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub feed: Feed,
	pub ledger: Ledger,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
	/// Upper bound for the `limit` of every paginated feed, search, and bookmark read.
	pub max_page_limit: i64,
	/// Minimum number of characters a search term must keep after quote stripping.
	#[serde(default = "default_min_search_term_chars")]
	pub min_search_term_chars: usize,
}

/// Downstream feedback ledger. Publication is best-effort and never retried.
#[derive(Debug, Deserialize)]
pub struct Ledger {
	pub enabled: bool,
	#[serde(default)]
	pub api_base: String,
	#[serde(default = "default_ledger_path")]
	pub path: String,
	pub api_key: Option<String>,
	#[serde(default = "default_ledger_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default = "default_min_secret_chars")]
	pub min_secret_chars: usize,
}

fn default_min_search_term_chars() -> usize {
	1
}

fn default_ledger_path() -> String {
	"/v1/feedback".to_string()
}

fn default_ledger_timeout_ms() -> u64 {
	5_000
}

fn default_min_secret_chars() -> usize {
	16
}
