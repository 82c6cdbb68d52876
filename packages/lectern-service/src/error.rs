pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Fragment error: {message}")]
	Fragment { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<lectern_storage::Error> for Error {
	fn from(err: lectern_storage::Error) -> Self {
		match err {
			lectern_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			lectern_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			lectern_storage::Error::NotFound(message) => Self::NotFound { message },
			lectern_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Fragment { message: err.to_string() }
	}
}
