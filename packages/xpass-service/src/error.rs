pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}

impl From<xpass_storage::Error> for Error {
	fn from(err: xpass_storage::Error) -> Self {
		match err {
			xpass_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			xpass_storage::Error::InvalidArgument(message)
			| xpass_storage::Error::Conflict(message) => Self::InvalidRequest { message },
			xpass_storage::Error::NotFound(message) => Self::NotFound { message },
			xpass_storage::Error::Backend(message) => Self::Storage { message },
		}
	}
}
