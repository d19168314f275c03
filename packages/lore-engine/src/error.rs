pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The only two failure classes that cross the engine boundary; everything
/// else is absorbed into a degraded-but-successful response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Retrieval unavailable: {message}")]
	RetrievalUnavailable { message: String },
}
