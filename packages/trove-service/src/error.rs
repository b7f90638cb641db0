pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error(transparent)]
	Query(#[from] trove_query::Error),
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Trilium error: {message}")]
	Upstream { message: String },
}
impl From<trove_etapi::Error> for Error {
	fn from(err: trove_etapi::Error) -> Self {
		match err {
			trove_etapi::Error::InvalidNoteId { note_id } =>
				Self::InvalidRequest { message: format!("'{note_id}' is not a valid note id.") },
			trove_etapi::Error::Api { status: 404, message, .. } => Self::NotFound { message },
			other => Self::Upstream { message: other.to_string() },
		}
	}
}
