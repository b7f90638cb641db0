pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error("Invalid note id '{note_id}'.")]
	InvalidNoteId { note_id: String },
	/// Non-2xx reply; ETAPI error bodies carry a machine code and a message.
	#[error("ETAPI returned {status} {code}: {message}")]
	Api { status: u16, code: String, message: String },
}
impl Error {
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Api { status: 404, .. })
	}
}
