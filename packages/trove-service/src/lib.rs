pub mod create;
pub mod delete;
pub mod get;
pub mod search;
pub mod update;

mod error;

pub use create::{CreateNoteRequest, CreateNoteResponse};
pub use delete::{DeleteNoteRequest, DeleteNoteResponse};
pub use error::{Error, Result};
pub use get::{GetNoteRequest, NoteView};
pub use search::{SearchRequest, SearchResponse};
pub use update::{UpdateNoteRequest, UpdateNoteResponse};

use trove_config::Config;
use trove_etapi::{AppInfo, EtapiClient};

/// Note types the ETAPI accepts on create and update.
pub const NOTE_TYPES: [&str; 15] = [
	"text",
	"code",
	"render",
	"file",
	"image",
	"search",
	"relationMap",
	"book",
	"noteMap",
	"mermaid",
	"webView",
	"shortcut",
	"doc",
	"contentWidget",
	"launcher",
];

/// Types whose content is meaningless without a MIME type.
const MIME_REQUIRED_TYPES: [&str; 3] = ["code", "file", "image"];

#[derive(Clone, Debug)]
pub struct TroveService {
	pub cfg: Config,
	pub etapi: EtapiClient,
}
impl TroveService {
	pub fn new(cfg: Config) -> Result<Self> {
		let etapi = EtapiClient::new(&cfg.trilium)?;

		Ok(Self { cfg, etapi })
	}

	/// Confirms the ETAPI is reachable and accepts the configured token.
	pub async fn check_connection(&self) -> Result<AppInfo> {
		let info = self.etapi.app_info().await?;

		tracing::info!(
			app_version = %info.app_version,
			db_version = info.db_version,
			"Connected to Trilium."
		);

		Ok(info)
	}
}

pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<String> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidRequest { message: format!("{field} must be non-empty.") });
	}

	Ok(trimmed.to_string())
}

pub(crate) fn validate_note_type(note_type: &str, mime: Option<&str>) -> Result<()> {
	if !NOTE_TYPES.contains(&note_type) {
		return Err(Error::InvalidRequest {
			message: format!("type must be one of {}, got {note_type}.", NOTE_TYPES.join(", ")),
		});
	}
	if MIME_REQUIRED_TYPES.contains(&note_type) && mime.is_none_or(|mime| mime.trim().is_empty()) {
		return Err(Error::InvalidRequest {
			message: format!("mime is required for {note_type} notes."),
		});
	}

	Ok(())
}

pub(crate) fn default_true() -> bool {
	true
}
