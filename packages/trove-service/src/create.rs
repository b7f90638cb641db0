use serde::{Deserialize, Serialize};

use crate::{Result, TroveService};
use trove_etapi::{Branch, CreateNoteParams, Note};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
	#[serde(default = "default_parent_note_id")]
	pub parent_note_id: String,
	pub title: String,
	#[serde(rename = "type", default = "default_note_type")]
	pub note_type: String,
	/// Stored verbatim; HTML for text notes.
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub mime: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateNoteResponse {
	pub note: Note,
	pub branch: Branch,
}

impl TroveService {
	pub async fn create(&self, req: CreateNoteRequest) -> Result<CreateNoteResponse> {
		let title = crate::require_non_empty(&req.title, "title")?;
		let parent_note_id = trove_etapi::validate_note_id(&req.parent_note_id)?.to_string();
		let note_type = req.note_type.trim().to_string();
		let mime = req.mime.map(|mime| mime.trim().to_string()).filter(|mime| !mime.is_empty());

		crate::validate_note_type(&note_type, mime.as_deref())?;

		let params =
			CreateNoteParams { parent_note_id, title, note_type, content: req.content, mime };
		let created = self.etapi.create_note(&params).await?;

		tracing::info!(
			note_id = %created.note.note_id,
			parent_note_id = %created.branch.parent_note_id,
			"Created note."
		);

		Ok(CreateNoteResponse { note: created.note, branch: created.branch })
	}
}

fn default_parent_note_id() -> String {
	"root".to_string()
}

fn default_note_type() -> String {
	"text".to_string()
}
