use serde::{Deserialize, Serialize};

use crate::{Result, TroveService};
use trove_etapi::Note;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNoteRequest {
	pub note_id: String,
	#[serde(default = "crate::default_true")]
	pub include_content: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteView {
	pub note: Note,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl TroveService {
	pub async fn get(&self, req: GetNoteRequest) -> Result<NoteView> {
		let note = self.etapi.get_note(&req.note_id).await?;
		let content = if req.include_content {
			Some(self.etapi.get_note_content(&note.note_id).await?)
		} else {
			None
		};

		tracing::info!(note_id = %note.note_id, with_content = content.is_some(), "Fetched note.");

		Ok(NoteView { note, content })
	}
}
