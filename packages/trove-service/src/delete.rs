use serde::{Deserialize, Serialize};

use crate::{Error, Result, TroveService};

const ROOT_NOTE_ID: &str = "root";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteRequest {
	pub note_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteResponse {
	pub note_id: String,
	pub deleted: bool,
}

impl TroveService {
	pub async fn delete(&self, req: DeleteNoteRequest) -> Result<DeleteNoteResponse> {
		let note_id = trove_etapi::validate_note_id(&req.note_id)?.to_string();

		if note_id == ROOT_NOTE_ID {
			return Err(Error::InvalidRequest {
				message: "The root note cannot be deleted.".to_string(),
			});
		}

		self.etapi.delete_note(&note_id).await?;

		tracing::info!(%note_id, "Deleted note.");

		Ok(DeleteNoteResponse { note_id, deleted: true })
	}
}
