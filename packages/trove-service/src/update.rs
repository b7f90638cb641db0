use serde::{Deserialize, Serialize};

use crate::{Error, Result, TroveService};
use trove_etapi::NotePatch;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
	pub note_id: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(rename = "type", default)]
	pub note_type: Option<String>,
	#[serde(default)]
	pub mime: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	/// Saves the previous content as a revision before overwriting it.
	#[serde(default = "crate::default_true")]
	pub create_revision: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteResponse {
	pub note_id: String,
	pub updated_fields: Vec<String>,
	pub revision_created: bool,
}

impl TroveService {
	pub async fn update(&self, req: UpdateNoteRequest) -> Result<UpdateNoteResponse> {
		let note_id = trove_etapi::validate_note_id(&req.note_id)?.to_string();
		let patch = NotePatch {
			title: req
				.title
				.as_deref()
				.map(|title| crate::require_non_empty(title, "title"))
				.transpose()?,
			note_type: req.note_type.as_deref().map(|note_type| note_type.trim().to_string()),
			mime: req
				.mime
				.as_deref()
				.map(|mime| mime.trim().to_string())
				.filter(|mime| !mime.is_empty()),
		};

		if patch.is_empty() && req.content.is_none() {
			return Err(Error::InvalidRequest {
				message: "At least one of title, type, mime, or content is required.".to_string(),
			});
		}
		if let Some(note_type) = patch.note_type.as_deref() {
			let mime = match patch.mime.as_deref() {
				Some(mime) => Some(mime.to_string()),
				None => Some(self.etapi.get_note(&note_id).await?.mime),
			};

			crate::validate_note_type(note_type, mime.as_deref())?;
		}

		let mut updated_fields = Vec::new();
		let mut revision_created = false;

		if !patch.is_empty() {
			self.etapi.patch_note(&note_id, &patch).await?;

			updated_fields.extend(
				[
					("title", patch.title.is_some()),
					("type", patch.note_type.is_some()),
					("mime", patch.mime.is_some()),
				]
				.into_iter()
				.filter(|(_, changed)| *changed)
				.map(|(field, _)| field.to_string()),
			);
		}
		if let Some(content) = req.content.as_deref() {
			if req.create_revision {
				self.etapi.create_revision(&note_id).await?;

				revision_created = true;
			}

			self.etapi.put_note_content(&note_id, content).await?;
			updated_fields.push("content".to_string());
		}

		tracing::info!(%note_id, fields = ?updated_fields, revision_created, "Updated note.");

		Ok(UpdateNoteResponse { note_id, updated_fields, revision_created })
	}
}
