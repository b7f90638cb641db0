//! Async client for the Trilium ETAPI.

mod error;
mod models;

pub use error::{Error, Result};
pub use models::{
	AppInfo, Attribute, Branch, CreateNoteParams, Note, NotePatch, NoteWithBranch, SearchParams,
};

use std::time::Duration;

use reqwest::{
	Client, RequestBuilder, Response,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::models::{ApiErrorBody, SearchResults};

#[derive(Clone, Debug)]
pub struct EtapiClient {
	api_base: String,
	token: String,
	client: Client,
}
impl EtapiClient {
	pub fn new(cfg: &trove_config::Trilium) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			api_base: cfg.api_base.trim_end_matches('/').to_string(),
			token: cfg.token.clone(),
			client,
		})
	}

	pub async fn search_notes(&self, params: &SearchParams) -> Result<Vec<Note>> {
		let query = [
			("search", params.search.clone()),
			("fastSearch", params.fast_search.to_string()),
			("includeArchivedNotes", params.include_archived_notes.to_string()),
		];
		let request = self.client.get(self.url("/notes")).query(&query);
		let results: SearchResults = self.send_json(request).await?;

		Ok(results.results)
	}

	pub async fn get_note(&self, note_id: &str) -> Result<Note> {
		let request = self.client.get(self.note_url(note_id, "")?);

		self.send_json(request).await
	}

	pub async fn get_note_content(&self, note_id: &str) -> Result<String> {
		let request = self.client.get(self.note_url(note_id, "/content")?);

		Ok(self.send(request).await?.text().await?)
	}

	pub async fn create_note(&self, params: &CreateNoteParams) -> Result<NoteWithBranch> {
		let request = self.client.post(self.url("/create-note")).json(params);

		self.send_json(request).await
	}

	pub async fn patch_note(&self, note_id: &str, patch: &NotePatch) -> Result<Note> {
		let request = self.client.patch(self.note_url(note_id, "")?).json(patch);

		self.send_json(request).await
	}

	pub async fn put_note_content(&self, note_id: &str, content: &str) -> Result<()> {
		let request = self
			.client
			.put(self.note_url(note_id, "/content")?)
			.header(CONTENT_TYPE, "text/plain")
			.body(content.to_string());

		self.send(request).await?;

		Ok(())
	}

	/// Snapshots the current note content as a revision.
	pub async fn create_revision(&self, note_id: &str) -> Result<()> {
		let request = self.client.post(self.note_url(note_id, "/revision")?);

		self.send(request).await?;

		Ok(())
	}

	pub async fn delete_note(&self, note_id: &str) -> Result<()> {
		let request = self.client.delete(self.note_url(note_id, "")?);

		self.send(request).await?;

		Ok(())
	}

	pub async fn app_info(&self) -> Result<AppInfo> {
		let request = self.client.get(self.url("/app-info"));

		self.send_json(request).await
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}

	fn note_url(&self, note_id: &str, suffix: &str) -> Result<String> {
		let note_id = validate_note_id(note_id)?;

		Ok(self.url(&format!("/notes/{note_id}{suffix}")))
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response> {
		let response = request.header(AUTHORIZATION, self.token.as_str()).send().await?;
		let status = response.status();

		if status.is_success() {
			return Ok(response);
		}

		let bytes = response.bytes().await?;
		let body = serde_json::from_slice::<ApiErrorBody>(&bytes).unwrap_or_else(|_| ApiErrorBody {
			code: status.canonical_reason().unwrap_or("UNKNOWN").to_string(),
			message: String::from_utf8_lossy(&bytes).to_string(),
		});

		Err(Error::Api { status: status.as_u16(), code: body.code, message: body.message })
	}

	async fn send_json<T>(&self, request: RequestBuilder) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let bytes = self.send(request).await?.bytes().await?;

		Ok(serde_json::from_slice(&bytes)?)
	}
}

/// Note ids are interpolated into URL paths, so only id characters are accepted.
pub fn validate_note_id(note_id: &str) -> Result<&str> {
	let trimmed = note_id.trim();
	let valid = !trimmed.is_empty()
		&& trimmed.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');

	if valid { Ok(trimmed) } else { Err(Error::InvalidNoteId { note_id: note_id.to_string() }) }
}

#[cfg(test)]
mod tests {
	use crate::{Error, NotePatch, validate_note_id};

	#[test]
	fn note_ids_are_restricted_to_id_characters() {
		assert_eq!(validate_note_id(" root ").expect("valid id"), "root");
		assert_eq!(validate_note_id("_hidden").expect("valid id"), "_hidden");

		for raw in ["", "  ", "abc/def", "abc?x=1", "../etc"] {
			assert!(matches!(validate_note_id(raw), Err(Error::InvalidNoteId { .. })), "{raw}");
		}
	}

	#[test]
	fn empty_patch_serializes_to_empty_object() {
		let patch = NotePatch::default();

		assert!(patch.is_empty());
		assert_eq!(serde_json::to_value(&patch).expect("json"), serde_json::json!({}));
	}
}
