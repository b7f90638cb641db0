use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
	pub note_id: String,
	pub title: String,
	#[serde(rename = "type")]
	pub note_type: String,
	pub mime: String,
	pub is_protected: bool,
	pub attributes: Vec<Attribute>,
	pub parent_note_ids: Vec<String>,
	pub child_note_ids: Vec<String>,
	pub date_created: String,
	pub date_modified: String,
	pub utc_date_created: String,
	pub utc_date_modified: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attribute {
	pub attribute_id: String,
	pub note_id: String,
	/// Either "label" or "relation".
	#[serde(rename = "type")]
	pub attribute_type: String,
	pub name: String,
	pub value: String,
	pub position: i64,
	pub is_inheritable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branch {
	pub branch_id: String,
	pub note_id: String,
	pub parent_note_id: String,
	pub prefix: Option<String>,
	pub note_position: i64,
	pub is_expanded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithBranch {
	pub note: Note,
	pub branch: Branch,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppInfo {
	pub app_version: String,
	pub db_version: i64,
	pub sync_version: i64,
	pub build_date: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteParams {
	pub parent_note_id: String,
	pub title: String,
	#[serde(rename = "type")]
	pub note_type: String,
	pub content: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mime: Option<String>,
}

/// Metadata patch; absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NotePatch {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub note_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mime: Option<String>,
}
impl NotePatch {
	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.note_type.is_none() && self.mime.is_none()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
	pub search: String,
	pub fast_search: bool,
	pub include_archived_notes: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults {
	pub(crate) results: Vec<Note>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorBody {
	pub(crate) code: String,
	pub(crate) message: String,
}
