use std::{net::SocketAddr, sync::Arc};

use axum::{
	Router,
	body::Body,
	extract::State,
	http::{HeaderMap, Request, StatusCode},
	middleware::{self, Next},
	response::IntoResponse,
};
use color_eyre::Result;
use rmcp::{
	ErrorData, ServerHandler,
	handler::server::router::tool::ToolRouter,
	model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo},
	transport::streamable_http_server::{
		StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
	},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::McpAuthState;
use trove_service::{Error, TroveService};

pub const TOOL_SEARCH_NOTES: &str = "search_notes";
pub const TOOL_GET_NOTE: &str = "get_note";
pub const TOOL_CREATE_NOTE: &str = "create_note";
pub const TOOL_UPDATE_NOTE: &str = "update_note";
pub const TOOL_DELETE_NOTE: &str = "delete_note";

const HEADER_AUTHORIZATION: &str = "Authorization";

#[derive(Clone)]
pub struct TroveMcp {
	service: Arc<TroveService>,
	tool_router: ToolRouter<Self>,
}
impl TroveMcp {
	pub fn new(service: Arc<TroveService>) -> Self {
		Self { service, tool_router: Self::tool_router() }
	}

	pub fn tool_names(&self) -> Vec<String> {
		self.tool_router.list_all().into_iter().map(|tool| tool.name.to_string()).collect()
	}
}

#[rmcp::tool_router]
impl TroveMcp {
	#[rmcp::tool(
		name = "search_notes",
		description = "Search Trilium notes by full text, label, relation, note property, and tree position. Criteria that cannot be compiled are dropped and listed in warnings.",
		input_schema = search_notes_schema()
	)]
	async fn search_notes(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = decode_params(params)?;

		respond(self.service.search(req).await)
	}

	#[rmcp::tool(
		name = "get_note",
		description = "Fetch a note's metadata and attributes by noteId, with its content unless includeContent is false.",
		input_schema = get_note_schema()
	)]
	async fn get_note(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = decode_params(params)?;

		respond(self.service.get(req).await)
	}

	#[rmcp::tool(
		name = "create_note",
		description = "Create a note under parentNoteId (root by default). Text note content is HTML.",
		input_schema = create_note_schema()
	)]
	async fn create_note(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = decode_params(params)?;

		respond(self.service.create(req).await)
	}

	#[rmcp::tool(
		name = "update_note",
		description = "Update a note's title, type, mime, or content. Only provided fields change; a revision is saved before content is replaced unless createRevision is false.",
		input_schema = update_note_schema()
	)]
	async fn update_note(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = decode_params(params)?;

		respond(self.service.update(req).await)
	}

	#[rmcp::tool(
		name = "delete_note",
		description = "Delete a note by noteId. The root note cannot be deleted.",
		input_schema = delete_note_schema()
	)]
	async fn delete_note(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = decode_params(params)?;

		respond(self.service.delete(req).await)
	}
}

#[rmcp::tool_handler]
impl ServerHandler for TroveMcp {
	fn get_info(&self) -> ServerInfo {
		ServerInfo {
			instructions: Some(
				"Trove exposes Trilium notes: search with structured criteria, then read, create, update, or delete notes by noteId."
					.to_string(),
			),
			capabilities: ServerCapabilities::builder().enable_tools().build(),
			..Default::default()
		}
	}
}

pub fn router(service: Arc<TroveService>, auth_state: McpAuthState) -> Router {
	let session_manager: Arc<LocalSessionManager> = Default::default();
	let mcp = StreamableHttpService::new(
		move || Ok(TroveMcp::new(service.clone())),
		session_manager,
		StreamableHttpServerConfig::default(),
	);

	Router::new()
		.fallback_service(mcp)
		.layer(middleware::from_fn_with_state(auth_state, mcp_auth_middleware))
}

pub async fn serve_mcp(
	bind_addr: &str,
	service: TroveService,
	auth_state: McpAuthState,
) -> Result<()> {
	let bind_addr: SocketAddr = bind_addr.parse()?;
	let router = router(Arc::new(service), auth_state);
	let listener = TcpListener::bind(bind_addr).await?;

	tracing::info!(%bind_addr, "MCP server listening.");

	axum::serve(listener, router).await?;

	Ok(())
}

fn decode_params<T>(params: JsonObject) -> Result<T, ErrorData>
where
	T: DeserializeOwned,
{
	serde_json::from_value(Value::Object(params))
		.map_err(|err| ErrorData::invalid_params(format!("Invalid arguments: {err}"), None))
}

fn respond<T>(result: trove_service::Result<T>) -> Result<CallToolResult, ErrorData>
where
	T: Serialize,
{
	match result {
		Ok(value) => serde_json::to_value(value).map(CallToolResult::structured).map_err(|err| {
			ErrorData::internal_error(format!("Failed to encode tool result: {err}"), None)
		}),
		Err(err) => tool_error(err),
	}
}

fn tool_error(err: Error) -> Result<CallToolResult, ErrorData> {
	let error_code = match &err {
		Error::InvalidRequest { .. } | Error::Query(_) =>
			return Err(ErrorData::invalid_params(err.to_string(), None)),
		Error::NotFound { .. } => "NOT_FOUND",
		Error::Upstream { .. } => "UPSTREAM_ERROR",
	};

	tracing::warn!(error_code, error = %err, "Tool call failed.");

	Ok(CallToolResult::structured_error(
		serde_json::json!({ "error_code": error_code, "message": err.to_string() }),
	))
}

fn is_authorized(headers: &HeaderMap, auth_state: &McpAuthState) -> bool {
	match auth_state {
		McpAuthState::Off => true,
		McpAuthState::StaticKeys { bearer_tokens } => read_bearer_token(headers)
			.is_some_and(|token| bearer_tokens.iter().any(|expected| expected == token)),
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(HEADER_AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

async fn mcp_auth_middleware(
	State(auth_state): State<McpAuthState>,
	req: Request<Body>,
	next: Next,
) -> axum::response::Response {
	if !is_authorized(req.headers(), &auth_state) {
		return (
			StatusCode::UNAUTHORIZED,
			"Authentication required for security.auth_mode=static_keys with a Bearer token.",
		)
			.into_response();
	}

	next.run(req).await
}

fn search_notes_schema() -> Arc<JsonObject> {
	let kind = serde_json::json!({
		"type": "string",
		"enum": ["label", "relation", "noteProperty", "note_property", "fulltext"]
	});
	let op = serde_json::json!({
		"type": ["string", "null"],
		"enum": [
			"exists", "not_exists", "=", "!=", ">", ">=", "<", "<=",
			"contains", "starts_with", "ends_with", "regex", "not_equal", null
		]
	});
	let reference_note_id = serde_json::json!({ "type": "string" });

	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"properties": {
			"text": { "type": ["string", "null"], "description": "Full-text words matched against titles and content." },
			"criteria": {
				"type": "array",
				"items": {
					"type": "object",
					"additionalProperties": true,
					"required": ["property"],
					"anyOf": [{ "required": ["type"] }, { "required": ["variant"] }],
					"properties": {
						"property": { "type": "string", "description": "Label or relation name, or a note property such as title or dateCreated." },
						"type": kind.clone(),
						"variant": kind,
						"op": op.clone(),
						"operator": op,
						"value": { "type": ["string", "null"] },
						"logic": { "type": ["string", "null"], "enum": ["AND", "OR", "and", "or", null] }
					}
				}
			},
			"hierarchy": {
				"type": ["object", "null"],
				"required": ["kind"],
				"anyOf": [{ "required": ["referenceNoteId"] }, { "required": ["noteId"] }],
				"properties": {
					"kind": { "type": "string", "enum": ["children", "descendants"] },
					"referenceNoteId": reference_note_id.clone(),
					"noteId": reference_note_id
				}
			},
			"limit": { "type": ["integer", "null"], "minimum": 1 },
			"includeArchived": { "type": ["boolean", "null"] }
		}
	}))
}

fn get_note_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["noteId"],
		"properties": {
			"noteId": { "type": "string" },
			"includeContent": { "type": ["boolean", "null"] }
		}
	}))
}

fn create_note_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["title"],
		"properties": {
			"parentNoteId": { "type": ["string", "null"] },
			"title": { "type": "string" },
			"type": { "type": ["string", "null"] },
			"content": { "type": ["string", "null"] },
			"mime": { "type": ["string", "null"] }
		}
	}))
}

fn update_note_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["noteId"],
		"properties": {
			"noteId": { "type": "string" },
			"title": { "type": ["string", "null"] },
			"type": { "type": ["string", "null"] },
			"mime": { "type": ["string", "null"] },
			"content": { "type": ["string", "null"] },
			"createRevision": { "type": ["boolean", "null"] }
		}
	}))
}

fn delete_note_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["noteId"],
		"properties": {
			"noteId": { "type": "string" }
		}
	}))
}
