use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub service: Service,
	pub trilium: Trilium,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Service {
	pub mcp_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Connection to the Trilium ETAPI.
#[derive(Debug, Deserialize, Clone)]
pub struct Trilium {
	/// Base URL including the `/etapi` path, e.g. "http://127.0.0.1:8080/etapi".
	pub api_base: String,
	pub token: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Search {
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	/// Emits compiled queries and dropped criteria as debug events.
	#[serde(default)]
	pub trace_queries: bool,
}
impl Default for Search {
	fn default() -> Self {
		Self { max_limit: default_max_limit(), trace_queries: false }
	}
}

#[derive(Debug, Deserialize, Clone)]
pub struct Security {
	pub auth_mode: String,
	#[serde(default)]
	pub auth_keys: Vec<SecurityAuthKey>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SecurityAuthKey {
	pub token_id: String,
	pub token: String,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_max_limit() -> u32 {
	200
}
