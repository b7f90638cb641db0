use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use trove_config::{Config, Error, SecurityAuthKey};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml() -> String {
	SAMPLE_CONFIG_TEMPLATE_TOML.to_string()
}

fn sample_toml_with_security(auth_mode: &str, keys: &[(&str, &str)]) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let security = root
		.get_mut("security")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [security].");
	let auth_keys = keys
		.iter()
		.map(|(token_id, token)| {
			let mut entry = toml::Table::new();

			entry.insert("token_id".to_string(), Value::String(token_id.to_string()));
			entry.insert("token".to_string(), Value::String(token.to_string()));

			Value::Table(entry)
		})
		.collect();

	security.insert("auth_mode".to_string(), Value::String(auth_mode.to_string()));
	security.insert("auth_keys".to_string(), Value::Array(auth_keys));

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("trove_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> trove_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = trove_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	load_payload(sample_toml()).expect("Sample config must be valid.")
}

#[test]
fn load_normalizes_api_base_and_token() {
	let cfg = base_config();

	assert_eq!(cfg.trilium.api_base, "http://127.0.0.1:8080/etapi");
	assert_eq!(cfg.trilium.token, "etapi-token");
	assert_eq!(cfg.search.max_limit, 200);
}

#[test]
fn search_section_is_optional() {
	let mut value: Value = toml::from_str(&sample_toml()).expect("Failed to parse template.");

	value.as_table_mut().expect("table").remove("search");

	let cfg = load_payload(toml::to_string(&value).expect("render")).expect("valid config");

	assert_eq!(cfg.search.max_limit, 200);
	assert!(!cfg.search.trace_queries);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("trove_config_test_missing.toml");
	let err = trove_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn api_base_requires_http_scheme() {
	let mut cfg = base_config();

	cfg.trilium.api_base = "127.0.0.1:8080/etapi".to_string();

	let err = trove_config::validate(&cfg).expect_err("Expected api_base validation error.");

	assert!(
		err.to_string().contains("trilium.api_base must start with http:// or https://."),
		"Unexpected error: {err}"
	);
}

#[test]
fn token_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.trilium.token = " ".to_string();

	let err = trove_config::validate(&cfg).expect_err("Expected token validation error.");

	assert!(err.to_string().contains("trilium.token must be non-empty."), "Unexpected error: {err}");
}

#[test]
fn max_limit_must_be_positive() {
	let mut cfg = base_config();

	cfg.search.max_limit = 0;

	let err = trove_config::validate(&cfg).expect_err("Expected max_limit validation error.");

	assert!(
		err.to_string().contains("search.max_limit must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn unknown_auth_mode_is_rejected() {
	let err = load_payload(sample_toml_with_security("oauth", &[]))
		.expect_err("Expected auth_mode validation error.");

	assert!(err.to_string().contains("got oauth"), "Unexpected error: {err}");
}

#[test]
fn static_keys_require_at_least_one_key() {
	let err = load_payload(sample_toml_with_security("static_keys", &[]))
		.expect_err("Expected auth_keys validation error.");

	assert!(err.to_string().contains("security.auth_keys must be non-empty"), "Unexpected error: {err}");
}

#[test]
fn static_keys_reject_duplicate_token_ids() {
	let err = load_payload(sample_toml_with_security("static_keys", &[
		("desktop", "token-a"),
		("desktop", "token-b"),
	]))
	.expect_err("Expected duplicate token_id validation error.");

	assert!(err.to_string().contains("is duplicated"), "Unexpected error: {err}");
}

#[test]
fn static_keys_load_trimmed_entries() {
	let cfg = load_payload(sample_toml_with_security(" Static_Keys ", &[(" desktop ", " token-a ")]))
		.expect("valid config");

	assert_eq!(cfg.security.auth_mode, "static_keys");
	assert_eq!(cfg.security.auth_keys, vec![SecurityAuthKey {
		token_id: "desktop".to_string(),
		token: "token-a".to_string(),
	}]);
}
