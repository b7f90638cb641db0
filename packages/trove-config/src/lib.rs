mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Search, Security, SecurityAuthKey, Service, Trilium};

use std::{collections::HashSet, fs, path::Path};

pub const AUTH_MODE_OFF: &str = "off";
pub const AUTH_MODE_STATIC_KEYS: &str = "static_keys";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.mcp_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.mcp_bind must be non-empty.".to_string(),
		});
	}

	let api_base = cfg.trilium.api_base.trim();

	if api_base.is_empty() {
		return Err(Error::Validation {
			message: "trilium.api_base must be non-empty.".to_string(),
		});
	}
	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "trilium.api_base must start with http:// or https://.".to_string(),
		});
	}
	if cfg.trilium.token.trim().is_empty() {
		return Err(Error::Validation { message: "trilium.token must be non-empty.".to_string() });
	}
	if cfg.trilium.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "trilium.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit == 0 {
		return Err(Error::Validation {
			message: "search.max_limit must be greater than zero.".to_string(),
		});
	}

	match cfg.security.auth_mode.as_str() {
		AUTH_MODE_OFF => Ok(()),
		AUTH_MODE_STATIC_KEYS => validate_auth_keys(cfg),
		other => Err(Error::Validation {
			message: format!(
				"security.auth_mode must be one of off or static_keys, got {other}."
			),
		}),
	}
}

fn validate_auth_keys(cfg: &Config) -> Result<()> {
	if cfg.security.auth_keys.is_empty() {
		return Err(Error::Validation {
			message: "security.auth_keys must be non-empty when security.auth_mode=static_keys."
				.to_string(),
		});
	}

	let mut token_ids = HashSet::new();

	for key in &cfg.security.auth_keys {
		if key.token_id.is_empty() || key.token.is_empty() {
			return Err(Error::Validation {
				message: "security.auth_keys entries require non-empty token_id and token."
					.to_string(),
			});
		}
		if !token_ids.insert(key.token_id.as_str()) {
			return Err(Error::Validation {
				message: format!("security.auth_keys token_id {} is duplicated.", key.token_id),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.mcp_bind = cfg.service.mcp_bind.trim().to_string();
	cfg.trilium.api_base = cfg.trilium.api_base.trim().trim_end_matches('/').to_string();
	cfg.trilium.token = cfg.trilium.token.trim().to_string();
	cfg.security.auth_mode = cfg.security.auth_mode.trim().to_ascii_lowercase();

	for key in &mut cfg.security.auth_keys {
		key.token_id = key.token_id.trim().to_string();
		key.token = key.token.trim().to_string();
	}
}
