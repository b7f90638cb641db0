pub mod server;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::{Result, eyre};

use trove_config::{AUTH_MODE_OFF, AUTH_MODE_STATIC_KEYS, Security};
use trove_service::TroveService;

#[derive(Debug, Parser)]
#[command(
	version = trove_cli::VERSION,
	rename_all = "kebab",
	styles = trove_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum McpAuthState {
	Off,
	StaticKeys { bearer_tokens: Vec<String> },
}

pub async fn run(args: Args) -> Result<()> {
	let config = trove_config::load(&args.config)?;

	trove_cli::init_tracing(&config.service.log_level);

	let auth_state = build_auth_state(&config.security, &config.service.mcp_bind)?;
	let bind = config.service.mcp_bind.clone();
	let service = TroveService::new(config)?;

	service.check_connection().await?;

	server::serve_mcp(&bind, service, auth_state).await
}

pub fn build_auth_state(security: &Security, mcp_bind: &str) -> Result<McpAuthState> {
	match security.auth_mode.as_str() {
		AUTH_MODE_OFF => {
			enforce_loopback_for_off_mode(mcp_bind)?;

			Ok(McpAuthState::Off)
		},
		AUTH_MODE_STATIC_KEYS => {
			let bearer_tokens =
				security.auth_keys.iter().map(|key| key.token.clone()).collect::<Vec<_>>();

			if bearer_tokens.is_empty() {
				return Err(eyre::eyre!(
					"security.auth_mode=static_keys requires at least one entry in security.auth_keys."
				));
			}

			Ok(McpAuthState::StaticKeys { bearer_tokens })
		},
		other => Err(eyre::eyre!(
			"security.auth_mode must be one of off or static_keys for trove-mcp, got {other}."
		)),
	}
}

fn enforce_loopback_for_off_mode(mcp_bind: &str) -> Result<()> {
	let bind_addr: SocketAddr = mcp_bind.parse().map_err(|err| {
		eyre::eyre!(
			"service.mcp_bind must be a valid socket address when security.auth_mode=off: {err}"
		)
	})?;

	if !bind_addr.ip().is_loopback() {
		return Err(eyre::eyre!(
			"service.mcp_bind must be a loopback address when security.auth_mode=off."
		));
	}

	Ok(())
}
