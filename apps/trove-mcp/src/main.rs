use clap::Parser;

use trove_mcp::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	trove_mcp::run(args).await
}
