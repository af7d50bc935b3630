use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = xpass_api::Args::parse();

	xpass_api::run(args).await
}
