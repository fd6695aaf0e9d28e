use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = warden_api::Args::parse();

	warden_api::run(args).await
}
